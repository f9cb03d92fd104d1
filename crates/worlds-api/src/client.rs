//! Generic JSON request helper and URL builder.

use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::ApiError;

/// Response header carrying the total item count for paged listings.
const TOTAL_HEADER: &str = "X-Total";

/// One page of a filtered listing.
#[derive(Clone, Debug)]
pub struct Page<T> {
    /// Items on this page.
    pub items: T,
    /// Total item count across all pages, 0 when the service omits it.
    pub total: u64,
}

/// Standard filtering/paging parameters for listing endpoints.
#[derive(Clone, Debug)]
pub struct FilterQuery {
    /// Free-text search, skipped when empty.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// `column,direction` sort key, skipped when empty.
    pub sort_by: Option<String>,
}

impl Default for FilterQuery {
    fn default() -> Self {
        Self {
            search: None,
            page: 1,
            per_page: 10,
            sort_by: None,
        }
    }
}

impl FilterQuery {
    /// Marshal into query parameters, skipping empty values.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), self.page.to_string()),
            ("perPage".to_string(), self.per_page.to_string()),
        ];
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            query.push(("search".to_string(), search.to_string()));
        }
        if let Some(sort_by) = self.sort_by.as_deref().filter(|s| !s.is_empty()) {
            query.push(("sortBy".to_string(), sort_by.to_string()));
        }
        query
    }
}

/// A single API request: method, endpoint, query, optional JSON body.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    method: Method,
    endpoint: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl ApiRequest {
    fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// GET `endpoint`.
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    /// POST `endpoint`.
    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    /// PATCH `endpoint`.
    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PATCH, endpoint)
    }

    /// DELETE `endpoint`.
    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    /// Append one query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append several query parameters.
    pub fn queries(mut self, params: Vec<(String, String)>) -> Self {
        self.query.extend(params);
        self
    }

    /// Attach a JSON body.
    pub fn body(mut self, body: &impl Serialize) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body).map_err(ApiError::Encode)?);
        Ok(self)
    }
}

/// JSON-over-HTTP client for the service.
///
/// Knows the configured base address and how to marshal requests; the
/// typed operations live in [`crate::WorldApi`].
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the given base URL (trailing `/` tolerated).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .user_agent("worlds-client/1.0")
                .build()
                .unwrap_or_default(),
        }
    }

    /// Full address for a relative endpoint.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    /// Full WebSocket address for a relative endpoint (`http` → `ws`,
    /// `https` → `wss`).
    pub fn ws_url_for(&self, endpoint: &str) -> Result<String, ApiError> {
        let mut url = Url::parse(&self.url_for(endpoint))?;
        let scheme = match url.scheme() {
            "http" => "ws",
            "https" => "wss",
            other => other,
        }
        .to_owned();
        if url.set_scheme(&scheme).is_err() {
            return Err(ApiError::WsScheme(url.to_string()));
        }
        Ok(url.to_string())
    }

    /// Issue a request and decode the JSON response body as `T`.
    pub async fn request<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(ApiError::Decode)
    }

    /// Issue a request and decode one page of a filtered listing, taking
    /// the total count from the `X-Total` header (0 when absent).
    pub async fn request_paged<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Page<T>, ApiError> {
        let response = self.send(request).await?;
        let total = header_total(response.headers());
        let body = response.text().await?;
        let items = serde_json::from_str(&body).map_err(ApiError::Decode)?;
        Ok(Page { items, total })
    }

    async fn send(&self, request: ApiRequest) -> Result<reqwest::Response, ApiError> {
        let url = self.url_for(&request.endpoint);
        debug!(method = %request.method, %url, "api request");

        let mut builder = self
            .http
            .request(request.method, &url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(ApiError::Status {
                status,
                endpoint: request.endpoint,
            });
        }
        Ok(response)
    }
}

fn header_total(headers: &HeaderMap) -> u64 {
    headers
        .get(TOTAL_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_for_joins_base_and_endpoint() {
        let client = ApiClient::new("http://127.0.0.1:8000/api/");
        assert_eq!(client.url_for("worlds"), "http://127.0.0.1:8000/api/worlds");
    }

    #[test]
    fn ws_url_for_maps_schemes() {
        let client = ApiClient::new("http://host/api");
        assert_eq!(
            client.ws_url_for("worlds/ws/1/watch-status").unwrap(),
            "ws://host/api/worlds/ws/1/watch-status"
        );
        let secure = ApiClient::new("https://host/api");
        assert!(secure.ws_url_for("x").unwrap().starts_with("wss://"));
    }

    #[test]
    fn filter_query_skips_empty_values() {
        let query = FilterQuery::default().to_query();
        assert_eq!(
            query,
            vec![
                ("page".to_string(), "1".to_string()),
                ("perPage".to_string(), "10".to_string()),
            ]
        );

        let full = FilterQuery {
            search: Some("arena".into()),
            page: 2,
            per_page: 25,
            sort_by: Some("title,asc".into()),
        }
        .to_query();
        assert!(full.contains(&("search".to_string(), "arena".to_string())));
        assert!(full.contains(&("sortBy".to_string(), "title,asc".to_string())));
    }

    #[test]
    fn header_total_defaults_to_zero() {
        let headers = HeaderMap::new();
        assert_eq!(header_total(&headers), 0);

        let mut headers = HeaderMap::new();
        let _ = headers.insert(TOTAL_HEADER, "42".parse().unwrap());
        assert_eq!(header_total(&headers), 42);

        let mut headers = HeaderMap::new();
        let _ = headers.insert(TOTAL_HEADER, "nan".parse().unwrap());
        assert_eq!(header_total(&headers), 0);
    }
}
