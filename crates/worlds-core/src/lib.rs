//! # worlds-core
//!
//! Foundation types for the worlds client: the DTO vocabulary shared with
//! the simulation service and helpers for decoding step payloads.
//!
//! The wire format is JSON with camelCase field names (the service renders
//! every DTO through a camelCase alias generator), so every type here
//! carries `#[serde(rename_all = "camelCase")]`.

#![deny(unsafe_code)]

pub mod dto;
pub mod step;

pub use dto::{
    ExtendedWorld, Stage, Step, World, WorldAction, WorldActionDef, WorldCreate, WorldStatus,
    WorldStatusStep, WorldUpdate,
};
pub use step::{LogEntry, ParsedStep, StepParseError};
