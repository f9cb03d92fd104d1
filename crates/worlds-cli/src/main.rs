//! # worlds-cli
//!
//! Command-line client for the worlds simulation service: manage worlds,
//! inspect steps, and live-watch world status over the WebSocket channel.

#![deny(unsafe_code)]

use std::io::Write;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use worlds_api::{ApiClient, WorldApi};
use worlds_core::{WorldAction, WorldCreate, WorldUpdate};

/// Worlds service client.
#[derive(Parser, Debug)]
#[command(name = "worlds", about = "Client for the worlds simulation service")]
struct Cli {
    /// Base URL of the service API (overrides settings).
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Answer yes to confirmation prompts.
    #[arg(short = 'y', long = "yes", global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all worlds.
    List {
        /// Include live runtime state (initialized/running).
        #[arg(long)]
        extended: bool,
    },
    /// Show one world.
    Show {
        /// World id.
        id: i64,
    },
    /// Create a new world.
    Create {
        /// Human-readable title.
        title: String,
        /// Plugin to instantiate the world with.
        plugin: String,
    },
    /// Update a world's title and configuration.
    Update {
        /// World id.
        id: i64,
        /// New title.
        #[arg(long)]
        title: String,
        /// New plugin configuration (JSON blob).
        #[arg(long, default_value = "")]
        config: String,
    },
    /// Delete a world.
    Delete {
        /// World id.
        id: i64,
    },
    /// Clear a world's accumulated stages and steps.
    Clear {
        /// World id.
        id: i64,
    },
    /// Start a world's simulation loop.
    Start {
        /// World id.
        id: i64,
        /// Stop automatically after this many steps.
        #[arg(long)]
        max_steps: Option<u32>,
    },
    /// Stop a world's simulation loop.
    Stop {
        /// World id.
        id: i64,
    },
    /// Show a world's current status.
    Status {
        /// World id.
        id: i64,
    },
    /// Queue an action for a running world.
    Act {
        /// World id.
        id: i64,
        /// Action name (see `worlds actions`).
        name: String,
    },
    /// List the actions a world's plugin accepts.
    Actions {
        /// World id.
        id: i64,
    },
    /// Follow live status updates until Ctrl-C.
    Watch {
        /// World id.
        id: i64,
    },
    /// Inspect simulation steps.
    #[command(subcommand)]
    Step(StepCommand),
}

#[derive(Subcommand, Debug)]
enum StepCommand {
    /// Show one step.
    Show {
        /// Step id.
        id: i64,
    },
    /// Show a human-readable description of a step's state.
    Describe {
        /// Step id.
        id: i64,
    },
}

/// Confirmation gate for destructive commands.
///
/// Holds its answer-yes flag per instance so nothing leaks between
/// invocations in tests.
struct Confirm {
    assume_yes: bool,
}

impl Confirm {
    fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }

    /// Ask the user to confirm. Returns `true` when the command should
    /// proceed.
    fn ask(&self, prompt: &str) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        print!("{prompt} [y/N] ");
        std::io::stdout().flush().context("Failed to flush stdout")?;
        let mut answer = String::new();
        let _ = std::io::stdin()
            .read_line(&mut answer)
            .context("Failed to read confirmation")?;
        let answer = answer.trim().to_ascii_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to render output")?
    );
    Ok(())
}

async fn run(cli: Cli, api: &WorldApi) -> Result<()> {
    let confirm = Confirm::new(cli.yes);

    match cli.command {
        Command::List { extended } => {
            if extended {
                let worlds = api.worlds_extended().await.context("Failed to list worlds")?;
                for w in &worlds {
                    let state = match (w.initialized, w.running) {
                        (_, true) => "running",
                        (true, false) => "initialized",
                        (false, false) => "idle",
                    };
                    println!("{:>4}  {}  [{}]  ({})", w.world.id, w.world.title, state, w.world.plugin);
                }
            } else {
                let worlds = api.worlds().await.context("Failed to list worlds")?;
                for w in &worlds {
                    println!("{:>4}  {}  ({})", w.id, w.title, w.plugin);
                }
            }
        }
        Command::Show { id } => {
            let world = api.world(id).await.context("Failed to fetch world")?;
            print_json(&world)?;
        }
        Command::Create { title, plugin } => {
            let world = api
                .create_world(&WorldCreate { title, plugin })
                .await
                .context("Failed to create world")?;
            println!("created world {}", world.id);
        }
        Command::Update { id, title, config } => {
            let world = api
                .update_world(id, &WorldUpdate { title, config })
                .await
                .context("Failed to update world")?;
            println!("updated world {}", world.id);
        }
        Command::Delete { id } => {
            if !confirm.ask(&format!("Delete world {id}?"))? {
                println!("aborted");
                return Ok(());
            }
            let remaining = api.delete_world(id).await.context("Failed to delete world")?;
            println!("deleted world {id} ({} remaining)", remaining.len());
        }
        Command::Clear { id } => {
            if !confirm.ask(&format!("Clear all stages and steps of world {id}?"))? {
                println!("aborted");
                return Ok(());
            }
            let _ = api.clear_world(id).await.context("Failed to clear world")?;
            println!("cleared world {id}");
        }
        Command::Start { id, max_steps } => {
            api.start_world(id, max_steps)
                .await
                .context("Failed to start world")?;
            println!("started world {id}");
        }
        Command::Stop { id } => {
            api.stop_world(id).await.context("Failed to stop world")?;
            println!("stopped world {id}");
        }
        Command::Status { id } => {
            let status = api.status(id).await.context("Failed to fetch status")?;
            print_json(&status)?;
        }
        Command::Act { id, name } => {
            api.send_action(id, &WorldAction { name: name.clone() })
                .await
                .context("Failed to queue action")?;
            println!("queued action {name} for world {id}");
        }
        Command::Actions { id } => {
            let defs = api
                .action_schema(id)
                .await
                .context("Failed to fetch action schema")?;
            for def in &defs {
                match &def.shortcut {
                    Some(key) => println!("{}  {}  [{key}]", def.name, def.title),
                    None => println!("{}  {}", def.name, def.title),
                }
            }
        }
        Command::Watch { id } => {
            watch_status(api, id).await?;
        }
        Command::Step(step) => match step {
            StepCommand::Show { id } => {
                let step = api.step(id).await.context("Failed to fetch step")?;
                print_json(&step)?;
            }
            StepCommand::Describe { id } => {
                let description = api
                    .describe_step(id)
                    .await
                    .context("Failed to describe step")?;
                print_json(&description)?;
            }
        },
    }

    Ok(())
}

/// Print each pushed status snapshot until Ctrl-C.
async fn watch_status(api: &WorldApi, id: i64) -> Result<()> {
    let mut watch = api
        .watch_status(id)
        .context("Failed to open status watch")?;
    eprintln!("watching world {id} (Ctrl-C to stop)");

    loop {
        tokio::select! {
            changed = watch.changed() => {
                if !changed {
                    break;
                }
                if let Some(status) = watch.latest() {
                    print_json(&status)?;
                }
            }
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to listen for ctrl-c")?;
                break;
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = worlds_settings::load_settings().unwrap_or_default();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();

    let base_url = cli
        .base_url
        .clone()
        .unwrap_or_else(|| settings.api_base_url.clone());
    let api = WorldApi::new(ApiClient::new(base_url));

    run(cli, &api).await
}
