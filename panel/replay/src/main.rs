//! Chat Panel Replay - Render Recorded Agent Transcripts
//!
//! Feeds a recorded transcript through the chat panel core exactly as a live
//! transport would, then prints what the panel would display. Useful for
//! checking how odd agent payloads classify without a running agent.
//!
//! # Usage
//!
//! ```bash
//! # Render a transcript as text
//! chat-panel-replay session.jsonl
//!
//! # Show function call/response bodies too
//! chat-panel-replay session.jsonl --expand-all
//!
//! # Machine-readable output
//! chat-panel-replay session.jsonl --json
//!
//! # With config file and verbose logging
//! RUST_LOG=debug chat-panel-replay session.jsonl --config ./panel.toml
//! ```

mod transcript;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use chat_panel_core::config::{load_config, load_config_from_path, ConfigOverrides, PanelConfig};
use chat_panel_core::panel::{resolve_client_id, PanelEntry};
use chat_panel_core::{AgentInfo, ChatPanel, FileStore, InProcessTransport};

/// Chat Panel Replay - render a recorded agent transcript
#[derive(Parser, Debug)]
#[command(name = "chat-panel-replay")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Transcript file (JSON Lines)
    #[arg(value_name = "TRANSCRIPT")]
    transcript: PathBuf,

    /// Configuration file path
    #[arg(short = 'c', long, env = "CHAT_PANEL_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Client id to use when the cached profile has none
    #[arg(long, value_name = "ID")]
    client_id: Option<String>,

    /// Agent name shown in the panel title
    #[arg(long, default_value = "Replay Agent")]
    agent_name: String,

    /// Expand every collapsible card
    #[arg(short = 'e', long)]
    expand_all: bool,

    /// Print rendered entries as JSON
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "CHAT_PANEL_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

/// Initialize logging with the specified level
///
/// Logs go to stderr so rendered output on stdout stays clean.
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "chat_panel_replay={level},chat_panel_core={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

/// Resolve configuration from file, environment and CLI
fn resolve_config(args: &Args) -> Result<PanelConfig> {
    let mut config = match &args.config {
        Some(path) => load_config_from_path(Some(path.clone()))
            .with_context(|| format!("Failed to load config: {path:?}"))?,
        None => load_config().context("Failed to load config")?,
    };

    let mut overrides = ConfigOverrides::new();
    if let Some(client_id) = &args.client_id {
        overrides = overrides.with_default_client_id(client_id.clone());
    }
    overrides.apply(&mut config);
    config
        .validate()
        .context("Invalid configuration after command-line overrides")?;

    info!(source = %config.source(), "Configuration resolved");
    Ok(config)
}

/// Client id from the cached profile, falling back to the configured default
fn client_id(config: &PanelConfig) -> String {
    let Some(path) = &config.store_path else {
        return config.default_client_id.clone();
    };
    match FileStore::open(path) {
        Ok(store) => resolve_client_id(&store, &config.default_client_id),
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable preferences");
            config.default_client_id.clone()
        }
    }
}

/// Format one entry for the terminal
fn format_entry(entry: &PanelEntry) -> String {
    let collapsible = entry.text.kind().is_some_and(|kind| kind.is_collapsible());
    let header = match entry.text.title() {
        Some(title) => format!("[{}] {title}", entry.author),
        None => format!("[{}]", entry.author),
    };

    if collapsible && !entry.expanded {
        format!("{header} (collapsed)")
    } else {
        format!("{header}\n{}", entry.text.body())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let config = resolve_config(&args)?;
    let events = transcript::load(&args.transcript)?;
    debug!(events = events.len(), "Loaded transcript");

    let (transport, peer) = InProcessTransport::new_pair_with_capacity(config.channel_capacity);
    let agent = AgentInfo {
        id: "replay".to_string(),
        name: args.agent_name.clone(),
        model: "recorded".to_string(),
    };
    let mut panel = ChatPanel::new(agent, transport, client_id(&config));
    panel.open();

    for event in events {
        peer.deliver(event)
            .await
            .context("Transport closed during replay")?;
        panel.poll_transport();
    }

    if args.expand_all {
        let collapsible: Vec<_> = panel
            .render()
            .into_iter()
            .filter(|entry| entry.text.kind().is_some_and(|kind| kind.is_collapsible()))
            .map(|entry| entry.id)
            .collect();
        for id in &collapsible {
            panel.toggle_expansion(id);
        }
    }

    let entries = panel.render();
    info!(
        external_id = %panel.external_id().0,
        client_id = panel.client_id(),
        entries = entries.len(),
        "Replay complete"
    );

    if args.json {
        let output =
            serde_json::to_string_pretty(&entries).context("Failed to serialize entries")?;
        println!("{output}");
    } else {
        println!("{}", panel.title());
        for entry in &entries {
            println!("\n{}", format_entry(entry));
        }
        if panel.is_sending() {
            println!("\n(agent turn still in progress)");
        }
    }

    Ok(())
}
