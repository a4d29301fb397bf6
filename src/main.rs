//! RecessionAlert chat widget, hosted in a terminal
//!
//! Type a message to chat, or a `/command` (see `/help`). Logs go to stderr
//! as JSON so they do not interleave with the transcript.

use ra_chat::terminal::{spawn_stdin_reader, CommandInput, TerminalRenderer};
use ra_chat::{ChatWidget, Database, KeywordResponder, WidgetConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ra_chat=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Configuration
    let config = WidgetConfig::from_env();
    let db_path = std::env::var("RA_CHAT_DB_PATH").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        format!("{home}/.ra-chat/widget.db")
    });

    // Ensure database directory exists
    if let Some(parent) = PathBuf::from(&db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(path = %db_path, origin = %config.origin, "Opening flag database");
    let db = Database::open(&db_path)?;

    let renderer = TerminalRenderer::stdout(config.container_id.clone());
    let mut widget = ChatWidget::new(renderer, db, KeywordResponder);
    widget.init(config);

    let Some(handle) = widget.handle() else {
        return Err("chat widget failed to start".into());
    };

    let input = handle.attach_input(CommandInput::new(spawn_stdin_reader(), handle.clone()));
    tokio::select! {
        _ = input => {}
        _ = tokio::signal::ctrl_c() => tracing::info!("Interrupted"),
    }

    widget.shutdown().await;
    Ok(())
}
