//! File chat server binary
//!
//! Run with: cargo run -p file-chat --bin file-chat-server -- --config file-chat.toml

use clap::Parser;
use file_chat::{config::ChatConfig, server::FileChatServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "file-chat-server")]
#[command(about = "Ask questions about an uploaded file", version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "FILE_CHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "file_chat=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                         File Chat                         ║
║          Ask questions about PDF, TXT, DOCX, CSV          ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration
    let mut config = ChatConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Gemini model: {}", config.gemini.model);
    tracing::info!("  - Local model: {} at {}", config.local_model.model, config.local_model.base_url);
    tracing::info!("  - Summarize above: {} characters", config.summarizer.threshold_chars);
    tracing::info!("  - Translate to: {}", config.translator.target_language);

    let server = FileChatServer::new(config)?;

    // Check backends; ready once at least one can answer
    let report = server.state().handler().backends().health().await;
    for (choice, healthy) in &report {
        if *healthy {
            tracing::info!("{} is reachable", choice.display_name());
        } else {
            tracing::warn!("{} is not reachable", choice.display_name());
        }
    }
    server.state().set_ready(report.iter().any(|(_, healthy)| *healthy));

    println!("\nServer starting...");
    println!("  Page: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
