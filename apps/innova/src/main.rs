//! # Innova - Portfolio Maturity Server
//!
//! The main binary for the Innova assessment engine.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for portfolio operations
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 apps/innova (THE BINARY)                │
//! │                                                         │
//! │        ┌─────────────┐        ┌─────────────┐          │
//! │        │   CLI       │        │   HTTP API  │          │
//! │        │  (clap)     │        │   (axum)    │          │
//! │        └──────┬──────┘        └──────┬──────┘          │
//! │               │                      │                  │
//! │               └──────────┬───────────┘                  │
//! │                          ▼                              │
//! │                  ┌───────────────┐                      │
//! │                  │  innova-core  │                      │
//! │                  │  (THE LOGIC)  │                      │
//! │                  └───────────────┘                      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! innova server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! innova projects --create "Solar membrane"
//! innova import --project 1 -f responses.json
//! innova score --project 1
//! ```

use clap::Parser;
use innova::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — INNOVA_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("INNOVA_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "innova=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Innova startup banner.
fn print_banner() {
    println!(
        r#"
  ██╗███╗   ██╗███╗   ██╗ ██████╗ ██╗   ██╗ █████╗
  ██║████╗  ██║████╗  ██║██╔═══██╗██║   ██║██╔══██╗
  ██║██╔██╗ ██║██╔██╗ ██║██║   ██║██║   ██║███████║
  ██║██║╚██╗██║██║╚██╗██║██║   ██║╚██╗ ██╔╝██╔══██║
  ██║██║ ╚████║██║ ╚████║╚██████╔╝ ╚████╔╝ ██║  ██║
  ╚═╝╚═╝  ╚═══╝╚═╝  ╚═══╝ ╚═════╝   ╚═══╝  ╚═╝  ╚═╝

  Portfolio Maturity Server v{}

  Cumulative • Evidence-gated • Deterministic
"#,
        env!("CARGO_PKG_VERSION")
    );
}
