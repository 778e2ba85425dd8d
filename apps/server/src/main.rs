//! # Pantry Server Binary
//!
//! ## Usage
//! ```bash
//! pantry-server
//! pantry-server --config ./pantry.toml
//! RUST_LOG=debug GEMINI_API_KEY=... pantry-server
//! ```

use std::env;
use std::path::PathBuf;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pantry_db::{Database, DbConfig};
use pantry_server::{router_with_static, AppState, PantryConfig};

fn config_path_from_args() -> Option<PathBuf> {
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    return Some(PathBuf::from(&args[i + 1]));
                }
            }
            "--help" | "-h" => {
                println!("Pantry Server");
                println!();
                println!("Usage: pantry-server [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>    Config file (default: PANTRY_CONFIG or platform config dir)");
                println!("  -h, --help             Show this help message");
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }
    None
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    info!("Starting Pantry server...");

    let config = PantryConfig::load(config_path_from_args())?;
    info!(
        addr = %config.server.bind_address(),
        db = %config.database.path.display(),
        "Configuration loaded"
    );

    let db = Database::new(
        DbConfig::new(&config.database.path).max_connections(config.database.max_connections),
    )
    .await?;

    let state = AppState::from_config(db.clone(), &config);
    if state.assistant.is_none() {
        warn!("GEMINI_API_KEY not set, AI endpoints will return 503");
    }
    if state.recipe_source.is_none() {
        warn!("SPOONACULAR_API_KEY not set, recipe database endpoints will return 503");
    }

    let app = router_with_static(state, config.server.static_dir.as_deref());

    let bind_addr = config.server.bind_address();
    let listener = TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
