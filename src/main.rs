use std::sync::Arc;

use axum::http::{header, Method};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use penfolio::config::Config;
use penfolio::handlers;
use penfolio::inventory::FirebaseInventory;
use penfolio::sheets::SheetsLog;
use penfolio::staging::MemoryStaging;
use penfolio::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "penfolio")]
#[command(about = "Backend for the pen customization shop")]
struct Cli {
    /// Load environment from this file instead of .env
    #[arg(long)]
    env_file: Option<String>,

    /// Override the listen port from the environment
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Some(ref path) = cli.env_file {
        dotenvy::from_path(path).expect("Failed to load env file");
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "penfolio=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let mut config = Config::from_env();
    if let Some(port) = cli.port {
        config.port = port;
    }

    if config.dev_mode {
        tracing::info!("Running in DEVELOPMENT mode");
    }

    let sheets_log = SheetsLog::new(&config).expect("Failed to initialize Sheets client");

    let state = AppState {
        staging: Arc::new(MemoryStaging::new()),
        inventory: Arc::new(FirebaseInventory::new(&config)),
        log: Arc::new(sheets_log),
    };

    // The storefront is served from a different origin, so every response
    // carries permissive CORS headers and preflights are answered directly.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let app = handlers::router()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Penfolio server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
