use std::net::SocketAddr;
use std::path::PathBuf;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use clap::Parser;
use curious_ink_shared::relay::PREDICT_PATH;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod error;
mod handlers;
mod predictor;
mod state;

use crate::handlers::{message_handler, ping_handler, predict_handler};
use crate::predictor::{GeminiConfig, GeminiPredictor, DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::state::AppState;

/// Canvas PNGs are sent base64 encoded in the JSON body.
const MAX_REQUEST_BYTES: usize = 16 * 1024 * 1024;

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,
    #[arg(long, env = "PUBLIC_DIR")]
    public_dir: Option<PathBuf>,
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,
    #[arg(long, env = "GEMINI_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,
}

fn build_router(state: AppState, public_dir: PathBuf) -> Router {
    Router::new()
        .route("/message", get(message_handler))
        .route("/ping", get(ping_handler))
        .route(PREDICT_PATH, post(predict_handler))
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if args.api_key.as_deref().map_or(true, str::is_empty) {
        tracing::warn!("GEMINI_API_KEY is not set; predictions will fail");
    }
    let predictor = GeminiPredictor::new(GeminiConfig {
        model: args.model,
        api_base: args.api_base,
        ..GeminiConfig::new(args.api_key)
    });
    let state = AppState::new(predictor);

    let public_dir = args
        .public_dir
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../public"));
    let app = build_router(state, public_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!("Server is listening on http://localhost:{}", args.port);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(%addr, %error, "Failed to bind server");
            std::process::exit(1);
        }
    };
    if let Err(error) = axum::serve(listener, app).await {
        tracing::error!(%error, "Server crashed");
        std::process::exit(1);
    }
}
