// api/mod.rs - HTTP transport: a thin axum adapter in front of the dispatcher

pub mod response;

use std::sync::Arc;

use anyhow::Context as _;
use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::handlers::MethodReply;
use crate::method::{Context, Dispatcher};
use crate::store::{MemoryStore, Store};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Shared per-process state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, store: Arc<dyn Store>) -> Self {
        Self { dispatcher: Arc::new(dispatcher), store }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/method", post(method_post))
        .route("/method/", post(method_post))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the standard store and dispatcher from config and serve until Ctrl-C
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let store = MemoryStore::from_config(&config.store).context("failed to initialise store")?;
    let state = AppState::new(Dispatcher::standard(config.auth.clone()), Arc::new(store));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Starting server at {}", bind_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string())
}

/// POST /method - parse the body and run it through the dispatcher
async fn method_post(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let request_id = request_id(&headers);
    tracing::info!("/method: {} {}", String::from_utf8_lossy(&body), request_id);

    let (reply, mut ctx) = match serde_json::from_slice::<Value>(&body) {
        Ok(parsed) => run_dispatch(&state, parsed, request_id).await,
        Err(e) => {
            tracing::debug!("Unparseable body: {}", e);
            (MethodReply::from(ApiError::BadRequest), Context::new(request_id))
        }
    };

    ctx.merge(&reply.to_json());
    tracing::info!("{}", ctx.to_value());

    reply.into_response()
}

// Store calls may block, so the synchronous dispatcher runs off the async workers
async fn run_dispatch(state: &AppState, body: Value, request_id: String) -> (MethodReply, Context) {
    let dispatcher = Arc::clone(&state.dispatcher);
    let store = Arc::clone(&state.store);
    let fallback_id = request_id.clone();

    let joined = tokio::task::spawn_blocking(move || {
        let mut ctx = Context::new(request_id);
        let reply = dispatcher.respond(body, &mut ctx, store.as_ref());
        (reply, ctx)
    })
    .await;

    joined.unwrap_or_else(|e| {
        tracing::error!("Unexpected error: {}", e);
        (MethodReply::from(ApiError::Internal), Context::new(fallback_id))
    })
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "methods": state.dispatcher.handlers().methods(),
    }))
}

async fn not_found() -> ApiError {
    ApiError::not_found()
}
