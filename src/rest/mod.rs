// rest/mod.rs — Public REST API server.
//
// Axum HTTP server exposing the todo CRUD surface.
//
// Endpoints:
//   GET    /            (liveness, plain text)
//   GET    /todos
//   POST   /add-todo
//   DELETE /todo/{id}
//   PUT    /todo/{id}
//   PATCH  /done/{id}

pub mod routes;

use anyhow::Result;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::AppContext;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("todo API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    let cors = cors_layer(&ctx.config.allowed_origins);

    Router::new()
        // Liveness check (plain text, no state)
        .route("/", get(routes::todos::root))
        // Todos
        .route("/todos", get(routes::todos::list_todos))
        .route("/add-todo", post(routes::todos::add_todo))
        .route(
            "/todo/{id}",
            axum::routing::delete(routes::todos::delete_todo).put(routes::todos::update_todo),
        )
        .route("/done/{id}", patch(routes::todos::mark_done))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// CORS layer for the configured origin allow-list.
///
/// Preflight OPTIONS requests are answered by the layer itself and never
/// reach a handler. Origins that fail to parse as header values are skipped
/// with a warning rather than aborting startup.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
