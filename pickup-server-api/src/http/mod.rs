use std::{str::FromStr, sync::Arc};

use axum::{
    Json, Router,
    routing::{delete, get, post},
};
use log::info;
use pickup_server_app::Application;
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::{ServiceError, jwt::JwtKeys};

mod admin;
mod auth;
mod games;
mod notifications;
mod participants;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<Application>,
    pub jwt: Arc<JwtKeys>,
}

pub fn router(state: AppState) -> Router {
    let api: Router<AppState> = Router::new()
        .route("/health", get(health))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/games", post(games::create_game).get(games::list_games))
        .route(
            "/games/{id}",
            get(games::get_game).delete(games::delete_game),
        )
        .route(
            "/games/{id}/participants",
            get(participants::list_participants),
        )
        .route("/my-games", get(games::list_my_games))
        .route("/my-games/joined", get(games::list_joined_games))
        .route("/participants", post(participants::join_game))
        .route("/participants/withdraw", post(participants::withdraw))
        .route("/participants/{id}", delete(participants::remove))
        .route("/participants/{id}/approve", post(participants::approve))
        .route("/participants/{id}/decline", post(participants::decline))
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/count", get(notifications::count_unread))
        .route("/notifications/{id}/read", post(notifications::mark_read))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/{id}", delete(admin::remove_user));

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(
    app: Arc<Application>,
    jwt: Arc<JwtKeys>,
    host: &str,
    port: u16,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;

    info!("API server listening on {}:{}", host, port);
    axum::serve(listener, router(AppState { app, jwt }))
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("HTTP API shut down gracefully");
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

#[derive(Serialize)]
pub struct JsonMessage {
    pub message: &'static str,
}

impl JsonMessage {
    pub fn new(message: &'static str) -> Json<Self> {
        Json(Self { message })
    }
}

/// Malformed ids can never match a stored record, so they are reported as not found.
fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, ServiceError> {
    raw.parse()
        .map_err(|_| ServiceError::NotFound(format!("{} not found", what)))
}
