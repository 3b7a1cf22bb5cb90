use std::sync::Arc;

use log::{error, info};
use pickup_persistence_sqlite::{
    SqliteGameRepository, SqliteNotificationRepository, SqliteUserRepository, create_db_pool,
    init_schema,
};
use pickup_server_api::jwt::JwtKeys;
use pickup_server_app::{
    ApplicationConfig, build_application, ports::credentials::BcryptPasswordHasher,
};

use crate::{config::ServerConfig, logs::init_logger};

mod config;
mod logs;

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Preparing graceful exit...");
}

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("No .env file loaded: {}", e);
    }

    init_logger();

    let config = ServerConfig::from_env().expect("Invalid configuration");

    let pool = create_db_pool(&config.db_path)
        .await
        .expect("Failed to open database");
    init_schema(&pool)
        .await
        .expect("Failed to initialize database schema");

    let user_repo = Arc::new(SqliteUserRepository::new(pool.clone()));
    let game_repo = Arc::new(SqliteGameRepository::new(pool.clone()));
    let notification_repo = Arc::new(SqliteNotificationRepository::new(pool.clone()));
    let password_hasher = Arc::new(BcryptPasswordHasher::new());

    let app = Arc::new(build_application(
        ApplicationConfig {
            admin_email: config.admin_email.clone(),
            capacity_policy: config.capacity_policy,
        },
        user_repo,
        game_repo.clone(),
        game_repo,
        notification_repo,
        password_hasher,
    ));

    let jwt = Arc::new(JwtKeys::from_secret_or_random(
        config.jwt_secret.clone(),
        chrono::Duration::hours(config.token_ttl_hours),
    ));

    info!(
        "Starting application with {:?} capacity policy",
        config.capacity_policy
    );

    let http_app = tokio::spawn(async move {
        pickup_server_api::run(
            app,
            jwt,
            &config.host,
            config.http_port,
            shutdown_signal(),
        )
        .await
    });

    match http_app.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("HTTP API failed: {}", e),
        Err(e) => error!("HTTP API task failed: {}", e),
    }

    pool.close().await;
    info!("Database connections closed");
}
