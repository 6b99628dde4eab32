use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};

use nonna_notify::config;
use nonna_notify::db;
use nonna_notify::routes;
use nonna_notify::services::{NotificationDispatcher, PgNotificationStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = config::Config::from_env().map_err(|e| {
        log::error!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!(
        "Starting notification service on {}:{}",
        config.host,
        config.port
    );

    let db_pool = db::init(&config.database).await.map_err(|e| {
        log::error!("{}", e);
        std::io::Error::other(e.to_string())
    })?;

    let store = Arc::new(PgNotificationStore::new(db_pool.clone()));
    let dispatcher = NotificationDispatcher::from_config(&config, store).map_err(|e| {
        log::error!("Failed to create push provider client: {}", e);
        std::io::Error::other(e.to_string())
    })?;
    let dispatcher = web::Data::new(dispatcher);

    let host = config.host.clone();
    let port = config.port;

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(dispatcher.clone())
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::health::configure)
            .configure(routes::notifications::configure)
    })
    .bind((host.as_str(), port))?
    .shutdown_timeout(30)
    .run();

    let server_handle = server.handle();
    tokio::spawn(async move {
        shutdown_signal().await;
        log::info!("Shutdown signal received, stopping server...");
        server_handle.stop(true).await;
    });

    server.await
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to install Ctrl+C handler: {}", e);
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
                log::error!("Failed to install SIGTERM handler: {}", e);
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
}
