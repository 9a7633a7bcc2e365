//! HTTP surface of the movie notes service.
//!
//! Routes map one-to-one onto core use cases; each handler runs a single
//! storage job and turns its outcome into a JSON response.

use std::time::Duration;

use anyhow::Context;
use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{delete, get, post, put},
    Router,
};
use log::{error, info};
use movienotes_core::db::open_db;
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use config::Settings;
use routes::{
    add_tag_handler, create_movie_handler, delete_movie_handler, delete_tag_handler,
    fallback_handler, health_handler, list_movies_handler, list_tags_handler,
    register_user_handler, update_movie_handler,
};
use state::AppState;

/// Builds the router with every endpoint bound to `state`.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health_handler))
        .route("/users", post(register_user_handler))
        .route("/movies", post(create_movie_handler).get(list_movies_handler))
        .route("/movies/:id", put(update_movie_handler).delete(delete_movie_handler))
        .route("/movies/:id/tags", get(list_tags_handler).post(add_tag_handler))
        .route("/movies/:id/tags/:tag_id", delete(delete_tag_handler))
        .fallback(fallback_handler)
        .layer(cors)
        .with_state(state)
}

/// Opens storage, binds the configured address and serves until shutdown.
pub async fn start_server(settings: Settings) -> anyhow::Result<()> {
    info!("event=server_init module=api status=start db_path={}", settings.database.path);
    let conn = open_db(&settings.database.path)
        .with_context(|| format!("failed to open database `{}`", settings.database.path))?;
    let state = AppState::new(conn);

    let address = settings.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("event=server_listen module=api status=ok address={address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("event=server_stop module=api status=ok");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("event=shutdown_signal module=api status=ok signal=ctrl_c"),
            Err(err) => {
                error!("event=shutdown_signal module=api status=error signal=ctrl_c error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("event=shutdown_signal module=api status=ok signal=terminate");
            }
            Err(err) => {
                error!("event=shutdown_signal module=api status=error signal=terminate error={err}");
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
