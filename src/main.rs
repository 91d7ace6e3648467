use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use kitchen_cms::{
    config::AppConfig,
    db::connection,
    logging::init_tracing,
    mailer::Mailer,
    middleware::{catch_panic_layer, json_error_middleware},
    ratelimit::build_rate_limiter,
    routes::router,
    services::ServiceContext,
    state::AppState,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env().context("failed to load config")?;
    init_tracing(&cfg.logging);

    let db_cfg = cfg
        .database
        .clone()
        .context("database.url is required to run the server (APP_DATABASE__URL)")?;
    let auth_cfg = cfg
        .auth
        .clone()
        .context("auth config is required to run the server (APP_AUTH__*)")?;

    let db = connection::connect(&db_cfg).await?;
    let rate_limiter = build_rate_limiter(cfg.rate_limit.as_ref());
    let mailer = Mailer::new(cfg.email.clone());

    let state = AppState::new(cfg, db, rate_limiter, mailer);

    let sessions = ServiceContext::from_state(&state)
        .session(&state.session_keys, state.config.session_ttl_hours());
    sessions.bootstrap_admin(&auth_cfg).await?;
    match sessions.purge_expired().await {
        Ok(purged) if purged > 0 => tracing::info!(purged, "expired sessions removed"),
        Ok(_) => {}
        Err(err) => tracing::warn!(error = %err, "could not purge expired sessions"),
    }

    let app = Router::new()
        .merge(router(Arc::clone(&state)))
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", state.config.general.host, state.config.general.port)
        .parse()
        .context("invalid host/port")?;
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped, closing database pool");
    state.db.clone().close().await?;
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
