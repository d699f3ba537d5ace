/*
 * Responsibility
 * - Config読み込み → tracing 初期化 → dispatcher 生成 → Router 組み立て
 * - Middleware の適用 (HTTP レイヤー / 認証ディスパッチ)
 * - axum::serve() で起動
 */
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use tracing_subscriber::EnvFilter;

use crate::{
    api,
    config::{AppEnv, Config},
    middleware,
    services::auth::build_dispatcher,
    state::AppState,
};

pub async fn run() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.app_env);

    let dispatcher = build_dispatcher(&config.auth)?;
    let state = AppState::new(dispatcher);

    let app = build_router(state, config.request_timeout);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, env = ?config.app_env, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    middleware::http::apply(router, request_timeout)
}

fn init_tracing(app_env: AppEnv) {
    let default_filter = if app_env.is_production() {
        "info"
    } else {
        "scheme_forwarder=debug,tower_http=debug,info"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutting down");
}
