/*
 * Responsibility
 * - GET /health (疎通用, 認証なし)
 * - 起動中のスキーム構成を返す (HandlerNotRegistered の切り分け用)
 */
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let dispatcher = &state.dispatcher;

    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "default_scheme": dispatcher.config().default_scheme(),
            "forward_scheme": dispatcher.config().forward_scheme(),
            "schemes": dispatcher.registry().schemes(),
        })),
    )
}
