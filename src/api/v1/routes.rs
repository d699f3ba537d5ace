/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は認証なし, /whoami は認証 middleware (スキームディスパッチ) を通す
 */
use axum::{Router, routing::get};

use crate::middleware;
use crate::state::AppState;

use crate::api::v1::handlers::{health::health, whoami::whoami};

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new().route("/whoami", get(whoami));
    let protected = middleware::auth::access::apply(protected, state);

    Router::new()
        .route("/health", get(health))
        .merge(protected)
}
