/*
 * Responsibility
 * - GET /whoami (認証済みの主体を返す)
 * - dispatcher が選んだスキームの確認用
 */
use axum::Json;

use crate::api::v1::{dto::whoami::WhoamiResponse, extractors::AuthCtxExtractor};

pub async fn whoami(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<WhoamiResponse> {
    tracing::debug!(scheme = %ctx.scheme(), "whoami");
    Json(WhoamiResponse::from(ctx))
}
