//! Authorization ヘッダー → スキーム選択 → ハンドラー実行 → AuthCtx を extensions に入れる
//!
//! - ヘッダーなしは「資格情報なし」として dispatcher に渡す (エラーではない)
//! - Rejected は 401 (WWW-Authenticate 付き)
//! - ハンドラー未登録は設定ミスなので 500 で返し、フォールバックしない

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::{AuthenticateResult, Credential};
use crate::state::AppState;

/// 認証が必要なルートに middleware を適用する。
///
/// 例：
/// ```ignore
/// let protected = Router::new().route("/whoami", get(whoami));
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let dispatcher = &state.dispatcher;

    let credential = Credential::from_headers(req.headers())?;

    let dispatched = dispatcher.dispatch(credential.as_ref()).await?;

    let principal = match dispatched.outcome {
        AuthenticateResult::Accepted(principal) => principal,
        AuthenticateResult::Rejected(reason) => {
            tracing::debug!(reason = %reason, "request not authenticated");
            let challenge = dispatched
                .scheme
                .unwrap_or_else(|| dispatcher.config().default_scheme().to_string());
            return Err(AppError::unauthorized(challenge));
        }
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::new(principal));

    Ok(next.run(req).await)
}
