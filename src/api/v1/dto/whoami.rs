use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::v1::extractors::AuthCtx;

#[derive(Debug, Serialize)]
pub struct WhoamiResponse {
    pub scheme: String,
    pub subject: Option<String>,
    pub anonymous: bool,
    pub authenticated_at: DateTime<Utc>,
}

impl From<AuthCtx> for WhoamiResponse {
    fn from(ctx: AuthCtx) -> Self {
        let principal = ctx.principal;
        Self {
            anonymous: principal.is_anonymous(),
            scheme: principal.scheme,
            subject: principal.subject,
            authenticated_at: principal.authenticated_at,
        }
    }
}
