/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が dispatcher の結果を request extensions に格納し、handler はこの型だけを受け取る
 */

use crate::services::auth::Principal;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `principal` はハンドラーが受け入れた主体 (匿名の場合 subject なし)
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub principal: Principal,
}

impl AuthCtx {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn scheme(&self) -> &str {
        &self.principal.scheme
    }
}
