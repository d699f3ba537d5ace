/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - dispatcher: 認証スキームのディスパッチャー (設定 + ハンドラー登録)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use crate::services::auth::SchemeDispatcher;

#[derive(Clone, Debug)]
pub struct AppState {
    pub dispatcher: SchemeDispatcher,
}

impl AppState {
    pub fn new(dispatcher: SchemeDispatcher) -> Self {
        Self { dispatcher }
    }
}
