/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: 認証スキームのディスパッチ, http: 横断的な HTTP レイヤー
 */
pub mod auth;
pub mod http;
