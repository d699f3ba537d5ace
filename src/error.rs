/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - 認証ディスパッチのエラーを統一的に変換
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::{CredentialError, DispatchError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// `challenge` becomes the `WWW-Authenticate` value.
    #[error("unauthorized")]
    Unauthorized { challenge: String },
    /// Setup defect: the selected scheme has no handler.
    #[error("{message}")]
    HandlerNotRegistered { scheme: String, message: String },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn unauthorized(challenge: impl Into<String>) -> Self {
        Self::Unauthorized {
            challenge: challenge.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, challenge) = match self {
            AppError::Unauthorized { challenge } => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "unauthorized".to_string(),
                Some(challenge),
            ),
            AppError::HandlerNotRegistered { message, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "HANDLER_NOT_REGISTERED",
                message,
                None,
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                "internal server error".into(),
                None,
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        let mut response = (status, Json(body)).into_response();

        if let Some(value) = challenge.and_then(|c| HeaderValue::from_str(&c).ok()) {
            response.headers_mut().insert(header::WWW_AUTHENTICATE, value);
        }

        response
    }
}

impl From<DispatchError> for AppError {
    fn from(e: DispatchError) -> Self {
        match e {
            DispatchError::HandlerNotRegistered { scheme, .. } => {
                // The dispatcher already logged the registered schemes; keep them out of the body
                AppError::HandlerNotRegistered {
                    message: format!(
                        "No authentication handler is registered for the scheme '{scheme}'."
                    ),
                    scheme,
                }
            }
            DispatchError::Handler { scheme, source } => {
                tracing::error!(scheme = %scheme, error = ?source, "authentication handler failed");
                AppError::Internal
            }
        }
    }
}

impl From<CredentialError> for AppError {
    fn from(e: CredentialError) -> Self {
        tracing::debug!(error = %e, "malformed authorization header");
        AppError::unauthorized("Bearer")
    }
}
