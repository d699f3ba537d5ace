//! Credential extracted from the `Authorization` header.
//!
//! Responsibility:
//! - Split the header value into a scheme label and a token
//! - Classify the token shape (structured / reference)
//! - Represent "no header" as `None`, never as an empty token

use std::fmt;

use axum::http::{HeaderMap, header};
use thiserror::Error;

const BEARER: &str = "Bearer";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("authorization header is not visible ascii")]
    InvalidEncoding,
    #[error("authorization header has no scheme label")]
    MissingLabel,
    #[error("authorization header has no token")]
    MissingToken,
}

/// Shape of a token string.
///
/// - `Structured`: three non-empty dot-separated segments (JWS compact form)
/// - `Reference`: anything else; only an issuer can tell what it means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenShape {
    Structured,
    Reference,
}

impl TokenShape {
    pub fn of(token: &str) -> Self {
        let segments: Vec<&str> = token.split('.').collect();

        if segments.len() == 3 && segments.iter().all(|s| !s.is_empty()) {
            Self::Structured
        } else {
            Self::Reference
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structured => "structured-token",
            Self::Reference => "reference-token",
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    label: String,
    token: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the token itself
        f.debug_struct("Credential")
            .field("label", &self.label)
            .field("shape", &self.shape())
            .finish()
    }
}

impl Credential {
    pub fn new(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            token: token.into(),
        }
    }

    /// Shorthand for `Credential::new("Bearer", token)`.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::new(BEARER, token)
    }

    /// Parse `<label> <token>`.
    pub fn parse(value: &str) -> Result<Self, CredentialError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(CredentialError::MissingLabel);
        }

        let (label, token) = value
            .split_once(char::is_whitespace)
            .ok_or(CredentialError::MissingToken)?;

        let token = token.trim();
        if token.is_empty() {
            return Err(CredentialError::MissingToken);
        }

        Ok(Self::new(label, token))
    }

    /// `Ok(None)` when the request carries no `Authorization` header at all.
    pub fn from_headers(headers: &HeaderMap) -> Result<Option<Self>, CredentialError> {
        let Some(value) = headers.get(header::AUTHORIZATION) else {
            return Ok(None);
        };

        let value = value
            .to_str()
            .map_err(|_| CredentialError::InvalidEncoding)?;

        Self::parse(value).map(Some)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn shape(&self) -> TokenShape {
        TokenShape::of(&self.token)
    }

    /// Header scheme labels are case-insensitive (RFC 7235).
    pub fn is_bearer(&self) -> bool {
        self.label.eq_ignore_ascii_case(BEARER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn three_segments_are_structured() {
        assert_eq!(
            TokenShape::of("header.payload.signature"),
            TokenShape::Structured
        );
    }

    #[test]
    fn everything_else_is_reference() {
        for token in ["reference", "a.b", "a.b.c.d.e", "a..c", ".b.c", "a.b."] {
            assert_eq!(TokenShape::of(token), TokenShape::Reference, "{token}");
        }
    }

    #[test]
    fn parse_splits_label_and_token() {
        let credential = Credential::parse("Bearer header.payload.signature").unwrap();
        assert_eq!(credential.label(), "Bearer");
        assert_eq!(credential.token(), "header.payload.signature");
        assert_eq!(credential.shape(), TokenShape::Structured);
        assert!(credential.is_bearer());
    }

    #[test]
    fn parse_keeps_custom_labels() {
        let credential = Credential::parse("known   token ").unwrap();
        assert_eq!(credential.label(), "known");
        assert_eq!(credential.token(), "token");
        assert!(!credential.is_bearer());
    }

    #[test]
    fn bearer_label_is_case_insensitive() {
        assert!(Credential::parse("bearer abc").unwrap().is_bearer());
        assert!(Credential::parse("BEARER abc").unwrap().is_bearer());
    }

    #[test]
    fn parse_rejects_malformed_values() {
        assert_eq!(Credential::parse(""), Err(CredentialError::MissingLabel));
        assert_eq!(Credential::parse("Bearer"), Err(CredentialError::MissingToken));
        assert_eq!(Credential::parse("Bearer   "), Err(CredentialError::MissingToken));
    }

    #[test]
    fn missing_header_is_none() {
        let headers = HeaderMap::new();
        assert_eq!(Credential::from_headers(&headers), Ok(None));
    }

    #[test]
    fn header_is_parsed() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer reference"));

        let credential = Credential::from_headers(&headers).unwrap().unwrap();
        assert_eq!(credential, Credential::bearer("reference"));
        assert_eq!(credential.shape(), TokenShape::Reference);
    }

    #[test]
    fn non_ascii_header_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap(),
        );
        assert_eq!(
            Credential::from_headers(&headers),
            Err(CredentialError::InvalidEncoding)
        );
    }

    #[test]
    fn debug_hides_token() {
        let rendered = format!("{:?}", Credential::bearer("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }
}
