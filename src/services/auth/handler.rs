//! Authentication handlers the dispatcher invokes by scheme name.
//!
//! Real validators (JWT signature checks, token introspection) live outside this
//! crate and plug in through [`AuthenticationHandler`]. The two handlers here are
//! enough to run the service and to drive the dispatcher in tests.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::credential::Credential;

/// Authenticated subject attached to the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    /// `None` for anonymous access.
    pub subject: Option<String>,
    /// Scheme whose handler accepted the request.
    pub scheme: String,
    pub authenticated_at: DateTime<Utc>,
}

impl Principal {
    pub fn new(scheme: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            scheme: scheme.into(),
            authenticated_at: Utc::now(),
        }
    }

    pub fn anonymous(scheme: impl Into<String>) -> Self {
        Self {
            subject: None,
            scheme: scheme.into(),
            authenticated_at: Utc::now(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.subject.is_none()
    }
}

/// Outcome of a handler run. A rejection is a normal result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticateResult {
    Accepted(Principal),
    Rejected(String),
}

impl AuthenticateResult {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Validates the credential of one request.
///
/// `Err` means the handler itself failed (e.g. its backend is down) and is
/// reported separately from a rejection.
#[async_trait]
pub trait AuthenticationHandler: Send + Sync {
    async fn authenticate(
        &self,
        scheme: &str,
        credential: Option<&Credential>,
    ) -> anyhow::Result<AuthenticateResult>;
}

/// Accepts every request. Without a credential the principal is anonymous,
/// otherwise the subject names the token shape; token material never leaves
/// the handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughHandler;

#[async_trait]
impl AuthenticationHandler for PassThroughHandler {
    async fn authenticate(
        &self,
        scheme: &str,
        credential: Option<&Credential>,
    ) -> anyhow::Result<AuthenticateResult> {
        let principal = match credential {
            Some(credential) => Principal::new(scheme, credential.shape().as_str()),
            None => Principal::anonymous(scheme),
        };

        Ok(AuthenticateResult::Accepted(principal))
    }
}

/// Accepts a fixed set of tokens, each mapped to a subject.
#[derive(Clone, Default)]
pub struct StaticTokenHandler {
    tokens: HashMap<String, String>,
    allow_anonymous: bool,
}

impl fmt::Debug for StaticTokenHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print token material
        f.debug_struct("StaticTokenHandler")
            .field("tokens", &self.tokens.len())
            .field("allow_anonymous", &self.allow_anonymous)
            .finish()
    }
}

impl StaticTokenHandler {
    pub fn new<I, T, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = (T, S)>,
        T: Into<String>,
        S: Into<String>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|(token, subject)| (token.into(), subject.into()))
                .collect(),
            allow_anonymous: false,
        }
    }

    pub fn allow_anonymous(mut self, allow: bool) -> Self {
        self.allow_anonymous = allow;
        self
    }
}

#[async_trait]
impl AuthenticationHandler for StaticTokenHandler {
    async fn authenticate(
        &self,
        scheme: &str,
        credential: Option<&Credential>,
    ) -> anyhow::Result<AuthenticateResult> {
        let Some(credential) = credential else {
            return Ok(if self.allow_anonymous {
                AuthenticateResult::Accepted(Principal::anonymous(scheme))
            } else {
                AuthenticateResult::rejected("missing token")
            });
        };

        Ok(match self.tokens.get(credential.token()) {
            Some(subject) => AuthenticateResult::Accepted(Principal::new(scheme, subject)),
            None => AuthenticateResult::rejected("invalid token"),
        })
    }
}
