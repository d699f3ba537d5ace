//! Scheme selection strategies.
//!
//! A selector looks at the request credential and names the scheme whose handler
//! should run. Returning `None` means no scheme claims the request.

use async_trait::async_trait;

use super::credential::{Credential, TokenShape};

pub const DEFAULT_SCHEME: &str = "Bearer";
pub const DEFAULT_INTROSPECTION_SCHEME: &str = "Introspection";

#[async_trait]
pub trait SchemeSelector: Send + Sync {
    async fn select(&self, credential: Option<&Credential>) -> Option<String>;
}

/// Plain functions and closures work as selectors.
#[async_trait]
impl<F> SchemeSelector for F
where
    F: Fn(Option<&Credential>) -> Option<String> + Send + Sync,
{
    async fn select(&self, credential: Option<&Credential>) -> Option<String> {
        (self)(credential)
    }
}

/// Always selects the same scheme; the credential is not inspected.
#[derive(Debug, Clone)]
pub struct DefaultSchemeSelector {
    scheme: String,
}

impl DefaultSchemeSelector {
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
        }
    }
}

#[async_trait]
impl SchemeSelector for DefaultSchemeSelector {
    async fn select(&self, _credential: Option<&Credential>) -> Option<String> {
        Some(self.scheme.clone())
    }
}

/// Routes Bearer reference tokens to the introspection scheme.
///
/// Structured tokens, other labels and requests without a credential stay on
/// the JWT scheme, which validates them locally.
#[derive(Debug, Clone)]
pub struct JwtOrIntrospectionSelector {
    jwt_scheme: String,
    introspection_scheme: String,
}

impl Default for JwtOrIntrospectionSelector {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEME, DEFAULT_INTROSPECTION_SCHEME)
    }
}

impl JwtOrIntrospectionSelector {
    pub fn new(jwt_scheme: impl Into<String>, introspection_scheme: impl Into<String>) -> Self {
        Self {
            jwt_scheme: jwt_scheme.into(),
            introspection_scheme: introspection_scheme.into(),
        }
    }

    fn pick(&self, credential: Option<&Credential>) -> &str {
        match credential {
            Some(c) if c.is_bearer() && c.shape() == TokenShape::Reference => {
                &self.introspection_scheme
            }
            _ => &self.jwt_scheme,
        }
    }
}

#[async_trait]
impl SchemeSelector for JwtOrIntrospectionSelector {
    async fn select(&self, credential: Option<&Credential>) -> Option<String> {
        Some(self.pick(credential).to_owned())
    }
}
