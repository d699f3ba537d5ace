//! Scheme dispatcher: credential → scheme name → handler.
//!
//! The dispatcher owns no shape rules. It builds one effective selector from
//! its configuration, asks it for a scheme name, and runs the registered
//! handler exactly once. A missing handler is a configuration defect and is
//! returned as [`DispatchError::HandlerNotRegistered`] without any fallback.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::credential::Credential;
use super::handler::AuthenticateResult;
use super::registry::SchemeRegistry;
use super::selector::{
    DEFAULT_INTROSPECTION_SCHEME, DEFAULT_SCHEME, DefaultSchemeSelector,
    JwtOrIntrospectionSelector, SchemeSelector,
};

pub const NO_SCHEME_SELECTED: &str = "no authentication scheme selected";

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(
        "No authentication handler is registered for the scheme '{scheme}'. The registered schemes are: {}.",
        .registered.join(", ")
    )]
    HandlerNotRegistered {
        scheme: String,
        registered: Vec<String>,
    },

    #[error("authentication handler for scheme '{scheme}' failed")]
    Handler {
        scheme: String,
        #[source]
        source: anyhow::Error,
    },
}

impl DispatchError {
    /// Scheme the dispatcher tried to run.
    pub fn scheme(&self) -> &str {
        match self {
            Self::HandlerNotRegistered { scheme, .. } | Self::Handler { scheme, .. } => scheme,
        }
    }
}

/// Read-only dispatch settings.
///
/// - `default_scheme`: target when nothing else decides (default `Bearer`)
/// - `forward_scheme`: when set, Bearer reference tokens go there instead
/// - `selector`: overrides both of the above
#[derive(Clone)]
pub struct DispatchConfig {
    default_scheme: String,
    forward_scheme: Option<String>,
    selector: Option<Arc<dyn SchemeSelector>>,
}

impl fmt::Debug for DispatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchConfig")
            .field("default_scheme", &self.default_scheme)
            .field("forward_scheme", &self.forward_scheme)
            .field("custom_selector", &self.selector.is_some())
            .finish()
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEME)
    }
}

impl DispatchConfig {
    pub fn new(default_scheme: impl Into<String>) -> Self {
        Self {
            default_scheme: default_scheme.into(),
            forward_scheme: None,
            selector: None,
        }
    }

    /// Forward reference tokens to the `Introspection` scheme.
    pub fn forward_reference_tokens(self) -> Self {
        self.forward_reference_tokens_to(DEFAULT_INTROSPECTION_SCHEME)
    }

    pub fn forward_reference_tokens_to(mut self, scheme: impl Into<String>) -> Self {
        self.forward_scheme = Some(scheme.into());
        self
    }

    pub fn with_selector<S>(self, selector: S) -> Self
    where
        S: SchemeSelector + 'static,
    {
        self.with_shared_selector(Arc::new(selector))
    }

    pub fn with_shared_selector(mut self, selector: Arc<dyn SchemeSelector>) -> Self {
        self.selector = Some(selector);
        self
    }

    pub fn default_scheme(&self) -> &str {
        &self.default_scheme
    }

    pub fn forward_scheme(&self) -> Option<&str> {
        self.forward_scheme.as_deref()
    }

    fn effective_selector(&self) -> Arc<dyn SchemeSelector> {
        if let Some(selector) = &self.selector {
            return Arc::clone(selector);
        }

        match &self.forward_scheme {
            Some(forward) => Arc::new(JwtOrIntrospectionSelector::new(
                self.default_scheme.clone(),
                forward.clone(),
            )),
            None => Arc::new(DefaultSchemeSelector::new(self.default_scheme.clone())),
        }
    }
}

/// Result of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    /// `None` when the selector declined the request.
    pub scheme: Option<String>,
    pub outcome: AuthenticateResult,
}

/// Cheap to clone; share one per process.
#[derive(Clone)]
pub struct SchemeDispatcher {
    config: Arc<DispatchConfig>,
    selector: Arc<dyn SchemeSelector>,
    registry: Arc<SchemeRegistry>,
}

impl fmt::Debug for SchemeDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemeDispatcher")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish()
    }
}

impl SchemeDispatcher {
    pub fn new(config: DispatchConfig, registry: SchemeRegistry) -> Self {
        let selector = config.effective_selector();

        Self {
            config: Arc::new(config),
            selector,
            registry: Arc::new(registry),
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn registry(&self) -> &SchemeRegistry {
        &self.registry
    }

    /// Scheme the request would be dispatched to.
    pub async fn resolve(&self, credential: Option<&Credential>) -> Option<String> {
        self.selector.select(credential).await
    }

    pub async fn dispatch(
        &self,
        credential: Option<&Credential>,
    ) -> Result<Dispatched, DispatchError> {
        let Some(scheme) = self.resolve(credential).await else {
            tracing::debug!("selector declined the request");
            return Ok(Dispatched {
                scheme: None,
                outcome: AuthenticateResult::rejected(NO_SCHEME_SELECTED),
            });
        };

        let Some(handler) = self.registry.get(&scheme) else {
            let err = DispatchError::HandlerNotRegistered {
                registered: self.registry.schemes(),
                scheme,
            };
            tracing::error!(error = %err, "no authentication handler registered");
            return Err(err);
        };

        tracing::debug!(scheme = %scheme, credential = ?credential, "dispatching");

        let outcome = match handler.authenticate(&scheme, credential).await {
            Ok(outcome) => outcome,
            Err(source) => return Err(DispatchError::Handler { scheme, source }),
        };

        if let AuthenticateResult::Rejected(reason) = &outcome {
            tracing::warn!(scheme = %scheme, reason = %reason, "credential rejected");
        }

        Ok(Dispatched {
            scheme: Some(scheme),
            outcome,
        })
    }
}
