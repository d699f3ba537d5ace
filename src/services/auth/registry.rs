use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::handler::AuthenticationHandler;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("scheme already exists: {0}")]
    DuplicateScheme(String),
}

/// Scheme name → handler. Names are case-sensitive and unique.
#[derive(Clone, Default)]
pub struct SchemeRegistry {
    handlers: HashMap<String, Arc<dyn AuthenticationHandler>>,
}

impl fmt::Debug for SchemeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemeRegistry")
            .field("schemes", &self.schemes())
            .finish()
    }
}

impl SchemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H>(&mut self, scheme: impl Into<String>, handler: H) -> Result<(), RegistryError>
    where
        H: AuthenticationHandler + 'static,
    {
        self.register_shared(scheme, Arc::new(handler))
    }

    pub fn register_shared(
        &mut self,
        scheme: impl Into<String>,
        handler: Arc<dyn AuthenticationHandler>,
    ) -> Result<(), RegistryError> {
        let scheme = scheme.into();
        if self.handlers.contains_key(&scheme) {
            return Err(RegistryError::DuplicateScheme(scheme));
        }

        self.handlers.insert(scheme, handler);
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<H>(mut self, scheme: impl Into<String>, handler: H) -> Result<Self, RegistryError>
    where
        H: AuthenticationHandler + 'static,
    {
        self.register(scheme, handler)?;
        Ok(self)
    }

    pub fn get(&self, scheme: &str) -> Option<&Arc<dyn AuthenticationHandler>> {
        self.handlers.get(scheme)
    }

    pub fn contains(&self, scheme: &str) -> bool {
        self.handlers.contains_key(scheme)
    }

    /// Registered scheme names, sorted.
    pub fn schemes(&self) -> Vec<String> {
        let mut schemes: Vec<String> = self.handlers.keys().cloned().collect();
        schemes.sort();
        schemes
    }
}
