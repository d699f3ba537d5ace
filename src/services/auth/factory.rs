//! Factory: build `SchemeDispatcher` from application `AuthConfig`.
use crate::config::{AuthConfig, SelectorKind};
use crate::services::auth::{
    DispatchConfig, JwtOrIntrospectionSelector, PassThroughHandler, RegistryError,
    SchemeDispatcher, SchemeRegistry, StaticTokenHandler,
};

pub fn build_dispatcher(config: &AuthConfig) -> Result<SchemeDispatcher, RegistryError> {
    let mut dispatch = DispatchConfig::new(config.default_scheme.clone());

    if let Some(forward) = &config.forward_scheme {
        dispatch = dispatch.forward_reference_tokens_to(forward.clone());
    }

    // Scheme that receives reference tokens, if any
    let secondary_scheme = match config.selector {
        SelectorKind::Default => config.forward_scheme.clone(),
        SelectorKind::JwtOrIntrospection => {
            dispatch = dispatch.with_selector(JwtOrIntrospectionSelector::new(
                config.default_scheme.clone(),
                config.introspection_scheme.clone(),
            ));
            Some(config.introspection_scheme.clone())
        }
    };

    let mut registry = SchemeRegistry::new();

    if config.static_tokens.is_empty() {
        registry.register(config.default_scheme.clone(), PassThroughHandler)?;
    } else {
        registry.register(
            config.default_scheme.clone(),
            StaticTokenHandler::new(config.static_tokens.clone())
                .allow_anonymous(config.allow_anonymous),
        )?;
    }

    // Without tokens the secondary scheme stays unregistered and dispatching to it fails loudly
    if let (Some(scheme), Some(tokens)) = (secondary_scheme, &config.forward_static_tokens) {
        registry.register(scheme, StaticTokenHandler::new(tokens.clone()))?;
    }

    tracing::info!(
        default_scheme = %config.default_scheme,
        forward_scheme = ?config.forward_scheme,
        selector = ?config.selector,
        schemes = ?registry.schemes(),
        "authentication dispatcher configured"
    );

    Ok(SchemeDispatcher::new(dispatch, registry))
}
