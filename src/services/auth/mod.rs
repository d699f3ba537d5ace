pub mod credential;
pub mod dispatcher;
pub mod factory;
pub mod handler;
pub mod registry;
pub mod selector;

pub use credential::{Credential, CredentialError, TokenShape};
pub use dispatcher::{DispatchConfig, DispatchError, Dispatched, SchemeDispatcher};
pub use factory::build_dispatcher;
pub use handler::{
    AuthenticateResult, AuthenticationHandler, PassThroughHandler, Principal, StaticTokenHandler,
};
pub use registry::{RegistryError, SchemeRegistry};
pub use selector::{DefaultSchemeSelector, JwtOrIntrospectionSelector, SchemeSelector};
