//! Authentication scheme dispatch for bearer-token APIs.
//!
//! A [`SchemeDispatcher`](services::auth::SchemeDispatcher) picks the handler for
//! each request from the credential's shape and the configured schemes, and the
//! axum service in [`app`] embeds it as middleware.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
