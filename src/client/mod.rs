//! The client half of the session subsystem.
//!
//! Embedding UIs construct a [`Session`] (durable token slot, identity
//! channel, navigation sink) and an [`ApiClient`] around it. Every request
//! issued through the client passes the outbound stage (bearer attachment)
//! and the inbound stage (central 401 teardown), so no UI component ever
//! handles authentication state by hand.

pub mod api;
pub mod error;
pub mod identity;
pub mod navigator;
pub mod token_store;

pub use api::ApiClient;
pub use error::ClientError;
pub use identity::{IdentityProvider, IdentityState, Session};
pub use navigator::{Navigator, NullNavigator, RecordingNavigator, LOGIN_ROUTE};
pub use token_store::TokenStore;
