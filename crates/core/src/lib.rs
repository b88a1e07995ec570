//! # GridSave Core
//!
//! Client logic for a token-authenticated remote collection, independent of
//! any HTTP library.
//!
//! This crate contains:
//! - Port interfaces ([`Transport`], [`CredentialExchange`])
//! - The single-flight [`TokenCache`]
//! - The [`EventBus`] notification channel
//! - The [`CollectionClient`] operation set
//!
//! ## Architecture Principles
//! - Only depends on `gridsave-domain` and `gridsave-common`
//! - All network access goes through the `Transport` port
//! - No retries; every failure is returned to the caller

pub mod auth;
pub mod collection;
pub mod events;
pub mod transport;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use auth::{CredentialExchange, TokenCache, TokenEndpoint};
pub use collection::CollectionClient;
pub use events::EventBus;
pub use transport::{Method, RequestBody, Transport, TransportRequest, TransportResponse};
