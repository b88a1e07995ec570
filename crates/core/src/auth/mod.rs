//! Access token acquisition
//!
//! [`TokenEndpoint`] performs the credential exchange over a [`Transport`];
//! [`TokenCache`] memoizes its result for a fixed TTL and coalesces
//! concurrent requests into one exchange.
//!
//! [`Transport`]: crate::transport::Transport

pub mod exchange;
pub mod token_cache;

pub use exchange::{CredentialExchange, TokenEndpoint};
pub use token_cache::TokenCache;
