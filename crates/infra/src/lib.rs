//! # GridSave Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The reqwest-backed [`HttpTransport`]
//! - Settings loading from the environment or JSON/TOML files
//! - Tracing subscriber initialisation
//! - [`connect`], which wires a [`CollectionClient`](gridsave_core::CollectionClient)
//!   from settings
//!
//! ## Architecture
//! - Implements traits defined in `gridsave-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod config;
pub mod connect;
pub mod http;
pub mod observability;

pub use connect::{connect, connect_from_env};
pub use http::{HttpTransport, HttpTransportBuilder};
pub use observability::{init_tracing, init_tracing_with, LogFormat};
