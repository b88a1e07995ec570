//! # GridSave Domain
//!
//! Domain types shared by every GridSave crate.
//!
//! This crate contains:
//! - Entity, query and token value types
//! - Collection lifecycle events
//! - Error taxonomy and Result definition
//! - Connection and credential configuration
//!
//! ## Architecture
//! - No dependencies on other GridSave crates
//! - No I/O; pure data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
