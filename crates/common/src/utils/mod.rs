//! Common utility functions
//!
//! - **[`encoding`]**: query string component encoding
//! - **[`json`]**: helpers for reading entity identifiers

pub mod encoding;
pub mod json;
