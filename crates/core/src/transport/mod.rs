//! Transport port
//!
//! The HTTP exchange is an external collaborator; the core only describes the
//! request it wants performed and reads back the status and body.

pub mod ports;

pub use ports::{Method, RequestBody, Transport, TransportRequest, TransportResponse};
