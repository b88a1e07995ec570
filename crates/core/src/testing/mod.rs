//! Test doubles for the core ports

pub mod mock_transport;

pub use mock_transport::MockTransport;
