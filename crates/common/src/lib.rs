//! Common utilities shared across GridSave crates.
//!
//! - [`time`]: injectable clocks so expiry logic can be tested without
//!   sleeping
//! - [`utils`]: URL component encoding and entity id helpers

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod time;
pub mod utils;

pub use time::{Clock, MockClock, SystemClock};
pub use utils::encoding::encode_uri_component;
pub use utils::json::{entity_id, id_to_string};
