//! Value types exchanged with the remote collection

pub mod entity;
pub mod events;
pub mod query;
pub mod token;

pub use entity::{ApproximateCount, Entity};
pub use events::{CollectionEvent, EventPayload};
pub use query::{FindResult, Query};
pub use token::AccessToken;
