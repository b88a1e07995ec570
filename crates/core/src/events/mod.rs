//! Notification channel for collection lifecycle events

pub mod bus;

pub use bus::{EventBus, EVENT_CHANNEL_CAPACITY};
