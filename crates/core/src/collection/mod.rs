//! Collection client and response envelope parsing

pub mod client;
mod envelope;

pub use client::CollectionClient;
