//! Wiring of a ready-to-use client from settings

use std::sync::Arc;

use gridsave_core::CollectionClient;
use gridsave_domain::{GridSaveSettings, Result};
use tracing::info;

use crate::config;
use crate::http::HttpTransport;

/// Client for `collection` talking to the backend over HTTP.
///
/// # Errors
/// Returns `GridSaveError::Config` if the HTTP client cannot be built.
pub fn connect(collection: impl Into<String>, settings: &GridSaveSettings) -> Result<CollectionClient> {
    let transport = Arc::new(HttpTransport::new()?);
    let config = settings.collection_config();
    let collection = collection.into();

    info!(
        collection = %collection,
        app_url = %config.app_url(),
        id_property = config.id_property(),
        "Connecting collection client"
    );

    Ok(CollectionClient::new(collection, config, settings.credentials(), transport))
}

/// [`connect`] using settings from [`config::load`].
///
/// # Errors
/// Returns `GridSaveError::Config` if no settings can be loaded.
pub fn connect_from_env(collection: impl Into<String>) -> Result<CollectionClient> {
    connect(collection, &config::load()?)
}
