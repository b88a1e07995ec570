//! Credential exchange against the backend token endpoint

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use gridsave_domain::constants::ACCESS_TOKEN_FIELD;
use gridsave_domain::{AccessToken, CollectionConfig, Credentials, GridSaveError, Result};
use serde_json::Value;
use tracing::{debug, warn};

use crate::transport::{Method, Transport, TransportRequest};

/// Trait for obtaining a fresh access token
///
/// Implementations perform exactly one exchange per call and never cache.
#[async_trait]
pub trait CredentialExchange: Send + Sync {
    async fn exchange(&self) -> Result<AccessToken>;
}

/// Form-encoded credential exchange at `<app root>/token`
pub struct TokenEndpoint {
    transport: Arc<dyn Transport>,
    url: String,
    credentials: Credentials,
    timeout: Duration,
}

impl TokenEndpoint {
    pub fn new(
        transport: Arc<dyn Transport>,
        url: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> Self {
        Self { transport, url: url.into(), credentials, timeout }
    }

    /// Endpoint for the application described by `config`.
    pub fn for_config(
        transport: Arc<dyn Transport>,
        config: &CollectionConfig,
        credentials: Credentials,
    ) -> Self {
        Self::new(transport, config.token_url(), credentials, config.timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CredentialExchange for TokenEndpoint {
    async fn exchange(&self) -> Result<AccessToken> {
        debug!(url = %self.url, client_id = %self.credentials.client_id, "Exchanging credentials");

        let request = TransportRequest::new(Method::Post, &self.url, self.timeout)
            .form(self.credentials.form_fields());

        let response = self.transport.perform(request).await?;

        if !response.is_ok() {
            warn!(url = %self.url, status = response.status, "Credential exchange rejected");
            return Err(GridSaveError::Auth(format!(
                "Authorisation failure, responded with {}",
                response.status
            )));
        }

        let body: Value = serde_json::from_str(&response.body)
            .map_err(|e| GridSaveError::Auth(format!("Invalid token response: {e}")))?;

        match body.get(ACCESS_TOKEN_FIELD) {
            Some(Value::String(token)) if !token.is_empty() => Ok(AccessToken::new(token.clone())),
            Some(Value::Number(token)) => Ok(AccessToken::new(token.to_string())),
            _ => Err(GridSaveError::Auth(format!(
                "Token response has no '{ACCESS_TOKEN_FIELD}' field"
            ))),
        }
    }
}
