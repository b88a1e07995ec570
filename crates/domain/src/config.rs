//! Connection and credential configuration

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_GRANT_TYPE, DEFAULT_ID_PROPERTY, DEFAULT_TIMEOUT_MS, TOKEN_PATH};

/// Parameters of the credential exchange.
///
/// `Debug` output redacts the client secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub grant_type: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(
        grant_type: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            grant_type: grant_type.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Client-credentials grant, the usual choice for server-side callers.
    pub fn client_credentials(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self::new(DEFAULT_GRANT_TYPE, client_id, client_secret)
    }

    /// Form fields sent to the token endpoint.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        vec![
            ("grant_type".to_string(), self.grant_type.clone()),
            ("client_id".to_string(), self.client_id.clone()),
            ("client_secret".to_string(), self.client_secret.clone()),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("grant_type", &self.grant_type)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

/// Location of an application on the backend plus per-request settings.
///
/// Immutable once built; URLs are derived on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionConfig {
    host: String,
    org: String,
    app: String,
    id_property: String,
    timeout: Duration,
}

impl CollectionConfig {
    /// Start building a configuration for `host/org/app`.
    pub fn builder(
        host: impl Into<String>,
        org: impl Into<String>,
        app: impl Into<String>,
    ) -> CollectionConfigBuilder {
        CollectionConfigBuilder {
            host: host.into(),
            org: org.into(),
            app: app.into(),
            id_property: DEFAULT_ID_PROPERTY.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn id_property(&self) -> &str {
        &self.id_property
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Application root, e.g. `https://api.example.com/org/app`.
    pub fn app_url(&self) -> String {
        format!("{}/{}/{}", self.host, self.org, self.app)
    }

    /// Root of the named collection under the application.
    pub fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.app_url(), collection)
    }

    /// Credential exchange endpoint.
    pub fn token_url(&self) -> String {
        format!("{}/{}", self.app_url(), TOKEN_PATH)
    }
}

/// Builder for [`CollectionConfig`].
#[derive(Debug)]
pub struct CollectionConfigBuilder {
    host: String,
    org: String,
    app: String,
    id_property: String,
    timeout: Duration,
}

impl CollectionConfigBuilder {
    pub fn id_property(mut self, id_property: impl Into<String>) -> Self {
        self.id_property = id_property.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout_ms(self, millis: u64) -> Self {
        self.timeout(Duration::from_millis(millis))
    }

    pub fn build(self) -> CollectionConfig {
        CollectionConfig {
            host: self.host.trim_end_matches('/').to_string(),
            org: self.org,
            app: self.app,
            id_property: self.id_property,
            timeout: self.timeout,
        }
    }
}

/// Complete client settings as read from the environment or a config file.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSaveSettings {
    pub host: String,
    pub org: String,
    pub app: String,
    #[serde(default = "default_id_property")]
    pub id_property: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_grant_type")]
    pub grant_type: String,
    pub client_id: String,
    pub client_secret: String,
}

impl GridSaveSettings {
    pub fn collection_config(&self) -> CollectionConfig {
        CollectionConfig::builder(&self.host, &self.org, &self.app)
            .id_property(&self.id_property)
            .timeout_ms(self.timeout_ms)
            .build()
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.grant_type, &self.client_id, &self.client_secret)
    }
}

impl fmt::Debug for GridSaveSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridSaveSettings")
            .field("host", &self.host)
            .field("org", &self.org)
            .field("app", &self.app)
            .field("id_property", &self.id_property)
            .field("timeout_ms", &self.timeout_ms)
            .field("grant_type", &self.grant_type)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

fn default_id_property() -> String {
    DEFAULT_ID_PROPERTY.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_grant_type() -> String {
    DEFAULT_GRANT_TYPE.to_string()
}
