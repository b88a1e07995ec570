//! Domain constants
//!
//! Defaults applied when a connection omits optional settings.

/// Field treated as the entity identifier unless configured otherwise.
pub const DEFAULT_ID_PROPERTY: &str = "uuid";

/// Per-request timeout applied to every network call.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Grant used for the credential exchange unless configured otherwise.
pub const DEFAULT_GRANT_TYPE: &str = "client_credentials";

/// Client-side validity window of an access token, measured from issuance.
/// The backend's own expiry claim is not consulted.
pub const TOKEN_TTL_SECS: u64 = 3600;

/// Path segment of the credential exchange endpoint under the application root.
pub const TOKEN_PATH: &str = "token";

/// Name of the access token field in the credential exchange response.
pub const ACCESS_TOKEN_FIELD: &str = "access_token";
