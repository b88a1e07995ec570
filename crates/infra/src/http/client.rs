use std::time::Duration;

use async_trait::async_trait;
use gridsave_core::{Method, RequestBody, Transport, TransportRequest, TransportResponse};
use gridsave_domain::{GridSaveError, Result};
use reqwest::Client as ReqwestClient;
use tracing::debug;

/// [`Transport`] backed by reqwest.
///
/// Performs exactly one attempt per request. Connection failures and
/// timeouts become `GridSaveError::Transport`; any HTTP status, including
/// errors, is handed back to the caller.
#[derive(Clone)]
pub struct HttpTransport {
    client: ReqwestClient,
}

impl HttpTransport {
    /// Start building a new transport.
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    fn prepare(&self, request: TransportRequest) -> reqwest::RequestBuilder {
        let mut builder =
            self.client.request(reqwest_method(request.method), &request.url).timeout(request.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Form(fields) => builder.form(&fields),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn perform(&self, request: TransportRequest) -> Result<TransportResponse> {
        let method = request.method;
        let url = request.url.clone();
        debug!(%method, %url, "sending HTTP request");

        let response = self.prepare(request).send().await.map_err(|err| {
            debug!(%method, %url, error = %err, "HTTP request failed");
            transport_error(err)
        })?;

        let status = response.status().as_u16();
        debug!(%method, %url, status, "received HTTP response");

        let body = response.text().await.map_err(transport_error)?;
        Ok(TransportResponse::new(status, body))
    }
}

/// Builder for [`HttpTransport`].
#[derive(Debug)]
pub struct HttpTransportBuilder {
    connect_timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpTransportBuilder {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            user_agent: Some(concat!("gridsave/", env!("CARGO_PKG_VERSION")).to_string()),
            default_headers: None,
        }
    }
}

impl HttpTransportBuilder {
    /// Upper bound on establishing a connection. Each request still carries
    /// its own overall timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpTransport> {
        let mut builder = ReqwestClient::builder().connect_timeout(self.connect_timeout);

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .map_err(|err| GridSaveError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(HttpTransport { client })
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn transport_error(err: reqwest::Error) -> GridSaveError {
    if err.is_timeout() {
        GridSaveError::Transport(format!("request timed out: {err}"))
    } else {
        GridSaveError::Transport(err.to_string())
    }
}
