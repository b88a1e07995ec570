//! Scripted in-memory transport
//!
//! Responses are queued per `(method, url)` and consumed in order. Every
//! request is recorded so tests can assert on the exact network traffic.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use gridsave_domain::{GridSaveError, Result};
use parking_lot::Mutex;

use crate::transport::{Method, Transport, TransportRequest, TransportResponse};

type Script = HashMap<(Method, String), VecDeque<Result<TransportResponse>>>;

/// Transport that replays scripted responses
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<Script>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next `method url` request.
    pub fn respond(&self, method: Method, url: impl Into<String>, response: TransportResponse) {
        self.push(method, url.into(), Ok(response));
    }

    /// Queue a transport-level failure for the next `method url` request.
    pub fn fail(&self, method: Method, url: impl Into<String>, message: impl Into<String>) {
        self.push(method, url.into(), Err(GridSaveError::Transport(message.into())));
    }

    /// All requests performed so far, in order.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Number of requests performed with `method`.
    pub fn count(&self, method: Method) -> usize {
        self.requests.lock().iter().filter(|r| r.method == method).count()
    }

    /// Number of requests performed against exactly `method url`.
    pub fn count_to(&self, method: Method, url: &str) -> usize {
        self.requests.lock().iter().filter(|r| r.method == method && r.url == url).count()
    }

    fn push(&self, method: Method, url: String, response: Result<TransportResponse>) {
        self.script.lock().entry((method, url)).or_default().push_back(response);
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn perform(&self, request: TransportRequest) -> Result<TransportResponse> {
        let key = (request.method, request.url.clone());
        self.requests.lock().push(request);

        self.script.lock().get_mut(&key).and_then(VecDeque::pop_front).unwrap_or_else(|| {
            Err(GridSaveError::Transport(format!("no scripted response for {} {}", key.0, key.1)))
        })
    }
}
