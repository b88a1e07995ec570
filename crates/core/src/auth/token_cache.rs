//! Memoizing, single-flight token cache
//!
//! Serves the current token without a network round trip until its TTL
//! elapses. When a token is needed and none is valid, exactly one exchange
//! runs; callers arriving while it is in flight await the same future and
//! observe the same result.
//!
//! Failed exchanges are not cached and apply no backoff: the next caller
//! after a failure starts a fresh exchange.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::{BoxFuture, FutureExt, Shared};
use gridsave_common::{Clock, SystemClock};
use gridsave_domain::constants::TOKEN_TTL_SECS;
use gridsave_domain::{AccessToken, Result};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::exchange::CredentialExchange;

type InFlightExchange = Shared<BoxFuture<'static, Result<AccessToken>>>;

#[derive(Debug, Clone)]
struct CachedToken {
    token: AccessToken,
    expires_at: Instant,
}

#[derive(Default)]
struct TokenState {
    current: Option<CachedToken>,
    in_flight: Option<InFlightExchange>,
}

/// Token cache owned by a single client instance
pub struct TokenCache {
    exchanger: Arc<dyn CredentialExchange>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    state: Arc<Mutex<TokenState>>,
}

impl TokenCache {
    /// Create a cache with the default one hour TTL and the system clock.
    pub fn new(exchanger: Arc<dyn CredentialExchange>) -> Self {
        Self::with_clock(exchanger, Arc::new(SystemClock))
    }

    pub fn with_clock(exchanger: Arc<dyn CredentialExchange>, clock: Arc<dyn Clock>) -> Self {
        Self {
            exchanger,
            clock,
            ttl: Duration::from_secs(TOKEN_TTL_SECS),
            state: Arc::new(Mutex::new(TokenState::default())),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a valid access token, exchanging credentials only when needed.
    ///
    /// # Errors
    /// Returns the exchange failure (`Transport` or `Auth`) unchanged. Every
    /// caller that joined the failed exchange receives the same error.
    pub async fn get_token(&self) -> Result<AccessToken> {
        let exchange = {
            let mut state = self.state.lock();

            if let Some(cached) = &state.current {
                if self.clock.now() < cached.expires_at {
                    return Ok(cached.token.clone());
                }
                debug!("Cached access token expired");
                state.current = None;
            }

            match &state.in_flight {
                Some(exchange) => {
                    debug!("Joining in-flight credential exchange");
                    exchange.clone()
                }
                None => {
                    let exchange = self.start_exchange();
                    state.in_flight = Some(exchange.clone());
                    exchange
                }
            }
        }; // lock released before awaiting

        exchange.await
    }

    /// Token currently held, if it has not expired.
    pub fn cached(&self) -> Option<AccessToken> {
        let state = self.state.lock();
        state
            .current
            .as_ref()
            .filter(|cached| self.clock.now() < cached.expires_at)
            .map(|cached| cached.token.clone())
    }

    /// Drop the cached token so the next call exchanges credentials again.
    ///
    /// An exchange already in flight is left to complete.
    pub fn invalidate(&self) {
        self.state.lock().current = None;
        info!("Access token invalidated");
    }

    fn start_exchange(&self) -> InFlightExchange {
        let exchanger = Arc::clone(&self.exchanger);
        let clock = Arc::clone(&self.clock);
        let state = Arc::clone(&self.state);
        let ttl = self.ttl;

        async move {
            let result = exchanger.exchange().await;

            let mut state = state.lock();
            state.in_flight = None;
            match &result {
                Ok(token) => {
                    state.current =
                        Some(CachedToken { token: token.clone(), expires_at: clock.now() + ttl });
                    info!(ttl_secs = ttl.as_secs(), "Access token acquired");
                }
                Err(e) => warn!(error = %e, "Credential exchange failed"),
            }

            result
        }
        .boxed()
        .shared()
    }
}
