use super::Api;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

const STATUS_OK_NO_CONTENT: u16 = 204;
const STATUS_ACCEPTED: u16 = 202;
const STATUS_CONFLICT: u16 = 409;

/// Result of fetching an endpoint that may still be computing.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Ready(T),
    /// Still computing, and the policy accepts that as a final answer.
    Pending,
    /// Definitively nothing there (empty repository, no content).
    Empty,
    /// Never became ready, or failed.
    Unavailable,
}

impl<T> FetchOutcome<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            FetchOutcome::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, FetchOutcome::Ready(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    /// The n-th retry waits `base_delay * n`.
    pub base_delay: Duration,
    pub accept_pending: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            base_delay: Duration::from_secs(3),
            accept_pending: false,
        }
    }
}

impl RetryPolicy {
    /// Single request whose only purpose is to make the server start computing.
    pub fn trigger() -> Self {
        Self {
            attempts: 1,
            accept_pending: true,
            ..Default::default()
        }
    }
}

pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

pub struct Fetcher<'a> {
    api: &'a dyn Api,
    sleeper: &'a dyn Sleeper,
    policy: RetryPolicy,
}

impl<'a> Fetcher<'a> {
    pub fn new(api: &'a dyn Api, sleeper: &'a dyn Sleeper, policy: RetryPolicy) -> Self {
        Self {
            api,
            sleeper,
            policy,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            self.sleeper.sleep(duration);
        }
    }

    pub fn fetch<T: DeserializeOwned>(&self, path: &str) -> FetchOutcome<T> {
        self.fetch_with(path, self.policy)
    }

    /// Fire a request and ignore the answer.
    pub fn trigger(&self, path: &str) {
        let _ = self.fetch_with::<serde::de::IgnoredAny>(path, RetryPolicy::trigger());
    }

    pub fn fetch_with<T: DeserializeOwned>(
        &self,
        path: &str,
        policy: RetryPolicy,
    ) -> FetchOutcome<T> {
        let attempts = policy.attempts.max(1);
        for attempt in 1..=attempts {
            let response = match self.api.get(path) {
                Ok(response) => response,
                Err(e) => {
                    warn!(path, error = %e, "request failed");
                    return FetchOutcome::Unavailable;
                }
            };

            match response.status {
                STATUS_ACCEPTED if policy.accept_pending => return FetchOutcome::Pending,
                STATUS_ACCEPTED if attempt < attempts => {
                    let delay = policy.base_delay.saturating_mul(attempt);
                    debug!(path, attempt, ?delay, "statistics still computing");
                    self.pause(delay);
                }
                STATUS_ACCEPTED => {
                    debug!(path, attempts, "statistics never became ready");
                    return FetchOutcome::Unavailable;
                }
                STATUS_OK_NO_CONTENT | STATUS_CONFLICT => return FetchOutcome::Empty,
                status if (200..300).contains(&status) => {
                    return match serde_json::from_str(&response.body) {
                        Ok(value) => FetchOutcome::Ready(value),
                        Err(e) => {
                            warn!(path, error = %e, "unexpected response body");
                            FetchOutcome::Unavailable
                        }
                    };
                }
                status => {
                    warn!(path, status, "request rejected");
                    return FetchOutcome::Unavailable;
                }
            }
        }
        FetchOutcome::Unavailable
    }
}
