//! Long-Running Operation Polling
//!
//! Drives a remote long-running operation from submission to a terminal
//! state: `Submitted → Polling → {Completed, Failed, TimedOut}`.
//! Each tick sleeps a fixed interval, then issues exactly one poll call;
//! polls are strictly sequential and never overlap.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::core::{CoreError, CoreResult};

/// Fixed pause between poll calls
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Fixed ceiling on poll attempts (about five minutes at the fixed interval)
pub const MAX_POLL_ATTEMPTS: u32 = 60;

/// Remote long-running job handle.
///
/// Created by a submit call, advanced only by poll calls, terminal once
/// `done` is true. `response` is present only when the operation succeeded.
#[derive(Debug, Clone, Deserialize)]
pub struct Operation {
    /// Opaque provider-issued identifier, required to poll
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<OperationError>,
    #[serde(default)]
    pub response: Option<serde_json::Value>,
}

/// Structured error reported by a terminal operation
#[derive(Debug, Clone, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl OperationError {
    /// The remote message, or a stable fallback when the provider omits it
    pub fn message_or_default(&self) -> String {
        match (&self.message, self.code) {
            (Some(message), _) => message.clone(),
            (None, Some(code)) => format!("operation failed with code {}", code),
            (None, None) => "operation failed without a message".to_string(),
        }
    }
}

/// Polling cadence and bound.
///
/// Production always runs the fixed constants; overrides exist so tests can
/// exercise the full attempt ceiling in milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            max_attempts: MAX_POLL_ATTEMPTS,
        }
    }
}

/// Polls `poll` until the operation reaches a terminal state.
///
/// Returns the operation's response body once it reports done without an
/// error. A done operation carrying an error maps to `ProviderOperation`;
/// exhausting the attempt ceiling maps to `ProviderTimeout`. A failed poll
/// call is immediately fatal; there is no transport retry at this layer,
/// the caller owns retry policy.
pub async fn poll_until_done<F, Fut>(
    provider: &'static str,
    operation_name: &str,
    policy: PollPolicy,
    mut poll: F,
) -> CoreResult<serde_json::Value>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = CoreResult<Operation>>,
{
    for attempt in 1..=policy.max_attempts {
        tokio::time::sleep(policy.interval).await;

        let operation = poll().await?;
        if !operation.done {
            debug!(
                "{} operation {} still running (attempt {}/{})",
                provider, operation_name, attempt, policy.max_attempts
            );
            continue;
        }

        if let Some(error) = operation.error {
            return Err(CoreError::ProviderOperation {
                provider,
                message: error.message_or_default(),
            });
        }

        debug!(
            "{} operation {} completed after {} attempts",
            provider, operation_name, attempt
        );
        return Ok(operation.response.unwrap_or(serde_json::Value::Null));
    }

    Err(CoreError::ProviderTimeout {
        provider,
        attempts: policy.max_attempts,
    })
}

// ============================================================================
// Tests
// ============================================================================
