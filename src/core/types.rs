//! Core Shared Types

use serde::{Deserialize, Serialize};

/// Correlation token minted once per inbound generation call.
///
/// Attached to every log line and returned with the response so failures can
/// be traced back to a specific call. Carries no behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Mints a new id from the current time plus a random suffix.
    pub fn mint() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix = rand::random::<u32>() & 0x00ff_ffff;
        Self(format!("req_{:x}_{:06x}", millis, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_shape() {
        let id = RequestId::mint();
        assert!(id.as_str().starts_with("req_"));
        assert_eq!(id.as_str().split('_').count(), 3);
    }

    #[test]
    fn test_request_ids_are_distinct() {
        // The random suffix keeps ids distinct even within one millisecond.
        let a = RequestId::mint();
        let b = RequestId::mint();
        assert_ne!(a, b);
    }

    #[test]
    fn test_request_id_serializes_transparently() {
        let id = RequestId::mint();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_str()));
    }
}
