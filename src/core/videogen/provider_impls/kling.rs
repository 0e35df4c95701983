//! Kling Video Generation Provider
//!
//! Placeholder adapter: the Kling submission protocol is not implemented
//! yet. The provider still validates its configuration so a missing API key
//! surfaces as a configuration problem rather than an unimplemented one.

use async_trait::async_trait;
use tracing::warn;

use crate::core::videogen::artifact::VideoArtifact;
use crate::core::videogen::providers::{KlingConfig, VideoProvider};
use crate::core::videogen::request::GenerationRequest;
use crate::core::{CoreError, CoreResult, RequestId};

/// Provider name in logs and error attribution
const PROVIDER: &str = "kling";

/// Kling provider stub
pub struct KlingProvider {
    config: KlingConfig,
}

impl KlingProvider {
    pub fn new(config: KlingConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl VideoProvider for KlingProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn is_available(&self) -> bool {
        self.config
            .api_key
            .as_deref()
            .is_some_and(|key| !key.is_empty())
    }

    async fn generate(
        &self,
        _request: &GenerationRequest,
        request_id: &RequestId,
    ) -> CoreResult<VideoArtifact> {
        if !self.is_available() {
            return Err(CoreError::ConfigurationError(
                "Kling API key is not configured".to_string(),
            ));
        }

        warn!("[{}] kling generation requested but not implemented", request_id);
        Err(CoreError::NotImplemented(
            "kling video generation".to_string(),
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================
