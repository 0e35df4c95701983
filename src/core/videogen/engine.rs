//! Video Generation Engine
//!
//! Entry point for the orchestration core. Owns the provider instances and
//! the shared HTTP client; each inbound call is normalized, dispatched to
//! one provider variant, and returned as a data-URI artifact.
//!
//! Every call runs as one independent, sequential task. There is no
//! deduplication, no caching and no single-flight behavior: two callers
//! requesting the same content run two independent provider operations.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;
use tracing::{error, info};

use crate::core::auth::AuthProvider;
use crate::core::videogen::artifact::VideoArtifact;
use crate::core::videogen::provider_impls::{HedraProvider, KlingProvider, VeoProvider};
use crate::core::videogen::providers::{SpeechSynthesizer, VideoGenConfig, VideoProvider};
use crate::core::videogen::request::{normalize, RawVideoRequest, VideoProviderKind};
use crate::core::{CoreError, CoreResult, RequestId};

/// Completed generation response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedVideo {
    /// Correlation token for this call
    pub request_id: RequestId,
    /// Artifact as a `data:` URI, ready for direct embedding
    pub video: String,
    /// Same payload without the data-URI prefix
    pub video_base64: String,
    /// Artifact MIME type
    pub mime_type: String,
}

impl GeneratedVideo {
    fn from_artifact(request_id: RequestId, artifact: VideoArtifact) -> Self {
        let video_base64 = BASE64.encode(&artifact.bytes);
        let video = format!("data:{};base64,{}", artifact.mime_type, video_base64);
        Self {
            request_id,
            video,
            video_base64,
            mime_type: artifact.mime_type,
        }
    }
}

/// Main video generation engine
pub struct VideoGenEngine {
    pub(crate) veo: VeoProvider,
    pub(crate) hedra: HedraProvider,
    pub(crate) kling: KlingProvider,
}

impl VideoGenEngine {
    /// Creates an engine without a narration synthesizer.
    pub fn new(config: VideoGenConfig, auth: Arc<dyn AuthProvider>) -> CoreResult<Self> {
        Self::with_synthesizer(config, auth, None)
    }

    /// Creates an engine with an external narration synthesizer wired into
    /// the Hedra path.
    pub fn with_synthesizer(
        config: VideoGenConfig,
        auth: Arc<dyn AuthProvider>,
        synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    ) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CoreError::Internal(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            veo: VeoProvider::new(client.clone(), auth, config.veo),
            hedra: HedraProvider::new(client, config.hedra, synthesizer),
            kling: KlingProvider::new(config.kling),
        })
    }

    /// Generates one video from a loosely-typed inbound request.
    ///
    /// Any failure aborts the whole request; the caller owns retry policy.
    pub async fn generate(&self, raw: RawVideoRequest) -> CoreResult<GeneratedVideo> {
        let request_id = RequestId::mint();

        let request = match normalize(&raw) {
            Ok(request) => request,
            Err(e) => {
                error!("[{}] request rejected: {}", request_id, e);
                return Err(e);
            }
        };
        info!(
            "[{}] dispatching {} request (style: {}, accent: {})",
            request_id, request.provider, request.video_style, request.voice_accent
        );

        let provider: &dyn VideoProvider = match request.provider {
            VideoProviderKind::Veo => &self.veo,
            VideoProviderKind::Hedra => &self.hedra,
            VideoProviderKind::Kling => &self.kling,
        };

        let artifact = match provider.generate(&request, &request_id).await {
            Ok(artifact) => artifact,
            Err(e) => {
                error!("[{}] {} generation failed: {}", request_id, provider.name(), e);
                return Err(e);
            }
        };

        info!(
            "[{}] generation complete ({} bytes)",
            request_id,
            artifact.bytes.len()
        );
        Ok(GeneratedVideo::from_artifact(request_id, artifact))
    }
}

// ============================================================================
// Tests
// ============================================================================
