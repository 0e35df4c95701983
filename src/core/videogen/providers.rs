//! Provider Abstraction & Configuration
//!
//! Each backend has its own submit/poll/extract protocol. The engine selects
//! one variant per request and never re-checks mid-flow; the trait is the
//! seam between the orchestration core and the wire adapters.

use async_trait::async_trait;

use crate::core::auth::redact;
use crate::core::videogen::artifact::VideoArtifact;
use crate::core::videogen::request::GenerationRequest;
use crate::core::{CoreResult, RequestId};

/// Default HTTP timeout applied to every remote call
const DEFAULT_TIMEOUT_SECS: u64 = 180;

/// One video-generation backend
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Provider name for logs and error attribution
    fn name(&self) -> &'static str;

    /// Whether the provider has the configuration it needs
    fn is_available(&self) -> bool;

    /// Runs the provider's full submit/await/extract sequence for one request
    async fn generate(
        &self,
        request: &GenerationRequest,
        request_id: &RequestId,
    ) -> CoreResult<VideoArtifact>;
}

/// External narration-audio collaborator used by the Hedra path.
///
/// Speech synthesis is not implemented in this crate; the embedding
/// application wires a backend in. Without one the Hedra provider falls back
/// to a placeholder audio reference, a known gap that is surfaced in the
/// logs.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesizes narration for a script, returning an audio URL the video
    /// backend can reference.
    async fn synthesize(&self, script: &str, voice_accent: &str) -> CoreResult<String>;
}

// =============================================================================
// Per-Provider Configuration
// =============================================================================

/// Veo backend configuration
#[derive(Debug, Clone)]
pub struct VeoConfig {
    /// Cloud region hosting the model
    pub location: String,
    /// Model ID to use
    pub model_id: String,
    /// Base URL override; the regional endpoint is used when unset
    pub base_url: Option<String>,
}

impl Default for VeoConfig {
    fn default() -> Self {
        Self {
            location: "us-central1".to_string(),
            model_id: "veo-2.0-generate-001".to_string(),
            base_url: None,
        }
    }
}

impl VeoConfig {
    /// Sets the cloud region
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Sets the model ID
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Sets a custom base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Resolved API root for the configured region
    pub(crate) fn api_root(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}-aiplatform.googleapis.com", self.location))
    }
}

/// Hedra backend configuration
#[derive(Clone)]
pub struct HedraConfig {
    /// API key; the provider is unavailable without one
    pub api_key: Option<String>,
    /// Base URL for the API
    pub base_url: String,
}

impl Default for HedraConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.hedra.com".to_string(),
        }
    }
}

impl HedraConfig {
    /// Sets the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets a custom base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl std::fmt::Debug for HedraConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HedraConfig")
            .field("api_key", &self.api_key.as_deref().map(redact))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Kling backend configuration
#[derive(Clone, Default)]
pub struct KlingConfig {
    /// API key; the provider is unavailable without one
    pub api_key: Option<String>,
}

impl KlingConfig {
    /// Sets the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

impl std::fmt::Debug for KlingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KlingConfig")
            .field("api_key", &self.api_key.as_deref().map(redact))
            .finish()
    }
}

// =============================================================================
// Engine Configuration
// =============================================================================

/// Top-level video generation configuration
#[derive(Debug, Clone)]
pub struct VideoGenConfig {
    pub veo: VeoConfig,
    pub hedra: HedraConfig,
    pub kling: KlingConfig,
    /// HTTP timeout applied to every remote call
    pub timeout_secs: u64,
}

impl Default for VideoGenConfig {
    fn default() -> Self {
        Self {
            veo: VeoConfig::default(),
            hedra: HedraConfig::default(),
            kling: KlingConfig::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl VideoGenConfig {
    /// Reads provider settings from the environment.
    ///
    /// `HEDRA_API_KEY`, `KLING_API_KEY`, `VEO_LOCATION` and `VEO_MODEL_ID`
    /// override the defaults when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(key) = std::env::var("HEDRA_API_KEY") {
            config.hedra.api_key = Some(key);
        }
        if let Ok(key) = std::env::var("KLING_API_KEY") {
            config.kling.api_key = Some(key);
        }
        if let Ok(location) = std::env::var("VEO_LOCATION") {
            config.veo.location = location;
        }
        if let Ok(model_id) = std::env::var("VEO_MODEL_ID") {
            config.veo.model_id = model_id;
        }
        config
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_veo_config_defaults_and_api_root() {
        let config = VeoConfig::default();
        assert_eq!(config.location, "us-central1");
        assert_eq!(
            config.api_root(),
            "https://us-central1-aiplatform.googleapis.com"
        );
    }

    #[test]
    fn test_veo_config_base_url_override() {
        let config = VeoConfig::default().with_base_url("http://127.0.0.1:9999");
        assert_eq!(config.api_root(), "http://127.0.0.1:9999");
    }

    #[test]
    fn test_veo_config_builders() {
        let config = VeoConfig::default()
            .with_location("europe-west4")
            .with_model_id("veo-3.0-generate-001");
        assert_eq!(
            config.api_root(),
            "https://europe-west4-aiplatform.googleapis.com"
        );
        assert_eq!(config.model_id, "veo-3.0-generate-001");
    }

    #[test]
    fn test_config_default_timeout() {
        let config = VideoGenConfig::default();
        assert_eq!(config.timeout_secs, 180);
        assert!(config.hedra.api_key.is_none());
        assert!(config.kling.api_key.is_none());
    }

    #[test]
    fn test_debug_never_prints_api_keys() {
        let hedra = HedraConfig::default().with_api_key("hk_live_abcdefghijklmnop");
        let rendered = format!("{:?}", hedra);
        assert!(!rendered.contains("abcdefghijklmnop"));

        let kling = KlingConfig::default().with_api_key("kl_live_abcdefghijklmnop");
        let rendered = format!("{:?}", kling);
        assert!(!rendered.contains("abcdefghijklmnop"));
    }
}
