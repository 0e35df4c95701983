//! Hedra Video Generation Provider
//!
//! Character-based talking-video backend. The sequence is create a character
//! from the reference image, attach narration audio, then submit a video job
//! and poll its status endpoint until a terminal value.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::videogen::artifact::VideoArtifact;
use crate::core::videogen::providers::{HedraConfig, SpeechSynthesizer, VideoProvider};
use crate::core::videogen::request::GenerationRequest;
use crate::core::{CoreError, CoreResult, RequestId};

// =============================================================================
// Constants
// =============================================================================

/// Provider name in logs and error attribution
const PROVIDER: &str = "hedra";

/// Fixed pause between status polls
const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Fixed ceiling on status poll attempts
const MAX_STATUS_POLL_ATTEMPTS: u32 = 30;

/// Aspect ratio for generated talking videos
const ASPECT_RATIO: &str = "9:16";

/// Audio reference used while no speech synthesizer is wired in.
///
/// Narration synthesis belongs to an external collaborator; until one is
/// configured every Hedra video carries this placeholder narration. Known
/// gap, not to be papered over here.
const PLACEHOLDER_AUDIO_URL: &str =
    "https://storage.googleapis.com/reelgen-assets/placeholder-narration.mp3";

// =============================================================================
// API Request/Response Types
// =============================================================================

#[derive(Debug, Serialize)]
struct CreateCharacterRequest<'a> {
    /// Reference image as a data URI
    image: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateCharacterResponse {
    id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateVideoRequest<'a> {
    character_id: &'a str,
    audio_url: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    motion_prompt: &'a str,
    aspect_ratio: &'static str,
}

#[derive(Debug, Deserialize)]
struct CreateVideoResponse {
    id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatusResponse {
    status: String,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

// =============================================================================
// HedraProvider
// =============================================================================

/// Hedra character-video provider
pub struct HedraProvider {
    client: reqwest::Client,
    config: HedraConfig,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    pub(crate) poll_interval: Duration,
}

impl HedraProvider {
    pub fn new(
        client: reqwest::Client,
        config: HedraConfig,
        synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    ) -> Self {
        Self {
            client,
            config,
            synthesizer,
            poll_interval: STATUS_POLL_INTERVAL,
        }
    }

    fn api_key(&self) -> CoreResult<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                CoreError::ConfigurationError("Hedra API key is not configured".to_string())
            })
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        api_key: &str,
        body: &B,
    ) -> CoreResult<T> {
        let response = self
            .client
            .post(url)
            .header("X-API-Key", api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| CoreError::Internal(format!("network error: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CoreError::Internal(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(CoreError::ProviderSubmit {
                provider: PROVIDER,
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Resolves the narration audio reference for a request.
    async fn narration_audio(&self, request: &GenerationRequest) -> CoreResult<String> {
        match &self.synthesizer {
            Some(synthesizer) => {
                synthesizer
                    .synthesize(&request.script_text, &request.voice_accent)
                    .await
            }
            None => {
                warn!("no speech synthesizer wired in; using placeholder narration audio");
                Ok(PLACEHOLDER_AUDIO_URL.to_string())
            }
        }
    }

    async fn poll_status(&self, video_id: &str, api_key: &str) -> CoreResult<VideoStatusResponse> {
        let url = format!("{}/v1/videos/{}", self.config.base_url, video_id);
        let response = self
            .client
            .get(&url)
            .header("X-API-Key", api_key)
            .send()
            .await
            .map_err(|e| CoreError::Internal(format!("network error: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CoreError::Internal(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(CoreError::ProviderPoll {
                provider: PROVIDER,
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Polls the status endpoint until the job reaches a terminal value,
    /// returning the artifact download URL.
    async fn await_completion(
        &self,
        video_id: &str,
        api_key: &str,
        request_id: &RequestId,
    ) -> CoreResult<String> {
        for attempt in 1..=MAX_STATUS_POLL_ATTEMPTS {
            tokio::time::sleep(self.poll_interval).await;

            let status = self.poll_status(video_id, api_key).await?;
            match status.status.as_str() {
                "completed" | "complete" => {
                    return status.video_url.clone().ok_or_else(|| CoreError::NoArtifact {
                        response: serde_json::to_string(&status).unwrap_or_default(),
                    });
                }
                "failed" | "error" => {
                    return Err(CoreError::ProviderOperation {
                        provider: PROVIDER,
                        message: status
                            .error
                            .unwrap_or_else(|| "video generation failed".to_string()),
                    });
                }
                other => {
                    debug!(
                        "[{}] hedra video {} status {} (attempt {}/{})",
                        request_id, video_id, other, attempt, MAX_STATUS_POLL_ATTEMPTS
                    );
                }
            }
        }

        Err(CoreError::ProviderTimeout {
            provider: PROVIDER,
            attempts: MAX_STATUS_POLL_ATTEMPTS,
        })
    }

    /// Plain GET of the finished video, expecting raw bytes
    async fn download(&self, url: &str) -> CoreResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CoreError::Internal(format!("network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::Internal(format!(
                "artifact fetch returned status {}",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CoreError::Internal(format!("failed to read artifact body: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl VideoProvider for HedraProvider {
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
        request: &GenerationRequest,
        request_id: &RequestId,
    ) -> CoreResult<VideoArtifact> {
        let api_key = self.api_key()?.to_string();
        let base = &self.config.base_url;

        let character: CreateCharacterResponse = self
            .post_json(
                &format!("{}/v1/characters", base),
                &api_key,
                &CreateCharacterRequest {
                    image: &request.reference_image,
                },
            )
            .await?;
        info!("[{}] hedra character created: {}", request_id, character.id);

        let audio_url = self.narration_audio(request).await?;

        let video: CreateVideoResponse = self
            .post_json(
                &format!("{}/v1/videos", base),
                &api_key,
                &CreateVideoRequest {
                    character_id: &character.id,
                    audio_url: &audio_url,
                    motion_prompt: &request.direction,
                    aspect_ratio: ASPECT_RATIO,
                },
            )
            .await?;
        info!("[{}] hedra video job submitted: {}", request_id, video.id);

        let download_url = self.await_completion(&video.id, &api_key, request_id).await?;
        let bytes = self.download(&download_url).await?;
        info!(
            "[{}] hedra artifact downloaded ({} bytes)",
            request_id,
            bytes.len()
        );

        Ok(VideoArtifact {
            bytes,
            mime_type: "video/mp4".to_string(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
