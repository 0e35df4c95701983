//! Veo Video Generation Provider
//!
//! Adapter for the Veo long-running prediction API. Submits one prediction
//! instance, drives the remote operation through the bounded poller, and
//! pulls the artifact out through the extraction fallback chain.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::core::auth::{AuthProvider, GcpAccess};
use crate::core::videogen::accents;
use crate::core::videogen::artifact::{ArtifactExtractor, VideoArtifact};
use crate::core::videogen::poller::{poll_until_done, Operation, PollPolicy};
use crate::core::videogen::providers::{VeoConfig, VideoProvider};
use crate::core::videogen::request::{parse_data_uri, GenerationRequest};
use crate::core::{CoreError, CoreResult, RequestId};

// =============================================================================
// Constants
// =============================================================================

/// Provider name in logs and error attribution
const PROVIDER: &str = "veo";

/// Fixed clip length in seconds
const DURATION_SECONDS: u8 = 8;
/// Fixed portrait aspect ratio
const ASPECT_RATIO: &str = "9:16";
/// Fixed output resolution
const RESOLUTION: &str = "720p";

/// Style template for the default "UGC Talking" style
const STYLE_UGC_TALKING: &str = "Filmed like authentic selfie-style user-generated content on a \
     handheld smartphone, natural lighting, direct eye contact with the camera.";
/// Style template for the "Studio Presenter" style
const STYLE_STUDIO_PRESENTER: &str = "Filmed as a polished studio presentation with soft key \
     lighting, a clean background and steady framing.";
/// Style template for the "Cinematic" style
const STYLE_CINEMATIC: &str = "Filmed cinematically with shallow depth of field, graded color \
     and smooth camera movement.";

// =============================================================================
// API Request Types
// =============================================================================

#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: Value,
}

#[derive(Debug, Serialize)]
struct PredictInstance {
    prompt: String,
    image: InstanceImage,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InstanceImage {
    bytes_base64_encoded: String,
    mime_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    aspect_ratio: &'static str,
    resize_mode: &'static str,
    sample_count: u8,
    duration_seconds: u8,
    resolution: &'static str,
    person_generation: &'static str,
    seed: u32,
    negative_prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FetchOperationRequest<'a> {
    operation_name: &'a str,
}

// =============================================================================
// VeoProvider
// =============================================================================

/// Veo long-running prediction provider
pub struct VeoProvider {
    client: reqwest::Client,
    auth: Arc<dyn AuthProvider>,
    config: VeoConfig,
    pub(crate) poll_policy: PollPolicy,
}

impl VeoProvider {
    pub fn new(client: reqwest::Client, auth: Arc<dyn AuthProvider>, config: VeoConfig) -> Self {
        Self {
            client,
            auth,
            config,
            poll_policy: PollPolicy::default(),
        }
    }

    fn submit_url(&self, project_id: &str) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:predictLongRunning",
            self.config.api_root(),
            project_id,
            self.config.location,
            self.config.model_id
        )
    }

    fn poll_url(&self, project_id: &str) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:fetchPredictOperation",
            self.config.api_root(),
            project_id,
            self.config.location,
            self.config.model_id
        )
    }

    /// Synthesizes the full prediction prompt from the canonical request.
    fn build_prompt(request: &GenerationRequest) -> String {
        let mut parts = vec![format!(
            "A person with a {} accent speaks directly to the camera and says: \"{}\".",
            request.voice_accent, request.script_text
        )];
        if !request.direction.is_empty() {
            parts.push(request.direction.clone());
        }
        parts.push(Self::style_modifier(&request.video_style).to_string());
        parts.push(format!("Set in {}.", request.country));
        parts.push(format!(
            "{}-second video, {} vertical aspect ratio.",
            DURATION_SECONDS, ASPECT_RATIO
        ));
        parts.join(" ")
    }

    /// Maps a video style key to its fixed prompt template
    fn style_modifier(style: &str) -> &'static str {
        match style {
            "Studio Presenter" => STYLE_STUDIO_PRESENTER,
            "Cinematic" => STYLE_CINEMATIC,
            _ => STYLE_UGC_TALKING,
        }
    }

    /// Builds the fixed generation parameters, then applies any caller
    /// `styleParams` overrides on top.
    fn build_parameters(request: &GenerationRequest) -> CoreResult<Value> {
        let mut parameters = serde_json::to_value(PredictParameters {
            aspect_ratio: ASPECT_RATIO,
            resize_mode: "crop",
            sample_count: 1,
            duration_seconds: DURATION_SECONDS,
            resolution: RESOLUTION,
            person_generation: "allow_adult",
            seed: accents::seed_for(&request.voice_accent),
            negative_prompt: accents::negative_prompt_for(&request.voice_accent),
        })?;

        if let Some(Value::Object(overrides)) = &request.style_params {
            if let Value::Object(params) = &mut parameters {
                for (key, value) in overrides {
                    params.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(parameters)
    }

    /// Submits the prediction and returns the operation name.
    async fn submit(
        &self,
        request: &GenerationRequest,
        access: &GcpAccess,
    ) -> CoreResult<String> {
        let (mime_type, payload) = parse_data_uri(&request.reference_image);
        let body = PredictRequest {
            instances: vec![PredictInstance {
                prompt: Self::build_prompt(request),
                image: InstanceImage {
                    bytes_base64_encoded: payload.to_string(),
                    mime_type,
                },
            }],
            parameters: Self::build_parameters(request)?,
        };

        let url = self.submit_url(&access.project_id);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", access.bearer_token))
            .json(&body)
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

        let operation: Operation = serde_json::from_str(&text)?;
        if operation.error.is_some() {
            return Err(CoreError::ProviderSubmit {
                provider: PROVIDER,
                status: status.as_u16(),
                body: text,
            });
        }

        operation.name.ok_or_else(|| CoreError::ProviderSubmit {
            provider: PROVIDER,
            status: status.as_u16(),
            body: text,
        })
    }

    /// Issues one poll call for the operation.
    async fn poll_once(
        &self,
        poll_url: &str,
        operation_name: &str,
        bearer_token: &str,
    ) -> CoreResult<Operation> {
        let response = self
            .client
            .post(poll_url)
            .header("Authorization", format!("Bearer {}", bearer_token))
            .json(&FetchOperationRequest { operation_name })
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
}

#[async_trait]
impl VideoProvider for VeoProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn is_available(&self) -> bool {
        // Credentials are obtained per request; availability is decided there.
        true
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        request_id: &RequestId,
    ) -> CoreResult<VideoArtifact> {
        let access = self.auth.access().await?;

        let operation_name = self.submit(request, &access).await?;
        info!("[{}] veo operation submitted: {}", request_id, operation_name);

        let poll_url = self.poll_url(&access.project_id);
        let response = poll_until_done(PROVIDER, &operation_name, self.poll_policy, || {
            self.poll_once(&poll_url, &operation_name, &access.bearer_token)
        })
        .await?;

        let extractor = ArtifactExtractor::new(&self.client, Some(&access.bearer_token));
        let artifact = extractor.extract(&response).await?;
        info!(
            "[{}] veo artifact extracted ({} bytes, {})",
            request_id,
            artifact.bytes.len(),
            artifact.mime_type
        );
        Ok(artifact)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::StaticAuthProvider;
    use crate::core::videogen::request::{RawVideoRequest, normalize};
    use std::time::Duration;

    fn canonical_request() -> GenerationRequest {
        normalize(&RawVideoRequest {
            script_text: Some("Try our new espresso blend".to_string()),
            direction: Some("Smile warmly.".to_string()),
            reference_image: Some("data:image/jpeg;base64,QUJD".to_string()),
            voice_accent: Some("south-african".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    fn provider_against(server: &mockito::Server) -> VeoProvider {
        let auth = Arc::new(StaticAuthProvider::new("test-token", "test-project").unwrap());
        let config = VeoConfig::default().with_base_url(server.url());
        let mut provider = VeoProvider::new(reqwest::Client::new(), auth, config);
        provider.poll_policy = PollPolicy {
            interval: Duration::ZERO,
            max_attempts: 60,
        };
        provider
    }

    const SUBMIT_PATH: &str = "/v1/projects/test-project/locations/us-central1/publishers/google/models/veo-2.0-generate-001:predictLongRunning";
    const POLL_PATH: &str = "/v1/projects/test-project/locations/us-central1/publishers/google/models/veo-2.0-generate-001:fetchPredictOperation";

    // ========================================================================
    // Prompt Synthesis Tests
    // ========================================================================

    #[test]
    fn test_build_prompt_contains_every_clause() {
        let prompt = VeoProvider::build_prompt(&canonical_request());
        assert!(prompt.contains("south-african accent"));
        assert!(prompt.contains("\"Try our new espresso blend\""));
        assert!(prompt.contains("Smile warmly."));
        assert!(prompt.contains("user-generated content"));
        assert!(prompt.contains("Set in United States."));
        assert!(prompt.contains("8-second video, 9:16 vertical aspect ratio."));
    }

    #[test]
    fn test_style_modifier_selection() {
        assert!(VeoProvider::style_modifier("Studio Presenter").contains("studio"));
        assert!(VeoProvider::style_modifier("Cinematic").contains("cinematically"));
        // Unknown styles fall back to the UGC template.
        assert!(VeoProvider::style_modifier("UGC Talking").contains("user-generated"));
        assert!(VeoProvider::style_modifier("whatever").contains("user-generated"));
    }

    // ========================================================================
    // Parameter Tests
    // ========================================================================

    #[test]
    fn test_build_parameters_fixed_values_and_accent_tables() {
        let parameters = VeoProvider::build_parameters(&canonical_request()).unwrap();
        assert_eq!(parameters["aspectRatio"], "9:16");
        assert_eq!(parameters["resizeMode"], "crop");
        assert_eq!(parameters["sampleCount"], 1);
        assert_eq!(parameters["durationSeconds"], 8);
        assert_eq!(parameters["resolution"], "720p");
        assert_eq!(parameters["personGeneration"], "allow_adult");
        assert_eq!(parameters["seed"], 56789);
        let negative = parameters["negativePrompt"].as_str().unwrap();
        assert!(negative.contains("american accent"));
        assert!(negative.contains("indian accent"));
    }

    #[test]
    fn test_style_params_override_parameters() {
        let mut request = canonical_request();
        request.style_params = Some(serde_json::json!({"sampleCount": 2, "fps": 24}));

        let parameters = VeoProvider::build_parameters(&request).unwrap();
        assert_eq!(parameters["sampleCount"], 2);
        assert_eq!(parameters["fps"], 24);
        // Untouched fixed values survive the merge.
        assert_eq!(parameters["durationSeconds"], 8);
    }

    // ========================================================================
    // Submit Tests
    // ========================================================================

    #[tokio::test]
    async fn test_submit_rejection_carries_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", SUBMIT_PATH)
            .with_status(429)
            .with_body("rate limit exceeded")
            .create_async()
            .await;

        let provider = provider_against(&server);
        let result = provider
            .generate(&canonical_request(), &RequestId::mint())
            .await;

        match result {
            Err(CoreError::ProviderSubmit { status, body, .. }) => {
                assert_eq!(status, 429);
                assert!(body.contains("rate limit exceeded"));
            }
            other => panic!("expected ProviderSubmit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_error_field_is_fatal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", SUBMIT_PATH)
            .with_status(200)
            .with_body(r#"{"error":{"code":3,"message":"invalid image"}}"#)
            .create_async()
            .await;

        let provider = provider_against(&server);
        let result = provider
            .generate(&canonical_request(), &RequestId::mint())
            .await;

        match result {
            Err(CoreError::ProviderSubmit { status, body, .. }) => {
                assert_eq!(status, 200);
                assert!(body.contains("invalid image"));
            }
            other => panic!("expected ProviderSubmit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_without_operation_name_is_fatal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", SUBMIT_PATH)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let provider = provider_against(&server);
        let result = provider
            .generate(&canonical_request(), &RequestId::mint())
            .await;

        assert!(matches!(result, Err(CoreError::ProviderSubmit { .. })));
    }

    // ========================================================================
    // Poll Tests
    // ========================================================================

    #[tokio::test]
    async fn test_poll_transport_failure_is_fatal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", SUBMIT_PATH)
            .with_status(200)
            .with_body(r#"{"name":"projects/test-project/operations/op-1"}"#)
            .create_async()
            .await;
        let poll = server
            .mock("POST", POLL_PATH)
            .with_status(503)
            .with_body("backend unavailable")
            .expect(1)
            .create_async()
            .await;

        let provider = provider_against(&server);
        let result = provider
            .generate(&canonical_request(), &RequestId::mint())
            .await;

        match result {
            Err(CoreError::ProviderPoll { status, .. }) => assert_eq!(status, 503),
            other => panic!("expected ProviderPoll, got {:?}", other),
        }
        // Not retried: exactly one poll call went out.
        poll.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_happy_path_with_inline_artifact() {
        let mut server = mockito::Server::new_async().await;
        let submit = server
            .mock("POST", SUBMIT_PATH)
            .with_status(200)
            .with_body(r#"{"name":"projects/test-project/operations/op-1"}"#)
            .create_async()
            .await;
        let poll = server
            .mock("POST", POLL_PATH)
            .with_status(200)
            .with_body(r#"{"done":true,"response":{"videos":[{"bytesBase64Encoded":"Zm9v"}]}}"#)
            .create_async()
            .await;

        let provider = provider_against(&server);
        let artifact = provider
            .generate(&canonical_request(), &RequestId::mint())
            .await
            .unwrap();

        assert_eq!(artifact.bytes, b"foo");
        assert_eq!(artifact.mime_type, "video/mp4");
        submit.assert_async().await;
        poll.assert_async().await;
    }

    // ========================================================================
    // URL Tests
    // ========================================================================

    #[test]
    fn test_url_building() {
        let auth = Arc::new(StaticAuthProvider::new("t", "proj-9").unwrap());
        let provider = VeoProvider::new(reqwest::Client::new(), auth, VeoConfig::default());
        assert_eq!(
            provider.submit_url("proj-9"),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/proj-9/locations/us-central1/publishers/google/models/veo-2.0-generate-001:predictLongRunning"
        );
        assert!(provider.poll_url("proj-9").ends_with(":fetchPredictOperation"));
    }
}
