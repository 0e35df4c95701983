//! Artifact Extraction
//!
//! Different API revisions and regions return the generated video under
//! either `videos` or `predictions`, and as either an inline base64 payload
//! or a storage reference. The extractor tolerates all four combinations
//! through one ordered fallback chain so callers never branch on response
//! shape.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::{CoreError, CoreResult};

/// MIME type assumed when the response does not carry one
const DEFAULT_VIDEO_MIME: &str = "video/mp4";

/// A generated video payload
#[derive(Debug, Clone)]
pub struct VideoArtifact {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Locates the generated video in a completed operation response
pub struct ArtifactExtractor<'a> {
    client: &'a reqwest::Client,
    bearer_token: Option<&'a str>,
}

impl<'a> ArtifactExtractor<'a> {
    pub fn new(client: &'a reqwest::Client, bearer_token: Option<&'a str>) -> Self {
        Self {
            client,
            bearer_token,
        }
    }

    /// Ordered fallback search over the response body; first match wins.
    ///
    /// 1. `videos[0].gcsUri`: fetch the object; fetch failure falls through
    /// 2. `videos[0].bytesBase64Encoded`: decode inline
    /// 3. `predictions[0].bytesBase64Encoded`: legacy shape, decode inline
    /// 4. `predictions[0].gcsUri`: legacy shape, fetch the object
    ///
    /// When nothing matches the error carries the full response body for
    /// diagnosis.
    pub async fn extract(&self, response: &Value) -> CoreResult<VideoArtifact> {
        if let Some(uri) = str_at(response, "/videos/0/gcsUri") {
            match self.fetch(uri).await {
                Ok(bytes) => {
                    return Ok(VideoArtifact {
                        bytes,
                        mime_type: mime_at(response, "/videos/0/mimeType"),
                    })
                }
                Err(e) => warn!(
                    "artifact fetch from {} failed, trying inline payloads: {}",
                    uri, e
                ),
            }
        }

        if let Some(encoded) = str_at(response, "/videos/0/bytesBase64Encoded") {
            return Ok(VideoArtifact {
                bytes: decode(encoded)?,
                mime_type: mime_at(response, "/videos/0/mimeType"),
            });
        }

        if let Some(encoded) = str_at(response, "/predictions/0/bytesBase64Encoded") {
            return Ok(VideoArtifact {
                bytes: decode(encoded)?,
                mime_type: mime_at(response, "/predictions/0/mimeType"),
            });
        }

        if let Some(uri) = str_at(response, "/predictions/0/gcsUri") {
            match self.fetch(uri).await {
                Ok(bytes) => {
                    return Ok(VideoArtifact {
                        bytes,
                        mime_type: mime_at(response, "/predictions/0/mimeType"),
                    })
                }
                Err(e) => warn!("artifact fetch from {} failed: {}", uri, e),
            }
        }

        Err(CoreError::NoArtifact {
            response: response.to_string(),
        })
    }

    /// Plain GET of a storage URI or CDN URL, expecting raw bytes
    async fn fetch(&self, uri: &str) -> CoreResult<Vec<u8>> {
        let url = to_https_url(uri);

        let mut request = self.client.get(&url);
        if let Some(token) = self.bearer_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request
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

        debug!("fetched {} artifact bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}

/// Rewrites `gs://bucket/object` into its HTTPS object URL
fn to_https_url(uri: &str) -> String {
    match uri.strip_prefix("gs://") {
        Some(rest) => format!("https://storage.googleapis.com/{}", rest),
        None => uri.to_string(),
    }
}

fn str_at<'v>(value: &'v Value, pointer: &str) -> Option<&'v str> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn mime_at(value: &Value, pointer: &str) -> String {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_VIDEO_MIME)
        .to_string()
}

fn decode(encoded: &str) -> CoreResult<Vec<u8>> {
    BASE64
        .decode(encoded)
        .map_err(|e| CoreError::Internal(format!("invalid base64 video payload: {}", e)))
}

// ============================================================================
// Tests
// ============================================================================
