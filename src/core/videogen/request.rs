//! Request Normalization
//!
//! Reconciles two inbound field conventions, canonical (`scriptText`,
//! `direction`, `referenceImage`) and legacy (`prompt`, `imageUrl`), into
//! one canonical `GenerationRequest`. Pure transform; the inbound payload is
//! never mutated.

use serde::{Deserialize, Serialize};

use crate::core::{CoreError, CoreResult};

/// Literal marker opening the script segment of a legacy `prompt`.
///
/// Two client generations depend on these exact delimiters; do not change
/// them.
pub const SCRIPT_OPEN_MARKER: &str = ". Script: \"";
/// Literal marker closing the script segment of a legacy `prompt`.
pub const SCRIPT_CLOSE_MARKER: &str = "\". Style:";

/// Country applied when the caller omits one
pub const DEFAULT_COUNTRY: &str = "United States";
/// Video style applied when the caller omits one
pub const DEFAULT_VIDEO_STYLE: &str = "UGC Talking";
/// Voice accent applied when the caller omits one
pub const DEFAULT_VOICE_ACCENT: &str = "american";

/// Provider backend selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoProviderKind {
    #[default]
    Veo,
    Hedra,
    Kling,
}

impl VideoProviderKind {
    /// Parses a caller-supplied provider string.
    ///
    /// Unknown values select the default backend rather than failing, which
    /// matches how older clients omit the field entirely.
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "hedra" => Self::Hedra,
            "kling" => Self::Kling,
            _ => Self::Veo,
        }
    }
}

impl std::fmt::Display for VideoProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoProviderKind::Veo => write!(f, "veo"),
            VideoProviderKind::Hedra => write!(f, "hedra"),
            VideoProviderKind::Kling => write!(f, "kling"),
        }
    }
}

/// Loosely-typed inbound request body.
///
/// Both field conventions land here; nothing is required at this layer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVideoRequest {
    pub script_text: Option<String>,
    pub direction: Option<String>,
    pub reference_image: Option<String>,
    /// Legacy combined prompt carrying direction + script behind fixed markers
    pub prompt: Option<String>,
    /// Legacy name for the reference image
    pub image_url: Option<String>,
    pub country: Option<String>,
    pub provider: Option<String>,
    pub video_style: Option<String>,
    pub voice_accent: Option<String>,
    /// Opaque provider-specific overrides, passed through untouched
    pub style_params: Option<serde_json::Value>,
}

/// Canonical, provider-agnostic description of one video to generate
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    /// Spoken content, non-empty
    pub script_text: String,
    /// Camera/acting direction, may be empty
    pub direction: String,
    /// Reference image as a data URI
    pub reference_image: String,
    pub country: String,
    pub provider: VideoProviderKind,
    pub video_style: String,
    pub voice_accent: String,
    pub style_params: Option<serde_json::Value>,
}

/// Normalizes a raw inbound request into the canonical form.
///
/// Canonical fields win over legacy ones. A legacy `prompt` is split on the
/// fixed script markers: the text strictly between them is the script and
/// the text before the open marker is the direction. When the markers are
/// absent the whole prompt is treated as script text.
pub fn normalize(raw: &RawVideoRequest) -> CoreResult<GenerationRequest> {
    let (script_text, direction) = match (&raw.script_text, &raw.prompt) {
        (Some(script), _) => (
            script.clone(),
            raw.direction.clone().unwrap_or_default(),
        ),
        (None, Some(prompt)) => split_legacy_prompt(prompt),
        (None, None) => (String::new(), String::new()),
    };

    if script_text.trim().is_empty() {
        return Err(CoreError::MissingField("scriptText"));
    }

    let reference_image = raw
        .reference_image
        .as_deref()
        .filter(|s| !s.is_empty())
        .or_else(|| raw.image_url.as_deref().filter(|s| !s.is_empty()))
        .map(str::to_string)
        .ok_or(CoreError::MissingField("referenceImage"))?;

    Ok(GenerationRequest {
        script_text,
        direction,
        reference_image,
        country: raw
            .country
            .clone()
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
        provider: raw
            .provider
            .as_deref()
            .map(VideoProviderKind::parse)
            .unwrap_or_default(),
        video_style: raw
            .video_style
            .clone()
            .unwrap_or_else(|| DEFAULT_VIDEO_STYLE.to_string()),
        voice_accent: raw
            .voice_accent
            .clone()
            .unwrap_or_else(|| DEFAULT_VOICE_ACCENT.to_string()),
        style_params: raw.style_params.clone(),
    })
}

/// Splits a legacy combined prompt into `(script_text, direction)`.
fn split_legacy_prompt(prompt: &str) -> (String, String) {
    if let Some(open) = prompt.find(SCRIPT_OPEN_MARKER) {
        let after = &prompt[open + SCRIPT_OPEN_MARKER.len()..];
        if let Some(close) = after.find(SCRIPT_CLOSE_MARKER) {
            return (after[..close].to_string(), prompt[..open].to_string());
        }
    }
    (prompt.to_string(), String::new())
}

/// Splits a `data:<mime>;base64,<payload>` URI into MIME type and payload.
///
/// Inputs without a recognizable prefix are treated as a bare base64 payload
/// with an `image/png` MIME type.
pub(crate) fn parse_data_uri(input: &str) -> (String, &str) {
    if let Some(rest) = input.strip_prefix("data:") {
        if let Some((mime, payload)) = rest.split_once(";base64,") {
            if !mime.is_empty() {
                return (mime.to_string(), payload);
            }
            return ("image/png".to_string(), payload);
        }
    }
    ("image/png".to_string(), input)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with_image() -> RawVideoRequest {
        RawVideoRequest {
            reference_image: Some("data:image/png;base64,AAAA".to_string()),
            ..Default::default()
        }
    }

    // ========================================================================
    // Legacy Prompt Recovery Tests
    // ========================================================================

    #[test]
    fn test_legacy_prompt_with_both_markers() {
        let mut raw = raw_with_image();
        raw.prompt = Some(
            "Smile at the camera. Script: \"Try our new espresso blend\". Style: UGC Talking"
                .to_string(),
        );

        let request = normalize(&raw).unwrap();
        assert_eq!(request.script_text, "Try our new espresso blend");
        assert_eq!(request.direction, "Smile at the camera");
    }

    #[test]
    fn test_legacy_prompt_without_markers_is_all_script() {
        let mut raw = raw_with_image();
        raw.prompt = Some("Just read this line naturally".to_string());

        let request = normalize(&raw).unwrap();
        assert_eq!(request.script_text, "Just read this line naturally");
        assert_eq!(request.direction, "");
    }

    #[test]
    fn test_legacy_prompt_with_open_marker_only_is_all_script() {
        let mut raw = raw_with_image();
        raw.prompt = Some("Look left. Script: \"Hello there".to_string());

        let request = normalize(&raw).unwrap();
        assert_eq!(request.script_text, "Look left. Script: \"Hello there");
        assert_eq!(request.direction, "");
    }

    #[test]
    fn test_canonical_fields_win_over_legacy() {
        let mut raw = raw_with_image();
        raw.script_text = Some("Canonical script".to_string());
        raw.direction = Some("Canonical direction".to_string());
        raw.prompt = Some("Legacy. Script: \"Other\". Style: X".to_string());

        let request = normalize(&raw).unwrap();
        assert_eq!(request.script_text, "Canonical script");
        assert_eq!(request.direction, "Canonical direction");
    }

    // ========================================================================
    // Validation Tests
    // ========================================================================

    #[test]
    fn test_missing_script_fails() {
        let raw = raw_with_image();
        assert!(matches!(
            normalize(&raw),
            Err(CoreError::MissingField("scriptText"))
        ));
    }

    #[test]
    fn test_missing_reference_image_fails() {
        let raw = RawVideoRequest {
            script_text: Some("Hi".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            normalize(&raw),
            Err(CoreError::MissingField("referenceImage"))
        ));
    }

    #[test]
    fn test_whitespace_script_fails() {
        let mut raw = raw_with_image();
        raw.script_text = Some("   ".to_string());
        assert!(matches!(
            normalize(&raw),
            Err(CoreError::MissingField("scriptText"))
        ));
    }

    #[test]
    fn test_image_url_fallback() {
        let raw = RawVideoRequest {
            script_text: Some("Hi".to_string()),
            image_url: Some("https://cdn.example.com/face.png".to_string()),
            ..Default::default()
        };

        let request = normalize(&raw).unwrap();
        assert_eq!(request.reference_image, "https://cdn.example.com/face.png");
    }

    // ========================================================================
    // Defaults Tests
    // ========================================================================

    #[test]
    fn test_defaults_applied() {
        let mut raw = raw_with_image();
        raw.script_text = Some("Hi".to_string());

        let request = normalize(&raw).unwrap();
        assert_eq!(request.country, "United States");
        assert_eq!(request.provider, VideoProviderKind::Veo);
        assert_eq!(request.video_style, "UGC Talking");
        assert_eq!(request.voice_accent, "american");
        assert!(request.style_params.is_none());
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!(VideoProviderKind::parse("hedra"), VideoProviderKind::Hedra);
        assert_eq!(VideoProviderKind::parse("KLING"), VideoProviderKind::Kling);
        assert_eq!(VideoProviderKind::parse("veo"), VideoProviderKind::Veo);
        assert_eq!(
            VideoProviderKind::parse("something-else"),
            VideoProviderKind::Veo
        );
    }

    #[test]
    fn test_raw_request_deserializes_camel_case() {
        let json = r#"{
            "prompt": "Wave. Script: \"Hey\". Style: UGC",
            "imageUrl": "data:image/jpeg;base64,BBBB",
            "voiceAccent": "british",
            "styleParams": {"sampleCount": 2}
        }"#;
        let raw: RawVideoRequest = serde_json::from_str(json).unwrap();

        let request = normalize(&raw).unwrap();
        assert_eq!(request.script_text, "Hey");
        assert_eq!(request.voice_accent, "british");
        assert!(request.style_params.is_some());
    }

    // ========================================================================
    // Data URI Tests
    // ========================================================================

    #[test]
    fn test_parse_data_uri_with_mime() {
        let (mime, payload) = parse_data_uri("data:image/jpeg;base64,QUJD");
        assert_eq!(mime, "image/jpeg");
        assert_eq!(payload, "QUJD");
    }

    #[test]
    fn test_parse_data_uri_defaults_to_png() {
        let (mime, payload) = parse_data_uri("QUJD");
        assert_eq!(mime, "image/png");
        assert_eq!(payload, "QUJD");

        let (mime, payload) = parse_data_uri("data:;base64,QUJD");
        assert_eq!(mime, "image/png");
        assert_eq!(payload, "QUJD");
    }
}
