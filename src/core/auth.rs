//! Cloud Access Credentials
//!
//! The Veo backend runs inside a cloud project and authenticates with a
//! bearer token. Credential acquisition (service accounts, metadata servers,
//! token refresh) is owned by the embedding application; this core only
//! consumes an `AuthProvider` that yields a token and a project identifier.
//!
//! Credentials are obtained fresh per request; any caching lives inside the
//! provider implementation.

use async_trait::async_trait;

use crate::core::{CoreError, CoreResult};

/// Bearer credentials for one cloud project
#[derive(Clone)]
pub struct GcpAccess {
    /// OAuth bearer token for the prediction API
    pub bearer_token: String,
    /// Target project identifier
    pub project_id: String,
}

impl std::fmt::Debug for GcpAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcpAccess")
            .field("bearer_token", &redact(&self.bearer_token))
            .field("project_id", &self.project_id)
            .finish()
    }
}

/// Supplies bearer credentials for the Veo backend
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Returns credentials for the target project. Called once per request.
    async fn access(&self) -> CoreResult<GcpAccess>;
}

/// Auth provider backed by fixed values.
///
/// Suitable for tests and short-lived jobs where the embedding application
/// already holds a valid token. Construction fails when either value is
/// missing so a misconfigured deployment surfaces immediately instead of
/// silently disabling the Veo path.
pub struct StaticAuthProvider {
    access: GcpAccess,
}

impl StaticAuthProvider {
    /// Creates a provider from explicit credentials.
    pub fn new(
        bearer_token: impl Into<String>,
        project_id: impl Into<String>,
    ) -> CoreResult<Self> {
        let bearer_token = bearer_token.into();
        let project_id = project_id.into();

        if bearer_token.is_empty() {
            return Err(CoreError::ConfigurationError(
                "bearer token cannot be empty".to_string(),
            ));
        }
        if project_id.is_empty() {
            return Err(CoreError::ConfigurationError(
                "project id cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            access: GcpAccess {
                bearer_token,
                project_id,
            },
        })
    }

    /// Reads `GCP_ACCESS_TOKEN` and `GCP_PROJECT_ID` from the environment.
    pub fn from_env() -> CoreResult<Self> {
        let bearer_token = std::env::var("GCP_ACCESS_TOKEN").map_err(|_| {
            CoreError::ConfigurationError("GCP_ACCESS_TOKEN is not set".to_string())
        })?;
        let project_id = std::env::var("GCP_PROJECT_ID").map_err(|_| {
            CoreError::ConfigurationError("GCP_PROJECT_ID is not set".to_string())
        })?;
        Self::new(bearer_token, project_id)
    }
}

impl std::fmt::Debug for StaticAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticAuthProvider")
            .field("access", &self.access)
            .finish()
    }
}

#[async_trait]
impl AuthProvider for StaticAuthProvider {
    async fn access(&self) -> CoreResult<GcpAccess> {
        Ok(self.access.clone())
    }
}

/// Returns a redacted preview of a secret for logging
pub(crate) fn redact(value: &str) -> String {
    if value.len() < 12 {
        "*".repeat(value.len())
    } else {
        format!("{}...{}", &value[..4], &value[value.len() - 4..])
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provider_yields_its_credentials() {
        let provider = StaticAuthProvider::new("token-abc", "project-1").unwrap();
        let access = provider.access().await.unwrap();
        assert_eq!(access.bearer_token, "token-abc");
        assert_eq!(access.project_id, "project-1");
    }

    #[test]
    fn test_static_provider_rejects_missing_values() {
        assert!(matches!(
            StaticAuthProvider::new("", "project-1"),
            Err(CoreError::ConfigurationError(_))
        ));
        assert!(matches!(
            StaticAuthProvider::new("token", ""),
            Err(CoreError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_redact() {
        assert_eq!(redact("short"), "*****");
        assert_eq!(redact("ya29.abcdefghijkl"), "ya29...ijkl");
    }

    #[test]
    fn test_debug_never_prints_the_token() {
        let provider = StaticAuthProvider::new("ya29.super-secret-token", "project-1").unwrap();
        let rendered = format!("{:?}", provider);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("project-1"));
    }
}
