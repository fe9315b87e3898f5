//! Identity service client
//!
//! Bearer tokens are resolved against an external identity service; this
//! service never issues, refreshes, or stores tokens itself. The trait is the
//! seam used by the auth middleware so tests can substitute a static
//! verifier.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::config::IdentityConfig;

/// Resolves a bearer token to a user identifier.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Returns `Ok(Some(user_id))` for a token belonging to a known active
    /// identity, `Ok(None)` when the token is rejected, and `Err` when the
    /// identity service itself could not be consulted.
    async fn verify(&self, token: &str) -> Result<Option<Uuid>>;
}

/// User-info payload returned by the identity service
#[derive(Debug, Deserialize)]
struct IdentityUser {
    id: Uuid,
}

/// HTTP client for the identity service's user-info endpoint
pub struct HttpIdentityVerifier {
    client: reqwest::Client,
    user_endpoint: String,
    api_key: Option<String>,
}

impl HttpIdentityVerifier {
    pub fn new(config: &IdentityConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to build identity HTTP client")?;

        Ok(Self {
            client,
            user_endpoint: config.user_endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<Option<Uuid>> {
        let mut request = self
            .client
            .get(&self.user_endpoint)
            .bearer_auth(token)
            .header("accept", "application/json");

        if let Some(ref key) = self.api_key {
            request = request.header("apikey", key);
        }

        let response = request
            .send()
            .await
            .context("Identity service request failed")?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::FORBIDDEN
        {
            return Ok(None);
        }

        let response = response
            .error_for_status()
            .context("Identity service returned an error")?;

        let user: IdentityUser = response
            .json()
            .await
            .context("Failed to parse identity response")?;

        Ok(Some(user.id))
    }
}
