//! Account endpoints served by the backend itself.

use anyhow::Result;
use log::debug;
use serde::Deserialize;

use crate::http::ApiClient;

/// The profile the backend reports for an authenticated user.
#[derive(Deserialize, Debug, Clone)]
pub struct UserProfile {
    #[serde(alias = "_id", default)]
    pub id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Thin callers for `/auth/register` and `/auth/verify`. Sign-in and
/// refresh live on the session provider, which owns the stored tokens.
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Creates a new account.
    #[tracing::instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<UserProfile> {
        debug!("Registering account for {}", email);
        self.client
            .post_json(
                "/auth/register",
                &serde_json::json!({ "email": email, "password": password }),
            )
            .await
    }

    /// Verifies the current credential and returns the signed-in profile.
    #[tracing::instrument(skip(self))]
    pub async fn verify(&self) -> Result<UserProfile> {
        self.client.get_json("/auth/verify").await
    }
}
