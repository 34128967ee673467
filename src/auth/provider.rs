//! Session provider backed by the backend's auth routes.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::http::{ApiError, response_detail};

use super::{FileSessionStore, Session, SessionProvider};

/// Auth endpoint response types (internal).
mod api {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct TokenPair {
        pub access_token: String,
        pub refresh_token: String,
        /// Seconds until the access token expires.
        pub expires_in: Option<i64>,
    }
}

/// Signs in, refreshes, and signs out against the backend auth routes,
/// persisting the resulting session through a [`FileSessionStore`].
///
/// Holds its own plain HTTP client so a refresh can never re-enter the
/// gateway's retry path.
pub struct HttpSessionProvider {
    client: Client,
    base_url: String,
    store: FileSessionStore,
}

impl HttpSessionProvider {
    pub fn new(client: Client, base_url: String, store: FileSessionStore) -> Self {
        Self {
            client,
            base_url,
            store,
        }
    }

    async fn post_token_request(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<api::TokenPair> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::NetworkUnreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response_detail(response).await;
            return Err(ApiError::from_status(status, detail).into());
        }

        response
            .json::<api::TokenPair>()
            .await
            .context("Failed to parse token response")
    }

    fn persist(&self, tokens: api::TokenPair) -> Result<Session> {
        let session = Session {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_at: tokens.expires_in.map(|secs| unix_now() + secs),
        };
        self.store.save(&session)?;
        Ok(session)
    }
}

#[async_trait]
impl SessionProvider for HttpSessionProvider {
    #[tracing::instrument(skip(self))]
    async fn current_session(&self) -> Result<Option<Session>> {
        self.store.load()
    }

    #[tracing::instrument(skip(self))]
    async fn refresh_session(&self) -> Result<Session> {
        let session = self
            .store
            .load()?
            .ok_or_else(|| anyhow!("No stored session to refresh"))?;

        debug!("Refreshing session...");
        let tokens = self
            .post_token_request(
                "/auth/refresh",
                &serde_json::json!({ "refresh_token": session.refresh_token }),
            )
            .await?;

        self.persist(tokens)
    }

    #[tracing::instrument(skip(self, password))]
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let tokens = self
            .post_token_request(
                "/auth/login",
                &serde_json::json!({ "email": email, "password": password }),
            )
            .await?;

        self.persist(tokens)
    }

    #[tracing::instrument(skip(self))]
    async fn sign_out(&self) -> Result<()> {
        if self.store.load()?.is_none() {
            warn!("sign_out called without a stored session");
        }
        self.store.clear()
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
