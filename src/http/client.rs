//! The authenticated API gateway client all backend calls pass through.

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::auth::SessionProvider;

use super::error::{ApiError, response_detail};
use super::navigate::Navigator;

/// Wraps outbound HTTP calls to the backend: injects the bearer credential
/// per request and transparently recovers from an expired credential by
/// refreshing the session and retrying the original request exactly once.
///
/// Constructed once per process with its configuration passed in; there is
/// no module-level singleton, so tests run against mock transports.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    sessions: Arc<dyn SessionProvider>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(
        client: Client,
        base_url: String,
        sessions: Arc<dyn SessionProvider>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            client,
            base_url,
            sessions,
            navigator,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs a GET request and deserializes the JSON response.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.execute(Method::GET, path, &[], None).await?;
        response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }

    /// Performs a GET request with query parameters and deserializes the
    /// JSON response.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self.execute(Method::GET, path, query, None).await?;
        response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }

    /// Performs a POST request with a JSON body and deserializes the JSON
    /// response.
    #[tracing::instrument(skip(self, body))]
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        // Captured as a Value so an eventual retry resends the same body.
        let body = serde_json::to_value(body).context("Failed to serialize request body")?;
        let response = self.execute(Method::POST, path, &[], Some(&body)).await?;
        response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }

    /// Dispatches a request and applies the response state machine.
    ///
    /// At most one refresh-and-retry cycle occurs per original request:
    /// `already_retried` flips before the retry is issued, so a second 401
    /// on the retried call can never trigger another refresh.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&serde_json::Value>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut already_retried = false;

        loop {
            let response = match self.dispatch(&method, &url, query, body).await {
                Ok(response) => response,
                // No response received at all: connect failure or timeout.
                Err(e) => return Err(ApiError::NetworkUnreachable(e.to_string()).into()),
            };

            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            let detail = response_detail(response).await;

            if status == StatusCode::UNAUTHORIZED && !already_retried {
                already_retried = true;
                match self.sessions.refresh_session().await {
                    Ok(_) => {
                        debug!("Session refreshed, retrying {} {}", method, path);
                        continue;
                    }
                    Err(e) => {
                        warn!("Session refresh failed: {}", e);
                        self.navigator.redirect_to_login();
                        return Err(ApiError::from_status(status, detail).into());
                    }
                }
            }

            if status == StatusCode::UNAUTHORIZED {
                self.navigator.redirect_to_login();
            } else if status == StatusCode::FORBIDDEN
                && matches!(self.sessions.current_session().await, Ok(None))
            {
                self.navigator.redirect_to_login();
            }

            return Err(ApiError::from_status(status, detail).into());
        }
    }

    /// Attaches the current credential and sends one request. The session
    /// lookup awaits before dispatch; a lookup failure never blocks the
    /// call, the request just goes out unauthenticated.
    async fn dispatch(
        &self,
        method: &Method,
        url: &str,
        query: &[(&str, &str)],
        body: Option<&serde_json::Value>,
    ) -> reqwest::Result<Response> {
        let token = match self.sessions.current_session().await {
            Ok(Some(session)) => Some(session.access_token),
            Ok(None) => None,
            Err(e) => {
                warn!("Session lookup failed, sending unauthenticated: {}", e);
                None
            }
        };

        let mut request = self.client.request(method.clone(), url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    request = request.header(AUTHORIZATION, value);
                }
                Err(e) => warn!("Skipping malformed bearer credential: {}", e),
            }
        }

        request.send().await
    }
}
