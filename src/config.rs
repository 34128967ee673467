//! Client configuration and application wiring.

use anyhow::Result;
use log::debug;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthApi, FileSessionStore, HttpSessionProvider};
use crate::catalog::CatalogApi;
use crate::http::{ApiClient, TerminalNavigator};
use crate::interaction::InteractionApi;

/// Backend host used when no URL is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Fixed client-side timeout; a hung call surfaces as a network failure.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
}

impl Config {
    pub fn new(api_url: Option<String>) -> Self {
        let base_url = api_url
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        debug!("Using backend at {}", base_url);
        Self { base_url }
    }

    pub fn build_client(&self) -> Result<Client> {
        Ok(Client::builder()
            .user_agent("reelrec-cli")
            .timeout(REQUEST_TIMEOUT)
            .build()?)
    }
}

/// All API surfaces wired onto one gateway client. Constructed once per
/// process with the configuration passed in.
pub struct App {
    pub catalog: CatalogApi,
    pub interactions: InteractionApi,
    pub auth: AuthApi,
    pub sessions: Arc<HttpSessionProvider>,
}

impl App {
    pub fn new(api_url: Option<String>) -> Result<Self> {
        let config = Config::new(api_url);
        let client = config.build_client()?;

        let store = FileSessionStore::from_env()?;
        let sessions = Arc::new(HttpSessionProvider::new(
            client.clone(),
            config.base_url.clone(),
            store,
        ));

        let api = ApiClient::new(
            client,
            config.base_url,
            sessions.clone(),
            Arc::new(TerminalNavigator),
        );

        Ok(Self {
            catalog: CatalogApi::new(api.clone()),
            interactions: InteractionApi::new(api.clone()),
            auth: AuthApi::new(api),
            sessions,
        })
    }
}
