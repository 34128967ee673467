//! Session credentials and the authentication provider seam.
//!
//! The gateway client borrows the current session per request and never
//! mutates it; the only write path is `refresh_session`, which the provider
//! owns end to end.

mod api;
mod provider;
mod store;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use api::{AuthApi, UserProfile};
pub use provider::HttpSessionProvider;
pub use store::FileSessionStore;

/// An access/refresh token pair with a server-defined expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp of access token expiry, when the server reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

/// The authentication provider interface the gateway client consumes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Current session, or None when signed out. Asynchronous: may involve
    /// a storage round-trip.
    async fn current_session(&self) -> Result<Option<Session>>;

    /// Exchanges the stored refresh token for a new session.
    async fn refresh_session(&self) -> Result<Session>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session>;

    async fn sign_out(&self) -> Result<()>;
}
