//! Typed user interactions recorded against movies.

use anyhow::Result;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::catalog::{MovieId, normalize_list};
use crate::http::ApiClient;

/// Wrapper key names seen on interaction list payloads.
const INTERACTION_LIST_KEYS: &[&str] = &["interactions", "results", "items", "data"];

/// The kinds of interaction the backend accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    View,
    Rate,
    Favorite,
    Watchlist,
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionKind::View => write!(f, "view"),
            InteractionKind::Rate => write!(f, "rate"),
            InteractionKind::Favorite => write!(f, "favorite"),
            InteractionKind::Watchlist => write!(f, "watchlist"),
        }
    }
}

impl FromStr for InteractionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "view" => Ok(InteractionKind::View),
            "rate" => Ok(InteractionKind::Rate),
            "favorite" => Ok(InteractionKind::Favorite),
            "watchlist" => Ok(InteractionKind::Watchlist),
            _ => anyhow::bail!(
                "Unknown interaction kind: {}. Expected view, rate, favorite, or watchlist.",
                s
            ),
        }
    }
}

/// A recorded interaction as reported by the backend.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Interaction {
    #[serde(alias = "_id", default)]
    pub id: Option<String>,
    pub movie_id: String,
    pub kind: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Serialize, Debug)]
struct NewInteraction<'a> {
    movie_id: &'a str,
    kind: InteractionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<f64>,
}

/// Write operations (and the user's own history) via the gateway client.
pub struct InteractionApi {
    client: ApiClient,
}

impl InteractionApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Records an interaction. The movie identifier is validated locally
    /// first; errors are logged and rethrown, never swallowed.
    #[tracing::instrument(skip(self))]
    pub async fn record(
        &self,
        movie_id: &str,
        kind: InteractionKind,
        value: Option<f64>,
    ) -> Result<Interaction> {
        let movie_id: MovieId = movie_id.parse()?;
        let body = NewInteraction {
            movie_id: movie_id.as_str(),
            kind,
            value,
        };
        let result = self.client.post_json("/interactions", &body).await;
        if let Err(ref e) = result {
            warn!(
                "Failed to record {} interaction for {}: {}",
                kind, movie_id, e
            );
        }
        result
    }

    /// The signed-in user's interaction history.
    #[tracing::instrument(skip(self))]
    pub async fn list_mine(&self) -> Result<Vec<Interaction>> {
        let payload: Value = self.client.get_json("/interactions/me").await?;
        Ok(normalize_list(payload, INTERACTION_LIST_KEYS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MockSessionProvider, Session};
    use crate::http::{ApiError, MockNavigator};
    use mockito::Matcher;
    use std::sync::Arc;

    fn api(url: &str) -> InteractionApi {
        let mut sessions = MockSessionProvider::new();
        sessions.expect_current_session().returning(|| {
            Ok(Some(Session {
                access_token: "tok".into(),
                refresh_token: "ref".into(),
                expires_at: None,
            }))
        });
        InteractionApi::new(ApiClient::new(
            reqwest::Client::new(),
            url.to_string(),
            Arc::new(sessions),
            Arc::new(MockNavigator::new()),
        ))
    }

    #[test]
    fn test_interaction_kind_parse() {
        assert_eq!(
            "view".parse::<InteractionKind>().unwrap(),
            InteractionKind::View
        );
        assert_eq!(
            "Rate".parse::<InteractionKind>().unwrap(),
            InteractionKind::Rate
        );
        assert_eq!(
            "favorite".parse::<InteractionKind>().unwrap(),
            InteractionKind::Favorite
        );
        assert_eq!(
            "watchlist".parse::<InteractionKind>().unwrap(),
            InteractionKind::Watchlist
        );
        assert!("like".parse::<InteractionKind>().is_err());
    }

    #[test]
    fn test_interaction_kind_display_and_serialize() {
        assert_eq!(InteractionKind::Watchlist.to_string(), "watchlist");
        assert_eq!(
            serde_json::to_value(InteractionKind::Rate).unwrap(),
            serde_json::json!("rate")
        );
    }

    #[tokio::test]
    async fn test_record_posts_typed_interaction() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/interactions")
            .match_header("authorization", "Bearer tok")
            .match_body(Matcher::Json(serde_json::json!({
                "movie_id": "507f1f77bcf86cd799439011",
                "kind": "rate",
                "value": 4.0
            })))
            .with_status(201)
            .with_body(
                r#"{"_id":"i1","movie_id":"507f1f77bcf86cd799439011","kind":"rate","value":4.0}"#,
            )
            .create_async()
            .await;

        let interaction = api(&server.url())
            .record("507f1f77bcf86cd799439011", InteractionKind::Rate, Some(4.0))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(interaction.id.as_deref(), Some("i1"));
        assert_eq!(interaction.value, Some(4.0));
    }

    #[tokio::test]
    async fn test_record_omits_value_when_absent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/interactions")
            .match_body(Matcher::Json(serde_json::json!({
                "movie_id": "507f1f77bcf86cd799439011",
                "kind": "view"
            })))
            .with_status(201)
            .with_body(r#"{"movie_id":"507f1f77bcf86cd799439011","kind":"view"}"#)
            .create_async()
            .await;

        api(&server.url())
            .record("507f1f77bcf86cd799439011", InteractionKind::View, None)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_record_invalid_id_fails_before_any_network_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = api(&server.url())
            .record("bad", InteractionKind::View, None)
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_record_propagates_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/interactions")
            .with_status(500)
            .with_body(r#"{"detail":"write failed"}"#)
            .create_async()
            .await;

        let err = api(&server.url())
            .record("507f1f77bcf86cd799439011", InteractionKind::View, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::ServerError(_))
        ));
        assert!(err.to_string().contains("write failed"));
    }

    #[tokio::test]
    async fn test_list_mine_normalizes_wrapped_payload() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/interactions/me")
            .with_status(200)
            .with_body(
                r#"{"interactions":[{"movie_id":"a","kind":"view"},{"movie_id":"b","kind":"rate","value":5.0}]}"#,
            )
            .create_async()
            .await;

        let interactions = api(&server.url()).list_mine().await.unwrap();
        assert_eq!(interactions.len(), 2);
        assert_eq!(interactions[1].value, Some(5.0));
    }
}
