//! Read operations against the movie catalog and recommendation routes.

use anyhow::Result;
use log::debug;
use serde_json::Value;

use crate::http::ApiClient;

use super::{Movie, MovieId, movies_from};

/// Thin callers of the gateway client for catalog reads. Every list
/// response passes through [`movies_from`] so callers always see one
/// consistent shape.
pub struct CatalogApi {
    client: ApiClient,
}

impl CatalogApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Lists movies with pagination.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, page: u32, limit: u32) -> Result<Vec<Movie>> {
        debug!("Listing movies page {} limit {}", page, limit);
        let payload: Value = self
            .client
            .get_json_with_query(
                "/movies",
                &[("page", &page.to_string()), ("limit", &limit.to_string())],
            )
            .await?;
        Ok(movies_from(payload))
    }

    /// Looks up a single movie. The identifier is validated locally and a
    /// malformed one fails before any network call.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Movie> {
        let id: MovieId = id.parse()?;
        self.client.get_json(&format!("/movies/{}", id)).await
    }

    /// Full-text search over the catalog.
    #[tracing::instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<Movie>> {
        let payload: Value = self
            .client
            .get_json_with_query("/movies/search", &[("q", query)])
            .await?;
        Ok(movies_from(payload))
    }

    /// Movies similar to the given one.
    #[tracing::instrument(skip(self))]
    pub async fn similar(&self, id: &str) -> Result<Vec<Movie>> {
        let id: MovieId = id.parse()?;
        let payload: Value = self
            .client
            .get_json(&format!("/recommendations/item/{}", id))
            .await?;
        Ok(movies_from(payload))
    }

    /// Currently popular movies.
    #[tracing::instrument(skip(self))]
    pub async fn popular(&self) -> Result<Vec<Movie>> {
        let payload: Value = self.client.get_json("/recommendations/popular").await?;
        Ok(movies_from(payload))
    }

    /// Personalized recommendations for the signed-in user.
    #[tracing::instrument(skip(self))]
    pub async fn for_user(&self) -> Result<Vec<Movie>> {
        let payload: Value = self.client.get_json("/recommendations/user").await?;
        Ok(movies_from(payload))
    }
}
