//! Movie catalog types and the response-shape compatibility layer.

mod api;

use log::warn;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::http::ApiError;

pub use api::CatalogApi;

/// Wrapper key names the backend has used for list payloads across
/// versions, checked in order.
const MOVIE_LIST_KEYS: &[&str] = &["movies", "results", "items", "recommendations", "data"];

/// A validated movie identifier: exactly 24 hexadecimal characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MovieId(String);

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MovieId {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == 24 && s.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(MovieId(s.to_string()))
        } else {
            Err(ApiError::InvalidInput(format!(
                "movie identifier must be 24 hexadecimal characters, got '{}'",
                s
            )))
        }
    }
}

impl MovieId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A movie as reported by the backend.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Movie {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub overview: Option<String>,
}

/// Collapses the backend's drifting list shapes into one consistent list.
///
/// Accepts a bare JSON array, or an object wrapping the array under one of
/// the known key names; anything else yields an empty list with a warning.
// TODO: pin one canonical list shape once the backend stops returning both
// bare arrays and wrapped objects, then drop this fallback.
pub fn normalize_list<T: DeserializeOwned>(payload: Value, keys: &[&str]) -> Vec<T> {
    let items = match payload {
        Value::Array(items) => Value::Array(items),
        Value::Object(map) => {
            match keys
                .iter()
                .find_map(|key| map.get(*key).filter(|v| v.is_array()))
            {
                Some(list) => list.clone(),
                None => {
                    warn!(
                        "Response object matched no known list key {:?}; returning an empty list",
                        keys
                    );
                    return Vec::new();
                }
            }
        }
        _ => {
            warn!("Response was neither a list nor an object; returning an empty list");
            return Vec::new();
        }
    };

    match serde_json::from_value(items) {
        Ok(list) => list,
        Err(e) => {
            warn!("Failed to parse list items: {}; returning an empty list", e);
            Vec::new()
        }
    }
}

/// Normalizes a movie list payload.
pub fn movies_from(payload: Value) -> Vec<Movie> {
    normalize_list(payload, MOVIE_LIST_KEYS)
}
