//! Authenticated API gateway client, error taxonomy, and the login
//! redirect side effect.

mod client;
mod error;
mod navigate;

pub use client::ApiClient;
pub use error::{ApiError, response_detail};
pub use navigate::{Navigator, TerminalNavigator};

#[cfg(test)]
pub(crate) use navigate::MockNavigator;
