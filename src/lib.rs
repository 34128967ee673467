pub mod auth;
pub mod catalog;
pub mod config;
pub mod http;
pub mod interaction;
