//! Marketing banner / countdown backend: CRUD over a single `banners`
//! table behind a uniform JSON envelope, plus the intern uploads app and
//! the countdown display logic shared with the front end.

pub mod app;
pub mod client;
pub mod config;
pub mod countdown;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use config::{Config, Environment};
pub use error::ApiError;
pub use state::AppState;
