//! Typed JSON request helper with a uniform result envelope
//!
//! # Quick Start
//!
//! ```no_run
//! use jsonfetch::ApiClient;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Todo {
//!     id: u64,
//!     title: String,
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let api = ApiClient::default().with_base_url("https://api.example.com");
//!     let todos = api.get::<Vec<Todo>>("/todos").await;
//!     match todos.error {
//!         Some(error) => eprintln!("request failed: {error}"),
//!         None => println!("{:?}", todos.data),
//!     }
//! }
//! ```
//!
//! Every call returns an [`ApiResponse`] with exactly one of `data` or `error`
//! set; nothing is raised to the caller. While a call is in flight the shared
//! [`Loading`](loading::Loading) flag reads `true`:
//!
//! ```no_run
//! # use jsonfetch::ApiClient;
//! # async fn example(api: ApiClient) {
//! let mut spinner = api.loading().subscribe();
//! tokio::spawn(async move {
//!     while spinner.changed().await.is_ok() {
//!         println!("loading: {}", *spinner.borrow());
//!     }
//! });
//! let created: jsonfetch::ApiResponse<serde_json::Value> =
//!     api.post("/todos", &serde_json::json!({ "title": "write docs" })).await;
//! # }
//! ```
//!
//! # Features
//!
//! - **`hyper`** (default) - Uses [`hyper`](https://docs.rs/hyper) as the HTTP client (lightweight and fast).
//!
//! - **`reqwest`** - Alternative HTTP client using [`reqwest`](https://docs.rs/reqwest) (more features).
//!   To use reqwest instead: `default-features = false, features = ["reqwest"]`.
//!
//! - **`dotenvy`** - Enables loading the base URL from environment variables via [`dotenvy`](https://docs.rs/dotenvy).
//!   `ApiClient::new()` then reads `API_BASE_URL` from `.env` or the environment.
//!   Without this feature, use `ApiClient::default().with_base_url("...")` instead.

#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod loading;
pub mod processor;
pub mod request;
pub mod response;
pub mod token;

pub use client::BASE_URL_VAR;
pub use error::{Error, Result};
pub use request::{Method, Request};
pub use response::{ApiResponse, Response};
pub use token::TokenProvider;

/// The request executor with the default HTTP client.
///
/// - When `hyper` feature is enabled (default): uses `HyperClient`
/// - When `reqwest` feature is enabled: uses `reqwest::Client`
/// - Otherwise: use `client::ApiClient<YourClient>` directly
#[cfg(feature = "reqwest")]
pub type ApiClient = client::ApiClient<reqwest::Client>;

/// The request executor with the default HTTP client.
///
/// - When `hyper` feature is enabled (default): uses `HyperClient`
/// - When `reqwest` feature is enabled: uses `reqwest::Client`
/// - Otherwise: use `client::ApiClient<YourClient>` directly
#[cfg(all(feature = "hyper", not(feature = "reqwest")))]
pub type ApiClient = client::ApiClient<request::HyperClient>;

// When neither reqwest nor hyper is enabled, re-export the generic ApiClient
#[cfg(not(any(feature = "reqwest", feature = "hyper")))]
pub use client::ApiClient;

#[cfg(any(feature = "reqwest", feature = "hyper"))]
static STATIC_INSTANCE: std::sync::LazyLock<arc_swap::ArcSwap<ApiClient>> =
    std::sync::LazyLock::new(|| arc_swap::ArcSwap::from_pointee(ApiClient::default()));

/// Install the process-wide default executor, returning the previous one.
#[cfg(any(feature = "reqwest", feature = "hyper"))]
pub fn initialize(client: ApiClient) -> std::sync::Arc<ApiClient> {
    STATIC_INSTANCE.swap(std::sync::Arc::from(client))
}

/// Get the process-wide default executor.
#[cfg(any(feature = "reqwest", feature = "hyper"))]
pub fn instance() -> std::sync::Arc<ApiClient> {
    STATIC_INSTANCE.load().clone()
}
