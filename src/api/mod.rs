//! # API Module
//!
//! HTTP endpoints served by the local callback server while the user
//! authorizes Sortify in the browser.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives the redirect from Spotify's authorization page,
//!   checks the `state` parameter, exchanges the code for a bearer token and
//!   hands the outcome to the waiting authorization flow.
//! - [`health`] - Reports that the server is up and whether the authorization
//!   redirect has arrived yet.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use sortify::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::{ACCESS_GRANTED, CallbackState, LOGIN_FAILED, STATE_MISMATCH, callback};
pub use health::health;
