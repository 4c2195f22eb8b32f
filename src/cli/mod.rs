//! # CLI Module
//!
//! User-facing commands of Sortify. Each command validates the configuration,
//! talks to the user and delegates the real work to the [`crate::spotify`],
//! [`crate::pipeline`] and [`crate::management`] modules.
//!
//! ## Commands
//!
//! - [`auth`] - Runs the authorization flow and stores a fresh token
//! - [`sort`] - Sorts a playlist into a new `(Sorted)` copy, re-authorizing
//!   and restarting from scratch when the stored token has expired
//!
//! ## Usage Patterns
//!
//! ```bash
//! sortify                                   # prompt for a playlist URL
//! sortify sort --url https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M
//! sortify sort --dry-run                    # print the order, publish nothing
//! sortify auth                              # log in again
//! ```

mod auth;
mod sort;

pub use auth::auth;
pub use sort::{prompt_playlist_url, sort};
