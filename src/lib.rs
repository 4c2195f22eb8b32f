//! Sortify Library
//!
//! This library re-creates a Spotify playlist with its tracks reordered so that
//! songs sharing an album or an artist end up next to each other. It covers the
//! whole run: authorizing against Spotify, fetching every track of the source
//! playlist, distilling and ordering the tracks, and publishing the result as a
//! new private playlist.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints served by the local authorization callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy shared by every step
//! - `management` - Durable storage of the bearer token
//! - `pipeline` - One fetch, sort and publish attempt
//! - `server` - Local HTTP server for OAuth callbacks
//! - `sorter` - Track distillation and ordering
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use sortify::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> sortify::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env();
//!     cli::sort(config, None, false).await
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod pipeline;
pub mod server;
pub mod sorter;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::{Error, Res};

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Example
///
/// ```
/// info!("Getting tracks...");
/// info!("Sorting {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Access granted.");
/// success!("Added {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Used for unrecoverable errors
/// that require immediate program termination.
///
/// # Behavior
///
/// This macro will cause the program to exit immediately after printing
/// the error message. It should only be used for fatal errors where
/// recovery is not possible.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues or important information that users should notice.
///
/// # Example
///
/// ```
/// warning!("Source playlist has no cover image");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
