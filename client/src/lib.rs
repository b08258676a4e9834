//! Async client for the event-registration API.
//!
//! Wraps `eventreg-core` with a reqwest transport, a persisted session and
//! pluggable alert/redirect hooks. Every call returns an `Envelope`.

mod calls;
pub mod client;
pub mod config;
pub mod error;
pub mod hooks;
mod transport;

pub use client::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use error::ClientError;
pub use hooks::{LogNavigator, LogNotifier, Navigator, Notifier};
