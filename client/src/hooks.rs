//! User-facing side effects of API calls.
//!
//! A failed call is reported through a [`Notifier`]; an expired session
//! sends the user back to the sign-in route through a [`Navigator`]. The
//! defaults only log, so embedders plug in their own UI.

use tracing::{info, warn};

pub trait Notifier: Send + Sync {
    /// Show a server-reported failure to the user.
    fn alert(&self, message: &str);
}

pub trait Navigator: Send + Sync {
    fn redirect(&self, route: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        warn!(%message, "request failed");
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn redirect(&self, route: &str) {
        info!(%route, "session ended, sign in again");
    }
}
