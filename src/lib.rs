mod activity;
mod clock;
mod config;
mod controller;
mod error;
mod gate;
mod models;
mod store;
mod watchdog;

#[cfg(test)]
pub mod test_utils;

pub use activity::{ActivitySignal, ActivityTracker};
pub use clock::{Clock, SystemClock};
pub use config::{Config, LoggingConfig, SessionConfig, StorageConfig};
pub use controller::{EndReason, SessionController, SessionState};
pub use error::app_error::AppError;
pub use gate::{AccessDecision, decide};
pub use models::session::{GrantUser, Identity, LoginGrant, Role, Session};
pub use store::{SessionStore, file::FileStore, memory::MemoryStore};
pub use watchdog::{ExpiryWatchdog, expiry_reason};

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

pub fn init_tracing(log_level: &str, json_format: bool) {
    // RUST_LOG takes precedence for fine-grained control per module:
    //   RUST_LOG=debug                      - everything at debug
    //   RUST_LOG=turnstile=trace            - this crate at trace
    //   RUST_LOG=info,turnstile::watchdog=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_line_number(true);

    if json_format {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Fully wired session core: store, controller, tracker, and watchdog built
/// from `Config`, with the startup restore already performed by the time
/// `start` returns.
pub struct SessionRuntime {
    controller: Arc<SessionController>,
    tracker: ActivityTracker,
    watchdog: JoinHandle<()>,
}

impl SessionRuntime {
    pub async fn start(config: &Config) -> Self {
        let store = Arc::new(FileStore::new(config.storage.path.clone()));
        Self::start_with_store(config, store).await
    }

    /// Same wiring with a caller-supplied store, for embedders that keep
    /// sessions somewhere other than a local file.
    pub async fn start_with_store(config: &Config, store: Arc<dyn SessionStore>) -> Self {
        let controller = Arc::new(SessionController::new(store));
        controller.restore().await;

        let watchdog = Arc::new(ExpiryWatchdog::new(
            controller.clone(),
            config.session.watchdog_period(),
            config.session.inactivity_ceiling(),
        ))
        .spawn();

        let tracker = ActivityTracker::new(controller.clone());

        Self {
            controller,
            tracker,
            watchdog,
        }
    }

    pub fn controller(&self) -> &Arc<SessionController> {
        &self.controller
    }

    pub fn tracker(&self) -> &ActivityTracker {
        &self.tracker
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.controller.subscribe()
    }

    /// Stop the watchdog task. The persisted session, if any, is left as is.
    pub fn shutdown(self) {
        self.watchdog.abort();
    }
}
