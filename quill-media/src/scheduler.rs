//! Background auto-refresh scheduling.
//!
//! One task per scheduler: a short startup delay (so a set that expired
//! while the process was down is corrected quickly), then a fixed-interval
//! loop. Tick failures are logged and swallowed; the loop must keep firing.

use crate::config::MediaCloudConfig;
use crate::credential_manager::CredentialManager;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub struct RefreshScheduler {
    manager: Arc<CredentialManager>,
    startup_delay: Duration,
    poll_interval: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshScheduler {
    pub fn new(manager: Arc<CredentialManager>, config: &MediaCloudConfig) -> Self {
        Self {
            manager,
            startup_delay: Duration::from_secs(config.startup_delay_secs),
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            task: Mutex::new(None),
        }
    }

    /// Arms the startup check and the recurring interval. No-op if already
    /// running.
    pub fn start(&self) {
        let mut task = self.task.lock().unwrap();
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            debug!("credential auto-refresh already running");
            return;
        }

        let manager = Arc::clone(&self.manager);
        let startup_delay = self.startup_delay;
        let poll_interval = self.poll_interval;

        *task = Some(tokio::spawn(async move {
            tokio::time::sleep(startup_delay).await;
            run_check(&manager).await;

            let mut ticker = tokio::time::interval(poll_interval);
            ticker.tick().await; // first tick completes immediately
            loop {
                ticker.tick().await;
                run_check(&manager).await;
            }
        }));
        info!("credential auto-refresh started (every {poll_interval:?})");
    }

    /// Cancels the recurring check. No-op if not running.
    pub fn stop(&self) {
        if let Some(task) = self.task.lock().unwrap().take() {
            task.abort();
            info!("credential auto-refresh stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|t| !t.is_finished())
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        if let Some(task) = self.task.lock().unwrap().take() {
            task.abort();
        }
    }
}

/// One scheduled cycle: check expiry, refresh if due. Never propagates;
/// a failed cycle must not stop future ones.
async fn run_check(manager: &CredentialManager) {
    if !manager.needs_refresh() {
        debug!("media credentials still fresh");
        return;
    }
    let outcome = manager.refresh().await;
    if !outcome.success {
        warn!("scheduled credential refresh failed: {}", outcome.message);
    }
}
