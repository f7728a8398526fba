use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Owns the background task of the current character generation run.
#[derive(Default)]
pub struct GenerationController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl GenerationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Spawns the worker built by `spawn_worker`, handing it a fresh
    /// cancellation token. A worker left over from an earlier run is stopped
    /// and reaped first.
    pub async fn start<F, Fut>(&mut self, spawn_worker: F) -> Result<()>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        self.stop().await?;

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(spawn_worker(cancel_token.clone()));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Waits for the current worker to finish on its own. Dropping the
    /// returned future leaves the worker attached and stoppable.
    pub async fn join(&mut self) -> Result<()> {
        let result = match self.handle.as_mut() {
            Some(handle) => handle
                .await
                .context("character generation task failed to join"),
            None => Ok(()),
        };

        self.handle = None;
        self.cancel_token = None;
        result
    }

    /// Cancels the current worker and waits for it to exit. Safe to call when
    /// nothing is running.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = &self.cancel_token {
            if self.is_running() && !token.is_cancelled() {
                token.cancel();
                log_info!("cancel signal sent to character generation");
            }
        }
        self.join().await
    }
}
