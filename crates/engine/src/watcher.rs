// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live watcher: one poller per race
//!
//! `LiveWatcher` is the pure state machine (`Idle -> Polling -> Stopped`).
//! `spawn` drives it from a tokio task that checks the change source on a
//! fixed interval and runs the change callback once per detected change.

use crate::error::LiveError;
use crate::source::ChangeSource;
use std::io;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveState {
    Idle,
    Polling { last_modified: SystemTime },
    Stopped,
}

/// Result of one poll of the change source
#[derive(Debug)]
pub enum Observation {
    Modified(SystemTime),
    Unreadable(io::Error),
}

/// What the watcher did with an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Unchanged,
    /// Modification time advanced; recompute and notify
    Triggered,
    /// Not polling
    Ignored,
}

#[derive(Debug)]
pub struct LiveWatcher {
    race: String,
    state: LiveState,
}

impl LiveWatcher {
    pub fn new(race: impl Into<String>) -> Self {
        Self {
            race: race.into(),
            state: LiveState::Idle,
        }
    }

    pub fn race(&self) -> &str {
        &self.race
    }

    pub fn state(&self) -> LiveState {
        self.state
    }

    /// Begin polling from a known modification time. Only valid from `Idle`.
    pub fn start(&mut self, last_modified: SystemTime) -> bool {
        if self.state != LiveState::Idle {
            return false;
        }
        self.state = LiveState::Polling { last_modified };
        true
    }

    pub fn observe(&mut self, observation: Observation) -> Step {
        let LiveState::Polling { last_modified } = self.state else {
            return Step::Ignored;
        };
        match observation {
            Observation::Modified(modified) if modified > last_modified => {
                self.state = LiveState::Polling {
                    last_modified: modified,
                };
                Step::Triggered
            }
            Observation::Modified(_) => Step::Unchanged,
            Observation::Unreadable(e) => {
                tracing::warn!(race = %self.race, error = %e, "punch file unreadable, still polling");
                Step::Unchanged
            }
        }
    }

    /// Enter the terminal state; false when already stopped
    pub fn stop(&mut self) -> bool {
        if self.state == LiveState::Stopped {
            return false;
        }
        self.state = LiveState::Stopped;
        true
    }
}

/// Start polling `source` every `interval`.
///
/// The initial modification time is read before returning, so a missing
/// source fails here rather than in the background. `on_change` runs on the
/// blocking pool and the poller waits for it before the next tick or stop.
/// Must be called from within a tokio runtime.
pub fn spawn<S, F>(
    race: &str,
    source: S,
    interval: Duration,
    on_change: F,
) -> Result<WatcherHandle, LiveError>
where
    S: ChangeSource,
    F: Fn() + Send + Sync + 'static,
{
    let mut watcher = LiveWatcher::new(race);
    let modified = source.modified().map_err(|e| LiveError::Stat {
        race: race.to_string(),
        location: source.location(),
        source: e,
    })?;
    watcher.start(modified);
    let location = source.location();
    let on_change = Arc::new(on_change);

    let (stop_tx, mut stop_rx) = oneshot::channel::<oneshot::Sender<()>>();
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Skip initial immediate tick
        ticker.tick().await;

        loop {
            tokio::select! {
                biased;
                ack = &mut stop_rx => {
                    watcher.stop();
                    if let Ok(ack) = ack {
                        let _ = ack.send(());
                    }
                    break;
                }
                _ = ticker.tick() => {
                    let observation = match source.modified() {
                        Ok(modified) => Observation::Modified(modified),
                        Err(e) => Observation::Unreadable(e),
                    };
                    if watcher.observe(observation) == Step::Triggered {
                        tracing::info!(race = %watcher.race(), "punch file changed");
                        let callback = on_change.clone();
                        if let Err(e) = tokio::task::spawn_blocking(move || callback()).await {
                            tracing::warn!(race = %watcher.race(), error = %e, "change callback failed");
                        }
                    }
                }
            }
        }
        tracing::debug!(race = %watcher.race(), "live watcher stopped");
    });

    tracing::info!(race, %location, ?interval, "live watcher started");
    Ok(WatcherHandle {
        race: race.to_string(),
        stop: Some(stop_tx),
        task: Some(task),
    })
}

/// Stop capability for one running watcher.
///
/// Dropping a handle without stopping it aborts the poller.
#[derive(Debug)]
pub struct WatcherHandle {
    race: String,
    stop: Option<oneshot::Sender<oneshot::Sender<()>>>,
    task: Option<JoinHandle<()>>,
}

impl WatcherHandle {
    pub fn race(&self) -> &str {
        &self.race
    }

    /// Stop the poller and wait until it has left its loop.
    ///
    /// No change callback runs after this returns. Stopping twice is an
    /// error.
    pub async fn stop(&mut self) -> Result<(), LiveError> {
        let Some(stop) = self.stop.take() else {
            return Err(LiveError::AlreadyStopped(self.race.clone()));
        };

        let (ack_tx, ack_rx) = oneshot::channel();
        if stop.send(ack_tx).is_ok() {
            // Err means the task ended on its own
            let _ = ack_rx.await;
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(race = %self.race, error = %e, "live watcher task failed");
            }
        }
        Ok(())
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
