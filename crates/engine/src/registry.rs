// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared state between live watchers and open result views
//!
//! Three maps, each behind its own lock:
//! - race name -> watcher handle (at most one per race)
//! - view id -> search text
//! - view id -> last materialized results
//!
//! Reads take the shared lock and mutations the exclusive one. The registry
//! knows nothing about races beyond their names.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

/// A running task that can be stopped
#[async_trait]
pub trait Stop: Send + Sync {
    type Error: fmt::Display + Send;

    async fn stop(&mut self) -> Result<(), Self::Error>;
}

#[async_trait]
impl Stop for crate::watcher::WatcherHandle {
    type Error = crate::error::LiveError;

    async fn stop(&mut self) -> Result<(), Self::Error> {
        crate::watcher::WatcherHandle::stop(self).await
    }
}

/// Results held for one open view
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<T> {
    /// After the view's search filter
    pub current: Vec<T>,
    /// Unfiltered
    pub all: Vec<T>,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            current: Vec::new(),
            all: Vec::new(),
        }
    }
}

pub struct Registry<H, T> {
    // Held across `stop().await`, so an async lock
    watchers: tokio::sync::RwLock<HashMap<String, H>>,
    searches: RwLock<HashMap<String, String>>,
    views: RwLock<HashMap<String, ViewState<T>>>,
}

impl<H, T> Default for Registry<H, T> {
    fn default() -> Self {
        Self {
            watchers: tokio::sync::RwLock::new(HashMap::new()),
            searches: RwLock::new(HashMap::new()),
            views: RwLock::new(HashMap::new()),
        }
    }
}

impl<H: Stop, T: Clone> Registry<H, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a handle only if the race has none.
    ///
    /// `create` runs under the exclusive lock, so two callers cannot both
    /// start a watcher for the same race.
    pub async fn add_watcher_with<F, E>(&self, race: &str, create: F) -> Result<bool, E>
    where
        F: FnOnce() -> Result<H, E>,
    {
        let mut watchers = self.watchers.write().await;
        if watchers.contains_key(race) {
            return Ok(false);
        }
        watchers.insert(race.to_string(), create()?);
        Ok(true)
    }

    /// Stop the race's handle, then forget it. The entry is removed even when
    /// stopping fails.
    pub async fn remove_watcher(&self, race: &str) -> Result<bool, H::Error> {
        let mut watchers = self.watchers.write().await;
        let Some(mut handle) = watchers.remove(race) else {
            return Ok(false);
        };
        handle.stop().await?;
        Ok(true)
    }

    pub async fn has_watcher(&self, race: &str) -> bool {
        self.watchers.read().await.contains_key(race)
    }

    /// Races with a registered handle, sorted
    #[cfg(test)]
    pub(crate) async fn watcher_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.watchers.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Stop and remove every handle
    pub async fn stop_all(&self) {
        let mut watchers = self.watchers.write().await;
        for (race, mut handle) in watchers.drain() {
            if let Err(e) = handle.stop().await {
                tracing::warn!(race = %race, error = %e, "failed to stop watcher");
            }
        }
    }

    /// Set a view's search text; last write wins
    pub fn set_search(&self, view_id: &str, text: &str) {
        let mut searches = self.searches.write().unwrap_or_else(|e| e.into_inner());
        searches.insert(view_id.to_string(), text.to_string());
    }

    /// A view's search text; empty for unknown views
    pub fn search(&self, view_id: &str) -> String {
        self.searches
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(view_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn add_view(&self, view_id: &str, state: ViewState<T>) {
        let mut views = self.views.write().unwrap_or_else(|e| e.into_inner());
        views.insert(view_id.to_string(), state);
    }

    /// Drop a view along with its search text
    pub fn remove_view(&self, view_id: &str) -> Option<ViewState<T>> {
        let removed = {
            let mut views = self.views.write().unwrap_or_else(|e| e.into_inner());
            views.remove(view_id)
        };
        let mut searches = self.searches.write().unwrap_or_else(|e| e.into_inner());
        searches.remove(view_id);
        removed
    }

    pub fn view(&self, view_id: &str) -> Option<ViewState<T>> {
        self.views
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(view_id)
            .cloned()
    }

    /// Mutate a view under the exclusive lock; false when it is not open
    pub fn update_view<F>(&self, view_id: &str, update: F) -> bool
    where
        F: FnOnce(&mut ViewState<T>),
    {
        let mut views = self.views.write().unwrap_or_else(|e| e.into_inner());
        match views.get_mut(view_id) {
            Some(state) => {
                update(state);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
