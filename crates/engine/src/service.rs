// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Race service: the entry point for every race operation
//!
//! Owns the store, the reconciler, the shared view registry and the event
//! bus. All race-list mutations go through `update_race`, which serializes
//! load, edit and save under one lock.

use crate::error::{LiveError, ServiceError};
use crate::registry::{Registry, ViewState};
use crate::source::FileSource;
use crate::watcher::{self, WatcherHandle, DEFAULT_POLL_INTERVAL};
use chiptime_core::{
    filter_results, Config, EventBus, JsonStore, Notifier, Race, RaceEvent, Reconciler,
    Reconciliation, TimedResult,
};
use chrono::NaiveDateTime;
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub type ViewRegistry = Registry<WatcherHandle, TimedResult>;

/// Changes applied by `RaceService::edit_race`; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct RaceEdit {
    pub name: Option<String>,
    pub start_time: Option<NaiveDateTime>,
    pub min_time: Option<Duration>,
    pub chips: Option<BTreeSet<String>>,
}

impl RaceEdit {
    fn apply(self, race: &mut Race) {
        if let Some(name) = self.name {
            race.name = name;
        }
        if let Some(start_time) = self.start_time {
            race.start_time = start_time;
        }
        if let Some(min_time) = self.min_time {
            race.min_time = min_time;
        }
        if let Some(chips) = self.chips {
            race.chips = chips;
        }
    }
}

#[derive(Clone)]
pub struct RaceService {
    store: JsonStore,
    reconciler: Reconciler,
    registry: Arc<ViewRegistry>,
    bus: EventBus,
    // Notifier of each running watcher, kept so the watcher can be restarted
    notifiers: Arc<Mutex<HashMap<String, Arc<dyn Notifier>>>>,
    poll_interval: Duration,
    races_lock: Arc<Mutex<()>>,
}

impl RaceService {
    pub fn new(store: JsonStore) -> Self {
        Self {
            reconciler: Reconciler::new(store.clone()),
            store,
            registry: Arc::new(ViewRegistry::new()),
            bus: EventBus::new(),
            notifiers: Arc::new(Mutex::new(HashMap::new())),
            poll_interval: DEFAULT_POLL_INTERVAL,
            races_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        let store = JsonStore::open(&config.data_dir)?;
        Ok(Self::new(store).with_poll_interval(config.poll_interval))
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    // Race list

    pub fn races(&self) -> Result<Vec<Race>, ServiceError> {
        let _guard = self.races_lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.store.load_races()?)
    }

    pub fn race(&self, name: &str) -> Result<Race, ServiceError> {
        self.races()?
            .into_iter()
            .find(|race| race.name == name)
            .ok_or_else(|| ServiceError::RaceNotFound(name.to_string()))
    }

    pub fn add_race(&self, race: Race) -> Result<(), ServiceError> {
        let _guard = self.races_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut races = self.store.load_races()?;
        if races.iter().any(|existing| existing.name == race.name) {
            return Err(ServiceError::DuplicateRace(race.name));
        }
        tracing::info!(race = %race.name, chips = race.chips.len(), "race added");
        races.push(race);
        self.store.save_races(&races)?;
        Ok(())
    }

    /// Delete a race, its watcher, open view and per-race files
    pub async fn remove_race(&self, name: &str) -> Result<Race, ServiceError> {
        if let Err(e) = self.stop_watcher(name).await {
            tracing::warn!(race = name, error = %e, "failed to stop watcher of removed race");
        }

        let removed = {
            let _guard = self.races_lock.lock().unwrap_or_else(|e| e.into_inner());
            let mut races = self.store.load_races()?;
            let index = races
                .iter()
                .position(|race| race.name == name)
                .ok_or_else(|| ServiceError::RaceNotFound(name.to_string()))?;
            let removed = races.remove(index);
            self.store.save_races(&races)?;
            removed
        };

        self.registry.remove_view(&Self::view_id(name));
        self.invalidate_cache(name);
        if let Err(e) = self.reconciler.manual_times().remove(name) {
            tracing::warn!(race = name, error = %e, "failed to delete manual times");
        }

        tracing::info!(race = name, "race removed");
        self.bus.publish(RaceEvent::Removed {
            race: name.to_string(),
        });
        Ok(removed)
    }

    /// Load a race, apply `update` and save the race list.
    ///
    /// Nothing is saved when `update` fails.
    pub fn update_race<R, E, F>(&self, name: &str, update: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut Race) -> Result<R, E>,
        ServiceError: From<E>,
    {
        let _guard = self.races_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut races = self.store.load_races()?;
        let race = races
            .iter_mut()
            .find(|race| race.name == name)
            .ok_or_else(|| ServiceError::RaceNotFound(name.to_string()))?;
        let output = update(race)?;
        self.store.save_races(&races)?;
        Ok(output)
    }

    /// Point a race at a punch file and rebuild its results.
    ///
    /// A running watcher is restarted on the new file.
    pub async fn set_results_file(
        &self,
        name: &str,
        path: impl Into<PathBuf>,
    ) -> Result<Reconciliation, ServiceError> {
        let path = path.into();
        let race = self.update_race(name, |race| {
            race.results_file = Some(path);
            Ok::<_, ServiceError>(race.clone())
        })?;
        self.invalidate_cache(name);
        let reconciliation = self.publish_results(&race, self.reconciler.reconcile(&race));
        self.restart_watcher(name, name).await?;
        Ok(reconciliation)
    }

    /// Change a race's name, start, minimum time or chips and rebuild its
    /// results.
    ///
    /// A rename carries the manual times, the open view's search and a
    /// running watcher over to the new name.
    pub async fn edit_race(&self, name: &str, edit: RaceEdit) -> Result<Reconciliation, ServiceError> {
        let new_name = edit.name.clone().filter(|new_name| new_name != name);
        let race = {
            let _guard = self.races_lock.lock().unwrap_or_else(|e| e.into_inner());
            let mut races = self.store.load_races()?;
            if let Some(new_name) = &new_name {
                if races.iter().any(|race| &race.name == new_name) {
                    return Err(ServiceError::DuplicateRace(new_name.clone()));
                }
            }
            let race = races
                .iter_mut()
                .find(|race| race.name == name)
                .ok_or_else(|| ServiceError::RaceNotFound(name.to_string()))?;
            edit.apply(race);
            let race = race.clone();
            if let Some(new_name) = &new_name {
                self.reconciler.manual_times().rename(name, new_name)?;
            }
            self.store.save_races(&races)?;
            race
        };

        self.invalidate_cache(name);
        if let Some(new_name) = &new_name {
            let search = self.registry.search(&Self::view_id(name));
            if self.registry.remove_view(&Self::view_id(name)).is_some() {
                self.open_view(new_name)?;
                if !search.is_empty() {
                    self.set_search(new_name, &search);
                }
            }
            tracing::info!(race = name, new_name = %new_name, "race renamed");
        }
        tracing::info!(race = %race.name, chips = race.chips.len(), "race edited");

        let reconciliation = self.publish_results(&race, self.reconciler.reconcile(&race));
        self.restart_watcher(name, &race.name).await?;
        Ok(reconciliation)
    }

    // Results

    /// Rebuild a race's results from its sources
    pub fn reconcile(&self, name: &str) -> Result<Reconciliation, ServiceError> {
        let race = self.race(name)?;
        let reconciliation = self.reconciler.reconcile(&race);
        self.refresh_view(name, &reconciliation.results);
        Ok(reconciliation)
    }

    /// Cached results, reconciling only when nothing is cached
    pub fn results(&self, name: &str) -> Result<Reconciliation, ServiceError> {
        let race = self.race(name)?;
        Ok(self.reconciler.snapshot(&race))
    }

    pub fn toggle_invalid(
        &self,
        name: &str,
        chip: &str,
        time: NaiveDateTime,
    ) -> Result<Reconciliation, ServiceError> {
        let (race, reconciliation) = self.update_race(name, |race| {
            let reconciliation = self.reconciler.toggle_invalid(race, chip, time)?;
            Ok::<_, ServiceError>((race.clone(), reconciliation))
        })?;
        Ok(self.publish_results(&race, reconciliation))
    }

    pub fn add_manual_time(
        &self,
        name: &str,
        chip: &str,
        elapsed: Duration,
    ) -> Result<Reconciliation, ServiceError> {
        let (race, reconciliation) = self.update_race(name, |race| {
            let reconciliation = self.reconciler.add_manual_time(race, chip, elapsed)?;
            Ok::<_, ServiceError>((race.clone(), reconciliation))
        })?;
        Ok(self.publish_results(&race, reconciliation))
    }

    fn publish_results(&self, race: &Race, reconciliation: Reconciliation) -> Reconciliation {
        self.refresh_view(&race.name, &reconciliation.results);
        self.bus.notify(&race.name);
        reconciliation
    }

    // Live updates

    /// Start polling the race's punch file.
    ///
    /// Returns false when the race is already watched. `notify` runs after
    /// each recomputation.
    pub async fn enable_live_update<N: Notifier>(
        &self,
        name: &str,
        notify: N,
    ) -> Result<bool, ServiceError> {
        self.start_watcher(name, Arc::new(notify)).await
    }

    /// Stop the race's poller and clear its live-update flag. Returns
    /// whether a poller was running.
    pub async fn disable_live_update(&self, name: &str) -> Result<bool, ServiceError> {
        let stopped = self.stop_live_update(name).await?;
        match self.set_live_flag(name, false) {
            Ok(()) | Err(ServiceError::RaceNotFound(_)) => {}
            Err(e) => return Err(e),
        }
        if stopped {
            tracing::info!(race = name, "live update disabled");
        }
        Ok(stopped)
    }

    /// Stop the race's poller, keeping its live-update flag so that
    /// `resume_live_updates` picks it up again. Returns whether a poller was
    /// running.
    pub async fn stop_live_update(&self, name: &str) -> Result<bool, ServiceError> {
        let stopped = self.stop_watcher(name).await?;
        if stopped {
            self.bus.publish(RaceEvent::LiveUpdateStopped {
                race: name.to_string(),
            });
        }
        Ok(stopped)
    }

    /// Set or clear a race's live-update flag without touching pollers.
    ///
    /// Flagging a race without a punch file is `LiveError::NoSourceFile`.
    pub fn set_live_flag(&self, name: &str, enabled: bool) -> Result<(), ServiceError> {
        self.update_race(name, |race| {
            if enabled && race.source_file().is_none() {
                return Err(ServiceError::from(LiveError::NoSourceFile(race.name.clone())));
            }
            race.live_update = enabled;
            Ok(())
        })
    }

    /// Restart pollers for every race flagged for live update.
    ///
    /// Races that cannot be watched are logged and skipped. Returns the
    /// names that started.
    pub async fn resume_live_updates<N>(&self, notify: N) -> Result<Vec<String>, ServiceError>
    where
        N: Notifier + Clone,
    {
        let mut started = Vec::new();
        for race in self.races()?.into_iter().filter(|race| race.live_update) {
            match self.enable_live_update(&race.name, notify.clone()).await {
                Ok(true) => started.push(race.name),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(race = %race.name, error = %e, "cannot resume live update");
                }
            }
        }
        Ok(started)
    }

    /// Stop every poller, leaving the live-update flags as they are
    pub async fn shutdown(&self) {
        self.registry.stop_all().await;
        self.notifiers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    async fn start_watcher(
        &self,
        name: &str,
        notify: Arc<dyn Notifier>,
    ) -> Result<bool, ServiceError> {
        let race = self.race(name)?;
        let Some(path) = race.source_file().map(PathBuf::from) else {
            return Err(LiveError::NoSourceFile(name.to_string()).into());
        };

        let service = self.clone();
        let race_name = name.to_string();
        let callback = notify.clone();
        let on_change = move || service.on_source_changed(&race_name, callback.as_ref());
        let started = self
            .registry
            .add_watcher_with(name, || {
                watcher::spawn(name, FileSource::new(path), self.poll_interval, on_change)
            })
            .await?;

        if started {
            self.notifiers
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert(name.to_string(), notify);
            self.set_live_flag(name, true)?;
            self.bus.publish(RaceEvent::LiveUpdateStarted {
                race: name.to_string(),
            });
        }
        Ok(started)
    }

    async fn stop_watcher(&self, name: &str) -> Result<bool, ServiceError> {
        self.notifiers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(name);
        Ok(self.registry.remove_watcher(name).await?)
    }

    /// Restart the poller registered under `from` as `to`, re-reading the
    /// race's punch file path. No-op when nothing is watched.
    async fn restart_watcher(&self, from: &str, to: &str) -> Result<(), ServiceError> {
        let notify = self
            .notifiers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(from)
            .cloned();
        let Some(notify) = notify else {
            return Ok(());
        };
        self.stop_watcher(from).await?;
        self.start_watcher(to, notify).await?;
        tracing::info!(race = to, "live watcher restarted");
        Ok(())
    }

    /// Runs on a blocking thread after the punch file changed
    fn on_source_changed(&self, name: &str, notify: &dyn Notifier) {
        let race = match self.race(name) {
            Ok(race) => race,
            Err(e) => {
                tracing::warn!(race = name, error = %e, "cannot reload race after file change");
                return;
            }
        };
        self.invalidate_cache(name);
        let reconciliation = self.reconciler.reconcile(&race);
        self.refresh_view(name, &reconciliation.results);
        notify.notify(name);
    }

    fn invalidate_cache(&self, name: &str) {
        if let Err(e) = self.reconciler.cache().invalidate(name) {
            tracing::warn!(race = name, error = %e, "failed to delete result cache");
        }
    }

    // Views

    pub fn view_id(race: &str) -> String {
        format!("results:{}", race)
    }

    /// Open a result view for a race, seeded from its current results
    pub fn open_view(&self, name: &str) -> Result<String, ServiceError> {
        let reconciliation = self.results(name)?;
        let view_id = Self::view_id(name);
        let search = self.registry.search(&view_id);
        self.registry.add_view(
            &view_id,
            ViewState {
                current: filter_results(&reconciliation.results, &search),
                all: reconciliation.results,
            },
        );
        Ok(view_id)
    }

    pub fn close_view(&self, name: &str) -> bool {
        self.registry.remove_view(&Self::view_id(name)).is_some()
    }

    /// Filter an open view; returns the filtered results
    pub fn set_search(&self, name: &str, text: &str) -> Option<Vec<TimedResult>> {
        let view_id = Self::view_id(name);
        self.registry.set_search(&view_id, text);
        let mut current = None;
        self.registry.update_view(&view_id, |state| {
            state.current = filter_results(&state.all, text);
            current = Some(state.current.clone());
        });
        current
    }

    /// Filtered results of an open view
    pub fn view_results(&self, name: &str) -> Option<Vec<TimedResult>> {
        self.registry
            .view(&Self::view_id(name))
            .map(|state| state.current)
    }

    fn refresh_view(&self, name: &str, results: &[TimedResult]) {
        let view_id = Self::view_id(name);
        let search = self.registry.search(&view_id);
        self.registry.update_view(&view_id, |state| {
            state.all = results.to_vec();
            state.current = filter_results(results, &search);
        });
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
