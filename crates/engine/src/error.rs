// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for live updates and the race service

use chiptime_core::{ReconcileError, StorageError};
use thiserror::Error;

/// Contract violations around live updates
#[derive(Debug, Error)]
pub enum LiveError {
    #[error("race {0} has no punch file configured")]
    NoSourceFile(String),
    #[error("cannot stat {location} for race {race}: {source}")]
    Stat {
        race: String,
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("live update for race {0} is already stopped")]
    AlreadyStopped(String),
}

/// Errors returned by `RaceService`
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("race not found: {0}")]
    RaceNotFound(String),
    #[error("race already exists: {0}")]
    DuplicateRace(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
    #[error(transparent)]
    Live(#[from] LiveError),
}
