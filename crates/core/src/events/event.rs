// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};

/// Something that happened to a race
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RaceEvent {
    /// Results were recomputed
    Updated { race: String },
    LiveUpdateStarted { race: String },
    LiveUpdateStopped { race: String },
    Removed { race: String },
}

impl RaceEvent {
    pub fn race(&self) -> &str {
        match self {
            RaceEvent::Updated { race }
            | RaceEvent::LiveUpdateStarted { race }
            | RaceEvent::LiveUpdateStopped { race }
            | RaceEvent::Removed { race } => race,
        }
    }

    /// Event name used for pattern matching, e.g. `race:updated`
    pub fn name(&self) -> &'static str {
        match self {
            RaceEvent::Updated { .. } => "race:updated",
            RaceEvent::LiveUpdateStarted { .. } => "race:live_started",
            RaceEvent::LiveUpdateStopped { .. } => "race:live_stopped",
            RaceEvent::Removed { .. } => "race:removed",
        }
    }
}
