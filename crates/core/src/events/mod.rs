// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Race events for loose coupling with the presentation layer
//!
//! This module provides:
//! - `RaceEvent` - What happened to which race
//! - `EventBus` - Route events to matching subscribers
//! - `EventPattern` - Pattern matching on event names
//! - `Notifier` - The change callback handed to live watchers

mod bus;
mod event;
mod subscription;

pub use bus::{EventBus, EventReceiver, EventSender, Notifier};
pub use event::RaceEvent;
pub use subscription::{EventPattern, SubscriberId, Subscription};
