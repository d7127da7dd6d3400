// Copyright 2023 the Druid Authors
// SPDX-License-Identifier: Apache-2.0

//! Tracking of popup menus dismissed without a selection.
//!
//! Some toolkits deliver the click that dismissed a popup to the window
//! underneath it as well. If that window opens the popup on click, it pops
//! right back up. The window layer checks [`PopupTracker::suppresses_click`]
//! to swallow such a click.

use std::cell::Cell;
use std::time::Duration;

use crate::clock::Clock;

/// The time of the last popup dismissal.
#[derive(Debug)]
pub struct PopupTracker {
    clock: Clock,
    last_cancel: Cell<Option<Duration>>,
}

impl PopupTracker {
    pub fn new(clock: Clock) -> PopupTracker {
        PopupTracker {
            clock,
            last_cancel: Cell::new(None),
        }
    }

    /// Note that a popup was just dismissed. Returns the recorded time.
    pub fn record_cancel(&self) -> Duration {
        let now = self.clock.now();
        self.last_cancel.set(Some(now));
        now
    }

    /// When the last popup was dismissed, on the tracker's clock.
    pub fn last_cancel(&self) -> Option<Duration> {
        self.last_cancel.get()
    }

    /// Returns `true` if a popup was dismissed less than `window` ago.
    pub fn suppresses_click(&self, window: Duration) -> bool {
        match self.last_cancel.get() {
            Some(at) => self.clock.now().saturating_sub(at) < window,
            None => false,
        }
    }

    pub fn reset(&self) {
        self.last_cancel.set(None);
    }
}
