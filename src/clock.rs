// Copyright 2023 the Druid Authors
// SPDX-License-Identifier: Apache-2.0

//! Time sources for the run loop and the popup tracker.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use instant::Instant;

/// A monotonic clock, measured from its own origin.
///
/// Clones share the same time source, so a manual clock handed to both the
/// [`RunLoop`] and the [`Application`] advances for both.
///
/// [`RunLoop`]: crate::RunLoop
/// [`Application`]: crate::Application
#[derive(Clone, Debug)]
pub struct Clock(ClockKind);

#[derive(Clone, Debug)]
enum ClockKind {
    System(Instant),
    Manual(Rc<Cell<Duration>>),
}

impl Clock {
    /// A clock that follows wall time, starting now.
    pub fn system() -> Clock {
        Clock(ClockKind::System(Instant::now()))
    }

    /// A clock that only moves when [`advance`](Clock::advance) is called.
    pub fn manual() -> Clock {
        Clock(ClockKind::Manual(Rc::new(Cell::new(Duration::ZERO))))
    }

    pub fn is_manual(&self) -> bool {
        matches!(self.0, ClockKind::Manual(_))
    }

    /// Time elapsed since the clock's origin.
    pub fn now(&self) -> Duration {
        match &self.0 {
            ClockKind::System(origin) => origin.elapsed(),
            ClockKind::Manual(now) => now.get(),
        }
    }

    /// Move time forward by `by`.
    ///
    /// A manual clock jumps; a system clock sleeps the current thread.
    pub fn advance(&self, by: Duration) {
        match &self.0 {
            ClockKind::System(_) => std::thread::sleep(by),
            ClockKind::Manual(now) => now.set(now.get() + by),
        }
    }

    /// Advance until `now() >= at`. Does nothing if `at` is in the past.
    pub fn wait_until(&self, at: Duration) {
        let now = self.now();
        if at > now {
            self.advance(at - now);
        }
    }
}

impl Default for Clock {
    fn default() -> Clock {
        Clock::system()
    }
}
