// Copyright 2023 the Druid Authors
// SPDX-License-Identifier: Apache-2.0

//! Single-shot timers.

use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::common_util::{CallbackSlot, Counter};
use crate::runloop::TimerHost;

/// A token that uniquely identifies one arming of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

impl TimerToken {
    /// A token that does not correspond to any timer.
    pub const INVALID: TimerToken = TimerToken(0);

    /// Create a new token.
    pub fn next() -> TimerToken {
        static TIMER_COUNTER: Counter = Counter::new();
        TimerToken(TIMER_COUNTER.next())
    }

    /// Create a new token from a raw value.
    pub const fn from_raw(id: u64) -> TimerToken {
        TimerToken(id)
    }

    /// Get the raw value for a token.
    pub const fn into_raw(self) -> u64 {
        self.0
    }
}

/// A native single-shot timer.
///
/// Created with [`Application::create_timer`]. A timer is idle until
/// [`wind_up`] arms it; when the duration has passed the run loop invokes
/// the `on_timeout` callback once and the timer is idle again.
///
/// Winding up an armed timer cancels the pending expiry first, so only the
/// most recent duration counts. Dropping an armed timer cancels it too; a
/// late notification for a dropped timer is ignored.
///
/// [`Application::create_timer`]: crate::Application::create_timer
/// [`wind_up`]: Timer::wind_up
pub struct Timer {
    inner: Rc<TimerInner>,
}

struct TimerInner {
    host: Rc<dyn TimerHost>,
    /// The token of the current arm; `None` while idle.
    armed: Cell<Option<TimerToken>>,
    on_timeout: CallbackSlot,
}

impl Timer {
    pub(crate) fn new(host: Rc<dyn TimerHost>) -> Timer {
        Timer {
            inner: Rc::new(TimerInner {
                host,
                armed: Cell::new(None),
                on_timeout: CallbackSlot::new(None),
            }),
        }
    }

    /// Set the function called when the timer expires.
    pub fn set_on_timeout(&self, f: impl FnMut() + 'static) {
        self.inner.on_timeout.set(Some(Box::new(f)));
    }

    pub fn clear_on_timeout(&self) {
        self.inner.on_timeout.set(None);
    }

    /// Returns `true` if an expiry is pending.
    pub fn is_armed(&self) -> bool {
        self.inner.armed.get().is_some()
    }

    /// Arm the timer to expire `duration` from now, replacing any pending expiry.
    pub fn wind_up(&self, duration: Duration) {
        if let Some(previous) = self.inner.armed.take() {
            tracing::trace!("rearming timer, cancelling {previous:?}");
            self.inner.host.cancel_timer(previous);
        }
        let timer = Rc::downgrade(&self.inner);
        let token = self.inner.host.request_timer(
            duration,
            Box::new(move |token| expire(&timer, token)),
        );
        tracing::trace!("timer armed for {duration:?} as {token:?}");
        self.inner.armed.set(Some(token));
    }
}

fn expire(timer: &Weak<TimerInner>, token: TimerToken) {
    let Some(timer) = timer.upgrade() else {
        tracing::debug!("expiry {token:?} delivered to a dropped timer");
        return;
    };
    if timer.armed.get() != Some(token) {
        tracing::debug!("expiry {token:?} was cancelled");
        return;
    }
    timer.armed.set(None);
    tracing::trace!("timer {token:?} expired");
    timer.on_timeout.invoke();
}

impl Drop for TimerInner {
    fn drop(&mut self) {
        if let Some(token) = self.armed.take() {
            self.host.cancel_timer(token);
        }
    }
}
