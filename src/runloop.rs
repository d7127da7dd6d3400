// Copyright 2023 the Druid Authors
// SPDX-License-Identifier: Apache-2.0

//! The event loop side of timers.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::binary_heap::{BinaryHeap, PeekMut};
use std::time::Duration;

use crate::clock::Clock;
use crate::timer::TimerToken;

/// Something that can deliver a callback after a delay.
///
/// This is the boundary to whatever event loop drives the application.
/// Callbacks are invoked on the loop's own thread, never reentrantly from
/// `request_timer` or `cancel_timer`.
pub trait TimerHost {
    /// Schedule `fire` to run `after` from now. The token passed to `fire`
    /// is the one returned here.
    fn request_timer(&self, after: Duration, fire: Box<dyn FnOnce(TimerToken)>) -> TimerToken;

    /// Cancel a previously requested timer.
    ///
    /// A notification the loop has already dequeued may still be delivered.
    fn cancel_timer(&self, token: TimerToken);
}

/// A deadline and the callback to run when it passes.
struct Scheduled {
    deadline: Duration,
    token: TimerToken,
    fire: Box<dyn FnOnce(TimerToken)>,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.token == other.token
    }
}

impl Eq for Scheduled {}

impl Ord for Scheduled {
    /// Ordering is so that earliest deadline sorts first, ties going to the
    /// timer requested first.
    // "Earliest deadline first" that a std::collections::BinaryHeap will have the earliest timer
    // at its head, which is just what is needed for timer management.
    fn cmp(&self, other: &Self) -> Ordering {
        self.deadline
            .cmp(&other.deadline)
            .then(self.token.into_raw().cmp(&other.token.into_raw()))
            .reverse()
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A single-threaded timer queue.
///
/// `RunLoop` stands in for the native loop's timer facility: nothing fires
/// until one of [`run_timers`], [`advance`] or [`run_until_idle`] is called.
///
/// [`run_timers`]: RunLoop::run_timers
/// [`advance`]: RunLoop::advance
/// [`run_until_idle`]: RunLoop::run_until_idle
pub struct RunLoop {
    clock: Clock,
    queue: RefCell<BinaryHeap<Scheduled>>,
}

impl RunLoop {
    /// A run loop on the system clock.
    pub fn new() -> RunLoop {
        RunLoop::with_clock(Clock::system())
    }

    pub fn with_clock(clock: Clock) -> RunLoop {
        RunLoop {
            clock,
            queue: RefCell::new(BinaryHeap::new()),
        }
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// The number of timers waiting to fire.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// The deadline of the earliest pending timer, relative to the clock's origin.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.borrow().peek().map(|timer| timer.deadline)
    }

    /// Fire every timer whose deadline has passed. Returns how many fired.
    ///
    /// All due timers are dequeued before the first one runs; cancelling one
    /// of them from an earlier callback no longer stops its delivery.
    pub fn run_timers(&self) -> usize {
        let now = self.clock.now();
        let mut due = Vec::new();
        {
            let mut queue = self.queue.borrow_mut();
            while let Some(top) = queue.peek_mut() {
                if top.deadline > now {
                    break;
                }
                due.push(PeekMut::pop(top));
            }
        }
        let fired = due.len();
        for timer in due {
            tracing::trace!("firing timer {:?}", timer.token);
            (timer.fire)(timer.token);
        }
        fired
    }

    /// Let `by` pass, firing timers in deadline order as they come due,
    /// including ones scheduled by callbacks along the way.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.clock.now() + by;
        let mut fired = 0;
        while let Some(deadline) = self.next_deadline() {
            if deadline > target {
                break;
            }
            self.clock.wait_until(deadline);
            fired += self.run_timers();
        }
        self.clock.wait_until(target);
        fired
    }

    /// Run until no timers are pending.
    pub fn run_until_idle(&self) -> usize {
        let mut fired = 0;
        while let Some(deadline) = self.next_deadline() {
            self.clock.wait_until(deadline);
            fired += self.run_timers();
        }
        fired
    }
}

impl Default for RunLoop {
    fn default() -> RunLoop {
        RunLoop::new()
    }
}

impl TimerHost for RunLoop {
    fn request_timer(&self, after: Duration, fire: Box<dyn FnOnce(TimerToken)>) -> TimerToken {
        let token = TimerToken::next();
        let deadline = self.clock.now() + after;
        self.queue.borrow_mut().push(Scheduled {
            deadline,
            token,
            fire,
        });
        token
    }

    fn cancel_timer(&self, token: TimerToken) {
        let mut queue = self.queue.borrow_mut();
        let before = queue.len();
        queue.retain(|timer| timer.token != token);
        if queue.len() == before {
            tracing::trace!("cancel of {token:?}: not pending");
        }
    }
}
