// Copyright 2023 the Druid Authors
// SPDX-License-Identifier: Apache-2.0

//! Common functions used by the timer and menu modules.

use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicU64, Ordering};

/// An incrementing counter for generating unique ids.
///
/// This can be used safely from multiple threads.
///
/// The counter will overflow if `next()` is called 2^64 - 2 times.
/// If this is possible for your application, and reuse would be undesirable,
/// use something else.
pub struct Counter(AtomicU64);

impl Counter {
    /// Create a new counter.
    pub const fn new() -> Counter {
        Counter(AtomicU64::new(1))
    }

    /// Return the next value.
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

/// A replaceable callback that may replace itself while it runs.
///
/// The callback is moved out of the slot for the duration of a call, so it
/// can freely call [`set`](CallbackSlot::set) on its own slot. A nested
/// [`invoke`](CallbackSlot::invoke) of a running callback does nothing.
pub(crate) struct CallbackSlot {
    callback: RefCell<Option<Box<dyn FnMut()>>>,
    running: Cell<bool>,
    replaced: Cell<bool>,
}

impl CallbackSlot {
    pub fn new(callback: Option<Box<dyn FnMut()>>) -> CallbackSlot {
        CallbackSlot {
            callback: RefCell::new(callback),
            running: Cell::new(false),
            replaced: Cell::new(false),
        }
    }

    pub fn set(&self, callback: Option<Box<dyn FnMut()>>) {
        *self.callback.borrow_mut() = callback;
        if self.running.get() {
            self.replaced.set(true);
        }
    }

    pub fn is_set(&self) -> bool {
        self.callback.borrow().is_some() || (self.running.get() && !self.replaced.get())
    }

    /// Call the callback. Returns `false` if there is none, or if it is
    /// already running further up the stack.
    pub fn invoke(&self) -> bool {
        if self.running.get() {
            return false;
        }
        let callback = self.callback.borrow_mut().take();
        let Some(callback) = callback else {
            return false;
        };
        self.running.set(true);
        self.replaced.set(false);
        // put the callback back even if it panics, unless it was replaced
        let mut callback = scopeguard::guard(callback, |callback| {
            self.running.set(false);
            if !self.replaced.get() {
                *self.callback.borrow_mut() = Some(callback);
            }
        });
        let callback: &mut Box<dyn FnMut()> = &mut callback;
        callback();
        true
    }
}
