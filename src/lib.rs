// Copyright 2023 the Druid Authors
// SPDX-License-Identifier: Apache-2.0

//! Toolkit-independent timers and menus.
//!
//! `menu-shell` wraps a native menu toolkit and the timer facility of an
//! event loop behind a small owning API:
//!
//! - [`Timer`]: a single-shot timer that calls back once per arming.
//! - [`Menu`] and [`MenuItem`]: popup menus with nested submenus, whose items
//!   carry selection callbacks, accelerator labels and check marks.
//! - [`MenuBar`]: the main menu of a window, shared or per window depending
//!   on the [`MainMenuPolicy`].
//!
//! Native toolkits are reached through the [`MenuBackend`] trait; the
//! [`HeadlessBackend`] keeps menus in memory and scripts popup outcomes.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! use menu_shell::backend::headless::{HeadlessBackend, PopupOutcome};
//! use menu_shell::{Application, Clock, RunLoop};
//!
//! let backend = Rc::new(HeadlessBackend::new());
//! let run_loop = Rc::new(RunLoop::with_clock(Clock::manual()));
//! let app = Application::new(backend.clone(), run_loop.clone());
//!
//! let opened = Rc::new(Cell::new(false));
//! let menu = app.create_menu();
//! let item = {
//!     let opened = opened.clone();
//!     menu.add_item_with("Open", move || opened.set(true))
//! };
//! backend.queue_popup(PopupOutcome::Select(item.id().unwrap()));
//! menu.pop_up();
//! assert!(opened.get());
//!
//! let fired = Rc::new(Cell::new(0));
//! let timer = app.create_timer();
//! {
//!     let fired = fired.clone();
//!     timer.set_on_timeout(move || fired.set(fired.get() + 1));
//! }
//! timer.wind_up(Duration::from_millis(100));
//! run_loop.advance(Duration::from_millis(100));
//! assert_eq!(fired.get(), 1);
//! ```

#![warn(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use keyboard_types;

mod application;
pub mod backend;
mod clock;
mod common_util;
mod config;
mod error;
pub mod hotkey;
mod menu;
mod popup;
mod registry;
mod runloop;
mod timer;

#[cfg(test)]
mod tests;

pub use application::Application;
pub use backend::headless::HeadlessBackend;
pub use backend::{ItemId, ItemInfo, MenuBackend, NativeEntry, NativeMenu};
pub use clock::Clock;
pub use common_util::Counter;
pub use config::{Config, MainMenuPolicy};
pub use error::Error;
pub use hotkey::{HotKey, IntoKey, RawMods, SysMods};
pub use menu::{Indicator, Menu, MenuBar, MenuItem};
pub use popup::PopupTracker;
pub use runloop::{RunLoop, TimerHost};
pub use timer::{Timer, TimerToken};
