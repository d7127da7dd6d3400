// Copyright 2023 the Druid Authors
// SPDX-License-Identifier: Apache-2.0

//! Application-level settings.

use std::time::Duration;

/// How [`Application::get_or_create_main_menu`] hands out menu bars.
///
/// [`Application::get_or_create_main_menu`]: crate::Application::get_or_create_main_menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenuPolicy {
    /// One bar for the whole application, as on macOS. Every caller gets the
    /// same bar and is told it is not unique.
    Shared,
    /// Every window gets its own bar, as on Windows and Linux.
    PerWindow,
}

impl Default for MainMenuPolicy {
    fn default() -> MainMenuPolicy {
        if cfg!(target_os = "macos") {
            MainMenuPolicy::Shared
        } else {
            MainMenuPolicy::PerWindow
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) main_menu: MainMenuPolicy,
    pub(crate) click_suppress_window: Duration,
    pub(crate) accelerator_separator: char,
}

impl Config {
    pub fn new() -> Config {
        Config {
            main_menu: MainMenuPolicy::default(),
            click_suppress_window: Duration::from_millis(200),
            accelerator_separator: '\t',
        }
    }

    pub fn with_main_menu(mut self, policy: MainMenuPolicy) -> Self {
        self.main_menu = policy;
        self
    }

    /// How long after a popup is dismissed a click counts as part of the
    /// dismissal.
    pub fn with_click_suppress_window(mut self, window: Duration) -> Self {
        self.click_suppress_window = window;
        self
    }

    /// The character between an item's label and its accelerator description.
    pub fn with_accelerator_separator(mut self, separator: char) -> Self {
        self.accelerator_separator = separator;
        self
    }

    pub fn main_menu(&self) -> MainMenuPolicy {
        self.main_menu
    }

    pub fn click_suppress_window(&self) -> Duration {
        self.click_suppress_window
    }

    pub fn accelerator_separator(&self) -> char {
        self.accelerator_separator
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::new()
    }
}
