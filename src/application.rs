// Copyright 2023 the Druid Authors
// SPDX-License-Identifier: Apache-2.0

//! The application: the factory for timers and menus.

use std::cell::RefCell;
use std::rc::Rc;

use once_cell::unsync::OnceCell;

use crate::backend::{ItemId, MenuBackend};
use crate::clock::Clock;
use crate::config::{Config, MainMenuPolicy};
use crate::menu::{ItemInner, Menu, MenuBar};
use crate::popup::PopupTracker;
use crate::registry::Registry;
use crate::runloop::{RunLoop, TimerHost};
use crate::timer::Timer;

/// State shared by every menu and item of one application.
pub(crate) struct AppState {
    pub(crate) backend: Rc<dyn MenuBackend>,
    pub(crate) registry: RefCell<Registry<ItemInner>>,
    pub(crate) tracker: PopupTracker,
    pub(crate) config: Config,
}

impl AppState {
    /// Run the callback of the item with this identifier, if it is still live.
    pub(crate) fn trigger_menu(&self, id: ItemId) {
        // the registry borrow must end before the callback can touch menus
        let item = self.registry.borrow().get(id);
        match item {
            Some(item) => {
                tracing::debug!("menu item {id:?} selected");
                item.trigger();
            }
            None => tracing::debug!("selection of unknown menu item {id:?}"),
        }
    }
}

/// The top-level application object.
///
/// `Application` hands out [`Timer`]s, [`Menu`]s and the main [`MenuBar`],
/// and routes native menu selections back to item callbacks.
///
/// Everything here lives on the thread that runs the event loop.
pub struct Application {
    state: Rc<AppState>,
    timers: Rc<dyn TimerHost>,
    main_menu: OnceCell<MenuBar>,
}

impl Application {
    /// Create an application on `backend`, with timers served by `run_loop`.
    pub fn new(backend: Rc<dyn MenuBackend>, run_loop: Rc<RunLoop>) -> Application {
        Application::with_config(backend, run_loop, Config::default())
    }

    pub fn with_config(
        backend: Rc<dyn MenuBackend>,
        run_loop: Rc<RunLoop>,
        config: Config,
    ) -> Application {
        let clock = run_loop.clock().clone();
        Application::from_parts(backend, run_loop, clock, config)
    }

    /// Create an application on an arbitrary timer facility.
    ///
    /// `clock` times popup dismissals; it should be the clock `timers` runs on.
    pub fn from_parts(
        backend: Rc<dyn MenuBackend>,
        timers: Rc<dyn TimerHost>,
        clock: Clock,
        config: Config,
    ) -> Application {
        tracing::debug!("creating application with {config:?}");
        Application {
            state: Rc::new(AppState {
                backend,
                registry: RefCell::new(Registry::new()),
                tracker: PopupTracker::new(clock),
                config,
            }),
            timers,
            main_menu: OnceCell::new(),
        }
    }

    /// Create an idle timer.
    pub fn create_timer(&self) -> Timer {
        Timer::new(self.timers.clone())
    }

    /// Create an empty popup menu.
    pub fn create_menu(&self) -> Menu {
        Menu::new(self.state.clone())
    }

    /// Get a menu bar for a new window.
    ///
    /// The boolean is `true` if the bar belongs to the caller alone. With
    /// [`MainMenuPolicy::Shared`] every call returns the same bar and `false`;
    /// with [`MainMenuPolicy::PerWindow`] every call creates a new bar.
    pub fn get_or_create_main_menu(&self) -> (MenuBar, bool) {
        match self.state.config.main_menu {
            MainMenuPolicy::Shared => {
                let bar = self
                    .main_menu
                    .get_or_init(|| MenuBar::new(self.state.clone()));
                (bar.clone(), false)
            }
            MainMenuPolicy::PerWindow => (MenuBar::new(self.state.clone()), true),
        }
    }

    /// Deliver a native selection notification for the item `id`.
    ///
    /// Identifiers that no longer name a live item are ignored.
    pub fn trigger_menu(&self, id: ItemId) {
        self.state.trigger_menu(id);
    }

    pub fn popup_tracker(&self) -> &PopupTracker {
        &self.state.tracker
    }

    /// Returns `true` if a click arriving now was probably the one that
    /// dismissed the last popup.
    pub fn should_suppress_click(&self) -> bool {
        self.state
            .tracker
            .suppresses_click(self.state.config.click_suppress_window)
    }

    pub fn config(&self) -> &Config {
        &self.state.config
    }

    /// The number of menu items currently registered for dispatch.
    pub fn registered_items(&self) -> usize {
        self.state.registry.borrow().len()
    }

    /// Returns `true` if `id` currently names a menu item.
    pub fn is_registered(&self, id: ItemId) -> bool {
        self.state.registry.borrow().contains(id)
    }
}
