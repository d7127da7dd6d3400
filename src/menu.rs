// Copyright 2023 the Druid Authors
// SPDX-License-Identifier: Apache-2.0

//! Popup menus, menu bars and their items.
//!
//! Containers own their children: a [`Menu`] owns its items and submenus, a
//! [`MenuBar`] owns its menus. The handles returned by `add_item` and
//! `add_sub_menu` do not keep anything alive; once the owning container is
//! cleared or dropped they turn inert and every operation on them is a no-op.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::application::AppState;
use crate::backend::{ItemId, ItemInfo, NativeMenu};
use crate::common_util::CallbackSlot;
use crate::config::Config;
use crate::error::NativeResultExt;
use crate::hotkey::HotKey;

/// The marker drawn next to a checkable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indicator {
    #[default]
    None,
    CheckMark,
    RadioMark,
}

pub(crate) struct ItemInner {
    id: ItemId,
    /// The owning menu, reset when the menu releases this item.
    menu: RefCell<Weak<MenuInner>>,
    state: Rc<AppState>,
    on_trigger: CallbackSlot,
}

impl ItemInner {
    /// Run the selection callback, if there is one and it is not already running.
    pub(crate) fn trigger(&self) {
        if !self.on_trigger.invoke() {
            tracing::debug!("menu item {:?} has no callback to run", self.id);
        }
    }

    /// Cut the item loose from its menu. It may outlive the menu's claim on
    /// it while its own callback is running.
    fn detach(&self) {
        *self.menu.borrow_mut() = Weak::new();
    }

    fn owner(&self) -> Option<Rc<MenuInner>> {
        self.menu.borrow().upgrade()
    }
}

impl Drop for ItemInner {
    fn drop(&mut self) {
        tracing::trace!("releasing menu item {:?}", self.id);
        self.state.registry.borrow_mut().remove(self.id);
    }
}

enum Child {
    Item(Rc<ItemInner>),
    SubMenu(Rc<MenuInner>),
    Separator,
}

pub(crate) struct MenuInner {
    native: NativeMenu,
    /// Our own identity, handed to children as their parent.
    weak_self: Weak<MenuInner>,
    state: Rc<AppState>,
    children: RefCell<Vec<Child>>,
}

impl MenuInner {
    fn new(state: Rc<AppState>) -> Rc<MenuInner> {
        let native = state
            .backend
            .create_popup_menu()
            .or_abort("cannot create popup menu");
        tracing::trace!("created menu {native:?}");
        Rc::new_cyclic(|weak_self| MenuInner {
            native,
            weak_self: weak_self.clone(),
            state,
            children: RefCell::new(Vec::new()),
        })
    }

    fn add_item(&self, label: &str, on_trigger: Option<Box<dyn FnMut()>>) -> Rc<ItemInner> {
        let id = self.state.registry.borrow_mut().alloc();
        let item = Rc::new(ItemInner {
            id,
            menu: RefCell::new(self.weak_self.clone()),
            state: self.state.clone(),
            on_trigger: CallbackSlot::new(on_trigger),
        });
        self.state
            .registry
            .borrow_mut()
            .insert(id, Rc::downgrade(&item));
        self.children.borrow_mut().push(Child::Item(item.clone()));
        self.state
            .backend
            .append_item(self.native, id, label)
            .or_abort("cannot append menu item");
        tracing::trace!("added item {id:?} {label:?} to {:?}", self.native);
        item
    }

    fn add_sub_menu(&self, label: &str) -> Rc<MenuInner> {
        let sub_menu = MenuInner::new(self.state.clone());
        self.children
            .borrow_mut()
            .push(Child::SubMenu(sub_menu.clone()));
        self.state
            .backend
            .append_submenu(self.native, sub_menu.native, label)
            .or_abort("cannot append submenu");
        sub_menu
    }

    fn add_separator(&self) {
        self.children.borrow_mut().push(Child::Separator);
        self.state
            .backend
            .append_separator(self.native)
            .or_abort("cannot append menu separator");
    }

    fn clear(&self) {
        remove_native_entries(&self.state, self.native, "cannot remove menu item");
        // dropping the children frees their identifiers and destroys submenus
        let children = std::mem::take(&mut *self.children.borrow_mut());
        for child in &children {
            if let Child::Item(item) = child {
                item.detach();
            }
        }
        drop(children);
    }

    fn len(&self) -> usize {
        self.children.borrow().len()
    }

    fn items(&self) -> Vec<MenuItem> {
        self.children
            .borrow()
            .iter()
            .filter_map(|child| match child {
                Child::Item(item) => Some(MenuItem::new(item)),
                _ => None,
            })
            .collect()
    }

    fn sub_menus(&self) -> Vec<Menu> {
        self.children
            .borrow()
            .iter()
            .filter_map(|child| match child {
                Child::SubMenu(menu) => Some(Menu::child(Rc::downgrade(menu))),
                _ => None,
            })
            .collect()
    }
}

impl Drop for MenuInner {
    fn drop(&mut self) {
        self.clear();
        self.state
            .backend
            .destroy_menu(self.native)
            .or_abort("cannot destroy menu");
        tracing::trace!("destroyed menu {:?}", self.native);
    }
}

/// Remove the entries of a native menu, last first so positions stay valid.
fn remove_native_entries(state: &AppState, native: NativeMenu, what: &str) {
    let count = state
        .backend
        .item_count(native)
        .or_abort("cannot count menu items");
    for position in (0..count).rev() {
        state.backend.remove_at(native, position).or_abort(what);
    }
}

/// A popup menu, or a submenu of a menu or menu bar.
///
/// A `Menu` from [`Application::create_menu`] owns its native menu and
/// destroys it when dropped. A `Menu` returned by `add_sub_menu` is only a
/// handle; the container it was added to owns it.
///
/// [`Application::create_menu`]: crate::Application::create_menu
pub struct Menu {
    handle: MenuHandle,
}

enum MenuHandle {
    Owned(Rc<MenuInner>),
    Child(Weak<MenuInner>),
}

impl Menu {
    pub(crate) fn new(state: Rc<AppState>) -> Menu {
        Menu {
            handle: MenuHandle::Owned(MenuInner::new(state)),
        }
    }

    fn child(inner: Weak<MenuInner>) -> Menu {
        Menu {
            handle: MenuHandle::Child(inner),
        }
    }

    fn inner(&self) -> Option<Rc<MenuInner>> {
        match &self.handle {
            MenuHandle::Owned(inner) => Some(inner.clone()),
            MenuHandle::Child(inner) => inner.upgrade(),
        }
    }

    fn live(&self, op: &str) -> Option<Rc<MenuInner>> {
        let inner = self.inner();
        if inner.is_none() {
            tracing::warn!("Menu::{op} called on a released menu");
        }
        inner
    }

    /// Append an item without a selection callback.
    pub fn add_item(&self, label: &str) -> MenuItem {
        self.add_item_impl("add_item", label, None)
    }

    /// Append an item that calls `on_trigger` when selected.
    pub fn add_item_with(&self, label: &str, on_trigger: impl FnMut() + 'static) -> MenuItem {
        self.add_item_impl("add_item_with", label, Some(Box::new(on_trigger)))
    }

    fn add_item_impl(
        &self,
        op: &str,
        label: &str,
        on_trigger: Option<Box<dyn FnMut()>>,
    ) -> MenuItem {
        match self.live(op) {
            Some(menu) => MenuItem::new(&menu.add_item(label, on_trigger)),
            None => MenuItem::released(),
        }
    }

    /// Append a nested menu, owned by this one.
    pub fn add_sub_menu(&self, label: &str) -> Menu {
        match self.live("add_sub_menu") {
            Some(menu) => Menu::child(Rc::downgrade(&menu.add_sub_menu(label))),
            None => Menu::child(Weak::new()),
        }
    }

    /// Append a divider. Separators have no identifier and can't be selected.
    pub fn add_separator(&self) {
        if let Some(menu) = self.live("add_separator") {
            menu.add_separator();
        }
    }

    /// Remove and release every entry. Handles to the removed items and
    /// submenus become inert.
    pub fn clear(&self) {
        if let Some(menu) = self.live("clear") {
            menu.clear();
        }
    }

    /// Show the menu at the pointer and wait until the user is done with it.
    ///
    /// If an item is picked its callback runs before this returns. If the
    /// menu is dismissed, the application's [`PopupTracker`] records when.
    ///
    /// [`PopupTracker`]: crate::PopupTracker
    pub fn pop_up(&self) {
        let Some(menu) = self.live("pop_up") else {
            return;
        };
        let state = &menu.state;
        let picked = state
            .backend
            .track_popup(menu.native)
            .or_abort("cannot track popup menu");
        match picked {
            Some(id) => state.trigger_menu(id),
            None => {
                let at = state.tracker.record_cancel();
                tracing::debug!("popup {:?} dismissed at {at:?}", menu.native);
            }
        }
    }

    /// The number of entries, separators included.
    pub fn len(&self) -> usize {
        self.inner().map_or(0, |menu| menu.len())
    }

    /// Handles to the items of this menu, in order. Submenus are not descended into.
    pub fn items(&self) -> Vec<MenuItem> {
        self.inner().map_or_else(Vec::new, |menu| menu.items())
    }

    /// Handles to the direct submenus of this menu, in order.
    pub fn sub_menus(&self) -> Vec<Menu> {
        self.inner().map_or_else(Vec::new, |menu| menu.sub_menus())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `false` once the container owning this menu released it.
    pub fn is_alive(&self) -> bool {
        self.inner().is_some()
    }

    pub fn native(&self) -> Option<NativeMenu> {
        self.inner().map(|menu| menu.native)
    }
}

/// A handle to an item of a [`Menu`].
///
/// The handle stays valid while the item is in its menu. After the menu is
/// cleared or dropped, every operation is a no-op and [`info`] returns `None`.
///
/// [`info`]: MenuItem::info
#[derive(Clone)]
pub struct MenuItem {
    id: Option<ItemId>,
    inner: Weak<ItemInner>,
}

impl MenuItem {
    fn new(item: &Rc<ItemInner>) -> MenuItem {
        MenuItem {
            id: Some(item.id),
            inner: Rc::downgrade(item),
        }
    }

    fn released() -> MenuItem {
        MenuItem {
            id: None,
            inner: Weak::new(),
        }
    }

    /// The native identifier this item was created with.
    ///
    /// Once the item is released the identifier may name another item.
    pub fn id(&self) -> Option<ItemId> {
        self.id
    }

    /// Returns `false` once the menu released this item.
    pub fn is_alive(&self) -> bool {
        self.resolve().is_some()
    }

    /// Set the function called when this item is selected.
    pub fn set_on_trigger(&self, on_trigger: impl FnMut() + 'static) {
        if let Some(item) = self.inner.upgrade() {
            item.on_trigger.set(Some(Box::new(on_trigger)));
        }
    }

    pub fn clear_on_trigger(&self) {
        if let Some(item) = self.inner.upgrade() {
            item.on_trigger.set(None);
        }
    }

    pub fn has_on_trigger(&self) -> bool {
        self.inner
            .upgrade()
            .map_or(false, |item| item.on_trigger.is_set())
    }

    /// Show `hotkey` after the label, replacing any accelerator shown before.
    pub fn set_accelerator(&self, hotkey: &HotKey) {
        let description = hotkey.description();
        self.update("cannot set menu item string", |info, config| {
            strip_accelerator(&mut info.label, config.accelerator_separator);
            info.label.push(config.accelerator_separator);
            info.label.push_str(&description);
        });
    }

    /// Remove the accelerator description from the label, if there is one.
    pub fn clear_accelerator(&self) {
        self.update("cannot set menu item string", |info, config| {
            strip_accelerator(&mut info.label, config.accelerator_separator);
        });
    }

    /// Choose between a check mark and a radio dot. This does not check the item.
    pub fn set_indicator(&self, indicator: Indicator) {
        self.update("cannot set menu item type", |info, _| {
            info.radio = indicator == Indicator::RadioMark;
        });
    }

    /// Check or uncheck the item.
    pub fn set_active(&self, active: bool) {
        self.update("cannot set menu item state", |info, _| {
            info.checked = active;
        });
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.update("cannot set menu item state", |info, _| {
            info.enabled = enabled;
        });
    }

    /// The item's current native state, or `None` if it was released.
    pub fn info(&self) -> Option<ItemInfo> {
        let (item, menu) = self.resolve()?;
        Some(
            item.state
                .backend
                .item_info(menu.native, item.id)
                .or_abort("cannot get menu item info"),
        )
    }

    fn resolve(&self) -> Option<(Rc<ItemInner>, Rc<MenuInner>)> {
        let item = self.inner.upgrade()?;
        let menu = item.owner()?;
        Some((item, menu))
    }

    /// Read the native state, apply `f` and write it back.
    fn update(&self, what: &str, f: impl FnOnce(&mut ItemInfo, &Config)) {
        let Some((item, menu)) = self.resolve() else {
            tracing::debug!("{what}: item {:?} was released", self.id);
            return;
        };
        let backend = &item.state.backend;
        let mut info = backend
            .item_info(menu.native, item.id)
            .or_abort("cannot get menu item info");
        f(&mut info, &item.state.config);
        backend
            .set_item_info(menu.native, item.id, &info)
            .or_abort(what);
    }
}

fn strip_accelerator(label: &mut String, separator: char) {
    if let Some(at) = label.find(separator) {
        label.truncate(at);
    }
}

/// A window's menu bar.
///
/// Cloning gives another handle to the same bar.
#[derive(Clone)]
pub struct MenuBar(Rc<MenuBarInner>);

struct MenuBarInner {
    native: NativeMenu,
    state: Rc<AppState>,
    menus: RefCell<Vec<Rc<MenuInner>>>,
}

impl MenuBar {
    pub(crate) fn new(state: Rc<AppState>) -> MenuBar {
        let native = state
            .backend
            .create_menu_bar()
            .or_abort("cannot create menu bar");
        tracing::trace!("created menu bar {native:?}");
        MenuBar(Rc::new(MenuBarInner {
            native,
            state,
            menus: RefCell::new(Vec::new()),
        }))
    }

    /// Append a menu to the bar, owned by the bar.
    pub fn add_sub_menu(&self, label: &str) -> Menu {
        let bar = &self.0;
        let sub_menu = MenuInner::new(bar.state.clone());
        bar.menus.borrow_mut().push(sub_menu.clone());
        bar.state
            .backend
            .append_submenu(bar.native, sub_menu.native, label)
            .or_abort("cannot append menu to menubar");
        Menu::child(Rc::downgrade(&sub_menu))
    }

    /// Remove and release every menu of the bar.
    pub fn clear(&self) {
        self.0.clear();
    }

    /// The native bar, for attaching to a window.
    pub fn native(&self) -> NativeMenu {
        self.0.native
    }

    pub fn len(&self) -> usize {
        self.0.menus.borrow().len()
    }

    /// Handles to the menus of the bar, in order.
    pub fn menus(&self) -> Vec<Menu> {
        self.0
            .menus
            .borrow()
            .iter()
            .map(|menu| Menu::child(Rc::downgrade(menu)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if both handles name the same bar.
    pub fn ptr_eq(&self, other: &MenuBar) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl MenuBarInner {
    fn clear(&self) {
        remove_native_entries(&self.state, self.native, "cannot remove menu from menubar");
        let menus = std::mem::take(&mut *self.menus.borrow_mut());
        drop(menus);
    }
}

impl Drop for MenuBarInner {
    fn drop(&mut self) {
        self.clear();
        self.state
            .backend
            .destroy_menu(self.native)
            .or_abort("cannot destroy menubar");
        tracing::trace!("destroyed menu bar {:?}", self.native);
    }
}
