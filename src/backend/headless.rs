// Copyright 2023 the Druid Authors
// SPDX-License-Identifier: Apache-2.0

//! An in-memory menu toolkit.
//!
//! `HeadlessBackend` keeps native menus as plain vectors of entries, with the
//! same positional and attachment rules a real toolkit enforces. Popups do not
//! wait for a user; their outcomes are scripted with [`queue_popup`].
//!
//! [`queue_popup`]: HeadlessBackend::queue_popup

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};

use super::{ItemId, ItemInfo, MenuBackend, NativeEntry, NativeMenu};
use crate::error::Error;

/// What a scripted popup does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupOutcome {
    /// The user picks the item with this identifier.
    Select(ItemId),
    /// The user clicks elsewhere.
    Dismiss,
}

/// The kind of a native menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    Popup,
    Bar,
}

/// Backend operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Destroy,
    Append,
    Count,
    Remove,
    GetInfo,
    SetInfo,
    Track,
}

#[derive(Debug)]
struct MenuState {
    kind: MenuKind,
    entries: Vec<NativeEntry>,
    attached_to: Option<NativeMenu>,
}

#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_handle: Cell<u64>,
    menus: RefCell<BTreeMap<NativeMenu, MenuState>>,
    popups: RefCell<VecDeque<PopupOutcome>>,
    popups_shown: Cell<usize>,
    failure: Cell<Option<Operation>>,
}

impl HeadlessBackend {
    pub fn new() -> HeadlessBackend {
        HeadlessBackend::default()
    }

    /// Script the outcome of the next popup. Unscripted popups are dismissed.
    pub fn queue_popup(&self, outcome: PopupOutcome) {
        self.popups.borrow_mut().push_back(outcome);
    }

    /// Make the next call of `op` fail.
    pub fn fail_next(&self, op: Operation) {
        self.failure.set(Some(op));
    }

    /// How many popups have been shown so far.
    pub fn popups_shown(&self) -> usize {
        self.popups_shown.get()
    }

    /// The number of menus and menu bars that have not been destroyed.
    pub fn live_menus(&self) -> usize {
        self.menus.borrow().len()
    }

    pub fn kind(&self, menu: NativeMenu) -> Option<MenuKind> {
        self.menus.borrow().get(&menu).map(|state| state.kind)
    }

    /// The menu `menu` is currently attached to, if any.
    pub fn parent(&self, menu: NativeMenu) -> Option<NativeMenu> {
        self.menus
            .borrow()
            .get(&menu)
            .and_then(|state| state.attached_to)
    }

    fn check(&self, op: Operation) -> Result<(), Error> {
        if self.failure.get() == Some(op) {
            self.failure.set(None);
            return Err(anyhow::anyhow!("injected {op:?} failure").into());
        }
        Ok(())
    }

    fn create(&self, kind: MenuKind) -> Result<NativeMenu, Error> {
        self.check(Operation::Create)?;
        let raw = self.next_handle.get() + 1;
        self.next_handle.set(raw);
        let menu = NativeMenu::from_raw(raw);
        self.menus.borrow_mut().insert(
            menu,
            MenuState {
                kind,
                entries: Vec::new(),
                attached_to: None,
            },
        );
        tracing::trace!("created {kind:?} menu {menu:?}");
        Ok(menu)
    }

    fn with_menu<R>(
        &self,
        menu: NativeMenu,
        f: impl FnOnce(&mut MenuState) -> Result<R, Error>,
    ) -> Result<R, Error> {
        let mut menus = self.menus.borrow_mut();
        let state = menus.get_mut(&menu).ok_or(Error::InvalidMenu(menu))?;
        f(state)
    }

    fn find_item(
        state: &mut MenuState,
        menu: NativeMenu,
        id: ItemId,
    ) -> Result<&mut ItemInfo, Error> {
        state
            .entries
            .iter_mut()
            .find_map(|entry| match entry {
                NativeEntry::Item(item, info) if *item == id => Some(info),
                _ => None,
            })
            .ok_or(Error::NoSuchItem(menu, id))
    }
}

impl MenuBackend for HeadlessBackend {
    fn create_popup_menu(&self) -> Result<NativeMenu, Error> {
        self.create(MenuKind::Popup)
    }

    fn create_menu_bar(&self) -> Result<NativeMenu, Error> {
        self.create(MenuKind::Bar)
    }

    fn destroy_menu(&self, menu: NativeMenu) -> Result<(), Error> {
        self.check(Operation::Destroy)?;
        let mut menus = self.menus.borrow_mut();
        let state = menus.get(&menu).ok_or(Error::InvalidMenu(menu))?;
        if let Some(parent) = state.attached_to {
            return Err(anyhow::anyhow!("{menu:?} is still attached to {parent:?}").into());
        }
        if !state.entries.is_empty() {
            return Err(anyhow::anyhow!(
                "{menu:?} still has {} entries",
                state.entries.len()
            )
            .into());
        }
        menus.remove(&menu);
        tracing::trace!("destroyed menu {menu:?}");
        Ok(())
    }

    fn append_item(&self, menu: NativeMenu, id: ItemId, label: &str) -> Result<(), Error> {
        self.check(Operation::Append)?;
        self.with_menu(menu, |state| {
            state.entries.push(NativeEntry::Item(id, ItemInfo::new(label)));
            Ok(())
        })
    }

    fn append_submenu(
        &self,
        menu: NativeMenu,
        submenu: NativeMenu,
        label: &str,
    ) -> Result<(), Error> {
        self.check(Operation::Append)?;
        let mut menus = self.menus.borrow_mut();
        if !menus.contains_key(&menu) {
            return Err(Error::InvalidMenu(menu));
        }
        let sub = menus.get_mut(&submenu).ok_or(Error::InvalidMenu(submenu))?;
        if sub.kind != MenuKind::Popup || submenu == menu {
            return Err(Error::InvalidMenu(submenu));
        }
        if sub.attached_to.is_some() {
            return Err(Error::AlreadyAttached(submenu));
        }
        sub.attached_to = Some(menu);
        if let Some(parent) = menus.get_mut(&menu) {
            parent
                .entries
                .push(NativeEntry::SubMenu(submenu, label.to_owned()));
        }
        Ok(())
    }

    fn append_separator(&self, menu: NativeMenu) -> Result<(), Error> {
        self.check(Operation::Append)?;
        self.with_menu(menu, |state| {
            state.entries.push(NativeEntry::Separator);
            Ok(())
        })
    }

    fn item_count(&self, menu: NativeMenu) -> Result<usize, Error> {
        self.check(Operation::Count)?;
        self.with_menu(menu, |state| Ok(state.entries.len()))
    }

    fn remove_at(&self, menu: NativeMenu, position: usize) -> Result<(), Error> {
        self.check(Operation::Remove)?;
        let removed = self.with_menu(menu, |state| {
            let len = state.entries.len();
            if position >= len {
                return Err(Error::PositionOutOfRange {
                    menu,
                    position,
                    len,
                });
            }
            Ok(state.entries.remove(position))
        })?;
        if let NativeEntry::SubMenu(submenu, _) = removed {
            if let Some(state) = self.menus.borrow_mut().get_mut(&submenu) {
                state.attached_to = None;
            }
        }
        Ok(())
    }

    fn item_info(&self, menu: NativeMenu, id: ItemId) -> Result<ItemInfo, Error> {
        self.check(Operation::GetInfo)?;
        self.with_menu(menu, |state| {
            HeadlessBackend::find_item(state, menu, id).map(|info| info.clone())
        })
    }

    fn set_item_info(&self, menu: NativeMenu, id: ItemId, info: &ItemInfo) -> Result<(), Error> {
        self.check(Operation::SetInfo)?;
        self.with_menu(menu, |state| {
            *HeadlessBackend::find_item(state, menu, id)? = info.clone();
            Ok(())
        })
    }

    fn track_popup(&self, menu: NativeMenu) -> Result<Option<ItemId>, Error> {
        self.check(Operation::Track)?;
        if !self.menus.borrow().contains_key(&menu) {
            return Err(Error::InvalidMenu(menu));
        }
        self.popups_shown.set(self.popups_shown.get() + 1);
        let outcome = self.popups.borrow_mut().pop_front();
        match outcome {
            Some(PopupOutcome::Select(id)) => Ok(Some(id)),
            Some(PopupOutcome::Dismiss) => Ok(None),
            None => {
                tracing::debug!("no popup outcome queued for {menu:?}, dismissing");
                Ok(None)
            }
        }
    }

    fn entries(&self, menu: NativeMenu) -> Result<Vec<NativeEntry>, Error> {
        self.with_menu(menu, |state| Ok(state.entries.clone()))
    }
}
