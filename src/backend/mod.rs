// Copyright 2023 the Druid Authors
// SPDX-License-Identifier: Apache-2.0

//! The boundary to the native menu toolkit.
//!
//! A [`MenuBackend`] speaks in terms of opaque [`NativeMenu`] handles and
//! integer [`ItemId`]s, the way native menu APIs do. Everything above it
//! (ownership, callbacks, identifier bookkeeping) lives in [`crate::menu`].

pub mod headless;

use std::num::NonZeroU64;

use crate::error::Error;

/// An opaque handle to a native popup menu or menu bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeMenu(u64);

impl NativeMenu {
    pub const fn from_raw(raw: u64) -> NativeMenu {
        NativeMenu(raw)
    }

    pub const fn into_raw(self) -> u64 {
        self.0
    }
}

/// The identifier a native menu reports when one of its items is chosen.
///
/// Zero is never an identifier; native popups use it to mean "dismissed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(NonZeroU64);

impl ItemId {
    /// Returns `None` for zero.
    pub const fn new(raw: u64) -> Option<ItemId> {
        match NonZeroU64::new(raw) {
            Some(raw) => Some(ItemId(raw)),
            None => None,
        }
    }

    pub const fn get(self) -> u64 {
        self.0.get()
    }

    pub(crate) const fn from_nonzero(raw: NonZeroU64) -> ItemId {
        ItemId(raw)
    }

    pub(crate) const fn as_nonzero(self) -> NonZeroU64 {
        self.0
    }
}

/// The descriptive state of a native menu item.
///
/// Mutators read this, change one field and write it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInfo {
    /// The displayed text, including any accelerator suffix.
    pub label: String,
    /// Draw the checked marker as a radio dot instead of a check mark.
    pub radio: bool,
    pub checked: bool,
    pub enabled: bool,
}

impl ItemInfo {
    /// A fresh, enabled, unchecked item.
    pub fn new(label: impl Into<String>) -> ItemInfo {
        ItemInfo {
            label: label.into(),
            radio: false,
            checked: false,
            enabled: true,
        }
    }
}

/// A child of a native menu, as the toolkit sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeEntry {
    Item(ItemId, ItemInfo),
    SubMenu(NativeMenu, String),
    Separator,
}

/// A native menu toolkit.
///
/// All methods are called from the thread that runs the event loop.
/// Errors are not recoverable; callers abort on them.
pub trait MenuBackend {
    /// Create an empty menu suitable for popping up or nesting.
    fn create_popup_menu(&self) -> Result<NativeMenu, Error>;

    /// Create an empty menu bar.
    fn create_menu_bar(&self) -> Result<NativeMenu, Error>;

    /// Release a menu. Its entries must already have been removed.
    fn destroy_menu(&self, menu: NativeMenu) -> Result<(), Error>;

    fn append_item(&self, menu: NativeMenu, id: ItemId, label: &str) -> Result<(), Error>;

    /// Append `submenu` under `label`. The submenu becomes attached to `menu`
    /// until it is removed again.
    fn append_submenu(
        &self,
        menu: NativeMenu,
        submenu: NativeMenu,
        label: &str,
    ) -> Result<(), Error>;

    fn append_separator(&self, menu: NativeMenu) -> Result<(), Error>;

    /// The number of entries (items, submenus and separators) in `menu`.
    fn item_count(&self, menu: NativeMenu) -> Result<usize, Error>;

    /// Remove the entry at `position`, shifting later entries down.
    ///
    /// A removed submenu is detached but not destroyed.
    fn remove_at(&self, menu: NativeMenu, position: usize) -> Result<(), Error>;

    fn item_info(&self, menu: NativeMenu, id: ItemId) -> Result<ItemInfo, Error>;

    fn set_item_info(&self, menu: NativeMenu, id: ItemId, info: &ItemInfo) -> Result<(), Error>;

    /// Show `menu` at the pointer and block until the user picks an item or
    /// dismisses it. Returns the picked item, or `None` on dismissal.
    fn track_popup(&self, menu: NativeMenu) -> Result<Option<ItemId>, Error>;

    /// A snapshot of the entries of `menu`, in order.
    fn entries(&self, menu: NativeMenu) -> Result<Vec<NativeEntry>, Error>;
}
