// Copyright 2023 the Druid Authors
// SPDX-License-Identifier: Apache-2.0

//! Errors at the native menu level.

use std::fmt;
use std::sync::Arc;

use crate::backend::{ItemId, NativeMenu};

/// Native toolkit errors.
///
/// These are never handed to application code: the menu layer treats every
/// one of them as a corrupted native UI state and aborts. They exist so that
/// backends can describe *what* went wrong before that happens.
#[derive(Debug, Clone)]
pub enum Error {
    /// The handle does not name a live native menu.
    InvalidMenu(NativeMenu),
    /// The menu has no item with this identifier.
    NoSuchItem(NativeMenu, ItemId),
    /// A positional operation addressed a slot past the end of the menu.
    PositionOutOfRange {
        menu: NativeMenu,
        position: usize,
        len: usize,
    },
    /// The submenu already has a parent.
    AlreadyAttached(NativeMenu),
    /// Platform specific error.
    Other(Arc<anyhow::Error>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Error::InvalidMenu(menu) => write!(f, "{menu:?} is not a live native menu"),
            Error::NoSuchItem(menu, id) => write!(f, "{menu:?} has no item {id:?}"),
            Error::PositionOutOfRange {
                menu,
                position,
                len,
            } => write!(
                f,
                "position {position} is out of range for {menu:?} with {len} entries"
            ),
            Error::AlreadyAttached(menu) => write!(f, "{menu:?} is already attached"),
            Error::Other(s) => write!(f, "{s}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<anyhow::Error> for Error {
    fn from(src: anyhow::Error) -> Error {
        Error::Other(Arc::new(src))
    }
}

/// Unwrapping for native results.
pub(crate) trait NativeResultExt<T> {
    /// Returns the value, or logs and panics with `what` as context.
    ///
    /// Native failures mean the toolkit and our model disagree; nothing
    /// sensible can be done from there on.
    fn or_abort(self, what: &str) -> T;
}

impl<T> NativeResultExt<T> for Result<T, Error> {
    #[track_caller]
    fn or_abort(self, what: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::error!("{what}: {err}");
                panic!("{what}: {err}");
            }
        }
    }
}
