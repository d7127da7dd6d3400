// Copyright 2023 the Druid Authors
// SPDX-License-Identifier: Apache-2.0

//! Hotkeys and their human-readable descriptions.

use std::borrow::Cow;

use keyboard_types::{Key, Modifiers};

cfg_if::cfg_if! {
    if #[cfg(target_os = "macos")] {
        const META_NAME: &str = "Cmd";
    } else {
        const META_NAME: &str = "Super";
    }
}

/// A description of a keyboard shortcut.
///
/// Menu items show these next to their label; see
/// [`MenuItem::set_accelerator`](crate::MenuItem::set_accelerator).
///
/// # Examples
///
/// ```
/// use menu_shell::hotkey::{HotKey, RawMods};
/// use menu_shell::keyboard_types::Key;
///
/// assert_eq!(HotKey::new(RawMods::CtrlShift, "s").description(), "Ctrl+Shift+S");
/// assert_eq!(HotKey::new(RawMods::Alt, Key::F4).description(), "Alt+F4");
/// assert_eq!(HotKey::new(None, Key::Delete).description(), "Del");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotKey {
    pub(crate) mods: RawMods,
    pub(crate) key: Key,
}

impl HotKey {
    /// Create a new hotkey.
    ///
    /// The first argument describes the keyboard modifiers. This can be `None`,
    /// or an instance of either [`SysMods`], or [`RawMods`]. [`SysMods`] unify the
    /// 'Command' key on macOS with the 'Ctrl' key on other platforms.
    ///
    /// The second argument describes the non-modifier key. This can be either
    /// a `&str` or a [`Key`]; a `&str` is taken as a [`Key::Character`].
    pub fn new(mods: impl Into<Option<RawMods>>, key: impl IntoKey) -> Self {
        HotKey {
            mods: mods.into().unwrap_or(RawMods::None),
            key: key.into_key(),
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn mods(&self) -> Modifiers {
        self.mods.into()
    }

    /// The text shown for this shortcut, such as `Ctrl+Shift+S`.
    ///
    /// Modifiers come in the order Ctrl, Alt, Shift, Super (`Cmd` on macOS).
    pub fn description(&self) -> String {
        let mods = self.mods();
        let mut out = String::new();
        for (flag, name) in [
            (Modifiers::CONTROL, "Ctrl"),
            (Modifiers::ALT, "Alt"),
            (Modifiers::SHIFT, "Shift"),
            (Modifiers::META, META_NAME),
        ] {
            if mods.contains(flag) {
                out.push_str(name);
                out.push('+');
            }
        }
        out.push_str(&key_name(&self.key));
        out
    }
}

fn key_name(key: &Key) -> Cow<'_, str> {
    let name = match key {
        Key::Character(text) if text == " " => "Space",
        Key::Character(text) => return Cow::Owned(text.to_uppercase()),
        Key::Enter => "Enter",
        Key::Tab => "Tab",
        Key::Escape => "Esc",
        Key::Backspace => "Backspace",
        Key::Delete => "Del",
        Key::Insert => "Ins",
        Key::Home => "Home",
        Key::End => "End",
        Key::PageUp => "PgUp",
        Key::PageDown => "PgDn",
        Key::ArrowUp => "Up",
        Key::ArrowDown => "Down",
        Key::ArrowLeft => "Left",
        Key::ArrowRight => "Right",
        // F-keys and anything rarer already have a readable variant name
        other => return Cow::Owned(format!("{other:?}")),
    };
    Cow::Borrowed(name)
}

/// Something that can name the non-modifier key of a [`HotKey`].
pub trait IntoKey {
    fn into_key(self) -> Key;
}

impl IntoKey for Key {
    fn into_key(self) -> Key {
        self
    }
}

impl IntoKey for &str {
    fn into_key(self) -> Key {
        Key::Character(self.into())
    }
}

impl IntoKey for char {
    fn into_key(self) -> Key {
        Key::Character(self.to_string())
    }
}

/// A platform-agnostic representation of keyboard modifiers, for command handling.
///
/// This does one thing: it allows specifying hotkeys that use the Command key
/// on macOS, but use the Ctrl key on other platforms.
#[derive(Debug, Clone, Copy)]
pub enum SysMods {
    None,
    /// Command on macOS, and Ctrl on windows/linux
    Cmd,
    /// Command + Alt on macOS, Ctrl + Alt on windows/linux
    AltCmd,
    /// Command + Shift on macOS, Ctrl + Shift on windows/linux
    CmdShift,
    /// Command + Alt + Shift on macOS, Ctrl + Alt + Shift on windows/linux
    AltCmdShift,
}

/// A representation of the active modifier keys.
///
/// This is intended to be clearer than `Modifiers`, when describing hotkeys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawMods {
    None,
    Alt,
    Ctrl,
    Meta,
    Shift,
    AltCtrl,
    AltMeta,
    AltShift,
    CtrlShift,
    CtrlMeta,
    MetaShift,
    AltCtrlMeta,
    AltCtrlShift,
    AltMetaShift,
    CtrlMetaShift,
    AltCtrlMetaShift,
}

impl From<RawMods> for Modifiers {
    fn from(src: RawMods) -> Modifiers {
        let (alt, ctrl, meta, shift) = match src {
            RawMods::None => (false, false, false, false),
            RawMods::Alt => (true, false, false, false),
            RawMods::Ctrl => (false, true, false, false),
            RawMods::Meta => (false, false, true, false),
            RawMods::Shift => (false, false, false, true),
            RawMods::AltCtrl => (true, true, false, false),
            RawMods::AltMeta => (true, false, true, false),
            RawMods::AltShift => (true, false, false, true),
            RawMods::CtrlMeta => (false, true, true, false),
            RawMods::CtrlShift => (false, true, false, true),
            RawMods::MetaShift => (false, false, true, true),
            RawMods::AltCtrlMeta => (true, true, true, false),
            RawMods::AltMetaShift => (true, false, true, true),
            RawMods::AltCtrlShift => (true, true, false, true),
            RawMods::CtrlMetaShift => (false, true, true, true),
            RawMods::AltCtrlMetaShift => (true, true, true, true),
        };
        let mut mods = Modifiers::empty();
        mods.set(Modifiers::ALT, alt);
        mods.set(Modifiers::CONTROL, ctrl);
        mods.set(Modifiers::META, meta);
        mods.set(Modifiers::SHIFT, shift);
        mods
    }
}

// we do this so that HotKey::new can accept `None` as an initial argument.
impl From<SysMods> for Option<RawMods> {
    fn from(src: SysMods) -> Option<RawMods> {
        Some(src.into())
    }
}

impl From<SysMods> for RawMods {
    fn from(src: SysMods) -> RawMods {
        #[cfg(target_os = "macos")]
        match src {
            SysMods::None => RawMods::None,
            SysMods::Cmd => RawMods::Meta,
            SysMods::AltCmd => RawMods::AltMeta,
            SysMods::CmdShift => RawMods::MetaShift,
            SysMods::AltCmdShift => RawMods::AltMetaShift,
        }
        #[cfg(not(target_os = "macos"))]
        match src {
            SysMods::None => RawMods::None,
            SysMods::Cmd => RawMods::Ctrl,
            SysMods::AltCmd => RawMods::AltCtrl,
            SysMods::CmdShift => RawMods::CtrlShift,
            SysMods::AltCmdShift => RawMods::AltCtrlShift,
        }
    }
}
