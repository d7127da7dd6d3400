// Copyright 2023 the Druid Authors
// SPDX-License-Identifier: Apache-2.0

//! Additional unit tests that cross file or module boundaries.


use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use test_log::test;

use crate::backend::headless::Operation;
use crate::*;
use harness::*;

fn label(item: &MenuItem) -> String {
    item.info().unwrap().label
}

#[test]
fn timer_fires_once_per_wind_up() {
    let h = Harness::new();
    let count = CallCounter::default();
    let timer = h.app.create_timer();
    timer.set_on_timeout(count.callback());

    timer.wind_up(Duration::from_millis(100));
    h.advance_ms(50);
    // re-arming restarts the countdown
    timer.wind_up(Duration::from_millis(100));
    h.advance_ms(60);
    assert_eq!(count.get(), 0);
    assert!(timer.is_armed());

    h.advance_ms(40);
    assert_eq!(count.get(), 1);
    assert!(!timer.is_armed());

    assert_eq!(h.run_loop.run_until_idle(), 0);
    assert_eq!(count.get(), 1);
}

#[test]
fn dropped_timer_never_fires() {
    let h = Harness::new();
    let count = CallCounter::default();
    let timer = h.app.create_timer();
    timer.set_on_timeout(count.callback());
    timer.wind_up(Duration::from_millis(10));
    drop(timer);

    assert_eq!(h.run_loop.pending(), 0);
    h.advance_ms(100);
    assert_eq!(count.get(), 0);
}

#[test]
fn timer_can_drive_a_popup() {
    let h = Harness::new();
    let menu = Rc::new(h.app.create_menu());
    menu.add_item("Paste");
    let timer = h.app.create_timer();
    {
        let menu = Rc::downgrade(&menu);
        timer.set_on_timeout(move || {
            if let Some(menu) = menu.upgrade() {
                menu.pop_up();
            }
        });
    }
    timer.wind_up(Duration::from_millis(500));
    h.advance_ms(500);

    assert_eq!(h.backend.popups_shown(), 1);
    assert_eq!(
        h.app.popup_tracker().last_cancel(),
        Some(Duration::from_millis(500))
    );
}

#[test]
fn native_structure_follows_the_model() {
    let h = Harness::new();
    let menu = h.app.create_menu();
    let open = menu.add_item("Open");
    menu.add_separator();
    let recent = menu.add_sub_menu("Recent");
    let file = recent.add_item("notes.txt");

    let native = menu.native().unwrap();
    assert_eq!(
        h.entries(native),
        vec![
            NativeEntry::Item(open.id().unwrap(), ItemInfo::new("Open")),
            NativeEntry::Separator,
            NativeEntry::SubMenu(recent.native().unwrap(), "Recent".into()),
        ]
    );
    assert_eq!(
        h.entries(recent.native().unwrap()),
        vec![NativeEntry::Item(file.id().unwrap(), ItemInfo::new("notes.txt"))]
    );
    assert_eq!(menu.len(), 3);
    assert_eq!(h.backend.live_menus(), 2);
    assert_eq!(h.app.registered_items(), 2);

    menu.clear();
    assert!(h.entries(native).is_empty());
    assert!(menu.is_empty());
    assert!(!recent.is_alive());
    assert!(!open.is_alive());
    assert!(!file.is_alive());
    assert_eq!(h.backend.live_menus(), 1);
    assert_eq!(h.app.registered_items(), 0);

    drop(menu);
    assert_eq!(h.backend.live_menus(), 0);
}

#[test]
fn clear_is_idempotent() {
    let h = Harness::new();
    let menu = h.app.create_menu();
    menu.add_item("Cut");
    menu.add_separator();
    menu.clear();
    menu.clear();
    assert!(menu.is_empty());
    assert!(h.entries(menu.native().unwrap()).is_empty());

    let empty = h.app.create_menu();
    empty.clear();
    assert!(empty.is_empty());
}

#[test]
fn identifiers_are_unique_and_reused_after_release() {
    let h = Harness::new();
    let menu = h.app.create_menu();
    let a = menu.add_item("A");
    let b = menu.add_item("B");
    let sub = menu.add_sub_menu("More");
    let c = sub.add_item("C");
    let ids = [a.id().unwrap(), b.id().unwrap(), c.id().unwrap()];
    assert_ne!(ids[0], ids[1]);
    assert_ne!(ids[1], ids[2]);
    assert_ne!(ids[0], ids[2]);
    assert!(ids.iter().all(|&id| h.app.is_registered(id)));

    menu.clear();
    assert!(ids.iter().all(|&id| !h.app.is_registered(id)));

    let d = menu.add_item("D");
    assert_eq!(d.id(), Some(ids[0]));
}

#[test]
fn menu_bar_owns_its_menus() {
    let h = Harness::new();
    let (bar, _) = h.app.get_or_create_main_menu();
    let file = bar.add_sub_menu("File");
    let quit = file.add_item("Quit");
    assert_eq!(bar.len(), 1);
    assert_eq!(
        h.entries(bar.native()),
        vec![NativeEntry::SubMenu(file.native().unwrap(), "File".into())]
    );
    assert_eq!(h.backend.parent(file.native().unwrap()), Some(bar.native()));

    bar.clear();
    assert!(bar.is_empty());
    assert!(!file.is_alive());
    assert!(!quit.is_alive());
    assert_eq!(h.backend.live_menus(), 1);
}

#[test]
fn clearing_an_empty_menu_bar_is_idempotent() {
    let h = Harness::new();
    let (bar, _) = h.app.get_or_create_main_menu();
    bar.clear();
    bar.clear();
    assert!(bar.is_empty());
    assert!(h.entries(bar.native()).is_empty());

    bar.add_sub_menu("Help");
    bar.clear();
    bar.clear();
    assert_eq!(bar.len(), 0);
    assert!(h.entries(bar.native()).is_empty());
    assert_eq!(h.backend.live_menus(), 1);
}

#[test]
fn shared_main_menu_policy() {
    let h = Harness::with_config(Config::new().with_main_menu(MainMenuPolicy::Shared));
    let (first, unique) = h.app.get_or_create_main_menu();
    assert!(!unique);
    first.add_sub_menu("Edit");
    let (second, unique) = h.app.get_or_create_main_menu();
    assert!(!unique);
    assert_eq!(second.native(), first.native());
    assert_eq!(second.len(), 1);
}

#[test]
fn per_window_main_menu_policy() {
    let h = Harness::with_config(Config::new().with_main_menu(MainMenuPolicy::PerWindow));
    let (first, unique) = h.app.get_or_create_main_menu();
    assert!(unique);
    let (second, unique) = h.app.get_or_create_main_menu();
    assert!(unique);
    assert_ne!(second.native(), first.native());
}

#[test]
fn accelerator_replaces_previous_suffix() {
    let h = Harness::new();
    let menu = h.app.create_menu();
    let save = menu.add_item("Save");

    save.set_accelerator(&HotKey::new(RawMods::Ctrl, "s"));
    assert_eq!(label(&save), "Save\tCtrl+S");
    save.set_accelerator(&HotKey::new(RawMods::CtrlShift, "s"));
    assert_eq!(label(&save), "Save\tCtrl+Shift+S");
    save.clear_accelerator();
    assert_eq!(label(&save), "Save");
    save.clear_accelerator();
    assert_eq!(label(&save), "Save");
}

#[test]
fn accelerator_separator_is_configurable() {
    let h = Harness::with_config(Config::new().with_accelerator_separator('|'));
    let menu = h.app.create_menu();
    let quit = menu.add_item("Quit");
    quit.set_accelerator(&HotKey::new(RawMods::Alt, keyboard_types::Key::F4));
    assert_eq!(label(&quit), "Quit|Alt+F4");
}

#[test]
fn indicator_and_state() {
    let h = Harness::new();
    let menu = h.app.create_menu();
    let item = menu.add_item("Grid");

    item.set_indicator(Indicator::RadioMark);
    let info = item.info().unwrap();
    assert!(info.radio);
    assert!(!info.checked);

    item.set_active(true);
    item.set_indicator(Indicator::CheckMark);
    let info = item.info().unwrap();
    assert!(!info.radio);
    assert!(info.checked);

    item.set_indicator(Indicator::None);
    item.set_enabled(false);
    let info = item.info().unwrap();
    assert!(!info.radio);
    assert!(!info.enabled);
    assert_eq!(info.label, "Grid");
}

#[test]
fn selection_runs_only_the_chosen_callback() {
    let h = Harness::new();
    let menu = h.app.create_menu();
    let x_count = CallCounter::default();
    let y_count = CallCounter::default();
    let x = menu.add_item_with("X", x_count.callback());
    let y = menu.add_item_with("Y", y_count.callback());

    h.select(&menu, &y);
    assert_eq!((x_count.get(), y_count.get()), (0, 1));

    h.app.trigger_menu(x.id().unwrap());
    assert_eq!((x_count.get(), y_count.get()), (1, 1));

    h.app.trigger_menu(ItemId::new(999).unwrap());
    assert_eq!((x_count.get(), y_count.get()), (1, 1));
}

#[test]
fn item_without_callback_is_selectable() {
    let h = Harness::new();
    let menu = h.app.create_menu();
    let item = menu.add_item("Nothing");
    assert!(!item.has_on_trigger());
    h.select(&menu, &item);

    let count = CallCounter::default();
    item.set_on_trigger(count.callback());
    h.select(&menu, &item);
    assert_eq!(count.get(), 1);

    item.clear_on_trigger();
    h.select(&menu, &item);
    assert_eq!(count.get(), 1);
}

#[test]
fn selection_after_clear_does_nothing() {
    let h = Harness::new();
    let menu = h.app.create_menu();
    let old_count = CallCounter::default();
    let old = menu.add_item_with("Old", old_count.callback());
    let id = old.id().unwrap();

    menu.clear();
    h.app.trigger_menu(id);
    assert_eq!(old_count.get(), 0);

    // the identifier now names a different item
    let new_count = CallCounter::default();
    let new = menu.add_item_with("New", new_count.callback());
    assert_eq!(new.id(), Some(id));
    h.app.trigger_menu(id);
    assert_eq!((old_count.get(), new_count.get()), (0, 1));
}

#[test]
fn callback_may_clear_its_own_menu() {
    let h = Harness::new();
    let menu = Rc::new(h.app.create_menu());
    let ran = Rc::new(Cell::new(false));
    let item = {
        let weak = Rc::downgrade(&menu);
        let ran = ran.clone();
        menu.add_item_with("Reset", move || {
            ran.set(true);
            if let Some(menu) = weak.upgrade() {
                menu.clear();
            }
        })
    };
    menu.add_item("Other");

    h.select(&menu, &item);
    assert!(ran.get());
    assert!(menu.is_empty());
    assert!(!item.is_alive());
    assert_eq!(h.app.registered_items(), 0);
}

#[test]
fn callback_may_replace_itself() {
    let h = Harness::new();
    let menu = h.app.create_menu();
    let log = Rc::new(std::cell::RefCell::new(Vec::new()));
    let item = menu.add_item("Toggle");
    {
        let handle = item.clone();
        let log = log.clone();
        item.set_on_trigger(move || {
            log.borrow_mut().push("on");
            let log = log.clone();
            handle.set_on_trigger(move || log.borrow_mut().push("off"));
        });
    }
    h.select(&menu, &item);
    h.select(&menu, &item);
    h.select(&menu, &item);
    assert_eq!(*log.borrow(), ["on", "off", "off"]);
}

#[test]
fn dismissal_is_recorded_for_click_suppression() {
    let h = Harness::new();
    let menu = h.app.create_menu();
    let item = menu.add_item("Copy");
    assert!(!h.app.should_suppress_click());

    h.advance_ms(1_000);
    h.dismiss(&menu);
    let tracker = h.app.popup_tracker();
    assert_eq!(tracker.last_cancel(), Some(Duration::from_millis(1_000)));
    assert!(h.app.should_suppress_click());

    // a selection leaves the record alone
    h.advance_ms(50);
    h.select(&menu, &item);
    assert_eq!(tracker.last_cancel(), Some(Duration::from_millis(1_000)));

    h.advance_ms(150);
    assert!(!h.app.should_suppress_click());
    assert_eq!(h.backend.popups_shown(), 2);
}

#[test]
fn click_suppress_window_is_configurable() {
    let config = Config::new().with_click_suppress_window(Duration::from_millis(20));
    let h = Harness::with_config(config);
    let menu = h.app.create_menu();
    h.dismiss(&menu);
    h.advance_ms(19);
    assert!(h.app.should_suppress_click());
    h.advance_ms(1);
    assert!(!h.app.should_suppress_click());
}

#[test]
#[should_panic(expected = "cannot append menu item")]
fn failed_append_aborts() {
    let h = Harness::new();
    let menu = h.app.create_menu();
    h.backend.fail_next(Operation::Append);
    menu.add_item("Broken");
}

#[test]
#[should_panic(expected = "cannot create popup menu")]
fn failed_create_aborts() {
    let h = Harness::new();
    h.backend.fail_next(Operation::Create);
    h.app.create_menu();
}

#[test]
#[should_panic(expected = "cannot remove menu item")]
fn failed_removal_aborts() {
    let h = Harness::new();
    let menu = h.app.create_menu();
    menu.add_item("Stuck");
    h.backend.fail_next(Operation::Remove);
    menu.clear();
}

#[test]
#[should_panic(expected = "cannot set menu item state")]
fn failed_state_update_aborts() {
    let h = Harness::new();
    let menu = h.app.create_menu();
    let item = menu.add_item("Stuck");
    h.backend.fail_next(Operation::SetInfo);
    item.set_enabled(false);
}

#[test]
#[should_panic(expected = "cannot track popup menu")]
fn failed_popup_aborts() {
    let h = Harness::new();
    let menu = h.app.create_menu();
    h.backend.fail_next(Operation::Track);
    menu.pop_up();
}

#[test]
#[should_panic(expected = "cannot destroy menu")]
fn failed_destroy_aborts() {
    let h = Harness::new();
    let menu = h.app.create_menu();
    h.backend.fail_next(Operation::Destroy);
    drop(menu);
}

#[test]
fn nested_selection_of_the_same_item_is_ignored() {
    use crate::backend::headless::PopupOutcome;

    let h = Harness::new();
    let menu = Rc::new(h.app.create_menu());
    let count = Rc::new(Cell::new(0));
    let item = menu.add_item("Again");
    let id = item.id().unwrap();
    {
        let weak = Rc::downgrade(&menu);
        let backend = h.backend.clone();
        let count = count.clone();
        item.set_on_trigger(move || {
            count.set(count.get() + 1);
            // select this item again from a nested popup
            if let Some(menu) = weak.upgrade() {
                backend.queue_popup(PopupOutcome::Select(id));
                menu.pop_up();
            }
        });
    }
    h.select(&menu, &item);
    assert_eq!(count.get(), 1);
    assert_eq!(h.backend.popups_shown(), 2);

    // the callback is back in place afterwards
    h.app.trigger_menu(id);
    assert_eq!(count.get(), 2);
}

#[test]
fn handles_can_be_recovered_from_containers() {
    let h = Harness::new();
    let (bar, _) = h.app.get_or_create_main_menu();
    let view = bar.add_sub_menu("View");
    let zoom = view.add_item("Zoom In");
    view.add_separator();
    let panels = view.add_sub_menu("Panels");
    let reset = view.add_item("Reset");

    let items = view.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id(), zoom.id());
    assert_eq!(items[1].id(), reset.id());

    let sub_menus = view.sub_menus();
    assert_eq!(sub_menus.len(), 1);
    assert_eq!(sub_menus[0].native(), panels.native());

    let menus = bar.menus();
    assert_eq!(menus.len(), 1);
    assert_eq!(menus[0].native(), view.native());

    bar.clear();
    assert!(view.items().is_empty());
    assert!(bar.menus().is_empty());
}

#[test]
fn callback_may_rebuild_its_own_menu_and_touch_its_handle() {
    let h = Harness::new();
    let menu = Rc::new(h.app.create_menu());
    let recent = menu.add_item("notes.txt");
    let seen = Rc::new(Cell::new(None));
    {
        let weak = Rc::downgrade(&menu);
        let handle = recent.clone();
        let seen = seen.clone();
        recent.set_on_trigger(move || {
            let Some(menu) = weak.upgrade() else {
                return;
            };
            menu.clear();
            // the handle is released even though this callback still runs
            handle.set_enabled(false);
            handle.set_accelerator(&HotKey::new(RawMods::Ctrl, "r"));
            seen.set(Some((handle.is_alive(), handle.info().is_some())));
            menu.add_item("todo.txt");
        });
    }
    h.select(&menu, &recent);

    assert_eq!(seen.get(), Some((false, false)));
    assert!(!recent.is_alive());
    assert_eq!(recent.info(), None);
    let items = menu.items();
    assert_eq!(items.len(), 1);
    assert_eq!(label(&items[0]), "todo.txt");
    assert_eq!(h.app.registered_items(), 1);
}
