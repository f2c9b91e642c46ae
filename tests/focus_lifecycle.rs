use eframe::egui;
use focus_surgery::config::Config;
use focus_surgery::notice::{Notice, Notices};
use focus_surgery::overlay::FocusOverlay;
use focus_surgery::repair::CloudStub;
use focus_surgery::store::{AppStore, ViewMode};
use focus_surgery::toggle;
use std::path::Path;

fn store_with_seven_nodes() -> AppStore {
    let mut store = AppStore::new();
    for i in 1..=7 {
        store.add_path(Path::new(&format!("media/frame{i}.png")));
    }
    store
}

fn paint(overlay: &mut FocusOverlay) {
    overlay.pointer_pressed(egui::pos2(10.0, 10.0));
    overlay.pointer_moved(egui::pos2(40.0, 25.0));
    overlay.pointer_released();
}

#[test]
fn focus_without_selection_creates_no_surface() {
    let mut store = store_with_seven_nodes();
    let mut overlay = FocusOverlay::new(&Config::default());
    let mut notices = Notices::default();

    toggle::request_focus(&mut store, &mut notices);
    overlay.sync(&store);
    overlay.enter_surgery(&store);

    assert_eq!(store.view_mode(), ViewMode::Orbit);
    assert!(overlay.surgery().is_none());
    assert!(matches!(notices.drain().next(), Some(Notice::Warning(_))));
}

#[test]
fn leaving_focus_discards_mask_and_reentry_starts_clean() {
    let mut store = store_with_seven_nodes();
    store.set_active_node(Some("n7"));
    let mut overlay = FocusOverlay::new(&Config::default());
    let mut notices = Notices::default();

    assert!(toggle::request_focus(&mut store, &mut notices));
    overlay.sync(&store);
    assert_eq!(overlay.node_id(), Some("n7"));

    overlay.enter_surgery(&store);
    paint(&mut overlay);
    assert!(overlay
        .surgery()
        .is_some_and(|s| !s.surface().is_transparent()));

    overlay.close(&mut store);
    assert_eq!(store.view_mode(), ViewMode::Orbit);
    assert!(!overlay.is_surgery_active());
    assert!(overlay.surgery().is_none());

    assert!(toggle::request_focus(&mut store, &mut notices));
    overlay.sync(&store);
    overlay.enter_surgery(&store);
    assert!(overlay
        .surgery()
        .is_some_and(|s| s.surface().is_transparent()));
}

#[test]
fn orbit_switch_from_toggle_also_ends_surgery() {
    let mut store = store_with_seven_nodes();
    store.set_active_node(Some("n3"));
    store.focus_active().expect("n3 exists");
    let mut overlay = FocusOverlay::new(&Config::default());
    overlay.sync(&store);
    overlay.enter_surgery(&store);
    assert!(overlay.is_surgery_active());

    store.set_orbit_mode();
    overlay.sync(&store);
    assert!(overlay.surgery().is_none());
    assert_eq!(overlay.node_id(), None);
}

#[test]
fn draw_events_outside_surgery_are_absorbed() {
    let mut store = store_with_seven_nodes();
    store.set_active_node(Some("n1"));
    store.focus_active().expect("n1 exists");
    let mut overlay = FocusOverlay::new(&Config::default());
    overlay.sync(&store);

    paint(&mut overlay);
    assert!(overlay.surgery().is_none());

    let stub = CloudStub::default();
    let mut notices = Notices::default();
    assert_eq!(overlay.execute_repair(&stub, &mut notices).expect("no-op"), None);
    assert_eq!(stub.submitted(), 0);
}

#[test]
fn clear_mask_then_repair_still_dispatches() {
    let mut store = store_with_seven_nodes();
    store.set_active_node(Some("n2"));
    store.focus_active().expect("n2 exists");
    let mut overlay = FocusOverlay::new(&Config::default());
    overlay.sync(&store);
    overlay.enter_surgery(&store);
    paint(&mut overlay);

    overlay.clear_mask();
    assert!(overlay
        .surgery()
        .is_some_and(|s| s.surface().is_transparent()));

    let stub = CloudStub::default();
    let mut notices = Notices::default();
    let ack = overlay
        .execute_repair(&stub, &mut notices)
        .expect("dispatch");
    assert!(ack.is_some());
    assert!(overlay.surgery().is_none());
    assert_eq!(store.view_mode(), ViewMode::Focus);
}
