use eframe::egui;
use tracing::debug;

use crate::notice::Notices;
use crate::store::{AppStore, ViewMode};

/// Focus button handler: refuses with a notice when nothing is selected.
pub fn request_focus(store: &mut AppStore, notices: &mut Notices) -> bool {
    match store.focus_active() {
        Ok(()) => true,
        Err(err) => {
            debug!(%err, "focus refused");
            notices.warning(err.to_string());
            false
        }
    }
}

pub fn show(ui: &mut egui::Ui, store: &mut AppStore, notices: &mut Notices) {
    ui.horizontal(|ui| {
        let mode = store.view_mode();
        if ui
            .selectable_label(mode == ViewMode::Orbit, "🌐 Orbit")
            .clicked()
        {
            store.set_orbit_mode();
        }
        ui.separator();
        if ui
            .selectable_label(mode == ViewMode::Focus, "🎯 Focus")
            .clicked()
            && mode != ViewMode::Focus
        {
            request_focus(store, notices);
        }
    });
}
