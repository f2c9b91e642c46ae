use eframe::egui;
use egui_extras::{Column, TableBuilder};
use tracing::info;

use crate::notice::Notices;
use crate::store::AppStore;
use crate::toggle;

const MEDIA_FILTER: &[&str] = &[
    "png", "jpg", "jpeg", "webp", "bmp", "gif", "mp4", "webm", "mov", "mkv",
];

/// Node browser shown in orbit mode: click selects, double-click focuses.
pub fn show(ui: &mut egui::Ui, store: &mut AppStore, notices: &mut Notices) {
    ui.horizontal(|ui| {
        if ui.button("Add media…").clicked() {
            if let Some(paths) = rfd::FileDialog::new()
                .add_filter("media", MEDIA_FILTER)
                .pick_files()
            {
                for path in paths {
                    let id = store.add_path(&path);
                    info!(%id, path = %path.display(), "node added");
                }
            }
        }
        ui.separator();
        ui.label(format!(
            "Selected: {}",
            store.active_node_id().unwrap_or("—")
        ));
    });
    ui.separator();

    if store.nodes().is_empty() {
        ui.centered_and_justified(|ui| {
            ui.label("No nodes yet. Add an image or video to begin.");
        });
        return;
    }

    let mut clicked: Option<String> = None;
    let mut focus: Option<String> = None;
    let active = store.active_node_id().map(str::to_string);

    TableBuilder::new(ui)
        .striped(true)
        .sense(egui::Sense::click())
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(160.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in ["ID", "KIND", "LABEL", "SOURCE"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for node in store.nodes() {
                body.row(20.0, |mut row| {
                    row.set_selected(active.as_deref() == Some(node.id.as_str()));
                    row.col(|ui| {
                        ui.monospace(&node.id);
                    });
                    row.col(|ui| {
                        ui.label(node.media.kind_label());
                    });
                    row.col(|ui| {
                        ui.label(&node.label);
                    });
                    row.col(|ui| {
                        ui.label(node.media.source());
                    });
                    let response = row.response();
                    if response.double_clicked() {
                        focus = Some(node.id.clone());
                    } else if response.clicked() {
                        clicked = Some(node.id.clone());
                    }
                });
            }
        });

    if let Some(id) = clicked {
        store.set_active_node(Some(id.as_str()));
    }
    if let Some(id) = focus {
        store.set_active_node(Some(id.as_str()));
        toggle::request_focus(store, notices);
    }
}
