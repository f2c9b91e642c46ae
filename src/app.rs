use eframe::egui;
use egui_notify::Toasts;

use crate::config::Config;
use crate::notice::Notices;
use crate::orbit;
use crate::overlay::FocusOverlay;
use crate::repair::{CloudStub, RepairDispatcher};
use crate::store::{AppStore, ViewMode};
use crate::toggle;

pub struct FocusApp {
    store: AppStore,
    overlay: FocusOverlay,
    dispatcher: Box<dyn RepairDispatcher>,
    notices: Notices,
    toasts: Toasts,
}

impl FocusApp {
    pub fn new(config: &Config, store: AppStore) -> Self {
        Self::with_dispatcher(config, store, Box::new(CloudStub::default()))
    }

    pub fn with_dispatcher(
        config: &Config,
        store: AppStore,
        dispatcher: Box<dyn RepairDispatcher>,
    ) -> Self {
        Self {
            store,
            overlay: FocusOverlay::new(config),
            dispatcher,
            notices: Notices::default(),
            toasts: Toasts::default(),
        }
    }
}

impl eframe::App for FocusApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("viewport_toggle").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                toggle::show(ui, &mut self.store, &mut self.notices);
            });
        });

        match self.store.view_mode() {
            ViewMode::Orbit => {
                // Drops any mask left over from a previous focus session.
                self.overlay.sync(&self.store);
                egui::CentralPanel::default().show(ctx, |ui| {
                    orbit::show(ui, &mut self.store, &mut self.notices);
                });
            }
            ViewMode::Focus => {
                self.overlay.show(
                    ctx,
                    &mut self.store,
                    self.dispatcher.as_ref(),
                    &mut self.notices,
                );
            }
        }

        self.notices.flush_into(&mut self.toasts);
        self.toasts.show(ctx);
    }
}
