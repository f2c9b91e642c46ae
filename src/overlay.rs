//! Focus overlay: the modal view of one node's media, with the surgery
//! (masking) tool for images and a play/pause control for videos.

use eframe::egui;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::brush::{BrushConfig, MAX_BRUSH_RADIUS, MIN_BRUSH_RADIUS};
use crate::config::Config;
use crate::error::{ExportError, RepairError};
use crate::masking::MaskingSession;
use crate::notice::Notices;
use crate::repair::{JobAck, RepairDispatcher, RepairRequest, QUEUED_NOTICE};
use crate::store::{AppStore, Media, ViewMode};
use crate::surface::DirtyRect;

const ACCENT: egui::Color32 = egui::Color32::from_rgb(0xbe, 0xf2, 0x64);
const MEDIA_PADDING: f32 = 40.0;
const MOCK_PROGRESS: f32 = 0.6;

pub struct FocusOverlay {
    node_id: Option<String>,
    surgery: Option<MaskingSession>,
    brush: BrushConfig,
    mask_color: image::Rgba<u8>,
    fallback_size: (u32, u32),
    prompt: String,
    is_playing: bool,
    /// Last rendered media box, in screen coordinates.
    media_rect: Option<egui::Rect>,

    media_texture: Option<egui::TextureHandle>,
    media_size: Option<egui::Vec2>,
    media_failed: bool,
    mask_texture: Option<egui::TextureHandle>,
}

impl FocusOverlay {
    pub fn new(config: &Config) -> Self {
        Self {
            node_id: None,
            surgery: None,
            brush: config.brush(),
            mask_color: config.mask_color(),
            fallback_size: (config.fallback_surface_size[0], config.fallback_surface_size[1]),
            prompt: String::new(),
            is_playing: true,
            media_rect: None,
            media_texture: None,
            media_size: None,
            media_failed: false,
            mask_texture: None,
        }
    }

    pub fn node_id(&self) -> Option<&str> {
        self.node_id.as_deref()
    }

    pub fn surgery(&self) -> Option<&MaskingSession> {
        self.surgery.as_ref()
    }

    pub fn is_surgery_active(&self) -> bool {
        self.surgery.as_ref().is_some_and(MaskingSession::is_active)
    }

    pub fn brush_radius(&self) -> i32 {
        self.brush.radius()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Rebinds the overlay to the store's focused node. Leaving focus mode or
    /// switching nodes discards the mask and any per-node UI state.
    pub fn sync(&mut self, store: &AppStore) {
        let focused = match store.view_mode() {
            ViewMode::Focus => store.focused_node_id(),
            ViewMode::Orbit => None,
        };
        if focused == self.node_id.as_deref() {
            return;
        }
        debug!(from = ?self.node_id, to = ?focused, "focus overlay rebinding");
        self.exit_surgery();
        self.node_id = focused.map(str::to_string);
        self.is_playing = true;
        self.prompt.clear();
        self.media_rect = None;
        self.media_texture = None;
        self.media_size = None;
        self.media_failed = false;
    }

    fn focused_media<'a>(&self, store: &'a AppStore) -> Option<&'a Media> {
        let id = self.node_id.as_deref()?;
        store.node(id).map(|n| &n.media)
    }

    /// Surgery is only offered for images that actually loaded.
    pub fn can_operate(&self, store: &AppStore) -> bool {
        !self.media_failed && self.focused_media(store).is_some_and(|m| !m.is_video())
    }

    pub fn media_failed(&self) -> bool {
        self.media_failed
    }

    pub fn toggle_surgery(&mut self, store: &AppStore) {
        if self.surgery.is_some() {
            self.exit_surgery();
        } else {
            self.enter_surgery(store);
        }
    }

    pub fn enter_surgery(&mut self, store: &AppStore) {
        if self.surgery.is_some() || !self.can_operate(store) {
            return;
        }
        let (origin, size) = match self.media_rect {
            Some(rect) => (rect.min, rect_pixel_size(rect)),
            None => (egui::Pos2::ZERO, self.fallback_size),
        };
        let mut session = MaskingSession::new(size.0, size.1, self.brush, self.mask_color);
        session.set_bounds((origin.x, origin.y), size);
        session.enter();
        info!(node = ?self.node_id, width = size.0, height = size.1, "surgery mode on");
        self.surgery = Some(session);
    }

    /// Ends surgery mode and drops the mask surface.
    pub fn exit_surgery(&mut self) {
        if let Some(mut session) = self.surgery.take() {
            session.exit();
            info!(node = ?self.node_id, "surgery mode off");
        }
        self.mask_texture = None;
    }

    pub fn set_brush_radius(&mut self, px: i32) {
        self.brush.set_radius(px);
        if let Some(session) = self.surgery.as_mut() {
            session.set_brush_radius(px);
        }
    }

    pub fn clear_mask(&mut self) {
        if let Some(session) = self.surgery.as_mut() {
            session.clear();
        }
    }

    pub fn pointer_pressed(&mut self, screen: egui::Pos2) {
        if let Some(session) = self.surgery.as_mut() {
            session.begin_stroke((screen.x, screen.y));
        }
    }

    pub fn pointer_moved(&mut self, screen: egui::Pos2) {
        if let Some(session) = self.surgery.as_mut() {
            session.extend_stroke((screen.x, screen.y));
        }
    }

    /// Release and leave both end the stroke.
    pub fn pointer_released(&mut self) {
        if let Some(session) = self.surgery.as_mut() {
            session.end_stroke();
        }
    }

    pub fn media_laid_out(&mut self, rect: egui::Rect) {
        self.media_rect = Some(rect);
        if let Some(session) = self.surgery.as_mut() {
            session.set_bounds((rect.min.x, rect.min.y), rect_pixel_size(rect));
        }
    }

    pub fn toggle_play(&mut self) {
        self.is_playing = !self.is_playing;
    }

    /// Packages the mask with the prompt and hands it off, then leaves
    /// surgery mode. Does nothing outside surgery mode.
    pub fn execute_repair(
        &mut self,
        dispatcher: &dyn RepairDispatcher,
        notices: &mut Notices,
    ) -> Result<Option<JobAck>, RepairError> {
        let (Some(session), Some(node_id)) = (self.surgery.as_ref(), self.node_id.as_deref())
        else {
            return Ok(None);
        };
        let request = RepairRequest::from_session(node_id, &self.prompt, session)?;
        let ack = dispatcher.dispatch(request)?;
        notices.info(QUEUED_NOTICE);
        self.exit_surgery();
        Ok(Some(ack))
    }

    /// Writes the mask next to the image as `<stem>_mask.png`.
    pub fn export_mask(&self, store: &AppStore) -> Result<PathBuf, ExportError> {
        let session = self.surgery.as_ref().ok_or(ExportError::NoMask)?;
        let Some(Media::Image { path }) = self.focused_media(store) else {
            return Err(ExportError::NoLocalPath);
        };
        let out_path = path.with_file_name(format!(
            "{}_mask.png",
            path.file_stem()
                .unwrap_or_default()
                .to_str()
                .unwrap_or("out")
        ));
        let png = session.export_png()?;
        std::fs::write(&out_path, png).map_err(|source| ExportError::Write {
            path: out_path.clone(),
            source,
        })?;
        info!(path = %out_path.display(), "mask exported");
        Ok(out_path)
    }

    pub fn close(&mut self, store: &mut AppStore) {
        store.set_orbit_mode();
        self.sync(store);
    }

    /// Escape closes the overlay unless a text field owns the keyboard.
    pub fn handle_escape(&mut self, store: &mut AppStore, typing: bool) -> bool {
        if typing {
            return false;
        }
        self.close(store);
        true
    }

    /// A click on the backdrop closes the overlay, but never while masking.
    pub fn backdrop_click_closes(&self, media_rect: egui::Rect, pos: egui::Pos2) -> bool {
        self.surgery.is_none() && !media_rect.contains(pos)
    }

    /// Decodes the focused image once. A failure is reported a single time
    /// and disables surgery for this node.
    pub fn decode_media(
        &mut self,
        store: &AppStore,
        notices: &mut Notices,
    ) -> Option<egui::ColorImage> {
        if self.media_texture.is_some() || self.media_failed {
            return None;
        }
        let Some(Media::Image { path }) = self.focused_media(store) else {
            return None;
        };
        match image::open(path) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                self.media_size = Some(egui::vec2(size[0] as f32, size[1] as f32));
                Some(egui::ColorImage::from_rgba_unmultiplied(
                    size,
                    rgba.as_flat_samples().as_slice(),
                ))
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to load media");
                notices.error(format!("Could not open {}: {err}", path.display()));
                self.media_failed = true;
                self.exit_surgery();
                None
            }
        }
    }

    // ── Rendering ──────────────────────────────────────────────────────────

    fn ensure_media_texture(
        &mut self,
        ctx: &egui::Context,
        store: &AppStore,
        notices: &mut Notices,
    ) {
        if let Some(color_image) = self.decode_media(store, notices) {
            self.media_texture =
                Some(ctx.load_texture("focus-media", color_image, egui::TextureOptions::LINEAR));
        }
    }

    fn sync_mask_texture(&mut self, ctx: &egui::Context) {
        let Some(session) = self.surgery.as_mut() else {
            self.mask_texture = None;
            return;
        };
        let (w, h) = session.surface().size();
        let full = DirtyRect {
            x: 0,
            y: 0,
            width: w,
            height: h,
        };
        let dirty = session.take_dirty();
        let stale = self
            .mask_texture
            .as_ref()
            .map_or(true, |tex| tex.size() != [w as usize, h as usize]);
        if stale {
            self.mask_texture = Some(ctx.load_texture(
                "surgery-mask",
                region_color_image(session, full),
                egui::TextureOptions::NEAREST,
            ));
        } else if let (Some(tex), Some(rect)) = (self.mask_texture.as_mut(), dirty) {
            tex.set_partial(
                [rect.x as usize, rect.y as usize],
                region_color_image(session, rect),
                egui::TextureOptions::NEAREST,
            );
        }
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        store: &mut AppStore,
        dispatcher: &dyn RepairDispatcher,
        notices: &mut Notices,
    ) {
        self.sync(store);
        if self.node_id.is_none() {
            return;
        }
        self.ensure_media_texture(ctx, store, notices);

        if ctx.input(|i| i.key_pressed(egui::Key::Escape))
            && self.handle_escape(store, ctx.wants_keyboard_input())
        {
            return;
        }

        let is_video = self.focused_media(store).map_or(true, Media::is_video);
        let can_operate = self.can_operate(store);
        let mut close_requested = false;

        egui::SidePanel::right("focus_toolbar")
            .resizable(false)
            .min_width(220.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                if ui.button("✕ CLOSE").clicked() {
                    close_requested = true;
                }
                ui.separator();
                if ui.button("EXPORT").clicked() {
                    match self.export_mask(store) {
                        Ok(path) => notices.info(format!("Mask saved to {}", path.display())),
                        Err(ExportError::NoMask) => notices.warning("Nothing to export yet"),
                        Err(err) => notices.error(err.to_string()),
                    }
                }
                ui.separator();
                if can_operate
                    && ui
                        .selectable_label(self.surgery.is_some(), "SURGERY")
                        .clicked()
                {
                    self.toggle_surgery(store);
                }
                if ui.button("ENHANCE").clicked() {
                    debug!(node = ?self.node_id, "enhance requested");
                }
                if ui.button("REMAP").clicked() {
                    debug!(node = ?self.node_id, "remap requested");
                }

                if self.surgery.is_some() {
                    ui.separator();
                    ui.colored_label(ACCENT, "Neural_Mask_v1");
                    let mut radius = self.brush.radius();
                    let slider = egui::Slider::new(&mut radius, MIN_BRUSH_RADIUS..=MAX_BRUSH_RADIUS)
                        .text("BRUSH_SIZE")
                        .suffix("px");
                    if ui.add(slider).changed() {
                        self.set_brush_radius(radius);
                    }
                    ui.add(
                        egui::TextEdit::multiline(&mut self.prompt)
                            .hint_text("REPAIR_PROMPT: (e.g. fix eye details, remove reflections)")
                            .desired_rows(4)
                            .font(egui::TextStyle::Monospace),
                    );
                    if ui.button("EXECUTE_REPAIR").clicked() {
                        if let Err(err) = self.execute_repair(dispatcher, notices) {
                            warn!(%err, "repair dispatch failed");
                            notices.error(err.to_string());
                        }
                    }
                    if ui.button("CLEAR_MASK").clicked() {
                        self.clear_mask();
                    }
                }
            });

        egui::TopBottomPanel::bottom("focus_meta").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(ACCENT, "●");
                ui.strong("FOCUS_ACTIVE");
                ui.separator();
                ui.monospace(format!("NODE_UID: {}", self.node_id.as_deref().unwrap_or("")));
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(egui::Color32::from_gray(12)))
            .show(ctx, |ui| {
                if is_video {
                    self.show_video(ui, store);
                } else if self.show_image(ui, ctx) {
                    close_requested = true;
                }
            });

        if close_requested {
            self.close(store);
        }
    }

    /// Returns true when the backdrop was clicked.
    fn show_image(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) -> bool {
        let available = ui.available_rect_before_wrap();
        let Some((tex_id, media_size)) = self
            .media_texture
            .as_ref()
            .map(|t| t.id())
            .zip(self.media_size)
        else {
            ui.centered_and_justified(|ui| {
                ui.label("media unavailable");
            });
            return false;
        };

        let rect = fit_media_rect(available, media_size, MEDIA_PADDING);
        self.media_laid_out(rect);

        let backdrop = ui.interact(available, ui.id().with("backdrop"), egui::Sense::click());
        let backdrop_clicked = backdrop.clicked()
            && backdrop
                .interact_pointer_pos()
                .is_some_and(|pos| self.backdrop_click_closes(rect, pos));

        let painter = ui.painter_at(available);
        painter.image(
            tex_id,
            rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
        painter.rect_stroke(
            rect,
            0.0,
            egui::Stroke::new(1.0, egui::Color32::from_white_alpha(24)),
            egui::StrokeKind::Outside,
        );

        if self.surgery.is_none() {
            return backdrop_clicked;
        }

        let response = ui
            .interact(rect, ui.id().with("surgery-canvas"), egui::Sense::drag())
            .on_hover_cursor(egui::CursorIcon::Crosshair);
        let pointer = response.interact_pointer_pos();

        if response.drag_started_by(egui::PointerButton::Primary) {
            if let Some(pos) = pointer {
                self.pointer_pressed(pos);
            }
        }
        if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(pos) = pointer {
                if rect.contains(pos) {
                    self.pointer_moved(pos);
                } else {
                    self.pointer_released();
                }
            }
        }
        if response.drag_stopped() {
            self.pointer_released();
        }

        self.sync_mask_texture(ctx);
        if let Some(mask) = self.mask_texture.as_ref() {
            painter.image(
                mask.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        false
    }

    fn show_video(&mut self, ui: &mut egui::Ui, store: &AppStore) {
        let source = self
            .focused_media(store)
            .map(Media::source)
            .unwrap_or_default();
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.35);
            ui.heading("▶ VIDEO");
            ui.monospace(source);
            ui.add_space(12.0);
            ui.horizontal(|ui| {
                let label = if self.is_playing { "⏸ Pause" } else { "▶ Play" };
                if ui.button(label).clicked() {
                    self.toggle_play();
                }
                ui.add(
                    egui::ProgressBar::new(MOCK_PROGRESS)
                        .fill(ACCENT)
                        .desired_width(ui.available_width() - 40.0),
                );
            });
        });
    }
}

fn rect_pixel_size(rect: egui::Rect) -> (u32, u32) {
    (
        rect.width().round().max(1.0) as u32,
        rect.height().round().max(1.0) as u32,
    )
}

/// Centers the media inside `available`, shrinking it to fit but never
/// scaling it up past its natural size.
pub fn fit_media_rect(available: egui::Rect, media_size: egui::Vec2, padding: f32) -> egui::Rect {
    let inner = available.shrink(padding);
    if media_size.x <= 0.0 || media_size.y <= 0.0 || inner.width() <= 0.0 || inner.height() <= 0.0 {
        return egui::Rect::from_center_size(available.center(), egui::Vec2::ZERO);
    }
    let scale = (inner.width() / media_size.x)
        .min(inner.height() / media_size.y)
        .min(1.0);
    egui::Rect::from_center_size(inner.center(), media_size * scale)
}

fn region_color_image(session: &MaskingSession, rect: DirtyRect) -> egui::ColorImage {
    let surface = session.surface();
    let raw = surface.rgba_pixels();
    let stride = surface.width() as usize * 4;
    let mut pixels = Vec::with_capacity(rect.width as usize * rect.height as usize * 4);
    for y in rect.y..rect.y + rect.height {
        let start = y as usize * stride + rect.x as usize * 4;
        pixels.extend_from_slice(&raw[start..start + rect.width as usize * 4]);
    }
    egui::ColorImage::from_rgba_unmultiplied([rect.width as usize, rect.height as usize], &pixels)
}
