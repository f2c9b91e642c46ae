//! Freehand masking: pointer strokes rasterized into a [`MaskSurface`].
//!
//! Pointer events reach this type whether or not surgery mode is on, so every
//! operation quietly does nothing when the session cannot draw.

use image::Rgba;
use tracing::{debug, trace};

use crate::brush::BrushConfig;
use crate::surface::{DirtyRect, MaskSurface};

pub const MASK_COLOR: Rgba<u8> = Rgba([239, 68, 68, 128]);

/// One press-drag-release gesture in surface-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<(f32, f32)>,
    radius: i32,
}

impl Stroke {
    fn new(start: (f32, f32), radius: i32) -> Self {
        Self {
            points: vec![start],
            radius,
        }
    }

    pub fn points(&self) -> &[(f32, f32)] {
        &self.points
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// The brush radius is used as the stroke width.
    fn half_width(&self) -> f32 {
        self.radius as f32 * 0.5
    }

    fn last(&self) -> (f32, f32) {
        // A stroke always starts with one point.
        self.points[self.points.len() - 1]
    }
}

#[derive(Debug, Clone)]
pub struct MaskingSession {
    active: bool,
    drawing: bool,
    brush: BrushConfig,
    color: Rgba<u8>,
    origin: (f32, f32),
    surface: MaskSurface,
    stroke: Option<Stroke>,
    last_local: Option<(f32, f32)>,
    dirty: Option<DirtyRect>,
}

impl MaskingSession {
    pub fn new(width: u32, height: u32, brush: BrushConfig, color: Rgba<u8>) -> Self {
        Self {
            active: false,
            drawing: false,
            brush,
            color,
            origin: (0.0, 0.0),
            surface: MaskSurface::new(width, height),
            stroke: None,
            last_local: None,
            dirty: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn brush_radius(&self) -> i32 {
        self.brush.radius()
    }

    pub fn surface(&self) -> &MaskSurface {
        &self.surface
    }

    pub fn current_stroke(&self) -> Option<&Stroke> {
        self.stroke.as_ref()
    }

    /// Last local point recorded by `begin_stroke`, even while inactive.
    pub fn last_local_point(&self) -> Option<(f32, f32)> {
        self.last_local
    }

    pub fn enter(&mut self) {
        if !self.active {
            debug!("masking session entered");
        }
        self.active = true;
    }

    pub fn exit(&mut self) {
        self.end_stroke();
        if self.active {
            debug!("masking session exited");
        }
        self.active = false;
    }

    pub fn to_local(&self, screen: (f32, f32)) -> (f32, f32) {
        (screen.0 - self.origin.0, screen.1 - self.origin.1)
    }

    pub fn begin_stroke(&mut self, screen: (f32, f32)) {
        let local = self.to_local(screen);
        self.last_local = Some(local);
        if !self.active {
            return;
        }
        trace!(x = local.0, y = local.1, radius = self.brush.radius(), "stroke begin");
        self.stroke = Some(Stroke::new(local, self.brush.radius()));
        self.drawing = true;
    }

    pub fn extend_stroke(&mut self, screen: (f32, f32)) {
        if !(self.drawing && self.active) {
            return;
        }
        let local = self.to_local(screen);
        let Some(stroke) = self.stroke.as_mut() else {
            return;
        };
        let from = stroke.last();
        let half_width = stroke.half_width();
        stroke.points.push(local);
        self.last_local = Some(local);

        if let Some(rect) = self.surface.stroke_segment(from, local, half_width, self.color) {
            self.dirty = Some(match self.dirty {
                Some(prev) => prev.union(rect),
                None => rect,
            });
        }
    }

    pub fn end_stroke(&mut self) {
        if let Some(stroke) = self.stroke.take() {
            trace!(points = stroke.points.len(), "stroke end");
        }
        self.drawing = false;
    }

    /// Affects strokes started after this call; an in-progress stroke keeps
    /// the radius it began with.
    pub fn set_brush_radius(&mut self, px: i32) {
        self.brush.set_radius(px);
    }

    pub fn clear(&mut self) {
        self.surface.clear();
        self.dirty = Some(DirtyRect {
            x: 0,
            y: 0,
            width: self.surface.width(),
            height: self.surface.height(),
        });
    }

    /// Tracks the rendered media box. A size change rescales the mask along
    /// with the in-progress stroke, so the next segment continues from the
    /// same spot on the media.
    pub fn set_bounds(&mut self, origin: (f32, f32), size: (u32, u32)) {
        self.origin = origin;
        let old = self.surface.size();
        let new = (size.0.max(1), size.1.max(1));
        if old != new {
            debug!(from = ?old, to = ?new, "resizing mask surface");
            let scale = (new.0 as f32 / old.0 as f32, new.1 as f32 / old.1 as f32);
            let rescale = |p: (f32, f32)| (p.0 * scale.0, p.1 * scale.1);
            if let Some(stroke) = self.stroke.as_mut() {
                for point in stroke.points.iter_mut() {
                    *point = rescale(*point);
                }
            }
            self.last_local = self.last_local.map(rescale);
            self.surface.resize(new.0, new.1);
            self.dirty = Some(DirtyRect {
                x: 0,
                y: 0,
                width: self.surface.width(),
                height: self.surface.height(),
            });
        }
    }

    /// Region changed since the last call, if any.
    pub fn take_dirty(&mut self) -> Option<DirtyRect> {
        self.dirty.take()
    }

    pub fn export_png(&self) -> Result<Vec<u8>, image::ImageError> {
        self.surface.encode_png()
    }
}
