pub const MIN_BRUSH_RADIUS: i32 = 5;
pub const MAX_BRUSH_RADIUS: i32 = 100;
pub const DEFAULT_BRUSH_RADIUS: i32 = 20;

/// Brush size used when rasterizing strokes, always within
/// `MIN_BRUSH_RADIUS..=MAX_BRUSH_RADIUS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BrushConfig {
    radius: i32,
}

impl BrushConfig {
    pub fn new(radius: i32) -> Self {
        Self {
            radius: clamp_radius(radius),
        }
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    pub fn set_radius(&mut self, px: i32) {
        self.radius = clamp_radius(px);
    }
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BRUSH_RADIUS)
    }
}

pub fn clamp_radius(px: i32) -> i32 {
    px.clamp(MIN_BRUSH_RADIUS, MAX_BRUSH_RADIUS)
}
