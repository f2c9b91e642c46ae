use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Pixel region touched by a raster operation, already clamped to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl DirtyRect {
    pub fn union(self, other: DirtyRect) -> DirtyRect {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = (self.x + self.width).max(other.x + other.width);
        let y1 = (self.y + self.height).max(other.y + other.height);
        DirtyRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }
}

/// Fixed-size RGBA raster holding the mask of one surgery session.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskSurface {
    image: RgbaImage,
}

impl MaskSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width.max(1), height.max(1), TRANSPARENT),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn rgba_pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        (x < self.width() && y < self.height()).then(|| *self.image.get_pixel(x, y))
    }

    pub fn is_painted(&self, x: u32, y: u32) -> bool {
        self.pixel(x, y).is_some_and(|p| p.0[3] != 0)
    }

    /// True when no pixel carries any alpha.
    pub fn is_transparent(&self) -> bool {
        self.image.pixels().all(|p| p.0[3] == 0)
    }

    pub fn painted_count(&self) -> usize {
        self.image.pixels().filter(|p| p.0[3] != 0).count()
    }

    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = TRANSPARENT;
        }
    }

    /// Rescales the mask to a new size with nearest filtering so painted
    /// regions stay over the same part of the media.
    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if self.size() == (width, height) {
            return;
        }
        self.image = imageops::resize(&self.image, width, height, FilterType::Nearest);
    }

    /// Writes a round-capped segment of the given half width. Pixels are
    /// overwritten, not blended, so overlapping segments keep one uniform
    /// color. A zero-length segment paints a disc.
    pub fn stroke_segment(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        half_width: f32,
        color: Rgba<u8>,
    ) -> Option<DirtyRect> {
        let half_width = half_width.max(0.5);
        let min_x = (from.0.min(to.0) - half_width).floor().max(0.0);
        let min_y = (from.1.min(to.1) - half_width).floor().max(0.0);
        let max_x = (from.0.max(to.0) + half_width).ceil().min(self.width() as f32);
        let max_y = (from.1.max(to.1) + half_width).ceil().min(self.height() as f32);
        if max_x <= min_x || max_y <= min_y {
            return None;
        }

        let (x0, y0, x1, y1) = (min_x as u32, min_y as u32, max_x as u32, max_y as u32);
        let radius_sq = half_width * half_width;
        for y in y0..y1 {
            for x in x0..x1 {
                let center = (x as f32 + 0.5, y as f32 + 0.5);
                if point_segment_distance_sq(center, from, to) <= radius_sq {
                    self.image.put_pixel(x, y, color);
                }
            }
        }

        Some(DirtyRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut bytes = Vec::new();
        self.image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

fn point_segment_distance_sq(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let ab = (b.0 - a.0, b.1 - a.1);
    let ap = (p.0 - a.0, p.1 - a.1);
    let len_sq = ab.0 * ab.0 + ab.1 * ab.1;
    let t = if len_sq <= f32::EPSILON {
        0.0
    } else {
        ((ap.0 * ab.0 + ap.1 * ab.1) / len_sq).clamp(0.0, 1.0)
    };
    let closest = (a.0 + ab.0 * t, a.1 + ab.1 * t);
    let d = (p.0 - closest.0, p.1 - closest.1);
    d.0 * d.0 + d.1 * d.1
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([239, 68, 68, 128]);

    #[test]
    fn new_surface_is_transparent() {
        let surface = MaskSurface::new(32, 16);
        assert_eq!(surface.size(), (32, 16));
        assert!(surface.is_transparent());
    }

    #[test]
    fn zero_sized_surface_is_bumped_to_one_pixel() {
        assert_eq!(MaskSurface::new(0, 0).size(), (1, 1));
    }

    #[test]
    fn segment_paints_capsule_with_round_caps() {
        let mut surface = MaskSurface::new(64, 64);
        let dirty = surface
            .stroke_segment((20.0, 32.0), (40.0, 32.0), 5.0, RED)
            .expect("segment lies on surface");

        assert!(surface.is_painted(30, 32));
        // Round cap extends past the endpoint along the axis...
        assert!(surface.is_painted(16, 32));
        // ...but the corner of the bounding box stays empty.
        assert!(!surface.is_painted(15, 27));
        assert!(!surface.is_painted(30, 40));
        assert_eq!(surface.pixel(30, 32), Some(RED));
        assert!(dirty.width >= 30 && dirty.height >= 10);
    }

    #[test]
    fn zero_length_segment_paints_a_disc() {
        let mut surface = MaskSurface::new(32, 32);
        surface.stroke_segment((10.0, 10.0), (10.0, 10.0), 3.0, RED);
        assert!(surface.is_painted(10, 10));
        assert!(surface.is_painted(8, 10));
        assert!(!surface.is_painted(14, 14));
    }

    #[test]
    fn overlapping_segments_do_not_accumulate_alpha() {
        let mut surface = MaskSurface::new(32, 32);
        surface.stroke_segment((5.0, 5.0), (20.0, 5.0), 3.0, RED);
        surface.stroke_segment((10.0, 0.0), (10.0, 20.0), 3.0, RED);
        assert_eq!(surface.pixel(10, 5), Some(RED));
    }

    #[test]
    fn segment_outside_surface_is_clipped() {
        let mut surface = MaskSurface::new(16, 16);
        assert_eq!(
            surface.stroke_segment((100.0, 100.0), (120.0, 120.0), 4.0, RED),
            None
        );
        assert!(surface.is_transparent());

        let dirty = surface
            .stroke_segment((-4.0, 8.0), (4.0, 8.0), 2.0, RED)
            .expect("partially visible");
        assert_eq!(dirty.x, 0);
        assert!(surface.is_painted(0, 8));
    }

    #[test]
    fn clear_resets_every_pixel() {
        let mut surface = MaskSurface::new(16, 16);
        surface.stroke_segment((0.0, 0.0), (15.0, 15.0), 4.0, RED);
        assert!(!surface.is_transparent());
        surface.clear();
        assert!(surface.is_transparent());
        surface.clear();
        assert!(surface.is_transparent());
    }

    #[test]
    fn resize_scales_mask_content() {
        let mut surface = MaskSurface::new(10, 10);
        surface.stroke_segment((2.0, 2.0), (2.0, 2.0), 1.0, RED);
        assert!(surface.is_painted(2, 2));

        surface.resize(20, 20);
        assert_eq!(surface.size(), (20, 20));
        assert!(surface.is_painted(4, 4));
        assert!(!surface.is_painted(15, 15));
    }

    #[test]
    fn encoded_png_decodes_to_same_size() {
        let mut surface = MaskSurface::new(12, 7);
        surface.stroke_segment((3.0, 3.0), (8.0, 3.0), 2.0, RED);
        let png = surface.encode_png().expect("encode");
        let decoded = image::load_from_memory(&png).expect("decode").to_rgba8();
        assert_eq!(decoded.dimensions(), (12, 7));
        assert_eq!(decoded.as_raw(), surface.rgba_pixels());
    }

    #[test]
    fn dirty_rect_union_covers_both() {
        let a = DirtyRect {
            x: 0,
            y: 0,
            width: 4,
            height: 4,
        };
        let b = DirtyRect {
            x: 6,
            y: 2,
            width: 2,
            height: 8,
        };
        let expected = DirtyRect {
            x: 0,
            y: 0,
            width: 8,
            height: 10,
        };
        assert_eq!(a.union(b), expected);
    }
}
