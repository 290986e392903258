//! Pen State and Stroke Rasterization
//!
//! A stroke segment is painted as a capsule: every pixel whose center lies
//! within half the pen width of the segment takes the pen color. This gives
//! round caps at both ends and round joins between consecutive segments.

use image::RgbImage;

use crate::color::Color;
use crate::geometry::{Point, Rect, Size};

/// Smallest pen width the width prompt offers
pub const MIN_PEN_WIDTH: u32 = 1;
/// Largest pen width the width prompt offers
pub const MAX_PEN_WIDTH: u32 = 50;

/// Color and width used for new stroke segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pen {
    pub color: Color,
    /// Stroke width in pixels (diameter of the round cap)
    pub width: u32,
}

impl Pen {
    pub fn new(color: Color, width: u32) -> Self {
        Self { color, width }
    }

    /// Offset applied to integer points so a width-`w` stroke covers exactly
    /// `w` pixels across: odd widths sit on pixel centers, even widths on
    /// pixel edges.
    fn center_offset(&self) -> f32 {
        if self.width % 2 == 1 {
            0.5
        } else {
            0.0
        }
    }

    /// Paint one segment from `from` to `to` into `image`, clipped to its bounds
    pub fn stroke_segment(&self, image: &mut RgbImage, from: Point, to: Point) {
        let radius = self.width.max(1) as f32 / 2.0;
        let offset = self.center_offset();
        let (ax, ay) = (from.x as f32 + offset, from.y as f32 + offset);
        let (bx, by) = (to.x as f32 + offset, to.y as f32 + offset);

        let reach = radius.ceil() as u32 + 1;
        let Some(bounds) = Rect::spanning(from, to)
            .inflated(reach)
            .clipped_to(Size::new(image.width(), image.height()))
        else {
            return;
        };

        let (dx, dy) = (bx - ax, by - ay);
        let length_sq = dx * dx + dy * dy;
        let limit = radius * radius + 1e-3;
        let pixel = self.color.to_rgb();

        for py in bounds.y..bounds.bottom() as i32 {
            for px in bounds.x..bounds.right() as i32 {
                let (cx, cy) = (px as f32 + 0.5, py as f32 + 0.5);
                // Project the pixel center onto the segment, clamped to its ends
                let t = if length_sq > 0.0 {
                    (((cx - ax) * dx + (cy - ay) * dy) / length_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let (nx, ny) = (ax + dx * t - cx, ay + dy * t - cy);
                if nx * nx + ny * ny <= limit {
                    image.put_pixel(px as u32, py as u32, pixel);
                }
            }
        }
    }
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            color: Color::BLUE,
            width: MIN_PEN_WIDTH,
        }
    }
}
