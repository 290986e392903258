//! Integer pixel geometry
//!
//! Points, sizes and rectangles in canvas space (pixels from the top-left
//! corner of the buffer). Rectangles are used for damage tracking and for
//! placing the buffer on a print page.

/// A pixel position in canvas space
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A width/height pair in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Component-wise maximum of both sizes
    pub fn expanded_to(self, other: Size) -> Size {
        Size::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// True if `other` exceeds this size in either dimension
    pub fn is_exceeded_by(&self, other: Size) -> bool {
        other.width > self.width || other.height > self.height
    }

    /// Largest size with this aspect ratio that fits inside `bounds`
    ///
    /// Never returns a zero dimension for a non-empty input, so tiny
    /// buffers still produce at least one pixel on the page.
    pub fn scaled_to_fit(self, bounds: Size) -> Size {
        if self.is_empty() || bounds.is_empty() {
            return Size::default();
        }
        let width_limited = u64::from(bounds.width) * u64::from(self.height)
            <= u64::from(bounds.height) * u64::from(self.width);
        if width_limited {
            let height = u64::from(self.height) * u64::from(bounds.width) / u64::from(self.width);
            Size::new(bounds.width, (height as u32).max(1))
        } else {
            let width = u64::from(self.width) * u64::from(bounds.height) / u64::from(self.height);
            Size::new((width as u32).max(1), bounds.height)
        }
    }
}

/// An axis-aligned rectangle; `x`/`y` is the top-left corner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin covering `size`
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Smallest rectangle containing both points (inclusive)
    pub fn spanning(a: Point, b: Point) -> Self {
        let left = a.x.min(b.x);
        let top = a.y.min(b.y);
        let right = a.x.max(b.x);
        let bottom = a.y.max(b.y);
        Self::new(
            left,
            top,
            (right - left) as u32 + 1,
            (bottom - top) as u32 + 1,
        )
    }

    /// Grow the rectangle by `margin` pixels on every side
    pub fn inflated(self, margin: u32) -> Self {
        let m = margin as i32;
        Self::new(
            self.x - m,
            self.y - m,
            self.width + 2 * margin,
            self.height + 2 * margin,
        )
    }

    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Intersection with the area `[0, size)`; `None` if nothing overlaps
    pub fn clipped_to(self, size: Size) -> Option<Rect> {
        let left = i64::from(self.x).max(0);
        let top = i64::from(self.y).max(0);
        let right = self.right().min(i64::from(size.width));
        let bottom = self.bottom().min(i64::from(size.height));
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect::new(
            left as i32,
            top as i32,
            (right - left) as u32,
            (bottom - top) as u32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_spanning_normalizes_corners() {
        let r = Rect::spanning(Point::new(10, 50), Point::new(4, 12));
        assert_eq!(r, Rect::new(4, 12, 7, 39));
    }

    #[test]
    fn test_inflated_then_clipped() {
        let r = Rect::spanning(Point::new(1, 1), Point::new(1, 1)).inflated(4);
        assert_eq!(r, Rect::new(-3, -3, 9, 9));
        assert_eq!(r.clipped_to(Size::new(100, 100)), Some(Rect::new(0, 0, 6, 6)));
    }

    #[test]
    fn test_clipped_outside_is_none() {
        let r = Rect::new(200, 10, 5, 5);
        assert_eq!(r.clipped_to(Size::new(100, 100)), None);
        assert_eq!(Rect::new(-10, -10, 10, 10).clipped_to(Size::new(5, 5)), None);
    }

    #[test]
    fn test_scaled_to_fit_keeps_aspect() {
        let page = Size::new(1000, 1000);
        assert_eq!(Size::new(200, 100).scaled_to_fit(page), Size::new(1000, 500));
        assert_eq!(Size::new(100, 400).scaled_to_fit(page), Size::new(250, 1000));
        assert_eq!(Size::new(0, 400).scaled_to_fit(page), Size::default());
    }

    #[test]
    fn test_size_growth_helpers() {
        let buffer = Size::new(628, 628);
        assert!(!buffer.is_exceeded_by(Size::new(600, 628)));
        assert!(buffer.is_exceeded_by(Size::new(600, 629)));
        assert_eq!(buffer.expanded_to(Size::new(700, 10)), Size::new(700, 628));
    }
}
