//! Drawing Canvas
//!
//! The canvas owns the persistent pixel buffer and turns pointer input into
//! stroke segments painted into it. It never talks to a window system: hosts
//! feed it pointer and resize events and drain [`Canvas::render`] to learn
//! which regions need repainting.
//!
//! The buffer is always at least as large as the visible widget area. It only
//! ever grows, by [`crate::settings::GROW_MARGIN`] beyond the widget size, so
//! shrinking the window and enlarging it again keeps earlier strokes.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageReader, RgbImage};

use crate::color::{flatten_over_white, Color};
use crate::error::CanvasError;
use crate::format::FileFormat;
use crate::geometry::{Point, Rect, Size};
use crate::input::{Buttons, PointerButton, PointerEvent, PointerEventType};
use crate::pen::Pen;
use crate::settings::Settings;

/// Extra pixels repainted around a segment beyond half the pen width
const DAMAGE_SLACK: u32 = 2;

/// Stroke state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stroke {
    Idle,
    /// Primary button is down; `last` is the anchor of the next segment
    Drawing { last: Point },
}

pub struct Canvas {
    image: RgbImage,
    /// Visible widget area; the buffer is never smaller
    widget: Size,
    pen: Pen,
    grow_margin: u32,
    modified: bool,
    stroke: Stroke,
    /// Regions changed since the last `render`
    damage: Vec<Rect>,
}

impl Canvas {
    /// Create a blank white canvas sized for a widget of `widget` pixels
    pub fn new(widget: Size, pen: Pen, grow_margin: u32) -> Self {
        let mut canvas = Self {
            image: RgbImage::new(0, 0),
            widget: Size::default(),
            pen,
            grow_margin,
            modified: false,
            stroke: Stroke::Idle,
            damage: Vec::new(),
        };
        canvas.handle_resize(widget);
        canvas
    }

    pub fn with_settings(settings: &Settings, widget: Size) -> Self {
        Self::new(widget, settings.pen, settings.grow_margin)
    }

    /// Load a raster file into the canvas
    ///
    /// The codec is detected from the file contents, not its extension.
    /// Translucent pixels are flattened onto white. The buffer becomes at
    /// least as large as the loaded image and the widget; it never shrinks.
    /// On failure the canvas is left untouched.
    pub fn open_image(&mut self, path: &Path) -> Result<(), CanvasError> {
        let loaded = decode(path).map_err(|source| CanvasError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = loaded.to_rgba8();
        let flat = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            flatten_over_white(*rgba.get_pixel(x, y))
        });

        let target = Size::new(flat.width(), flat.height())
            .expanded_to(self.widget)
            .expanded_to(self.buffer_size());
        self.image = resized(&flat, target);
        self.modified = false;
        self.stroke = Stroke::Idle;
        self.damage_all();
        log::info!(
            "Opened {} ({}x{}), buffer now {}x{}",
            path.display(),
            flat.width(),
            flat.height(),
            target.width,
            target.height
        );
        Ok(())
    }

    /// Write the visible part of the canvas to `path`
    ///
    /// Only the widget-sized region anchored at the origin is written, not
    /// the whole internal buffer.
    pub fn save_image(&mut self, path: &Path, format: FileFormat) -> Result<(), CanvasError> {
        if self.widget.is_empty() {
            return Err(CanvasError::EmptyCanvas);
        }
        let visible = self.visible_image();
        DynamicImage::ImageRgb8(visible)
            .save_with_format(path, format.codec())
            .map_err(|source| CanvasError::Encode {
                path: path.to_path_buf(),
                source,
            })?;
        self.modified = false;
        log::info!(
            "Saved {}x{} as {} to {}",
            self.widget.width,
            self.widget.height,
            format,
            path.display()
        );
        Ok(())
    }

    /// Snapshot of the buffer cropped (or padded with white) to the widget size
    pub fn visible_image(&self) -> RgbImage {
        resized(&self.image, self.widget)
    }

    pub fn set_pen_color(&mut self, color: Color) {
        self.pen.color = color;
    }

    pub fn set_pen_width(&mut self, width: u32) {
        self.pen.width = width;
    }

    pub fn pen_color(&self) -> Color {
        self.pen.color
    }

    pub fn pen_width(&self) -> u32 {
        self.pen.width
    }

    pub fn pen(&self) -> Pen {
        self.pen
    }

    /// Has the image changed since it was last opened or saved
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.stroke, Stroke::Drawing { .. })
    }

    /// Fill the whole buffer with white
    pub fn clear(&mut self) {
        for px in self.image.pixels_mut() {
            *px = Color::WHITE.to_rgb();
        }
        self.modified = true;
        self.damage_all();
        log::debug!("Canvas cleared");
    }

    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event.event_type {
            PointerEventType::Down(button) => self.handle_pointer_down(event.position, button),
            PointerEventType::Move(buttons) => self.handle_pointer_move(event.position, buttons),
            PointerEventType::Up(button) => self.handle_pointer_up(event.position, button),
        }
    }

    /// Start a stroke if the primary button went down
    pub fn handle_pointer_down(&mut self, point: Point, button: PointerButton) {
        if button == PointerButton::Primary {
            self.stroke = Stroke::Drawing { last: point };
        }
    }

    /// Extend the current stroke while the primary button is held
    pub fn handle_pointer_move(&mut self, point: Point, buttons: Buttons) {
        if buttons.contains(Buttons::PRIMARY) && self.is_drawing() {
            self.draw_line_to(point);
        }
    }

    /// Finish the current stroke with a last segment to the release point
    pub fn handle_pointer_up(&mut self, point: Point, button: PointerButton) {
        if button == PointerButton::Primary && self.is_drawing() {
            self.draw_line_to(point);
            self.stroke = Stroke::Idle;
        }
    }

    /// Track a new widget size, growing the buffer if the widget outgrew it
    pub fn handle_resize(&mut self, size: Size) {
        self.widget = size;
        let current = self.buffer_size();
        if current.is_exceeded_by(size) {
            let grown = Size::new(
                (size.width + self.grow_margin).max(current.width),
                (size.height + self.grow_margin).max(current.height),
            );
            self.image = resized(&self.image, grown);
            self.damage_all();
            log::debug!(
                "Buffer grown from {}x{} to {}x{} for widget {}x{}",
                current.width,
                current.height,
                grown.width,
                grown.height,
                size.width,
                size.height
            );
        }
    }

    /// Drain the regions damaged since the previous call
    pub fn render(&mut self) -> Vec<Rect> {
        std::mem::take(&mut self.damage)
    }

    pub fn has_damage(&self) -> bool {
        !self.damage.is_empty()
    }

    /// The whole internal buffer, including the area outside the widget
    pub fn buffer(&self) -> &RgbImage {
        &self.image
    }

    pub fn buffer_size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }

    pub fn widget_size(&self) -> Size {
        self.widget
    }

    /// Lay the buffer out on a white page of `page` pixels
    ///
    /// The buffer is scaled to fit the page with its aspect ratio kept and is
    /// anchored at the page origin.
    pub fn print(&self, page: Size) -> RgbImage {
        let mut sheet = RgbImage::from_pixel(page.width, page.height, Color::WHITE.to_rgb());
        let fitted = self.buffer_size().scaled_to_fit(page);
        if fitted.is_empty() {
            return sheet;
        }
        let scaled = if fitted == self.buffer_size() {
            self.image.clone()
        } else {
            imageops::resize(&self.image, fitted.width, fitted.height, FilterType::Triangle)
        };
        imageops::replace(&mut sheet, &scaled, 0, 0);
        sheet
    }

    fn draw_line_to(&mut self, end: Point) {
        let Stroke::Drawing { last } = self.stroke else {
            return;
        };
        self.pen.stroke_segment(&mut self.image, last, end);
        self.modified = true;

        let radius = self.pen.width / 2 + DAMAGE_SLACK;
        if let Some(region) = Rect::spanning(last, end)
            .inflated(radius)
            .clipped_to(self.buffer_size())
        {
            log::debug!("Segment {:?} -> {:?}, damage {:?}", last, end, region);
            self.damage.push(region);
        }
        self.stroke = Stroke::Drawing { last: end };
    }

    fn damage_all(&mut self) {
        self.damage.clear();
        let size = self.buffer_size();
        if !size.is_empty() {
            self.damage.push(Rect::from_size(size));
        }
    }
}

/// Decode a raster file, picking the codec from its contents
fn decode(path: &Path) -> image::ImageResult<DynamicImage> {
    ImageReader::open(path)?.with_guessed_format()?.decode()
}

/// Copy `image` onto a white image of `size`, anchored at the origin
fn resized(image: &RgbImage, size: Size) -> RgbImage {
    if image.width() == size.width && image.height() == size.height {
        return image.clone();
    }
    let mut out = RgbImage::from_pixel(size.width, size.height, Color::WHITE.to_rgb());
    imageops::replace(&mut out, image, 0, 0);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use pretty_assertions::assert_eq;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    fn canvas(width: u32, height: u32) -> Canvas {
        Canvas::new(Size::new(width, height), Pen::new(Color::BLACK, 4), 128)
    }

    fn stroke(canvas: &mut Canvas, points: &[(i32, i32)]) {
        let (first, rest) = points.split_first().expect("at least one point");
        canvas.handle_pointer_down(Point::new(first.0, first.1), PointerButton::Primary);
        for &(x, y) in rest {
            canvas.handle_pointer_move(Point::new(x, y), Buttons::PRIMARY);
        }
        let last = points.last().copied().unwrap_or(*first);
        canvas.handle_pointer_up(Point::new(last.0, last.1), PointerButton::Primary);
    }

    fn all_white(image: &RgbImage) -> bool {
        image.pixels().all(|px| *px == WHITE)
    }

    #[test]
    fn test_new_canvas_is_white_with_margin() {
        let mut c = canvas(100, 80);
        assert_eq!(c.buffer_size(), Size::new(228, 208));
        assert!(all_white(c.buffer()));
        assert!(!c.is_modified());
        assert_eq!(c.render(), vec![Rect::new(0, 0, 228, 208)]);
        assert!(!c.has_damage());
    }

    #[test]
    fn test_stroke_scenario_on_blank_canvas() {
        let mut c = canvas(100, 100);
        c.render();
        stroke(&mut c, &[(10, 10), (10, 50)]);

        let visible = c.visible_image();
        for y in 10..=50 {
            for x in 8..=11 {
                assert_eq!(*visible.get_pixel(x, y), BLACK, "({x}, {y})");
            }
        }
        for (x, y, px) in visible.enumerate_pixels() {
            if *px == BLACK {
                assert!((8..=11).contains(&x) && (8..=52).contains(&y), "({x}, {y})");
            } else {
                assert_eq!(*px, WHITE);
            }
        }
        assert!(c.is_modified());
        assert!(!c.is_drawing());
    }

    #[test]
    fn test_move_without_press_draws_nothing() {
        let mut c = canvas(50, 50);
        c.render();
        c.handle_pointer_move(Point::new(5, 5), Buttons::PRIMARY);
        c.handle_pointer_move(Point::new(20, 20), Buttons::PRIMARY);
        assert!(all_white(c.buffer()));
        assert!(!c.is_modified());
        assert!(!c.has_damage());
    }

    #[test]
    fn test_secondary_button_does_not_start_stroke() {
        let mut c = canvas(50, 50);
        c.handle_pointer_down(Point::new(5, 5), PointerButton::Secondary);
        assert!(!c.is_drawing());
        c.handle_pointer_move(Point::new(20, 20), Buttons::SECONDARY);
        c.handle_pointer_up(Point::new(20, 20), PointerButton::Secondary);
        assert!(all_white(c.buffer()));
    }

    #[test]
    fn test_move_requires_primary_held() {
        let mut c = canvas(50, 50);
        c.handle_pointer_down(Point::new(5, 5), PointerButton::Primary);
        c.handle_pointer_move(Point::new(30, 5), Buttons::empty());
        assert!(all_white(c.buffer()));
        assert!(c.is_drawing());
    }

    #[test]
    fn test_click_without_move_paints_dot() {
        let mut c = canvas(50, 50);
        stroke(&mut c, &[(20, 20)]);
        assert_eq!(*c.buffer().get_pixel(20, 20), BLACK);
        assert!(c.is_modified());
    }

    #[test]
    fn test_segment_damage_is_bounding_box_plus_margin() {
        let mut c = canvas(100, 100);
        c.render();
        c.handle_pointer_down(Point::new(20, 30), PointerButton::Primary);
        c.handle_pointer_move(Point::new(40, 35), Buttons::PRIMARY);
        // half width 2 + slack 2 on every side
        assert_eq!(c.render(), vec![Rect::new(16, 26, 29, 14)]);
    }

    #[test]
    fn test_segment_damage_is_clipped_to_buffer() {
        let mut c = canvas(100, 100);
        c.render();
        c.handle_pointer_down(Point::new(0, 0), PointerButton::Primary);
        c.handle_pointer_up(Point::new(3, 0), PointerButton::Primary);
        assert_eq!(c.render(), vec![Rect::new(0, 0, 8, 5)]);
    }

    #[test]
    fn test_resize_within_buffer_is_noop() {
        let mut c = canvas(100, 100);
        stroke(&mut c, &[(10, 10), (60, 60)]);
        c.render();
        let before = c.buffer().clone();

        c.handle_resize(Size::new(200, 228));
        c.handle_resize(Size::new(20, 20));
        assert_eq!(c.buffer_size(), Size::new(228, 228));
        assert!(c.buffer() == &before);
        assert!(!c.has_damage());
        assert_eq!(c.widget_size(), Size::new(20, 20));
    }

    #[test]
    fn test_resize_beyond_buffer_grows_by_margin_and_keeps_pixels() {
        let mut c = canvas(100, 100);
        stroke(&mut c, &[(10, 10), (90, 90)]);
        let before = c.buffer().clone();

        c.handle_resize(Size::new(300, 150));
        assert_eq!(c.buffer_size(), Size::new(428, 278));
        for (x, y, px) in c.buffer().enumerate_pixels() {
            if x < before.width() && y < before.height() {
                assert_eq!(px, before.get_pixel(x, y));
            } else {
                assert_eq!(*px, WHITE, "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_resize_keeps_larger_dimension() {
        let mut c = canvas(100, 100);
        c.handle_resize(Size::new(400, 50));
        assert_eq!(c.buffer_size(), Size::new(528, 228));
    }

    #[test]
    fn test_clear_whitens_everything() {
        let mut c = canvas(60, 60);
        stroke(&mut c, &[(1, 1), (50, 50)]);
        c.render();
        c.clear();
        assert!(all_white(c.buffer()));
        assert!(c.is_modified());
        assert_eq!(c.render(), vec![Rect::from_size(c.buffer_size())]);
    }

    #[test]
    fn test_save_then_open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drawing.png");

        let mut c = canvas(80, 60);
        c.set_pen_color(Color::rgb(200, 10, 30));
        stroke(&mut c, &[(5, 5), (70, 50), (10, 55)]);
        assert!(c.is_modified());
        c.save_image(&path, FileFormat::PNG).unwrap();
        assert!(!c.is_modified());
        let saved = c.visible_image();

        let mut reopened = canvas(80, 60);
        stroke(&mut reopened, &[(0, 0), (30, 30)]);
        reopened.open_image(&path).unwrap();
        assert!(!reopened.is_modified());
        assert!(reopened.visible_image() == saved);
    }

    #[test]
    fn test_reopen_ignores_misleading_extension() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = canvas(40, 30);
        stroke(&mut c, &[(3, 3), (35, 25)]);
        let saved = c.visible_image();

        for name in ["drawing", "drawing.jpg"] {
            let path = dir.path().join(name);
            c.save_image(&path, FileFormat::PNG).unwrap();

            let mut reopened = canvas(40, 30);
            reopened.open_image(&path).unwrap();
            assert!(reopened.visible_image() == saved, "{name}");
        }
    }

    #[test]
    fn test_open_missing_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = canvas(10, 10);
        let err = c.open_image(&dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, CanvasError::Decode { .. }));
    }

    #[test]
    fn test_save_writes_only_visible_region() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visible.bmp");

        let mut c = canvas(40, 30);
        c.save_image(&path, FileFormat::from_tag("bmp").unwrap()).unwrap();
        let written = image::open(&path).unwrap();
        assert_eq!((written.width(), written.height()), (40, 30));
    }

    #[test]
    fn test_open_failure_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-an-image.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let mut c = canvas(50, 50);
        stroke(&mut c, &[(5, 5), (20, 20)]);
        let before = c.buffer().clone();

        let err = c.open_image(&path).unwrap_err();
        assert!(matches!(err, CanvasError::Decode { .. }));
        assert!(c.is_modified());
        assert!(c.buffer() == &before);
    }

    #[test]
    fn test_save_failure_keeps_modified() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.png");

        let mut c = canvas(50, 50);
        stroke(&mut c, &[(5, 5), (20, 20)]);
        let err = c.save_image(&path, FileFormat::PNG).unwrap_err();
        assert!(matches!(err, CanvasError::Encode { .. }));
        assert!(c.is_modified());
    }

    #[test]
    fn test_open_larger_image_grows_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        let mut big = RgbImage::from_pixel(400, 90, WHITE);
        big.put_pixel(399, 89, BLACK);
        big.save(&path).unwrap();

        let mut c = canvas(100, 100);
        c.open_image(&path).unwrap();
        assert_eq!(c.buffer_size(), Size::new(400, 228));
        assert_eq!(*c.buffer().get_pixel(399, 89), BLACK);
        assert_eq!(*c.buffer().get_pixel(399, 200), WHITE);
    }

    #[test]
    fn test_open_flattens_transparency_onto_white() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alpha.png");
        let mut rgba = image::RgbaImage::from_pixel(10, 10, image::Rgba([0, 0, 0, 0]));
        rgba.put_pixel(1, 1, image::Rgba([0, 0, 0, 255]));
        rgba.save(&path).unwrap();

        let mut c = canvas(10, 10);
        c.open_image(&path).unwrap();
        assert_eq!(*c.buffer().get_pixel(0, 0), WHITE);
        assert_eq!(*c.buffer().get_pixel(1, 1), BLACK);
    }

    #[test]
    fn test_print_letterboxes_at_origin() {
        let mut c = Canvas::new(Size::new(100, 50), Pen::new(Color::BLACK, 1), 0);
        c.clear();
        let page = c.print(Size::new(400, 400));
        assert_eq!(page.dimensions(), (400, 400));
        // 100x50 scaled to 400x200, the rest of the page stays white
        assert!((0..400).all(|x| *page.get_pixel(x, 300) == WHITE));
        assert_eq!(*page.get_pixel(0, 0), WHITE);

        stroke(&mut c, &[(0, 0), (99, 0)]);
        let page = c.print(Size::new(400, 400));
        assert_ne!(*page.get_pixel(200, 1), WHITE);
        assert_eq!(*page.get_pixel(200, 250), WHITE);
    }

    #[test]
    fn test_pen_setters() {
        let mut c = canvas(10, 10);
        c.set_pen_color(Color::BLUE);
        c.set_pen_width(17);
        assert_eq!(c.pen(), Pen::new(Color::BLUE, 17));
        assert!(!c.is_modified());
    }
}
