//! Window Shell
//!
//! Glue between menu actions, user prompts and the canvas. The shell owns the
//! canvas and is the only place that calls its file and pen operations; it
//! gates destructive actions (open, exit) on the unsaved-changes prompt.
//!
//! Decode and encode failures are reported to the user with an error message
//! in addition to the boolean result.

use std::path::PathBuf;

use crate::canvas::Canvas;
use crate::dialogs::{Dialogs, MessageLevel, SaveChoice};
use crate::error::CanvasError;
use crate::format::FileFormat;
use crate::geometry::Size;
use crate::pen::{MAX_PEN_WIDTH, MIN_PEN_WIDTH};
use crate::settings::Settings;

pub struct Shell {
    canvas: Canvas,
    settings: Settings,
}

impl Shell {
    pub fn new(settings: Settings, widget: Size) -> Self {
        let canvas = Canvas::with_settings(&settings, widget);
        Self { canvas, settings }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Canvas access for the host's pointer, resize and repaint handling
    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// File > Open: replace the canvas with an image chosen by the user
    ///
    /// Returns true if an image was loaded.
    pub fn open(&mut self, dialogs: &mut dyn Dialogs) -> bool {
        if !self.maybe_save(dialogs) {
            return false;
        }
        let Some(path) = dialogs.open_path() else {
            log::debug!("Open cancelled");
            return false;
        };
        match self.canvas.open_image(&path) {
            Ok(()) => true,
            Err(err) => {
                self.report(dialogs, &err);
                false
            }
        }
    }

    /// File > Save As > `format`: write the visible canvas to a chosen path
    ///
    /// Returns true only if the file was written.
    pub fn save(&mut self, format: FileFormat, dialogs: &mut dyn Dialogs) -> bool {
        let suggested = self.suggested_path(format);
        let Some(path) = dialogs.save_path(&suggested, format) else {
            log::debug!("Save as {format} cancelled");
            return false;
        };
        match self.canvas.save_image(&path, format) {
            Ok(()) => true,
            Err(err) => {
                self.report(dialogs, &err);
                false
            }
        }
    }

    /// Options > Pen Color
    pub fn pen_color(&mut self, dialogs: &mut dyn Dialogs) {
        if let Some(color) = dialogs.pen_color(self.canvas.pen_color()) {
            log::debug!("Pen color set to {}", color.to_hex());
            self.canvas.set_pen_color(color);
        }
    }

    /// Options > Pen Width
    pub fn pen_width(&mut self, dialogs: &mut dyn Dialogs) {
        let current = self.canvas.pen_width();
        if let Some(width) = dialogs.pen_width(current, MIN_PEN_WIDTH..=MAX_PEN_WIDTH) {
            log::debug!("Pen width set to {width}");
            self.canvas.set_pen_width(width);
        }
    }

    /// Options > Clear Screen
    pub fn clear(&mut self) {
        self.canvas.clear();
    }

    /// Ask about unsaved changes; true if the caller may proceed
    pub fn maybe_save(&mut self, dialogs: &mut dyn Dialogs) -> bool {
        if !self.canvas.is_modified() {
            return true;
        }
        match dialogs.ask_save_changes() {
            SaveChoice::Save => self.save(self.settings.default_format(), dialogs),
            SaveChoice::Discard => true,
            SaveChoice::Cancel => false,
        }
    }

    /// The window is about to close; false vetoes the close
    pub fn close_requested(&mut self, dialogs: &mut dyn Dialogs) -> bool {
        let proceed = self.maybe_save(dialogs);
        if !proceed {
            log::info!("Close vetoed, unsaved changes kept");
        }
        proceed
    }

    /// Help > About
    pub fn about(&self, dialogs: &mut dyn Dialogs) {
        dialogs.message(
            MessageLevel::Info,
            &self.settings.about_title,
            &self.settings.about_text,
        );
    }

    /// File > Print: lay the canvas out on a page and send it to the printer
    ///
    /// The desktop print pipeline writes the page raster as PNG.
    #[cfg(feature = "print")]
    pub fn print(&mut self, dialogs: &mut dyn Dialogs) -> bool {
        let Some(target) = dialogs.print_target(self.settings.print_page) else {
            log::debug!("Print cancelled");
            return false;
        };
        let page = self.canvas.print(target.page);
        let result = image::DynamicImage::ImageRgb8(page)
            .save_with_format(&target.path, image::ImageFormat::Png)
            .map_err(|source| CanvasError::Encode {
                path: target.path.clone(),
                source,
            });
        match result {
            Ok(()) => {
                log::info!("Printed page to {}", target.path.display());
                true
            }
            Err(err) => {
                self.report(dialogs, &err);
                false
            }
        }
    }

    fn suggested_path(&self, format: FileFormat) -> PathBuf {
        let dir = std::env::current_dir().unwrap_or_default();
        dir.join(format!("{}.{}", self.settings.untitled_stem, format.tag()))
    }

    fn report(&self, dialogs: &mut dyn Dialogs, err: &CanvasError) {
        log::error!("{err}");
        dialogs.message(MessageLevel::Error, &self.settings.title, &err.to_string());
    }
}
