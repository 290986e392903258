//! Application Settings
//!
//! Every tunable constant of the application lives here. Nothing is read
//! from disk or the environment; `Settings::default()` is the configuration.

use crate::color::Color;
use crate::error::SettingsError;
use crate::format::FileFormat;
use crate::geometry::Size;
use crate::pen::{Pen, MAX_PEN_WIDTH, MIN_PEN_WIDTH};

/// Extra pixels added beyond the widget size whenever the buffer grows
pub const GROW_MARGIN: u32 = 128;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Window title
    pub title: String,
    /// Initial inner size of the window in physical pixels
    pub window_size: Size,
    /// Pen used until the user picks another
    pub pen: Pen,
    /// Margin added beyond the widget size when the buffer grows
    pub grow_margin: u32,
    /// Format tag used when "save" is chosen from the unsaved-changes prompt
    pub default_format: String,
    /// File stem suggested by the save dialog
    pub untitled_stem: String,
    /// Page raster size used by the print pipeline (A4 at 150 dpi)
    pub print_page: Size,
    pub about_title: String,
    pub about_text: String,
}

impl Settings {
    /// Check that the settings describe a usable application
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(MIN_PEN_WIDTH..=MAX_PEN_WIDTH).contains(&self.pen.width) {
            return Err(SettingsError::PenWidth {
                width: self.pen.width,
                min: MIN_PEN_WIDTH,
                max: MAX_PEN_WIDTH,
            });
        }
        if self.window_size.is_empty() {
            return Err(SettingsError::WindowSize);
        }
        if self.print_page.is_empty() {
            return Err(SettingsError::PrintPage);
        }
        if FileFormat::from_tag(&self.default_format).is_none() {
            return Err(SettingsError::DefaultFormat(self.default_format.clone()));
        }
        Ok(())
    }

    /// Format used by the unsaved-changes "save" path
    pub fn default_format(&self) -> FileFormat {
        FileFormat::from_tag(&self.default_format).unwrap_or(FileFormat::PNG)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "Scribble".to_string(),
            window_size: Size::new(500, 500),
            pen: Pen::new(Color::BLUE, 1),
            grow_margin: GROW_MARGIN,
            default_format: "png".to_string(),
            untitled_stem: "untitled".to_string(),
            print_page: Size::new(1240, 1754),
            about_title: "About Scribble".to_string(),
            about_text: "Scribble is a small freehand drawing program.\n\
                         Draw with the left mouse button, pick pen color and width \
                         from the Options menu, and save your picture in any of the \
                         formats under File > Save As."
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.validate(), Ok(()));
        assert_eq!(settings.default_format(), FileFormat::PNG);
        assert_eq!(settings.grow_margin, 128);
    }

    #[test]
    fn test_rejects_out_of_range_pen() {
        let mut settings = Settings::default();
        settings.pen.width = 51;
        assert_eq!(
            settings.validate(),
            Err(SettingsError::PenWidth {
                width: 51,
                min: 1,
                max: 50
            })
        );
    }

    #[test]
    fn test_rejects_unknown_format() {
        let settings = Settings {
            default_format: "psd".to_string(),
            ..Settings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::DefaultFormat("psd".to_string()))
        );
        assert_eq!(settings.default_format(), FileFormat::PNG);
    }

    #[test]
    fn test_rejects_empty_sizes() {
        let settings = Settings {
            window_size: Size::new(0, 10),
            ..Settings::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::WindowSize));
    }
}
