//! Raster file formats offered by the Save As menu
//!
//! Each format is identified by a short tag (`"png"`, `"jpg"`, ...) that
//! doubles as the default file extension. Encoding and decoding are delegated
//! to the `image` crate.

use std::fmt;

use image::ImageFormat;

/// A writable raster format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileFormat {
    tag: &'static str,
    codec: ImageFormat,
}

/// Every format the Save As menu lists, in menu order
pub const SAVE_FORMATS: &[FileFormat] = &[
    FileFormat::new("bmp", ImageFormat::Bmp),
    FileFormat::new("jpg", ImageFormat::Jpeg),
    FileFormat::new("png", ImageFormat::Png),
    FileFormat::new("ppm", ImageFormat::Pnm),
    FileFormat::new("qoi", ImageFormat::Qoi),
    FileFormat::new("tga", ImageFormat::Tga),
    FileFormat::new("tiff", ImageFormat::Tiff),
];

/// Extensions the Open dialog filters on (decode-only formats included)
pub const OPEN_EXTENSIONS: &[&str] = &[
    "bmp", "gif", "ico", "jpg", "jpeg", "png", "pbm", "pgm", "ppm", "qoi", "tga", "tif", "tiff",
    "webp",
];

impl FileFormat {
    pub const PNG: FileFormat = FileFormat::new("png", ImageFormat::Png);

    const fn new(tag: &'static str, codec: ImageFormat) -> Self {
        Self { tag, codec }
    }

    /// Look up a save format by tag, case-insensitively
    pub fn from_tag(tag: &str) -> Option<FileFormat> {
        SAVE_FORMATS
            .iter()
            .copied()
            .find(|f| f.tag.eq_ignore_ascii_case(tag))
    }

    /// Lower-case tag, also used as the file extension
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn codec(&self) -> ImageFormat {
        self.codec
    }

    /// Menu label, e.g. `PNG...`
    pub fn menu_label(&self) -> String {
        format!("{}...", self.tag.to_ascii_uppercase())
    }

    /// File dialog filter name, e.g. `PNG Files`
    pub fn filter_name(&self) -> String {
        format!("{} Files", self.tag.to_ascii_uppercase())
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_tag_is_case_insensitive() {
        assert_eq!(FileFormat::from_tag("PNG"), Some(FileFormat::PNG));
        assert_eq!(FileFormat::from_tag("jpg").map(|f| f.codec()), Some(ImageFormat::Jpeg));
        assert_eq!(FileFormat::from_tag("xcf"), None);
    }

    #[test]
    fn test_labels() {
        let tiff = FileFormat::from_tag("tiff").unwrap();
        assert_eq!(tiff.menu_label(), "TIFF...");
        assert_eq!(tiff.filter_name(), "TIFF Files");
        assert_eq!(tiff.to_string(), "tiff");
    }

    #[test]
    fn test_save_formats_are_writable() {
        for format in SAVE_FORMATS {
            assert!(format.codec().writing_enabled(), "{format} cannot be written");
            assert!(OPEN_EXTENSIONS.contains(&format.tag()), "{format} cannot be opened");
        }
    }
}
