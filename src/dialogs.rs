//! User prompts
//!
//! The shell never opens windows itself. Every question it asks the user goes
//! through [`Dialogs`], implemented natively by [`crate::native::NativeDialogs`]
//! and by scripted doubles in tests.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::color::Color;
use crate::format::FileFormat;
use crate::geometry::Size;

/// Answer to the unsaved-changes prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChoice {
    Save,
    Discard,
    Cancel,
}

/// Severity of an informational message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Error,
}

/// Where and how large a printed page should be
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintTarget {
    pub path: PathBuf,
    pub page: Size,
}

pub trait Dialogs {
    /// Ask for an image to open; `None` if the user cancelled
    fn open_path(&mut self) -> Option<PathBuf>;

    /// Ask for a destination, pre-filled with `suggested`; `None` if cancelled
    fn save_path(&mut self, suggested: &Path, format: FileFormat) -> Option<PathBuf>;

    /// The image has unsaved changes: save, discard or cancel?
    fn ask_save_changes(&mut self) -> SaveChoice;

    /// Ask for a new pen color; `None` if the user did not confirm
    fn pen_color(&mut self, current: Color) -> Option<Color>;

    /// Ask for a new pen width within `range`; `None` if the user did not confirm
    fn pen_width(&mut self, current: u32, range: RangeInclusive<u32>) -> Option<u32>;

    /// Ask where to print a page of the default size; `None` if cancelled
    fn print_target(&mut self, page: Size) -> Option<PrintTarget>;

    fn message(&mut self, level: MessageLevel, title: &str, text: &str);
}
