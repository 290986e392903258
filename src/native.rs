//! Native dialogs for the desktop host
//!
//! File choosers and message boxes are rfd's blocking native dialogs. Pen
//! color and width are chosen in egui windows drawn by [`crate::ui`]; the
//! value confirmed there is staged here and handed out on the next prompt.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult};

use crate::color::Color;
use crate::dialogs::{Dialogs, MessageLevel, PrintTarget, SaveChoice};
use crate::format::{FileFormat, OPEN_EXTENSIONS};
use crate::geometry::Size;

const SAVE_LABEL: &str = "Save";
const DISCARD_LABEL: &str = "Discard";
const CANCEL_LABEL: &str = "Cancel";

#[derive(Debug, Default)]
pub struct NativeDialogs {
    title: String,
    staged_color: Option<Color>,
    staged_width: Option<u32>,
}

impl NativeDialogs {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Record a color the user confirmed in the pen color window
    pub fn stage_color(&mut self, color: Color) {
        self.staged_color = Some(color);
    }

    /// Record a width the user confirmed in the pen width window
    pub fn stage_width(&mut self, width: u32) {
        self.staged_width = Some(width);
    }
}

impl Dialogs for NativeDialogs {
    fn open_path(&mut self) -> Option<PathBuf> {
        let mut dialog = FileDialog::new()
            .set_title("Open File")
            .add_filter("Images", OPEN_EXTENSIONS)
            .add_filter("All Files", &["*"]);
        if let Ok(dir) = std::env::current_dir() {
            dialog = dialog.set_directory(dir);
        }
        dialog.pick_file()
    }

    fn save_path(&mut self, suggested: &Path, format: FileFormat) -> Option<PathBuf> {
        let mut dialog = FileDialog::new()
            .set_title("Save As")
            .add_filter(format.filter_name(), &[format.tag()])
            .add_filter("All Files", &["*"]);
        if let Some(dir) = suggested.parent() {
            dialog = dialog.set_directory(dir);
        }
        if let Some(name) = suggested.file_name() {
            dialog = dialog.set_file_name(name.to_string_lossy());
        }
        dialog.save_file()
    }

    fn ask_save_changes(&mut self) -> SaveChoice {
        let result = MessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title(&self.title)
            .set_description("The image has been modified.\nDo you want to save your changes?")
            .set_buttons(MessageButtons::YesNoCancelCustom(
                SAVE_LABEL.to_string(),
                DISCARD_LABEL.to_string(),
                CANCEL_LABEL.to_string(),
            ))
            .show();
        match result {
            MessageDialogResult::Custom(label) if label == SAVE_LABEL => SaveChoice::Save,
            MessageDialogResult::Custom(label) if label == DISCARD_LABEL => SaveChoice::Discard,
            MessageDialogResult::Yes => SaveChoice::Save,
            MessageDialogResult::No => SaveChoice::Discard,
            _ => SaveChoice::Cancel,
        }
    }

    fn pen_color(&mut self, _current: Color) -> Option<Color> {
        self.staged_color.take()
    }

    fn pen_width(&mut self, _current: u32, range: RangeInclusive<u32>) -> Option<u32> {
        self.staged_width
            .take()
            .map(|width| width.clamp(*range.start(), *range.end()))
    }

    fn print_target(&mut self, page: Size) -> Option<PrintTarget> {
        let mut dialog = FileDialog::new()
            .set_title("Print to File")
            .set_file_name("untitled-print.png")
            .add_filter("PNG Files", &["png"]);
        if let Ok(dir) = std::env::current_dir() {
            dialog = dialog.set_directory(dir);
        }
        dialog.save_file().map(|path| PrintTarget { path, page })
    }

    fn message(&mut self, level: MessageLevel, title: &str, text: &str) {
        let level = match level {
            MessageLevel::Info => rfd::MessageLevel::Info,
            MessageLevel::Error => rfd::MessageLevel::Error,
        };
        MessageDialog::new()
            .set_level(level)
            .set_title(title)
            .set_description(text)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_staged_values_are_handed_out_once() {
        let mut dialogs = NativeDialogs::new("Scribble");
        assert_eq!(dialogs.pen_color(Color::BLUE), None);

        dialogs.stage_color(Color::BLACK);
        assert_eq!(dialogs.pen_color(Color::BLUE), Some(Color::BLACK));
        assert_eq!(dialogs.pen_color(Color::BLUE), None);

        dialogs.stage_width(80);
        assert_eq!(dialogs.pen_width(1, 1..=50), Some(50));
        assert_eq!(dialogs.pen_width(1, 1..=50), None);
    }
}
