//! Action Dispatch
//!
//! Every menu entry and keyboard shortcut resolves to an [`ActionId`]. The
//! [`CommandTable`] maps each id to a handler closure, built once at startup,
//! so hosts and tests can trigger any action the same way.

use std::collections::HashMap;
use std::fmt;

use crate::dialogs::Dialogs;
use crate::format::{FileFormat, SAVE_FORMATS};
use crate::shell::Shell;

/// Identifies a user-triggerable action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionId {
    Open,
    /// Save As with the format picked from the submenu
    SaveAs(FileFormat),
    #[cfg(feature = "print")]
    Print,
    Exit,
    PenColor,
    PenWidth,
    ClearScreen,
    About,
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionId::Open => f.write_str("open"),
            ActionId::SaveAs(format) => write!(f, "save-as-{format}"),
            #[cfg(feature = "print")]
            ActionId::Print => f.write_str("print"),
            ActionId::Exit => f.write_str("exit"),
            ActionId::PenColor => f.write_str("pen-color"),
            ActionId::PenWidth => f.write_str("pen-width"),
            ActionId::ClearScreen => f.write_str("clear-screen"),
            ActionId::About => f.write_str("about"),
        }
    }
}

/// What the host should do after an action ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// The user confirmed leaving the application
    Exit,
}

type Handler = Box<dyn Fn(&mut Shell, &mut dyn Dialogs) -> Outcome>;

pub struct CommandTable {
    handlers: HashMap<ActionId, Handler>,
}

impl CommandTable {
    pub fn new() -> Self {
        let mut table = Self {
            handlers: HashMap::new(),
        };

        table.bind(ActionId::Open, |shell, dialogs| {
            shell.open(dialogs);
            Outcome::Continue
        });
        for &format in SAVE_FORMATS {
            table.bind(ActionId::SaveAs(format), move |shell, dialogs| {
                shell.save(format, dialogs);
                Outcome::Continue
            });
        }
        #[cfg(feature = "print")]
        table.bind(ActionId::Print, |shell, dialogs| {
            shell.print(dialogs);
            Outcome::Continue
        });
        table.bind(ActionId::Exit, |shell, dialogs| {
            if shell.close_requested(dialogs) {
                Outcome::Exit
            } else {
                Outcome::Continue
            }
        });
        table.bind(ActionId::PenColor, |shell, dialogs| {
            shell.pen_color(dialogs);
            Outcome::Continue
        });
        table.bind(ActionId::PenWidth, |shell, dialogs| {
            shell.pen_width(dialogs);
            Outcome::Continue
        });
        table.bind(ActionId::ClearScreen, |shell, _| {
            shell.clear();
            Outcome::Continue
        });
        table.bind(ActionId::About, |shell, dialogs| {
            shell.about(dialogs);
            Outcome::Continue
        });

        table
    }

    fn bind<F>(&mut self, id: ActionId, handler: F)
    where
        F: Fn(&mut Shell, &mut dyn Dialogs) -> Outcome + 'static,
    {
        self.handlers.insert(id, Box::new(handler));
    }

    /// Run the handler bound to `id`
    pub fn dispatch(&self, id: ActionId, shell: &mut Shell, dialogs: &mut dyn Dialogs) -> Outcome {
        match self.handlers.get(&id) {
            Some(handler) => {
                log::debug!("Dispatching action {id}");
                handler(shell, dialogs)
            }
            None => {
                log::warn!("No handler bound for action {id}");
                Outcome::Continue
            }
        }
    }

    pub fn contains(&self, id: ActionId) -> bool {
        self.handlers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::SaveChoice;
    use crate::geometry::{Point, Size};
    use crate::input::PointerButton;
    use crate::settings::Settings;
    use crate::shell::testing::ScriptedDialogs;
    use pretty_assertions::assert_eq;

    fn shell() -> Shell {
        Shell::new(Settings::default(), Size::new(64, 64))
    }

    #[test]
    fn test_every_save_format_is_bound() {
        let table = CommandTable::new();
        for &format in SAVE_FORMATS {
            assert!(table.contains(ActionId::SaveAs(format)), "{format}");
        }
        assert!(table.contains(ActionId::About));
        assert!(!table.is_empty());
    }

    #[test]
    fn test_exit_outcome_follows_close_gate() {
        let table = CommandTable::new();
        let mut shell = shell();
        let mut dialogs = ScriptedDialogs::default();
        assert_eq!(table.dispatch(ActionId::Exit, &mut shell, &mut dialogs), Outcome::Exit);

        shell.clear();
        dialogs.save_choices.push_back(SaveChoice::Cancel);
        assert_eq!(
            table.dispatch(ActionId::Exit, &mut shell, &mut dialogs),
            Outcome::Continue
        );
        dialogs.save_choices.push_back(SaveChoice::Discard);
        assert_eq!(table.dispatch(ActionId::Exit, &mut shell, &mut dialogs), Outcome::Exit);
    }

    #[test]
    fn test_clear_screen_marks_modified() {
        let table = CommandTable::new();
        let mut shell = shell();
        shell
            .canvas_mut()
            .handle_pointer_down(Point::new(3, 3), PointerButton::Primary);
        shell
            .canvas_mut()
            .handle_pointer_up(Point::new(3, 3), PointerButton::Primary);
        let mut dialogs = ScriptedDialogs::default();

        table.dispatch(ActionId::ClearScreen, &mut shell, &mut dialogs);
        assert!(shell.canvas().is_modified());
        assert!(shell
            .canvas()
            .buffer()
            .pixels()
            .all(|px| *px == image::Rgb([255, 255, 255])));
    }

    #[test]
    fn test_save_as_carries_chosen_format() {
        let table = CommandTable::new();
        let mut shell = shell();
        let mut dialogs = ScriptedDialogs::default();
        dialogs.save_paths.push_back(None);
        let tga = FileFormat::from_tag("tga").unwrap();

        table.dispatch(ActionId::SaveAs(tga), &mut shell, &mut dialogs);
        assert_eq!(dialogs.suggested[0].1, tga);
    }

    #[test]
    fn test_action_names() {
        assert_eq!(ActionId::SaveAs(FileFormat::PNG).to_string(), "save-as-png");
        assert_eq!(ActionId::ClearScreen.to_string(), "clear-screen");
    }
}
