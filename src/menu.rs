//! Menu Bar Model
//!
//! The menu layout is plain data: the egui layer draws it and the keyboard
//! handler resolves shortcuts against it, so a shortcut and its menu entry
//! can never disagree.

use crate::commands::ActionId;
use crate::format::SAVE_FORMATS;

/// A Ctrl (Cmd on macOS) + key accelerator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shortcut {
    /// Lower-case key character
    pub key: char,
}

impl Shortcut {
    pub const fn ctrl(key: char) -> Self {
        Self { key }
    }

    /// Human-readable form shown next to the menu entry
    pub fn label(&self) -> String {
        format!("Ctrl+{}", self.key.to_ascii_uppercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Action {
        label: String,
        action: ActionId,
        shortcut: Option<Shortcut>,
    },
    Submenu(Menu),
    Separator,
}

impl MenuItem {
    fn action(label: impl Into<String>, action: ActionId) -> Self {
        MenuItem::Action {
            label: label.into(),
            action,
            shortcut: None,
        }
    }

    fn with_shortcut(label: impl Into<String>, action: ActionId, key: char) -> Self {
        MenuItem::Action {
            label: label.into(),
            action,
            shortcut: Some(Shortcut::ctrl(key)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub title: String,
    pub items: Vec<MenuItem>,
}

impl Menu {
    fn new(title: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            title: title.into(),
            items,
        }
    }

    fn actions(&self) -> Vec<(ActionId, Option<Shortcut>)> {
        let mut out = Vec::new();
        for item in &self.items {
            match item {
                MenuItem::Action {
                    action, shortcut, ..
                } => out.push((*action, *shortcut)),
                MenuItem::Submenu(menu) => out.extend(menu.actions()),
                MenuItem::Separator => {}
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuBar {
    pub menus: Vec<Menu>,
}

impl MenuBar {
    /// File, Options and Help menus
    pub fn new() -> Self {
        let save_as = Menu::new(
            "Save As",
            SAVE_FORMATS
                .iter()
                .map(|&format| MenuItem::action(format.menu_label(), ActionId::SaveAs(format)))
                .collect(),
        );

        let mut file = vec![
            MenuItem::with_shortcut("Open...", ActionId::Open, 'o'),
            MenuItem::Submenu(save_as),
        ];
        #[cfg(feature = "print")]
        file.push(MenuItem::action("Print...", ActionId::Print));
        file.push(MenuItem::Separator);
        file.push(MenuItem::with_shortcut("Exit", ActionId::Exit, 'q'));

        let options = vec![
            MenuItem::action("Pen Color...", ActionId::PenColor),
            MenuItem::action("Pen Width...", ActionId::PenWidth),
            MenuItem::Separator,
            MenuItem::with_shortcut("Clear Screen", ActionId::ClearScreen, 'l'),
        ];

        let help = vec![MenuItem::action("About", ActionId::About)];

        Self {
            menus: vec![
                Menu::new("File", file),
                Menu::new("Options", options),
                Menu::new("Help", help),
            ],
        }
    }

    /// Every action reachable from the menu bar, in menu order
    pub fn actions(&self) -> Vec<ActionId> {
        self.menus
            .iter()
            .flat_map(Menu::actions)
            .map(|(action, _)| action)
            .collect()
    }

    /// Resolve a Ctrl+`key` press to the action carrying that shortcut
    pub fn resolve_shortcut(&self, key: &str) -> Option<ActionId> {
        let mut chars = key.chars();
        let key = chars.next()?.to_ascii_lowercase();
        if chars.next().is_some() {
            return None;
        }
        self.menus
            .iter()
            .flat_map(Menu::actions)
            .find(|(_, shortcut)| *shortcut == Some(Shortcut::ctrl(key)))
            .map(|(action, _)| action)
    }
}

impl Default for MenuBar {
    fn default() -> Self {
        Self::new()
    }
}
