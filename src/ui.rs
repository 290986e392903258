//! egui menu bar and pen prompts
//!
//! Draws the [`MenuBar`] model as a top panel. Choosing "Pen Color..." or
//! "Pen Width..." opens a small window seeded with the current pen instead
//! of dispatching right away; confirming it reports the chosen value so the
//! host can stage it and run the matching action.

use crate::color::Color;
use crate::commands::ActionId;
use crate::menu::{MenuBar, MenuItem};
use crate::pen::{Pen, MAX_PEN_WIDTH, MIN_PEN_WIDTH};

/// Something the user did in the egui layer this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// A menu entry that runs straight through the command table
    Action(ActionId),
    PenColorChosen(Color),
    PenWidthChosen(u32),
}

#[derive(Debug, Default)]
pub struct UiOutput {
    pub events: Vec<UiEvent>,
    /// Height of the menu panel in points
    pub menu_height: f32,
}

/// Open pen prompt and the value being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prompt {
    Closed,
    Color([u8; 3]),
    Width(u32),
}

pub struct Ui {
    menu: MenuBar,
    prompt: Prompt,
}

impl Ui {
    pub fn new(menu: MenuBar) -> Self {
        Self {
            menu,
            prompt: Prompt::Closed,
        }
    }

    pub fn menu(&self) -> &MenuBar {
        &self.menu
    }

    /// Route a chosen action, opening a prompt for the pen settings
    pub fn activate(&mut self, action: ActionId, pen: Pen) -> Option<UiEvent> {
        match action {
            ActionId::PenColor => {
                self.prompt = Prompt::Color(pen.color.to_array());
                None
            }
            ActionId::PenWidth => {
                self.prompt = Prompt::Width(pen.width);
                None
            }
            other => Some(UiEvent::Action(other)),
        }
    }

    pub fn is_prompt_open(&self) -> bool {
        self.prompt != Prompt::Closed
    }

    pub fn show(&mut self, ctx: &egui::Context, pen: Pen) -> UiOutput {
        let mut output = UiOutput::default();

        let mut clicked = None;
        let panel = egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for menu in &self.menu.menus {
                    ui.menu_button(menu.title.as_str(), |ui| {
                        menu_items(ui, &menu.items, &mut clicked);
                    });
                }
            });
        });
        output.menu_height = panel.response.rect.height();

        if let Some(action) = clicked {
            output.events.extend(self.activate(action, pen));
        }
        output.events.extend(self.show_prompt(ctx));
        output
    }

    fn show_prompt(&mut self, ctx: &egui::Context) -> Option<UiEvent> {
        let mut open = true;
        let mut confirmed = false;
        let mut cancelled = false;

        match &mut self.prompt {
            Prompt::Closed => return None,
            Prompt::Color(rgb) => {
                egui::Window::new("Pen Color")
                    .collapsible(false)
                    .resizable(false)
                    .open(&mut open)
                    .show(ctx, |ui| {
                        ui.horizontal(|ui| {
                            ui.label("Color:");
                            ui.color_edit_button_srgb(rgb);
                        });
                        ok_cancel(ui, &mut confirmed, &mut cancelled);
                    });
            }
            Prompt::Width(width) => {
                egui::Window::new("Pen Width")
                    .collapsible(false)
                    .resizable(false)
                    .open(&mut open)
                    .show(ctx, |ui| {
                        ui.add(egui::Slider::new(width, MIN_PEN_WIDTH..=MAX_PEN_WIDTH).text("pixels"));
                        ok_cancel(ui, &mut confirmed, &mut cancelled);
                    });
            }
        }

        let event = match self.prompt {
            Prompt::Color(rgb) if confirmed => Some(UiEvent::PenColorChosen(Color::from_array(rgb))),
            Prompt::Width(width) if confirmed => Some(UiEvent::PenWidthChosen(width)),
            _ => None,
        };
        if confirmed || cancelled || !open {
            self.prompt = Prompt::Closed;
        }
        event
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new(MenuBar::new())
    }
}

fn menu_items(ui: &mut egui::Ui, items: &[MenuItem], clicked: &mut Option<ActionId>) {
    for item in items {
        match item {
            MenuItem::Action {
                label,
                action,
                shortcut,
            } => {
                let mut button = egui::Button::new(label.as_str());
                if let Some(shortcut) = shortcut {
                    button = button.shortcut_text(shortcut.label());
                }
                if ui.add(button).clicked() {
                    *clicked = Some(*action);
                    ui.close();
                }
            }
            MenuItem::Submenu(menu) => {
                ui.menu_button(menu.title.as_str(), |ui| {
                    menu_items(ui, &menu.items, clicked);
                });
            }
            MenuItem::Separator => {
                ui.separator();
            }
        }
    }
}

fn ok_cancel(ui: &mut egui::Ui, confirmed: &mut bool, cancelled: &mut bool) {
    ui.horizontal(|ui| {
        if ui.button("OK").clicked() {
            *confirmed = true;
        }
        if ui.button("Cancel").clicked() {
            *cancelled = true;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pen_actions_open_prompts() {
        let mut ui = Ui::default();
        let pen = Pen::default();

        assert_eq!(ui.activate(ActionId::PenColor, pen), None);
        assert!(ui.is_prompt_open());
        assert_eq!(ui.prompt, Prompt::Color(Color::BLUE.to_array()));

        assert_eq!(ui.activate(ActionId::PenWidth, pen), None);
        assert_eq!(ui.prompt, Prompt::Width(1));
    }

    #[test]
    fn test_other_actions_pass_through() {
        let mut ui = Ui::default();
        assert_eq!(
            ui.activate(ActionId::ClearScreen, Pen::default()),
            Some(UiEvent::Action(ActionId::ClearScreen))
        );
        assert!(!ui.is_prompt_open());
    }

    #[test]
    fn test_show_draws_menu_bar() {
        let ctx = egui::Context::default();
        let mut ui = Ui::default();
        let mut output = UiOutput::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            output = ui.show(ctx, Pen::default());
        });
        assert!(output.menu_height > 0.0);
        assert!(output.events.is_empty());
    }
}
