//! Window and Event Loop Management
//!
//! Translates winit events into canvas pointer events and menu actions,
//! and drives one egui + canvas frame per redraw.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{Key, ModifiersState};
use winit::window::{Window, WindowId};

use crate::canvas::Canvas;
use crate::commands::{ActionId, CommandTable, Outcome};
use crate::geometry::{Point, Size};
use crate::input::{ButtonTracker, PointerButton, PointerEvent};
use crate::menu::MenuBar;
use crate::native::NativeDialogs;
use crate::renderer::{CanvasArea, Overlay, Renderer};
use crate::settings::Settings;
use crate::shell::Shell;
use crate::ui::{Ui, UiEvent, UiOutput};

/// Everything that exists once the window is up
struct AppState {
    window: Arc<Window>,
    renderer: Renderer,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    ui: Ui,
    shell: Shell,
    dialogs: NativeDialogs,
    buttons: ButtonTracker,
    modifiers: ModifiersState,
    /// Last cursor position in window pixels
    cursor: Point,
    /// Rows taken by the menu bar, in physical pixels
    canvas_top: u32,
}

impl AppState {
    fn canvas_size(&self) -> Size {
        let size = self.window.inner_size();
        Size::new(size.width, size.height.saturating_sub(self.canvas_top))
    }

    fn canvas_point(&self) -> Point {
        to_canvas_space(self.cursor, self.canvas_top)
    }

    fn request_redraw_if_damaged(&self) {
        if self.shell.canvas().has_damage() {
            self.window.request_redraw();
        }
    }
}

/// Wrapper for the application window and state
pub struct AppWrapper {
    settings: Settings,
    commands: CommandTable,
    state: Option<AppState>,
}

impl AppWrapper {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            commands: CommandTable::new(),
            state: None,
        }
    }

    fn create_state(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<AppState> {
        let initial_size = PhysicalSize::new(self.settings.window_size.width, self.settings.window_size.height);
        let window_attributes = Window::default_attributes()
            .with_title(self.settings.title.as_str())
            .with_inner_size(initial_size);
        let window = Arc::new(event_loop.create_window(window_attributes)?);
        log::info!("Window created: {:?}", window.inner_size());

        let size = window.inner_size();
        let renderer = pollster::block_on(Renderer::new(window.clone(), size))?;

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let shell = Shell::new(self.settings.clone(), Size::new(size.width, size.height));
        log::info!("✅ Renderer created, canvas {}x{}", size.width, size.height);

        Ok(AppState {
            window,
            renderer,
            egui_ctx,
            egui_state,
            ui: Ui::new(MenuBar::new()),
            shell,
            dialogs: NativeDialogs::new(self.settings.title.clone()),
            buttons: ButtonTracker::new(),
            modifiers: ModifiersState::empty(),
            cursor: Point::new(0, 0),
            canvas_top: 0,
        })
    }

    /// Run `action` and leave the event loop if it says so
    fn run_action(&mut self, event_loop: &ActiveEventLoop, action: ActionId) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let point = state.canvas_point();
        finish_stroke(state.shell.canvas_mut(), point);

        let outcome = self
            .commands
            .dispatch(action, &mut state.shell, &mut state.dialogs);
        if outcome == Outcome::Exit {
            log::info!("Exiting");
            event_loop.exit();
            return;
        }
        state.window.request_redraw();
    }

    fn handle_ui_events(&mut self, event_loop: &ActiveEventLoop, events: Vec<UiEvent>) {
        for event in events {
            let action = match event {
                UiEvent::Action(action) => action,
                UiEvent::PenColorChosen(color) => {
                    if let Some(state) = self.state.as_mut() {
                        state.dialogs.stage_color(color);
                    }
                    ActionId::PenColor
                }
                UiEvent::PenWidthChosen(width) => {
                    if let Some(state) = self.state.as_mut() {
                        state.dialogs.stage_width(width);
                    }
                    ActionId::PenWidth
                }
            };
            self.run_action(event_loop, action);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let events = {
            let Some(state) = self.state.as_mut() else {
                return;
            };

            let raw_input = state.egui_state.take_egui_input(&state.window);
            let pen = state.shell.canvas().pen();
            let mut ui_output = UiOutput::default();
            let full_output = state.egui_ctx.run(raw_input, |ctx| {
                ui_output = state.ui.show(ctx, pen);
            });
            state
                .egui_state
                .handle_platform_output(&state.window, full_output.platform_output);

            let canvas_top = (ui_output.menu_height * full_output.pixels_per_point).ceil() as u32;
            if canvas_top != state.canvas_top {
                state.canvas_top = canvas_top;
                let size = state.canvas_size();
                state.shell.canvas_mut().handle_resize(size);
            }

            let primitives = state
                .egui_ctx
                .tessellate(full_output.shapes, full_output.pixels_per_point);
            let damage = state.shell.canvas_mut().render();
            state.renderer.upload(state.shell.canvas(), &damage);
            state.renderer.render(
                CanvasArea {
                    top: state.canvas_top,
                    size: state.shell.canvas().widget_size(),
                },
                Overlay {
                    primitives: &primitives,
                    textures: &full_output.textures_delta,
                    pixels_per_point: full_output.pixels_per_point,
                },
            );

            let repaint_now = full_output
                .viewport_output
                .get(&egui::ViewportId::ROOT)
                .is_some_and(|viewport| viewport.repaint_delay.is_zero());
            if repaint_now || !ui_output.events.is_empty() {
                state.window.request_redraw();
            }
            ui_output.events
        };

        self.handle_ui_events(event_loop, events);
    }
}

impl ApplicationHandler for AppWrapper {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.create_state(event_loop) {
            Ok(state) => {
                state.window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => {
                log::error!("Failed to start: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let response = state.egui_state.on_window_event(&state.window, &event);
        if response.repaint {
            state.window.request_redraw();
        }
        let egui_wants_pointer =
            response.consumed || state.egui_ctx.is_pointer_over_area() || state.ui.is_prompt_open();

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                self.run_action(event_loop, ActionId::Exit);
            }
            WindowEvent::Resized(physical_size) => {
                if physical_size.width == 0 || physical_size.height == 0 {
                    log::warn!("Ignoring resize to zero size: {:?}", physical_size);
                    return;
                }
                state.renderer.resize(physical_size);
                let size = state.canvas_size();
                state.shell.canvas_mut().handle_resize(size);
                state.window.request_redraw();
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                state.modifiers = modifiers.state();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if response.consumed || event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                if !(state.modifiers.control_key() || state.modifiers.super_key()) {
                    return;
                }
                let action = match &event.logical_key {
                    Key::Character(key) => state.ui.menu().resolve_shortcut(key),
                    _ => None,
                };
                if let Some(action) = action {
                    self.run_action(event_loop, action);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                state.cursor = Point::new(position.x.floor() as i32, position.y.floor() as i32);
                if state.shell.canvas().is_drawing() {
                    let point = state.canvas_point();
                    let held = state.buttons.held();
                    state
                        .shell
                        .canvas_mut()
                        .handle_pointer_event(PointerEvent::moved(point, held));
                    state.request_redraw_if_damaged();
                }
            }
            WindowEvent::MouseInput { state: button_state, button, .. } => {
                let Some(button) = pointer_button(button) else {
                    return;
                };
                let point = state.canvas_point();
                match button_state {
                    ElementState::Pressed => {
                        state.buttons.press(button);
                        if egui_wants_pointer || point.y < 0 {
                            return;
                        }
                        state
                            .shell
                            .canvas_mut()
                            .handle_pointer_event(PointerEvent::down(point, button));
                    }
                    ElementState::Released => {
                        state.buttons.release(button);
                        state
                            .shell
                            .canvas_mut()
                            .handle_pointer_event(PointerEvent::up(point, button));
                    }
                }
                state.request_redraw_if_damaged();
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }
}

/// Window pixels to canvas pixels; the canvas starts below the menu bar
fn to_canvas_space(cursor: Point, canvas_top: u32) -> Point {
    Point::new(cursor.x, cursor.y.saturating_sub(canvas_top as i32))
}

/// End a stroke in progress with a last segment to `point`
///
/// Modal dialogs swallow the button release, so actions call this first.
fn finish_stroke(canvas: &mut Canvas, point: Point) {
    if canvas.is_drawing() {
        canvas.handle_pointer_event(PointerEvent::up(point, PointerButton::Primary));
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}
