//! Scribble
//!
//! A freehand raster drawing application. The crate is split so the drawing
//! model can be driven without a window:
//! - [`Canvas`] owns the raster buffer, the pen and the stroke state machine
//! - [`Shell`] wraps the canvas with open/save/print and the unsaved-changes
//!   gate, talking to the user only through the [`Dialogs`] trait
//! - [`CommandTable`] and [`MenuBar`] describe every action the user can pick
//! - [`AppWrapper`] is the winit + wgpu + egui desktop host

mod canvas;
mod color;
mod commands;
mod dialogs;
mod error;
mod format;
mod geometry;
mod input;
mod menu;
mod native;
mod pen;
mod renderer;
mod settings;
mod shell;
mod ui;
mod window;

pub use canvas::Canvas;
pub use color::Color;
pub use commands::{ActionId, CommandTable, Outcome};
pub use dialogs::{Dialogs, MessageLevel, PrintTarget, SaveChoice};
pub use error::{CanvasError, SettingsError};
pub use format::{FileFormat, OPEN_EXTENSIONS, SAVE_FORMATS};
pub use geometry::{Point, Rect, Size};
pub use input::{ButtonTracker, Buttons, PointerButton, PointerEvent, PointerEventType};
pub use menu::{Menu, MenuBar, MenuItem, Shortcut};
pub use native::NativeDialogs;
pub use pen::{Pen, MAX_PEN_WIDTH, MIN_PEN_WIDTH};
pub use renderer::Renderer;
pub use settings::{Settings, GROW_MARGIN};
pub use shell::Shell;
pub use window::AppWrapper;
