//! Scribble desktop application

use anyhow::Context;
use scribble::{AppWrapper, Settings};
use winit::event_loop::{ControlFlow, EventLoop};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    log::info!("🚀 Starting scribble");

    let settings = Settings::default();
    settings.validate().context("Invalid settings")?;

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app_wrapper = AppWrapper::new(settings);

    event_loop.run_app(&mut app_wrapper).context("Event loop error")?;
    Ok(())
}
