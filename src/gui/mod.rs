// src/gui/mod.rs - Interactive window around a renderer

mod events;
mod state;

use std::time::Duration;
use log::{debug, info};
use minifb::{Window, WindowOptions};

use crate::config::Config;
use crate::errors::{IsoContourError, Result};
use crate::renderer::Renderer;

pub use self::state::{DragMode, ViewerState};

/// Show `renderer` in a window and block until the user closes it
pub fn run_viewer(renderer: Renderer, config: &Config) -> Result<()> {
    let [width, height] = config.window_size;

    let mut window = Window::new(
        &config.window_title,
        width,
        height,
        WindowOptions {
            resize: false,
            scale: minifb::Scale::X1,
            ..WindowOptions::default()
        },
    )
    .map_err(|e| IsoContourError::Window(format!("Failed to create window: {}", e)))?;

    window.limit_update_rate(Some(Duration::from_millis(16)));

    let mut state = ViewerState::new(renderer, width, height);
    info!("Viewer open ({}x{}): drag to pan, right-drag or wheel to zoom, r resets, q quits", width, height);

    while window.is_open() && !state.quit {
        events::handle_events(&window, &mut state);

        if state.needs_render {
            state.render();
            if !state.status_message.is_empty() {
                debug!("{}", state.status_message);
                state.status_message.clear();
            }
            window
                .update_with_buffer(&state.frame.pixels, width, height)
                .map_err(|e| IsoContourError::Window(format!("Failed to update window: {}", e)))?;
        } else {
            window.update();
        }
    }

    info!("Viewer closed");
    Ok(())
}
