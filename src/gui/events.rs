// src/gui/events.rs - Event handling for mouse and keyboard

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window};

use super::state::{DragMode, ViewerState, WHEEL_ZOOM_STEP};

/// Handle all events (mouse and keyboard)
pub fn handle_events(window: &Window, state: &mut ViewerState) {
    if let Some((x, y)) = window.get_mouse_pos(MouseMode::Pass) {
        // Start a drag on press, keep updating while held
        let left = window.get_mouse_down(MouseButton::Left);
        let right = window.get_mouse_down(MouseButton::Right);
        let wanted = if left {
            Some(DragMode::Pan)
        } else if right {
            Some(DragMode::Zoom)
        } else {
            None
        };

        if wanted.is_some() && state.drag == wanted {
            state.drag_to(x, y);
        } else {
            state.drag = wanted;
            state.mouse_x = x;
            state.mouse_y = y;
        }
    }

    if let Some((_, scroll_y)) = window.get_scroll_wheel() {
        if scroll_y != 0.0 {
            state.zoom(WHEEL_ZOOM_STEP.powf(scroll_y.signum() as f64));
        }
    }

    if window.is_key_pressed(Key::R, KeyRepeat::No) {
        state.reset_camera();
    }

    if window.is_key_pressed(Key::C, KeyRepeat::No) {
        state.toggle_scalar_coloring();
    }

    if window.is_key_pressed(Key::O, KeyRepeat::No) {
        state.toggle_outline();
    }

    if window.is_key_down(Key::Escape)
        || window.is_key_pressed(Key::Q, KeyRepeat::No)
        || window.is_key_pressed(Key::E, KeyRepeat::No)
    {
        state.quit = true;
    }
}
