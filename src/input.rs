//! Input handling.
//!
//! Turns raw window events into the per-frame questions the experience
//! asks: was a toggle key pressed, how far was the view dragged, how much
//! did the wheel turn, and was there a click (a left press and release that
//! barely moved).

use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// A left press that moves less than this many pixels before release is a
/// click rather than a drag.
pub const CLICK_SLOP: f32 = 4.0;

/// Keyboard and mouse state for one frame.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,

    // Left button drag
    dragging: bool,
    drag_travel: f32,
    drag_delta: Vec2,
    cursor: Option<Vec2>,

    scroll_delta: f32,
    clicked: bool,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a key was pressed this frame (just went down).
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Cursor movement this frame while the left button is held, in pixels.
    pub fn drag_delta(&self) -> Vec2 {
        self.drag_delta
    }

    /// Wheel movement this frame. Positive values scroll up/forward.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    /// Whether a left click finished this frame.
    pub fn clicked(&self) -> bool {
        self.clicked
    }

    /// Called at the start of each frame to clear per-frame state.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.drag_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
        self.clicked = false;
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.press_key(key),
                        ElementState::Released => self.release_key(key),
                    }
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.press_left(),
                ElementState::Released => self.release_left(),
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.move_cursor(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                self.dragging = false;
                self.cursor = None;
            }
            // Releases are not delivered while unfocused
            WindowEvent::Focused(false) => self.release_all(),
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll(match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                });
            }
            _ => {}
        }
    }

    fn press_key(&mut self, key: KeyCode) {
        // Only fire pressed event if not already held (no repeat)
        if self.keys_held.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    fn release_key(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    fn release_all(&mut self) {
        self.keys_held.clear();
        self.dragging = false;
    }

    fn press_left(&mut self) {
        self.dragging = true;
        self.drag_travel = 0.0;
    }

    fn release_left(&mut self) {
        if self.dragging && self.drag_travel < CLICK_SLOP {
            self.clicked = true;
        }
        self.dragging = false;
    }

    fn move_cursor(&mut self, position: Vec2) {
        if let (true, Some(last)) = (self.dragging, self.cursor) {
            let delta = position - last;
            self.drag_delta += delta;
            self.drag_travel += delta.length();
        }
        self.cursor = Some(position);
    }

    fn scroll(&mut self, amount: f32) {
        self.scroll_delta += amount;
    }
}
