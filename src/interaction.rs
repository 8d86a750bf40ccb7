use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use std::io;
use std::time::Instant;
use tracing::debug;

use crate::scheduler::AnimationScheduler;
use crate::view::{Rotation, ViewState};

/// Degrees of rotation per pixel dragged.
pub const DRAG_SENSITIVITY: f64 = 0.5;
/// Scale factor applied per wheel notch towards the viewer.
pub const ZOOM_IN_FACTOR: f64 = 1.1;
/// Scale factor applied per wheel notch away from the viewer.
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

/// Wheel direction, terminal style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wheel {
    /// Scroll up: zoom in
    Up,
    /// Scroll down: zoom out
    Down,
}

/// An active drag. Only exists between pointer-down and pointer-up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionSession {
    pub start_x: f64,
    pub start_y: f64,
    pub start_rotation: Rotation,
}

/// Turns pointer and wheel input into rotation and zoom changes.
#[derive(Debug)]
pub struct InteractionController {
    session: Option<InteractionSession>,
    sensitivity: f64,
}

impl InteractionController {
    pub fn new(sensitivity: f64) -> Self {
        Self {
            session: None,
            sensitivity,
        }
    }

    pub fn session(&self) -> Option<&InteractionSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Start a drag at (x, y) pixels. Ignored while another drag is active.
    pub fn pointer_down(
        &mut self,
        x: f64,
        y: f64,
        view: &ViewState,
        scheduler: &mut AnimationScheduler,
    ) -> bool {
        if self.session.is_some() {
            return false;
        }
        debug!(x, y, "drag started");
        self.session = Some(InteractionSession {
            start_x: x,
            start_y: y,
            start_rotation: view.rotation,
        });
        scheduler.suspend();
        true
    }

    /// Rotate relative to the drag start. Returns true when the view changed.
    pub fn pointer_move(&mut self, x: f64, y: f64, view: &mut ViewState) -> bool {
        let Some(session) = self.session else {
            return false;
        };
        view.rotation = Rotation::dragged(
            session.start_rotation,
            x - session.start_x,
            y - session.start_y,
            self.sensitivity,
        );
        true
    }

    /// End the drag; auto-rotation resumes after the scheduler's cooldown.
    pub fn pointer_up(&mut self, now: Instant, scheduler: &mut AnimationScheduler) -> bool {
        if self.session.take().is_none() {
            return false;
        }
        debug!("drag ended");
        scheduler.release(now);
        true
    }

    /// Zoom one wheel notch. Returns true when the scale changed.
    pub fn wheel(&mut self, direction: Wheel, view: &mut ViewState) -> bool {
        let before = view.zoom.scale();
        let factor = match direction {
            Wheel::Up => ZOOM_IN_FACTOR,
            Wheel::Down => ZOOM_OUT_FACTOR,
        };
        view.zoom.zoom_by(factor);
        view.zoom.scale() != before
    }

    /// Drop any active drag without resuming auto-rotation (teardown).
    pub fn cancel(&mut self) {
        if self.session.take().is_some() {
            debug!("drag cancelled");
        }
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(DRAG_SENSITIVITY)
    }
}

/// Terminal mouse reporting, held for as long as the globe is mounted.
/// Released on drop so every exit path restores the terminal.
pub struct MouseCapture {
    _private: (),
}

impl MouseCapture {
    pub fn enable() -> io::Result<Self> {
        execute!(io::stdout(), EnableMouseCapture)?;
        Ok(Self { _private: () })
    }
}

impl Drop for MouseCapture {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), DisableMouseCapture);
    }
}
