use std::time::{Duration, Instant};
use tracing::debug;

use crate::view::ViewState;

/// Target frame interval (~60fps).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);
/// Delay between drag release and auto-rotation resuming.
pub const RESUME_COOLDOWN: Duration = Duration::from_millis(100);
/// Default auto-rotation step in degrees per frame.
pub const DEFAULT_ROTATION_SPEED: f64 = 0.3;

/// Auto-rotation state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionState {
    AutoRotating,
    /// Manual control; `resume_at` is set once the pointer is released.
    Suspended { resume_at: Option<Instant> },
}

/// Advances auto-rotation once per frame unless a drag has suspended it.
#[derive(Debug)]
pub struct AnimationScheduler {
    state: MotionState,
    rotation_speed: f64,
    cooldown: Duration,
}

impl AnimationScheduler {
    pub fn new(rotation_speed: f64) -> Self {
        Self {
            state: MotionState::AutoRotating,
            rotation_speed,
            cooldown: RESUME_COOLDOWN,
        }
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn is_auto_rotating(&self) -> bool {
        self.state == MotionState::AutoRotating
    }

    /// Enter manual control. Clears any pending resume.
    pub fn suspend(&mut self) {
        if self.state == MotionState::AutoRotating {
            debug!("auto-rotation suspended");
        }
        self.state = MotionState::Suspended { resume_at: None };
    }

    /// Schedule a return to auto-rotation after the cooldown.
    pub fn release(&mut self, now: Instant) {
        if let MotionState::Suspended { .. } = self.state {
            self.state = MotionState::Suspended {
                resume_at: Some(now + self.cooldown),
            };
        }
    }

    /// One frame. Returns true when the view changed and needs a render.
    pub fn tick(&mut self, now: Instant, view: &mut ViewState) -> bool {
        if let MotionState::Suspended { resume_at: Some(at) } = self.state {
            if now >= at {
                debug!("auto-rotation resumed");
                self.state = MotionState::AutoRotating;
            }
        }

        match self.state {
            MotionState::AutoRotating => {
                view.rotation.advance(self.rotation_speed);
                true
            }
            MotionState::Suspended { .. } => false,
        }
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_ROTATION_SPEED)
    }
}

/// Fixed-rate frame deadline for the event loop.
#[derive(Debug)]
pub struct FrameClock {
    interval: Duration,
    next: Instant,
}

impl FrameClock {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next: now + interval,
        }
    }

    /// Time left before the next frame is due.
    pub fn until_next(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// True once per elapsed interval. Missed frames are dropped, not replayed.
    pub fn due(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.interval;
        if self.next <= now {
            self.next = now + self.interval;
        }
        true
    }
}
