//! Page carousel drawer: a four-state open/close machine with a timed
//! transition.
//!
//! Time is passed in by the caller as a monotonic timestamp (for example
//! `performance.now()` on the web), so the machine itself never reads a
//! clock and stays deterministic under test.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Time the drawer spends in `Opening` or `Closing`.
pub const CAROUSEL_TRANSITION_DURATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CarouselState {
    Closed,
    Opening,
    #[default]
    Open,
    Closing,
}

/// The drawer state plus the deadline of an in-flight transition.
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselDrawer {
    state: CarouselState,
    deadline: Option<Duration>,
    duration: Duration,
}

impl Default for CarouselDrawer {
    fn default() -> Self {
        Self::new(CAROUSEL_TRANSITION_DURATION)
    }
}

impl CarouselDrawer {
    /// A drawer that starts `Open`.
    pub fn new(duration: Duration) -> Self {
        Self {
            state: CarouselState::Open,
            deadline: None,
            duration,
        }
    }

    pub fn state(&self) -> CarouselState {
        self.state
    }

    /// When the running transition completes, if one is running.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    fn transition(&mut self, to: CarouselState, now: Duration) {
        log::trace!("carousel: {:?} -> {to:?}", self.state);
        self.state = to;
        self.deadline = match to {
            CarouselState::Opening | CarouselState::Closing => Some(now + self.duration),
            CarouselState::Open | CarouselState::Closed => None,
        };
    }

    /// `Closed` → `Opening`. Returns whether the state changed.
    pub fn open(&mut self, now: Duration) -> bool {
        if self.state != CarouselState::Closed {
            return false;
        }
        self.transition(CarouselState::Opening, now);
        true
    }

    /// `Open` → `Closing`. Returns whether the state changed.
    pub fn close(&mut self, now: Duration) -> bool {
        if self.state != CarouselState::Open {
            return false;
        }
        self.transition(CarouselState::Closing, now);
        true
    }

    /// Finish the running transition right away.
    pub fn complete_transition(&mut self) -> bool {
        let to = match self.state {
            CarouselState::Opening => CarouselState::Open,
            CarouselState::Closing => CarouselState::Closed,
            CarouselState::Open | CarouselState::Closed => return false,
        };
        self.transition(to, Duration::ZERO);
        true
    }

    /// Advance the clock; completes the transition once its deadline passed.
    pub fn tick(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => self.complete_transition(),
            _ => false,
        }
    }
}
