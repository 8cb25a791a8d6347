//! Per-entity animation frame bookkeeping.
//!
//! The renderer owns the actual frames; this only tracks which frame each
//! entity is on and when it last changed. Time is passed in by the caller.

use saver_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Display duration of each frame of a looping animation, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameDelays {
    delays: Vec<u32>,
}

impl FrameDelays {
    pub fn new(delays: Vec<u32>) -> Result<Self> {
        if delays.is_empty() {
            return Err(Error::InvalidConfig(
                "an animation needs at least one frame".to_string(),
            ));
        }
        Ok(Self { delays })
    }

    /// Every frame shown for the same duration
    pub fn uniform(frame_count: usize, delay_ms: u32) -> Result<Self> {
        Self::new(vec![delay_ms; frame_count])
    }

    pub fn frame_count(&self) -> usize {
        self.delays.len()
    }

    pub fn delay(&self, frame: usize) -> u32 {
        self.delays[frame % self.delays.len()]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationState {
    pub frame: usize,
    pub last_change_ms: u64,
}

impl AnimationState {
    /// Move to the next frame once the current one has been shown long enough.
    ///
    /// Returns the frame to display at `now_ms`.
    pub fn advance(&mut self, now_ms: u64, delays: &FrameDelays) -> usize {
        let elapsed = now_ms.saturating_sub(self.last_change_ms);
        if elapsed >= u64::from(delays.delay(self.frame)) {
            self.frame = (self.frame + 1) % delays.frame_count();
            self.last_change_ms = now_ms;
        }
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_delays_rejected() {
        assert!(FrameDelays::new(vec![]).is_err());
        assert!(FrameDelays::uniform(0, 50).is_err());
    }

    #[test]
    fn test_frame_waits_for_delay() {
        let delays = FrameDelays::new(vec![100, 40, 60]).unwrap();
        let mut state = AnimationState::default();

        assert_eq!(state.advance(50, &delays), 0);
        assert_eq!(state.advance(100, &delays), 1);
        assert_eq!(state.last_change_ms, 100);
        assert_eq!(state.advance(139, &delays), 1);
        assert_eq!(state.advance(140, &delays), 2);
    }

    #[test]
    fn test_frame_wraps_around() {
        let delays = FrameDelays::uniform(2, 10).unwrap();
        let mut state = AnimationState::default();

        assert_eq!(state.advance(10, &delays), 1);
        assert_eq!(state.advance(20, &delays), 0);
        assert_eq!(state.advance(30, &delays), 1);
    }

    #[test]
    fn test_clock_going_backwards_holds_frame() {
        let delays = FrameDelays::uniform(4, 10).unwrap();
        let mut state = AnimationState {
            frame: 2,
            last_change_ms: 500,
        };
        assert_eq!(state.advance(400, &delays), 2);
    }
}
