use std::time::{Duration, Instant};

/// Animation time that stops while paused.
///
/// Resuming shifts the start forward by the paused span, so the animation
/// continues from where it stopped.
#[derive(Debug, Clone, Copy)]
pub struct AnimationClock {
    started: Instant,
    paused_at: Option<Instant>,
}

impl AnimationClock {
    pub fn new(now: Instant) -> Self {
        Self { started: now, paused_at: None }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Pauses or resumes; returns whether the clock is now paused.
    pub fn toggle(&mut self, now: Instant) -> bool {
        match self.paused_at.take() {
            Some(paused_at) => self.started += now.saturating_duration_since(paused_at),
            None => self.paused_at = Some(now),
        }
        self.is_paused()
    }

    pub fn seconds(&self, now: Instant) -> f32 {
        let until = self.paused_at.unwrap_or(now);
        until.saturating_duration_since(self.started).as_secs_f32()
    }
}
