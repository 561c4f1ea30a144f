//! Rotor audio feedback
//!
//! The controllers only compute a pitch; whatever owns the sound source
//! implements [`FeedbackSink`] and decides what to do with it.

use crate::consts::PITCH_SPEED_DIVISOR;

/// Receives per-tick feedback from a controller
pub trait FeedbackSink {
    /// Rotor pitch multiplier (1.0 at rest)
    fn rotor_pitch(&mut self, pitch: f32);
}

/// Feedback discarded
impl FeedbackSink for () {
    fn rotor_pitch(&mut self, _pitch: f32) {}
}

/// Pitch multiplier for a body moving at `speed`
#[inline]
pub fn rotor_pitch(speed: f32) -> f32 {
    1.0 + speed.max(0.0) / PITCH_SPEED_DIVISOR
}

/// Rotor sound state for one drone; keeps the last pitch it was sent
#[derive(Debug, Clone)]
pub struct RotorAudio {
    pitch: f32,
}

impl Default for RotorAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl RotorAudio {
    pub fn new() -> Self {
        Self { pitch: 1.0 }
    }

    /// Last pitch received
    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

impl FeedbackSink for RotorAudio {
    fn rotor_pitch(&mut self, pitch: f32) {
        self.pitch = pitch;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_from_speed() {
        assert_eq!(rotor_pitch(0.0), 1.0);
        assert_eq!(rotor_pitch(50.0), 1.5);
        assert_eq!(rotor_pitch(-10.0), 1.0);
    }

    #[test]
    fn test_rotor_audio_keeps_latest_pitch() {
        let mut audio = RotorAudio::new();
        assert_eq!(audio.pitch(), 1.0);
        audio.rotor_pitch(1.3);
        assert_eq!(audio.pitch(), 1.3);
        audio.rotor_pitch(rotor_pitch(50.0));
        assert_eq!(audio.pitch(), 1.5);
    }
}
