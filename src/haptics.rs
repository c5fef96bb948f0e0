//! Haptic feedback data carriers.
//!
//! Pure data types for haptic pulses received from the remote device.
//! Decoding and transport live with the connection layer; this module
//! only names the shape of the result.

use serde::{Deserialize, Serialize};

/// One haptic pulse addressed to a hand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HapticPulse {
    /// Target: left-hand controller when true, right otherwise.
    pub left_hand: bool,
    /// Vibration amplitude, 0.0 to 1.0.
    pub amplitude: f32,
    /// Vibration frequency in Hz.
    pub frequency: f32,
    /// Pulse duration in seconds.
    pub duration_secs: f32,
}

/// Decode result for one inbound haptic frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HapticFrame {
    /// Whether the frame decoded cleanly.
    pub status: bool,
    pub pulse: HapticPulse,
}

impl HapticFrame {
    /// The pulse, if the frame decoded cleanly.
    pub fn pulse(&self) -> Option<&HapticPulse> {
        self.status.then_some(&self.pulse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_gates_pulse_on_status() {
        let pulse = HapticPulse {
            left_hand: true,
            amplitude: 0.8,
            frequency: 160.0,
            duration_secs: 0.05,
        };

        let good = HapticFrame { status: true, pulse };
        assert_eq!(good.pulse(), Some(&pulse));

        let bad = HapticFrame { status: false, pulse };
        assert_eq!(bad.pulse(), None);
    }
}
