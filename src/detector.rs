//! Start-of-message detection.
//!
//! A message opens with the start sentinel twice in a row. The detector keeps
//! one bit of history (whether the previous byte was a sentinel) and looks at
//! each byte exactly once.
//!
//! Any non-sentinel byte clears that history, so `F0 41 F0 F0` starts a
//! message on the fourth byte, never on the third.

use crate::consts::START_SENTINEL;

/// Recognizes two consecutive sentinel bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartDetector {
    sentinel: u8,
    seen_once: bool,
}

impl Default for StartDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl StartDetector {
    /// Creates a detector for [`START_SENTINEL`].
    pub const fn new() -> Self {
        Self::with_sentinel(START_SENTINEL)
    }

    /// Creates a detector for a custom sentinel byte.
    pub const fn with_sentinel(sentinel: u8) -> Self {
        Self {
            sentinel,
            seen_once: false,
        }
    }

    /// The sentinel this detector matches.
    pub const fn sentinel(&self) -> u8 {
        self.sentinel
    }

    /// Whether the last byte fed was an unpaired sentinel.
    pub const fn seen_once(&self) -> bool {
        self.seen_once
    }

    /// Feeds one byte; returns `true` when it completes the start sequence.
    ///
    /// The history is cleared on completion, so a third sentinel would be the
    /// first half of a new pair.
    pub fn feed(&mut self, byte: u8) -> bool {
        if byte != self.sentinel {
            self.seen_once = false;
            return false;
        }
        if self.seen_once {
            self.seen_once = false;
            true
        } else {
            self.seen_once = true;
            false
        }
    }

    /// Forgets any half-seen sequence.
    pub fn reset(&mut self) {
        self.seen_once = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_index(stream: &[u8]) -> Option<usize> {
        let mut detector = StartDetector::new();
        stream.iter().position(|&b| detector.feed(b))
    }

    #[test]
    fn test_two_sentinels_start() {
        assert_eq!(start_index(&[0xF0, 0xF0]), Some(1));
    }

    #[test]
    fn test_single_sentinel_does_not_start() {
        assert_eq!(start_index(&[0xF0]), None);
        assert_eq!(start_index(&[0x00, 0xF0, 0x01]), None);
    }

    #[test]
    fn test_interrupted_pair_restarts() {
        assert_eq!(start_index(&[0xF0, 0x41, 0xF0, 0xF0, 0x58]), Some(3));
        assert_eq!(start_index(&[0xF0, 0x41, 0xF0, 0x42, 0xF0]), None);
    }

    #[test]
    fn test_flag_tracks_last_byte() {
        let mut detector = StartDetector::new();
        assert!(!detector.feed(0xF0));
        assert!(detector.seen_once());
        assert!(!detector.feed(0x00));
        assert!(!detector.seen_once());
        assert!(!detector.feed(0xF0));
        assert!(detector.feed(0xF0));
        assert!(!detector.seen_once());
    }

    #[test]
    fn test_third_sentinel_begins_new_pair() {
        let mut detector = StartDetector::new();
        assert!(!detector.feed(0xF0));
        assert!(detector.feed(0xF0));
        assert!(!detector.feed(0xF0));
        assert!(detector.seen_once());
    }

    #[test]
    fn test_custom_sentinel() {
        let mut detector = StartDetector::with_sentinel(0x7E);
        assert_eq!(detector.sentinel(), 0x7E);
        assert!(!detector.feed(0xF0));
        assert!(!detector.feed(0x7E));
        assert!(detector.feed(0x7E));
    }

    #[test]
    fn test_reset_clears_half_sequence() {
        let mut detector = StartDetector::new();
        assert!(!detector.feed(0xF0));
        detector.reset();
        assert!(!detector.feed(0xF0));
        assert_eq!(detector, {
            let mut d = StartDetector::new();
            let _ = d.feed(0xF0);
            d
        });
    }

    #[test]
    fn test_noise_before_start() {
        let stream = [0xFF, 0x00, 0xF0, 0x0F, 0xF0, 0xF0, 0x01];
        assert_eq!(start_index(&stream), Some(5));
    }
}
