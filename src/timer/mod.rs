//! Idle-line timer and frame timing helpers.
//!
//! The [`IdleTimer`] is the state shared between the polling loop and the
//! idle-line interrupt handler. The handler is the only writer of the event
//! count and the completion flag while the timer is armed; the polling loop
//! only reads them, and only rewrites them while the interrupt is masked.
//! Each field is a single atomic word accessed with plain loads and stores,
//! which keeps the timer usable on cores without atomic read-modify-write
//! (e.g. Cortex-M0+).
//!
//! Contains helpers for wiring the timer into a firmware image:
//! - `frame_time_us` / `const_frame_time_us`: duration of one idle frame
//! - `idle_window_us`: quiet time the sender must leave between messages
//! - `global_idle_interrupt` and `idle_interrupt!()`: interrupt handler body
//! (feature `idle-isr`)
//! - `receive_polled`: software idle detection over a `DelayNs` (feature
//! `delay-loop`)
//!
//! Idle frame durations at 8N1:
//!
//! | BAUD    | IDLE FRAME | 2-FRAME WINDOW |
//! |---------|------------|----------------|
//! |   9 600 |    1042 µs |        2084 µs |
//! |  57 600 |     174 µs |         348 µs |
//! | 115 200 |      87 µs |         174 µs |

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use libm::ceilf;

use crate::consts::{FRAME_BITS, IDLE_THRESHOLD, MICROS_PER_SECOND};
use crate::fmt::trace;
use crate::line::IdleAck;

#[cfg(feature = "delay-loop")]
mod delay;
#[cfg_attr(feature = "delay-loop", allow(unused_imports))]
#[cfg(feature = "delay-loop")]
pub use delay::*;

#[cfg(feature = "idle-isr")]
mod isr;
#[cfg_attr(feature = "idle-isr", allow(unused_imports))]
#[cfg(feature = "idle-isr")]
pub use isr::*;

#[cfg(feature = "idle-isr")]
mod macros;

/// Counts idle-line events and raises completion once the threshold is hit.
#[derive(Debug)]
pub struct IdleTimer {
    threshold: u8,
    /// Idle events seen since the last arm or completion.
    idle_event_count: AtomicU8,
    /// Set by the interrupt once `threshold` events have been seen.
    completed: AtomicBool,
    /// Events are only counted while armed.
    armed: AtomicBool,
}

impl Default for IdleTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl IdleTimer {
    /// Creates a disarmed timer with the default [`IDLE_THRESHOLD`].
    pub const fn new() -> Self {
        Self::with_threshold(IDLE_THRESHOLD)
    }

    /// Creates a disarmed timer that completes after `threshold` idle events.
    ///
    /// A threshold of 0 behaves like 1.
    pub const fn with_threshold(threshold: u8) -> Self {
        Self {
            threshold,
            idle_event_count: AtomicU8::new(0),
            completed: AtomicBool::new(false),
            armed: AtomicBool::new(false),
        }
    }

    /// Number of idle events that complete a message.
    pub const fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Starts counting from zero. Call with the idle interrupt masked.
    pub fn arm(&self) {
        self.idle_event_count.store(0, Ordering::Relaxed);
        self.completed.store(false, Ordering::Relaxed);
        self.armed.store(true, Ordering::Release);
    }

    /// Stops counting. Later idle events are acknowledged and dropped.
    pub fn disarm(&self) {
        self.armed.store(false, Ordering::Release);
    }

    /// Disarms and returns every field to its initial value.
    pub fn reset(&self) {
        self.disarm();
        self.idle_event_count.store(0, Ordering::Relaxed);
        self.completed.store(false, Ordering::Release);
    }

    /// Interrupt handler body for one idle-line event.
    ///
    /// The hardware flag is cleared unconditionally, armed or not, otherwise
    /// the interrupt never fires again. The count is not reset by received
    /// bytes: only completion, [`arm`](Self::arm) and [`reset`](Self::reset)
    /// clear it.
    pub fn on_idle_detected<A: IdleAck + ?Sized>(&self, ack: &mut A) {
        ack.clear_idle();
        if !self.armed.load(Ordering::Acquire) {
            return;
        }
        let count = self.idle_event_count.load(Ordering::Relaxed).saturating_add(1);
        if count >= self.threshold {
            self.idle_event_count.store(0, Ordering::Relaxed);
            self.completed.store(true, Ordering::Release);
        } else {
            self.idle_event_count.store(count, Ordering::Relaxed);
        }
        trace!("idle event {}", count);
    }

    /// `true` once the threshold has been reached since the last arm.
    pub fn is_completed(&self) -> bool {
        self.completed.load(Ordering::Acquire)
    }

    /// Idle events counted toward the current threshold.
    pub fn idle_event_count(&self) -> u8 {
        self.idle_event_count.load(Ordering::Relaxed)
    }

    /// Whether idle events are currently being counted.
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }
}

/// Duration of one idle frame in microseconds, rounded up.
///
/// # Arguments
/// - `baud`: line rate in bits per second
///
/// # Panics
/// If `baud` is zero.
pub fn frame_time_us(baud: u32) -> u32 {
    assert!(baud != 0, "baud rate must be non-zero");
    ceilf((FRAME_BITS * MICROS_PER_SECOND) as f32 / baud as f32) as u32
}

/// Compile-time duration of one idle frame in microseconds, rounded up.
///
/// # Panics
/// If `baud` is zero (a compile error when evaluated in a `const`).
pub const fn const_frame_time_us(baud: u32) -> u32 {
    assert!(baud != 0, "baud rate must be non-zero");
    (FRAME_BITS * MICROS_PER_SECOND).div_ceil(baud)
}

/// Minimum quiet time, in microseconds, that ends a message.
///
/// The sender must leave at least this much silence between messages or two
/// messages will be framed as one.
///
/// # Panics
/// If `baud` is zero.
pub const fn idle_window_us(baud: u32, threshold: u8) -> u32 {
    const_frame_time_us(baud) * threshold as u32
}
