//! Constants shared between the framer and the external transmitter.
//!
//! Every value here is part of the wire contract: the sender must open each
//! message with two consecutive [`START_SENTINEL`] bytes and must leave the
//! line quiet for at least [`IDLE_THRESHOLD`] idle frames between messages.
//! Changing any of them without changing the sender breaks framing.
//!
//! ## Key Concepts
//!
//! - **Start sentinel**: reserved byte; two in a row mark the start of a payload.
//! - **Idle threshold**: number of idle-frame interrupts that end a message.
//! - **Capacity**: size of the caller-owned [`MessageBuffer`](crate::buffer::MessageBuffer).
//! - **Frame bits**: the length of one character on the wire (8N1), which is
//!   also the length of one idle frame.

/// The byte whose double occurrence opens a message.
pub const START_SENTINEL: u8 = 0xF0;

/// Consecutive idle-line events required before a message counts as complete.
///
/// At [`REFERENCE_BAUD`] this is roughly 1 ms per event.
pub const IDLE_THRESHOLD: u8 = 2;

/// Default payload capacity (in bytes) of a [`MessageBuffer`](crate::buffer::MessageBuffer).
pub const MESSAGE_CAPACITY: usize = 64;

/// Bits per character: 1 start bit, 8 data bits, 1 stop bit, no parity.
pub const FRAME_BITS: u32 = 10;

/// Baud rate the idle timing constants were chosen for.
pub const REFERENCE_BAUD: u32 = 9_600;

/// Microseconds per second, for frame timing math.
pub const MICROS_PER_SECOND: u32 = 1_000_000;
