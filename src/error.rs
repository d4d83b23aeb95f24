//! Faults a framing session can report.
//!
//! Line-level conditions (noise, framing, overrun, parity) are deliberately
//! absent: the peripheral is configured to ignore them so that reception
//! never stalls on them. The only fault the framer introduces is running out
//! of buffer space.

/// Errors returned by [`Framer`](crate::framer::Framer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum FrameError {
    /// The payload exceeded the buffer; the message was dropped.
    #[error("message overflowed the {capacity}-byte buffer")]
    Overflow {
        /// Capacity of the buffer that overflowed.
        capacity: usize,
    },
    /// The payload exceeded the buffer; the first `len` bytes were kept.
    #[error("message truncated to {len} bytes")]
    Truncated {
        /// Number of bytes kept in the buffer.
        len: usize,
    },
    /// The framer was polled without an active session.
    #[error("no framing session in progress")]
    Inactive,
}
