//! Caller-owned message storage and the bounded assembler that fills it.
//!
//! [`MessageBuffer`] is a fixed-capacity, byte-addressed store. Its length is
//! the write cursor: [`append`](MessageBuffer::append) checks the cursor
//! against the capacity before every write and refuses to go past it.

use heapless::Vec;

use crate::consts::MESSAGE_CAPACITY;
use crate::error::FrameError;

/// What a session does once the payload no longer fits.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum OverflowPolicy {
    /// Abort the session immediately and drop the partial message.
    ///
    /// The fault is raised with the cursor at `N`; the session then moves the
    /// cursor back to the origin, so the buffer is empty when the error returns.
    #[default]
    Discard,
    /// Keep the first `N` bytes, ignore the rest until the line goes idle,
    /// then report [`FrameError::Truncated`].
    Truncate,
}

/// Fixed-capacity receive buffer for one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageBuffer<const N: usize = MESSAGE_CAPACITY> {
    bytes: Vec<u8, N>,
}

impl<const N: usize> MessageBuffer<N> {
    /// Creates an empty buffer.
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Appends one payload byte at the cursor.
    ///
    /// # Returns
    /// - `Ok(len)`: the cursor after the write
    /// - `Err(FrameError::Overflow)`: the buffer is full; nothing was written
    ///   and the cursor stays at `N`
    pub fn append(&mut self, byte: u8) -> Result<usize, FrameError> {
        self.bytes
            .push(byte)
            .map_err(|_| FrameError::Overflow { capacity: N })?;
        Ok(self.bytes.len())
    }

    /// Moves the cursor back to the origin.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Number of bytes captured so far.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` when nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `true` when the next append would overflow.
    pub fn is_full(&self) -> bool {
        self.bytes.is_full()
    }

    /// Maximum number of bytes the buffer holds.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// The captured payload, from the origin to the cursor.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl<const N: usize> AsRef<[u8]> for MessageBuffer<N> {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_advances_cursor() {
        let mut buf: MessageBuffer = MessageBuffer::new();
        assert_eq!(buf.append(0x41), Ok(1));
        assert_eq!(buf.append(0x42), Ok(2));
        assert_eq!(buf.as_slice(), &[0x41, 0x42]);
        assert_eq!(buf.capacity(), 64);
    }

    #[test]
    fn test_overflow_holds_cursor_at_capacity() {
        let mut buf: MessageBuffer = MessageBuffer::new();
        for i in 0..64u8 {
            assert_eq!(buf.append(i), Ok(i as usize + 1));
        }
        assert!(buf.is_full());
        assert_eq!(buf.append(0xAA), Err(FrameError::Overflow { capacity: 64 }));
        assert_eq!(buf.len(), 64);
        assert_eq!(buf.as_slice()[63], 63);
    }

    #[test]
    fn test_clear_resets_cursor() {
        let mut buf = MessageBuffer::<4>::new();
        let _ = buf.append(1);
        let _ = buf.append(2);
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf, MessageBuffer::<4>::default());
        assert_eq!(buf.append(3), Ok(1));
    }
}
