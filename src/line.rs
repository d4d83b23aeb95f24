//! Hardware contracts for the receive side of a UART line.
//!
//! The framer never touches registers. Instead it drives two small traits that a
//! chip HAL (or a test double) implements:
//!
//! - [`ByteSource`]: the receive data register and the peripheral enable bit.
//! - [`IdleInterrupt`]: the idle-line interrupt mask, plus the [`IdleAck`]
//!   flag clear that the interrupt handler also needs.
//!
//! On a typical USART both live in the same peripheral; the interrupt handler
//! holds its own [`IdleAck`] handle to the same block of registers.
//!
//! Line-level noise, framing and overrun conditions are expected to be
//! disabled at the peripheral (one-bit sampling, overrun detection off), so
//! none of these traits report errors.

use core::convert::Infallible;
use nb::block;

/// Receive half of a UART with a one-byte data register.
pub trait ByteSource {
    /// Returns `true` while a received byte is waiting in the data register.
    fn byte_ready(&mut self) -> bool;

    /// Consumes the pending byte. Reading clears the ready status.
    fn read_byte(&mut self) -> u8;

    /// Turns the receiver on.
    fn enable(&mut self);

    /// Turns the receiver off, discarding any pending status.
    fn disable(&mut self);

    /// Non-blocking read: yields the pending byte or [`nb::Error::WouldBlock`].
    fn poll_byte(&mut self) -> nb::Result<u8, Infallible> {
        if self.byte_ready() {
            Ok(self.read_byte())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}

/// Acknowledgment of a pending idle-line condition.
///
/// The hardware keeps re-raising the idle interrupt until this is called, so
/// the handler must call it on every invocation.
pub trait IdleAck {
    /// Clears the idle-detected flag.
    fn clear_idle(&mut self);
}

/// Interrupt-enable control for the idle-line event.
pub trait IdleInterrupt: IdleAck {
    /// Lets the idle-line interrupt reach the handler.
    fn unmask_idle(&mut self);

    /// Blocks the idle-line interrupt.
    fn mask_idle(&mut self);
}

/// Reads a single byte outside of any framing session.
///
/// Enables the receiver, spins until a byte arrives, reads it and disables the
/// receiver again. Disabling clears every pending status flag.
pub fn receive_byte<S: ByteSource>(source: &mut S) -> u8 {
    source.enable();
    let Ok(byte) = block!(source.poll_byte());
    source.disable();
    byte
}
