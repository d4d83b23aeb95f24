//! # idleline
//!
//! A portable, no_std Rust message framer for UART receivers that have no
//! length field, no checksum and no flow control: messages open with a
//! doubled sentinel byte and end when the line goes idle.
//!
//! The framer is split across two execution contexts:
//! - a polled receive loop ([`framer::Framer`]) that screens bytes for the
//!   start sequence and copies the payload into a bounded buffer
//! - an idle-line interrupt ([`timer::IdleTimer`]) that counts idle frames
//!   and flags the message as complete
//!
//! The two share nothing but single-word atomics, written by one side and
//! read by the other.
//!
//! ## Crate features
//! | Feature              | Description |
//! |----------------------|-------------|
//! | `std`                | Disables `#![no_std]` support |
//! | `idle-isr` (default) | Global `critical_section` singletons and macros for the interrupt handler |
//! | `delay-loop`         | Software idle detection with `embedded_hal::delay::DelayNs` |
//! | `defmt-0-3`          | Uses `defmt` logging |
//! | `log`                | Uses `log` logging |
//!
//! ## Protocol
//!
//! - **Start**: `0xF0 0xF0`, strictly consecutive; any other byte in between
//!   restarts the search
//! - **Payload**: every byte after the start, up to 64 bytes by default
//! - **End**: two idle frames (≈2 ms at 9600 baud); the sender must leave at
//!   least that much silence between messages
//!
//! ## Usage
//!
//! ```rust,ignore
//! idleline::init_idle_timer!(Usart1Idle);
//!
//! #[interrupt]
//! fn USART1() {
//!     idleline::idle_interrupt!();
//! }
//!
//! let mut framer = idleline::framer::Framer::new(rx, &IDLE_TIMER);
//! let mut buf: idleline::buffer::MessageBuffer = idleline::buffer::MessageBuffer::new();
//! let len = framer.receive(&mut buf)?;
//! ```
//!
//! Or, without an idle interrupt, use `receive_polled()` with a `DelayNs`
//! implementation:
//!
//! ```rust,ignore
//! idleline::timer::receive_polled(&mut framer, &mut buf, &mut delay, 1042)?;
//! ```
//!
//! ## Integration Notes
//!
//! - Configure the peripheral for 8N1 with noise and overrun detection off;
//!   line errors are never reported by this crate
//! - Only one framer per line; the interrupt handler and the framer must
//!   share the same `IdleTimer`

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

pub use critical_section;

pub use heapless;

pub(crate) mod fmt;

pub mod buffer;
pub mod consts;
pub mod detector;
pub mod error;
pub mod framer;
pub mod line;
pub mod timer;

#[cfg(test)]
pub(crate) mod test_utils;
