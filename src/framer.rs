//! Session controller: turns a raw UART byte stream into discrete messages.
//!
//! This module provides the [`Framer`] struct, which sequences one framing
//! session at a time:
//!
//! 1. [`start()`](Framer::start) enables the line and waits for the start
//!    sequence (two consecutive sentinel bytes, see [`StartDetector`]).
//! 2. Once the start is confirmed, the [`IdleTimer`] is armed, the idle-line
//!    interrupt is unmasked, and every following byte is copied into the
//!    caller's [`MessageBuffer`].
//! 3. The interrupt handler counts idle frames; when the threshold is reached
//!    it sets the completion flag, which the next [`poll()`](Framer::poll)
//!    observes. The session is then torn down and the payload length returned.
//!
//! The polling side must not block on anything but the line itself: the data
//! register holds a single byte, so a slow loop loses data.
//!
//! ## Example
//!
//! ```rust,ignore
//! use idleline::buffer::MessageBuffer;
//! use idleline::framer::Framer;
//!
//! idleline::init_idle_timer!(Usart1Idle);
//!
//! #[interrupt]
//! fn USART1() {
//!     idleline::idle_interrupt!();
//! }
//!
//! fn main() -> ! {
//!     let (rx, idle) = hal::usart1_split();
//!     idleline::setup_idle_timer!(idle);
//!     let mut framer = Framer::new(rx, &IDLE_TIMER);
//!     let mut buf: MessageBuffer = MessageBuffer::new();
//!     loop {
//!         if let Ok(len) = framer.receive(&mut buf) {
//!             handle(&buf.as_slice()[..len]);
//!         }
//!     }
//! }
//! ```
//!
//! ## Design Notes
//!
//! The module does **not** validate content: there is no checksum, no length
//! field and no retry. A dropped or overflowed message is simply lost.

use nb::block;

use crate::buffer::{MessageBuffer, OverflowPolicy};
use crate::detector::StartDetector;
use crate::error::FrameError;
use crate::fmt::{debug, trace, warning};
use crate::line::{ByteSource, IdleInterrupt};
use crate::timer::IdleTimer;

/// Where a [`Framer`] is within its current session.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Phase {
    /// No session. The line and the idle interrupt are both off.
    #[default]
    Idle,
    /// The line is on and bytes are screened for the start sequence.
    AwaitingStart,
    /// The start sequence was seen; bytes are captured and idle frames counted.
    InMessage,
    /// The idle threshold was reached; teardown is in progress.
    Complete,
}

/// Snapshot of all per-session state, from both contexts.
///
/// `Session::default()` is the state before the first session and after
/// every teardown.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Session {
    /// Current phase of the session controller.
    pub phase: Phase,
    /// The previous byte was an unpaired start sentinel.
    pub start_marker_seen_once: bool,
    /// Idle events counted toward the threshold.
    pub idle_event_count: u8,
    /// The interrupt handler has flagged the message as complete.
    pub completed: bool,
}

/// Polled receive state machine for one UART line.
///
/// ## Type Parameters
///
/// - `L`: the receive line, providing both the data register
///   ([`ByteSource`]) and the idle interrupt mask ([`IdleInterrupt`])
///
/// The [`IdleTimer`] is borrowed, not owned, because the interrupt handler
/// needs it too; in firmware it is a `static`.
///
/// ## Notes
///
/// - Only one session runs at a time; starting a new one aborts the old one.
/// - A silent line leaves the session in [`Phase::AwaitingStart`] forever.
///   That is a quiet state, not an error; call [`abort()`](Framer::abort) to
///   leave it.
#[derive(Debug)]
pub struct Framer<'t, L>
where
    L: ByteSource + IdleInterrupt,
{
    line: L,
    timer: &'t IdleTimer,
    detector: StartDetector,
    phase: Phase,
    policy: OverflowPolicy,
    /// Overflow seen under [`OverflowPolicy::Truncate`]; excess bytes are dropped.
    truncated: bool,

    /// Counter of messages delivered in full.
    pub rx_good: u16,

    /// Counter of messages lost or cut short by buffer overflow.
    pub rx_bad: u16,
}

impl<'t, L> Framer<'t, L>
where
    L: ByteSource + IdleInterrupt,
{
    /// Creates a framer in [`Phase::Idle`].
    ///
    /// # Arguments
    /// - `line`: the UART receive line
    /// - `timer`: the idle timer shared with the interrupt handler
    ///
    /// # Notes
    /// The idle interrupt is masked and the timer reset, so a handler that
    /// fires before the first session only acknowledges the flag.
    pub fn new(line: L, timer: &'t IdleTimer) -> Self {
        let mut line = line;
        line.mask_idle();
        timer.reset();
        Self {
            line,
            timer,
            detector: StartDetector::new(),
            phase: Phase::Idle,
            policy: OverflowPolicy::default(),
            truncated: false,
            rx_good: 0,
            rx_bad: 0,
        }
    }

    /// Uses `detector` instead of the default [`START_SENTINEL`](crate::consts::START_SENTINEL) detector.
    pub fn with_detector(mut self, detector: StartDetector) -> Self {
        self.detector = detector;
        self.detector.reset();
        self
    }

    /// Sets what happens when a payload does not fit the buffer.
    pub fn with_overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Snapshot of the session state, including the fields owned by the
    /// interrupt handler.
    pub fn session(&self) -> Session {
        Session {
            phase: self.phase,
            start_marker_seen_once: self.detector.seen_once(),
            idle_event_count: self.timer.idle_event_count(),
            completed: self.timer.is_completed(),
        }
    }

    /// The timer shared with the interrupt handler.
    pub fn timer(&self) -> &'t IdleTimer {
        self.timer
    }

    /// Borrows the line.
    pub fn line(&self) -> &L {
        &self.line
    }

    /// Mutably borrows the line.
    pub fn line_mut(&mut self) -> &mut L {
        &mut self.line
    }

    /// Aborts any session and hands the line back.
    pub fn release(mut self) -> L {
        self.abort();
        self.line
    }

    /// Begins a session: `Idle → AwaitingStart`.
    ///
    /// Moves the buffer cursor back to the origin and enables the line. A
    /// session already in progress is aborted first.
    pub fn start<const N: usize>(&mut self, buf: &mut MessageBuffer<N>) {
        if self.phase != Phase::Idle {
            self.abort();
        }
        buf.clear();
        self.detector.reset();
        self.truncated = false;
        self.line.enable();
        self.phase = Phase::AwaitingStart;
        debug!("framer: awaiting start");
    }

    /// Runs one step of the receive loop without blocking.
    ///
    /// # Behavior
    /// - [`Phase::AwaitingStart`]: a pending byte is fed to the start detector;
    ///   completing the start sequence arms the idle timer.
    /// - [`Phase::InMessage`]: if the interrupt has flagged completion the
    ///   session is torn down and the payload length returned; otherwise a
    ///   pending byte is appended to `buf`.
    /// - [`Phase::Idle`]: [`FrameError::Inactive`].
    ///
    /// # Returns
    /// - `Ok(len)`: a complete message occupies `buf.as_slice()[..len]`
    /// - `Err(nb::Error::WouldBlock)`: the session is still running
    /// - `Err(nb::Error::Other(_))`: the session ended in a fault (it is
    ///   already torn down)
    pub fn poll<const N: usize>(
        &mut self,
        buf: &mut MessageBuffer<N>,
    ) -> nb::Result<usize, FrameError> {
        match self.phase {
            Phase::Idle => Err(nb::Error::Other(FrameError::Inactive)),
            Phase::AwaitingStart => {
                let Ok(byte) = self.line.poll_byte() else {
                    return Err(nb::Error::WouldBlock);
                };
                if self.detector.feed(byte) {
                    self.begin_message();
                }
                Err(nb::Error::WouldBlock)
            }
            Phase::InMessage => {
                if self.timer.is_completed() {
                    return self.finish(buf);
                }
                let Ok(byte) = self.line.poll_byte() else {
                    return Err(nb::Error::WouldBlock);
                };
                self.assemble(byte, buf)
            }
            // Teardown runs inside `finish`, so this phase is never observed
            // between polls.
            Phase::Complete => self.finish(buf),
        }
    }

    /// Receives one complete message, blocking until the line goes idle.
    ///
    /// # Returns
    /// - `Ok(len)`: the message occupies `buf.as_slice()[..len]`
    /// - `Err(FrameError::Overflow)` / `Err(FrameError::Truncated)`: see
    ///   [`OverflowPolicy`]
    pub fn receive<const N: usize>(
        &mut self,
        buf: &mut MessageBuffer<N>,
    ) -> Result<usize, FrameError> {
        self.start(buf);
        block!(self.poll(buf))
    }

    /// Ends the current session immediately, from any phase.
    ///
    /// Equivalent to forcing `Complete → Idle`. Captured bytes stay in the
    /// caller's buffer until the next [`start()`](Framer::start).
    pub fn abort(&mut self) {
        if self.phase != Phase::Idle {
            warning!("framer: session aborted in {:?}", self.phase);
            self.teardown();
        }
    }

    /// Feeds one idle-line event to the timer through the owned line.
    ///
    /// For targets that detect idleness in software instead of in an
    /// interrupt handler.
    pub fn signal_idle(&mut self) {
        self.timer.on_idle_detected(&mut self.line);
    }

    /// `AwaitingStart → InMessage`.
    fn begin_message(&mut self) {
        let line = &mut self.line;
        let timer = self.timer;
        critical_section::with(|_| {
            // A stale flag from before the start sequence would count as
            // the first idle frame.
            line.clear_idle();
            timer.arm();
            line.unmask_idle();
        });
        self.phase = Phase::InMessage;
        debug!("framer: start sequence detected");
    }

    /// `InMessage → InMessage`, through the bounded assembler.
    fn assemble<const N: usize>(
        &mut self,
        byte: u8,
        buf: &mut MessageBuffer<N>,
    ) -> nb::Result<usize, FrameError> {
        if self.truncated {
            trace!("framer: dropped {}", byte);
            return Err(nb::Error::WouldBlock);
        }
        match buf.append(byte) {
            Ok(_) => Err(nb::Error::WouldBlock),
            Err(err) => match self.policy {
                OverflowPolicy::Discard => {
                    warning!("framer: overflow at {} bytes, message dropped", N);
                    self.rx_bad = self.rx_bad.saturating_add(1);
                    self.teardown();
                    buf.clear();
                    Err(nb::Error::Other(err))
                }
                OverflowPolicy::Truncate => {
                    warning!("framer: overflow at {} bytes, truncating", N);
                    self.truncated = true;
                    Err(nb::Error::WouldBlock)
                }
            },
        }
    }

    /// `InMessage → Complete → Idle`.
    fn finish<const N: usize>(
        &mut self,
        buf: &MessageBuffer<N>,
    ) -> nb::Result<usize, FrameError> {
        self.phase = Phase::Complete;
        let len = buf.len();
        let truncated = self.truncated;
        self.teardown();
        if truncated {
            self.rx_bad = self.rx_bad.saturating_add(1);
            Err(nb::Error::Other(FrameError::Truncated { len }))
        } else {
            self.rx_good = self.rx_good.saturating_add(1);
            debug!("framer: message complete, {} bytes", len);
            Ok(len)
        }
    }

    /// Returns every piece of session state to its initial value.
    fn teardown(&mut self) {
        let line = &mut self.line;
        let timer = self.timer;
        critical_section::with(|_| {
            line.mask_idle();
            timer.reset();
        });
        self.line.disable();
        self.detector.reset();
        self.truncated = false;
        self.phase = Phase::Idle;
    }
}
