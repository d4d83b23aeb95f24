//! Scripted UART line used by the unit tests.

use std::collections::VecDeque;

use crate::line::{ByteSource, IdleAck, IdleInterrupt};
use crate::timer::IdleTimer;

/// One thing that happens on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineEvent {
    /// A byte lands in the data register.
    Byte(u8),
    /// The line stays high for one full frame.
    Idle,
}

/// Builds a script from raw bytes followed by `idles` idle frames.
pub(crate) fn script(bytes: &[u8], idles: usize) -> Vec<LineEvent> {
    let mut events: Vec<LineEvent> = bytes.iter().map(|&b| LineEvent::Byte(b)).collect();
    events.extend(core::iter::repeat_n(LineEvent::Idle, idles));
    events
}

/// Replays a fixed script of bytes and idle frames.
///
/// Idle frames are delivered to the [`IdleTimer`] the way the hardware would:
/// only while the interrupt is unmasked, and only when the line is enabled.
/// Masked idle frames are counted in `missed_idle` and otherwise lost.
#[derive(Debug)]
pub(crate) struct ScriptedLine<'t> {
    timer: &'t IdleTimer,
    events: VecDeque<LineEvent>,
    pub enabled: bool,
    pub irq_unmasked: bool,
    pub enable_count: usize,
    pub disable_count: usize,
    pub ack_count: usize,
    pub missed_idle: usize,
}

impl<'t> ScriptedLine<'t> {
    pub(crate) fn new(timer: &'t IdleTimer, events: &[LineEvent]) -> Self {
        Self {
            timer,
            events: events.iter().copied().collect(),
            enabled: false,
            irq_unmasked: false,
            enable_count: 0,
            disable_count: 0,
            ack_count: 0,
            missed_idle: 0,
        }
    }

    /// Appends more traffic after the current script.
    pub(crate) fn push(&mut self, events: &[LineEvent]) {
        self.events.extend(events.iter().copied());
    }

    pub(crate) fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl ByteSource for ScriptedLine<'_> {
    fn byte_ready(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        match self.events.front() {
            Some(LineEvent::Byte(_)) => true,
            Some(LineEvent::Idle) => {
                let _ = self.events.pop_front();
                if self.irq_unmasked {
                    let timer = self.timer;
                    timer.on_idle_detected(self);
                } else {
                    self.missed_idle += 1;
                }
                false
            }
            None => false,
        }
    }

    fn read_byte(&mut self) -> u8 {
        match self.events.pop_front() {
            Some(LineEvent::Byte(b)) => b,
            other => panic!("read_byte with no pending byte: {other:?}"),
        }
    }

    fn enable(&mut self) {
        self.enabled = true;
        self.enable_count += 1;
    }

    fn disable(&mut self) {
        self.enabled = false;
        self.disable_count += 1;
    }
}

impl IdleAck for ScriptedLine<'_> {
    fn clear_idle(&mut self) {
        self.ack_count += 1;
    }
}

impl IdleInterrupt for ScriptedLine<'_> {
    fn unmask_idle(&mut self) {
        self.irq_unmasked = true;
    }

    fn mask_idle(&mut self) {
        self.irq_unmasked = false;
    }
}

/// Bare acknowledgment handle, like the one an interrupt handler owns.
#[derive(Debug, Default)]
pub(crate) struct CountingAck {
    pub acks: usize,
}

impl IdleAck for CountingAck {
    fn clear_idle(&mut self) {
        self.acks += 1;
    }
}
