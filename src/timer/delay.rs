use crate::buffer::MessageBuffer;
use crate::error::FrameError;
use crate::framer::{Framer, Phase};
use crate::line::{ByteSource, IdleInterrupt};
use embedded_hal::delay::DelayNs;

/// Receives one message, detecting the idle line in software.
///
/// For peripherals without an idle-line interrupt. Whenever a message is in
/// progress and no byte is pending, the loop waits one frame time; if the
/// line is still quiet afterwards that counts as one idle event, exactly as if
/// the interrupt handler had fired.
///
/// # Arguments
/// - `framer`: The framer owning the line
/// - `buf`: Where the payload is captured
/// - `delay`: A delay provider implementing `DelayNs`, typically from the HAL
/// - `frame_us`: Length of one idle frame, see [`frame_time_us`](crate::timer::frame_time_us)
///
/// # Example
/// ```rust,ignore
/// use idleline::timer::{const_frame_time_us, receive_polled};
/// let len = receive_polled(&mut framer, &mut buf, &mut delay, const_frame_time_us(9_600))?;
/// ```
///
/// # Notes
/// - Waiting is only done inside a message. While awaiting the start
///   sequence the loop spins on the line, as the interrupt-driven path does.
/// - The line holds one byte; a byte that lands during the wait is read on
///   the next iteration, a second one would be lost. Keep `frame_us` at one
///   frame or less.
pub fn receive_polled<L, D, const N: usize>(
    framer: &mut Framer<'_, L>,
    buf: &mut MessageBuffer<N>,
    delay: &mut D,
    frame_us: u32,
) -> Result<usize, FrameError>
where
    L: ByteSource + IdleInterrupt,
    D: DelayNs,
{
    framer.start(buf);
    loop {
        match framer.poll(buf) {
            Ok(len) => return Ok(len),
            Err(nb::Error::Other(err)) => return Err(err),
            Err(nb::Error::WouldBlock) => {
                if framer.phase() != Phase::InMessage || framer.timer().is_completed() {
                    continue;
                }
                delay.delay_us(frame_us);
                if !framer.line_mut().byte_ready() {
                    framer.signal_idle();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ScriptedLine, script};
    use crate::timer::IdleTimer;
    use embedded_hal_mock::eh1::delay::NoopDelay;

    #[test]
    fn test_software_idle_completes_message() {
        let timer = IdleTimer::new();
        let line = ScriptedLine::new(&timer, &script(&[0x00, 0xF0, 0xF0, 0x31, 0x32], 0));
        let mut framer = Framer::new(line, &timer);
        let mut buf: MessageBuffer = MessageBuffer::new();
        let mut delay = NoopDelay::new();

        assert_eq!(receive_polled(&mut framer, &mut buf, &mut delay, 1042), Ok(2));
        assert_eq!(buf.as_slice(), &[0x31, 0x32]);
        assert_eq!(framer.phase(), Phase::Idle);
    }

    #[test]
    fn test_software_idle_reports_overflow() {
        let timer = IdleTimer::new();
        let line = ScriptedLine::new(&timer, &script(&[0xF0, 0xF0, 1, 2, 3, 4, 5], 0));
        let mut framer = Framer::new(line, &timer);
        let mut buf = MessageBuffer::<4>::new();
        let mut delay = NoopDelay::new();

        assert_eq!(
            receive_polled(&mut framer, &mut buf, &mut delay, 174),
            Err(FrameError::Overflow { capacity: 4 })
        );
        assert!(buf.is_empty());
    }
}
