/// Declares the static `IDLE_TIMER` and `IDLE_ACK` singletons.
///
/// `IDLE_TIMER` is shared by the framer and the interrupt handler;
/// `IDLE_ACK` holds the handle the interrupt handler uses to clear the
/// peripheral's idle flag, protected by a `critical_section` mutex.
///
/// # Arguments
/// - `$ack`: The concrete acknowledgment handle type (must implement `IdleAck`)
/// - `$threshold` (optional): idle events per message, defaults to `IDLE_THRESHOLD`
///
/// # Example
/// ```rust,ignore
/// init_idle_timer!(Usart1Idle);
/// ```
#[macro_export]
macro_rules! init_idle_timer {
    ( $ack:ty ) => {
        pub static IDLE_TIMER: $crate::timer::IdleTimer = $crate::timer::IdleTimer::new();
        pub static IDLE_ACK: $crate::critical_section::Mutex<core::cell::RefCell<Option<$ack>>> =
            $crate::critical_section::Mutex::new(core::cell::RefCell::new(None));
    };
    ( $ack:ty, $threshold:expr ) => {
        pub static IDLE_TIMER: $crate::timer::IdleTimer =
            $crate::timer::IdleTimer::with_threshold($threshold);
        pub static IDLE_ACK: $crate::critical_section::Mutex<core::cell::RefCell<Option<$ack>>> =
            $crate::critical_section::Mutex::new(core::cell::RefCell::new(None));
    };
}

/// Stores the acknowledgment handle in the global `IDLE_ACK`.
///
/// # Arguments
/// - `$ack`: The handle variable (must implement `IdleAck`)
///
/// # Example
/// ```rust,ignore
/// main() {
///     setup_idle_timer!(usart1_idle);
/// }
/// ```
///
/// # Notes
/// - Requires `init_idle_timer!` to have been used earlier.
#[macro_export]
macro_rules! setup_idle_timer {
    ( $ack:expr ) => {
        $crate::timer::global_idle_ack_setup(&IDLE_ACK, $ack)
    };
}

/// Runs one idle-line event through the global `IDLE_TIMER`.
///
/// Intended as the whole body of the peripheral's interrupt handler.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn USART1() {
///     idle_interrupt!();
/// }
/// ```
///
/// # Notes
/// - Assumes `IDLE_TIMER` and `IDLE_ACK` were declared with `init_idle_timer!`.
/// - Safe to call before setup: it does nothing until a handle is stored.
#[macro_export]
macro_rules! idle_interrupt {
    () => {
        $crate::timer::global_idle_interrupt(&IDLE_TIMER, &IDLE_ACK)
    };
}

#[cfg(test)]
mod tests {
    use crate::test_utils::CountingAck;

    crate::init_idle_timer!(CountingAck, 3);

    #[test]
    fn test_macros_drive_global_timer() {
        crate::setup_idle_timer!(CountingAck::default());
        IDLE_TIMER.arm();
        crate::idle_interrupt!();
        crate::idle_interrupt!();
        assert!(!IDLE_TIMER.is_completed());
        crate::idle_interrupt!();
        assert!(IDLE_TIMER.is_completed());
        let acks = critical_section::with(|cs| {
            IDLE_ACK
                .borrow(cs)
                .borrow()
                .as_ref()
                .map_or(0, |a| a.acks)
        });
        assert_eq!(acks, 3);
    }
}
