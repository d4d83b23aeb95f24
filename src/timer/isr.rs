use crate::line::IdleAck;
use crate::timer::IdleTimer;
use core::cell::RefCell;
use critical_section::Mutex;

/// Used to initialize the global static acknowledgment handle for use with
/// `critical_section`.
///
/// # Returns
/// * An empty mutable ref-cell
///
/// # Example
/// ```rust,ignore
/// use core::cell::RefCell;
/// use critical_section::Mutex;
/// use idleline::timer::{global_idle_ack_init, IdleTimer};
/// use some_hal::Usart1Idle;
///
/// static IDLE_TIMER: IdleTimer = IdleTimer::new();
/// static IDLE_ACK: Mutex<RefCell<Option<Usart1Idle>>> = global_idle_ack_init::<Usart1Idle>();
/// ```
pub const fn global_idle_ack_init<A: IdleAck>() -> Mutex<RefCell<Option<A>>> {
    Mutex::new(RefCell::new(None))
}

/// Hands the interrupt handler its acknowledgment handle.
///
/// # Arguments
/// * The global static acknowledgment slot
/// * The handle that clears the peripheral's idle flag
///
///# Example
/// ```rust,ignore
/// main() {
///     global_idle_ack_setup(&IDLE_ACK, usart1_idle);
/// }
/// ```
pub fn global_idle_ack_setup<A: IdleAck>(global_ack: &'static Mutex<RefCell<Option<A>>>, ack: A) {
    critical_section::with(|cs| {
        let _ = global_ack.borrow(cs).replace(Some(ack));
    });
}

/// Handles one idle-line interrupt.
///
/// # Arguments
/// * The global static `IdleTimer`
/// * The global static acknowledgment slot
///
/// Does nothing if the handle has not been set up yet.
///
///# Example
/// ```rust,ignore
/// #[interrupt]
/// fn USART1() {
///     global_idle_interrupt(&IDLE_TIMER, &IDLE_ACK);
/// }
/// ```
pub fn global_idle_interrupt<A: IdleAck>(
    timer: &IdleTimer,
    global_ack: &'static Mutex<RefCell<Option<A>>>,
) {
    critical_section::with(|cs| {
        if let Some(ack) = global_ack.borrow(cs).borrow_mut().as_mut() {
            timer.on_idle_detected(ack);
        }
    });
}
