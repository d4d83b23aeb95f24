//! Logging shims.
//!
//! Forwards to `defmt` or `log` depending on which feature is enabled and
//! compiles to nothing otherwise, so the hot path stays free of formatting
//! on bare targets.

#![allow(unused_macros)]

macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt-0-3")]
        ::defmt::trace!($($arg)*);
        #[cfg(all(feature = "log", not(feature = "defmt-0-3")))]
        ::log::trace!($($arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
        {
            let _ = ($($arg)*,);
        }
    }};
}

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt-0-3")]
        ::defmt::debug!($($arg)*);
        #[cfg(all(feature = "log", not(feature = "defmt-0-3")))]
        ::log::debug!($($arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
        {
            let _ = ($($arg)*,);
        }
    }};
}

macro_rules! warning {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt-0-3")]
        ::defmt::warn!($($arg)*);
        #[cfg(all(feature = "log", not(feature = "defmt-0-3")))]
        ::log::warn!($($arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
        {
            let _ = ($($arg)*,);
        }
    }};
}

pub(crate) use {debug, trace, warning};

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_expand_in_every_build() {
        let count = 2u8;
        trace!("idle event {}", count);
        debug!("framer: awaiting start");
        warning!("framer: overflow at {} bytes", 64usize);
    }
}
