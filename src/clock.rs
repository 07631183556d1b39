//! Monotonic time sources for stamping bus activity.

/// A monotonic millisecond clock. The expander records `now_millis()` whenever it activates the
/// device or reads from it; nothing in the driver depends on the value.
///
/// Any `Fn() -> u64` closure is a `Clock`, which makes it easy to plug in a platform timer.
pub trait Clock {
    fn now_millis(&self) -> u64;
}

impl<F: Fn() -> u64> Clock for F {
    fn now_millis(&self) -> u64 {
        self()
    }
}

/// A clock that is always at zero, for targets without a time source.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoClock;

impl Clock for NoClock {
    fn now_millis(&self) -> u64 {
        0
    }
}

/// Milliseconds elapsed since the clock was created, backed by `std::time::Instant`.
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug)]
pub struct StdClock(std::time::Instant);

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        StdClock(std::time::Instant::now())
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_millis(&self) -> u64 {
        self.0.elapsed().as_millis() as u64
    }
}

#[cfg(feature = "std")]
pub type DefaultClock = StdClock;

#[cfg(not(feature = "std"))]
pub type DefaultClock = NoClock;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_clock() {
        let clock = || 42u64;
        assert_eq!(clock.now_millis(), 42);
    }

    #[cfg(feature = "std")]
    #[test]
    fn std_clock_monotonic() {
        let clock = StdClock::default();
        let first = clock.now_millis();
        assert!(clock.now_millis() >= first);
    }
}
