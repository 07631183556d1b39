//! Mutex-guarded I/O adapter.

use core::marker::PhantomData;

use crate::clock::Clock;
use crate::error::{Error, InvalidPin};
use crate::expander::pin::{ExpanderIO, ExpanderPin};
use crate::expander::PinExpander;
use crate::interface::Transport;
use crate::mutex::IOMutex;
use crate::pins::{Pin, PinValue};

/// This I/O adapter captures the `PinExpander` and provides a factory for generating GPIO pins
/// that implement `InputPin` and `OutputPin` traits. Each such pin will immediately issue a bus
/// transaction to get or set the value every time any pin is accessed, holding the mutex for the
/// duration of the transaction.
pub struct SharedExpander<M, T, C>(M, PhantomData<(T, C)>)
where
    M: IOMutex<PinExpander<T, C>>,
    T: Transport,
    C: Clock;

impl<M, T, C> SharedExpander<M, T, C>
where
    M: IOMutex<PinExpander<T, C>>,
    T: Transport,
    C: Clock,
{
    pub(crate) fn new(expander: PinExpander<T, C>) -> Self {
        SharedExpander(M::new(expander), PhantomData)
    }

    /// Create an `ExpanderPin` corresponding to one of the pins on the PCF8574. Using any of the
    /// `InputPin` and `OutputPin` methods on the returned `ExpanderPin` will trigger a bus
    /// transaction to immediately read or write the pin.
    pub fn pin<'io>(&'io self, pin: u8) -> Result<ExpanderPin<'io, Self>, InvalidPin> {
        Ok(ExpanderPin::new(self, Pin::new(pin)?))
    }

    /// Lock the expander and run `f` against it, for operations the pin traits do not cover.
    pub fn lock<R, F: FnOnce(&mut PinExpander<T, C>) -> R>(&self, f: F) -> R {
        self.0.lock(f)
    }
}

impl<M, T, C> ExpanderIO for SharedExpander<M, T, C>
where
    M: IOMutex<PinExpander<T, C>>,
    T: Transport,
    C: Clock,
{
    type Error = Error<T::Error>;

    fn write_pin(&self, pin: Pin, value: PinValue) -> Result<(), Self::Error> {
        self.0.lock(|ex| ex.write(pin.index(), value))
    }
    fn read_pin(&self, pin: Pin) -> Result<PinValue, Self::Error> {
        self.0.lock(|ex| ex.read(pin.index()))
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::NoClock;
    use crate::config::PinMode;
    use crate::error::{Error, InvalidPin};
    use crate::expander::PinExpander;
    use crate::interface::test_spy::TestSpyTransport;
    use crate::mutex::DefaultMutex;
    use hal::digital::v2::{InputPin, OutputPin};

    fn shared(
        ei: &TestSpyTransport,
    ) -> super::SharedExpander<
        DefaultMutex<PinExpander<TestSpyTransport, NoClock>>,
        TestSpyTransport,
        NoClock,
    > {
        let mut ex = PinExpander::new(ei.split(), 0x21, 2);
        ex.configure()
            .pins(1..=3, PinMode::Input)
            .pins(6..=7, PinMode::Output)
            .commit()
            .unwrap();
        ex.into_shared::<DefaultMutex<_>>()
    }

    #[test]
    fn single_pin_write() {
        let ei = TestSpyTransport::new();
        let io = shared(&ei);
        let mut red_led = io.pin(7).unwrap();

        assert!(red_led.set_high().is_ok());
        assert_eq!(ei.writes(), vec![0b00110001, 0b10000000]);
    }

    #[test]
    fn single_pin_read() {
        let mut ei = TestSpyTransport::new();
        let io = shared(&ei);
        let button = io.pin(2).unwrap();

        ei.set_lines(0b00000000);
        assert_eq!(button.is_high(), Ok(false));

        ei.set_lines(0b00000100);
        assert_eq!(button.is_high(), Ok(true));
        assert_eq!(button.is_low(), Ok(false));
    }

    #[test]
    fn multi_pin_read_write() {
        let mut ei = TestSpyTransport::new();
        let io = shared(&ei);
        let mut yellow_led = io.pin(6).unwrap();
        let mut red_led = io.pin(7).unwrap();
        let button = io.pin(1).unwrap();

        ei.set_lines(0b00000010);
        assert!(yellow_led.set_high().is_ok());
        assert!(red_led.set_high().is_ok());
        assert!(yellow_led.set_low().is_ok());
        assert_eq!(button.is_low(), Ok(false));
        assert_eq!(ei.writes()[1..], [0b01000000, 0b11000000, 0b10000000]);
        assert_eq!(io.lock(|ex| ex.output_buffer()), 0b10000000);
    }

    #[test]
    fn pin_out_of_range() {
        let ei = TestSpyTransport::new();
        let io = shared(&ei);
        assert!(matches!(io.pin(8), Err(InvalidPin(8))));
    }

    #[test]
    fn pins_after_dispose() {
        let ei = TestSpyTransport::new();
        let io = shared(&ei);
        let mut red_led = io.pin(7).unwrap();
        io.lock(|ex| ex.dispose());
        assert_eq!(red_led.set_low(), Err(Error::NotActivated));
        assert_eq!(ei.open_handles(), 0);
    }
}
