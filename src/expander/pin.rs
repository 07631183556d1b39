//! APIs for interacting with I/O pins on the PCF8574 through an `embedded-hal` API.

#[cfg(feature = "unproven")]
use hal::digital::v2::InputPin;
use hal::digital::v2::OutputPin;

use crate::pins::{Pin, PinValue};

/// An indirection between I/O pin abstractions and the expander itself, so that pins can share
/// one expander through whatever arbitration the adapter provides.
pub trait ExpanderIO {
    /// The type of error that pin reads and writes may return.
    type Error;

    /// Set the latch bit of `pin` to `value` and send the latch byte to the device.
    fn write_pin(&self, pin: Pin, value: PinValue) -> Result<(), Self::Error>;

    /// Read the level of `pin`. Pins not declared as inputs read `Low`.
    fn read_pin(&self, pin: Pin) -> Result<PinValue, Self::Error>;
}

/// A single I/O pin on the PCF8574. These implement the `embedded-hal` traits for GPIO pins, so
/// they can be used to transparently connect devices driven over GPIOs through the PCF8574
/// instead, using their `embedded-hal`-compatible drivers without modification.
pub struct ExpanderPin<'io, IO: ExpanderIO> {
    io: &'io IO,
    pin: Pin,
}

impl<'io, IO: ExpanderIO> ExpanderPin<'io, IO> {
    pub(crate) fn new(io: &'io IO, pin: Pin) -> Self {
        Self { io, pin }
    }

    pub fn pin(&self) -> Pin {
        self.pin
    }
}

impl<'io, IO: ExpanderIO> OutputPin for ExpanderPin<'io, IO> {
    type Error = IO::Error;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.io.write_pin(self.pin, PinValue::High)
    }
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.io.write_pin(self.pin, PinValue::Low)
    }
}

#[cfg(feature = "unproven")]
impl<'io, IO: ExpanderIO> InputPin for ExpanderPin<'io, IO> {
    type Error = IO::Error;

    fn is_high(&self) -> Result<bool, Self::Error> {
        self.io.read_pin(self.pin).map(PinValue::is_high)
    }
    fn is_low(&self) -> Result<bool, Self::Error> {
        self.io.read_pin(self.pin).map(PinValue::is_low)
    }
}
