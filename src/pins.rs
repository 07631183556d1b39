//! Pin addressing on the PCF8574.

use crate::error::InvalidPin;

/// The number of quasi-bidirectional I/O lines on the chip.
pub const NUM_PINS: usize = 8;

/// A validated pin index within the PCF8574. These are created with [`Pin::new`]. It is a newtype
/// around `u8` that prevents out-of-range indices from reaching the bit arithmetic that builds the
/// bytes sent to the device.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Pin(u8);

impl Pin {
    /// Validate `pin` as an index in the range `0..=7`.
    pub fn new(pin: u8) -> Result<Self, InvalidPin> {
        match pin {
            0..=7 => Ok(Pin(pin)),
            _ => Err(InvalidPin(pin)),
        }
    }

    /// The pin's index on the device.
    pub fn index(self) -> u8 {
        self.0
    }

    /// The byte with only this pin's bit set.
    pub fn bit(self) -> u8 {
        1 << self.0
    }

    /// Iterate over all eight pins in ascending order.
    pub fn all() -> impl Iterator<Item = Pin> {
        (0..NUM_PINS as u8).map(Pin)
    }
}

impl From<Pin> for u8 {
    fn from(pin: Pin) -> u8 {
        pin.0
    }
}

/// The logic level of one line.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PinValue {
    Low,
    High,
}

impl PinValue {
    /// The level of `pin` within `byte`.
    pub fn of_bit(byte: u8, pin: Pin) -> Self {
        PinValue::from(byte & pin.bit() != 0)
    }

    pub fn is_high(self) -> bool {
        self == PinValue::High
    }

    pub fn is_low(self) -> bool {
        self == PinValue::Low
    }
}

impl From<bool> for PinValue {
    fn from(bit: bool) -> Self {
        if bit {
            PinValue::High
        } else {
            PinValue::Low
        }
    }
}

impl From<PinValue> for bool {
    fn from(value: PinValue) -> bool {
        value.is_high()
    }
}

impl core::ops::Not for PinValue {
    type Output = PinValue;

    fn not(self) -> PinValue {
        match self {
            PinValue::Low => PinValue::High,
            PinValue::High => PinValue::Low,
        }
    }
}

/// Expand a byte into per-pin levels, pin 0 first.
pub(crate) fn expand(byte: u8) -> [PinValue; NUM_PINS] {
    let mut values = [PinValue::Low; NUM_PINS];
    for (pin, value) in Pin::all().zip(values.iter_mut()) {
        *value = PinValue::of_bit(byte, pin);
    }
    values
}
