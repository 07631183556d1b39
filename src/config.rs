//! Abstractions used to configure the PCF8574 and the driver's view of it.

use crate::clock::Clock;
use crate::error::Error;
use crate::expander::PinExpander;
use crate::interface::Transport;
use crate::pins::Pin;

/// A `PinMode` enumerates the electrical modes a caller may ask for on a pin.
///
/// The PCF8574 has quasi-bidirectional lines with a fixed weak pull-up, so only `Output` and
/// `Input` have any meaning to it. Requesting one of the other modes leaves the pin unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinMode {
    /// Drive the line from the output latch.
    Output,
    /// Sense the line; its latch is driven high at activation so the pin can be pulled low
    /// externally.
    Input,
    /// Input with pull-down. Not supported by the PCF8574.
    InputPullDown,
    /// Input with pull-up. Not supported by the PCF8574 as a distinct mode.
    InputPullUp,
}

/// I2C clock rate requested when the transport is opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusSpeed {
    /// 100 kHz standard mode, the PCF8574's rated maximum.
    Standard,
    /// 400 kHz fast mode, supported by some second-source parts.
    Fast,
}

impl BusSpeed {
    pub fn hertz(self) -> u32 {
        match self {
            BusSpeed::Standard => 100_000,
            BusSpeed::Fast => 400_000,
        }
    }
}

impl Default for BusSpeed {
    fn default() -> Self {
        BusSpeed::Standard
    }
}

/// The two chip variants, which differ only in their fixed address bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    Pcf8574,
    Pcf8574A,
}

/// Compute the 7-bit bus address of a chip from its variant and the levels strapped on its `A0`,
/// `A1` and `A2` pins.
pub fn address(variant: Variant, a0: bool, a1: bool, a2: bool) -> u8 {
    let base = match variant {
        Variant::Pcf8574 => 0x20,
        Variant::Pcf8574A => 0x38,
    };
    base | ((a2 as u8) << 2) | ((a1 as u8) << 1) | (a0 as u8)
}

/// The declared direction of each pin. A pin is in at most one of the two masks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirectionMasks {
    write: u8,
    read: u8,
}

impl DirectionMasks {
    /// Pins declared as outputs.
    pub fn write_mask(&self) -> u8 {
        self.write
    }

    /// Pins declared as inputs.
    pub fn read_mask(&self) -> u8 {
        self.read
    }

    /// Pins declared in either direction.
    pub fn used(&self) -> u8 {
        self.write | self.read
    }

    /// The byte sent at activation. Undeclared pins are driven low, and declared pins are
    /// released high so inputs can be sensed.
    pub fn activation_byte(&self) -> u8 {
        !self.used()
    }

    /// Apply `mode` to `pin`. Returns `false` if the mode is not supported and nothing changed.
    pub(crate) fn set_pin(&mut self, pin: Pin, mode: PinMode) -> bool {
        let bit = pin.bit();
        match mode {
            PinMode::Output => {
                self.write |= bit;
                self.read &= !bit;
                true
            }
            PinMode::Input => {
                self.write &= !bit;
                self.read |= bit;
                true
            }
            PinMode::InputPullDown | PinMode::InputPullUp => false,
        }
    }
}

/// A `Configurator` provides methods to build a set of pin direction changes and commit them to
/// the device. You obtain one from `PinExpander::configure()`, chain method calls on it to make
/// configuration changes, and then end the chain with `commit()` to activate the PCF8574.
///
/// ```
/// # use pcf8574::interface::noop::NoopTransport;
/// # use pcf8574::{NoClock, PinExpander, PinMode};
/// let mut expander = PinExpander::<_, NoClock>::new(NoopTransport, 0x21, 2);
/// expander
///     .configure()
///     .pins(1..=3, PinMode::Input)
///     .pin(7, PinMode::Output)
///     .commit()
///     .unwrap();
/// assert_eq!(expander.write_mask(), 0b10000000);
/// assert_eq!(expander.read_mask(), 0b00001110);
/// ```
#[must_use = "Configuration changes are not applied unless committed"]
pub struct Configurator<'e, T: Transport, C: Clock> {
    expander: &'e mut PinExpander<T, C>,
    masks: DirectionMasks,
    speed: Option<BusSpeed>,
    invalid: Option<u8>,
}

impl<'e, T: Transport, C: Clock> Configurator<'e, T, C> {
    pub(crate) fn new(expander: &'e mut PinExpander<T, C>) -> Self {
        let masks = expander.masks();
        Self {
            expander,
            masks,
            speed: None,
            invalid: None,
        }
    }

    fn set_pin(&mut self, pin: u8, mode: PinMode) {
        match Pin::new(pin) {
            Ok(pin) => {
                if !self.masks.set_pin(pin, mode) {
                    log::warn!(
                        "mode {:?} not supported by PCF8574, pin {} unchanged",
                        mode,
                        pin.index()
                    );
                }
            }
            Err(e) => {
                self.invalid.get_or_insert(e.0);
            }
        }
    }

    /// Set the mode of a single pin, in the range `0..=7`.
    pub fn pin(mut self, pin: u8, mode: PinMode) -> Self {
        self.set_pin(pin, mode);
        self
    }

    /// Set the mode of a sequence of pins. All of the pins will be set to mode `mode`.
    pub fn pins<I>(mut self, pins: I, mode: PinMode) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        for pin in pins {
            self.set_pin(pin, mode);
        }
        self
    }

    /// Set the I2C clock rate requested when the device is opened.
    pub fn speed(mut self, speed: BusSpeed) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Store the configuration in the expander and activate the device. If any pin given to the
    /// builder was out of range, fails with `InvalidPin` for the first one and leaves the
    /// expander untouched.
    pub fn commit(self) -> Result<(), Error<T::Error>> {
        if let Some(pin) = self.invalid {
            return Err(Error::InvalidPin(pin));
        }
        self.expander.set_masks(self.masks);
        if let Some(speed) = self.speed {
            self.expander.set_speed(speed);
        }
        self.expander.activate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pin(n: u8) -> Pin {
        Pin::new(n).unwrap()
    }

    #[test]
    fn masks_set_output() {
        let mut masks = DirectionMasks::default();
        assert!(masks.set_pin(pin(6), PinMode::Output));
        assert_eq!(masks.write_mask(), 0b01000000);
        assert_eq!(masks.read_mask(), 0b00000000);
    }

    #[test]
    fn masks_output_then_input() {
        let mut masks = DirectionMasks::default();
        masks.set_pin(pin(3), PinMode::Output);
        masks.set_pin(pin(3), PinMode::Input);
        assert_eq!(masks.write_mask(), 0b00000000);
        assert_eq!(masks.read_mask(), 0b00001000);
    }

    #[test]
    fn masks_unsupported_mode_unchanged() {
        let mut masks = DirectionMasks::default();
        masks.set_pin(pin(2), PinMode::Input);
        assert!(!masks.set_pin(pin(2), PinMode::InputPullDown));
        assert!(!masks.set_pin(pin(2), PinMode::InputPullUp));
        assert_eq!(masks.read_mask(), 0b00000100);
        assert_eq!(masks.write_mask(), 0b00000000);
    }

    #[test]
    fn masks_activation_byte() {
        let mut masks = DirectionMasks::default();
        masks.set_pin(pin(6), PinMode::Output);
        masks.set_pin(pin(1), PinMode::Input);
        assert_eq!(masks.used(), 0b01000010);
        assert_eq!(masks.activation_byte(), 0b10111101);
    }

    #[test]
    fn address_variants() {
        assert_eq!(address(Variant::Pcf8574, false, false, false), 0x20);
        assert_eq!(address(Variant::Pcf8574, true, false, false), 0x21);
        assert_eq!(address(Variant::Pcf8574, true, true, true), 0x27);
        assert_eq!(address(Variant::Pcf8574A, true, false, false), 0x39);
        assert_eq!(address(Variant::Pcf8574A, false, false, true), 0x3C);
    }

    #[test]
    fn bus_speed_default() {
        assert_eq!(BusSpeed::default(), BusSpeed::Standard);
        assert_eq!(BusSpeed::Fast.hertz(), 400_000);
    }

    fn mode() -> impl Strategy<Value = PinMode> {
        prop_oneof![
            Just(PinMode::Output),
            Just(PinMode::Input),
            Just(PinMode::InputPullDown),
            Just(PinMode::InputPullUp),
        ]
    }

    proptest! {
        #[test]
        fn masks_never_overlap(ops in prop::collection::vec((0u8..8, mode()), 0..32)) {
            let mut masks = DirectionMasks::default();
            for (n, m) in ops {
                masks.set_pin(pin(n), m);
                prop_assert_eq!(masks.write_mask() & masks.read_mask(), 0);
            }
        }

        #[test]
        fn last_supported_mode_wins(n in 0u8..8, ops in prop::collection::vec(mode(), 1..8)) {
            let mut masks = DirectionMasks::default();
            for m in ops.iter() {
                masks.set_pin(pin(n), *m);
            }
            let bit = 1u8 << n;
            match ops.iter().rev().find(|m| matches!(m, PinMode::Output | PinMode::Input)) {
                Some(PinMode::Output) => {
                    prop_assert_eq!(masks.write_mask(), bit);
                    prop_assert_eq!(masks.read_mask(), 0);
                }
                Some(_) => {
                    prop_assert_eq!(masks.write_mask(), 0);
                    prop_assert_eq!(masks.read_mask(), bit);
                }
                None => {
                    prop_assert_eq!(masks.used(), 0);
                }
            }
        }
    }
}
