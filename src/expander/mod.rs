//! The port expander device API. This provides the `PinExpander` type which is a direct
//! abstraction of one PCF8574. It tracks the driver's view of the pin directions and the output
//! latch, and sequences the single-byte bus transactions the chip understands.

use crate::clock::{Clock, DefaultClock};
use crate::config::{BusSpeed, Configurator, DirectionMasks, PinMode};
use crate::error::Error;
use crate::expander::shared::SharedExpander;
use crate::interface::Transport;
use crate::mutex::IOMutex;
use crate::pins::{self, Pin, PinValue, NUM_PINS};

pub mod pin;
pub mod shared;

/// Where an expander is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// No pin has been declared yet.
    Constructed,
    /// At least one pin is declared, but the device has not been activated.
    Configured,
    /// The transport is open and the direction byte has been sent.
    Activated,
    /// The transport has been released for good.
    Disposed,
}

/// The port expander device itself.
///
/// The PCF8574 has no direction register. Pins declared as inputs are made readable by driving
/// their latch high at activation, after which the chip's weak pull-up lets an external signal
/// pull them low. Every write sends the whole 8-bit latch, so writing to a pin declared as an
/// input will clobber that high level.
pub struct PinExpander<T: Transport, C: Clock = DefaultClock> {
    transport: T,
    handle: Option<T::Handle>,
    address: u8,
    bus_id: u8,
    speed: BusSpeed,
    masks: DirectionMasks,
    output: u8,
    clock: C,
    last_activity: Option<u64>,
    disposed: bool,
}

impl<T: Transport, C: Clock + Default> PinExpander<T, C> {
    /// Create a new `PinExpander` for the chip at `address` on bus `bus_id`.
    ///
    /// Takes ownership of the `Transport` which it should use to communicate with the PCF8574.
    /// Nothing is sent on the bus until [`activate`](Self::activate).
    pub fn new(transport: T, address: u8, bus_id: u8) -> Self {
        Self::with_clock(transport, address, bus_id, C::default())
    }
}

impl<T: Transport, C: Clock> PinExpander<T, C> {
    /// Create a new `PinExpander` that stamps bus activity using `clock`.
    pub fn with_clock(transport: T, address: u8, bus_id: u8, clock: C) -> Self {
        Self {
            transport,
            handle: None,
            address,
            bus_id,
            speed: BusSpeed::default(),
            masks: DirectionMasks::default(),
            output: 0,
            clock,
            last_activity: None,
            disposed: false,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn bus_id(&self) -> u8 {
        self.bus_id
    }

    /// Pins declared as outputs.
    pub fn write_mask(&self) -> u8 {
        self.masks.write_mask()
    }

    /// Pins declared as inputs.
    pub fn read_mask(&self) -> u8 {
        self.masks.read_mask()
    }

    /// The last byte written to the device's latch.
    pub fn output_buffer(&self) -> u8 {
        self.output
    }

    /// Clock reading at the last activation or read, if there has been one.
    pub fn last_activity(&self) -> Option<u64> {
        self.last_activity
    }

    pub fn speed(&self) -> BusSpeed {
        self.speed
    }

    /// Set the I2C clock rate requested on the next activation.
    pub fn set_speed(&mut self, speed: BusSpeed) {
        self.speed = speed;
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    pub fn state(&self) -> State {
        if self.disposed {
            State::Disposed
        } else if self.handle.is_some() {
            State::Activated
        } else if self.masks.used() != 0 {
            State::Configured
        } else {
            State::Constructed
        }
    }

    pub(crate) fn masks(&self) -> DirectionMasks {
        self.masks
    }

    pub(crate) fn set_masks(&mut self, masks: DirectionMasks) {
        self.masks = masks;
    }

    /// Begin (re)configuring the pins by returning a [`Configurator`].
    ///
    /// The `Configurator` is a builder-like interface that sets several pin modes in one go and
    /// activates the device on commit.
    pub fn configure<'e>(&'e mut self) -> Configurator<'e, T, C> {
        Configurator::new(self)
    }

    /// Convert this expander into a shared I/O adapter.
    ///
    /// The adapter puts the expander behind the mutex `M` and can be used to generate individual
    /// `ExpanderPin`s that allow `embedded-hal`-compatible access to the pins.
    ///
    /// See [`SharedExpander`] for detail.
    pub fn into_shared<M: IOMutex<Self>>(self) -> SharedExpander<M, T, C> {
        SharedExpander::new(self)
    }

    /// Declare `pin` as an output or an input.
    ///
    /// Modes the PCF8574 cannot provide are ignored with a warning. A change made after
    /// activation is not sent to the device until the next `activate`.
    pub fn set_pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<(), Error<T::Error>> {
        let pin = Pin::new(pin)?;
        log::debug!(
            "set pin {} as {:?}: before write mode 0x{:02X} read mode 0x{:02X}",
            pin.index(),
            mode,
            self.masks.write_mask(),
            self.masks.read_mask()
        );
        if !self.masks.set_pin(pin, mode) {
            log::warn!("mode {:?} not supported by PCF8574", mode);
        }
        log::debug!(
            "after write mode 0x{:02X} read mode 0x{:02X}",
            self.masks.write_mask(),
            self.masks.read_mask()
        );
        Ok(())
    }

    /// Open the transport and send the direction byte, the complement of every declared pin.
    ///
    /// Calling this again closes the current handle and repeats the sequence, which is how
    /// direction changes made after activation reach the device.
    pub fn activate(&mut self) -> Result<(), Error<T::Error>> {
        if self.disposed {
            return Err(Error::Disposed);
        }
        if self.masks.used() == 0 {
            log::debug!("no pins are set");
            return Err(Error::NoPinsConfigured);
        }
        self.close();

        let mut handle = self
            .transport
            .open(self.bus_id, self.address, self.speed)
            .map_err(Error::from_transport)?;
        let mode_byte = self.masks.activation_byte();
        log::debug!("set write mode 0x{:02X}", mode_byte);
        if let Err(e) = self.transport.write_byte(&mut handle, mode_byte) {
            self.transport.close(handle);
            return Err(Error::Transport(e));
        }
        self.handle = Some(handle);
        self.touch();
        Ok(())
    }

    /// Set the latch bit of `pin` to `value` and send the whole latch byte.
    ///
    /// The direction masks are not consulted. If the bus write fails the buffered byte is left as
    /// it was.
    pub fn write(&mut self, pin: u8, value: PinValue) -> Result<(), Error<T::Error>> {
        let pin = Pin::new(pin)?;
        let handle = self.handle.as_mut().ok_or(Error::NotActivated)?;
        let output = match value {
            PinValue::High => self.output | pin.bit(),
            PinValue::Low => self.output & !pin.bit(),
        };
        log::debug!(
            "write {:?} to pin {}: data 0x{:02X} (bit 0x{:02X})",
            value,
            pin.index(),
            output,
            pin.bit()
        );
        self.transport
            .write_byte(handle, output)
            .map_err(Error::from_transport)?;
        self.output = output;
        Ok(())
    }

    /// Invert the buffered latch bit of `pin` and send the whole latch byte.
    pub fn toggle(&mut self, pin: u8) -> Result<(), Error<T::Error>> {
        let current = PinValue::of_bit(self.output, Pin::new(pin)?);
        self.write(pin, !current)
    }

    /// Read the level of `pin`. Pins not declared as inputs always read `Low`.
    pub fn read(&mut self, pin: u8) -> Result<PinValue, Error<T::Error>> {
        let pin = Pin::new(pin)?;
        let data = self.read_masked()?;
        let value = PinValue::of_bit(data, pin);
        log::trace!("pin {} = {:?}", pin.index(), value);
        Ok(value)
    }

    /// Read every pin in a single bus transaction, pin 0 first. Pins not declared as inputs read
    /// `Low`.
    pub fn read_all(&mut self) -> Result<[PinValue; NUM_PINS], Error<T::Error>> {
        self.read_masked().map(pins::expand)
    }

    /// Read every pin in a single bus transaction, as a byte with bit `n` holding pin `n`. Bits of
    /// pins not declared as inputs are zero.
    pub fn read_all_as_byte(&mut self) -> Result<u8, Error<T::Error>> {
        self.read_masked()
    }

    /// Release the transport. The expander cannot be activated again afterwards. Calling this
    /// more than once has no further effect; it also runs when the expander is dropped.
    pub fn dispose(&mut self) {
        if !self.disposed {
            self.close();
            self.disposed = true;
        }
    }

    fn read_masked(&mut self) -> Result<u8, Error<T::Error>> {
        let handle = self.handle.as_mut().ok_or(Error::NotActivated)?;
        let data = self
            .transport
            .read_byte(handle)
            .map_err(Error::from_transport)?;
        self.touch();
        log::trace!("input data 0x{:02X}", data);
        Ok(data & self.masks.read_mask())
    }

    fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.transport.close(handle);
        }
    }

    fn touch(&mut self) {
        self.last_activity = Some(self.clock.now_millis());
    }
}

impl<T: Transport, C: Clock> Drop for PinExpander<T, C> {
    fn drop(&mut self) {
        self.dispose();
    }
}
