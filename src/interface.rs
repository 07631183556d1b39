//! This module provides the transport abstraction between the expander and an I2C bus. It is a
//! shim between `embedded-hal` implementations and the chip's single-byte protocol.

use crate::config::BusSpeed;

/// A transport for the PCF8574 implements this trait, which provides the three primitive
/// operations the chip protocol needs: claiming the device, and single-byte reads and writes.
pub trait Transport {
    /// A claim on one device on the bus, returned by `open` and released by `close`.
    type Handle;
    /// The type of error that opening the device or a bus transaction may return.
    type Error;

    /// Claim the device at `address` on bus `bus_id`, clocked at `speed`.
    fn open(&mut self, bus_id: u8, address: u8, speed: BusSpeed)
        -> Result<Self::Handle, Self::Error>;
    /// Issue a single-byte write to the device behind `handle`.
    fn write_byte(&mut self, handle: &mut Self::Handle, byte: u8) -> Result<(), Self::Error>;
    /// Issue a single-byte read from the device behind `handle`.
    fn read_byte(&mut self, handle: &mut Self::Handle) -> Result<u8, Self::Error>;
    /// Release a handle previously returned by `open`.
    fn close(&mut self, handle: Self::Handle);
}

// This is here (and has to be pub) for doctests only. It's useless otherwise.
#[doc(hidden)]
pub mod noop {
    use super::Transport;
    use crate::config::BusSpeed;
    pub struct NoopTransport;
    impl Transport for NoopTransport {
        type Handle = ();
        type Error = core::convert::Infallible;
        fn open(&mut self, _bus_id: u8, _address: u8, _speed: BusSpeed) -> Result<(), Self::Error> {
            Ok(())
        }
        fn write_byte(&mut self, _handle: &mut (), _byte: u8) -> Result<(), Self::Error> {
            Ok(())
        }
        fn read_byte(&mut self, _handle: &mut ()) -> Result<u8, Self::Error> {
            Ok(0u8)
        }
        fn close(&mut self, _handle: ()) {}
    }
}

pub mod i2c {
    //! The I2C transport drives a PCF8574 through any blocking `embedded-hal` I2C master.

    use super::Transport;
    use crate::config::BusSpeed;

    /// The union of all errors that may occur on the I2C transport.
    #[derive(Debug, PartialEq, Eq)]
    pub enum HalTransportError<WE, RE> {
        /// The bus id or address does not match this transport, or the bus is already claimed by
        /// an open handle.
        Unavailable,
        /// An error occurred during an I2C write.
        Write(WE),
        /// An error occurred during an I2C read.
        Read(RE),
    }

    impl<WE, RE> HalTransportError<WE, RE> {
        fn from_write(e: WE) -> Self {
            Self::Write(e)
        }
        fn from_read(e: RE) -> Self {
            Self::Read(e)
        }
    }

    /// A `Transport` for a PCF8574 on one `embedded-hal` I2C bus.
    ///
    /// The bus peripheral moves into the handle while the device is open, so at most one handle
    /// exists at a time and the peripheral comes back to the transport on `close`.
    pub struct HalTransport<I2C> {
        /// The I2C master, or `None` while it is held by an open handle.
        i2c: Option<I2C>,
        /// The bus id this transport answers to.
        bus_id: u8,
    }

    /// An open claim on a PCF8574 at `address`.
    pub struct HalHandle<I2C> {
        i2c: I2C,
        address: u8,
    }

    impl<I2C> HalHandle<I2C> {
        /// The 7-bit device address this handle talks to.
        pub fn address(&self) -> u8 {
            self.address
        }
    }

    impl<I2C> HalTransport<I2C>
    where
        I2C: hal::blocking::i2c::Write + hal::blocking::i2c::Read,
    {
        /// Create a new transport over the I2C master `i2c`, which is wired as bus `bus_id`.
        pub fn new(i2c: I2C, bus_id: u8) -> Self {
            Self {
                i2c: Some(i2c),
                bus_id,
            }
        }

        /// Recover the I2C master. Returns `None` if it is still held by an open handle.
        pub fn free(self) -> Option<I2C> {
            self.i2c
        }
    }

    impl<I2C> Transport for HalTransport<I2C>
    where
        I2C: hal::blocking::i2c::Write + hal::blocking::i2c::Read,
    {
        type Handle = HalHandle<I2C>;
        type Error = HalTransportError<
            <I2C as hal::blocking::i2c::Write>::Error,
            <I2C as hal::blocking::i2c::Read>::Error,
        >;

        fn open(
            &mut self,
            bus_id: u8,
            address: u8,
            speed: BusSpeed,
        ) -> Result<Self::Handle, Self::Error> {
            if bus_id != self.bus_id || address > 0x7F {
                return Err(HalTransportError::Unavailable);
            }
            // The clock rate is fixed when the HAL peripheral is built.
            log::debug!(
                "open I2C bus {} address 0x{:02X} at {:?} ({} Hz)",
                bus_id,
                address,
                speed,
                speed.hertz()
            );
            let i2c = self.i2c.take().ok_or(HalTransportError::Unavailable)?;
            Ok(HalHandle { i2c, address })
        }

        fn write_byte(&mut self, handle: &mut Self::Handle, byte: u8) -> Result<(), Self::Error> {
            hal::blocking::i2c::Write::write(&mut handle.i2c, handle.address, &[byte])
                .map_err(Self::Error::from_write)
        }

        fn read_byte(&mut self, handle: &mut Self::Handle) -> Result<u8, Self::Error> {
            let mut buf = [0u8];
            hal::blocking::i2c::Read::read(&mut handle.i2c, handle.address, &mut buf)
                .map_err(Self::Error::from_read)?;
            Ok(buf[0])
        }

        fn close(&mut self, handle: Self::Handle) {
            self.i2c = Some(handle.i2c);
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use embedded_hal_mock::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

        const NO_TRANSACTIONS: [I2cTransaction; 0] = [];

        #[test]
        fn single_byte_transfers() {
            let expectations = [
                I2cTransaction::write(0x21, vec![0b10111101]),
                I2cTransaction::read(0x21, vec![0b00000010]),
            ];
            let mut bus = I2cMock::new(&expectations);
            let mut transport = HalTransport::new(bus.clone(), 2);

            let mut handle = transport.open(2, 0x21, BusSpeed::Standard).unwrap();
            assert_eq!(handle.address(), 0x21);
            assert!(transport.write_byte(&mut handle, 0b10111101).is_ok());
            assert_eq!(transport.read_byte(&mut handle).ok(), Some(0b00000010));
            transport.close(handle);

            bus.done();
        }

        #[test]
        fn open_wrong_bus() {
            let mut bus = I2cMock::new(&NO_TRANSACTIONS);
            let mut transport = HalTransport::new(bus.clone(), 2);
            assert!(matches!(
                transport.open(1, 0x21, BusSpeed::Standard),
                Err(HalTransportError::Unavailable)
            ));
            bus.done();
        }

        #[test]
        fn open_address_out_of_range() {
            let mut bus = I2cMock::new(&NO_TRANSACTIONS);
            let mut transport = HalTransport::new(bus.clone(), 0);
            assert!(matches!(
                transport.open(0, 0x80, BusSpeed::Fast),
                Err(HalTransportError::Unavailable)
            ));
            bus.done();
        }

        #[test]
        fn open_while_claimed() {
            let mut bus = I2cMock::new(&NO_TRANSACTIONS);
            let mut transport = HalTransport::new(bus.clone(), 0);
            let handle = transport.open(0, 0x20, BusSpeed::Standard).unwrap();
            assert!(matches!(
                transport.open(0, 0x20, BusSpeed::Standard),
                Err(HalTransportError::Unavailable)
            ));
            transport.close(handle);
            assert!(transport.open(0, 0x20, BusSpeed::Standard).is_ok());
            bus.done();
        }

        #[test]
        fn free_returns_bus_only_when_closed() {
            let mut bus = I2cMock::new(&NO_TRANSACTIONS);
            let mut transport = HalTransport::new(bus.clone(), 0);
            let _handle = transport.open(0, 0x20, BusSpeed::Standard).unwrap();
            assert!(transport.free().is_none());
            bus.done();
        }
    }
}
