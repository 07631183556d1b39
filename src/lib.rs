//! Driver library for the NXP PCF8574 and PCF8574A I2C I/O expanders.
//!
//! The PCF8574 provides 8 quasi-bidirectional GPIO lines behind a single I2C register. Writing a
//! byte sets the output latch of all 8 lines at once; reading a byte samples all 8 lines. There is
//! no direction register: a line whose latch is high is only weakly pulled up, so an external
//! signal can pull it low and the line can be read as an input.
//!
//! This driver is intended to work on embedded platforms using any implementation of the
//! `embedded-hal` trait library. It tracks which pins the application declares as inputs and
//! outputs, turns that into the byte the chip needs at start-up, and keeps a copy of the output
//! latch so single pins can be written with the byte-wide protocol.
//!
//! # Construction
//!
//! To set up the driver:
//!
//! - Use your platform's `embedded-hal` implementation to obtain the I2C master where your
//!   PCF8574 is connected.
//! - Construct a [`Transport`], the [`HalTransport`] for any blocking `embedded-hal` I2C bus,
//!   which will take ownership of the bus.
//! - Construct a [`PinExpander`] for the chip's address, which will take ownership of the
//!   `Transport`. Nothing is sent on the bus yet.
//!
//! ```ignore
//! let i2c = /* construct something implementing embedded_hal::blocking::i2c::{Write,Read} */
//!
//! let transport = pcf8574::HalTransport::new(i2c, 2);
//! let address = pcf8574::address(pcf8574::Variant::Pcf8574, true, false, false);
//! let mut expander = pcf8574::PinExpander::new(transport, address, 2);
//! ```
//!
//! # Pin directions and activation
//!
//! *See [`PinExpander::set_pin_mode`] and [`PinExpander::activate`].*
//!
//! Declare each pin you use, then activate the device. Activation opens the transport and sends
//! the complement of every declared pin: undeclared pins are driven low, declared pins are
//! released high so inputs can be sensed.
//!
//! ```
//! # fn main() -> Result<(), pcf8574::Error<core::convert::Infallible>> {
//! # let transport = pcf8574::interface::noop::NoopTransport;
//! # let mut expander = pcf8574::PinExpander::<_, pcf8574::NoClock>::new(transport, 0x21, 2);
//! expander.set_pin_mode(1, pcf8574::PinMode::Input)?;
//! expander.set_pin_mode(7, pcf8574::PinMode::Output)?;
//! expander.activate()?;
//! # Ok(())
//! # }
//! ```
//!
//! The same can be done with the builder returned by [`PinExpander::configure`]:
//!
//! ```
//! # fn main() -> Result<(), pcf8574::Error<core::convert::Infallible>> {
//! # let transport = pcf8574::interface::noop::NoopTransport;
//! # let mut expander = pcf8574::PinExpander::<_, pcf8574::NoClock>::new(transport, 0x21, 2);
//! expander
//!     .configure()
//!     .pins(1..=3, pcf8574::PinMode::Input)
//!     .pin(7, pcf8574::PinMode::Output)
//!     .commit()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Raw mode
//!
//! With an activated device, you may use it in raw mode, reading and writing pins directly. Each
//! call is exactly one bus transaction:
//!
//! ```
//! # fn main() -> Result<(), pcf8574::Error<core::convert::Infallible>> {
//! # let transport = pcf8574::interface::noop::NoopTransport;
//! # let mut expander = pcf8574::PinExpander::<_, pcf8574::NoClock>::new(transport, 0x21, 2);
//! # expander.configure().pins(1..=3, pcf8574::PinMode::Input).pin(7, pcf8574::PinMode::Output).commit()?;
//! expander.write(7, pcf8574::PinValue::High)?;
//! let button = expander.read(1)?;
//! let all: [pcf8574::PinValue; 8] = expander.read_all()?;
//! let inputs: u8 = expander.read_all_as_byte()?;
//! # Ok(())
//! # }
//! ```
//!
//! Reads are masked by the declared inputs: a pin not declared as an input always reads `Low`.
//! Writes always send the whole latch byte, including the high level that keeps input pins
//! readable, so avoid writing to pins you declared as inputs.
//!
//! # HAL mode
//!
//! *See [`PinExpander::into_shared`] and [`SharedExpander`].*
//!
//! To compose the driver with other `embedded-hal` drivers that are compatible with
//! `embedded_hal::digital::v2::{InputPin,OutputPin}`, you can move the `PinExpander` into a shared
//! I/O adapter that will produce `ExpanderPin` instances for each pin. Every trait call on an
//! `ExpanderPin` immediately performs a bus transaction.
//!
//! ```
//! # struct MyIndicator<P>(core::marker::PhantomData<P>);
//! # impl<P> MyIndicator<P> where P: embedded_hal::digital::v2::OutputPin {
//! #   fn new(led: P) -> Self { Self(core::marker::PhantomData) }
//! #   fn blink(&mut self) {}
//! # }
//! # fn main() -> Result<(), pcf8574::Error<core::convert::Infallible>> {
//! # let transport = pcf8574::interface::noop::NoopTransport;
//! # let mut expander = pcf8574::PinExpander::<_, pcf8574::NoClock>::new(transport, 0x21, 2);
//! expander.configure().pin(7, pcf8574::PinMode::Output).commit()?;
//! let io = expander.into_shared::<pcf8574::DefaultMutex<_>>();
//!
//! let red_led = io.pin(7)?;
//! let mut indicator = MyIndicator::new(red_led);
//! indicator.blink();
//! # Ok(())
//! # }
//! ```
//!
//! ## Mutual exclusion
//!
//! The `PinExpander` takes no locks of its own; everything goes through `&mut self`. The shared
//! adapter is parameterized over a type implementing the `IOMutex` trait.
//!
//! In a `std` environment you may enable the `std` Cargo feature, and `mutex::DefaultMutex<T>`
//! will be a type alias to `std::sync::Mutex<T>` with a provided impl of `IOMutex`. Similarly, for
//! Cortex-M environments using the `cortex-m` crate, enabling the `cortexm` Cargo feature will
//! alias `mutex::DefaultMutex<T>` to `cortex_m::interrupt::Mutex<core::cell::RefCell<T>>` with a
//! provided `IOMutex` impl.
//!
//! # Logging
//!
//! The driver reports mask changes and the bytes it writes through the `log` facade at `debug`
//! level, reads at `trace` level, and ignored pin modes at `warn` level.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate embedded_hal as hal;

pub mod clock;
pub mod config;
pub mod error;
pub mod expander;
pub mod interface;
pub mod mutex;
pub mod pins;

pub use clock::{Clock, DefaultClock, NoClock};
pub use config::{address, BusSpeed, Configurator, PinMode, Variant};
pub use error::{Error, InvalidPin};
pub use expander::pin::{ExpanderIO, ExpanderPin};
pub use expander::shared::SharedExpander;
pub use expander::{PinExpander, State};
pub use interface::i2c::{HalTransport, HalTransportError};
pub use interface::Transport;
#[cfg(any(feature = "std", feature = "cortexm"))]
pub use mutex::DefaultMutex;
pub use mutex::IOMutex;
pub use pins::{Pin, PinValue, NUM_PINS};
#[cfg(feature = "std")]
pub use clock::StdClock;
