//! Errors returned by the driver.

use core::fmt;

/// A pin index outside `0..=7` was supplied.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct InvalidPin(pub u8);

impl fmt::Display for InvalidPin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid pin number {} (PCF8574 has pins 0-7)", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidPin {}

/// The union of errors a [`PinExpander`](crate::PinExpander) operation may produce. `E` is the
/// error type of the underlying [`Transport`](crate::Transport).
#[derive(Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// A pin index outside `0..=7` was supplied. No bus transaction was performed.
    InvalidPin(u8),
    /// Activation was attempted before any pin was declared as an input or output.
    NoPinsConfigured,
    /// A pin read or write was attempted before the device was activated.
    NotActivated,
    /// The expander was disposed and can no longer be activated.
    Disposed,
    /// The transport failed to open the device or to complete a bus transaction.
    Transport(E),
}

impl<E> From<InvalidPin> for Error<E> {
    fn from(e: InvalidPin) -> Self {
        Error::InvalidPin(e.0)
    }
}

impl<E> Error<E> {
    pub(crate) fn from_transport(e: E) -> Self {
        Error::Transport(e)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidPin(pin) => fmt::Display::fmt(&InvalidPin(*pin), f),
            Error::NoPinsConfigured => f.write_str("no pins are set for read and/or write"),
            Error::NotActivated => f.write_str("expander has not been activated"),
            Error::Disposed => f.write_str("expander has been disposed"),
            Error::Transport(e) => write!(f, "transport error: {:?}", e),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}
