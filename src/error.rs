//! Unified error types for adb2usb.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! None of these ever stop the dispatch loop: bus errors skip a cycle,
//! LED write errors are logged and left for the next toggle to repair.

/// Failures reported by the bus collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// The device did not answer within the bus timeout. This is the
    /// normal outcome of polling a device with nothing to report.
    Timeout,
    /// Two devices (or a device and the host) drove the line at once.
    Collision,
    /// The response was malformed (wrong length, bad stop bit).
    Framing,
    /// No device answers at the requested address.
    NoDevice,
}

/// Top-level error type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Reading a keyboard or mouse register failed.
    BusRead(BusError),
    /// Mirroring the lock state onto the keyboard LEDs failed.
    LedWrite(BusError),
    /// Device detection failed.
    Detect(BusError),
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Error::BusRead(e)
    }
}

impl BusError {
    /// Timeouts are routine on an idle bus and only worth tracing.
    pub const fn is_timeout(&self) -> bool {
        matches!(self, BusError::Timeout)
    }
}
