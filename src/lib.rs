//! adb2usb - Apple Desktop Bus keyboards and mice as HID devices.
//!
//! Polls an ADB keyboard and mouse, turns their register samples into
//! boot-protocol HID reports and hands them to a host transport (USB or
//! BLE). Lock keys are handled locally: Caps/Num/Scroll Lock state is
//! kept here, mirrored onto the keyboard LEDs, and Caps Lock is replayed
//! to the host as a synthetic keystroke.
//!
//! The crate is split along the same seams the hardware has:
//!
//! - [`adb`]: the bus collaborator ([`adb::AdbBus`]) and register decoding
//! - [`keymap`]: ADB scan code to HID usage table
//! - [`translate`]: keyboard register to [`hid::keyboard::KeyboardReport`]
//! - [`lock`]: lock-key state machine
//! - [`hid`]: report types and the host transport seam ([`hid::HidTransport`])
//! - [`bridge`]: the dispatch loop tying them together
//!
//! Everything except the `usb` and `ble` transports is plain logic and
//! runs on the host: `cargo test`. Enable the `embedded` feature to build
//! the transports for an nRF52840 target.

#![cfg_attr(not(test), no_std)]

// Must come first so the log macros are visible to every other module.
#[macro_use]
mod fmt;

pub mod adb;
pub mod bridge;
pub mod config;
pub mod error;
pub mod hid;
pub mod keymap;
pub mod lock;
pub mod translate;

#[cfg(feature = "embedded")]
pub mod ble;
#[cfg(feature = "embedded")]
pub mod usb;

pub use bridge::{Bridge, Devices};
pub use config::{BridgeConfig, CapsLockMode};
pub use error::{BusError, Error};
