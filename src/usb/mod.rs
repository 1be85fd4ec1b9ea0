//! USB transport - presents a composite HID device to the host.
//!
//! Driven by `embassy-usb` over whatever USB peripheral driver the target
//! provides. Two boot-protocol HID interfaces:
//!
//! - Interface 0: Keyboard (with LED output report)
//! - Interface 1: Mouse
//!
//! LED output reports arrive as SET_REPORT control transfers and are
//! handed to the dispatch loop through [`crate::hid::HOST_LEDS`].

pub mod hid_device;

pub use hid_device::{init, run_usb_device, UsbHid, UsbTransport};
