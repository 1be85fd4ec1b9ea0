//! Bluetooth Low Energy transport.
//!
//! Drives the Nordic SoftDevice S140 in **Peripheral** role as a
//! HID-over-GATT boot keyboard and mouse. Advertising, pairing and
//! connection handling belong to the application; this module provides
//! the GATT server and a [`hid_service::BleTransport`] to attach accepted
//! connections to.

pub mod hid_service;

pub use hid_service::{run_gatt_server, BleTransport, HidService, Server};
