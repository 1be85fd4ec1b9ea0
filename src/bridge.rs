//! The dispatch loop: poll the bus, translate, transmit.
//!
//! One cooperative loop owns every piece of mutable state (key report,
//! lock state) and is the only thing that touches it. Each iteration
//! polls the keyboard, then the mouse, with a fixed delay after each.
//! A failed read is skipped and retried on the next iteration; it never
//! counts as "all keys released".

use embedded_hal_async::delay::DelayNs;

use crate::adb::{self, AdbBus};
use crate::config::{BridgeConfig, ADB_ADDR_KEYBOARD, ADB_ADDR_MOUSE};
use crate::error::{BusError, Error};
use crate::hid::keyboard::KeyboardReport;
use crate::hid::mouse::MouseReport;
use crate::hid::HidTransport;
use crate::keymap::{Keymap, APPLE_EXTENDED};
use crate::lock::{LockKeyController, LockState};
use crate::translate::KeyEventTranslator;

/// Which devices answered during detection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Devices {
    pub keyboard: bool,
    pub mouse: bool,
    /// The keyboard accepted the extended handler (separate left/right
    /// modifiers).
    pub extended_keyboard: bool,
}

/// Bus-to-HID bridge.
pub struct Bridge<B, T, D> {
    bus: B,
    transport: T,
    delay: D,
    config: BridgeConfig,
    keymap: &'static Keymap,
    report: KeyboardReport,
    locks: LockKeyController,
    devices: Devices,
}

impl<B, T, D> Bridge<B, T, D>
where
    B: AdbBus,
    T: HidTransport,
    D: DelayNs,
{
    pub fn new(bus: B, transport: T, delay: D, config: BridgeConfig) -> Self {
        Self {
            bus,
            transport,
            delay,
            locks: LockKeyController::new(&config),
            config,
            keymap: &APPLE_EXTENDED,
            report: KeyboardReport::empty(),
            devices: Devices::default(),
        }
    }

    /// Use a different key table.
    pub fn with_keymap(mut self, keymap: &'static Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    /// Skip detection and poll the given devices.
    pub fn with_devices(mut self, devices: Devices) -> Self {
        self.devices = devices;
        self
    }

    pub fn devices(&self) -> Devices {
        self.devices
    }

    pub fn keyboard_report(&self) -> &KeyboardReport {
        &self.report
    }

    pub fn lock_state(&self) -> LockState {
        self.locks.state()
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Wait for devices to settle, detect them and sync the LEDs.
    pub async fn init(&mut self) -> Devices {
        self.delay.delay_ms(self.config.startup_delay_ms).await;

        match self
            .bus
            .negotiate_device(ADB_ADDR_KEYBOARD, self.config.keyboard_handler_id)
            .await
        {
            Ok(accepted) => {
                self.devices.keyboard = true;
                self.devices.extended_keyboard = accepted;
                info!("keyboard present (extended: {})", accepted);
            }
            Err(e) => warn!("no keyboard: {}", Error::Detect(e)),
        }

        match self
            .bus
            .negotiate_device(ADB_ADDR_MOUSE, self.config.mouse_handler_id)
            .await
        {
            Ok(accepted) => {
                self.devices.mouse = true;
                info!("mouse present (handler switched: {})", accepted);
            }
            Err(e) => warn!("no mouse: {}", Error::Detect(e)),
        }

        if self.devices.keyboard {
            self.write_leds().await;
        }
        self.devices
    }

    /// Run forever.
    pub async fn run(&mut self) -> ! {
        let devices = self.init().await;
        info!("dispatch loop started: {}", devices);
        loop {
            self.poll_once().await;
        }
    }

    /// One loop iteration: keyboard, then mouse.
    pub async fn poll_once(&mut self) {
        if self.devices.keyboard {
            self.poll_keyboard().await;
            self.delay.delay_ms(self.config.poll_delay_ms).await;
        }

        if self.devices.mouse {
            self.poll_mouse().await;
            self.delay.delay_ms(self.config.poll_delay_ms).await;
        }

        if !self.devices.keyboard && !self.devices.mouse {
            self.delay.delay_ms(self.config.poll_delay_ms).await;
        }
    }

    /// One keyboard cycle. Returns `true` if a report was sent.
    pub async fn poll_keyboard(&mut self) -> bool {
        self.sync_host_leds().await;

        let event = match self.bus.read_keyboard_event().await {
            Ok(event) => event,
            Err(e) => {
                log_read_error(e);
                return false;
            }
        };
        trace!("kbd reg {:#x}", event.raw);

        let translator = KeyEventTranslator::new(self.keymap);
        let mut changed = translator.apply(&mut self.report, &event);
        changed |= self.locks.filter_keypad(&mut self.report);

        let update = self.locks.on_key_event(&event);
        if !update.is_empty() {
            self.write_leds().await;
        }
        if self.locks.needs_caps_pulse(&update) {
            changed |= self
                .locks
                .pulse_caps_lock(&mut self.report, &mut self.transport, &mut self.delay)
                .await;
        }

        if changed {
            trace!("kbd report {}", self.report);
            self.transport
                .send_keyboard_report(self.report.to_wire_bytes())
                .await;
        }
        changed
    }

    /// One mouse cycle. Returns `true` if a report was sent.
    pub async fn poll_mouse(&mut self) -> bool {
        let sample = match self.bus.read_mouse_sample().await {
            Ok(sample) => sample,
            Err(e) => {
                log_read_error(e);
                return false;
            }
        };
        if sample.is_empty() {
            return false;
        }

        let report = MouseReport::build(&sample);
        trace!("mouse {}", report);
        self.transport.send_mouse_report(report).await;
        true
    }

    /// Apply a pending host LED push, if any. Runs on the loop so the
    /// lock state keeps a single writer.
    async fn sync_host_leds(&mut self) {
        let Some(bits) = self.transport.take_host_leds() else {
            return;
        };
        if self.locks.apply_host_leds(bits) {
            self.write_leds().await;
        }
    }

    async fn write_leds(&mut self) {
        let leds = self.locks.state();
        if let Err(e) = adb::write_leds(&mut self.bus, leds).await {
            // Not retried: the next toggle writes the full state again.
            warn!("led write failed: {}", Error::LedWrite(e));
        }
    }
}

#[cfg(feature = "embedded")]
impl<B: AdbBus, T: HidTransport> Bridge<B, T, embassy_time::Delay> {
    /// Bridge timed by the Embassy time driver.
    pub fn with_embassy_time(bus: B, transport: T, config: BridgeConfig) -> Self {
        Self::new(bus, transport, embassy_time::Delay, config)
    }
}

fn log_read_error(e: BusError) {
    if e.is_timeout() {
        trace!("bus read timeout");
    } else {
        debug!("bus read failed: {}", Error::from(e));
    }
}
