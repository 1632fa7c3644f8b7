//! USB input transport over `rusb`.
//!
//! Discovers boot-protocol keyboards by walking every connected device's
//! active configuration and looking for an interface with class 3 (HID),
//! subclass 1 (boot), protocol 1 (keyboard) that exposes an interrupt IN
//! endpoint.  Claiming detaches the kernel driver for the interface, takes
//! it over, and forces the device into the boot protocol so its reports
//! always follow the fixed 8-byte format.

use std::time::Duration;

use rusb::{Context, Device, DeviceHandle, Direction, TransferType, UsbContext};
use tracing::{debug, warn};

use crate::application::connection::{
    DeviceInfo, DeviceLink, DeviceSession, InputTransport, TransportError,
};

const HID_CLASS: u8 = 3;
const BOOT_SUBCLASS: u8 = 1;
const KEYBOARD_PROTOCOL: u8 = 1;

/// HID class request: SET_PROTOCOL, wValue 0 = boot protocol.
const HID_SET_PROTOCOL: u8 = 0x0B;
const BOOT_PROTOCOL: u16 = 0;

const CONTROL_TIMEOUT: Duration = Duration::from_millis(500);

fn transport_err(e: rusb::Error) -> TransportError {
    match e {
        rusb::Error::Timeout => TransportError::Timeout,
        other => TransportError::Transport(other.to_string()),
    }
}

/// An [`InputTransport`] over the host's USB buses.
pub struct UsbTransport {
    context: Context,
}

impl UsbTransport {
    /// Opens a libusb context.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Transport`] when libusb cannot initialise.
    pub fn new() -> Result<Self, TransportError> {
        let context = Context::new().map_err(transport_err)?;
        Ok(Self { context })
    }

    /// Extracts the boot-keyboard interface of `device`, if it has one.
    fn keyboard_interface(device: &Device<Context>) -> Option<DeviceInfo> {
        let descriptor = device.device_descriptor().ok()?;
        let config = device.active_config_descriptor().ok()?;

        for interface in config.interfaces() {
            for desc in interface.descriptors() {
                if desc.class_code() != HID_CLASS
                    || desc.sub_class_code() != BOOT_SUBCLASS
                    || desc.protocol_code() != KEYBOARD_PROTOCOL
                {
                    continue;
                }
                let Some(endpoint) = desc.endpoint_descriptors().find(|ep| {
                    ep.transfer_type() == TransferType::Interrupt && ep.direction() == Direction::In
                }) else {
                    continue;
                };
                return Some(DeviceInfo {
                    vendor_id: descriptor.vendor_id(),
                    product_id: descriptor.product_id(),
                    bus: device.bus_number(),
                    address: device.address(),
                    interface: desc.interface_number(),
                    endpoint: endpoint.address(),
                });
            }
        }
        None
    }

    fn find_device(&self, info: &DeviceInfo) -> Result<Device<Context>, TransportError> {
        let devices = self.context.devices().map_err(transport_err)?;
        devices
            .iter()
            .find(|d| d.bus_number() == info.bus && d.address() == info.address)
            .ok_or_else(|| TransportError::Transport("device no longer present".to_string()))
    }
}

impl InputTransport for UsbTransport {
    fn enumerate(&self) -> Result<Vec<DeviceInfo>, TransportError> {
        let devices = self.context.devices().map_err(transport_err)?;
        let keyboards: Vec<DeviceInfo> = devices
            .iter()
            .filter_map(|d| Self::keyboard_interface(&d))
            .collect();
        debug!(count = keyboards.len(), "enumerated boot-protocol keyboards");
        Ok(keyboards)
    }

    fn claim(&self, info: &DeviceInfo) -> Result<DeviceSession, TransportError> {
        let device = self.find_device(info)?;
        let handle = device.open().map_err(transport_err)?;

        // Prefer libusb's automatic detach/reattach; fall back to a manual
        // detach on platforms that do not support it.
        if handle.set_auto_detach_kernel_driver(true).is_err() {
            match handle.kernel_driver_active(info.interface) {
                Ok(true) => handle
                    .detach_kernel_driver(info.interface)
                    .map_err(transport_err)?,
                Ok(false) => {}
                Err(e) => return Err(transport_err(e)),
            }
        }
        handle.claim_interface(info.interface).map_err(transport_err)?;

        // bmRequestType 0x21: host-to-device, class request, to interface.
        let set_protocol = handle.write_control(
            0x21,
            HID_SET_PROTOCOL,
            BOOT_PROTOCOL,
            info.interface as u16,
            &[],
            CONTROL_TIMEOUT,
        );
        if let Err(e) = set_protocol {
            // Most keyboards already speak boot protocol after enumeration.
            warn!(error = %e, "SET_PROTOCOL request failed, continuing");
        }

        Ok(DeviceSession::new(*info, Box::new(UsbDeviceLink { handle })))
    }
}

struct UsbDeviceLink {
    handle: DeviceHandle<Context>,
}

impl DeviceLink for UsbDeviceLink {
    fn read_interrupt(
        &self,
        endpoint: u8,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransportError> {
        self.handle
            .read_interrupt(endpoint, buf, timeout)
            .map_err(transport_err)
    }
}
