use crate::debug;
use crate::types::{Direction, EndpointType};

/// A SETUP packet as transmitted on control endpoints.
///
/// All transactions on control endpoints start with a SETUP packet of
/// this format. (Some are then followed by IN or OUT data packets, but
/// others are not).
///
/// The format of this packet (and the un-Rust-like names of its
/// fields) are defined in the USB 2.0 specification, section 9.3.
/// Other sections of the USB specification, and of the specifications
/// of particular device classes, dictate what to put in these fields.
///
/// For instance, here is the Bulk-Only Mass Storage "Get Max LUN" request
/// (USB MSC BOT 1.0 s3.2) for interface 0:
///
/// ```no_run
/// # use bot_usb_host::usb_host::{DataPhase, UsbHost};
/// # use bot_usb_host::types::DeviceHandle;
/// # use bot_usb_host::wire::{
/// #     SetupPacket, CLASS_REQUEST, DEVICE_TO_HOST, GET_MAX_LUN,
/// #     RECIPIENT_INTERFACE,
/// # };
/// # async fn foo<H: UsbHost>(host: &H, device: DeviceHandle) {
/// let mut max_lun = [0u8; 1];
/// let rc = host
///     .control_transfer(
///         device,
///         SetupPacket {
///             bmRequestType: DEVICE_TO_HOST | CLASS_REQUEST | RECIPIENT_INTERFACE,
///             bRequest: GET_MAX_LUN,
///             wValue: 0,
///             wIndex: 0,
///             wLength: 1,
///         },
///         DataPhase::In(&mut max_lun),
///         500,
///     )
///     .await;
/// # }
/// ```
#[repr(C)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
#[allow(non_snake_case)] // These names are from USB 2.0 table 9-2
pub struct SetupPacket {
    /// The type and specific target of the request.
    pub bmRequestType: u8,
    /// The particular request.
    pub bRequest: u8,
    /// A parameter to the request.
    pub wValue: u16,
    /// A second parameter to the request.
    pub wIndex: u16,
    /// The length of the subsequent IN or OUT data phase; can be zero
    /// if the setup packet itself contains all the required
    /// information.
    pub wLength: u16,
}

#[repr(C)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone)]
#[allow(non_snake_case)] // These names are from USB 2.0 table 9-10
pub struct ConfigurationDescriptor {
    pub bLength: u8,
    pub bDescriptorType: u8,
    pub wTotalLength: [u8; 2],
    pub bNumInterfaces: u8,
    pub bConfigurationValue: u8,
    pub iConfiguration: u8,
    pub bmAttributes: u8,
    pub bMaxPower: u8,
}

// SAFETY: all fields zeroable
unsafe impl bytemuck::Zeroable for ConfigurationDescriptor {}
// SAFETY: no padding, no disallowed bit patterns
unsafe impl bytemuck::Pod for ConfigurationDescriptor {}

#[repr(C)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone)]
#[allow(non_snake_case)] // These names are from USB 2.0 table 9-12
pub struct InterfaceDescriptor {
    pub bLength: u8,
    pub bDescriptorType: u8,
    pub bInterfaceNumber: u8,
    pub bAlternateSetting: u8,
    pub bNumEndpoints: u8,
    pub bInterfaceClass: u8,
    pub bInterfaceSubClass: u8,
    pub bInterfaceProtocol: u8,
    pub iInterface: u8,
}

// SAFETY: all fields zeroable
unsafe impl bytemuck::Zeroable for InterfaceDescriptor {}
// SAFETY: no padding, no disallowed bit patterns
unsafe impl bytemuck::Pod for InterfaceDescriptor {}

#[repr(C)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone)]
#[allow(non_snake_case)] // These names are from USB 2.0 table 9-13
pub struct EndpointDescriptor {
    pub bLength: u8,
    pub bDescriptorType: u8,
    pub bEndpointAddress: u8,
    pub bmAttributes: u8,
    pub wMaxPacketSize: [u8; 2],
    pub bInterval: u8,
}

// SAFETY: all fields zeroable
unsafe impl bytemuck::Zeroable for EndpointDescriptor {}
// SAFETY: no padding, no disallowed bit patterns
unsafe impl bytemuck::Pod for EndpointDescriptor {}

impl EndpointDescriptor {
    pub fn direction(&self) -> Direction {
        Direction::from_address(self.bEndpointAddress)
    }

    pub fn endpoint_type(&self) -> EndpointType {
        EndpointType::from_attributes(self.bmAttributes)
    }

    pub fn number(&self) -> u8 {
        self.bEndpointAddress & 0xF
    }

    pub fn max_packet_size(&self) -> u16 {
        u16::from_le_bytes(self.wMaxPacketSize) & 0x7FF
    }
}

// For request_type (USB 2.0 table 9-2)
pub const DEVICE_TO_HOST: u8 = 0x80;
pub const HOST_TO_DEVICE: u8 = 0;
pub const CLASS_REQUEST: u8 = 0x20;
pub const RECIPIENT_INTERFACE: u8 = 1;

// For request (USB 2.0 table 9-4)
pub const CLEAR_FEATURE: u8 = 1;
pub const SET_FEATURE: u8 = 3;

// Descriptor types (USB 2.0 table 9-5)
pub const CONFIGURATION_DESCRIPTOR: u8 = 2;
pub const INTERFACE_DESCRIPTOR: u8 = 4;
pub const ENDPOINT_DESCRIPTOR: u8 = 5;

// Mass storage class codes (USB MSC overview 1.4, s2 and s3)
pub const MASS_STORAGE_CLASSCODE: u8 = 8;
pub const SCSI_TRANSPARENT_SUBCLASS: u8 = 6;
pub const BULK_ONLY_PROTOCOL: u8 = 0x50;

// Bulk-only class-specific requests (USB MSC BOT 1.0 s3.1, s3.2)
pub const MASS_STORAGE_RESET: u8 = 0xFF;
pub const GET_MAX_LUN: u8 = 0xFE;

pub trait DescriptorVisitor {
    fn on_configuration(&mut self, _c: &ConfigurationDescriptor) {}
    fn on_interface(&mut self, _i: &InterfaceDescriptor) {}
    fn on_endpoint(&mut self, _e: &EndpointDescriptor) {}
    fn on_other(&mut self, _d: &[u8]) {}
}

pub struct ShowDescriptors;

impl DescriptorVisitor for ShowDescriptors {
    fn on_configuration(&mut self, c: &ConfigurationDescriptor) {
        debug::println!("{:?}", c);
    }
    fn on_interface(&mut self, i: &InterfaceDescriptor) {
        debug::println!("  {:?}", i);
    }
    fn on_endpoint(&mut self, e: &EndpointDescriptor) {
        debug::println!("    {:?}", e);
    }
    fn on_other(&mut self, d: &[u8]) {
        let dlen = d[0];
        let dtype = d[1];
        let domain = match dtype & 0x60 {
            0x00 => "standard",
            0x20 => "class",
            0x40 => "vendor",
            _ => "reserved",
        };
        debug::println!("  {} type {} len {} skipped", domain, dtype, dlen);
    }
}

/// Walk a configuration-descriptor sequence, calling the visitor for each
///
/// Truncated or zero-length descriptors stop the walk; descriptors of the
/// right type but the wrong length are passed to nobody.
pub fn parse_descriptors(buf: &[u8], v: &mut impl DescriptorVisitor) {
    let mut index = 0;

    while buf.len() > index + 2 {
        let dlen = buf[index] as usize;
        let dtype = buf[index + 1];

        if dlen < 2 || buf.len() < index + dlen {
            return;
        }

        let d = &buf[index..index + dlen];
        match dtype {
            CONFIGURATION_DESCRIPTOR => {
                if let Ok(c) = bytemuck::try_from_bytes(d) {
                    v.on_configuration(c);
                }
            }
            INTERFACE_DESCRIPTOR => {
                if let Ok(i) = bytemuck::try_from_bytes(d) {
                    v.on_interface(i);
                }
            }
            ENDPOINT_DESCRIPTOR => {
                if let Ok(e) = bytemuck::try_from_bytes(d) {
                    v.on_endpoint(e);
                }
            }
            _ => v.on_other(d),
        }

        index += dlen;
    }
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/wire.rs"]
mod tests;
