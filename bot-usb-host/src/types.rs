/// Errors reported by the USB host primitives
///
/// These are the outcomes of a single transfer on a single endpoint;
/// protocol-level meaning (is this stall fatal? should the endpoint be
/// recovered?) is up to the class driver that issued the transfer.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum UsbError {
    /// The endpoint is halted on the host side, following an earlier error
    Halted,
    /// The device answered with a STALL handshake (USB 2.0 s8.4.5)
    Stall,
    /// Low-level bus error: CRC, bit-stuffing, PID or data-toggle mismatch
    BusError,
    /// Host-controller buffer overrun or underrun
    DataBuffer,
    /// The transfer did not complete in the time allowed
    Timeout,
    /// No endpoint (or interface) with that index/handle exists
    NoSuchEndpoint,
    /// The device has been disconnected
    NoDevice,
}

impl UsbError {
    /// Is this an endpoint halt, either reported by the device or by the host?
    ///
    /// Halts are the errors which CLEAR_FEATURE(ENDPOINT_HALT) exists to
    /// clear (USB 2.0 s9.4.1, s5.8.5).
    pub fn is_halt(&self) -> bool {
        matches!(self, UsbError::Halted | UsbError::Stall)
    }
}

/// Opaque handle for a device attached to the host
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct DeviceHandle(pub u32);

/// Opaque handle for one interface of a configured device
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct InterfaceHandle(pub u32);

/// Opaque handle for one endpoint of an interface
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct EndpointHandle(pub u32);

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum EndpointType {
    Control = 0,
    Isochronous = 1,
    Bulk = 2,
    Interrupt = 3,
}

impl EndpointType {
    /// Decode the transfer type from an endpoint descriptor's `bmAttributes`
    pub fn from_attributes(bm_attributes: u8) -> Self {
        match bm_attributes & 3 {
            0 => EndpointType::Control,
            1 => EndpointType::Isochronous,
            2 => EndpointType::Bulk,
            _ => EndpointType::Interrupt,
        }
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    /// Decode the direction from an endpoint's `bEndpointAddress`
    pub fn from_address(b_endpoint_address: u8) -> Self {
        if (b_endpoint_address & 0x80) != 0 {
            Direction::In
        } else {
            Direction::Out
        }
    }
}

/// What the host knows about a particular interface
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct InterfaceInfo {
    /// The device this interface belongs to
    pub device: DeviceHandle,
    /// `bInterfaceNumber`, used as `wIndex` in class-specific requests
    pub interface_number: u8,
}

/// What the host knows about a particular endpoint
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct EndpointInfo {
    pub handle: EndpointHandle,
    /// Endpoint number, 1-15
    pub number: u8,
    pub direction: Direction,
    pub endpoint_type: EndpointType,
    pub max_packet_size: u16,
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/types.rs"]
mod tests;
