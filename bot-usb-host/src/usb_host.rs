use crate::types::{
    DeviceHandle, EndpointHandle, EndpointInfo, InterfaceHandle,
    InterfaceInfo, UsbError,
};
use crate::wire::SetupPacket;
use core::future::Future;

/// The data phase of a control transaction: in, out, or none
pub enum DataPhase<'a> {
    In(&'a mut [u8]),
    Out(&'a [u8]),
    None,
}

impl DataPhase<'_> {
    /// The number of bytes the data phase expects to move
    pub fn len(&self) -> usize {
        match self {
            DataPhase::In(buf) => buf.len(),
            DataPhase::Out(buf) => buf.len(),
            DataPhase::None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call `f` with the buffer, if this is an IN data phase
    pub fn in_with<F: FnOnce(&mut [u8])>(&mut self, f: F) {
        if let DataPhase::In(buf) = self {
            f(buf);
        }
    }
}

/// The transfer primitives a USB host stack offers to class drivers
///
/// This is deliberately narrow: just enough for a class driver to find
/// its endpoints, move data on them, and recover them from halts. The
/// host stack itself (enumeration, addressing, configuration, the
/// host-controller hardware) lives behind this trait.
///
/// All the `timeout_ms` parameters take 0 to mean "no software
/// timeout": the transfer completes when the device responds, or when
/// the host controller's own retry logic gives up.
pub trait UsbHost {
    /// Look up the device and interface number for an interface handle
    fn interface_info(
        &self,
        interface: InterfaceHandle,
    ) -> Result<InterfaceInfo, UsbError>;

    /// Look up the `index`-th endpoint (0-based) of an interface
    ///
    /// Returns `UsbError::NoSuchEndpoint` once `index` runs off the end
    /// of the interface's endpoint list.
    fn endpoint_info(
        &self,
        interface: InterfaceHandle,
        index: u8,
    ) -> Result<EndpointInfo, UsbError>;

    /// Perform a control transfer on the device's endpoint zero
    fn control_transfer<'a>(
        &self,
        device: DeviceHandle,
        setup: SetupPacket,
        data_phase: DataPhase<'a>,
        timeout_ms: u32,
    ) -> impl Future<Output = Result<usize, UsbError>>;

    /// Receive data from a bulk IN endpoint
    ///
    /// `data.len()` is the size of the transfer. Returns the number of
    /// bytes actually received.
    fn bulk_in_transfer(
        &self,
        endpoint: EndpointHandle,
        data: &mut [u8],
        timeout_ms: u32,
    ) -> impl Future<Output = Result<usize, UsbError>>;

    /// Send data to a bulk OUT endpoint
    ///
    /// Returns the number of bytes actually sent.
    fn bulk_out_transfer(
        &self,
        endpoint: EndpointHandle,
        data: &[u8],
        timeout_ms: u32,
    ) -> impl Future<Output = Result<usize, UsbError>>;

    /// Send SET_FEATURE or CLEAR_FEATURE(ENDPOINT_HALT) to an endpoint
    ///
    /// `request` is [`CLEAR_FEATURE`](crate::wire::CLEAR_FEATURE) or
    /// [`SET_FEATURE`](crate::wire::SET_FEATURE). Clearing a halt also
    /// resets the endpoint's data toggle (USB 2.0 s5.8.5).
    fn endpoint_halt(
        &self,
        endpoint: EndpointHandle,
        request: u8,
    ) -> impl Future<Output = Result<(), UsbError>>;

    /// Clear the host controller's own halted state for an endpoint
    ///
    /// This involves no bus traffic.
    fn clear_host_halt(&self, endpoint: EndpointHandle) -> Result<(), UsbError>;

    /// Discard any transfers still queued on an endpoint
    ///
    /// This involves no bus traffic.
    fn clear_endpoint_transfers(
        &self,
        endpoint: EndpointHandle,
    ) -> Result<(), UsbError>;
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/usb_host.rs"]
mod tests;
