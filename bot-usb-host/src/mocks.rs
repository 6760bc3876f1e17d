use crate::types::{
    DeviceHandle, EndpointHandle, EndpointInfo, InterfaceHandle,
    InterfaceInfo, UsbError,
};
use crate::usb_host::{DataPhase, UsbHost};
use crate::wire::SetupPacket;
use mockall::mock;

mock! {
    pub UsbHostInner {
        #[allow(missing_docs)]
        pub fn interface_info(
            &self,
            interface: InterfaceHandle,
        ) -> Result<InterfaceInfo, UsbError>;

        #[allow(missing_docs)]
        pub fn endpoint_info(
            &self,
            interface: InterfaceHandle,
            index: u8,
        ) -> Result<EndpointInfo, UsbError>;

        #[allow(missing_docs)]
        pub fn control_transfer<'a>(
            &self,
            device: DeviceHandle,
            setup: SetupPacket,
            data_phase: DataPhase<'a>,
            timeout_ms: u32,
        ) -> impl core::future::Future<Output = Result<usize, UsbError>>;

        #[allow(missing_docs)]
        pub fn bulk_in_transfer(
            &self,
            endpoint: EndpointHandle,
            data: &mut [u8],
            timeout_ms: u32,
        ) -> impl core::future::Future<Output = Result<usize, UsbError>>;

        #[allow(missing_docs)]
        pub fn bulk_out_transfer(
            &self,
            endpoint: EndpointHandle,
            data: &[u8],
            timeout_ms: u32,
        ) -> impl core::future::Future<Output = Result<usize, UsbError>>;

        #[allow(missing_docs)]
        pub fn endpoint_halt(
            &self,
            endpoint: EndpointHandle,
            request: u8,
        ) -> impl core::future::Future<Output = Result<(), UsbError>>;

        #[allow(missing_docs)]
        pub fn clear_host_halt(
            &self,
            endpoint: EndpointHandle,
        ) -> Result<(), UsbError>;

        #[allow(missing_docs)]
        pub fn clear_endpoint_transfers(
            &self,
            endpoint: EndpointHandle,
        ) -> Result<(), UsbError>;
    }
}

/// A mock UsbHost, for testing purposes
///
/// Because the lifetimes got icky, the actual Mockall mock is kept as an
/// inner struct inside this one. So expectations should typically be set
/// on `mock_host.inner`, not `mock_host` itself. All methods on
/// MockUsbHost itself just forward straight to the inner struct.
pub struct MockUsbHost {
    /// Mock UsbHost, for testing purposes
    ///
    /// See bot-msc's src/tests/ for widespread use of this facility.
    pub inner: MockUsbHostInner,
}

impl Default for MockUsbHost {
    fn default() -> Self {
        Self {
            inner: MockUsbHostInner::new(),
        }
    }
}

impl UsbHost for MockUsbHost {
    fn interface_info(
        &self,
        interface: InterfaceHandle,
    ) -> Result<InterfaceInfo, UsbError> {
        self.inner.interface_info(interface)
    }

    fn endpoint_info(
        &self,
        interface: InterfaceHandle,
        index: u8,
    ) -> Result<EndpointInfo, UsbError> {
        self.inner.endpoint_info(interface, index)
    }

    fn control_transfer(
        &self,
        device: DeviceHandle,
        setup: SetupPacket,
        data_phase: DataPhase<'_>,
        timeout_ms: u32,
    ) -> impl core::future::Future<Output = Result<usize, UsbError>> {
        self.inner
            .control_transfer(device, setup, data_phase, timeout_ms)
    }

    fn bulk_in_transfer(
        &self,
        endpoint: EndpointHandle,
        data: &mut [u8],
        timeout_ms: u32,
    ) -> impl core::future::Future<Output = Result<usize, UsbError>> {
        self.inner.bulk_in_transfer(endpoint, data, timeout_ms)
    }

    fn bulk_out_transfer(
        &self,
        endpoint: EndpointHandle,
        data: &[u8],
        timeout_ms: u32,
    ) -> impl core::future::Future<Output = Result<usize, UsbError>> {
        self.inner.bulk_out_transfer(endpoint, data, timeout_ms)
    }

    fn endpoint_halt(
        &self,
        endpoint: EndpointHandle,
        request: u8,
    ) -> impl core::future::Future<Output = Result<(), UsbError>> {
        self.inner.endpoint_halt(endpoint, request)
    }

    fn clear_host_halt(&self, endpoint: EndpointHandle) -> Result<(), UsbError> {
        self.inner.clear_host_halt(endpoint)
    }

    fn clear_endpoint_transfers(
        &self,
        endpoint: EndpointHandle,
    ) -> Result<(), UsbError> {
        self.inner.clear_endpoint_transfers(endpoint)
    }
}
