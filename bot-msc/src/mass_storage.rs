use crate::config::Config;
use crate::debug;
use crate::error::Error;
use bot_usb_host::types::{
    DeviceHandle, Direction, EndpointHandle, EndpointType, InterfaceHandle,
    UsbError,
};
use bot_usb_host::usb_host::{DataPhase, UsbHost};
use bot_usb_host::wire::{
    ConfigurationDescriptor, DescriptorVisitor, InterfaceDescriptor,
    SetupPacket, BULK_ONLY_PROTOCOL, CLASS_REQUEST, DEVICE_TO_HOST,
    GET_MAX_LUN, HOST_TO_DEVICE, MASS_STORAGE_CLASSCODE, MASS_STORAGE_RESET,
    RECIPIENT_INTERFACE, SCSI_TRANSPARENT_SUBCLASS,
};
use core::future::Future;

mod block_device;
mod phase;
mod scsi;
mod stream;

pub use stream::{MultRead, MultWrite};

/// Where a session is in the bulk-only command/data/status cycle
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    /// No command outstanding
    Idle,
    /// Sending the CBW
    SendCbw,
    /// Receiving data from the device
    DataIn,
    /// Sending data to the device
    DataOut,
    /// Waiting for the CSW
    ReadCsw,
    /// Mass Storage Reset and clearing both bulk endpoints; also where
    /// a failed reset recovery leaves the session
    ResetRecovery,
}

/// A session with one logical unit of a bulk-only mass-storage device
///
/// Created by [`MassStorage::init()`], which finds the bulk endpoints,
/// checks the LUN, and asks the device what it is and how big it is.
/// Devices with several LUNs (multi-slot card readers, typically) need
/// one `MassStorage` per LUN; they can all share one host.
///
/// Every operation takes `&mut self`, so one session only ever has one
/// command outstanding, as bulk-only transport requires.
///
/// The session needs to wait from time to time: before talking to a
/// newly-attached device, and between retries of commands that
/// devices often fail while they wake up. So the caller supplies a
/// "delay" function
/// which, given a parameter in milliseconds, returns a Future that
/// waits for that long before coming ready.
pub struct MassStorage<'a, H: UsbHost, F> {
    host: &'a H,
    device: DeviceHandle,
    interface_number: u8,
    bulk_in: EndpointHandle,
    bulk_out: EndpointHandle,
    lun: u8,
    max_lun: u8,
    tag: u32,
    lba_count: u32,
    lba_size: u32,
    vendor_id: [u8; 8],
    product_id: [u8; 16],
    revision: [u8; 4],
    phase: Phase,
    config: Config,
    delay_ms: F,
}

fn find_bulk_endpoints<H: UsbHost>(
    host: &H,
    interface: InterfaceHandle,
) -> Result<(EndpointHandle, EndpointHandle), Error> {
    let mut bulk_in = None;
    let mut bulk_out = None;

    for index in 0..=u8::MAX {
        let ep = match host.endpoint_info(interface, index) {
            Ok(ep) => ep,
            Err(UsbError::NoSuchEndpoint) => break,
            Err(e) => return Err(Error::Transport(e)),
        };
        if ep.endpoint_type != EndpointType::Bulk {
            continue;
        }
        match ep.direction {
            Direction::In => {
                bulk_in.get_or_insert(ep.handle);
            }
            Direction::Out => {
                bulk_out.get_or_insert(ep.handle);
            }
        }
    }

    match (bulk_in, bulk_out) {
        (Some(i), Some(o)) => Ok((i, o)),
        _ => {
            debug::println!("msc: no bulk endpoint pair");
            Err(Error::ClassNotSupported)
        }
    }
}

impl<'a, H: UsbHost, D: Future<Output = ()>, F: Fn(usize) -> D>
    MassStorage<'a, H, F>
{
    /// Open logical unit `lun` of a mass-storage interface
    ///
    /// Fails with `ClassNotSupported` if the interface hasn't got one
    /// bulk IN and one bulk OUT endpoint, or if the device rejects Get
    /// Max LUN; fails with `Parameter` if `lun` is bigger than the
    /// device's maximum LUN. Otherwise, runs INQUIRY and READ CAPACITY
    /// (with retries as set in `config`) and returns any error from
    /// those.
    pub async fn init(
        host: &'a H,
        interface: InterfaceHandle,
        lun: u8,
        config: Config,
        delay_ms: F,
    ) -> Result<Self, Error> {
        delay_ms(config.settle_delay_ms as usize).await;

        let info = host.interface_info(interface)?;
        let (bulk_in, bulk_out) = find_bulk_endpoints(host, interface)?;

        delay_ms(config.max_lun_delay_ms as usize).await;

        let mut ms = Self {
            host,
            device: info.device,
            interface_number: info.interface_number,
            bulk_in,
            bulk_out,
            lun,
            max_lun: 0,
            tag: 0,
            lba_count: 0,
            lba_size: 0,
            vendor_id: [0; 8],
            product_id: [0; 16],
            revision: [0; 4],
            phase: Phase::Idle,
            config,
            delay_ms,
        };

        ms.max_lun = ms.get_max_lun().await.map_err(|_e| {
            debug::println!("msc: get max lun {:?}", _e);
            Error::ClassNotSupported
        })?;

        if lun > ms.max_lun {
            debug::println!("msc: lun {} > max {}", lun, ms.max_lun);
            return Err(Error::Parameter);
        }

        ms.inquiry().await?;
        ms.read_capacity().await?;
        Ok(ms)
    }
}

impl<H: UsbHost, F> MassStorage<'_, H, F> {
    /// Get Max LUN (BOT s3.2)
    pub async fn get_max_lun(&mut self) -> Result<u8, Error> {
        let mut buf = [0u8; 1];
        let n = self
            .host
            .control_transfer(
                self.device,
                SetupPacket {
                    bmRequestType: DEVICE_TO_HOST
                        | CLASS_REQUEST
                        | RECIPIENT_INTERFACE,
                    bRequest: GET_MAX_LUN,
                    wValue: 0,
                    wIndex: self.interface_number as u16,
                    wLength: 1,
                },
                DataPhase::In(&mut buf),
                self.config.max_lun_timeout_ms,
            )
            .await?;
        if n < 1 || buf[0] > 15 {
            return Err(Error::ProtocolError);
        }
        Ok(buf[0])
    }

    /// Bulk-Only Mass Storage Reset (BOT s3.1)
    ///
    /// This resets the device's interface, but doesn't clear any halts
    /// on the bulk endpoints; see
    /// [`reset_recovery()`](MassStorage::reset_recovery) for that.
    pub async fn reset(&mut self) -> Result<(), Error> {
        self.host
            .control_transfer(
                self.device,
                SetupPacket {
                    bmRequestType: HOST_TO_DEVICE
                        | CLASS_REQUEST
                        | RECIPIENT_INTERFACE,
                    bRequest: MASS_STORAGE_RESET,
                    wValue: 0,
                    wIndex: self.interface_number as u16,
                    wLength: 0,
                },
                DataPhase::None,
                self.config.transfer_timeout_ms,
            )
            .await?;
        Ok(())
    }

    pub fn lun(&self) -> u8 {
        self.lun
    }

    pub fn max_lun(&self) -> u8 {
        self.max_lun
    }

    pub fn interface_number(&self) -> u8 {
        self.interface_number
    }

    /// Capacity in blocks, as reported by READ CAPACITY
    pub fn lba_count(&self) -> u32 {
        self.lba_count
    }

    /// Block size in bytes; zero until READ CAPACITY has succeeded
    pub fn lba_size(&self) -> u32 {
        self.lba_size
    }

    pub fn capacity_bytes(&self) -> u64 {
        self.lba_count as u64 * self.lba_size as u64
    }

    pub fn vendor_id(&self) -> &[u8; 8] {
        &self.vendor_id
    }

    pub fn product_id(&self) -> &[u8; 16] {
        &self.product_id
    }

    pub fn revision(&self) -> &[u8; 4] {
        &self.revision
    }

    /// The tag of the most recent CBW
    pub fn tag(&self) -> u32 {
        self.tag
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(all(test, feature = "std"))]
impl<'a, H: UsbHost, F> MassStorage<'a, H, F> {
    /// For testing: a session that has already been through `init()`
    pub(crate) fn new_for_test(
        host: &'a H,
        lba_count: u32,
        lba_size: u32,
        config: Config,
        delay_ms: F,
    ) -> Self {
        Self {
            host,
            device: DeviceHandle(1),
            interface_number: 0,
            bulk_in: EndpointHandle(0x81),
            bulk_out: EndpointHandle(0x02),
            lun: 0,
            max_lun: 0,
            tag: 0,
            lba_count,
            lba_size,
            vendor_id: [0; 8],
            product_id: [0; 16],
            revision: [0; 4],
            phase: Phase::Idle,
            config,
            delay_ms,
        }
    }
}

/// Find a bulk-only SCSI interface in a configuration descriptor
///
/// Use with [`parse_descriptors`](bot_usb_host::wire::parse_descriptors).
/// Only the first matching interface is recorded.
#[derive(Default)]
pub struct IdentifyMassStorage {
    current_configuration: Option<u8>,
    found: Option<(u8, u8)>,
}

impl DescriptorVisitor for IdentifyMassStorage {
    fn on_configuration(&mut self, c: &ConfigurationDescriptor) {
        self.current_configuration = Some(c.bConfigurationValue);
    }

    fn on_interface(&mut self, i: &InterfaceDescriptor) {
        if self.found.is_some() {
            return;
        }
        if i.bInterfaceClass == MASS_STORAGE_CLASSCODE
            && i.bInterfaceSubClass == SCSI_TRANSPARENT_SUBCLASS
            && i.bInterfaceProtocol == BULK_ONLY_PROTOCOL
        {
            if let Some(c) = self.current_configuration {
                self.found = Some((c, i.bInterfaceNumber));
            }
        } else {
            debug::println!(
                "class {} subclass {} protocol {}",
                i.bInterfaceClass,
                i.bInterfaceSubClass,
                i.bInterfaceProtocol
            );
        }
    }
}

impl IdentifyMassStorage {
    /// The `bConfigurationValue` to select, if a suitable interface was found
    pub fn identify(&self) -> Option<u8> {
        self.found.map(|f| f.0)
    }

    /// The `bInterfaceNumber` of the bulk-only interface
    pub fn interface(&self) -> Option<u8> {
        self.found.map(|f| f.1)
    }
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/mass_storage.rs"]
mod tests;
