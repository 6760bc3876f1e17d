use crate::order::{ScsiU16, ScsiU32};
use core::str;

pub const TEST_UNIT_READY: u8 = 0x00;
pub const REQUEST_SENSE: u8 = 0x03;
pub const INQUIRY: u8 = 0x12;
pub const READ_CAPACITY_10: u8 = 0x25;
pub const READ_10: u8 = 0x28;
pub const WRITE_10: u8 = 0x2A;

/// Allocation length for standard INQUIRY data
pub const INQUIRY_LEN: usize = 36;
/// Allocation length for fixed-format sense data
pub const SENSE_LEN: usize = 18;
/// Length of the READ CAPACITY (10) reply
pub const READ_CAPACITY_10_LEN: usize = 8;

/// SCSI-2 devices (which includes most USB sticks) expect the LUN in
/// the top three bits of CDB byte 1, as well as in the transport wrapper
fn lun_bits(lun: u8) -> u8 {
    (lun & 7) << 5
}

/// READ (10)
/// Seagate SCSI Commands Reference Manual s3.16
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone)]
#[repr(C)]
pub struct Read10 {
    pub operation_code: u8,
    pub flags: u8,
    pub lba: ScsiU32,
    pub group: u8,
    pub transfer_length: ScsiU16,
    pub control: u8,
}

impl Read10 {
    pub fn new(lun: u8, lba: u32, count: u16) -> Self {
        assert!(core::mem::size_of::<Self>() == 10);
        Self {
            operation_code: READ_10,
            flags: lun_bits(lun),
            lba: ScsiU32::new(lba),
            group: 0,
            transfer_length: ScsiU16::new(count),
            control: 0,
        }
    }
}

// SAFETY: all fields zeroable
unsafe impl bytemuck::Zeroable for Read10 {}
// SAFETY: no padding, no disallowed bit patterns
unsafe impl bytemuck::Pod for Read10 {}

/// WRITE (10)
/// Seagate SCSI Commands Reference Manual s3.60
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone)]
#[repr(C)]
pub struct Write10 {
    pub operation_code: u8,
    pub flags: u8,
    pub lba: ScsiU32,
    pub group: u8,
    pub transfer_length: ScsiU16,
    pub control: u8,
}

impl Write10 {
    pub fn new(lun: u8, lba: u32, count: u16) -> Self {
        assert!(core::mem::size_of::<Self>() == 10);
        Self {
            operation_code: WRITE_10,
            flags: lun_bits(lun),
            lba: ScsiU32::new(lba),
            group: 0,
            transfer_length: ScsiU16::new(count),
            control: 0,
        }
    }
}

// SAFETY: all fields zeroable
unsafe impl bytemuck::Zeroable for Write10 {}
// SAFETY: no padding, no disallowed bit patterns
unsafe impl bytemuck::Pod for Write10 {}

/// READ CAPACITY (10)
/// Seagate SCSI Commands Reference Manual s3.23.2
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone)]
#[repr(C)]
pub struct ReadCapacity10 {
    pub operation_code: u8,
    pub flags: u8,
    pub lba: ScsiU32,
    pub reserved6: [u8; 3],
    pub control: u8,
}

impl ReadCapacity10 {
    pub fn new(lun: u8) -> Self {
        assert!(core::mem::size_of::<Self>() == 10);
        Self {
            operation_code: READ_CAPACITY_10,
            flags: lun_bits(lun),
            lba: ScsiU32::default(),
            reserved6: [0; 3],
            control: 0,
        }
    }
}

// SAFETY: all fields zeroable
unsafe impl bytemuck::Zeroable for ReadCapacity10 {}
// SAFETY: no padding, no disallowed bit patterns
unsafe impl bytemuck::Pod for ReadCapacity10 {}

/// Reply to READ CAPACITY (10)
///
/// `lba` is as reported by the device. Strictly that's the address of
/// the last block, not the number of blocks, but devices differ.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, Default)]
#[repr(C)]
pub struct ReadCapacity10Reply {
    pub lba: ScsiU32,
    pub block_size: ScsiU32,
}

// SAFETY: all fields zeroable
unsafe impl bytemuck::Zeroable for ReadCapacity10Reply {}
// SAFETY: no padding, no disallowed bit patterns
unsafe impl bytemuck::Pod for ReadCapacity10Reply {}

/// TEST UNIT READY
/// Seagate SCSI Commands Reference Manual s3.53
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone)]
#[repr(C)]
pub struct TestUnitReady {
    pub operation_code: u8,
    pub reserved: [u8; 4],
    pub control: u8,
}

impl TestUnitReady {
    pub fn new() -> Self {
        assert!(core::mem::size_of::<Self>() == 6);
        Self {
            operation_code: TEST_UNIT_READY,
            reserved: [0u8; 4],
            control: 0,
        }
    }
}

impl Default for TestUnitReady {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: all fields zeroable
unsafe impl bytemuck::Zeroable for TestUnitReady {}
// SAFETY: no padding, no disallowed bit patterns
unsafe impl bytemuck::Pod for TestUnitReady {}

/// REQUEST SENSE
/// Seagate SCSI Commands Reference Manual s3.37
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone)]
#[repr(C)]
pub struct RequestSense {
    pub operation_code: u8,
    pub desc: u8,
    pub reserved: [u8; 2],
    pub allocation_length: u8,
    pub control: u8,
}

impl RequestSense {
    pub fn new(lun: u8) -> Self {
        assert!(core::mem::size_of::<Self>() == 6);
        Self {
            operation_code: REQUEST_SENSE,
            desc: lun_bits(lun),
            reserved: [0; 2],
            allocation_length: SENSE_LEN as u8,
            control: 0,
        }
    }
}

// SAFETY: all fields zeroable
unsafe impl bytemuck::Zeroable for RequestSense {}
// SAFETY: no padding, no disallowed bit patterns
unsafe impl bytemuck::Pod for RequestSense {}

/// Fixed-format sense data
/// Seagate SCSI Commands Reference Manual s2.4.1.2
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, Default)]
#[repr(C)]
pub struct RequestSenseReply {
    pub response_code: u8,
    pub reserved1: u8,
    pub sense_key: u8,
    pub information: [u8; 4],
    pub additional_length: u8,
    pub command_specific_information: [u8; 4],
    pub additional_sense_code: u8,
    pub additional_sense_code_qualifier: u8,
    pub fru_code: u8,
    pub sense_key_specific: [u8; 3],
}

// SAFETY: all fields zeroable
unsafe impl bytemuck::Zeroable for RequestSenseReply {}
// SAFETY: no padding, no disallowed bit patterns
unsafe impl bytemuck::Pod for RequestSenseReply {}

/// INQUIRY
/// Seagate SCSI Commands Reference Manual s3.6
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone)]
#[repr(C)]
pub struct Inquiry {
    pub operation_code: u8,
    pub evpd: u8,
    pub page_code: u8,
    pub allocation_length: ScsiU16,
    pub control: u8,
}

impl Inquiry {
    pub fn new(lun: u8, len: u16) -> Self {
        assert!(core::mem::size_of::<Self>() == 6);
        Self {
            operation_code: INQUIRY,
            evpd: lun_bits(lun),
            page_code: 0,
            allocation_length: ScsiU16::new(len),
            control: 0,
        }
    }
}

// SAFETY: all fields zeroable
unsafe impl bytemuck::Zeroable for Inquiry {}
// SAFETY: no padding, no disallowed bit patterns
unsafe impl bytemuck::Pod for Inquiry {}

/// Standard INQUIRY data
/// Seagate SCSI Commands Reference Manual s3.6.2
///
/// This is the compulsory leading 36 bytes; the actual data might be
/// larger (but the device truncates it, and tells us that it's done
/// so via the "residue" field of the command status wrapper).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, Default)]
#[repr(C)]
pub struct StandardInquiryData {
    pub peripheral_device_type: u8,
    pub removable: u8,
    pub version: u8,
    pub data_format: u8,
    pub additional_length: u8,
    pub flags: [u8; 3],
    pub vendor_id: [u8; 8],
    pub product_id: [u8; 16],
    pub product_revision: [u8; 4],
}

// SAFETY: all fields zeroable
unsafe impl bytemuck::Zeroable for StandardInquiryData {}
// SAFETY: no padding, no disallowed bit patterns
unsafe impl bytemuck::Pod for StandardInquiryData {}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum PeripheralType {
    Disk,
    Sequential,
    Printer,
    Processor,
    WriteOnce,
    Optical,
    Scanner,
    OpticalMemory,
    Changer,
    Communications,
    Obsolete,
    StorageArray,
    EnclosureServices,
    SimplifiedDirect,
    OpticalCardReader,
    BridgeController,
    ObjectStorage,
    Automation,
    Reserved,
    WellKnownUnit,
    Other,
}

impl From<u8> for PeripheralType {
    /// Decode the low five bits of INQUIRY byte 0
    fn from(b: u8) -> Self {
        match b & 0x1F {
            0 => Self::Disk,
            1 => Self::Sequential,
            2 => Self::Printer,
            3 => Self::Processor,
            4 => Self::WriteOnce,
            5 => Self::Optical,
            6 => Self::Scanner,
            7 => Self::OpticalMemory,
            8 => Self::Changer,
            9 => Self::Communications,
            0xA | 0xB => Self::Obsolete,
            0xC => Self::StorageArray,
            0xD => Self::EnclosureServices,
            0xE => Self::SimplifiedDirect,
            0xF => Self::OpticalCardReader,
            0x10 => Self::BridgeController,
            0x11 => Self::ObjectStorage,
            0x12 => Self::Automation,
            0x1E => Self::WellKnownUnit,
            0x1F => Self::Other,
            _ => Self::Reserved,
        }
    }
}

/// The interesting parts of the standard INQUIRY data
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct InquiryData {
    pub peripheral_type: PeripheralType,
    pub is_removable: bool,
    /// T10 vendor identification, space-padded ASCII
    pub vendor_id: [u8; 8],
    /// Product identification, space-padded ASCII
    pub product_id: [u8; 16],
    /// Product revision level, space-padded ASCII
    pub revision: [u8; 4],
}

impl From<&StandardInquiryData> for InquiryData {
    fn from(reply: &StandardInquiryData) -> Self {
        Self {
            peripheral_type: PeripheralType::from(
                reply.peripheral_device_type,
            ),
            is_removable: (reply.removable & 0x80) != 0,
            vendor_id: reply.vendor_id,
            product_id: reply.product_id,
            revision: reply.product_revision,
        }
    }
}

/// View a space-padded INQUIRY field as a string, if it's valid UTF-8
///
/// Trailing spaces and NULs (some devices pad with those instead) are
/// removed.
pub fn ascii_field(field: &[u8]) -> Option<&str> {
    str::from_utf8(field)
        .ok()
        .map(|s| s.trim_end_matches([' ', '\0']))
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/commands.rs"]
mod tests;
