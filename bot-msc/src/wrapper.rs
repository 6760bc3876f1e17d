//! Command Block Wrapper and Command Status Wrapper
//!
//! USB MSC BOT 1.0 s5.1, s5.2. Unlike the SCSI command blocks they
//! carry, the wrappers' multi-byte fields are little-endian. They are
//! serialised field by field rather than overlaid on the buffer, so the
//! 31-byte CBW needs no padding tricks.

use bot_usb_host::types::Direction;

pub const CBW_SIGNATURE: u32 = 0x4342_5355; // "USBC"
pub const CSW_SIGNATURE: u32 = 0x5342_5355; // "USBS"
pub const CBW_LEN: usize = 31;
pub const CSW_LEN: usize = 13;
pub const MAX_CDB_LEN: usize = 16;

/// bmCBWFlags bit 7: data phase is device-to-host
pub const FLAG_DATA_IN: u8 = 0x80;

pub fn to_usb_u32(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

pub fn from_usb_u32(bytes: [u8; 4]) -> u32 {
    u32::from_le_bytes(bytes)
}

pub fn to_usb_u16(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

pub fn from_usb_u16(bytes: [u8; 2]) -> u16 {
    u16::from_le_bytes(bytes)
}

fn usb_u32_at(buf: &[u8], offset: usize) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&buf[offset..offset + 4]);
    from_usb_u32(b)
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct CommandBlockWrapper {
    pub tag: u32,
    pub data_transfer_length: u32,
    pub direction: Direction,
    /// Only the low four bits are sent
    pub lun: u8,
    cdb_length: u8,
    cdb: [u8; MAX_CDB_LEN],
}

impl CommandBlockWrapper {
    /// Wrap a SCSI command block
    ///
    /// Returns `None` unless the command block is 1-16 bytes long.
    pub fn new(
        tag: u32,
        lun: u8,
        data_transfer_length: u32,
        direction: Direction,
        cdb: &[u8],
    ) -> Option<Self> {
        let len = cdb.len();
        if len == 0 || len > MAX_CDB_LEN {
            return None;
        }
        let mut cbw = Self {
            tag,
            data_transfer_length,
            direction,
            lun: lun & 0xF,
            cdb_length: len as u8,
            cdb: [0u8; MAX_CDB_LEN],
        };
        cbw.cdb[..len].copy_from_slice(cdb);
        Some(cbw)
    }

    /// The wrapped command block, without its zero padding
    pub fn cdb(&self) -> &[u8] {
        &self.cdb[..self.cdb_length as usize]
    }

    pub fn flags(&self) -> u8 {
        match self.direction {
            Direction::In => FLAG_DATA_IN,
            Direction::Out => 0,
        }
    }

    pub fn to_bytes(&self) -> [u8; CBW_LEN] {
        let mut b = [0u8; CBW_LEN];
        b[0..4].copy_from_slice(&to_usb_u32(CBW_SIGNATURE));
        b[4..8].copy_from_slice(&to_usb_u32(self.tag));
        b[8..12].copy_from_slice(&to_usb_u32(self.data_transfer_length));
        b[12] = self.flags();
        b[13] = self.lun;
        b[14] = self.cdb_length;
        b[15..].copy_from_slice(&self.cdb);
        b
    }

    /// Parse a CBW, as a device would
    ///
    /// Returns `None` if the buffer is short, the signature is wrong,
    /// or the command-block length is out of range (BOT s6.2.1).
    pub fn from_bytes(b: &[u8]) -> Option<Self> {
        if b.len() < CBW_LEN || usb_u32_at(b, 0) != CBW_SIGNATURE {
            return None;
        }
        let cdb_length = b[14] & 0x1F;
        if cdb_length == 0 || cdb_length as usize > MAX_CDB_LEN {
            return None;
        }
        let mut cdb = [0u8; MAX_CDB_LEN];
        cdb.copy_from_slice(&b[15..CBW_LEN]);
        Some(Self {
            tag: usb_u32_at(b, 4),
            data_transfer_length: usb_u32_at(b, 8),
            direction: Direction::from_address(b[12]),
            lun: b[13] & 0xF,
            cdb_length,
            cdb,
        })
    }
}

/// bCSWStatus, BOT s5.2 table 5.3
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum CswStatus {
    Passed,
    Failed,
    PhaseError,
    Reserved(u8),
}

impl From<u8> for CswStatus {
    fn from(b: u8) -> Self {
        match b {
            0 => Self::Passed,
            1 => Self::Failed,
            2 => Self::PhaseError,
            n => Self::Reserved(n),
        }
    }
}

impl From<CswStatus> for u8 {
    fn from(s: CswStatus) -> Self {
        match s {
            CswStatus::Passed => 0,
            CswStatus::Failed => 1,
            CswStatus::PhaseError => 2,
            CswStatus::Reserved(n) => n,
        }
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct CommandStatusWrapper {
    pub signature: u32,
    pub tag: u32,
    /// Bytes the device did not transfer (or did not process)
    pub data_residue: u32,
    pub status: CswStatus,
}

impl CommandStatusWrapper {
    pub fn new(tag: u32, data_residue: u32, status: CswStatus) -> Self {
        Self {
            signature: CSW_SIGNATURE,
            tag,
            data_residue,
            status,
        }
    }

    /// Returns `None` only if fewer than 13 bytes were received
    ///
    /// A wrong signature is kept, so that the caller can see (and log)
    /// what the device actually sent.
    pub fn from_bytes(b: &[u8]) -> Option<Self> {
        if b.len() < CSW_LEN {
            return None;
        }
        Some(Self {
            signature: usb_u32_at(b, 0),
            tag: usb_u32_at(b, 4),
            data_residue: usb_u32_at(b, 8),
            status: CswStatus::from(b[12]),
        })
    }

    pub fn to_bytes(&self) -> [u8; CSW_LEN] {
        let mut b = [0u8; CSW_LEN];
        b[0..4].copy_from_slice(&to_usb_u32(self.signature));
        b[4..8].copy_from_slice(&to_usb_u32(self.tag));
        b[8..12].copy_from_slice(&to_usb_u32(self.data_residue));
        b[12] = self.status.into();
        b
    }

    pub fn has_valid_signature(&self) -> bool {
        self.signature == CSW_SIGNATURE
    }

    /// Is this a valid CSW for the CBW with this tag? (BOT s6.3.1)
    pub fn is_valid_for(&self, tag: u32) -> bool {
        self.has_valid_signature() && self.tag == tag
    }
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/wrapper.rs"]
mod tests;
