//! Multi-byte fields in "SCSI order"
//!
//! Everything inside a command descriptor block, and inside the data
//! the device sends back, is big-endian, whatever the host's byte
//! order and whatever the byte order of the transport wrapped around
//! it. These newtypes keep the wire representation as a byte array, so
//! that structures containing them have no padding and no alignment
//! requirements, and convert only at the edges.

/// A 16-bit field in SCSI (big-endian) byte order
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct ScsiU16([u8; 2]);

// SAFETY: all fields zeroable
unsafe impl bytemuck::Zeroable for ScsiU16 {}
// SAFETY: no padding, no disallowed bit patterns
unsafe impl bytemuck::Pod for ScsiU16 {}

impl ScsiU16 {
    /// Convert from host order
    pub const fn new(value: u16) -> Self {
        Self(value.to_be_bytes())
    }

    /// Convert to host order
    pub const fn get(self) -> u16 {
        u16::from_be_bytes(self.0)
    }

    /// The bytes as they appear on the wire
    pub const fn to_bytes(self) -> [u8; 2] {
        self.0
    }

    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }
}

impl From<u16> for ScsiU16 {
    fn from(value: u16) -> Self {
        Self::new(value)
    }
}

impl From<ScsiU16> for u16 {
    fn from(value: ScsiU16) -> Self {
        value.get()
    }
}

/// A 32-bit field in SCSI (big-endian) byte order
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct ScsiU32([u8; 4]);

// SAFETY: all fields zeroable
unsafe impl bytemuck::Zeroable for ScsiU32 {}
// SAFETY: no padding, no disallowed bit patterns
unsafe impl bytemuck::Pod for ScsiU32 {}

impl ScsiU32 {
    /// Convert from host order
    pub const fn new(value: u32) -> Self {
        Self(value.to_be_bytes())
    }

    /// Convert to host order
    pub const fn get(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// The bytes as they appear on the wire
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0
    }

    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl From<u32> for ScsiU32 {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<ScsiU32> for u32 {
    fn from(value: ScsiU32) -> Self {
        value.get()
    }
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/order.rs"]
mod tests;
