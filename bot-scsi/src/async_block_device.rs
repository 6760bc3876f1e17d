use core::future::Future;

/// Device size and granularity information
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    /// The total number of readable/writable blocks on the device
    pub blocks: u64,

    /// The size of each block in bytes
    pub block_size: u32,
}

impl DeviceInfo {
    /// The total size of the device in bytes
    pub fn capacity(&self) -> u64 {
        self.blocks.saturating_mul(self.block_size as u64)
    }
}

/// A generic, asynchronous, read/write block device
///
/// A storage device that is only ever read or written in whole blocks
/// at block-aligned addresses. For USB sticks the block size is nearly
/// always 512 bytes; some hard drives use 4096.
///
/// Filesystem layers can be written against this trait without caring
/// what sort of transport lies underneath.
pub trait AsyncBlockDevice {
    /// The type of errors which this device can report
    type E;

    /// Return the capacity and block size of this device
    fn device_info(
        &mut self,
    ) -> impl Future<Output = Result<DeviceInfo, Self::E>>;

    /// Read `count` blocks, starting at block `offset` (0-based)
    ///
    /// `data` must be at least `count * block_size` bytes long, or an
    /// error is returned before anything is sent to the device.
    fn read_blocks(
        &mut self,
        offset: u64,
        count: u32,
        data: &mut [u8],
    ) -> impl Future<Output = Result<(), Self::E>>;

    /// Write `count` blocks, starting at block `offset` (0-based)
    ///
    /// `data` must be at least `count * block_size` bytes long, or an
    /// error is returned before anything is sent to the device.
    fn write_blocks(
        &mut self,
        offset: u64,
        count: u32,
        data: &[u8],
    ) -> impl Future<Output = Result<(), Self::E>>;
}
