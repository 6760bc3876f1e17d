use super::MassStorage;
use crate::error::Error;
use bot_scsi::async_block_device::{AsyncBlockDevice, DeviceInfo};
use bot_usb_host::usb_host::UsbHost;
use core::future::Future;

impl<H: UsbHost, F> MassStorage<'_, H, F> {
    /// The first `count` blocks' worth of a buffer, if it's that big
    fn block_range(&self, count: u32, len: usize) -> Result<usize, Error> {
        let want = (count as usize)
            .checked_mul(self.lba_size as usize)
            .ok_or(Error::Parameter)?;
        if want > len {
            return Err(Error::Parameter);
        }
        Ok(want)
    }
}

impl<H: UsbHost, D: Future<Output = ()>, F: Fn(usize) -> D> AsyncBlockDevice
    for MassStorage<'_, H, F>
{
    type E = Error;

    async fn device_info(&mut self) -> Result<DeviceInfo, Self::E> {
        if self.lba_size == 0 {
            self.read_capacity().await?;
        }
        Ok(DeviceInfo {
            blocks: self.lba_count as u64,
            block_size: self.lba_size,
        })
    }

    async fn read_blocks(
        &mut self,
        offset: u64,
        count: u32,
        data: &mut [u8],
    ) -> Result<(), Self::E> {
        let lba = u32::try_from(offset).map_err(|_| Error::Parameter)?;
        let len = self.block_range(count, data.len())?;
        let n = self.read(lba, &mut data[..len]).await?;
        if n < len {
            return Err(Error::ProtocolError);
        }
        Ok(())
    }

    async fn write_blocks(
        &mut self,
        offset: u64,
        count: u32,
        data: &[u8],
    ) -> Result<(), Self::E> {
        let lba = u32::try_from(offset).map_err(|_| Error::Parameter)?;
        let len = self.block_range(count, data.len())?;
        let n = self.write(lba, &data[..len]).await?;
        if n < len {
            return Err(Error::ProtocolError);
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "std"))]
#[path = "../tests/block_device.rs"]
mod tests;
