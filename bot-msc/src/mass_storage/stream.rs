use super::MassStorage;
use crate::error::Error;
use bot_scsi::commands::{Read10, Write10};
use bot_usb_host::types::Direction;
use bot_usb_host::usb_host::UsbHost;

/// A READ (10) whose data phase is being received piecemeal
///
/// Created by [`MassStorage::mult_read_start()`]. The CBW has already
/// been sent; call [`data()`](MultRead::data) as many times as needed
/// to receive the data, then [`end()`](MultRead::end) to read the
/// device's status. While this exists it holds the session, so no
/// other command can be started in the middle.
///
/// If a `MultRead` is dropped without `end()`, the next command on the
/// session starts with reset recovery.
pub struct MultRead<'s, 'a, H: UsbHost, F> {
    ms: &'s mut MassStorage<'a, H, F>,
    remaining: usize,
}

/// A WRITE (10) whose data phase is being sent piecemeal
///
/// The writing counterpart of [`MultRead`].
pub struct MultWrite<'s, 'a, H: UsbHost, F> {
    ms: &'s mut MassStorage<'a, H, F>,
    remaining: usize,
}

impl<H: UsbHost, F> MultRead<'_, '_, H, F> {
    /// Receive the next piece of data
    ///
    /// `buf.len()` must be a whole number of blocks, and no more than
    /// is still outstanding. Returns the number of bytes received; if
    /// that's less than `buf.len()`, the device has ended the data
    /// phase early and only `end()` remains. The same goes after a
    /// transfer error.
    pub async fn data(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        self.ms.block_count(buf.len())?;
        if buf.len() > self.remaining {
            return Err(Error::Parameter);
        }
        let n = match self.ms.data_in(buf).await {
            Ok(n) => n,
            Err(e) => {
                self.remaining = 0;
                return Err(e);
            }
        };
        self.remaining = if n < buf.len() {
            0
        } else {
            self.remaining - buf.len()
        };
        Ok(n)
    }

    /// Bytes still expected in the data phase
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Read the CSW, completing the command
    ///
    /// Ending early, with data still outstanding, is allowed: the
    /// device is expected to report the shortfall as residue.
    pub async fn end(self) -> Result<(), Error> {
        self.ms.status_phase().await.map(|_| ())
    }

    async fn fail(self, e: Error) -> Error {
        self.ms.finish_failed(e).await
    }
}

impl<H: UsbHost, F> MultWrite<'_, '_, H, F> {
    /// Send the next piece of data
    ///
    /// Same rules on `buf.len()` as for [`MultRead::data()`]. Returns
    /// the number of bytes sent.
    pub async fn data(&mut self, buf: &[u8]) -> Result<usize, Error> {
        self.ms.block_count(buf.len())?;
        if buf.len() > self.remaining {
            return Err(Error::Parameter);
        }
        let n = match self.ms.data_out(buf).await {
            Ok(n) => n,
            Err(e) => {
                self.remaining = 0;
                return Err(e);
            }
        };
        self.remaining = if n < buf.len() {
            0
        } else {
            self.remaining - buf.len()
        };
        Ok(n)
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Read the CSW, completing the command
    pub async fn end(self) -> Result<(), Error> {
        self.ms.status_phase().await.map(|_| ())
    }

    async fn fail(self, e: Error) -> Error {
        self.ms.finish_failed(e).await
    }
}

impl<'a, H: UsbHost, F> MassStorage<'a, H, F> {
    /// Start a READ (10) of `len` bytes from block `lba`
    ///
    /// Only the CBW is sent. `len` has the same restrictions as in
    /// [`read()`](MassStorage::read).
    pub async fn mult_read_start(
        &mut self,
        lba: u32,
        len: usize,
    ) -> Result<MultRead<'_, 'a, H, F>, Error> {
        let count = self.block_count(len)?;
        let cmd = Read10::new(self.lun, lba, count);
        self.command_phase(len as u32, Direction::In, bytemuck::bytes_of(&cmd))
            .await?;
        Ok(MultRead {
            ms: self,
            remaining: len,
        })
    }

    /// Start a WRITE (10) of `len` bytes to block `lba`
    pub async fn mult_write_start(
        &mut self,
        lba: u32,
        len: usize,
    ) -> Result<MultWrite<'_, 'a, H, F>, Error> {
        let count = self.block_count(len)?;
        let cmd = Write10::new(self.lun, lba, count);
        self.command_phase(
            len as u32,
            Direction::Out,
            bytemuck::bytes_of(&cmd),
        )
        .await?;
        Ok(MultWrite {
            ms: self,
            remaining: len,
        })
    }

    /// Read `len` bytes from block `lba`, a bufferful at a time
    ///
    /// The data phase is received into `scratch` (rounded down to a
    /// whole number of blocks) as often as needed, and each piece is
    /// passed to `sink`. This allows large reads with little memory.
    /// Returns the total number of bytes received.
    pub async fn read_chunked<S: FnMut(&[u8])>(
        &mut self,
        lba: u32,
        len: usize,
        scratch: &mut [u8],
        mut sink: S,
    ) -> Result<usize, Error> {
        let chunk = self.whole_blocks(scratch.len())?;
        let mut stream = self.mult_read_start(lba, len).await?;
        let mut total = 0;
        while stream.remaining() > 0 {
            let want = chunk.min(stream.remaining());
            let n = match stream.data(&mut scratch[..want]).await {
                Ok(n) => n,
                Err(e) => return Err(stream.fail(e).await),
            };
            sink(&scratch[..n]);
            total += n;
        }
        stream.end().await?;
        Ok(total)
    }

    /// Write `len` bytes to block `lba`, a bufferful at a time
    ///
    /// `source` is asked to fill `scratch` (rounded down to a whole
    /// number of blocks), or the end of it, as often as needed. Returns
    /// the total number of bytes sent.
    pub async fn write_chunked<S: FnMut(&mut [u8])>(
        &mut self,
        lba: u32,
        len: usize,
        scratch: &mut [u8],
        mut source: S,
    ) -> Result<usize, Error> {
        let chunk = self.whole_blocks(scratch.len())?;
        let mut stream = self.mult_write_start(lba, len).await?;
        let mut total = 0;
        while stream.remaining() > 0 {
            let want = chunk.min(stream.remaining());
            source(&mut scratch[..want]);
            match stream.data(&scratch[..want]).await {
                Ok(n) => total += n,
                Err(e) => return Err(stream.fail(e).await),
            }
        }
        stream.end().await?;
        Ok(total)
    }

    /// The largest whole number of blocks (at least one) that fits
    fn whole_blocks(&self, len: usize) -> Result<usize, Error> {
        let size = self.lba_size as usize;
        if size == 0 || len < size {
            return Err(Error::Parameter);
        }
        Ok(len - len % size)
    }
}

#[cfg(all(test, feature = "std"))]
#[path = "../tests/stream.rs"]
mod tests;
