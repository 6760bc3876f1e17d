use super::MassStorage;
use crate::config::RetryPolicy;
use crate::debug;
use crate::error::Error;
use bot_scsi::commands::{
    ascii_field, Inquiry, InquiryData, Read10, ReadCapacity10,
    ReadCapacity10Reply, RequestSense, RequestSenseReply,
    StandardInquiryData, TestUnitReady, Write10, INQUIRY_LEN,
    READ_CAPACITY_10_LEN,
};
use bot_scsi::sense::SenseData;
use bot_usb_host::types::UsbError;
use bot_usb_host::usb_host::UsbHost;
use core::future::Future;

/// The bytes of sense data up to and including the ASCQ
const MIN_SENSE_LEN: usize = 14;

impl<H: UsbHost, F> MassStorage<'_, H, F> {
    /// Number of blocks in `len` bytes, if that's a whole number that
    /// READ (10) and WRITE (10) can express
    pub(super) fn block_count(&self, len: usize) -> Result<u16, Error> {
        let size = self.lba_size as usize;
        if size == 0 || len % size != 0 {
            debug::println!("msc: {} bytes isn't whole blocks of {}", len, size);
            return Err(Error::Parameter);
        }
        u16::try_from(len / size).map_err(|_| Error::Parameter)
    }

    /// REQUEST SENSE: why did the last command fail?
    ///
    /// Only one attempt is made; any failure, including CSW status 1,
    /// is returned.
    pub async fn request_sense(&mut self) -> Result<SenseData, Error> {
        let cmd = RequestSense::new(self.lun);
        let mut reply = RequestSenseReply::default();
        let n = self
            .transact_in(
                bytemuck::bytes_of(&cmd),
                bytemuck::bytes_of_mut(&mut reply),
            )
            .await?;
        if n < MIN_SENSE_LEN {
            return Err(Error::ProtocolError);
        }
        let sense = SenseData::from(&reply);
        if !sense.is_no_sense() {
            debug::println!("msc: sense {:?} {:?}", sense, sense.error());
        }
        Ok(sense)
    }

    /// Is the device still there and talking?
    ///
    /// Issues REQUEST SENSE and reports only whether that worked.
    pub async fn status(&mut self) -> Result<(), Error> {
        self.request_sense().await.map(|_| ())
    }

    /// TEST UNIT READY
    ///
    /// Fails with `CommandFailed` if the medium isn't ready; REQUEST
    /// SENSE says why.
    pub async fn test_unit_ready(&mut self) -> Result<(), Error> {
        let cmd = TestUnitReady::new();
        self.transact_none(bytemuck::bytes_of(&cmd)).await
    }

    /// Read whole blocks, starting at block `lba`, into `buf`
    ///
    /// `buf.len()` must be a multiple of the block size, and at most
    /// 65535 blocks; otherwise `Error::Parameter` is returned and
    /// nothing is sent to the device. Returns the number of bytes
    /// received, which is less than `buf.len()` if the device stalled
    /// part-way through but then reported success anyway.
    pub async fn read(
        &mut self,
        lba: u32,
        buf: &mut [u8],
    ) -> Result<usize, Error> {
        let count = self.block_count(buf.len())?;
        let cmd = Read10::new(self.lun, lba, count);
        self.transact_in(bytemuck::bytes_of(&cmd), buf).await
    }

    /// Write whole blocks, starting at block `lba`, from `buf`
    ///
    /// The same restrictions on `buf.len()` apply as for
    /// [`read()`](MassStorage::read). Returns the number of bytes sent.
    pub async fn write(&mut self, lba: u32, buf: &[u8]) -> Result<usize, Error> {
        let count = self.block_count(buf.len())?;
        let cmd = Write10::new(self.lun, lba, count);
        self.transact_out(bytemuck::bytes_of(&cmd), buf).await
    }
}

impl<H: UsbHost, D: Future<Output = ()>, F: Fn(usize) -> D>
    MassStorage<'_, H, F>
{
    /// After a failed attempt: ask for sense (which also clears a
    /// pending UNIT ATTENTION), then decide whether to go round again
    async fn after_failure(
        &mut self,
        policy: &RetryPolicy,
        attempt: u32,
    ) -> Result<(), Error> {
        match self.request_sense().await {
            Err(Error::Transport(UsbError::NoDevice)) => {
                return Err(Error::Transport(UsbError::NoDevice))
            }
            Err(_e) => {
                debug::println!("msc: sense failed {:?}", _e);
            }
            Ok(_) => {}
        }
        if attempt + 1 < policy.max_attempts && policy.delay_ms > 0 {
            (self.delay_ms)(policy.delay_ms as usize).await;
        }
        Ok(())
    }

    /// INQUIRY: what is this device?
    ///
    /// Retried as set by `Config::inquiry`, with REQUEST SENSE after
    /// each failure. On success, the vendor, product and revision
    /// strings are also kept in the session.
    pub async fn inquiry(&mut self) -> Result<InquiryData, Error> {
        let policy = self.config.inquiry;
        let cmd = Inquiry::new(self.lun, INQUIRY_LEN as u16);

        for attempt in 0..policy.max_attempts {
            let mut reply = StandardInquiryData::default();
            let rc = self
                .transact_in(
                    bytemuck::bytes_of(&cmd),
                    bytemuck::bytes_of_mut(&mut reply),
                )
                .await;
            match rc {
                Ok(n) if n >= INQUIRY_LEN => {
                    let data = InquiryData::from(&reply);
                    self.vendor_id = data.vendor_id;
                    self.product_id = data.product_id;
                    self.revision = data.revision;
                    if let (Some(_v), Some(_p), Some(_r)) = (
                        ascii_field(&data.vendor_id),
                        ascii_field(&data.product_id),
                        ascii_field(&data.revision),
                    ) {
                        debug::println!("msc: {} {} {}", _v, _p, _r);
                    }
                    return Ok(data);
                }
                Ok(_n) => {
                    debug::println!("msc: inquiry short {}", _n);
                }
                Err(Error::Transport(UsbError::NoDevice)) => {
                    return Err(Error::Transport(UsbError::NoDevice))
                }
                Err(_e) => {
                    debug::println!("msc: inquiry {:?}", _e);
                }
            }
            self.after_failure(&policy, attempt).await?;
        }
        Err(Error::RetriesExhausted)
    }

    /// READ CAPACITY (10): how many blocks, and how big?
    ///
    /// Retried as set by `Config::read_capacity`, with REQUEST SENSE
    /// after each failure; a block size of zero counts as a failure.
    /// The session's capacity is zeroed first, and only set once the
    /// command succeeds. Returns `(lba_count, lba_size)`.
    pub async fn read_capacity(&mut self) -> Result<(u32, u32), Error> {
        let policy = self.config.read_capacity;
        let cmd = ReadCapacity10::new(self.lun);
        self.lba_count = 0;
        self.lba_size = 0;

        for attempt in 0..policy.max_attempts {
            let mut reply = ReadCapacity10Reply::default();
            let rc = self
                .transact_in(
                    bytemuck::bytes_of(&cmd),
                    bytemuck::bytes_of_mut(&mut reply),
                )
                .await;
            match rc {
                Ok(n) if n >= READ_CAPACITY_10_LEN
                    && reply.block_size.get() != 0 =>
                {
                    self.lba_count = reply.lba.get();
                    self.lba_size = reply.block_size.get();
                    debug::println!(
                        "msc: {} blocks of {}",
                        self.lba_count,
                        self.lba_size
                    );
                    return Ok((self.lba_count, self.lba_size));
                }
                Ok(_n) => {
                    debug::println!("msc: capacity bad reply {}", _n);
                }
                Err(Error::Transport(UsbError::NoDevice)) => {
                    return Err(Error::Transport(UsbError::NoDevice))
                }
                Err(_e) => {
                    debug::println!("msc: capacity {:?}", _e);
                }
            }
            self.after_failure(&policy, attempt).await?;
        }
        Err(Error::RetriesExhausted)
    }
}

#[cfg(all(test, feature = "std"))]
#[path = "../tests/scsi.rs"]
mod tests;
