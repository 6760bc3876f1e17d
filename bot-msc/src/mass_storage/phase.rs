use super::{MassStorage, Phase};
use crate::debug;
use crate::error::Error;
use crate::wrapper::{
    CommandBlockWrapper, CommandStatusWrapper, CswStatus, CBW_LEN, CSW_LEN,
};
use bot_usb_host::types::{Direction, EndpointHandle, UsbError};
use bot_usb_host::usb_host::UsbHost;
use bot_usb_host::wire::CLEAR_FEATURE;

// The command/data/status sequencer (BOT s5.3, s6.6, s6.7).
//
// The CSW is read even after a failed data phase, unless the device
// has gone. A command that still fails without its CSW having been
// read leaves the session out of step with the device. The phase is
// left as it was, and the next command starts with reset recovery.

impl<H: UsbHost, F> MassStorage<'_, H, F> {
    /// Reset recovery (BOT s5.3.4)
    ///
    /// Mass Storage Reset, then clear the halt on bulk IN, then on bulk
    /// OUT. Every step is tried even if an earlier one fails; the first
    /// failure is returned, and the session stays in
    /// `Phase::ResetRecovery` so that the next command tries again.
    pub async fn reset_recovery(&mut self) -> Result<(), Error> {
        self.phase = Phase::ResetRecovery;
        debug::println!("msc: reset recovery");
        let reset = self.reset().await;
        let clear_in = self.clear_halt(self.bulk_in).await;
        let clear_out = self.clear_halt(self.bulk_out).await;
        let rc = reset.and(clear_in).and(clear_out);
        match rc {
            Ok(()) => self.phase = Phase::Idle,
            Err(_e) => {
                debug::println!("msc: reset recovery failed {:?}", _e);
            }
        }
        rc
    }

    /// Clear a halt on both the host side and the device side
    async fn clear_halt(&self, ep: EndpointHandle) -> Result<(), Error> {
        let host = self.host.clear_host_halt(ep);
        let device = self.host.endpoint_halt(ep, CLEAR_FEATURE).await;
        host.and(device).map_err(Error::Transport)
    }

    /// As `clear_halt`, but also discard anything queued on the endpoint
    async fn drain(&self, ep: EndpointHandle) -> Result<(), Error> {
        let host = self.host.clear_host_halt(ep);
        let queue = self.host.clear_endpoint_transfers(ep);
        let device = self.host.endpoint_halt(ep, CLEAR_FEATURE).await;
        host.and(queue).and(device).map_err(Error::Transport)
    }

    /// Get back in step before a new CBW, if the last command didn't
    /// finish
    async fn resync(&mut self) -> Result<(), Error> {
        if self.phase != Phase::Idle {
            debug::println!("msc: resync from {:?}", self.phase);
            self.reset_recovery().await?;
        }
        Ok(())
    }

    /// Send the CBW for a new command, with a fresh tag
    pub(super) async fn command_phase(
        &mut self,
        data_transfer_length: u32,
        direction: Direction,
        cdb: &[u8],
    ) -> Result<(), Error> {
        self.resync().await?;

        let tag = self.tag.wrapping_add(1);
        let cbw = CommandBlockWrapper::new(
            tag,
            self.lun,
            data_transfer_length,
            direction,
            cdb,
        )
        .ok_or(Error::Parameter)?;
        self.tag = tag;
        self.phase = Phase::SendCbw;
        let rc = self
            .host
            .bulk_out_transfer(
                self.bulk_out,
                &cbw.to_bytes(),
                self.config.transfer_timeout_ms,
            )
            .await;

        match rc {
            Ok(CBW_LEN) => {
                self.phase = match direction {
                    _ if data_transfer_length == 0 => Phase::ReadCsw,
                    Direction::In => Phase::DataIn,
                    Direction::Out => Phase::DataOut,
                };
                Ok(())
            }
            Ok(_n) => {
                debug::println!("msc: short CBW {}/{}", _n, CBW_LEN);
                let _ = self.reset_recovery().await;
                Err(Error::ProtocolError)
            }
            Err(e) if e.is_halt() => {
                debug::println!("msc: CBW {:?}", e);
                let _ = self.reset_recovery().await;
                Err(Error::Transport(e))
            }
            Err(e) => Err(Error::Transport(e)),
        }
    }

    /// Decide what a data-phase transfer error means
    ///
    /// Halts and bus errors are cleared and the command carries on to
    /// the status phase, as if no data had moved. Anything else, or a
    /// failure to clear the halt, fails the data phase; the status
    /// phase is still due (see `finish_failed`) unless the device has
    /// gone.
    async fn data_phase_error(
        &mut self,
        ep: EndpointHandle,
        e: UsbError,
    ) -> Result<usize, Error> {
        debug::println!("msc: data phase {:?}", e);
        let recovered = match e {
            UsbError::Halted | UsbError::Stall | UsbError::BusError => {
                self.clear_halt(ep).await
            }
            UsbError::DataBuffer => self.drain(ep).await,
            UsbError::NoDevice => return Err(Error::Transport(e)),
            _ => {
                self.phase = Phase::ReadCsw;
                return Err(Error::Transport(e));
            }
        };
        self.phase = Phase::ReadCsw;
        match recovered {
            Ok(()) => Ok(0),
            Err(_r) => {
                debug::println!("msc: data recovery failed {:?}", _r);
                Err(Error::Transport(e))
            }
        }
    }

    /// Complete a command whose data phase failed
    ///
    /// The CSW is read if it's due, so the session stays in step, but
    /// whatever it says, the data-phase error is what gets reported.
    pub(super) async fn finish_failed(&mut self, e: Error) -> Error {
        if self.phase == Phase::ReadCsw {
            if let Err(_s) = self.status_phase().await {
                debug::println!("msc: status after failed data {:?}", _s);
            }
        }
        e
    }

    /// One bulk-IN transfer's worth of data phase
    pub(super) async fn data_in(
        &mut self,
        buf: &mut [u8],
    ) -> Result<usize, Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.phase = Phase::DataIn;
        let rc = self
            .host
            .bulk_in_transfer(
                self.bulk_in,
                buf,
                self.config.transfer_timeout_ms,
            )
            .await;
        match rc {
            Ok(n) => Ok(n),
            Err(e) => self.data_phase_error(self.bulk_in, e).await,
        }
    }

    /// One bulk-OUT transfer's worth of data phase
    pub(super) async fn data_out(&mut self, buf: &[u8]) -> Result<usize, Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.phase = Phase::DataOut;
        let rc = self
            .host
            .bulk_out_transfer(
                self.bulk_out,
                buf,
                self.config.transfer_timeout_ms,
            )
            .await;
        match rc {
            Ok(n) => Ok(n),
            Err(e) => self.data_phase_error(self.bulk_out, e).await,
        }
    }

    fn csw_is_valid(&self, csw: &CommandStatusWrapper) -> bool {
        if self.config.check_csw_tag {
            csw.is_valid_for(self.tag)
        } else {
            csw.has_valid_signature()
        }
    }

    /// Read and act on the CSW; returns the residue
    pub(super) async fn status_phase(&mut self) -> Result<u32, Error> {
        self.phase = Phase::ReadCsw;
        let mut buf = [0u8; CSW_LEN];
        let mut rc = self
            .host
            .bulk_in_transfer(
                self.bulk_in,
                &mut buf,
                self.config.transfer_timeout_ms,
            )
            .await;

        if let Err(e) = rc {
            if e.is_halt() {
                debug::println!("msc: CSW {:?}, retrying", e);
                if self.clear_halt(self.bulk_in).await.is_err() {
                    return Err(Error::Transport(e));
                }
                rc = self
                    .host
                    .bulk_in_transfer(
                        self.bulk_in,
                        &mut buf,
                        self.config.transfer_timeout_ms,
                    )
                    .await;
            }
        }

        let n = rc?;
        let csw = match CommandStatusWrapper::from_bytes(&buf[..n.min(CSW_LEN)])
        {
            Some(csw) if self.csw_is_valid(&csw) => csw,
            _csw => {
                debug::println!("msc: bad CSW {:?} ({} bytes)", _csw, n);
                let _ = self.reset_recovery().await;
                return Err(Error::PhaseError);
            }
        };

        if csw.data_residue != 0 {
            debug::println!(
                "msc: status {:?} residue {}",
                csw.status,
                csw.data_residue
            );
        }

        self.phase = Phase::Idle;
        match csw.status {
            CswStatus::Passed => Ok(csw.data_residue),
            CswStatus::Failed => Err(Error::CommandFailed),
            CswStatus::PhaseError | CswStatus::Reserved(_) => {
                let _ = self.reset_recovery().await;
                Err(Error::PhaseError)
            }
        }
    }

    /// A whole command with a device-to-host data phase
    ///
    /// Returns the number of bytes received.
    pub(super) async fn transact_in(
        &mut self,
        cdb: &[u8],
        buf: &mut [u8],
    ) -> Result<usize, Error> {
        self.command_phase(buf.len() as u32, Direction::In, cdb)
            .await?;
        let n = match self.data_in(buf).await {
            Ok(n) => n,
            Err(e) => return Err(self.finish_failed(e).await),
        };
        self.status_phase().await?;
        Ok(n)
    }

    /// A whole command with a host-to-device data phase
    ///
    /// Returns the number of bytes sent.
    pub(super) async fn transact_out(
        &mut self,
        cdb: &[u8],
        buf: &[u8],
    ) -> Result<usize, Error> {
        self.command_phase(buf.len() as u32, Direction::Out, cdb)
            .await?;
        let n = match self.data_out(buf).await {
            Ok(n) => n,
            Err(e) => return Err(self.finish_failed(e).await),
        };
        self.status_phase().await?;
        Ok(n)
    }

    /// A whole command with no data phase
    pub(super) async fn transact_none(&mut self, cdb: &[u8]) -> Result<(), Error> {
        self.command_phase(0, Direction::Out, cdb).await?;
        self.status_phase().await?;
        Ok(())
    }
}

#[cfg(all(test, feature = "std"))]
#[path = "../tests/phase.rs"]
mod tests;
