use bot_usb_host::types::UsbError;

/// Errors from mass-storage operations
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The caller asked for something impossible: a length that isn't
    /// a whole number of blocks, a LUN the device hasn't got, or a read
    /// before the block size is known. Nothing was sent to the device.
    Parameter,

    /// The device isn't a working bulk-only mass-storage device: no
    /// bulk endpoints, or it refused Get Max LUN.
    ClassNotSupported,

    /// A USB transfer failed, and recovery (if any) didn't save it
    Transport(UsbError),

    /// The device reported that the command failed (CSW status 1)
    ///
    /// REQUEST SENSE will say why.
    CommandFailed,

    /// The device lost track of the protocol (CSW status 2, or an
    /// invalid CSW). Reset recovery has already been done.
    PhaseError,

    /// INQUIRY or READ CAPACITY failed on every attempt allowed by
    /// its [`RetryPolicy`](crate::RetryPolicy)
    RetriesExhausted,

    /// The device deviated from the protocol in some other way, such
    /// as replying with too little data
    ProtocolError,
}

impl From<UsbError> for Error {
    fn from(e: UsbError) -> Self {
        Error::Transport(e)
    }
}
