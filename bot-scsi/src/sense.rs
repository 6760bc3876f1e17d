use crate::commands::RequestSenseReply;

/// Errors which can be returned over SCSI protocol from the SCSI device
///
/// As opposed to errors detected on the host such as transport errors.
///
/// See Seagate SCSI commands reference s2.4.1.5, 2.4.1.6
///
/// Many of these errors are obscure and/or catastrophic -- hopefully you
/// will never see `ScsiError::Overheat` -- but some are reasonable and
/// common: a USB card reader with no card in it reports `NotReady`, and
/// one whose card has just been inserted reports `UnitAttention`.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
#[non_exhaustive]
pub enum ScsiError {
    BecomingReady,
    StartUnitRequired,
    ManualInterventionRequired,
    FormatInProgress,
    SelfTestInProgress,
    PowerCycleRequired,
    Overheat,
    EnclosureDegraded,
    WriteError,
    WriteReallocationFailed,
    UnrecoveredReadError,
    ReadRetriesExhausted,
    ReadErrorTooLong,
    ReadReallocationFailed,
    LogicalBlockNotFound,
    RecordNotFound,
    InvalidFieldInParameterList,
    ParameterNotSupported,
    ParameterValueInvalid,
    LogicalUnitSelfTestFailed,
    SelfTestFailed,

    PositioningError,
    ParameterListLengthError,
    MiscompareDuringVerify,
    /// The device does not implement this command
    InvalidCommandOperationCode,
    LogicalBlockAddressOutOfRange,
    /// Something is incorrect in the command block itself
    InvalidFieldInCDB,
    LogicalUnitNotSupported,
    /// No medium (e.g. a card reader with no card in it)
    MediumNotPresent,

    NotReady,
    MediumError,
    HardwareError,
    IllegalRequest,
    /// Something has happened to this device that means it should be
    /// re-evaluted (e.g. CD-ROM insertion or ejection)
    UnitAttention,
    /// A write was attempted to a read-only device (or similar)
    DataProtect,
    BlankCheck,
    VendorSpecific,
    CopyAborted,
    Aborted,
    VolumeOverflow,
    Miscompare,
}

// (sense key, ASC, ASCQ)
const ERRORS3: &[(u8, u8, u8, ScsiError)] = &[
    (2, 4, 1, ScsiError::BecomingReady),
    (2, 4, 2, ScsiError::StartUnitRequired),
    (2, 4, 3, ScsiError::ManualInterventionRequired),
    (2, 4, 4, ScsiError::FormatInProgress),
    (2, 4, 9, ScsiError::SelfTestInProgress),
    (2, 4, 0x22, ScsiError::PowerCycleRequired),
    (1, 0x0B, 0x01, ScsiError::Overheat),
    (1, 0x0B, 0x02, ScsiError::EnclosureDegraded),
    (3, 0x0C, 0x00, ScsiError::WriteError),
    (3, 0x0C, 0x02, ScsiError::WriteReallocationFailed),
    (1, 0x11, 0x00, ScsiError::UnrecoveredReadError),
    (1, 0x11, 0x01, ScsiError::ReadRetriesExhausted),
    (1, 0x11, 0x02, ScsiError::ReadErrorTooLong),
    (3, 0x11, 0x04, ScsiError::ReadReallocationFailed),
    (3, 0x14, 0x00, ScsiError::LogicalBlockNotFound),
    (3, 0x14, 0x01, ScsiError::RecordNotFound),
    (5, 0x26, 0x00, ScsiError::InvalidFieldInParameterList),
    (5, 0x26, 0x01, ScsiError::ParameterNotSupported),
    (5, 0x26, 0x02, ScsiError::ParameterValueInvalid),
    (4, 0x3E, 0x03, ScsiError::LogicalUnitSelfTestFailed),
    (4, 0x42, 0x00, ScsiError::SelfTestFailed),
];

// (sense key, ASC)
const ERRORS2: &[(u8, u8, ScsiError)] = &[
    (3, 0x14, ScsiError::PositioningError),
    (5, 0x1A, ScsiError::ParameterListLengthError),
    (0xE, 0x1D, ScsiError::MiscompareDuringVerify),
    (5, 0x20, ScsiError::InvalidCommandOperationCode),
    (0xD, 0x21, ScsiError::LogicalBlockAddressOutOfRange),
    (5, 0x21, ScsiError::LogicalBlockAddressOutOfRange),
    (5, 0x24, ScsiError::InvalidFieldInCDB),
    (5, 0x25, ScsiError::LogicalUnitNotSupported),
    (2, 0x3A, ScsiError::MediumNotPresent),
];

// (sense key)
const ERRORS1: &[(u8, ScsiError)] = &[
    (2, ScsiError::NotReady),
    (3, ScsiError::MediumError),
    (4, ScsiError::HardwareError),
    (5, ScsiError::IllegalRequest),
    (6, ScsiError::UnitAttention),
    (7, ScsiError::DataProtect),
    (8, ScsiError::BlankCheck),
    (9, ScsiError::VendorSpecific),
    (10, ScsiError::CopyAborted),
    (11, ScsiError::Aborted),
    (13, ScsiError::VolumeOverflow),
    (14, ScsiError::Miscompare),
];

/// The three numbers that say what went wrong with the last command
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct SenseData {
    pub sense_key: u8,
    pub additional_sense_code: u8,
    pub additional_sense_code_qualifier: u8,
}

impl SenseData {
    pub fn new(sense_key: u8, asc: u8, ascq: u8) -> Self {
        Self {
            sense_key: sense_key & 0xF,
            additional_sense_code: asc,
            additional_sense_code_qualifier: ascq,
        }
    }

    /// Sense key zero: nothing to report
    pub fn is_no_sense(&self) -> bool {
        self.sense_key == 0
    }

    /// Decode into the most specific `ScsiError` that matches
    ///
    /// Returns `None` for "no sense" and "recovered error", and for
    /// sense keys this table doesn't know.
    pub fn error(&self) -> Option<ScsiError> {
        let key = self.sense_key;
        let asc = self.additional_sense_code;
        let ascq = self.additional_sense_code_qualifier;

        ERRORS3
            .iter()
            .find(|e| e.0 == key && e.1 == asc && e.2 == ascq)
            .map(|e| e.3)
            .or_else(|| {
                ERRORS2
                    .iter()
                    .find(|e| e.0 == key && e.1 == asc)
                    .map(|e| e.2)
            })
            .or_else(|| ERRORS1.iter().find(|e| e.0 == key).map(|e| e.1))
    }
}

impl From<&RequestSenseReply> for SenseData {
    fn from(r: &RequestSenseReply) -> Self {
        Self::new(
            r.sense_key,
            r.additional_sense_code,
            r.additional_sense_code_qualifier,
        )
    }
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/sense.rs"]
mod tests;
