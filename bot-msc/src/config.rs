/// How many times to try a command, and how long to wait in between
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first; at least 1
    pub max_attempts: u32,
    /// Wait between one failed attempt and the next
    pub delay_ms: u32,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, delay_ms: u32) -> Self {
        Self {
            max_attempts,
            delay_ms,
        }
    }
}

/// Per-session tunables
///
/// The defaults suit ordinary USB flash drives and card readers: in
/// particular, READ CAPACITY gets twenty tries a twentieth of a second
/// apart, because media that have only just been inserted (or have
/// only just spun up) fail it for a while.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Config {
    pub inquiry: RetryPolicy,
    pub read_capacity: RetryPolicy,
    /// Wait before touching a newly-configured device at all
    pub settle_delay_ms: u32,
    /// Wait before asking for the maximum LUN
    pub max_lun_delay_ms: u32,
    pub max_lun_timeout_ms: u32,
    /// Timeout for bulk transfers and Mass Storage Reset; 0 for none
    pub transfer_timeout_ms: u32,
    /// Insist that each CSW echo the tag of its CBW
    ///
    /// Turn this off for devices known to get it wrong.
    pub check_csw_tag: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inquiry: RetryPolicy::new(3, 0),
            read_capacity: RetryPolicy::new(20, 50),
            settle_delay_ms: 100,
            max_lun_delay_ms: 50,
            max_lun_timeout_ms: 500,
            transfer_timeout_ms: 0,
            check_csw_tag: true,
        }
    }
}
