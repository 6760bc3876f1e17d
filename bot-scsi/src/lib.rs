#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod async_block_device;
pub use async_block_device::{AsyncBlockDevice, DeviceInfo};
pub mod commands;
pub use commands::{InquiryData, PeripheralType};
pub mod order;
pub use order::{ScsiU16, ScsiU32};
pub mod sense;
pub use sense::{ScsiError, SenseData};
