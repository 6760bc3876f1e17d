#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod debug;
pub mod types;
pub mod usb_host;
pub mod wire;

#[cfg(feature = "std")]
pub mod mocks;
