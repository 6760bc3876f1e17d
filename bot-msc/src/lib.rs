#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![allow(clippy::uninlined_format_args)]

pub mod config;
pub use config::{Config, RetryPolicy};
mod debug;
pub mod error;
pub use error::Error;
pub mod mass_storage;
pub use mass_storage::{
    IdentifyMassStorage, MassStorage, MultRead, MultWrite, Phase,
};
pub mod wrapper;
