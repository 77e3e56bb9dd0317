#![deny(unused_extern_crates)]
#![deny(unused_allocation)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![allow(clippy::new_ret_no_self)]
#![allow(clippy::type_complexity)]

//! Amazon Timestream sink for structured log records.

#[macro_use]
extern crate tracing;

#[macro_use]
pub mod internal_events;

pub mod app;
pub mod aws;
pub mod cli;
pub mod codecs;
pub mod config;
pub mod event;
pub mod metrics;
pub mod sensitive_string;
pub mod serde;
pub mod sinks;
pub mod tls;
pub mod trace;

pub use self::sensitive_string::SensitiveString;

/// The type of error returned by most of the crate's fallible operations.
pub type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The type of result returned by most of the crate's fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the version string reported by the CLI.
pub fn get_version() -> String {
    format!("{} ({})", built_info::PKG_VERSION, built_info::TARGET)
}

mod built_info {
    pub(crate) const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
    pub(crate) const TARGET: &str = std::env::consts::ARCH;
}
