#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/quarry/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cboe;
pub mod error;
pub mod french;
pub mod http;
pub mod table;
pub mod yahoo;

pub use error::{DataError, Result};
pub use http::HttpSettings;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
