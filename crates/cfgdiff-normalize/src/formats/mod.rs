//! Per-format normalizers.
//!
//! `ini` and `json` are always built; the remaining formats are behind Cargo
//! features of the same name.

pub mod ini;
pub mod json;

#[cfg(feature = "conf")]
pub mod conf;
#[cfg(feature = "reconf")]
pub mod reconf;
#[cfg(feature = "xml")]
pub mod xml;
#[cfg(feature = "yaml")]
pub mod yaml;
#[cfg(feature = "zone")]
pub mod zone;
