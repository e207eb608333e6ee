//! Foundation types for cfgdiff.
//!
//! Every other cfgdiff crate depends on `cfgdiff-types`. The types here are
//! deliberately small and closed: the set of formats is fixed, and a
//! comparison side is either a real path or the sentinel absent source.
//!
//! # Key Types
//!
//! - [`FormatId`] — One of the seven input formats cfgdiff understands
//! - [`OrderingMode`] — Sorted (canonical) vs. original declaration order
//! - [`Source`] — A file path or the sentinel "absent" side of a comparison

pub mod error;
pub mod format;
pub mod source;

pub use error::TypeError;
pub use format::{FormatId, OrderingMode};
pub use source::{Source, ABSENT_PATH};
