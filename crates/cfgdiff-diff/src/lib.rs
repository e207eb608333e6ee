//! Diff engine for cfgdiff.
//!
//! Turns two command-line paths into comparison pairs and renders the line
//! difference between two canonical documents.
//!
//! # Key Types
//!
//! - [`DiffEngine`] / [`OutputMode`] -- Line diff rendered as context, unified, ndiff or HTML
//! - [`FilePair`] / [`PresenceMismatch`] -- One comparison, possibly with a side missing
//! - [`enumerate`] -- File and recursive directory pairing

pub mod engine;
pub mod error;
pub mod pairs;
pub mod render;

pub use engine::{DiffEngine, OutputMode, DEFAULT_CONTEXT_LINES};
pub use error::{DiffError, DiffResult};
pub use pairs::{enumerate, FilePair, PresenceMismatch};
