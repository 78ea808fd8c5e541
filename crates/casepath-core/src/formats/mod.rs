//! # Formats Module
//!
//! Binary framing for session records and whole-store snapshots.
//! File I/O operations are in the app layer and in `storage`.

mod persistence;

pub use persistence::*;
