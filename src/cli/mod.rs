#![forbid(unsafe_code)]

//! Command-line support code for the `bstream` binary.
//!
//! Converts between CSV/JSON row files and encoded streams.

/// CSV and JSON import/export against a row schema.
pub mod import_export;
