//! Core types for the BER TLV codec
//!
//! This crate provides the error taxonomy and the per-decoder configuration
//! shared by the codec and transport crates.

pub mod config;
pub mod error;

pub use config::{CodecConfig, TransportSettings};
pub use error::{BerError, BerResult};
