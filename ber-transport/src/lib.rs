//! Async transport for the BER TLV codec
//!
//! This crate frames BER packets over any tokio byte stream, with an explicit
//! read timeout instead of one baked into the codec.

pub mod io_stream;
pub mod packet_stream;
pub mod stream;

pub use ber_core::{BerError, BerResult, TransportSettings};
pub use io_stream::IoStream;
pub use packet_stream::PacketStream;
pub use stream::StreamAccessor;
