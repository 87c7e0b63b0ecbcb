//! BER tag-length-value codec
//!
//! This crate provides the packet tree model, the recursive TLV decoder, the
//! encoder and a blocking length-prefixed reader.
//!
//! # TODO
//!
//! - [ ] Zero-copy decode from `bytes::Bytes` frames (children currently copy their content)

pub mod ber;

pub use ber::{
    BerDecoder, BerLength, BerTag, BerTagClass, Constructed, FrameHeader, Packet, PacketReader,
    TagNumber, UniversalTag, Value, decode_integer, decode_packet, decode_with_remainder,
    encode_integer, frame_length, read_packet,
};
pub use ber_core::{BerError, BerResult, CodecConfig};
