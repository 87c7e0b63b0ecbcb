//! Rust implementation of the BER tag-length-value codec
//!
//! This library turns a byte stream into a tree of typed packets and back
//! again, as used by directory-protocol (LDAP-style) authentication traffic.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `ber-core`: Error taxonomy and codec configuration
//! - `ber-codec`: Integer codec, tag/length tables, packet tree, decoder, blocking reader
//! - `ber-transport`: Async packet streams with per-read and per-frame timeouts
//!
//! # Usage
//!
//! ```rust
//! use ber::{BerTagClass, Packet, TagNumber, UniversalTag, decode_packet};
//!
//! let mut request = Packet::sequence("LDAP Request");
//! request.append_child(Packet::integer(
//!     BerTagClass::Universal, false, UniversalTag::Integer, 1, "MessageID",
//! ));
//! request.append_child(
//!     Packet::constructed(BerTagClass::Application, TagNumber::new(0).unwrap(), "Bind Request")
//!         .with_child(Packet::integer(BerTagClass::Universal, false, UniversalTag::Integer, 3, "Version")),
//! );
//!
//! let bytes = request.to_bytes();
//! let decoded = decode_packet(&bytes)?;
//! assert_eq!(decoded.children().len(), 2);
//! assert_eq!(decoded.children()[1].children()[0].value().as_u64(), Some(3));
//! # Ok::<(), ber::BerError>(())
//! ```

// Re-export core types
pub use ber_core::{BerError, BerResult, CodecConfig, TransportSettings};

// Re-export the codec API
pub use ber_codec::ber::{
    BerDecoder, BerLength, BerTag, BerTagClass, Constructed, FrameHeader, Packet, PacketReader,
    TagNumber, UniversalTag, Value, decode_integer, decode_packet, decode_with_remainder, encode_integer, frame_length,
    hex_dump, read_packet,
};

// Re-export async transport
pub mod transport {
    pub use ber_transport::*;
}
