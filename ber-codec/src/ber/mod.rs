//! BER (Basic Encoding Rules) tag-length-value codec
//!
//! This module turns a byte stream into a tree of typed packets and back
//! again, as used by directory-protocol (LDAP-style) authentication traffic.
//!
//! # ASN.1 BER Encoding Overview
//!
//! Each value is encoded as a TLV (Tag-Length-Value) triplet:
//!
//! ```text
//! [Tag] [Length] [Value]
//! ```
//!
//! ## Tag Encoding
//!
//! One header byte:
//! - **Class** (2 bits): Universal (00), Application (01), Context-specific (10), Private (11)
//! - **Constructed/Primitive** (1 bit): 0 = Primitive, 1 = Constructed
//! - **Tag Number** (5 bits): 0-30
//!
//! The high-tag-number form (all five tag bits set) is not supported and is
//! rejected with [`BerError::UnsupportedTag`](ber_core::BerError::UnsupportedTag).
//!
//! ## Length Encoding
//!
//! - **Short form** (1 byte): lengths 0-127
//! - **Long form**: `0x80 | N` followed by N big-endian length bytes
//!
//! Only definite lengths are supported.
//!
//! ## Value Encoding
//!
//! - **Primitive types**: content bytes (INTEGER, OCTET STRING, etc.)
//! - **Constructed types**: a sequence of nested TLVs (SEQUENCE, SET, application operations)
//!
//! # Data Flow
//!
//! Decode: bytes → [`PacketReader`] (one complete frame) → [`BerDecoder`] → [`Packet`] tree.
//!
//! Encode: constructors build a [`Packet`] tree top-down, attaching children
//! through [`Constructed::append_child`]; [`Packet::to_bytes`] serializes it.
//!
//! # Implementation Notes
//!
//! 1. Integers are unsigned. `decode_integer` wraps modulo 2^64 on inputs
//!    longer than 8 bytes.
//! 2. No DER canonical-form checks: non-minimal long-form lengths decode fine.
//! 3. Constructed content is never stored twice; it is derived from the
//!    children when serialized.

pub mod decoder;
pub mod dump;
pub mod frame;
pub mod integer;
pub mod packet;
pub mod reader;
pub mod types;
pub mod value;

pub use decoder::{BerDecoder, decode_packet, decode_with_remainder};
pub use dump::hex_dump;
pub use frame::{FrameHeader, check_content_length, frame_length};
pub use integer::{decode_integer, encode_integer};
pub use packet::{Constructed, Packet};
pub use reader::{PacketReader, read_packet};
pub use types::{BerLength, BerTag, BerTagClass, TagNumber, UniversalTag};
pub use value::Value;
