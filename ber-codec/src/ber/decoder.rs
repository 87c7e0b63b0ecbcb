//! Recursive TLV decoder
//!
//! Turns a buffer positioned at a TLV header into a [`Packet`] tree,
//! recursing into the content of constructed packets.
//!
//! # Usage Example
//!
//! ```rust
//! use ber_codec::ber::{decode_packet, BerDecoder};
//!
//! let packet = decode_packet(&[0x04, 0x02, b'h', b'i'])?;
//! assert_eq!(packet.value().as_str(), Some("hi"));
//!
//! // Sibling TLVs in one buffer
//! let data = [0x02, 0x01, 0x05, 0x01, 0x01, 0xFF];
//! let mut decoder = BerDecoder::new(&data);
//! let first = decoder.decode_packet()?;
//! let second = decoder.decode_packet()?;
//! assert_eq!(first.value().as_u64(), Some(5));
//! assert_eq!(second.value().as_bool(), Some(true));
//! assert!(!decoder.has_remaining());
//! # Ok::<(), ber_core::BerError>(())
//! ```

use crate::ber::dump::hex_dump;
use crate::ber::integer::decode_integer;
use crate::ber::packet::Packet;
use crate::ber::types::{BerLength, BerTag, UniversalTag};
use crate::ber::value::Value;
use ber_core::{BerError, BerResult, CodecConfig};
use bytes::Bytes;

/// BER decoder over an in-memory buffer
///
/// # Position Tracking
///
/// The decoder maintains a position pointer that advances as packets are
/// decoded, so sibling TLVs can be decoded one after the other. A failed
/// decode leaves the position where it was.
///
/// # Bounds
///
/// Every declared length is checked against the bytes actually left in the
/// buffer before it is used. Nesting is bounded by
/// [`CodecConfig::max_depth`].
#[derive(Debug, Clone)]
pub struct BerDecoder<'a> {
    buffer: &'a [u8],
    position: usize,
    config: CodecConfig,
}

impl<'a> BerDecoder<'a> {
    /// Create a decoder with the default configuration
    pub fn new(buffer: &'a [u8]) -> Self {
        Self::with_config(buffer, CodecConfig::default())
    }

    pub fn with_config(buffer: &'a [u8], config: CodecConfig) -> Self {
        Self {
            buffer,
            position: 0,
            config,
        }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Get current position in buffer
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get remaining byte count
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    pub fn has_remaining(&self) -> bool {
        self.position < self.buffer.len()
    }

    /// Bytes not yet consumed
    pub fn remainder(&self) -> &'a [u8] {
        self.buffer.get(self.position..).unwrap_or(&[])
    }

    fn read_byte(&mut self) -> BerResult<u8> {
        let byte = *self
            .buffer
            .get(self.position)
            .ok_or(BerError::truncated(1, 0))?;
        self.position += 1;
        Ok(byte)
    }

    fn read_bytes(&mut self, count: usize) -> BerResult<&'a [u8]> {
        let available = self.remaining();
        let bytes = self
            .position
            .checked_add(count)
            .and_then(|end| self.buffer.get(self.position..end))
            .ok_or(BerError::truncated(count, available))?;
        self.position += count;
        Ok(bytes)
    }

    /// Decode one TLV header and return the tag with its content slice
    ///
    /// The content is not interpreted. On error the position is unspecified;
    /// [`BerDecoder::decode_packet`] restores it.
    pub fn decode_tlv(&mut self) -> BerResult<(BerTag, &'a [u8])> {
        let tag = BerTag::from_byte(self.read_byte()?)?;

        let (length, consumed) = BerLength::decode(self.remainder())?;
        self.position += consumed;

        let content = self.read_bytes(length.value())?;
        Ok((tag, content))
    }

    /// Decode the next packet, including all nested children
    pub fn decode_packet(&mut self) -> BerResult<Packet> {
        let start = self.position;
        match self.decode_at_depth(0) {
            Ok(packet) => {
                if self.config.trace {
                    log::trace!(
                        "decoded packet ({}): {}",
                        packet.tag(),
                        hex_dump(self.buffer.get(start..self.position).unwrap_or_default())
                    );
                }
                Ok(packet)
            }
            Err(e) => {
                self.position = start;
                Err(e)
            }
        }
    }

    /// Skip a TLV, returning the number of bytes skipped
    pub fn skip_tlv(&mut self) -> BerResult<usize> {
        let start = self.position;
        match self.decode_tlv() {
            Ok(_) => Ok(self.position - start),
            Err(e) => {
                self.position = start;
                Err(e)
            }
        }
    }

    fn decode_at_depth(&mut self, depth: usize) -> BerResult<Packet> {
        let (tag, content) = self.decode_tlv()?;

        if !tag.is_constructed() {
            let value = match tag.universal_tag() {
                Some(universal) => decode_universal_value(universal, content),
                None => Value::None,
            };
            return Ok(Packet::from_primitive(tag, value, Bytes::copy_from_slice(content)));
        }

        if depth >= self.config.max_depth && !content.is_empty() {
            return Err(BerError::NestingTooDeep {
                max: self.config.max_depth,
            });
        }

        let mut children = Vec::new();
        let mut inner = BerDecoder::with_config(content, self.config);
        while inner.has_remaining() {
            children.push(inner.decode_at_depth(depth + 1)?);
        }

        Ok(Packet::from_children(tag, children))
    }
}

/// Typed value of a primitive Universal packet
///
/// Tags without a defined interpretation yield `Value::None`; their content
/// stays available through [`Packet::content`].
fn decode_universal_value(tag: UniversalTag, content: &[u8]) -> Value {
    match tag {
        UniversalTag::Boolean => Value::Bool(decode_integer(content) != 0),
        UniversalTag::Integer | UniversalTag::Enumerated => Value::UInt(decode_integer(content)),
        UniversalTag::OctetString | UniversalTag::PrintableString => Value::text_or_bytes(content),
        _ => Value::None,
    }
}

/// Decode the first packet in `data` with the default configuration
///
/// Bytes after the first TLV are ignored; use [`decode_with_remainder`] to
/// continue with sibling TLVs.
pub fn decode_packet(data: &[u8]) -> BerResult<Packet> {
    BerDecoder::new(data).decode_packet()
}

/// Decode the first packet in `data`, returning it with the bytes that follow it
pub fn decode_with_remainder(data: &[u8]) -> BerResult<(Packet, &[u8])> {
    let mut decoder = BerDecoder::new(data);
    let packet = decoder.decode_packet()?;
    Ok((packet, decoder.remainder()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::types::{BerTagClass, TagNumber};

    fn octet_string(text: &str) -> Packet {
        Packet::string(BerTagClass::Universal, false, UniversalTag::OctetString, text, "")
    }

    #[test]
    fn test_decode_octet_string() {
        let packet = decode_packet(&[0x04, 0x02, b'h', b'i']).unwrap();
        assert_eq!(packet.class(), BerTagClass::Universal);
        assert!(!packet.is_constructed());
        assert_eq!(packet.tag().universal_tag(), Some(UniversalTag::OctetString));
        assert_eq!(packet.value(), &Value::Text("hi".to_string()));
        assert_eq!(packet.content().as_ref(), b"hi");
    }

    #[test]
    fn test_decode_integer() {
        let packet = decode_packet(&[0x02, 0x02, 0x01, 0x2C]).unwrap();
        assert_eq!(packet.value().as_u64(), Some(300));

        let enumerated = decode_packet(&[0x0A, 0x01, 0x31]).unwrap();
        assert_eq!(enumerated.value().as_u64(), Some(49));
    }

    #[test]
    fn test_decode_boolean() {
        assert_eq!(decode_packet(&[0x01, 0x01, 0x00]).unwrap().value().as_bool(), Some(false));
        assert_eq!(decode_packet(&[0x01, 0x01, 0x01]).unwrap().value().as_bool(), Some(true));
        assert_eq!(decode_packet(&[0x01, 0x01, 0xFF]).unwrap().value().as_bool(), Some(true));
        assert_eq!(
            decode_packet(&[0x01, 0x02, 0x00, 0x00]).unwrap().value().as_bool(),
            Some(false)
        );
    }

    #[test]
    fn test_decode_nested() {
        let data = [0x30, 0x08, 0x04, 0x02, b'h', b'i', 0x04, 0x02, b'y', b'o'];
        let packet = decode_packet(&data).unwrap();
        assert!(packet.is_constructed());
        assert!(packet.value().is_none());
        assert_eq!(packet.children().len(), 2);
        assert_eq!(packet.children()[0].value().as_str(), Some("hi"));
        assert_eq!(packet.children()[1].value().as_str(), Some("yo"));
        assert_eq!(packet.content().as_ref(), &data[2..]);
    }

    #[test]
    fn test_non_universal_primitive_is_opaque() {
        let packet = decode_packet(&[0x80, 0x03, b'p', b'w', b'd']).unwrap();
        assert_eq!(packet.class(), BerTagClass::ContextSpecific);
        assert!(packet.value().is_none());
        assert_eq!(packet.content().as_ref(), b"pwd");
    }

    #[test]
    fn test_unhandled_universal_tags_have_no_value() {
        let null = decode_packet(&[0x05, 0x00]).unwrap();
        assert!(null.value().is_none());

        let utf8 = decode_packet(&[0x0C, 0x02, 0xC3, 0xA9]).unwrap();
        assert!(utf8.value().is_none());
        assert_eq!(utf8.content().as_ref(), &[0xC3, 0xA9]);
    }

    #[test]
    fn test_non_utf8_octet_string() {
        let packet = decode_packet(&[0x04, 0x02, 0xFF, 0xFE]).unwrap();
        assert_eq!(packet.value(), &Value::Bytes(vec![0xFF, 0xFE]));
    }

    #[test]
    fn test_round_trip_tree() {
        let mut bind = Packet::constructed(BerTagClass::Application, TagNumber::new(0).unwrap(), "");
        bind.append_child(Packet::integer(BerTagClass::Universal, false, UniversalTag::Integer, 3, ""));
        bind.append_child(octet_string("cn=admin,dc=example,dc=org"));
        bind.append_child(Packet::string(
            BerTagClass::ContextSpecific,
            false,
            TagNumber::new(0).unwrap(),
            "secret",
            "",
        ));

        let mut message = Packet::sequence("");
        message.append_child(Packet::integer(BerTagClass::Universal, false, UniversalTag::Integer, 1, ""));
        message.append_child(bind);
        message.append_child(Packet::boolean(BerTagClass::Universal, false, UniversalTag::Boolean, true, ""));
        let message = message.into_packet();

        let bytes = message.to_bytes();
        let decoded = decode_packet(&bytes).unwrap();
        assert_eq!(decoded.to_bytes(), bytes);
        assert_same_structure(&decoded, &message);
    }

    #[test]
    fn test_round_trip_long_form_child() {
        let long_text = "x".repeat(300);
        let sequence = Packet::sequence("").with_child(octet_string(&long_text));
        let bytes = sequence.to_bytes();
        assert_eq!(bytes[..4], [0x30, 0x82, 0x01, 0x30]);

        let decoded = decode_packet(&bytes).unwrap();
        assert_eq!(decoded.children()[0].value().as_str(), Some(long_text.as_str()));
    }

    fn assert_same_structure(decoded: &Packet, built: &Packet) {
        assert_eq!(decoded.tag(), built.tag());
        assert_eq!(decoded.content(), built.content());
        assert_eq!(decoded.children().len(), built.children().len());
        for (d, b) in decoded.children().iter().zip(built.children()) {
            assert_same_structure(d, b);
        }
    }

    #[test]
    fn test_truncated_input() {
        let err = decode_packet(&[0x04, 0x05, b'h', b'i']).unwrap_err();
        assert!(matches!(err, BerError::TruncatedInput { needed: 5, available: 2 }));

        // Child claims more than the parent content holds
        let err = decode_packet(&[0x30, 0x03, 0x04, 0x05, b'a']).unwrap_err();
        assert!(matches!(err, BerError::TruncatedInput { .. }));

        assert!(matches!(decode_packet(&[]), Err(BerError::TruncatedInput { .. })));
        assert!(matches!(decode_packet(&[0x04]), Err(BerError::TruncatedInput { .. })));
        assert!(matches!(
            decode_packet(&[0x04, 0x84, 0xFF, 0xFF, 0xFF, 0xFF]),
            Err(BerError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_malformed_and_unsupported() {
        assert!(matches!(decode_packet(&[0x04, 0x80]), Err(BerError::MalformedLength(_))));
        assert!(matches!(
            decode_packet(&[0x1F, 0x01, 0x00]),
            Err(BerError::UnsupportedTag(0x1F))
        ));
        // Nested high tag number
        assert!(matches!(
            decode_packet(&[0x30, 0x03, 0x9F, 0x01, 0x00]),
            Err(BerError::UnsupportedTag(0x9F))
        ));
    }

    #[test]
    fn test_decoder_position_and_remainder() {
        let data = [0x02, 0x01, 0x07, 0x04, 0x00, 0xAA];
        let (packet, rest) = decode_with_remainder(&data).unwrap();
        assert_eq!(packet.value().as_u64(), Some(7));
        assert_eq!(rest, &data[3..]);

        let mut decoder = BerDecoder::new(&data);
        assert_eq!(decoder.skip_tlv().unwrap(), 3);
        assert_eq!(decoder.decode_packet().unwrap().content().len(), 0);
        assert_eq!(decoder.position(), 5);

        // Failed decode does not move the position
        assert!(decoder.decode_packet().is_err());
        assert_eq!(decoder.position(), 5);
        assert_eq!(decoder.remaining(), 1);
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let packet = decode_packet(&[0x01, 0x01, 0x01, 0xDE, 0xAD]).unwrap();
        assert_eq!(packet.value().as_bool(), Some(true));
    }

    #[test]
    fn test_max_depth() {
        let config = CodecConfig::new().with_max_depth(1);

        let one_level = [0x30, 0x02, 0x04, 0x00];
        assert!(BerDecoder::with_config(&one_level, config).decode_packet().is_ok());

        let two_levels = [0x30, 0x04, 0x30, 0x02, 0x04, 0x00];
        assert!(matches!(
            BerDecoder::with_config(&two_levels, config).decode_packet(),
            Err(BerError::NestingTooDeep { max: 1 })
        ));

        // Empty constructed packets at the limit are fine
        let empty_inner = [0x30, 0x02, 0x30, 0x00];
        assert!(BerDecoder::with_config(&empty_inner, config).decode_packet().is_ok());
    }

    #[test]
    fn test_independent_decoders_across_threads() {
        let message = Packet::sequence("")
            .with_child(octet_string("uid=alice"))
            .with_child(octet_string("uid=bob"));
        let bytes = message.to_bytes();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let bytes = bytes.clone();
                std::thread::spawn(move || {
                    let config = CodecConfig::new().with_trace(i % 2 == 0);
                    BerDecoder::with_config(&bytes, config)
                        .decode_packet()
                        .map(|packet| packet.to_bytes())
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), bytes);
        }
    }
}
