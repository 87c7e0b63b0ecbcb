//! Top-level frame header parsing
//!
//! Shared by every reader that pulls one TLV at a time off a byte source:
//! the blocking [`PacketReader`](crate::ber::PacketReader), the async packet
//! stream and the buffer-based [`frame_length`]. Each of them reads the same
//! three pieces in order and lets [`FrameHeader`] validate them:
//!
//! 1. the header byte and the first length byte ([`FrameHeader::parse`]),
//! 2. [`FrameHeader::length_byte_count`] long-form length bytes
//!    ([`FrameHeader::content_length`]),
//! 3. the content, into the buffer from [`FrameHeader::frame_buffer`].

use crate::ber::types::{BerLength, BerTag};
use ber_core::{BerError, BerResult, CodecConfig};

/// First two bytes of a frame, validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    tag: BerTag,
    bytes: [u8; 2],
    length_byte_count: usize,
}

impl FrameHeader {
    /// Most length bytes a frame can carry, bounded by `usize`
    pub const MAX_LENGTH_BYTES: usize = std::mem::size_of::<usize>();

    /// Validate the header byte and the first length byte
    ///
    /// High tag numbers would shift every following field, so they are
    /// rejected before any length byte is looked at.
    pub fn parse(bytes: [u8; 2]) -> BerResult<Self> {
        let [tag_byte, first_length_byte] = bytes;
        let tag = BerTag::from_byte(tag_byte)?;
        let length_byte_count = BerLength::following_bytes(first_length_byte)?;
        Ok(Self {
            tag,
            bytes,
            length_byte_count,
        })
    }

    pub fn tag(&self) -> BerTag {
        self.tag
    }

    pub fn tag_byte(&self) -> u8 {
        self.bytes[0]
    }

    /// Long-form length bytes still to read; zero for the short form
    pub fn length_byte_count(&self) -> usize {
        self.length_byte_count
    }

    /// Bytes before the content: header byte, first length byte, long-form length bytes
    pub fn header_len(&self) -> usize {
        2 + self.length_byte_count
    }

    /// Declared content length, checked against `config.max_content_length`
    ///
    /// `length_bytes` must hold exactly [`FrameHeader::length_byte_count`] bytes.
    pub fn content_length(&self, length_bytes: &[u8], config: &CodecConfig) -> BerResult<usize> {
        if length_bytes.len() != self.length_byte_count {
            return Err(BerError::MalformedLength(format!(
                "expected {} length bytes, got {}",
                self.length_byte_count,
                length_bytes.len()
            )));
        }

        let length = if self.length_byte_count == 0 {
            self.bytes[1] as usize
        } else {
            BerLength::from_length_bytes(length_bytes)?
        };
        check_content_length(length, config)?;
        Ok(length)
    }

    /// Total frame size for a content length
    pub fn frame_len(&self, content_length: usize) -> BerResult<usize> {
        self.header_len().checked_add(content_length).ok_or_else(|| {
            BerError::MalformedLength(format!("frame length {} overflows", content_length))
        })
    }

    /// Frame buffer holding the header and length bytes, with zeroed room for the content
    ///
    /// Content goes into `frame[header.header_len()..]`.
    pub fn frame_buffer(&self, length_bytes: &[u8], content_length: usize) -> BerResult<Vec<u8>> {
        let total = self.frame_len(content_length)?;
        let mut frame = Vec::with_capacity(total);
        frame.extend_from_slice(&self.bytes);
        frame.extend_from_slice(length_bytes);
        frame.resize(total, 0);
        Ok(frame)
    }
}

/// Reject declared content lengths above the configured maximum
pub fn check_content_length(length: usize, config: &CodecConfig) -> BerResult<()> {
    if length > config.max_content_length {
        return Err(BerError::LengthExceedsLimit {
            length,
            max: config.max_content_length,
        });
    }
    Ok(())
}

/// Total size of the first TLV in a partially filled buffer
///
/// Returns `Ok(None)` while the header or length field is still incomplete.
/// The content itself does not need to be present yet, so transports that
/// accumulate bytes can learn how many more to wait for.
pub fn frame_length(data: &[u8], config: &CodecConfig) -> BerResult<Option<usize>> {
    let Some(&tag_byte) = data.first() else {
        return Ok(None);
    };
    BerTag::from_byte(tag_byte)?;

    let Some(&first_length_byte) = data.get(1) else {
        return Ok(None);
    };
    let header = FrameHeader::parse([tag_byte, first_length_byte])?;

    let Some(length_bytes) = data.get(2..header.header_len()) else {
        return Ok(None);
    };
    let length = header.content_length(length_bytes, config)?;
    header.frame_len(length).map(Some)
}
