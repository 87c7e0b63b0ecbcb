//! Length-prefixed packet reader for blocking byte sources
//!
//! Reads exactly one top-level TLV from a [`std::io::Read`] source:
//!
//! 1. the header byte and the first length byte,
//! 2. the long-form length bytes, if the first length byte announces them,
//! 3. exactly the declared number of content bytes.
//!
//! Short reads are retried until each step is satisfied. Any failure is
//! returned as an error and the partially filled buffer is dropped.

use crate::ber::decoder::BerDecoder;
use crate::ber::dump::hex_dump;
use crate::ber::frame::FrameHeader;
use crate::ber::packet::Packet;
use ber_core::{BerResult, CodecConfig};
use std::io::{self, Read};

/// Packet reader over a blocking byte source
///
/// Timeouts belong to the source: configure them on the socket (for
/// example `TcpStream::set_read_timeout`) and they surface here as
/// [`BerError::Io`](ber_core::BerError::Io).
#[derive(Debug)]
pub struct PacketReader<R> {
    reader: R,
    config: CodecConfig,
}

impl<R: Read> PacketReader<R> {
    /// Create a reader with the default configuration
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, CodecConfig::default())
    }

    pub fn with_config(reader: R, config: CodecConfig) -> Self {
        Self { reader, config }
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Read one complete TLV (header, length and content) without decoding it
    pub fn read_frame(&mut self) -> BerResult<Vec<u8>> {
        let mut header_bytes = [0u8; 2];
        read_full(&mut self.reader, &mut header_bytes)?;
        let header = FrameHeader::parse(header_bytes)?;

        let mut length_buf = [0u8; FrameHeader::MAX_LENGTH_BYTES];
        let length_bytes = &mut length_buf[..header.length_byte_count()];
        read_full(&mut self.reader, length_bytes)?;
        let content_length = header.content_length(length_bytes, &self.config)?;

        let mut frame = header.frame_buffer(length_bytes, content_length)?;
        read_full(&mut self.reader, &mut frame[header.header_len()..])?;

        log::debug!(
            "Read BER frame: tag 0x{:02X}, {} content bytes",
            header.tag_byte(),
            content_length
        );
        if self.config.trace {
            log::trace!("frame: {}", hex_dump(&frame));
        }
        Ok(frame)
    }

    /// Read and decode one packet
    pub fn read_packet(&mut self) -> BerResult<Packet> {
        let frame = self.read_frame()?;
        BerDecoder::with_config(&frame, self.config).decode_packet()
    }
}

/// Read one packet from a blocking source with the default configuration
pub fn read_packet<R: Read>(reader: &mut R) -> BerResult<Packet> {
    PacketReader::new(reader).read_packet()
}

/// Fill `buf` completely, retrying short and interrupted reads
fn read_full<R: Read>(reader: &mut R, mut buf: &mut [u8]) -> BerResult<()> {
    while !buf.is_empty() {
        match reader.read(buf) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "Stream ended before the BER frame was complete",
                )
                .into());
            }
            Ok(n) => buf = &mut buf[n..],
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
