//! Packet framing over a [`StreamAccessor`]
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use ber_transport::{PacketStream, TransportSettings};
//! use tokio::net::TcpStream;
//!
//! # async fn run() -> ber_transport::BerResult<()> {
//! let socket = TcpStream::connect("127.0.0.1:389").await?;
//! let mut stream = PacketStream::from_io(socket, TransportSettings::default());
//! let response = stream.read_packet().await?;
//! println!("{}", response);
//! # Ok(())
//! # }
//! ```

use crate::io_stream::IoStream;
use crate::stream::StreamAccessor;
use ber_codec::ber::{BerDecoder, FrameHeader, Packet, hex_dump};
use ber_core::config::DEFAULT_FRAME_TIMEOUT;
use ber_core::{BerError, BerResult, CodecConfig, TransportSettings};
use bytes::BytesMut;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::Instant;

/// Reads and writes whole BER packets on a byte stream
///
/// Reads follow the same three steps as the blocking
/// [`PacketReader`](ber_codec::ber::PacketReader): header and first length
/// byte, long-form length bytes, then the content. The read timeout of the
/// underlying accessor bounds each read; the frame timeout bounds the whole
/// frame.
///
/// # Timeouts
///
/// A read that fails with [`BerError::Timeout`] may have consumed part of a
/// frame. The stream is no longer aligned on a frame boundary afterwards and
/// should be closed.
#[derive(Debug)]
pub struct PacketStream<A> {
    accessor: A,
    codec: CodecConfig,
    frame_timeout: Option<Duration>,
}

impl<S> PacketStream<IoStream<S>>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap a tokio stream using the timeouts and codec configuration from `settings`
    pub fn from_io(stream: S, settings: TransportSettings) -> Self {
        Self::new(IoStream::new(stream, settings.read_timeout), settings.codec)
            .with_frame_timeout(settings.frame_timeout)
    }
}

impl<A: StreamAccessor> PacketStream<A> {
    /// Frame packets on `accessor` with the default frame timeout
    pub fn new(accessor: A, codec: CodecConfig) -> Self {
        Self {
            accessor,
            codec,
            frame_timeout: Some(DEFAULT_FRAME_TIMEOUT),
        }
    }

    pub fn with_frame_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.frame_timeout = timeout;
        self
    }

    pub fn codec(&self) -> &CodecConfig {
        &self.codec
    }

    pub fn frame_timeout(&self) -> Option<Duration> {
        self.frame_timeout
    }

    pub fn set_frame_timeout(&mut self, timeout: Option<Duration>) {
        self.frame_timeout = timeout;
    }

    pub fn get_ref(&self) -> &A {
        &self.accessor
    }

    pub fn get_mut(&mut self) -> &mut A {
        &mut self.accessor
    }

    pub fn into_inner(self) -> A {
        self.accessor
    }

    pub async fn set_timeout(&mut self, timeout: Option<Duration>) -> BerResult<()> {
        self.accessor.set_timeout(timeout).await
    }

    /// Read one complete TLV (header, length and content) without decoding it
    ///
    /// Only the per-read timeout applies here; see [`PacketStream::read_packet`]
    /// for the frame deadline.
    pub async fn read_frame(&mut self) -> BerResult<Vec<u8>> {
        let mut header_bytes = [0u8; 2];
        self.accessor.read_exact(&mut header_bytes).await?;
        let header = FrameHeader::parse(header_bytes)?;

        let mut length_buf = [0u8; FrameHeader::MAX_LENGTH_BYTES];
        let length_bytes = &mut length_buf[..header.length_byte_count()];
        self.accessor.read_exact(length_bytes).await?;
        let content_length = header.content_length(length_bytes, &self.codec)?;

        let mut frame = header.frame_buffer(length_bytes, content_length)?;
        self.accessor.read_exact(&mut frame[header.header_len()..]).await?;

        log::debug!(
            "Received BER frame: tag 0x{:02X}, {} content bytes",
            header.tag_byte(),
            content_length
        );
        if self.codec.trace {
            log::trace!("frame: {}", hex_dump(&frame));
        }
        Ok(frame)
    }

    /// Read and decode one packet within the frame timeout
    pub async fn read_packet(&mut self) -> BerResult<Packet> {
        match self.frame_timeout.and_then(|timeout| Instant::now().checked_add(timeout)) {
            Some(deadline) => self.read_packet_until(deadline).await,
            None => {
                let frame = self.read_frame().await;
                self.decode_frame(frame)
            }
        }
    }

    /// Read and decode one packet, failing with [`BerError::Timeout`] if the
    /// frame is not complete by `deadline`
    pub async fn read_packet_until(&mut self, deadline: Instant) -> BerResult<Packet> {
        let frame = match tokio::time::timeout_at(deadline, self.read_frame()).await {
            Ok(frame) => frame,
            Err(_) => {
                log::warn!("BER frame not complete before the deadline");
                Err(BerError::Timeout)
            }
        };
        self.decode_frame(frame)
    }

    fn decode_frame(&self, frame: BerResult<Vec<u8>>) -> BerResult<Packet> {
        let result =
            frame.and_then(|frame| BerDecoder::with_config(&frame, self.codec).decode_packet());

        if let Err(e) = &result {
            if e.is_malformed() {
                log::warn!("Rejected malformed BER frame: {}", e);
            }
        }
        result
    }

    /// Serialize a packet and write it in full
    pub async fn write_packet(&mut self, packet: &Packet) -> BerResult<()> {
        let mut buf = BytesMut::with_capacity(packet.encoded_len());
        packet.write_to(&mut buf);

        self.accessor.write_all(&buf).await?;
        self.accessor.flush().await?;

        log::debug!("Sent BER packet ({}), {} bytes", packet.tag(), buf.len());
        if self.codec.trace {
            log::trace!("packet: {}", hex_dump(&buf));
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.accessor.is_closed()
    }

    pub async fn close(&mut self) -> BerResult<()> {
        self.accessor.close().await
    }
}
