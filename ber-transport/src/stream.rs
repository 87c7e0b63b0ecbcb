//! Byte stream abstraction under [`PacketStream`](crate::PacketStream)

use async_trait::async_trait;
use ber_core::{BerError, BerResult};
use std::io;
use std::time::Duration;

/// Async byte stream carrying BER frames
///
/// Implementors provide single reads and writes; whole-buffer reads and
/// writes are built on top. Timeout and cancellation live here, in the
/// transport, never in the codec.
#[async_trait]
pub trait StreamAccessor: Send {
    /// Replace the timeout applied to each read and write. `None` waits forever.
    async fn set_timeout(&mut self, timeout: Option<Duration>) -> BerResult<()>;

    /// Read up to `buf.len()` bytes, returning 0 at end of stream
    async fn read(&mut self, buf: &mut [u8]) -> BerResult<usize>;

    /// Fill `buf` completely
    ///
    /// A short read is not end of stream; it is retried until the buffer is
    /// full or the stream really ends, which fails with `UnexpectedEof`.
    async fn read_exact(&mut self, mut buf: &mut [u8]) -> BerResult<()> {
        while !buf.is_empty() {
            match self.read(buf).await? {
                0 => {
                    return Err(BerError::Io(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "Stream ended before the BER frame was complete",
                    )));
                }
                n => buf = &mut buf[n..],
            }
        }
        Ok(())
    }

    /// Write some of `buf`, returning how many bytes were accepted
    async fn write(&mut self, buf: &[u8]) -> BerResult<usize>;

    /// Write all of `buf`
    async fn write_all(&mut self, mut buf: &[u8]) -> BerResult<()> {
        while !buf.is_empty() {
            match self.write(buf).await? {
                0 => {
                    return Err(BerError::Io(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "Stream stopped accepting BER frame bytes",
                    )));
                }
                n => buf = &buf[n..],
            }
        }
        Ok(())
    }

    async fn flush(&mut self) -> BerResult<()>;

    /// Whether the peer closed the stream or a read failed
    fn is_closed(&self) -> bool;

    async fn close(&mut self) -> BerResult<()>;
}
