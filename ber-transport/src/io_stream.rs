//! [`StreamAccessor`] adapter for tokio byte streams

use crate::stream::StreamAccessor;
use async_trait::async_trait;
use ber_core::{BerError, BerResult};
use std::fmt;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Adapter giving any tokio stream (TCP, TLS, duplex, ...) a read/write timeout
///
/// Every single read and write is bounded by the timeout; on expiry the
/// operation fails with [`BerError::Timeout`].
pub struct IoStream<S> {
    stream: S,
    timeout: Option<Duration>,
    closed: bool,
}

impl<S> IoStream<S> {
    /// Wrap an already-connected stream
    pub fn new(stream: S, timeout: Option<Duration>) -> Self {
        Self {
            stream,
            timeout,
            closed: false,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S> fmt::Debug for IoStream<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IoStream")
            .field("timeout", &self.timeout)
            .field("closed", &self.closed)
            .finish()
    }
}

#[async_trait]
impl<S> StreamAccessor for IoStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn set_timeout(&mut self, timeout: Option<Duration>) -> BerResult<()> {
        self.timeout = timeout;
        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8]) -> BerResult<usize> {
        let result = if let Some(timeout) = self.timeout {
            tokio::time::timeout(timeout, self.stream.read(buf))
                .await
                .map_err(|_| BerError::Timeout)?
                .map_err(BerError::Io)
        } else {
            self.stream.read(buf).await.map_err(BerError::Io)
        };

        match result {
            Ok(0) => {
                self.closed = true;
                Ok(0)
            }
            Ok(n) => Ok(n),
            Err(e) => {
                self.closed = true;
                Err(e)
            }
        }
    }

    async fn write(&mut self, buf: &[u8]) -> BerResult<usize> {
        if let Some(timeout) = self.timeout {
            tokio::time::timeout(timeout, self.stream.write(buf))
                .await
                .map_err(|_| BerError::Timeout)?
                .map_err(BerError::Io)
        } else {
            self.stream.write(buf).await.map_err(BerError::Io)
        }
    }

    async fn flush(&mut self) -> BerResult<()> {
        self.stream.flush().await.map_err(BerError::Io)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    async fn close(&mut self) -> BerResult<()> {
        if !self.closed {
            let _ = self.stream.shutdown().await;
        }
        self.closed = true;
        Ok(())
    }
}
