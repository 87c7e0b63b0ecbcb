//! Codec and transport configuration
//!
//! Diagnostic output and resource limits are configured per decoder instance
//! instead of through process-wide state, so independent decoders running on
//! different threads never observe each other's settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default upper bound on a declared content length (16 MiB)
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;

/// Default upper bound on constructed nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default read timeout for async transports
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Default deadline for receiving one complete frame
pub const DEFAULT_FRAME_TIMEOUT: Duration = Duration::from_secs(120);

/// Per-decoder configuration
///
/// # Limits
///
/// Length prefixes are attacker controlled. `max_content_length` is checked
/// before any buffer is allocated, and `max_depth` bounds the recursion of the
/// TLV decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Emit `trace` level hex dumps of frames and decoded packets
    pub trace: bool,
    /// Largest declared content length accepted, in bytes
    pub max_content_length: usize,
    /// Deepest constructed nesting accepted
    pub max_depth: usize,
}

impl CodecConfig {
    /// Create a configuration with default limits and tracing disabled
    pub fn new() -> Self {
        Self {
            trace: false,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_max_content_length(mut self, max: usize) -> Self {
        self.max_content_length = max;
        self
    }

    pub fn with_max_depth(mut self, max: usize) -> Self {
        self.max_depth = max;
        self
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings for the async packet transport
///
/// `read_timeout` bounds each individual read, so a peer that keeps sending
/// one byte just inside it would hold a reader forever. `frame_timeout`
/// bounds the whole frame from its first header byte to its last content
/// byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportSettings {
    /// Timeout applied to every read. `None` waits forever.
    pub read_timeout: Option<Duration>,
    /// Deadline for reading one complete frame. `None` disables it.
    pub frame_timeout: Option<Duration>,
    /// Codec configuration used for frames read from the stream
    pub codec: CodecConfig,
}

impl TransportSettings {
    /// Create transport settings with the default read timeout
    pub fn new() -> Self {
        Self {
            read_timeout: Some(DEFAULT_READ_TIMEOUT),
            frame_timeout: Some(DEFAULT_FRAME_TIMEOUT),
            codec: CodecConfig::default(),
        }
    }

    /// Create transport settings with the given read timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            read_timeout: Some(timeout),
            ..Self::new()
        }
    }

    pub fn with_frame_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.frame_timeout = timeout;
        self
    }

    pub fn with_codec(mut self, codec: CodecConfig) -> Self {
        self.codec = codec;
        self
    }
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_config_defaults() {
        let config = CodecConfig::default();
        assert!(!config.trace);
        assert_eq!(config.max_content_length, DEFAULT_MAX_CONTENT_LENGTH);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_codec_config_builder() {
        let config = CodecConfig::new()
            .with_trace(true)
            .with_max_content_length(1024)
            .with_max_depth(4);
        assert!(config.trace);
        assert_eq!(config.max_content_length, 1024);
        assert_eq!(config.max_depth, 4);
    }

    #[test]
    fn test_transport_settings() {
        let settings = TransportSettings::default();
        assert_eq!(settings.read_timeout, Some(DEFAULT_READ_TIMEOUT));
        assert_eq!(settings.frame_timeout, Some(DEFAULT_FRAME_TIMEOUT));

        let settings = TransportSettings::with_timeout(Duration::from_millis(250))
            .with_frame_timeout(None)
            .with_codec(CodecConfig::new().with_trace(true));
        assert_eq!(settings.read_timeout, Some(Duration::from_millis(250)));
        assert_eq!(settings.frame_timeout, None);
        assert!(settings.codec.trace);
    }
}
