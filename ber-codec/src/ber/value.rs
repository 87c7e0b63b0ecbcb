//! Typed packet values

use crate::ber::dump::hex_dump;
use crate::ber::integer::encode_integer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decoded value of a packet
///
/// Selected at decode time from the (class, tag) pair. Only primitive
/// Universal packets with a defined interpretation carry something other
/// than `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    UInt(u64),
    Text(String),
    Bytes(#[serde(with = "serde_bytes")] Vec<u8>),
}

impl Value {
    /// Interpret string content as text
    ///
    /// Content that is not valid UTF-8 is kept as raw bytes instead of being
    /// mangled into replacement characters.
    pub fn text_or_bytes(content: &[u8]) -> Self {
        match std::str::from_utf8(content) {
            Ok(text) => Value::Text(text.to_string()),
            Err(_) => Value::Bytes(content.to_vec()),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Raw bytes of a `Text` or `Bytes` value
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Text(s) => Some(s.as_bytes()),
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Content bytes a primitive packet carries for this value
    pub(crate) fn to_content(&self) -> Vec<u8> {
        match self {
            Value::None => Vec::new(),
            Value::Bool(b) => encode_integer(u64::from(*b)),
            Value::UInt(v) => encode_integer(*v),
            Value::Text(s) => s.as_bytes().to_vec(),
            Value::Bytes(b) => b.clone(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("<none>"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::UInt(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Bytes(b) => write!(f, "[{}]", hex_dump(b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_or_bytes() {
        assert_eq!(Value::text_or_bytes(b"hi"), Value::Text("hi".to_string()));
        assert_eq!(Value::text_or_bytes(&[0xFF, 0x00]), Value::Bytes(vec![0xFF, 0x00]));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::UInt(7).as_u64(), Some(7));
        assert_eq!(Value::UInt(7).as_bool(), None);
        assert_eq!(Value::from("cn=admin").as_str(), Some("cn=admin"));
        assert_eq!(Value::from("ab").as_bytes(), Some(&b"ab"[..]));
        assert!(Value::default().is_none());
    }

    #[test]
    fn test_content_encoding() {
        assert_eq!(Value::Bool(true).to_content(), vec![0x01]);
        assert_eq!(Value::Bool(false).to_content(), vec![0x00]);
        assert_eq!(Value::UInt(300).to_content(), vec![0x01, 0x2C]);
        assert!(Value::None.to_content().is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("hi").to_string(), "\"hi\"");
        assert_eq!(Value::Bytes(vec![0xDE, 0xAD]).to_string(), "[de ad]");
        assert_eq!(Value::None.to_string(), "<none>");
    }
}
