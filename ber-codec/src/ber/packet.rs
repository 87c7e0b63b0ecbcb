//! Packet tree and encoder
//!
//! A [`Packet`] is one TLV node. Leaf packets own their content bytes;
//! constructed packets own their children, and their content is derived from
//! the children whenever it is needed, so there is no second copy to keep in
//! sync.
//!
//! Children can only be attached through a [`Constructed`] builder, which
//! [`Packet::sequence`] and [`Packet::constructed`] return. Leaf constructors
//! return a plain [`Packet`] that has no way to take children.
//!
//! # Usage Example
//!
//! ```rust
//! use ber_codec::ber::{BerTagClass, Packet, UniversalTag};
//!
//! let mut message = Packet::sequence("Message");
//! message.append_child(Packet::integer(
//!     BerTagClass::Universal, false, UniversalTag::Integer, 1, "MessageID",
//! ));
//! let bytes = message.to_bytes();
//! assert_eq!(bytes, vec![0x30, 0x03, 0x02, 0x01, 0x01]);
//! ```

use crate::ber::types::{BerLength, BerTag, BerTagClass, TagNumber, UniversalTag};
use crate::ber::value::Value;
use bytes::{BufMut, Bytes};
use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;

/// Content of a packet, matching its constructed flag
#[derive(Debug, Clone, PartialEq, Eq)]
enum Body {
    Primitive(Bytes),
    Constructed(Vec<Packet>),
}

/// BER packet (one TLV tree node)
///
/// # Mutation
///
/// Fields are private and a `Packet` has no mutators. Children are added
/// through [`Constructed::append_child`] before the tree is handed off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    tag: BerTag,
    value: Value,
    body: Body,
    description: String,
}

impl Packet {
    /// Generic constructor
    ///
    /// For a primitive packet the value is written into the content
    /// (BOOLEAN and INTEGER values as minimal big-endian integers, text and
    /// bytes verbatim). A constructed packet carries no scalar value and
    /// starts without children; use [`Packet::into_constructed`] to add some.
    pub fn encode(
        class: BerTagClass,
        constructed: bool,
        tag: impl Into<TagNumber>,
        value: Value,
        description: impl Into<String>,
    ) -> Self {
        let (value, body) = if constructed {
            (Value::None, Body::Constructed(Vec::new()))
        } else {
            let data = Bytes::from(value.to_content());
            (value, Body::Primitive(data))
        };

        Self {
            tag: BerTag::new(class, constructed, tag),
            value,
            body,
            description: description.into(),
        }
    }

    /// Universal constructed SEQUENCE with no children
    pub fn sequence(description: impl Into<String>) -> Constructed {
        Self::constructed(BerTagClass::Universal, UniversalTag::Sequence, description)
    }

    /// Constructed packet of any class, e.g. an application-tagged operation
    pub fn constructed(
        class: BerTagClass,
        tag: impl Into<TagNumber>,
        description: impl Into<String>,
    ) -> Constructed {
        Constructed {
            packet: Self::encode(class, true, tag, Value::None, description),
        }
    }

    pub fn boolean(
        class: BerTagClass,
        constructed: bool,
        tag: impl Into<TagNumber>,
        value: bool,
        description: impl Into<String>,
    ) -> Self {
        Self::encode(class, constructed, tag, Value::Bool(value), description)
    }

    pub fn integer(
        class: BerTagClass,
        constructed: bool,
        tag: impl Into<TagNumber>,
        value: u64,
        description: impl Into<String>,
    ) -> Self {
        Self::encode(class, constructed, tag, Value::UInt(value), description)
    }

    pub fn string(
        class: BerTagClass,
        constructed: bool,
        tag: impl Into<TagNumber>,
        value: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::encode(class, constructed, tag, Value::Text(value.into()), description)
    }

    /// Octet string content that is not necessarily text
    pub fn octet_string_bytes(
        class: BerTagClass,
        tag: impl Into<TagNumber>,
        value: impl Into<Vec<u8>>,
        description: impl Into<String>,
    ) -> Self {
        Self::encode(class, false, tag, Value::Bytes(value.into()), description)
    }

    /// Build a decoded primitive packet
    pub(crate) fn from_primitive(tag: BerTag, value: Value, data: Bytes) -> Self {
        debug_assert!(!tag.is_constructed());
        Self {
            tag,
            value,
            body: Body::Primitive(data),
            description: String::new(),
        }
    }

    /// Build a decoded constructed packet
    pub(crate) fn from_children(tag: BerTag, children: Vec<Packet>) -> Self {
        debug_assert!(tag.is_constructed());
        Self {
            tag,
            value: Value::None,
            body: Body::Constructed(children),
            description: String::new(),
        }
    }

    /// Reopen a constructed packet for appending children
    ///
    /// Returns the packet unchanged as the error when it is primitive.
    pub fn into_constructed(self) -> Result<Constructed, Packet> {
        match self.body {
            Body::Constructed(_) => Ok(Constructed { packet: self }),
            Body::Primitive(_) => Err(self),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn tag(&self) -> BerTag {
        self.tag
    }

    pub fn class(&self) -> BerTagClass {
        self.tag.class()
    }

    pub fn is_constructed(&self) -> bool {
        self.tag.is_constructed()
    }

    pub fn tag_number(&self) -> TagNumber {
        self.tag.number()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Children in encoding order; always empty for primitive packets
    pub fn children(&self) -> &[Packet] {
        match &self.body {
            Body::Constructed(children) => children,
            Body::Primitive(_) => &[],
        }
    }

    pub fn child(&self, index: usize) -> Option<&Packet> {
        self.children().get(index)
    }

    pub fn into_children(self) -> Vec<Packet> {
        match self.body {
            Body::Constructed(children) => children,
            Body::Primitive(_) => Vec::new(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The TLV value portion: leaf bytes, or the encoding of every child in order
    pub fn content(&self) -> Cow<'_, [u8]> {
        match &self.body {
            Body::Primitive(data) => Cow::Borrowed(&data[..]),
            Body::Constructed(_) => {
                let mut content = Vec::with_capacity(self.data_length());
                self.write_content(&mut content);
                Cow::Owned(content)
            }
        }
    }

    /// Length of [`Packet::content`] without materializing it
    pub fn data_length(&self) -> usize {
        match &self.body {
            Body::Primitive(data) => data.len(),
            Body::Constructed(children) => children.iter().map(Packet::encoded_len).sum(),
        }
    }

    /// Length of the full TLV encoding (header, length prefix and content)
    pub fn encoded_len(&self) -> usize {
        let length = self.data_length();
        1 + BerLength::new(length).encoded_len() + length
    }

    /// Serialize the packet: header byte, length prefix, content
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut out);
        out
    }

    /// Serialize the packet into any buffer
    pub fn write_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.tag.to_byte());
        BerLength::new(self.data_length()).write(buf);
        self.write_content(buf);
    }

    fn write_content<B: BufMut>(&self, buf: &mut B) {
        match &self.body {
            Body::Primitive(data) => buf.put_slice(data),
            Body::Constructed(children) => {
                for child in children {
                    child.write_to(buf);
                }
            }
        }
    }
}

/// Builder for a constructed packet
///
/// The only type with [`append_child`](Constructed::append_child). Read
/// access goes through `Deref<Target = Packet>`; convert with
/// [`Constructed::into_packet`] or `Packet::from` once the tree is complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constructed {
    packet: Packet,
}

impl Constructed {
    /// Append a child, extending this packet's content by the child's encoding
    pub fn append_child(&mut self, child: impl Into<Packet>) -> &mut Self {
        if let Body::Constructed(children) = &mut self.packet.body {
            children.push(child.into());
        }
        self
    }

    /// Consuming variant of [`Constructed::append_child`] for builder chains
    pub fn with_child(mut self, child: impl Into<Packet>) -> Self {
        self.append_child(child);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.packet.description = description.into();
        self
    }

    pub fn into_packet(self) -> Packet {
        self.packet
    }
}

impl Deref for Constructed {
    type Target = Packet;

    fn deref(&self) -> &Packet {
        &self.packet
    }
}

impl From<Constructed> for Packet {
    fn from(constructed: Constructed) -> Self {
        constructed.packet
    }
}

impl fmt::Display for Constructed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.packet, f)
    }
}
