//! BER tag and length types
//!
//! Static mappings between the wire header byte and the class, constructed
//! flag and tag number it packs, plus the short/long length-form rules.

use crate::ber::integer::{decode_integer, encode_integer, encoded_integer_len};
use ber_core::{BerError, BerResult};
use bytes::BufMut;
use std::borrow::Cow;
use std::fmt;

/// Class bits of the header byte (bits 8-7)
pub const CLASS_MASK: u8 = 0xC0;
/// Constructed flag of the header byte (bit 6)
pub const CONSTRUCTED_FLAG: u8 = 0x20;
/// Tag number bits of the header byte (bits 5-1)
pub const TAG_MASK: u8 = 0x1F;
/// Long-form flag of the initial length byte
pub const LONG_FORM_FLAG: u8 = 0x80;

/// BER Tag Class
///
/// ASN.1 defines four tag classes:
/// - **Universal**: Standard ASN.1 types (INTEGER, OCTET STRING, etc.)
/// - **Application**: Application-specific types (e.g. directory protocol operations)
/// - **Context-specific**: Context-dependent types (used in SEQUENCE/SET)
/// - **Private**: Private/implementation-specific types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BerTagClass {
    /// Universal class (00)
    Universal = 0,
    /// Application class (01)
    Application = 1,
    /// Context-specific class (10)
    ContextSpecific = 2,
    /// Private class (11)
    Private = 3,
}

impl BerTagClass {
    /// Get tag class from a header byte (bits 8-7)
    pub fn from_bits(byte: u8) -> Self {
        match (byte & CLASS_MASK) >> 6 {
            0 => BerTagClass::Universal,
            1 => BerTagClass::Application,
            2 => BerTagClass::ContextSpecific,
            _ => BerTagClass::Private,
        }
    }

    /// Convert tag class to header bits
    pub fn to_bits(self) -> u8 {
        (self as u8) << 6
    }

    pub fn name(self) -> &'static str {
        match self {
            BerTagClass::Universal => "Universal",
            BerTagClass::Application => "Application",
            BerTagClass::ContextSpecific => "Context",
            BerTagClass::Private => "Private",
        }
    }
}

/// Universal class tag numbers
///
/// Numbers 0x0E and 0x0F are not assigned here; they still decode, but
/// without a name or a typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum UniversalTag {
    Eoc = 0x00,
    Boolean = 0x01,
    Integer = 0x02,
    BitString = 0x03,
    OctetString = 0x04,
    Null = 0x05,
    ObjectIdentifier = 0x06,
    ObjectDescriptor = 0x07,
    External = 0x08,
    Real = 0x09,
    Enumerated = 0x0A,
    EmbeddedPdv = 0x0B,
    Utf8String = 0x0C,
    RelativeOid = 0x0D,
    Sequence = 0x10,
    Set = 0x11,
    NumericString = 0x12,
    PrintableString = 0x13,
    T61String = 0x14,
    VideotexString = 0x15,
    Ia5String = 0x16,
    UtcTime = 0x17,
    GeneralizedTime = 0x18,
    GraphicString = 0x19,
    VisibleString = 0x1A,
    GeneralString = 0x1B,
    UniversalString = 0x1C,
    CharacterString = 0x1D,
    BmpString = 0x1E,
}

impl UniversalTag {
    /// Look up a universal tag by number
    pub fn from_number(number: u8) -> Option<Self> {
        use UniversalTag::*;
        let tag = match number {
            0x00 => Eoc,
            0x01 => Boolean,
            0x02 => Integer,
            0x03 => BitString,
            0x04 => OctetString,
            0x05 => Null,
            0x06 => ObjectIdentifier,
            0x07 => ObjectDescriptor,
            0x08 => External,
            0x09 => Real,
            0x0A => Enumerated,
            0x0B => EmbeddedPdv,
            0x0C => Utf8String,
            0x0D => RelativeOid,
            0x10 => Sequence,
            0x11 => Set,
            0x12 => NumericString,
            0x13 => PrintableString,
            0x14 => T61String,
            0x15 => VideotexString,
            0x16 => Ia5String,
            0x17 => UtcTime,
            0x18 => GeneralizedTime,
            0x19 => GraphicString,
            0x1A => VisibleString,
            0x1B => GeneralString,
            0x1C => UniversalString,
            0x1D => CharacterString,
            0x1E => BmpString,
            _ => return None,
        };
        Some(tag)
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    /// Human readable name, as shown in packet dumps
    pub fn name(self) -> &'static str {
        use UniversalTag::*;
        match self {
            Eoc => "EOC (End-of-Content)",
            Boolean => "Boolean",
            Integer => "Integer",
            BitString => "Bit String",
            OctetString => "Octet String",
            Null => "NULL",
            ObjectIdentifier => "Object Identifier",
            ObjectDescriptor => "Object Descriptor",
            External => "External",
            Real => "Real (float)",
            Enumerated => "Enumerated",
            EmbeddedPdv => "Embedded PDV",
            Utf8String => "UTF8 String",
            RelativeOid => "Relative-OID",
            Sequence => "Sequence and Sequence of",
            Set => "Set and Set OF",
            NumericString => "Numeric String",
            PrintableString => "Printable String",
            T61String => "T61 String",
            VideotexString => "Videotex String",
            Ia5String => "IA5 String",
            UtcTime => "UTC Time",
            GeneralizedTime => "Generalized Time",
            GraphicString => "Graphic String",
            VisibleString => "Visible String",
            GeneralString => "General String",
            UniversalString => "Universal String",
            CharacterString => "Character String",
            BmpString => "BMP String",
        }
    }
}

/// Tag number in the low-tag-number form (0-30)
///
/// 31 marks the high-tag-number form on the wire, which this codec does not
/// support, so it cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagNumber(u8);

impl TagNumber {
    /// Largest representable tag number
    pub const MAX: u8 = 30;

    pub const fn new(number: u8) -> Option<Self> {
        if number <= Self::MAX {
            Some(Self(number))
        } else {
            None
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for TagNumber {
    type Error = BerError;

    fn try_from(number: u8) -> BerResult<Self> {
        Self::new(number).ok_or(BerError::UnsupportedTag(number))
    }
}

impl From<UniversalTag> for TagNumber {
    fn from(tag: UniversalTag) -> Self {
        Self(tag.number())
    }
}

/// BER Tag
///
/// A BER tag identifies the type of an ASN.1 value. It is packed into one
/// header byte:
///
/// ```text
/// Bits: 8 7 6 5 4 3 2 1
///       C C P T T T T T
/// ```
///
/// Where CC is the class, P the constructed flag and TTTTT the tag number.
/// The invariant `byte == class | (constructed ? 0x20 : 0) | number` holds for
/// every value of this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BerTag {
    class: BerTagClass,
    constructed: bool,
    number: TagNumber,
}

impl BerTag {
    pub fn new(class: BerTagClass, constructed: bool, number: impl Into<TagNumber>) -> Self {
        Self {
            class,
            constructed,
            number: number.into(),
        }
    }

    /// Create a Universal class tag
    pub fn universal(constructed: bool, tag: UniversalTag) -> Self {
        Self::new(BerTagClass::Universal, constructed, tag)
    }

    pub fn class(&self) -> BerTagClass {
        self.class
    }

    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    pub fn number(&self) -> TagNumber {
        self.number
    }

    /// Universal tag identity, if this is a Universal class tag with an assigned number
    pub fn universal_tag(&self) -> Option<UniversalTag> {
        match self.class {
            BerTagClass::Universal => UniversalTag::from_number(self.number.value()),
            _ => None,
        }
    }

    /// Encode tag into its header byte
    pub fn to_byte(&self) -> u8 {
        let constructed_bit = if self.constructed { CONSTRUCTED_FLAG } else { 0 };
        self.class.to_bits() | constructed_bit | self.number.value()
    }

    /// Decode tag from a header byte
    ///
    /// # Error Handling
    /// Returns `UnsupportedTag` when all tag bits are set (high-tag-number form).
    pub fn from_byte(byte: u8) -> BerResult<Self> {
        let number = TagNumber::new(byte & TAG_MASK).ok_or(BerError::UnsupportedTag(byte))?;
        Ok(Self {
            class: BerTagClass::from_bits(byte),
            constructed: byte & CONSTRUCTED_FLAG != 0,
            number,
        })
    }

    /// Universal tag name, or the tag number in hex for other classes
    pub fn name(&self) -> Cow<'static, str> {
        match self.universal_tag() {
            Some(tag) => Cow::Borrowed(tag.name()),
            None => Cow::Owned(format!("0x{:02X}", self.number.value())),
        }
    }
}

impl fmt::Display for BerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.constructed { "Constructed" } else { "Primitive" };
        write!(f, "{}, {}, {}", self.class.name(), kind, self.name())
    }
}

/// BER Length encoding
///
/// - **Short form**: lengths 0-127 in a single byte
/// - **Long form**: `0x80 | N` followed by N big-endian length bytes, where N
///   is the minimal number of bytes for the value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BerLength {
    /// Short form: length 0-127
    Short(u8),
    /// Long form: length > 127, encoded with length-of-length
    Long(usize),
}

impl BerLength {
    /// Choose the short or long form for a content length
    pub fn new(length: usize) -> Self {
        if length <= 127 {
            BerLength::Short(length as u8)
        } else {
            BerLength::Long(length)
        }
    }

    pub fn value(&self) -> usize {
        match self {
            BerLength::Short(l) => *l as usize,
            BerLength::Long(l) => *l,
        }
    }

    /// Number of bytes the encoded length occupies
    pub fn encoded_len(&self) -> usize {
        match self {
            BerLength::Short(_) => 1,
            BerLength::Long(l) => 1 + encoded_integer_len(*l as u64),
        }
    }

    /// Write the encoded length into a buffer
    pub fn write<B: BufMut>(&self, buf: &mut B) {
        match self {
            BerLength::Short(length) => buf.put_u8(*length),
            BerLength::Long(length) => {
                let bytes = encode_integer(*length as u64);
                buf.put_u8(LONG_FORM_FLAG | bytes.len() as u8);
                buf.put_slice(&bytes);
            }
        }
    }

    /// Encode length to bytes
    pub fn encode(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(self.encoded_len());
        self.write(&mut result);
        result
    }

    /// Number of length bytes that follow the initial length byte
    ///
    /// Returns 0 for the short form.
    ///
    /// # Error Handling
    /// Returns `MalformedLength` for `0x80` (a long form with no length bytes)
    /// and for more length bytes than fit in `usize`.
    pub fn following_bytes(first_byte: u8) -> BerResult<usize> {
        if first_byte & LONG_FORM_FLAG == 0 {
            return Ok(0);
        }

        let count = (first_byte & !LONG_FORM_FLAG) as usize;
        if count == 0 {
            return Err(BerError::MalformedLength(
                "long form with zero length bytes".to_string(),
            ));
        }
        if count > std::mem::size_of::<usize>() {
            return Err(BerError::MalformedLength(format!(
                "{} length bytes exceed the maximum of {}",
                count,
                std::mem::size_of::<usize>()
            )));
        }
        Ok(count)
    }

    /// Convert long-form length bytes into a content length
    pub fn from_length_bytes(bytes: &[u8]) -> BerResult<usize> {
        usize::try_from(decode_integer(bytes)).map_err(|_| {
            BerError::MalformedLength(format!("length {:02X?} does not fit in usize", bytes))
        })
    }

    /// Decode length from bytes
    ///
    /// # Returns
    /// Returns `Ok((BerLength, bytes_consumed))` if successful
    ///
    /// # Error Handling
    /// Returns `TruncatedInput` if the buffer ends inside the length field and
    /// `MalformedLength` for an undecodable long form.
    pub fn decode(data: &[u8]) -> BerResult<(Self, usize)> {
        let first_byte = *data.first().ok_or(BerError::truncated(1, 0))?;
        let count = Self::following_bytes(first_byte)?;
        if count == 0 {
            return Ok((BerLength::Short(first_byte), 1));
        }

        let length_bytes = data
            .get(1..1 + count)
            .ok_or(BerError::truncated(1 + count, data.len()))?;
        let length = Self::from_length_bytes(length_bytes)?;
        Ok((BerLength::Long(length), 1 + count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ber_tag_header_byte() {
        let tag = BerTag::universal(false, UniversalTag::Integer);
        assert_eq!(tag.to_byte(), 0x02);

        let tag = BerTag::universal(true, UniversalTag::Sequence);
        assert_eq!(tag.to_byte(), 0x30);

        let bind = BerTag::new(BerTagClass::Application, true, TagNumber::new(0).unwrap());
        assert_eq!(bind.to_byte(), 0x60);

        let simple = BerTag::new(BerTagClass::ContextSpecific, false, TagNumber::new(0).unwrap());
        assert_eq!(simple.to_byte(), 0x80);
    }

    #[test]
    fn test_ber_tag_decode() {
        let tag = BerTag::from_byte(0x63).unwrap();
        assert_eq!(tag.class(), BerTagClass::Application);
        assert!(tag.is_constructed());
        assert_eq!(tag.number().value(), 3);
        assert_eq!(tag.universal_tag(), None);

        for byte in [0x00u8, 0x04, 0x30, 0x5E, 0xA3, 0xDE] {
            assert_eq!(BerTag::from_byte(byte).unwrap().to_byte(), byte);
        }
    }

    #[test]
    fn test_high_tag_number_rejected() {
        assert!(matches!(BerTag::from_byte(0x1F), Err(BerError::UnsupportedTag(0x1F))));
        assert!(matches!(BerTag::from_byte(0xBF), Err(BerError::UnsupportedTag(0xBF))));
        assert!(matches!(TagNumber::try_from(31), Err(BerError::UnsupportedTag(31))));
        assert_eq!(TagNumber::try_from(30).unwrap().value(), 30);
    }

    #[test]
    fn test_class_bits() {
        for class in [
            BerTagClass::Universal,
            BerTagClass::Application,
            BerTagClass::ContextSpecific,
            BerTagClass::Private,
        ] {
            assert_eq!(BerTagClass::from_bits(class.to_bits()), class);
        }
        assert_eq!(BerTagClass::Private.to_bits(), 0xC0);
    }

    #[test]
    fn test_universal_tag_table() {
        for number in 0..=TagNumber::MAX {
            if let Some(tag) = UniversalTag::from_number(number) {
                assert_eq!(tag.number(), number);
            }
        }
        assert_eq!(UniversalTag::from_number(0x0E), None);
        assert_eq!(UniversalTag::from_number(0x1E), Some(UniversalTag::BmpString));
        assert_eq!(BerTag::from_byte(0x04).unwrap().name(), "Octet String");
        assert_eq!(BerTag::from_byte(0x84).unwrap().name(), "0x04");
    }

    #[test]
    fn test_ber_length_boundaries() {
        assert_eq!(BerLength::new(0).encode(), vec![0x00]);
        assert_eq!(BerLength::new(127).encode(), vec![0x7F]);
        assert_eq!(BerLength::new(128).encode(), vec![0x81, 0x80]);
        assert_eq!(BerLength::new(255).encode(), vec![0x81, 0xFF]);
        assert_eq!(BerLength::new(256).encode(), vec![0x82, 0x01, 0x00]);
        assert_eq!(BerLength::new(256).encoded_len(), 3);
    }

    #[test]
    fn test_ber_length_decode() {
        assert_eq!(BerLength::decode(&[100]).unwrap(), (BerLength::Short(100), 1));
        assert_eq!(BerLength::decode(&[0x81, 0x80]).unwrap(), (BerLength::Long(128), 2));
        assert_eq!(
            BerLength::decode(&[0x82, 0x01, 0x00, 0xAA]).unwrap(),
            (BerLength::Long(256), 3)
        );
        // Non-minimal long form is accepted
        assert_eq!(BerLength::decode(&[0x82, 0x00, 0x05]).unwrap().0.value(), 5);
    }

    #[test]
    fn test_ber_length_malformed() {
        assert!(matches!(BerLength::decode(&[0x80]), Err(BerError::MalformedLength(_))));
        assert!(matches!(
            BerLength::decode(&[0x89, 1, 2, 3, 4, 5, 6, 7, 8, 9]),
            Err(BerError::MalformedLength(_))
        ));
        assert!(matches!(
            BerLength::decode(&[0x82, 0x01]),
            Err(BerError::TruncatedInput { needed: 3, available: 2 })
        ));
        assert!(matches!(BerLength::decode(&[]), Err(BerError::TruncatedInput { .. })));
    }
}
