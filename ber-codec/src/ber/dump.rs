//! Human readable packet dumps
//!
//! Formatting only; nothing here writes to stdout. Hex dumps feed `trace`
//! logging when [`CodecConfig::trace`](ber_core::CodecConfig) is enabled.

use crate::ber::packet::Packet;
use std::fmt::{self, Write};

/// Bytes per row in the alternate tree dump
const BYTES_PER_ROW: usize = 30;

/// Render bytes as space separated lowercase hex
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        // Writing into a String cannot fail
        let _ = write!(out, "{:02x}", byte);
    }
    out
}

/// Indented tree dump, one line per packet:
///
/// ```text
/// Bind Request: (Application, Constructed, 0x00) Len=12 <none>
///  Version: (Universal, Primitive, Integer) Len=1 3
/// ```
///
/// The alternate form (`{:#}`) follows every line with the packet's full
/// encoding, 30 bytes per row, each row of hex underlined by a row of byte
/// positions (1-based, modulo 100):
///
/// ```text
///  Version: (Universal, Primitive, Integer) Len=1 3
///  02 01 03
///  01 02 03
/// ```
impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tree(f, self, 0)
    }
}

fn write_tree(f: &mut fmt::Formatter<'_>, packet: &Packet, indent: usize) -> fmt::Result {
    write!(f, "{:width$}", "", width = indent)?;
    if !packet.description().is_empty() {
        write!(f, "{}: ", packet.description())?;
    }
    writeln!(
        f,
        "({}) Len={} {}",
        packet.tag(),
        packet.data_length(),
        packet.value()
    )?;
    if f.alternate() {
        write_rows(f, &packet.to_bytes(), indent)?;
    }

    for child in packet.children() {
        write_tree(f, child, indent + 1)?;
    }
    Ok(())
}

fn write_rows(f: &mut fmt::Formatter<'_>, bytes: &[u8], indent: usize) -> fmt::Result {
    for (row, chunk) in bytes.chunks(BYTES_PER_ROW).enumerate() {
        write!(f, "{:width$}", "", width = indent)?;
        writeln!(f, "{}", hex_dump(chunk))?;

        write!(f, "{:width$}", "", width = indent)?;
        let first = row * BYTES_PER_ROW;
        for i in first..first + chunk.len() {
            if i > first {
                f.write_char(' ')?;
            }
            write!(f, "{:02}", (i + 1) % 100)?;
        }
        writeln!(f)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::types::{BerTagClass, UniversalTag};

    #[test]
    fn test_hex_dump() {
        assert_eq!(hex_dump(&[]), "");
        assert_eq!(hex_dump(&[0x30, 0x0A, 0xFF]), "30 0a ff");
    }

    #[test]
    fn test_tree_dump() {
        let mut request = Packet::sequence("Request");
        request.append_child(Packet::integer(
            BerTagClass::Universal,
            false,
            UniversalTag::Integer,
            3,
            "Version",
        ));
        request.append_child(Packet::string(
            BerTagClass::Universal,
            false,
            UniversalTag::OctetString,
            "cn=admin",
            "",
        ));

        let dump = request.to_string();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Request: (Universal, Constructed, Sequence and Sequence of) Len=13 <none>"
        );
        assert_eq!(lines[1], " Version: (Universal, Primitive, Integer) Len=1 3");
        assert_eq!(lines[2], " (Universal, Primitive, Octet String) Len=8 \"cn=admin\"");

        let dump = format!("{:#}", request);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "Request: (Universal, Constructed, Sequence and Sequence of) Len=13 <none>");
        assert_eq!(lines[1], "30 0d 02 01 03 04 08 63 6e 3d 61 64 6d 69 6e");
        assert_eq!(lines[2], "01 02 03 04 05 06 07 08 09 10 11 12 13 14 15");
        assert_eq!(lines[3], " Version: (Universal, Primitive, Integer) Len=1 3");
        assert_eq!(lines[4], " 02 01 03");
        assert_eq!(lines[5], " 01 02 03");
        assert_eq!(lines[7], " 04 08 63 6e 3d 61 64 6d 69 6e");
        assert_eq!(lines[8], " 01 02 03 04 05 06 07 08 09 10");
    }

    #[test]
    fn test_alternate_dump_wraps_rows() {
        let packet = Packet::octet_string_bytes(
            BerTagClass::Universal,
            UniversalTag::OctetString,
            vec![0xAA; 40],
            "Blob",
        );
        let dump = format!("{:#}", packet);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("04 28 aa"));
        assert_eq!(lines[1].split(' ').count(), 30);
        assert_eq!(lines[2].split(' ').next(), Some("01"));
        assert_eq!(lines[2].split(' ').last(), Some("30"));
        assert_eq!(lines[3].split(' ').count(), 12);
        assert_eq!(lines[4], "31 32 33 34 35 36 37 38 39 40 41 42");

        // Positions wrap at 100
        let long = Packet::octet_string_bytes(
            BerTagClass::Universal,
            UniversalTag::OctetString,
            vec![0; 120],
            "",
        );
        let dump = format!("{:#}", long);
        let positions = dump.lines().nth(8).unwrap_or_default();
        assert!(positions.starts_with("91 92 93 94 95 96 97 98 99 00 01"));
    }
}
