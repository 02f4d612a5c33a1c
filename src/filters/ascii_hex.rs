//! Handler for ASCIIHexDecode data

use lopdf::Dictionary;
use crate::errors::{PanelError, PanelResult};
use super::filter::StreamFilter;

/// Hexadecimal text filter, terminated by `>`
pub struct AsciiHexFilter;

impl StreamFilter for AsciiHexFilter {
    fn decode(&self, data: &[u8], _params: Option<&Dictionary>) -> PanelResult<Vec<u8>> {
        let mut output = Vec::with_capacity(data.len() / 2);
        let mut high: Option<u8> = None;

        for &byte in data {
            if byte == b'>' {
                break;
            }
            if byte.is_ascii_whitespace() {
                continue;
            }
            let nibble = hex_value(byte).ok_or_else(|| {
                PanelError::PdfError(format!("Invalid character 0x{:02X} in ASCIIHexDecode stream", byte))
            })?;
            match high.take() {
                Some(h) => output.push(h << 4 | nibble),
                None => high = Some(nibble),
            }
        }

        // An odd trailing digit is followed by an implicit 0
        if let Some(h) = high {
            output.push(h << 4);
        }

        Ok(output)
    }

    fn name(&self) -> &'static str {
        "ASCIIHexDecode"
    }
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_with_whitespace_and_terminator() {
        let decoded = AsciiHexFilter.decode(b"FF 00\n7f>ignored", None).unwrap();
        assert_eq!(decoded, vec![0xFF, 0x00, 0x7F]);
    }

    #[test]
    fn pads_odd_digit() {
        assert_eq!(AsciiHexFilter.decode(b"A>", None).unwrap(), vec![0xA0]);
    }

    #[test]
    fn rejects_non_hex() {
        assert!(AsciiHexFilter.decode(b"zz", None).is_err());
    }
}
