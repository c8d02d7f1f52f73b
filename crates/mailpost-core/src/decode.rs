//! Transfer decoding for textual body parts.
//!
//! Applied only when the transport reports it did not decode the part
//! itself. Invalid input never fails: a part that cannot be decoded is
//! passed through as-is, lossily converted to UTF-8.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::mailbox::{FetchedBody, TransferEncoding};

/// The body part as text, transfer-decoded if the transport did not
/// already do so.
pub fn body_text(body: &FetchedBody) -> String {
    let bytes = if body.decoded {
        body.bytes.clone()
    } else {
        decode_transfer(&body.bytes, body.encoding)
    };
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Decode `bytes` per the declared transfer encoding.
pub fn decode_transfer(bytes: &[u8], encoding: TransferEncoding) -> Vec<u8> {
    match encoding {
        TransferEncoding::QuotedPrintable => decode_quoted_printable(bytes),
        TransferEncoding::Base64 => decode_base64(bytes),
        TransferEncoding::SevenBit | TransferEncoding::Other => bytes.to_vec(),
    }
}

/// RFC 2045 §6.7. Soft line breaks (`=` at end of line) vanish, `=XX`
/// hex escapes become bytes, malformed escapes stay literal.
fn decode_quoted_printable(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        if input[i] != b'=' {
            out.push(input[i]);
            i += 1;
            continue;
        }
        // Soft line break.
        if input[i + 1..].starts_with(b"\r\n") {
            i += 3;
        } else if input[i + 1..].starts_with(b"\n") {
            i += 2;
        } else if let (Some(hi), Some(lo)) = (
            input.get(i + 1).copied().and_then(hex_val),
            input.get(i + 2).copied().and_then(hex_val),
        ) {
            out.push(hi << 4 | lo);
            i += 3;
        } else {
            out.push(b'=');
            i += 1;
        }
    }
    out
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}

/// Base64 with line breaks and padding tolerated; undecodable input is
/// returned unchanged.
fn decode_base64(input: &[u8]) -> Vec<u8> {
    let compact: Vec<u8> = input
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    STANDARD.decode(&compact).unwrap_or_else(|_| input.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_printable_escapes() {
        let decoded = decode_quoted_printable(b"caf=C3=A9");
        assert_eq!(String::from_utf8_lossy(&decoded), "café");
    }

    #[test]
    fn quoted_printable_soft_breaks() {
        assert_eq!(decode_quoted_printable(b"foo=\r\nbar"), b"foobar");
        assert_eq!(decode_quoted_printable(b"foo=\nbar"), b"foobar");
    }

    #[test]
    fn quoted_printable_invalid_escape_stays_literal() {
        assert_eq!(decode_quoted_printable(b"50=50%"), b"50P%");
        assert_eq!(decode_quoted_printable(b"a=ZZb"), b"a=ZZb");
        assert_eq!(decode_quoted_printable(b"trailing="), b"trailing=");
    }

    #[test]
    fn base64_with_line_breaks() {
        let decoded = decode_base64(b"aGVsbG8g\r\nd29ybGQ=");
        assert_eq!(decoded, b"hello world");
    }

    #[test]
    fn base64_invalid_falls_back_to_raw() {
        assert_eq!(decode_base64(b"not base64!"), b"not base64!");
    }

    #[test]
    fn body_text_respects_decoded_flag() {
        let already = FetchedBody::decoded("aGk=");
        assert_eq!(body_text(&already), "aGk=");

        let encoded = FetchedBody::encoded("aGk=", TransferEncoding::Base64);
        assert_eq!(body_text(&encoded), "hi");
    }

    #[test]
    fn seven_bit_passes_through() {
        let body = FetchedBody::encoded("plain text", TransferEncoding::SevenBit);
        assert_eq!(body_text(&body), "plain text");
    }
}
