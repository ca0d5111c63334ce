//! In-place decoding of JSON string escapes.
//!
//! Decoding never grows a literal: every escape sequence is at least as long
//! as the bytes it stands for, so the output can be written over the input
//! from left to right.
//!
//! `\uXXXX` escapes are decoded as single 16-bit code units. Surrogate halves
//! are not paired; each one is written as its own 3-byte sequence, so text
//! outside the Basic Multilingual Plane only survives when it appears
//! unescaped in the document.
//!
//! # Examples
//!
//! ```rust
//! use jsonpull::escape::unescape_in_place;
//!
//! let mut literal = *br"caf\u00e9\n";
//! let len = unescape_in_place(&mut literal);
//! assert_eq!(&literal[..len], "café\n".as_bytes());
//! assert!(literal[len..].iter().all(|&b| b == 0));
//! ```

use alloc::borrow::Cow;

use bstr::{BStr, BString, ByteSlice};

/// Decodes the escape sequences in `literal` in place and returns the decoded
/// length.
///
/// Bytes past the returned length are zeroed so that stale input is not
/// mistaken for decoded text.
///
/// The input is the *content* of a string literal, without quotes. Input that
/// the tokenizer has already validated decodes exactly; for arbitrary input
/// unknown escapes are dropped and malformed `\u` sequences are copied
/// through verbatim.
///
/// Do not run this twice over the same bytes: the second pass would treat
/// decoded backslashes as new escapes.
pub fn unescape_in_place(literal: &mut [u8]) -> usize {
    let len = literal.len();
    let mut dst = 0;
    let mut src = 0;

    while src < len {
        let byte = literal[src];
        if byte != b'\\' || src + 1 == len {
            literal[dst] = byte;
            dst += 1;
            src += 1;
            continue;
        }

        let code = literal[src + 1];
        src += 2;
        let decoded = match code {
            b'"' | b'\\' | b'/' => code,
            b'b' => 0x08,
            b'f' => 0x0C,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'u' => {
                let unit = literal.get(src..src + 4).and_then(parse_hex4);
                if let Some(unit) = unit {
                    src += 4;
                    dst += encode_utf8(unit, &mut literal[dst..]);
                } else {
                    literal[dst] = b'\\';
                    literal[dst + 1] = b'u';
                    dst += 2;
                }
                continue;
            }
            _ => continue,
        };
        literal[dst] = decoded;
        dst += 1;
    }

    literal[dst..].fill(0);
    dst
}

/// Decodes `literal` without touching it.
///
/// Borrows when the literal contains no backslash, otherwise decodes a copy
/// with [`unescape_in_place`].
#[must_use]
pub fn unescape(literal: &[u8]) -> Cow<'_, BStr> {
    if literal.find_byte(b'\\').is_none() {
        return Cow::Borrowed(literal.as_bstr());
    }
    let mut owned = literal.to_vec();
    let len = unescape_in_place(&mut owned);
    owned.truncate(len);
    Cow::Owned(BString::from(owned))
}

// Four nibbles fill exactly 16 bits.
#[allow(clippy::cast_possible_truncation)]
fn parse_hex4(digits: &[u8]) -> Option<u16> {
    digits.iter().try_fold(0u16, |acc, &digit| {
        let nibble = char::from(digit).to_digit(16)?;
        Some((acc << 4) | nibble as u16)
    })
}

/// Writes `unit` as UTF-8 (1 to 3 bytes) and returns the number of bytes
/// written. Surrogates are encoded like any other unit.
#[allow(clippy::cast_possible_truncation)]
fn encode_utf8(unit: u16, out: &mut [u8]) -> usize {
    match unit {
        0..=0x7F => {
            out[0] = unit as u8;
            1
        }
        0x80..=0x7FF => {
            out[0] = 0b1100_0000 | (unit >> 6) as u8;
            out[1] = 0b1000_0000 | (unit & 0b0011_1111) as u8;
            2
        }
        _ => {
            out[0] = 0b1110_0000 | (unit >> 12) as u8;
            out[1] = 0b1000_0000 | ((unit >> 6) & 0b0011_1111) as u8;
            out[2] = 0b1000_0000 | (unit & 0b0011_1111) as u8;
            3
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::{vec, vec::Vec};

    use rstest::rstest;

    use super::*;

    fn decode(input: &str) -> Vec<u8> {
        let mut bytes = input.as_bytes().to_vec();
        let len = unescape_in_place(&mut bytes);
        assert!(
            bytes[len..].iter().all(|&b| b == 0),
            "tail not zeroed: {bytes:?}"
        );
        bytes.truncate(len);
        bytes
    }

    #[rstest]
    #[case(r"plain", "plain")]
    #[case(r#"\""#, "\"")]
    #[case(r"\\", "\\")]
    #[case(r"\/", "/")]
    #[case(r"\b\f\n\r\t", "\u{8}\u{c}\n\r\t")]
    #[case(r"a\u0041b", "aAb")]
    #[case(r"\u00e9", "é")]
    #[case(r"\u00E9", "é")]
    #[case(r"\u20ac", "€")]
    #[case(r"\uffff", "\u{ffff}")]
    #[case(r"\u0000", "\0")]
    #[case(r"x\\ny", "x\\ny")]
    fn decodes_escapes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(decode(input), expected.as_bytes());
    }

    #[test]
    fn two_byte_sequence() {
        assert_eq!(decode(r#""\u00e9""#), [b'"', 0xC3, 0xA9, b'"']);
    }

    #[test]
    fn surrogates_are_not_paired() {
        // Each half becomes its own 3-byte sequence.
        assert_eq!(
            decode(r"\ud83d\ude00"),
            [0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80]
        );
    }

    #[test]
    fn malformed_input_does_not_panic() {
        assert_eq!(decode(r"\u12"), b"\\u12");
        assert_eq!(decode(r"\uzzzz"), b"\\uzzzz");
        assert_eq!(decode(r"\q"), b"");
        assert_eq!(decode("end\\"), b"end\\");
    }

    #[test]
    fn raw_utf8_is_copied() {
        assert_eq!(decode("grüße \\t 😀"), "grüße \t 😀".as_bytes());
    }

    #[test]
    fn unescape_borrows_without_escapes() {
        assert!(matches!(unescape(b"hello"), Cow::Borrowed(_)));
        let decoded = unescape(br"tab\there");
        assert!(matches!(decoded, Cow::Owned(_)));
        assert_eq!(&*decoded, "tab\there");
    }

    #[test]
    fn decoding_twice_reinterprets_output() {
        // `\\n` decodes to `\n` (backslash, n); a second pass would turn that
        // into a newline. Callers must decode a literal only once.
        let mut bytes = vec![b'\\', b'\\', b'n'];
        let len = unescape_in_place(&mut bytes);
        assert_eq!(&bytes[..len], b"\\n");
        let len = unescape_in_place(&mut bytes[..len]);
        assert_eq!(&bytes[..len], b"\n");
    }
}
