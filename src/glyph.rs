//! Glyph codec
//!
//! Writes every byte as a fixed-width run of base-N digits (most significant
//! first) and spells each digit with a symbol from an N-symbol alphabet.
//! The digit value of a symbol is its index in the alphabet.
//!
//! Two variants ship with the crate:
//!
//! | variant | alphabet           | symbols per byte |
//! |---------|--------------------|------------------|
//! | ternary | `哈基米`           | 8                |
//! | octal   | `哦南北绿豆阿西噶` | 3                |
//!
//! The two alphabets share no symbol, so output from one variant is always
//! rejected by the other.

use crate::error::{GlyphError, GlyphResult};
use crate::mime::Blob;
use crate::sniff::{match_signature, Signature, OCTET_STREAM, TEXT_PLAIN};
use std::collections::HashSet;
use tracing::debug;

/// Symbols of the ternary variant, digit 0..=2
pub const TERNARY_SYMBOLS: [char; 3] = ['哈', '基', '米'];
/// Symbols per byte in the ternary variant (3^8 = 6561)
pub const TERNARY_WIDTH: usize = 8;

/// Symbols of the octal variant, digit 0..=7
pub const OCTAL_SYMBOLS: [char; 8] = ['哦', '南', '北', '绿', '豆', '阿', '西', '噶'];
/// Symbols per byte in the octal variant (8^3 = 512)
pub const OCTAL_WIDTH: usize = 3;

/// Shown when decoded bytes are binary and cannot be displayed as text
pub const BINARY_PAYLOAD_MESSAGE: &str =
    "Binary data detected and cannot be shown as text. Use file export to download the decoded file.";

/// Signatures that mark a decoded payload as binary
pub const EXPORT_SIGNATURES: &[Signature] = &[
    Signature::new("image/jpeg", 3, &[(0, &[0xFF, 0xD8, 0xFF])]),
    Signature::new("image/png", 8, &[(0, &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])]),
    Signature::new("image/gif", 4, &[(0, b"GIF8")]),
    Signature::new("application/pdf", 4, &[(0, b"%PDF")]),
    Signature::new("application/zip", 4, &[(0, b"PK\x03\x04")]),
    Signature::new("application/vnd.ms-office", 4, &[(0, &[0xD0, 0xCF, 0x11, 0xE0])]),
];

/// Coarse payload kind used to pick between text display and file export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Text,
    Binary(&'static str),
}

impl PayloadKind {
    pub fn mime_type(&self) -> &'static str {
        match *self {
            PayloadKind::Text => TEXT_PLAIN,
            PayloadKind::Binary(mime) => mime,
        }
    }
}

/// Export signature subset first, then strict UTF-8
pub fn detect_payload_kind(data: &[u8]) -> PayloadKind {
    if let Some(mime) = match_signature(data, EXPORT_SIGNATURES) {
        return PayloadKind::Binary(mime);
    }

    match std::str::from_utf8(data) {
        Ok(_) => PayloadKind::Text,
        Err(_) => PayloadKind::Binary(OCTET_STREAM),
    }
}

/// Outcome of decoding glyphs for text display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphTextResult {
    pub text: String,
    pub success: bool,
    pub mime_type: Option<&'static str>,
    pub error: Option<String>,
}

impl GlyphTextResult {
    fn failed(mime_type: Option<&'static str>, error: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            success: false,
            mime_type,
            error: Some(error.into()),
        }
    }
}

/// Positional-numeral codec over a fixed symbol alphabet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphCodec {
    symbols: Vec<char>,
    digits_per_byte: usize,
}

impl GlyphCodec {
    /// Build a codec from an ordered alphabet and a per-byte width.
    ///
    /// The alphabet needs at least two distinct symbols, and
    /// `symbols.len() ^ digits_per_byte` must cover every byte value.
    pub fn new(symbols: impl IntoIterator<Item = char>, digits_per_byte: usize) -> GlyphResult<Self> {
        let symbols: Vec<char> = symbols.into_iter().collect();

        if symbols.len() < 2 {
            return Err(GlyphError::InvalidAlphabet(format!(
                "need at least 2 symbols, got {}",
                symbols.len()
            )));
        }

        let mut seen = HashSet::with_capacity(symbols.len());
        if let Some(&dup) = symbols.iter().find(|&&s| !seen.insert(s)) {
            return Err(GlyphError::InvalidAlphabet(format!("duplicate symbol {:?}", dup)));
        }

        let capacity = u32::try_from(symbols.len())
            .ok()
            .zip(u32::try_from(digits_per_byte).ok())
            .and_then(|(base, width)| base.checked_pow(width));
        match capacity {
            Some(capacity) if capacity >= 256 => {}
            Some(capacity) => {
                return Err(GlyphError::InvalidAlphabet(format!(
                    "{} symbols x {} digits covers only {} values",
                    symbols.len(),
                    digits_per_byte,
                    capacity
                )))
            }
            None => {
                return Err(GlyphError::InvalidAlphabet(format!(
                    "{} symbols x {} digits overflows",
                    symbols.len(),
                    digits_per_byte
                )))
            }
        }

        Ok(Self { symbols, digits_per_byte })
    }

    /// The 3-symbol variant, 8 symbols per byte
    pub fn ternary() -> Self {
        Self {
            symbols: TERNARY_SYMBOLS.to_vec(),
            digits_per_byte: TERNARY_WIDTH,
        }
    }

    /// The 8-symbol variant, 3 symbols per byte
    pub fn octal() -> Self {
        Self {
            symbols: OCTAL_SYMBOLS.to_vec(),
            digits_per_byte: OCTAL_WIDTH,
        }
    }

    pub fn base(&self) -> usize {
        self.symbols.len()
    }

    pub fn digits_per_byte(&self) -> usize {
        self.digits_per_byte
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    fn digit_of(&self, symbol: char) -> Option<u32> {
        self.symbols.iter().position(|&s| s == symbol).map(|d| d as u32)
    }

    /// Encode bytes as glyphs
    pub fn encode(&self, data: &[u8]) -> String {
        let base = self.base() as u32;
        let mut output = String::with_capacity(data.len() * self.digits_per_byte * 3);
        let mut digits = vec![0usize; self.digits_per_byte];

        for &byte in data {
            let mut value = u32::from(byte);
            for slot in digits.iter_mut().rev() {
                *slot = (value % base) as usize;
                value /= base;
            }
            output.extend(digits.iter().map(|&d| self.symbols[d]));
        }

        output
    }

    /// Encode text (as UTF-8) as glyphs
    pub fn encode_text(&self, text: &str) -> String {
        self.encode(text.as_bytes())
    }

    /// Non-empty, a whole number of groups, and only alphabet symbols
    pub fn is_valid_encoding(&self, encoded: &str) -> bool {
        let mut count = 0;
        for symbol in encoded.chars() {
            if self.digit_of(symbol).is_none() {
                return false;
            }
            count += 1;
        }
        count > 0 && count % self.digits_per_byte == 0
    }

    /// Decode glyphs back to bytes.
    ///
    /// Fails on a partial trailing group, on any foreign character, and on a
    /// group whose value exceeds 255. Empty input decodes to an empty buffer.
    pub fn decode(&self, encoded: &str) -> GlyphResult<Vec<u8>> {
        let width = self.digits_per_byte;
        let symbols: Vec<char> = encoded.chars().collect();
        if symbols.len() % width != 0 {
            return Err(GlyphError::InvalidLength { len: symbols.len(), width });
        }

        let base = self.base() as u32;
        let mut output = Vec::with_capacity(symbols.len() / width);

        for (group, chunk) in symbols.chunks(width).enumerate() {
            if chunk.len() != width {
                return Err(GlyphError::InvalidLength { len: symbols.len(), width });
            }

            let mut value = 0u32;
            for (offset, &symbol) in chunk.iter().enumerate() {
                let digit = self.digit_of(symbol).ok_or(GlyphError::InvalidSymbol {
                    symbol,
                    position: group * width + offset,
                })?;
                value = value * base + digit;
            }

            let byte = u8::try_from(value).map_err(|_| GlyphError::ByteOutOfRange { group, value })?;
            output.push(byte);
        }

        Ok(output)
    }

    /// Decode a payload for display or export; empty input is refused
    fn decode_payload(&self, encoded: &str) -> GlyphResult<Vec<u8>> {
        if encoded.is_empty() {
            return Err(GlyphError::Empty);
        }
        self.decode(encoded)
    }

    /// Decode for text display.
    ///
    /// Binary payloads (known signature or invalid UTF-8) are refused with a
    /// hint to use file export instead.
    pub fn decode_to_text(&self, encoded: &str) -> GlyphTextResult {
        let data = match self.decode_payload(encoded) {
            Ok(data) => data,
            Err(err) => {
                debug!(error = %err, "rejected glyph input");
                return GlyphTextResult::failed(None, err.to_string());
            }
        };

        if let PayloadKind::Binary(mime) = detect_payload_kind(&data) {
            debug!(mime, len = data.len(), "glyph payload is binary");
            return GlyphTextResult::failed(Some(mime), BINARY_PAYLOAD_MESSAGE);
        }

        match String::from_utf8(data) {
            Ok(text) => GlyphTextResult {
                text,
                success: true,
                mime_type: Some(TEXT_PLAIN),
                error: None,
            },
            Err(_) => GlyphTextResult::failed(Some(OCTET_STREAM), BINARY_PAYLOAD_MESSAGE),
        }
    }

    /// Decode for file export, tagging the bytes with their payload type
    pub fn decode_to_file(&self, encoded: &str) -> GlyphResult<Blob> {
        let data = self.decode_payload(encoded)?;
        let mime_type = detect_payload_kind(&data).mime_type();
        Ok(Blob::new(mime_type, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_variants_pass_validation() {
        assert_eq!(GlyphCodec::new(TERNARY_SYMBOLS, TERNARY_WIDTH), Ok(GlyphCodec::ternary()));
        assert_eq!(GlyphCodec::new(OCTAL_SYMBOLS, OCTAL_WIDTH), Ok(GlyphCodec::octal()));
    }

    #[test]
    fn test_new_rejects_bad_alphabets() {
        assert!(matches!(GlyphCodec::new(['a'], 8), Err(GlyphError::InvalidAlphabet(_))));
        assert!(matches!(GlyphCodec::new(['a', 'b', 'a'], 8), Err(GlyphError::InvalidAlphabet(_))));
        // 3^5 = 243 < 256
        assert!(matches!(GlyphCodec::new(['a', 'b', 'c'], 5), Err(GlyphError::InvalidAlphabet(_))));
        assert!(matches!(GlyphCodec::new(['a', 'b'], 64), Err(GlyphError::InvalidAlphabet(_))));
        assert!(GlyphCodec::new(['0', '1'], 8).is_ok());
    }

    #[test]
    fn test_octal_encode_single_byte() {
        // 65 = 0o101
        assert_eq!(GlyphCodec::octal().encode(&[65]), "南哦南");
        assert_eq!(GlyphCodec::octal().encode_text("A"), "南哦南");
    }

    #[test]
    fn test_ternary_encode() {
        let codec = GlyphCodec::ternary();
        assert_eq!(codec.encode(&[0]), "哈哈哈哈哈哈哈哈");
        // 255 = 100110 in base 3, padded to 8 digits
        assert_eq!(codec.encode(&[255]), "哈哈基哈哈基基哈");
        assert_eq!(codec.encode(&[]), "");
    }

    #[test]
    fn test_round_trip_all_bytes() {
        let data: Vec<u8> = (0..=255u8).collect();
        for codec in [GlyphCodec::ternary(), GlyphCodec::octal()] {
            let encoded = codec.encode(&data);
            assert_eq!(encoded.chars().count(), data.len() * codec.digits_per_byte());
            assert_eq!(codec.decode(&encoded).unwrap(), data);
        }
    }

    #[test]
    fn test_round_trip_text() {
        let codec = GlyphCodec::ternary();
        let encoded = codec.encode_text("哈基米 hello");
        let result = codec.decode_to_text(&encoded);
        assert!(result.success);
        assert_eq!(result.text, "哈基米 hello");
        assert_eq!(result.mime_type, Some(TEXT_PLAIN));
        assert_eq!(result.error, None);
    }

    #[test]
    fn test_empty_round_trip() {
        let codec = GlyphCodec::octal();
        assert_eq!(codec.decode("").unwrap(), Vec::<u8>::new());
        assert!(!codec.is_valid_encoding(""));
    }

    #[test]
    fn test_is_valid_encoding() {
        let codec = GlyphCodec::ternary();
        assert!(codec.is_valid_encoding("哈哈基哈哈基基哈"));
        assert!(!codec.is_valid_encoding("哈哈基哈哈基基"));
        assert!(!codec.is_valid_encoding("哈哈基哈哈基基X"));
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        assert_eq!(
            GlyphCodec::octal().decode("南哦"),
            Err(GlyphError::InvalidLength { len: 2, width: 3 })
        );
    }

    #[test]
    fn test_decode_rejects_foreign_symbol() {
        assert_eq!(
            GlyphCodec::octal().decode("南哦南南x南"),
            Err(GlyphError::InvalidSymbol { symbol: 'x', position: 4 })
        );
    }

    #[test]
    fn test_decode_rejects_out_of_range_group() {
        // 0o777 = 511
        assert_eq!(
            GlyphCodec::octal().decode("噶噶噶"),
            Err(GlyphError::ByteOutOfRange { group: 0, value: 511 })
        );
    }

    #[test]
    fn test_variants_are_incompatible() {
        let ternary = GlyphCodec::ternary().encode(b"hi");
        let octal = GlyphCodec::octal().encode(b"hi");

        assert!(!GlyphCodec::octal().is_valid_encoding(&ternary));
        assert!(!GlyphCodec::ternary().is_valid_encoding(&octal));
        assert!(GlyphCodec::ternary().decode(&octal).is_err());
    }

    #[test]
    fn test_decode_to_text_binary_payload() {
        let codec = GlyphCodec::octal();
        let encoded = codec.encode(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
        let result = codec.decode_to_text(&encoded);
        assert!(!result.success);
        assert!(result.text.is_empty());
        assert_eq!(result.mime_type, Some("image/png"));
        assert_eq!(result.error.as_deref(), Some(BINARY_PAYLOAD_MESSAGE));
    }

    #[test]
    fn test_decode_to_text_invalid_utf8() {
        let codec = GlyphCodec::ternary();
        let result = codec.decode_to_text(&codec.encode(&[0xC3, 0x28]));
        assert!(!result.success);
        assert_eq!(result.mime_type, Some(OCTET_STREAM));
    }

    #[test]
    fn test_decode_to_text_malformed_input() {
        let result = GlyphCodec::ternary().decode_to_text("哈基");
        assert!(!result.success);
        assert_eq!(result.mime_type, None);
        assert!(result.error.unwrap().contains("not a multiple of 8"));
    }

    #[test]
    fn test_empty_payload_is_refused() {
        let codec = GlyphCodec::ternary();

        let result = codec.decode_to_text("");
        assert!(!result.success);
        assert!(result.text.is_empty());
        assert_eq!(result.mime_type, None);
        assert_eq!(result.error, Some(GlyphError::Empty.to_string()));

        assert_eq!(codec.decode_to_file(""), Err(GlyphError::Empty));
    }

    #[test]
    fn test_decode_to_file() {
        let codec = GlyphCodec::octal();

        let pdf = codec.decode_to_file(&codec.encode(b"%PDF-1.4")).unwrap();
        assert_eq!(pdf.mime_type, "application/pdf");
        assert_eq!(pdf.data, b"%PDF-1.4");

        let text = codec.decode_to_file(&codec.encode_text("plain")).unwrap();
        assert_eq!(text.mime_type, TEXT_PLAIN);

        let noise = codec.decode_to_file(&codec.encode(&[0xFE, 0x00, 0xFF])).unwrap();
        assert_eq!(noise.mime_type, OCTET_STREAM);

        assert!(codec.decode_to_file("南").is_err());
    }

    #[test]
    fn test_detect_payload_kind() {
        assert_eq!(detect_payload_kind(&[0xD0, 0xCF, 0x11, 0xE0]), PayloadKind::Binary("application/vnd.ms-office"));
        assert_eq!(detect_payload_kind(b"GIF89a"), PayloadKind::Binary("image/gif"));
        assert_eq!(detect_payload_kind(b"hello"), PayloadKind::Text);
    }
}
