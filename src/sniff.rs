//! Content sniffing
//!
//! Guesses what a byte buffer holds. Detection rules, first match wins:
//! 1. Magic-number signatures ([`MAGIC_SIGNATURES`], table order matters)
//! 2. Structural text formats: XML, JSON, HTML, CSS, JavaScript
//! 3. Byte order marks (UTF-8, UTF-16)
//! 4. Text heuristics → `text/plain`, otherwise `application/octet-stream`

use tracing::trace;

/// Generic binary MIME type
pub const OCTET_STREAM: &str = "application/octet-stream";
/// Plain text MIME type
pub const TEXT_PLAIN: &str = "text/plain";

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];
const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];

// Heuristic window and thresholds
const SAMPLE_LEN: usize = 500;
const MIN_PRINTABLE_RATIO: f64 = 0.3;
const MAX_BINARY_RATIO: f64 = 0.3;
const MAX_NULL_RATIO: f64 = 0.2;
const MAX_INVALID_UTF8_RATIO: f64 = 0.2;

// Structural detector windows
const JSON_LOOKAHEAD: usize = 100;
const HTML_PREFIX_LEN: usize = 15;
const CSS_MIN_LEN: usize = 10;
const CSS_WINDOW: usize = 100;
const JS_MIN_LEN: usize = 20;
const JS_WINDOW: usize = 150;

const CSS_KEYWORDS: &[&str] = &["margin", "padding", "font", "color", "background", "display"];

/// A fixed byte pattern anchored at one or more offsets
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    /// MIME type reported on a match
    pub mime_type: &'static str,
    /// Minimum buffer length before the signature is considered
    pub min_len: usize,
    /// `(offset, pattern)` pairs that must all match
    pub segments: &'static [(usize, &'static [u8])],
}

impl Signature {
    pub const fn new(
        mime_type: &'static str,
        min_len: usize,
        segments: &'static [(usize, &'static [u8])],
    ) -> Self {
        Self { mime_type, min_len, segments }
    }

    /// Check whether `data` carries this signature
    pub fn matches(&self, data: &[u8]) -> bool {
        data.len() >= self.min_len
            && self
                .segments
                .iter()
                .all(|&(offset, pattern)| data.get(offset..offset + pattern.len()) == Some(pattern))
    }
}

/// Binary signatures in priority order.
///
/// ZIP-based Office formats are not told apart from plain ZIP.
pub const MAGIC_SIGNATURES: &[Signature] = &[
    // Images
    Signature::new("image/jpeg", 4, &[(0, &[0xFF, 0xD8, 0xFF])]),
    Signature::new("image/png", 8, &[(0, &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])]),
    Signature::new("image/gif", 6, &[(0, b"GIF87a")]),
    Signature::new("image/gif", 6, &[(0, b"GIF89a")]),
    Signature::new("image/webp", 12, &[(0, b"RIFF"), (8, b"WEBP")]),
    Signature::new("image/bmp", 4, &[(0, b"BM")]),
    Signature::new("image/tiff", 4, &[(0, b"II*\0")]),
    Signature::new("image/tiff", 4, &[(0, b"MM\0*")]),
    Signature::new("image/x-icon", 4, &[(0, &[0x00, 0x00, 0x01, 0x00])]),
    // Documents
    Signature::new("application/pdf", 4, &[(0, b"%PDF")]),
    Signature::new("application/msword", 8, &[(0, &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])]),
    // Archives
    Signature::new("application/zip", 4, &[(0, b"PK\x03\x04")]),
    Signature::new("application/zip", 4, &[(0, b"PK\x05\x06")]),
    Signature::new("application/zip", 4, &[(0, b"PK\x07\x08")]),
    Signature::new("application/x-rar-compressed", 6, &[(0, b"Rar!\x1A\x07")]),
    Signature::new("application/gzip", 6, &[(0, &[0x1F, 0x8B, 0x08])]),
    Signature::new("application/x-bzip", 2, &[(0, b"BZ")]),
    // Executables
    Signature::new("application/x-elf", 4, &[(0, b"\x7FELF")]),
    Signature::new("application/x-msdownload", 2, &[(0, b"MZ")]),
    // Audio and video
    Signature::new("audio/mp3", 4, &[(0, b"ID3")]),
    Signature::new("video/mp4", 12, &[(0, &[0x00, 0x00, 0x00]), (4, b"ftyp")]),
    Signature::new("video/webm", 4, &[(0, &[0x1A, 0x45, 0xDF, 0xA3])]),
    Signature::new("application/ogg", 4, &[(0, b"OggS")]),
    Signature::new("video/x-msvideo", 12, &[(0, b"RIFF"), (8, b"AVI")]),
    Signature::new("video/x-flv", 8, &[(0, b"FLV\x01")]),
];

/// Return the MIME type of the first signature in `table` that matches
pub fn match_signature(data: &[u8], table: &[Signature]) -> Option<&'static str> {
    table.iter().find(|sig| sig.matches(data)).map(|sig| sig.mime_type)
}

/// Best-effort classification of a byte buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentClassification {
    /// MIME type guess (never empty)
    pub mime_type: &'static str,
    /// Heuristic judgement that the bytes are human-readable text
    pub is_text_like: bool,
    /// Whether the whole buffer is well-formed UTF-8
    pub is_valid_utf8: bool,
}

/// Classify a byte buffer. Pure and total.
pub fn classify(data: &[u8]) -> ContentClassification {
    let is_text_like = is_text_like(data);
    let mime_type = detect_format(data).unwrap_or(if is_text_like { TEXT_PLAIN } else { OCTET_STREAM });

    ContentClassification {
        mime_type,
        is_text_like,
        is_valid_utf8: std::str::from_utf8(data).is_ok(),
    }
}

/// Guess the MIME type of a byte buffer
pub fn detect_mime_type(data: &[u8]) -> &'static str {
    classify(data).mime_type
}

/// Run the signature, structural and BOM detectors in order
fn detect_format(data: &[u8]) -> Option<&'static str> {
    if let Some(mime) = match_signature(data, MAGIC_SIGNATURES) {
        trace!(mime, "magic signature matched");
        return Some(mime);
    }

    if let Some(mime) = detect_structured_text(data) {
        trace!(mime, "structured text detected");
        return Some(mime);
    }

    detect_bom(data)
}

fn detect_structured_text(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(b"<?xml") {
        return Some("application/xml");
    }

    if data.len() >= 2 {
        let closing = match data[0] {
            b'{' => Some('}'),
            b'[' => Some(']'),
            _ => None,
        };
        if let Some(closing) = closing {
            if printable_string(window(data, JSON_LOOKAHEAD)).contains(closing) {
                return Some("application/json");
            }
        }
    }

    if data.len() >= HTML_PREFIX_LEN {
        let prefix = printable_string(window(data, HTML_PREFIX_LEN)).to_ascii_lowercase();
        if prefix.contains("<!doctype html") || prefix.contains("<html") {
            return Some("text/html");
        }
    }

    if data.len() >= CSS_MIN_LEN && looks_like_css(data) {
        return Some("text/css");
    }

    if data.len() >= JS_MIN_LEN && looks_like_javascript(data) {
        return Some("application/javascript");
    }

    None
}

fn looks_like_css(data: &[u8]) -> bool {
    let content = printable_string(window(data, CSS_WINDOW)).to_ascii_lowercase();
    content.contains('{') && CSS_KEYWORDS.iter().any(|kw| content.contains(kw))
}

fn looks_like_javascript(data: &[u8]) -> bool {
    let content = printable_string(window(data, JS_WINDOW)).to_ascii_lowercase();
    (content.contains("function") && content.contains('{'))
        || content.contains("var ")
        || content.contains("let ")
        || content.contains("const ")
        || (content.contains('=') && content.contains(';'))
        || content.contains("export ")
        || content.contains("import ")
}

fn detect_bom(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&UTF8_BOM) {
        Some("text/plain; charset=utf-8")
    } else if data.starts_with(&UTF16_BE_BOM) || data.starts_with(&UTF16_LE_BOM) {
        Some("text/plain; charset=utf-16")
    } else {
        None
    }
}

fn has_bom(data: &[u8]) -> bool {
    detect_bom(data).is_some()
}

fn window(data: &[u8], len: usize) -> &[u8] {
    &data[..data.len().min(len)]
}

/// Render bytes for pattern scanning: printable ASCII, tab, LF and CR are
/// kept, every other byte becomes a space.
pub fn printable_string(data: &[u8]) -> String {
    data.iter()
        .map(|&b| match b {
            32..=126 | b'\t' | b'\n' | b'\r' => b as char,
            _ => ' ',
        })
        .collect()
}

/// Heuristic text/binary judgement
///
/// Text if the buffer starts with a BOM, if the UTF-8 structure check finds
/// mostly valid multi-byte sequences, or if the byte statistics of the first
/// 500 bytes look like text.
pub fn is_text_like(data: &[u8]) -> bool {
    if has_bom(data) {
        return true;
    }

    if looks_like_utf8(data) {
        return true;
    }

    ByteStats::collect(window(data, SAMPLE_LEN)).is_text_like()
}

/// Byte counts over a sample window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ByteStats {
    total: usize,
    printable: usize,
    control: usize,
    null: usize,
    binary: usize,
}

impl ByteStats {
    fn collect(sample: &[u8]) -> Self {
        let mut stats = Self {
            total: sample.len(),
            ..Self::default()
        };

        for &b in sample {
            match b {
                32..=126 => stats.printable += 1,
                b'\t' | b'\n' | b'\r' => stats.control += 1,
                0 => stats.null += 1,
                1..=8 | 14..=31 | 127..=255 => stats.binary += 1,
                // vertical tab and form feed land in no bucket
                _ => {}
            }
        }

        stats
    }

    fn ratio(&self, count: usize) -> f64 {
        count as f64 / self.total as f64
    }

    fn is_text_like(&self) -> bool {
        if self.total == 0 {
            return false;
        }

        self.ratio(self.printable) > MIN_PRINTABLE_RATIO
            && self.ratio(self.binary) < MAX_BINARY_RATIO
            && self.ratio(self.null) < MAX_NULL_RATIO
    }
}

/// Count `(valid, invalid)` multi-byte UTF-8 sequences in the sample window.
///
/// A lead byte without its continuation bytes counts as invalid and the
/// walk advances by one byte.
fn utf8_sequence_counts(data: &[u8]) -> (usize, usize) {
    let sample = window(data, SAMPLE_LEN);
    let is_continuation = |b: &u8| b & 0xC0 == 0x80;

    let mut valid = 0;
    let mut invalid = 0;
    let mut i = 0;

    while i < sample.len() {
        let lead = sample[i];
        let width = if lead & 0x80 == 0 {
            i += 1;
            continue;
        } else if lead & 0xE0 == 0xC0 {
            2
        } else if lead & 0xF0 == 0xE0 {
            3
        } else if lead & 0xF8 == 0xF0 {
            4
        } else {
            0
        };

        let complete = width > 0
            && sample
                .get(i + 1..i + width)
                .is_some_and(|tail| tail.iter().all(is_continuation));

        if complete {
            valid += 1;
            i += width;
        } else {
            invalid += 1;
            i += 1;
        }
    }

    (valid, invalid)
}

fn looks_like_utf8(data: &[u8]) -> bool {
    let (valid, invalid) = utf8_sequence_counts(data);
    valid > 0 && (invalid as f64 / (valid + invalid) as f64) < MAX_INVALID_UTF8_RATIO
}
