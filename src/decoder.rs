//! Base64 decoder with content-aware result shaping

use crate::mime::Blob;
use crate::sniff;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Reported when the input is not Base64
pub const INVALID_BASE64_MESSAGE: &str = "Invalid Base64 encoding";
/// Reported (as a warning) when image output is requested for non-image bytes
pub const NOT_AN_IMAGE_WARNING: &str = "Warning: this may not be image data";

/// Standard alphabet; padding optional, trailing bits tolerated
const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// How decoded bytes should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Text if the bytes look like text, otherwise file
    #[default]
    Auto,
    Text,
    Image,
    File,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(OutputMode::Auto),
            "text" => Ok(OutputMode::Text),
            "image" => Ok(OutputMode::Image),
            "file" => Ok(OutputMode::File),
            other => Err(format!("unknown output mode '{}' (expected auto, text, image or file)", other)),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputMode::Auto => "auto",
            OutputMode::Text => "text",
            OutputMode::Image => "image",
            OutputMode::File => "file",
        };
        f.write_str(name)
    }
}

/// Options for a decode call
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    pub mode: OutputMode,
    /// Stop after classification, without materializing text or blob
    pub detect_only: bool,
}

impl DecodeOptions {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode, detect_only: false }
    }

    pub fn detect_only() -> Self {
        Self {
            mode: OutputMode::Auto,
            detect_only: true,
        }
    }
}

/// Outcome of a Base64 decode.
///
/// At most one of `decoded_text` and `decoded_blob` is populated. A
/// non-empty `error_message` without a blob is a failure; alongside a blob
/// it is a warning and the blob is still usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeResult {
    pub decoded_text: String,
    pub decoded_blob: Option<Blob>,
    pub detected_mime_type: String,
    pub error_message: String,
}

impl DecodeResult {
    fn failure(message: &str) -> Self {
        Self {
            error_message: message.to_string(),
            ..Self::default()
        }
    }

    /// `data:` URL for the decoded blob, or empty
    pub fn decoded_data_url(&self) -> String {
        self.decoded_blob.as_ref().map(Blob::data_url).unwrap_or_default()
    }

    /// Decoding failed and nothing usable was produced
    pub fn is_failure(&self) -> bool {
        !self.error_message.is_empty() && self.decoded_blob.is_none()
    }

    /// A usable blob was produced together with a warning
    pub fn is_warning(&self) -> bool {
        !self.error_message.is_empty() && self.decoded_blob.is_some()
    }
}

/// Decodes Base64 input into text or typed blobs
pub struct Base64Decoder {
    // Stateless; see `DecodeOptions` for per-call settings
}

impl Base64Decoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self {}
    }

    /// Decode `encoded`, shaping the result by `options`.
    ///
    /// Whitespace anywhere in the input is ignored. Failures are reported
    /// in `error_message`, never as a panic or error value.
    pub fn decode(&self, encoded: &str, options: DecodeOptions) -> DecodeResult {
        let cleaned = Self::strip_whitespace(encoded);
        if cleaned.is_empty() {
            return DecodeResult::default();
        }

        let bytes = match FORGIVING.decode(cleaned.as_bytes()) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(error = %err, "rejected base64 input");
                return DecodeResult::failure(INVALID_BASE64_MESSAGE);
            }
        };

        let classification = sniff::classify(&bytes);
        let mut result = DecodeResult {
            detected_mime_type: classification.mime_type.to_string(),
            ..DecodeResult::default()
        };

        if options.detect_only {
            return result;
        }

        let mode = match options.mode {
            OutputMode::Auto if classification.is_text_like => OutputMode::Text,
            OutputMode::Auto => OutputMode::File,
            mode => mode,
        };
        debug!(%mode, mime = classification.mime_type, len = bytes.len(), "decoded base64 payload");

        if mode == OutputMode::Text {
            result.decoded_text = Self::bytes_to_text(bytes);
            return result;
        }

        // classify falls back to application/octet-stream, never an empty type
        let mime_type = classification.mime_type;
        if mode == OutputMode::Image && !mime_type.starts_with("image/") {
            result.error_message = NOT_AN_IMAGE_WARNING.to_string();
        }
        result.decoded_blob = Some(Blob::new(mime_type, bytes));

        result
    }

    /// UTF-8 if possible, otherwise one char per byte
    fn bytes_to_text(bytes: Vec<u8>) -> String {
        match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => err.into_bytes().into_iter().map(char::from).collect(),
        }
    }

    fn strip_whitespace(input: &str) -> String {
        input.chars().filter(|c| !c.is_whitespace()).collect()
    }
}

impl Default for Base64Decoder {
    fn default() -> Self {
        Self::new()
    }
}
