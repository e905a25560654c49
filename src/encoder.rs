//! Base64 encoder

use base64::Engine;
use std::io::Write;

/// Encodes text and raw bytes as standard Base64
pub struct Base64Encoder {
    // Stateless; the standard alphabet with padding is always used
}

impl Base64Encoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self {}
    }

    /// Encode text as UTF-8 then Base64.
    ///
    /// Empty or whitespace-only input yields an empty string.
    pub fn encode_text(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }
        self.encode_bytes(text.as_bytes())
    }

    /// Encode raw bytes
    pub fn encode_bytes(&self, data: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(data)
    }

    /// Encode raw bytes directly to a writer
    pub fn encode_to_writer<W: Write>(&self, data: &[u8], mut writer: W) -> std::io::Result<()> {
        writer.write_all(self.encode_bytes(data).as_bytes())
    }
}

impl Default for Base64Encoder {
    fn default() -> Self {
        Self::new()
    }
}
