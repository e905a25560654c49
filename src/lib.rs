//! # emx-codec
//!
//! Byte codecs with content-type sniffing.
//!
//! ## Components
//!
//! - [`sniff`]: classifies a byte buffer (MIME guess, text-likeness, UTF-8 validity)
//! - [`encoder`] / [`decoder`]: standard Base64 with result shaping by content type
//! - [`glyph`]: a positional-numeral codec that spells bytes with a small symbol alphabet
//! - [`mime`]: MIME type → file extension lookup and typed blobs
//! - [`input`]: asynchronous reads of files and stdin
//!
//! ## Base64
//!
//! ```
//! use emx_codec::{Base64Decoder, DecodeOptions};
//!
//! let result = Base64Decoder::new().decode("SGVsbG8=", DecodeOptions::default());
//! assert_eq!(result.decoded_text, "Hello");
//! ```
//!
//! ## Glyph codec
//!
//! Each byte becomes a fixed-width run of base-N digits, each digit one symbol.
//! The ternary variant uses `哈基米` with 8 symbols per byte, the octal variant
//! an 8-symbol alphabet with 3 symbols per byte.
//!
//! ```
//! use emx_codec::GlyphCodec;
//!
//! let codec = GlyphCodec::octal();
//! let encoded = codec.encode(b"A"); // 65 = 0o101
//! assert_eq!(encoded.chars().count(), 3);
//! assert_eq!(codec.decode(&encoded).unwrap(), b"A");
//! ```
//!
//! ## Error handling
//!
//! Malformed glyph input is a fault ([`GlyphError`]). Malformed Base64,
//! undecodable text and binary payloads are reported on the returned result
//! instead, since an interactive caller is expected to recover from them.

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod glyph;
pub mod input;
pub mod mime;
pub mod sniff;

pub use decoder::{Base64Decoder, DecodeOptions, DecodeResult, OutputMode};
pub use encoder::Base64Encoder;
pub use error::{GlyphError, GlyphResult, ReadError};
pub use glyph::{GlyphCodec, GlyphTextResult, PayloadKind};
pub use mime::{extension_for, Blob};
pub use sniff::{classify, detect_mime_type, is_text_like, ContentClassification};
