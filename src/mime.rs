//! MIME type helpers: file extensions and typed byte blobs

use base64::Engine;

/// Conventional file extension for a MIME type (without the leading dot).
///
/// Parameters such as `; charset=utf-8` are ignored. Unknown `text/*`
/// types map to `txt`, everything else unknown maps to `bin`.
pub fn extension_for(mime_type: &str) -> &'static str {
    let base = mime_type.split(';').next().unwrap_or_default().trim();

    known_extension(base).unwrap_or(if base.starts_with("text/") { "txt" } else { "bin" })
}

fn known_extension(base: &str) -> Option<&'static str> {
    let ext = match base {
        // Images
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        "image/tiff" => "tiff",
        "image/x-icon" => "ico",
        "image/svg+xml" => "svg",

        // Documents
        "application/pdf" => "pdf",
        "application/msword" => "doc",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => "docx",
        "application/vnd.ms-excel" => "xls",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => "xlsx",
        "application/vnd.ms-powerpoint" => "ppt",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation" => "pptx",

        // Archives
        "application/zip" => "zip",
        "application/x-rar-compressed" => "rar",
        "application/gzip" => "gz",
        "application/x-bzip" => "bz2",
        "application/x-7z-compressed" => "7z",
        "application/x-tar" => "tar",

        // Executables
        "application/x-msdownload" => "exe",
        "application/x-elf" => "elf",

        // Audio and video
        "audio/mp3" | "audio/mpeg" => "mp3",
        "audio/wav" => "wav",
        "audio/ogg" | "application/ogg" => "ogg",
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        "video/x-msvideo" => "avi",
        "video/x-flv" => "flv",
        "video/quicktime" => "mov",

        // Text and source
        "text/plain" => "txt",
        "text/html" => "html",
        "text/css" => "css",
        "application/javascript" => "js",
        "application/json" => "json",
        "application/xml" => "xml",
        "text/csv" => "csv",
        "text/markdown" => "md",

        // Fonts
        "font/ttf" => "ttf",
        "font/otf" => "otf",
        "font/woff" => "woff",
        "font/woff2" => "woff2",

        _ => return None,
    };
    Some(ext)
}

/// Decoded bytes tagged with their MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(mime_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Render as a `data:` URL
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            base64::engine::general_purpose::STANDARD.encode(&self.data)
        )
    }

    /// Conventional extension for this blob's MIME type
    pub fn extension(&self) -> &'static str {
        extension_for(&self.mime_type)
    }

    /// Download name: `stem` plus the conventional extension
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_strips_parameters() {
        assert_eq!(extension_for("text/plain; charset=utf-8"), "txt");
        assert_eq!(extension_for("text/plain; charset=utf-16"), "txt");
        assert_eq!(extension_for("  image/png  "), "png");
    }

    #[test]
    fn test_extension_fallbacks() {
        assert_eq!(extension_for("application/x-unknown"), "bin");
        assert_eq!(extension_for("text/x-unknown"), "txt");
        assert_eq!(extension_for(""), "bin");
    }

    #[test]
    fn test_extension_known_types() {
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("application/x-bzip"), "bz2");
        assert_eq!(extension_for("application/ogg"), "ogg");
        assert_eq!(extension_for("audio/mpeg"), "mp3");
        assert_eq!(extension_for("font/woff2"), "woff2");
    }

    #[test]
    fn test_blob_data_url() {
        let blob = Blob::new("text/plain", "Hello");
        assert_eq!(blob.data_url(), "data:text/plain;base64,SGVsbG8=");
    }

    #[test]
    fn test_blob_file_name() {
        let blob = Blob::new("application/pdf", vec![0x25, 0x50, 0x44, 0x46]);
        assert_eq!(blob.file_name("decoded"), "decoded.pdf");

        let unknown = Blob::new("application/octet-stream", vec![0x00]);
        assert_eq!(unknown.file_name("decoded"), "decoded.bin");
    }
}
