//! Reading input into byte buffers
//!
//! This is the only asynchronous part of the crate. Each read resolves
//! exactly once; there is no retry. Callers that need cancellation use
//! [`read_bytes_with_timeout`].

use crate::encoder::Base64Encoder;
use crate::error::ReadError;
use crate::glyph::GlyphCodec;
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Read a whole file
pub async fn read_bytes(path: impl AsRef<Path>) -> Result<Vec<u8>, ReadError> {
    let path = path.as_ref();
    let data = tokio::fs::read(path).await.map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), len = data.len(), "read input file");
    Ok(data)
}

/// Read a whole file, giving up after `timeout`
pub async fn read_bytes_with_timeout(
    path: impl AsRef<Path>,
    timeout: Duration,
) -> Result<Vec<u8>, ReadError> {
    let path = path.as_ref();
    race_timeout(path, timeout, read_bytes(path)).await
}

async fn race_timeout<T>(
    path: &Path,
    timeout: Duration,
    read: impl Future<Output = Result<T, ReadError>>,
) -> Result<T, ReadError> {
    tokio::time::timeout(timeout, read)
        .await
        .map_err(|_| ReadError::TimedOut {
            path: path.to_path_buf(),
            timeout,
        })?
}

/// Read all of stdin
pub async fn read_stdin() -> Result<Vec<u8>, ReadError> {
    let mut data = Vec::new();
    tokio::io::stdin()
        .read_to_end(&mut data)
        .await
        .map_err(ReadError::Stdin)?;
    Ok(data)
}

/// Read a file and encode it with a glyph codec
pub async fn encode_file_to_glyph(codec: &GlyphCodec, path: impl AsRef<Path>) -> Result<String, ReadError> {
    let data = read_bytes(path).await?;
    Ok(codec.encode(&data))
}

/// Read a file and encode it as Base64
pub async fn encode_file_to_base64(path: impl AsRef<Path>) -> Result<String, ReadError> {
    let data = read_bytes(path).await?;
    Ok(Base64Encoder::new().encode_bytes(&data))
}
