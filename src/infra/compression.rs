//! Zlib compression of object frames.

use crate::error::{Error, Result};

/// Compression level used for stored objects (zlib default).
const LEVEL: u8 = 6;

/// Compresses a frame with the zlib wrapper (header and Adler-32 trailer).
pub fn compress(data: &[u8]) -> Vec<u8> {
    miniz_oxide::deflate::compress_to_vec_zlib(data, LEVEL)
}

/// Decompresses a zlib stream.
///
/// Returns `Error::DecompressionFailed` for empty, truncated or corrupted
/// input, including a bad header or checksum.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Err(Error::DecompressionFailed);
    }
    miniz_oxide::inflate::decompress_to_vec_zlib(data).map_err(|_| Error::DecompressionFailed)
}
