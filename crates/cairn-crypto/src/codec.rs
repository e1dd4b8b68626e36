use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{CodecError, CodecResult};

/// Compress a framed record with zlib for storage at rest.
pub fn compress(data: &[u8]) -> CodecResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| CodecError::CompressionFailed(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| CodecError::CompressionFailed(e.to_string()))
}

/// Decompress a stored record.
///
/// Fails with [`CodecError::CorruptObject`] when the input is not a valid
/// zlib stream, including a stream that is truncated.
pub fn decompress(data: &[u8]) -> CodecResult<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| CodecError::CorruptObject(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_then_decompress() {
        let data = b"blob 11\0hello world".repeat(10);
        let packed = compress(&data).unwrap();
        assert_ne!(packed, data);
        assert_eq!(decompress(&packed).unwrap(), data);
    }

    #[test]
    fn empty_input() {
        let packed = compress(b"").unwrap();
        assert!(decompress(&packed).unwrap().is_empty());
    }

    #[test]
    fn garbage_is_corrupt() {
        let err = decompress(b"definitely not zlib").unwrap_err();
        assert!(matches!(err, CodecError::CorruptObject(_)));
    }

    #[test]
    fn truncated_stream_is_corrupt() {
        let packed = compress(&b"some payload worth compressing".repeat(4)).unwrap();
        let err = decompress(&packed[..packed.len() / 2]).unwrap_err();
        assert!(matches!(err, CodecError::CorruptObject(_)));
    }
}
