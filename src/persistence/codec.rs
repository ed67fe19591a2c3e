//! Compression and encryption collaborators for persisted document blobs.

use crate::config::DEFAULT_COMPRESSION_LEVEL;
use crate::error::CodecError;

/// Whole-block, lossless compressor.
///
/// `decompress(compress(x)) == x` must hold for every byte sequence, including the
/// empty one. Implementations run on blocking threads and must be `Send + Sync`.
pub trait Compressor: Send + Sync {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;
}

/// Caller-supplied encryption applied after compression.
///
/// Key and nonce handling belong to the implementation; every blob is passed through
/// independently.
pub trait Cipher: Send + Sync {
    fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;

    fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;
}

/// zstd frame compressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZstdCompressor {
    level: i32,
}

impl ZstdCompressor {
    pub const fn new(level: i32) -> Self {
        Self { level }
    }

    pub const fn level(&self) -> i32 {
        self.level
    }
}

impl Default for ZstdCompressor {
    fn default() -> Self {
        Self::new(DEFAULT_COMPRESSION_LEVEL)
    }
}

impl Compressor for ZstdCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        zstd::encode_all(data, self.level).map_err(|e| CodecError::Compress(e.to_string()))
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        zstd::decode_all(data).map_err(|e| CodecError::Decompress(e.to_string()))
    }
}

/// Pass-through compressor for hosts that compress at the storage layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityCompressor;

impl Compressor for IdentityCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(data.to_vec())
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(data.to_vec())
    }
}
