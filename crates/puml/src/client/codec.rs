//! Transport codec: raw DEFLATE followed by PlantUML's base64 alphabet
//!
//! The PlantUML server expects diagram text compressed with headerless
//! DEFLATE and encoded with the alphabet `0-9A-Za-z-_`. The standard base64
//! alphabet produces tokens the server silently misreads, so the alphabet
//! here must not change.

use std::io::{Read, Write};

use base64::alphabet::Alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::core::{PumlError, Result, DEFAULT_COMPRESSION_LEVEL};

/// The 64 symbols of PlantUML's base64 variant, in value order
pub const ALPHABET_SYMBOLS: &str =
    "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-_";

pub const PLANTUML_ALPHABET: Alphabet = match Alphabet::new(ALPHABET_SYMBOLS) {
    Ok(alphabet) => alphabet,
    Err(_) => panic!("invalid PlantUML base64 alphabet"),
};

/// Unpadded on encode; decoding accepts tokens with or without `=` padding.
pub const PLANTUML_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &PLANTUML_ALPHABET,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Compression strategy applied to diagram bytes before encoding
pub trait Compressor: Send + Sync {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>>;
}

/// Encoding strategy turning compressed bytes into a URL-safe token
pub trait Encoder: Send + Sync {
    fn encode(&self, input: &[u8]) -> String;
}

/// Headerless DEFLATE at a fixed level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeflateCompressor {
    level: u32,
}

impl DeflateCompressor {
    pub fn new() -> Self {
        Self::with_level(DEFAULT_COMPRESSION_LEVEL)
    }

    /// Levels above 9 are clamped to 9
    pub fn with_level(level: u32) -> Self {
        Self {
            level: level.min(9),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }
}

impl Default for DeflateCompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compressor for DeflateCompressor {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(self.level));
        encoder
            .write_all(input)
            .map_err(|e| PumlError::compression_error(e.to_string()))?;
        encoder
            .finish()
            .map_err(|e| PumlError::compression_error(e.to_string()))
    }
}

/// Base64 over [`PLANTUML_ALPHABET`], no padding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlantUmlEncoder;

impl Encoder for PlantUmlEncoder {
    fn encode(&self, input: &[u8]) -> String {
        PLANTUML_ENGINE.encode(input)
    }
}

/// Decode a token produced by [`PlantUmlEncoder`]
pub fn decode(token: &str) -> Result<Vec<u8>> {
    PLANTUML_ENGINE
        .decode(token.trim())
        .map_err(|e| PumlError::decode_error(e.to_string()))
}

/// Upper bound on inflated diagram text, matching the response body cap
pub const MAX_DECODED_SIZE: u64 = 50 * 1024 * 1024;

/// Inflate bytes produced by [`DeflateCompressor`], up to [`MAX_DECODED_SIZE`]
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    decompress_with_limit(input, MAX_DECODED_SIZE)
}

/// Inflate `input`, failing once the output would exceed `limit` bytes
pub fn decompress_with_limit(input: &[u8], limit: u64) -> Result<Vec<u8>> {
    let mut decoder = DeflateDecoder::new(input).take(limit.saturating_add(1));
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| PumlError::compression_error(e.to_string()))?;
    if out.len() as u64 > limit {
        return Err(PumlError::compression_error(format!(
            "inflated data exceeds {} bytes",
            limit
        )));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_has_64_unique_symbols() {
        let mut symbols: Vec<char> = ALPHABET_SYMBOLS.chars().collect();
        assert_eq!(symbols.len(), 64);
        symbols.sort_unstable();
        symbols.dedup();
        assert_eq!(symbols.len(), 64);
    }

    #[test]
    fn test_encode_uses_custom_alphabet() {
        // 0x00 0x10 0x83 -> indices 0, 1, 2, 3
        assert_eq!(PlantUmlEncoder.encode(&[0x00, 0x10, 0x83]), "0123");
        // All ones -> index 63 everywhere
        assert_eq!(PlantUmlEncoder.encode(&[0xff, 0xff, 0xff]), "____");
        // 62 and 63 map to '-' and '_'
        assert_eq!(PlantUmlEncoder.encode(&[0xfb, 0xff]), "-_y");
    }

    #[test]
    fn test_encode_emits_no_padding() {
        let token = PlantUmlEncoder.encode(b"a");
        assert_eq!(token.len(), 2);
        assert!(!token.contains('='));
    }

    #[test]
    fn test_decode_accepts_padding() {
        assert_eq!(decode("OG").unwrap(), b"a");
        assert_eq!(decode("OG==").unwrap(), b"a");
    }

    #[test]
    fn test_decode_rejects_foreign_symbols() {
        let err = decode("ab+/").unwrap_err();
        assert!(matches!(err, PumlError::DecodeError { .. }));
    }

    #[test]
    fn test_compress_round_trip() {
        let input = b"@startuml\nAlice->Bob: hello\n@enduml";
        let compressed = DeflateCompressor::new().compress(input).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), input);
    }

    #[test]
    fn test_compress_empty_input() {
        let compressed = DeflateCompressor::new().compress(b"").unwrap();
        assert!(!compressed.is_empty());
        assert!(decompress(&compressed).unwrap().is_empty());
    }

    #[test]
    fn test_compression_level_clamped() {
        assert_eq!(DeflateCompressor::with_level(42).level(), 9);
        assert_eq!(DeflateCompressor::default().level(), DEFAULT_COMPRESSION_LEVEL);
    }

    #[test]
    fn test_decompress_stops_at_limit() {
        // A few hundred bytes of DEFLATE inflating to 64 KiB of zeros
        let compressed = DeflateCompressor::new().compress(&[0u8; 64 * 1024]).unwrap();
        assert!(compressed.len() < 1024);

        let err = decompress_with_limit(&compressed, 4096).unwrap_err();
        assert!(matches!(err, PumlError::CompressionError { .. }));
        assert!(err.to_string().contains("exceeds 4096 bytes"));

        // Exactly at the limit is fine
        let out = decompress_with_limit(&compressed, 64 * 1024).unwrap();
        assert_eq!(out.len(), 64 * 1024);
    }

    #[test]
    fn test_decompress_rejects_garbage() {
        assert!(decompress(&[0xff, 0xff, 0xff, 0xff]).is_err());
    }
}
