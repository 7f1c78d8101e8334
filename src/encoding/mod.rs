//! # Encoding Utilities
//!
//! Text and binary codecs shared by every subsystem:
//! - Base64 encoding (standard and URL-safe alphabets, decode accepts both)
//! - Hexadecimal to binary conversion
//! - "File-string" packing: the canonical length-prefixed framing of an
//!   ordered sequence of byte strings used for on-disk records

use thiserror::Error;

/// Encoding error types
#[derive(Debug, Error)]
pub enum CodecError {
    /// Malformed caller input (bad Base64, odd-length hex, unknown digit)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A packed record failed to parse
    #[error("corrupt record: {0}")]
    Corruption(String),
}

/// Result type for encoding operations
pub type Result<T> = std::result::Result<T, CodecError>;

// Module declarations
pub mod codec;
pub mod packing;

// Re-exports for convenience
pub use codec::{base64_decode, base64_encode, hex_to_bytes};
pub use packing::{pack, unpack, unpack_prefix, PackReader};
