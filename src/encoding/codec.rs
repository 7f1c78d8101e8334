//! Base64 and hexadecimal codecs.
//!
//! Encoding always emits padding. Decoding is deliberately forgiving: it
//! accepts both the standard and the URL-safe alphabet (folding `-`/`_`
//! back onto `+`/`/`) and tolerates absent padding, since records produced
//! by older writers circulate in both forms.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

use super::{CodecError, Result};

/// Standard-alphabet engine, padded output.
const STANDARD: GeneralPurpose = base64::engine::general_purpose::STANDARD;

/// URL-safe-alphabet engine, padded output.
const URL_SAFE: GeneralPurpose = base64::engine::general_purpose::URL_SAFE;

/// Decode engine: standard alphabet, padding optional.
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode bytes as Base64, using the URL-safe alphabet when requested.
pub fn base64_encode(data: &[u8], url_safe: bool) -> String {
    if url_safe {
        URL_SAFE.encode(data)
    } else {
        STANDARD.encode(data)
    }
}

/// Decode a Base64 string produced with either alphabet, padded or not.
pub fn base64_decode(encoded: &str) -> Result<Vec<u8>> {
    let folded = encoded.replace('-', "+").replace('_', "/");
    STANDARD_LENIENT
        .decode(folded.as_bytes())
        .map_err(|e| CodecError::InvalidInput(format!("bad base64: {}", e)))
}

/// Convert a hexadecimal string into raw bytes.
///
/// Input must consist of an even number of hex digits; both cases are
/// accepted.
pub fn hex_to_bytes(hex_string: &str) -> Result<Vec<u8>> {
    hex::decode(hex_string).map_err(|e| CodecError::InvalidInput(format!("bad hex: {}", e)))
}
