// src/core/commands/helpers.rs

//! Parsing helpers shared across commands.

use crate::core::ZirconError;
use bytes::Bytes;

/// Extracts a UTF-8 string from an argument token.
pub fn extract_string(arg: &Bytes) -> Result<String, ZirconError> {
    String::from_utf8(arg.to_vec()).map_err(|_| ZirconError::SyntaxError)
}

/// Parses a score argument: `+inf` and `-inf` are accepted verbatim, NaN is
/// never accepted, everything else goes through the float parser.
pub fn parse_score(s: &str) -> Result<f64, ZirconError> {
    let value = match s {
        "+inf" => f64::INFINITY,
        "-inf" => f64::NEG_INFINITY,
        _ => s.parse::<f64>().map_err(|_| ZirconError::NotAFloat)?,
    };
    if value.is_nan() {
        return Err(ZirconError::NotAFloat);
    }
    Ok(value)
}
