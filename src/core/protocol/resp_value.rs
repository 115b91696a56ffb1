// src/core/protocol/resp_value.rs

//! Defines the typed reply value produced by the command execution layer,
//! and its RESP wire encoding.

use crate::core::ZirconError;
use bytes::{BufMut, Bytes, BytesMut};

/// `RespValue` is the reply type returned by command execution logic.
///
/// The command layer only produces values; parsing of inbound frames is the
/// job of an external protocol front end. A `RespValue` can be rendered into
/// RESP wire bytes with [`RespValue::encode_to_vec`].
#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    SimpleString(String),
    BulkString(Bytes),
    Integer(i64),
    Array(Vec<RespValue>),
    Null,
    NullArray,
    Error(String),
}

impl RespValue {
    /// Encodes the value into a complete RESP byte sequence.
    pub fn encode_to_vec(&self) -> Vec<u8> {
        let mut buf = BytesMut::new();
        self.encode_into(&mut buf);
        buf.to_vec()
    }

    fn encode_into(&self, buf: &mut BytesMut) {
        match self {
            RespValue::SimpleString(s) => {
                buf.put_u8(b'+');
                buf.put_slice(s.as_bytes());
                buf.put_slice(b"\r\n");
            }
            RespValue::Error(s) => {
                buf.put_u8(b'-');
                buf.put_slice(s.as_bytes());
                buf.put_slice(b"\r\n");
            }
            RespValue::Integer(i) => {
                buf.put_slice(format!(":{i}\r\n").as_bytes());
            }
            RespValue::BulkString(b) => {
                buf.put_slice(format!("${}\r\n", b.len()).as_bytes());
                buf.put_slice(b);
                buf.put_slice(b"\r\n");
            }
            RespValue::Null => {
                buf.put_slice(b"$-1\r\n");
            }
            RespValue::NullArray => {
                buf.put_slice(b"*-1\r\n");
            }
            RespValue::Array(items) => {
                buf.put_slice(format!("*{}\r\n", items.len()).as_bytes());
                for item in items {
                    item.encode_into(buf);
                }
            }
        }
    }
}

impl From<ZirconError> for RespValue {
    /// Renders an error as a protocol error line. Variants whose display
    /// string already begins with an error code (e.g. `WRONGTYPE`) pass
    /// through unchanged; everything else gets the generic `ERR` code.
    fn from(err: ZirconError) -> Self {
        let message = err.to_string();
        match err {
            ZirconError::WrongType => RespValue::Error(message),
            _ => RespValue::Error(format!("ERR {message}")),
        }
    }
}

/// Formats a score the way the reply protocol expects: up to 17 significant
/// digits with trailing zeros trimmed, and `inf`/`-inf` for the infinities.
pub fn format_double(value: f64) -> String {
    if value.is_infinite() {
        return if value > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }
    let mut buffer = ryu::Buffer::new();
    let formatted = buffer.format(value);
    formatted.strip_suffix(".0").unwrap_or(formatted).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_trim_trailing_zeros() {
        assert_eq!(format_double(1.0), "1");
        assert_eq!(format_double(2.5), "2.5");
        assert_eq!(format_double(-3.0), "-3");
        assert_eq!(format_double(f64::INFINITY), "inf");
        assert_eq!(format_double(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn wire_encoding_shapes() {
        assert_eq!(RespValue::Integer(7).encode_to_vec(), b":7\r\n");
        assert_eq!(RespValue::Null.encode_to_vec(), b"$-1\r\n");
        assert_eq!(
            RespValue::BulkString(Bytes::from_static(b"ab")).encode_to_vec(),
            b"$2\r\nab\r\n"
        );
        let arr = RespValue::Array(vec![RespValue::Integer(1), RespValue::Null]);
        assert_eq!(arr.encode_to_vec(), b"*2\r\n:1\r\n$-1\r\n");
    }
}
