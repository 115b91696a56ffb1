// src/core/protocol/mod.rs

pub mod resp_value;

pub use resp_value::{RespValue, format_double};
