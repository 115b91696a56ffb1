// src/core/errors.rs

//! Defines the primary error type for the entire engine.

use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// The main error enum, representing all possible failures within the engine.
/// Using `thiserror` allows for clean error definitions and automatic `From`
/// trait implementations. The display strings of client-facing variants are
/// load-bearing: they are what a client sees on the wire.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ZirconError {
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    #[error("Syntax error")]
    SyntaxError,

    #[error("Wrong number of arguments for '{0}' command")]
    WrongArgumentCount(String),

    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    #[error("Value is not an integer or out of range")]
    NotAnInteger,

    #[error("value is not a valid float")]
    NotAFloat,

    #[error("min or max is not a float")]
    FloatRange,

    #[error("min or max not valid string range item")]
    LexRange,

    #[error("resulting score is not a number (NaN)")]
    NanScore,

    #[error("XX and NX options at the same time are not compatible")]
    NxAndXx,

    #[error("GT, LT, and/or NX options at the same time are not compatible")]
    GtLtNx,

    #[error("INCR option supports a single increment-element pair")]
    IncrSinglePair,

    #[error("weight value is not a float")]
    WeightNotAFloat,

    #[error("at least 1 input key is needed for {0}")]
    AtLeastOneKey(String),

    #[error("invalid cursor")]
    InvalidCursor,

    #[error("Key not found")]
    KeyNotFound,

    #[error("OOM command not allowed when used memory > 'maxmemory'")]
    MaxMemoryReached,

    #[error("Locking Error: {0}")]
    LockingError(String),

    #[error("Persistence Error: {0}")]
    Persistence(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

// --- From trait implementations for easy error conversion ---

impl From<ParseIntError> for ZirconError {
    fn from(_: ParseIntError) -> Self {
        ZirconError::NotAnInteger
    }
}

impl From<ParseFloatError> for ZirconError {
    fn from(_: ParseFloatError) -> Self {
        ZirconError::NotAFloat
    }
}

impl From<std::string::FromUtf8Error> for ZirconError {
    fn from(_: std::string::FromUtf8Error) -> Self {
        ZirconError::SyntaxError
    }
}
