//! Error types for atomkit

use thiserror::Error;

use crate::{BinaryOp, Kind};

/// Core atomkit errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AtomError {
    // Construction errors
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    // Wire errors
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(Malformation),

    #[error("Payload too large: {len} bytes does not fit a u32 length field")]
    PayloadTooLarge { len: usize },

    // Ordering errors
    #[error("Incomparable operands: {left} and {right}")]
    IncomparableOperands { left: Kind, right: Kind },

    // Arithmetic errors
    #[error("Arithmetic error: {0}")]
    Arithmetic(ArithmeticFault),
}

impl AtomError {
    /// True for any decode-time rejection
    pub fn is_malformed(&self) -> bool {
        matches!(self, AtomError::MalformedEncoding(_))
    }
}

impl From<Malformation> for AtomError {
    fn from(m: Malformation) -> Self {
        AtomError::MalformedEncoding(m)
    }
}

impl From<ArithmeticFault> for AtomError {
    fn from(f: ArithmeticFault) -> Self {
        AtomError::Arithmetic(f)
    }
}

/// Reason a byte buffer was rejected by the decoder
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Malformation {
    #[error("buffer too short: expected {expected}, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("type tag is not valid UTF-8")]
    TagNotUtf8,

    #[error("unknown type tag {0:?}")]
    UnknownTag(String),

    #[error("tag length {0} exceeds the longest known tag")]
    TagTooLong(usize),

    #[error("{kind} payload must be {expected} bytes, got {actual}")]
    PayloadWidth {
        kind: Kind,
        expected: usize,
        actual: usize,
    },

    #[error("payload length {len} exceeds limit {limit}")]
    PayloadOverLimit { len: usize, limit: usize },

    #[error("string payload is not valid UTF-8")]
    StringNotUtf8,

    #[error("invalid boolean byte 0x{0:02x}")]
    InvalidBoolean(u8),

    #[error("float payload is NaN")]
    NotANumber,

    #[error("dictionary key has no value")]
    UnpairedKey,

    #[error("duplicate dictionary key")]
    DuplicateKey,

    #[error("nesting depth exceeds limit {0}")]
    DepthExceeded(usize),

    #[error("{0} trailing bytes after atom")]
    TrailingBytes(usize),
}

/// Reason an arithmetic operation was refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticFault {
    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    Overflow,

    #[error("result is not a finite number")]
    NonFinite,

    #[error("operator {op} is not defined for {left} and {right}")]
    UnsupportedOperands { op: BinaryOp, left: Kind, right: Kind },
}

/// Result type for atomkit operations
pub type AtomResult<T> = Result<T, AtomError>;
