use thiserror::Error;

/// Validation and contract errors exposed by `tqfeed-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter or digit: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid exchange '{value}', expected one of CFFEX, SHFE, CZCE, DCE, INE, GFEX, SSE, SZSE")]
    InvalidExchange { value: String },
    #[error("invalid interval '{value}', expected one of 1m, 1h, d, w, tick")]
    InvalidInterval { value: String },

    #[error("invalid local timestamp '{value}', expected YYYY-MM-DD or YYYY-MM-DD HH:MM[:SS]")]
    InvalidLocalTimestamp { value: String },
    #[error("timestamp '{value}' is not in the exchange offset")]
    TimestampWrongOffset { value: String },
    #[error("epoch nanoseconds {nanos} are out of the representable range")]
    TimestampOutOfRange { nanos: i128 },
    #[error("query end '{end}' is before start '{start}'")]
    InvertedRange { start: String, end: String },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },

    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}
