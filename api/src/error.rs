use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("clarity value truncated at offset {0}")]
    Truncated(usize),

    #[error("unknown clarity type tag 0x{0:02x}")]
    UnknownTypeTag(u8),

    #[error("clarity value nested too deeply")]
    TooDeep,

    #[error("trailing bytes after clarity value")]
    TrailingBytes,

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("expected {expected}, got {got}")]
    UnexpectedType {
        expected: &'static str,
        got: &'static str,
    },

    #[error("tuple is missing key `{0}`")]
    MissingTupleKey(String),

    #[error("string is not valid utf-8")]
    InvalidString,

    #[error("invalid c32 character `{0}`")]
    InvalidC32Char(char),

    #[error("c32check string too short")]
    C32TooShort,

    #[error("c32check checksum mismatch")]
    BadChecksum,

    #[error("address payload must be 20 bytes, got {0}")]
    BadAddressLength(usize),

    #[error("contract returned error: {0}")]
    ContractErr(String),
}

pub type Result<T> = std::result::Result<T, Error>;
