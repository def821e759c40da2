use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 画像処理の統合エラー型
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("compression error: {0}")]
    Compression(#[from] CompressionError),

    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),
}

impl MediaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Compression(err) => err.kind(),
            Self::Encoding(err) => err.kind(),
        }
    }
}

/// 圧縮パイプラインのエラー
#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("not an image: {mime_type:?}")]
    InvalidInput { mime_type: String },

    #[error("file size {size} bytes exceeds limit of {limit} bytes")]
    SizeExceeded { size: u64, limit: u64 },

    #[error("decode failed: {0}")]
    DecodeError(String),

    #[error("target {width}x{height} exceeds canvas limit of {limit} pixels")]
    DimensionError { width: u32, height: u32, limit: u64 },

    #[error("encode failed: {0}")]
    EncodeError(String),

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("compression task failed: {0}")]
    TaskFailed(String),
}

impl CompressionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::SizeExceeded { .. } => ErrorKind::SizeExceeded,
            Self::DecodeError(_) => ErrorKind::DecodeError,
            Self::DimensionError { .. } => ErrorKind::DimensionError,
            Self::EncodeError(_) => ErrorKind::EncodeError,
            Self::InvalidOptions(_) => ErrorKind::InvalidOptions,
            Self::TaskFailed(_) => ErrorKind::Internal,
        }
    }
}

/// base64 変換のエラー
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("estimated base64 length {estimated} exceeds limit of {limit}")]
    TooLargeForEncoding { estimated: u64, limit: u64 },

    #[error("base64 length {actual} exceeds limit of {limit}")]
    EncodingOverflow { actual: u64, limit: u64 },

    #[error("malformed data URI: {0}")]
    MalformedDataUri(String),
}

impl EncodingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TooLargeForEncoding { .. } => ErrorKind::TooLargeForEncoding,
            Self::EncodingOverflow { .. } => ErrorKind::EncodingOverflow,
            Self::MalformedDataUri(_) => ErrorKind::MalformedDataUri,
        }
    }
}

/// ワーカーのメッセージで使うエラー分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    SizeExceeded,
    DecodeError,
    DimensionError,
    EncodeError,
    InvalidOptions,
    TooLargeForEncoding,
    EncodingOverflow,
    MalformedDataUri,
    WorkerUnavailable,
    Internal,
}
