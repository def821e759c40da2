use serde::{Deserialize, Serialize};

use crate::blob::ImageBlob;
use crate::compress::CompressionResult;
use crate::errors::{ErrorKind, MediaError};
use crate::transform::{CompressionOptions, Dimensions};
use crate::validation::ValidationFailure;

/// ワーカーへのリクエスト
///
/// `type` の値は snake_case、各フィールドはレスポンスと同じ camelCase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum WorkerRequest {
    Compress {
        id: String,
        blob: ImageBlob,
        #[serde(default)]
        options: CompressionOptions,
    },
    Validate {
        id: String,
        blob: ImageBlob,
        max_size_bytes: u64,
    },
}

impl WorkerRequest {
    pub fn id(&self) -> &str {
        match self {
            Self::Compress { id, .. } | Self::Validate { id, .. } => id,
        }
    }
}

/// ワーカーからのレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkerResponse {
    /// 起動完了の通知（id なし）
    Ready,
    Success {
        id: String,
        result: EncodedResult,
    },
    Validation {
        id: String,
        result: Option<ValidationFailure>,
    },
    Error {
        id: String,
        error: WorkerError,
    },
}

impl WorkerResponse {
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Ready => None,
            Self::Success { id, .. } | Self::Validation { id, .. } | Self::Error { id, .. } => {
                Some(id.as_str())
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// base64 化した圧縮結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedResult {
    pub data_uri: String,
    pub mime_type: String,
    pub original_size: u64,
    pub compressed_size: u64,
    pub compression_ratio: f64,
    pub width: u32,
    pub height: u32,
}

impl EncodedResult {
    pub fn new(result: &CompressionResult, data_uri: String) -> Self {
        let Dimensions { width, height } = result.dimensions;
        Self {
            data_uri,
            mime_type: result.compressed_blob.mime_type.clone(),
            original_size: result.original_size,
            compressed_size: result.compressed_size,
            compression_ratio: result.compression_ratio,
            width,
            height,
        }
    }
}

/// ワーカーのエラー
///
/// 分類（kind）と表示用メッセージの両方を持つ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct WorkerError {
    pub kind: ErrorKind,
    pub message: String,
}

impl WorkerError {
    pub fn unavailable() -> Self {
        Self {
            kind: ErrorKind::WorkerUnavailable,
            message: "compression worker is not running".to_string(),
        }
    }
}

impl From<MediaError> for WorkerError {
    fn from(err: MediaError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
