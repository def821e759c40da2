use serde::{Deserialize, Serialize};
use std::fmt;

use crate::blob::ImageBlob;
use crate::constants::PlatformLimits;

/// 検証失敗の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationKind {
    NotAnImage,
    SizeExceeded,
    TooLargeForEncoding,
}

/// 検証失敗
///
/// 呼び出し側でメッセージを組み立てられるよう、実測値と上限を持つ。
/// `NotAnImage` の場合はどちらも 0。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub kind: ValidationKind,
    pub actual: u64,
    pub limit: u64,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ValidationKind::NotAnImage => write!(f, "file is not an image"),
            ValidationKind::SizeExceeded => write!(
                f,
                "file is too large ({:.1}MB, max {:.1}MB)",
                to_mb(self.actual),
                to_mb(self.limit)
            ),
            ValidationKind::TooLargeForEncoding => write!(
                f,
                "file is too large to encode (estimated {} chars, max {})",
                self.actual, self.limit
            ),
        }
    }
}

fn to_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// アップロード前の画像を検証する
///
/// 画像形式 → サイズ → base64 化後の推定長 の順に確認し、
/// 最初に引っかかった理由を返す。すべて通れば None。
pub fn validate(
    blob: &ImageBlob,
    max_size_bytes: u64,
    limits: &PlatformLimits,
) -> Option<ValidationFailure> {
    if !blob.is_image() {
        return Some(ValidationFailure {
            kind: ValidationKind::NotAnImage,
            actual: 0,
            limit: 0,
        });
    }

    let size = blob.size();
    if size > max_size_bytes {
        return Some(ValidationFailure {
            kind: ValidationKind::SizeExceeded,
            actual: size,
            limit: max_size_bytes,
        });
    }

    if limits.exceeds_string_budget(size) {
        return Some(ValidationFailure {
            kind: ValidationKind::TooLargeForEncoding,
            actual: limits.estimated_base64_len(size),
            limit: limits.string_budget(),
        });
    }

    None
}
