use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// MIME タイプ付きのバイナリ画像データ
///
/// サイズ判定はすべて `data` の実バイト数で行う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBlob {
    pub data: Bytes,
    pub mime_type: String,
}

impl ImageBlob {
    pub fn new(data: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// バイト数
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// MIME タイプが画像系かどうか
    pub fn is_image(&self) -> bool {
        self.mime_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }
}
