use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_DIMENSION, DEFAULT_MAX_SIZE_BYTES, DEFAULT_QUALITY};
use crate::errors::CompressionError;

/// 出力フォーマット
///
/// 出力は JPEG のみ。シリアライズ時は MIME タイプ文字列になる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "image/jpeg", alias = "image/jpg")]
    Jpeg,
}

impl OutputFormat {
    /// MIME タイプから OutputFormat を作成
    pub fn from_mime_type(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Content-Type を取得
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// 圧縮オプション
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompressionOptions {
    pub max_width: u32,
    pub max_height: u32,
    /// 0.0 より大きく 1.0 以下
    pub quality: f32,
    pub max_size_bytes: u64,
    pub output_format: OutputFormat,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_DIMENSION,
            max_height: DEFAULT_MAX_DIMENSION,
            quality: DEFAULT_QUALITY,
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            output_format: OutputFormat::Jpeg,
        }
    }
}

impl CompressionOptions {
    /// 環境変数から CompressionOptions を作成する
    ///
    /// 未設定の項目はデフォルト値を使う:
    /// - IMAGE_PREP_MAX_WIDTH
    /// - IMAGE_PREP_MAX_HEIGHT
    /// - IMAGE_PREP_QUALITY
    /// - IMAGE_PREP_MAX_SIZE_BYTES
    /// - IMAGE_PREP_OUTPUT_FORMAT
    pub fn from_env() -> Result<Self, CompressionError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CompressionError> {
        let mut options = Self::default();

        if let Some(v) = lookup("IMAGE_PREP_MAX_WIDTH") {
            options.max_width = parse_var("IMAGE_PREP_MAX_WIDTH", &v)?;
        }
        if let Some(v) = lookup("IMAGE_PREP_MAX_HEIGHT") {
            options.max_height = parse_var("IMAGE_PREP_MAX_HEIGHT", &v)?;
        }
        if let Some(v) = lookup("IMAGE_PREP_QUALITY") {
            options.quality = parse_var("IMAGE_PREP_QUALITY", &v)?;
        }
        if let Some(v) = lookup("IMAGE_PREP_MAX_SIZE_BYTES") {
            options.max_size_bytes = parse_var("IMAGE_PREP_MAX_SIZE_BYTES", &v)?;
        }
        if let Some(v) = lookup("IMAGE_PREP_OUTPUT_FORMAT") {
            options.output_format = OutputFormat::from_mime_type(&v).ok_or_else(|| {
                CompressionError::InvalidOptions(format!(
                    "IMAGE_PREP_OUTPUT_FORMAT: unsupported format {v:?}"
                ))
            })?;
        }

        options.validate()?;
        Ok(options)
    }

    /// オプションを検証する
    pub fn validate(&self) -> Result<(), CompressionError> {
        if !(self.quality > 0.0 && self.quality <= 1.0) {
            return Err(CompressionError::InvalidOptions(format!(
                "quality must be in (0, 1], got {}",
                self.quality
            )));
        }

        if self.max_width == 0 || self.max_height == 0 {
            return Err(CompressionError::InvalidOptions(format!(
                "max dimensions must be positive, got {}x{}",
                self.max_width, self.max_height
            )));
        }

        Ok(())
    }

    /// エンコーダに渡す 1-100 の品質値
    pub fn encoder_quality(&self) -> u8 {
        (self.quality * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, CompressionError> {
    value
        .trim()
        .parse()
        .map_err(|_| CompressionError::InvalidOptions(format!("{key}: cannot parse {value:?}")))
}
