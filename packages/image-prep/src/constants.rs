use serde::{Deserialize, Serialize};

/// キャンバスの最大ピクセル数（幅×高さ、4096×4096 相当）
pub const MAX_CANVAS_PIXELS: u64 = 16_777_216;

/// base64 文字列の最大長
pub const MAX_STRING_LENGTH: usize = 536_870_888;

/// 推定サイズと比較する際の安全係数
pub const SAFETY_MARGIN: f64 = 0.8;

/// base64 化したときのおおよその膨張率
pub const BASE64_EXPANSION: f64 = 1.37;

/// デフォルトの最大幅・高さ
pub const DEFAULT_MAX_DIMENSION: u32 = 1920;

/// デフォルト品質（0.0-1.0）
pub const DEFAULT_QUALITY: f32 = 0.85;

/// デフォルトのアップロード上限（10MiB）
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// プラットフォーム上限値
///
/// 実行環境ごとの上限をまとめた不変の設定値。
/// プランナー・エンジン・トランスコーダへ明示的に渡す。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformLimits {
    pub max_canvas_pixels: u64,
    pub max_string_length: usize,
    pub safety_margin: f64,
    pub base64_expansion: f64,
}

impl PlatformLimits {
    /// ブラウザ相当の上限値
    pub const BROWSER: Self = Self {
        max_canvas_pixels: MAX_CANVAS_PIXELS,
        max_string_length: MAX_STRING_LENGTH,
        safety_margin: SAFETY_MARGIN,
        base64_expansion: BASE64_EXPANSION,
    };

    /// 安全係数を掛けた base64 文字列の許容長
    pub fn string_budget(&self) -> u64 {
        (self.max_string_length as f64 * self.safety_margin) as u64
    }

    /// バイト数から base64 文字列長を見積もる（表示用に切り捨て）
    pub fn estimated_base64_len(&self, size: u64) -> u64 {
        (size as f64 * self.base64_expansion) as u64
    }

    /// base64 化後の推定長が許容長を超えるか
    ///
    /// 端数を落とさずに比較する
    pub fn exceeds_string_budget(&self, size: u64) -> bool {
        size as f64 * self.base64_expansion > self.max_string_length as f64 * self.safety_margin
    }

    /// 再エンコードを省略できるサイズの上限
    pub fn fast_path_budget(&self, max_size_bytes: u64) -> u64 {
        (max_size_bytes as f64 * self.safety_margin) as u64
    }
}

impl Default for PlatformLimits {
    fn default() -> Self {
        Self::BROWSER
    }
}
