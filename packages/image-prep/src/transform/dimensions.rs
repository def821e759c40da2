use serde::{Deserialize, Serialize};

use crate::constants::PlatformLimits;

/// 画像の幅・高さ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// 総ピクセル数
    pub fn pixels(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// アスペクト比（幅 / 高さ）
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// リサイズ計画
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizePlan {
    pub target: Dimensions,
    pub needs_resize: bool,
}

/// キャンバス上限に収まる候補サイズを計算する
///
/// 横長なら幅、それ以外は高さを基準にし、アスペクト比を維持する
fn fit_canvas_limit(ratio: f64, max_w: u32, max_h: u32, max_pixels: u64) -> (f64, f64) {
    let max_pixels = max_pixels as f64;

    if ratio > 1.0 {
        let w = (max_pixels * ratio).sqrt().min(max_w as f64);
        (w, w / ratio)
    } else {
        let h = (max_pixels / ratio).sqrt().min(max_h as f64);
        (h * ratio, h)
    }
}

/// 最大幅・高さの枠に収まるよう縮小する
///
/// 枠に対する比率が大きい方の辺を基準にする
fn fit_bounding_box(w: f64, h: f64, ratio: f64, max_w: u32, max_h: u32) -> (f64, f64) {
    let (max_w, max_h) = (max_w as f64, max_h as f64);

    if w / max_w > h / max_h {
        (max_w, max_w / ratio)
    } else {
        (max_h * ratio, max_h)
    }
}

/// 出力サイズを決定する
///
/// 1. 総ピクセル数がキャンバス上限を超える場合は上限内に縮小
/// 2. さらに最大幅・高さを超える場合は枠内に縮小
/// 3. 切り捨てて整数化（最小1px）
///
/// `source` の幅・高さは 1 以上であること。
pub fn plan_dimensions(
    source: Dimensions,
    max_width: u32,
    max_height: u32,
    limits: &PlatformLimits,
) -> ResizePlan {
    let ratio = source.aspect_ratio();
    let mut needs_resize = false;
    let (mut w, mut h) = (source.width as f64, source.height as f64);

    if source.pixels() > limits.max_canvas_pixels {
        (w, h) = fit_canvas_limit(ratio, max_width, max_height, limits.max_canvas_pixels);
        needs_resize = true;
    }

    if w > max_width as f64 || h > max_height as f64 {
        (w, h) = fit_bounding_box(w, h, ratio, max_width, max_height);
        needs_resize = true;
    }

    // 極端なアスペクト比でも 0px にはしない
    let target = Dimensions::new((w.floor() as u32).max(1), (h.floor() as u32).max(1));

    ResizePlan {
        target,
        needs_resize,
    }
}
