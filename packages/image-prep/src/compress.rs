use serde::{Deserialize, Serialize};

use crate::blob::ImageBlob;
use crate::constants::PlatformLimits;
use crate::errors::CompressionError;
use crate::transform::{
    decode_image, encode_surface, plan_dimensions, CompressionOptions, Dimensions, RasterSurface,
};

/// 圧縮結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionResult {
    pub compressed_blob: ImageBlob,
    pub original_size: u64,
    pub compressed_size: u64,
    /// original_size / compressed_size（1 未満もそのまま返す）
    pub compression_ratio: f64,
    /// 出力画像の幅・高さ
    pub dimensions: Dimensions,
}

impl CompressionResult {
    fn new(original_size: u64, compressed_blob: ImageBlob, dimensions: Dimensions) -> Self {
        let compressed_size = compressed_blob.size();
        Self {
            compressed_blob,
            original_size,
            compressed_size,
            compression_ratio: original_size as f64 / compressed_size as f64,
            dimensions,
        }
    }

    fn unchanged(blob: ImageBlob, dimensions: Dimensions) -> Self {
        let size = blob.size();
        Self {
            compressed_blob: blob,
            original_size: size,
            compressed_size: size,
            compression_ratio: 1.0,
            dimensions,
        }
    }
}

/// デコード前の形式・サイズ確認
fn preflight(blob: &ImageBlob, options: &CompressionOptions) -> Result<(), CompressionError> {
    if !blob.is_image() {
        return Err(CompressionError::InvalidInput {
            mime_type: blob.mime_type.clone(),
        });
    }

    if blob.size() > options.max_size_bytes {
        return Err(CompressionError::SizeExceeded {
            size: blob.size(),
            limit: options.max_size_bytes,
        });
    }

    Ok(())
}

/// 画像を圧縮する
///
/// すでに上限内に収まっている画像は再エンコードせずそのまま返す。
/// それ以外はリサイズして `options.output_format` で再エンコードする。
/// インライン実行・ワーカー実行のどちらもこの関数を使う。
pub fn compress(
    blob: &ImageBlob,
    options: &CompressionOptions,
    limits: &PlatformLimits,
) -> Result<CompressionResult, CompressionError> {
    options.validate()?;
    preflight(blob, options)?;

    let img = decode_image(&blob.data, &blob.mime_type)?;
    let source = Dimensions::new(img.width(), img.height());
    if source.width == 0 || source.height == 0 {
        return Err(CompressionError::DimensionError {
            width: source.width,
            height: source.height,
            limit: limits.max_canvas_pixels,
        });
    }

    let plan = plan_dimensions(source, options.max_width, options.max_height, limits);
    tracing::debug!(
        src_w = source.width,
        src_h = source.height,
        dst_w = plan.target.width,
        dst_h = plan.target.height,
        needs_resize = plan.needs_resize,
        "planned output dimensions"
    );

    if !plan.needs_resize && blob.size() <= limits.fast_path_budget(options.max_size_bytes) {
        tracing::info!(size = blob.size(), "image already within limits, skipping re-encode");
        return Ok(CompressionResult::unchanged(blob.clone(), source));
    }

    let data = {
        let mut surface = RasterSurface::allocate(plan.target, limits)?;
        surface.draw_scaled(&img)?;
        encode_surface(&surface, options.output_format, options.encoder_quality())?
    };

    let compressed = ImageBlob::new(data, options.output_format.content_type());
    let result = CompressionResult::new(blob.size(), compressed, plan.target);

    tracing::info!(
        original_size = result.original_size,
        compressed_size = result.compressed_size,
        ratio = result.compression_ratio,
        "image compressed"
    );

    Ok(result)
}

/// 画像を圧縮する（非同期）
///
/// デコード・エンコードはブロッキングスレッドで実行し、呼び出し側は await で待つ。
pub async fn compress_inline(
    blob: ImageBlob,
    options: CompressionOptions,
    limits: PlatformLimits,
) -> Result<CompressionResult, CompressionError> {
    tokio::task::spawn_blocking(move || compress(&blob, &options, &limits))
        .await
        .map_err(|e| CompressionError::TaskFailed(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{encoded_blob, jpeg_blob, png_blob};
    use image::ImageFormat;

    fn options(max_width: u32, max_height: u32) -> CompressionOptions {
        CompressionOptions {
            max_width,
            max_height,
            ..Default::default()
        }
    }

    #[test]
    fn test_fast_path_returns_original() {
        // 500x500 の PNG はデフォルト設定でそのまま返る
        let blob = png_blob(500, 500);
        let result =
            compress(&blob, &CompressionOptions::default(), &PlatformLimits::default()).unwrap();

        assert_eq!(result.compressed_blob, blob);
        assert_eq!(result.compression_ratio, 1.0);
        assert_eq!(result.original_size, result.compressed_size);
        assert_eq!(result.dimensions, Dimensions::new(500, 500));
    }

    #[test]
    fn test_resize_to_bounding_box() {
        let blob = jpeg_blob(800, 600);
        let result = compress(&blob, &options(192, 192), &PlatformLimits::default()).unwrap();

        assert_eq!(result.dimensions, Dimensions::new(192, 144));
        assert_eq!(result.compressed_blob.mime_type, "image/jpeg");
        assert_eq!(result.original_size, blob.size());
        assert_eq!(result.compressed_size, result.compressed_blob.size());

        let decoded = image::load_from_memory(&result.compressed_blob.data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (192, 144));

        let expected = blob.size() as f64 / result.compressed_size as f64;
        assert_eq!(result.compression_ratio, expected);
    }

    #[test]
    fn test_size_exceeded_before_decode() {
        // デコードできないバイト列でも、サイズ超過が先に返る
        let blob = ImageBlob::new(vec![0u8; 15_000_000], "image/jpeg");
        let result = compress(&blob, &CompressionOptions::default(), &PlatformLimits::default());

        match result {
            Err(CompressionError::SizeExceeded { size, limit }) => {
                assert_eq!(size, 15_000_000);
                assert_eq!(limit, 10 * 1024 * 1024);
            }
            other => panic!("expected SizeExceeded, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_input() {
        let blob = ImageBlob::new(b"%PDF-1.7".to_vec(), "application/pdf");
        let result = compress(&blob, &CompressionOptions::default(), &PlatformLimits::default());
        assert!(matches!(result, Err(CompressionError::InvalidInput { .. })));
    }

    #[test]
    fn test_decode_error() {
        let blob = ImageBlob::new(b"not really a jpeg".to_vec(), "image/jpeg");
        let result = compress(&blob, &CompressionOptions::default(), &PlatformLimits::default());
        assert!(matches!(result, Err(CompressionError::DecodeError(_))));
    }

    #[test]
    fn test_invalid_options() {
        let blob = png_blob(10, 10);
        let options = CompressionOptions {
            quality: 0.0,
            ..Default::default()
        };
        let result = compress(&blob, &options, &PlatformLimits::default());
        assert!(matches!(result, Err(CompressionError::InvalidOptions(_))));
    }

    #[test]
    fn test_reencode_when_near_size_budget() {
        // 寸法は枠内だがサイズが上限の 80% を超えるので再エンコードする
        let blob = png_blob(64, 64);
        let options = CompressionOptions {
            max_size_bytes: blob.size(),
            ..Default::default()
        };
        let result = compress(&blob, &options, &PlatformLimits::default()).unwrap();

        assert_eq!(result.dimensions, Dimensions::new(64, 64));
        assert_eq!(result.compressed_blob.mime_type, "image/jpeg");
        assert_eq!(&result.compressed_blob.data[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_ratio_below_one_is_reported() {
        // 1x1 の PNG は JPEG にすると大きくなる
        let blob = png_blob(1, 1);
        let options = CompressionOptions {
            max_size_bytes: blob.size(),
            ..Default::default()
        };
        let result = compress(&blob, &options, &PlatformLimits::default()).unwrap();

        assert!(result.compressed_size > result.original_size);
        assert!(result.compression_ratio < 1.0);
    }

    #[test]
    fn test_injected_canvas_limit() {
        let limits = PlatformLimits {
            max_canvas_pixels: 10_000,
            ..PlatformLimits::default()
        };
        let blob = png_blob(400, 200);
        let result = compress(&blob, &CompressionOptions::default(), &limits).unwrap();

        assert_eq!(result.dimensions, Dimensions::new(141, 70));
        assert!(result.dimensions.pixels() <= 10_000);
    }

    #[test]
    fn test_second_pass_is_noop() {
        let blob = jpeg_blob(600, 300);
        let options = options(200, 200);
        let limits = PlatformLimits::default();

        let first = compress(&blob, &options, &limits).unwrap();
        let second = compress(&first.compressed_blob, &options, &limits).unwrap();

        assert_eq!(second.compressed_blob.data, first.compressed_blob.data);
        assert_eq!(second.compression_ratio, 1.0);
        assert_eq!(second.dimensions, first.dimensions);
    }

    #[test]
    fn test_alpha_source_is_flattened() {
        let img = image::DynamicImage::ImageRgba8(image::RgbaImage::new(300, 100));
        let blob = encoded_blob(&img, ImageFormat::Png, "image/png");
        let result = compress(&blob, &options(150, 150), &PlatformLimits::default()).unwrap();

        let decoded = image::load_from_memory(&result.compressed_blob.data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (150, 50));
    }

    #[tokio::test]
    async fn test_inline_matches_sync() {
        let blob = jpeg_blob(320, 240);
        let options = options(160, 160);
        let limits = PlatformLimits::default();

        let sync = compress(&blob, &options, &limits).unwrap();
        let inline = compress_inline(blob, options, limits).await.unwrap();

        assert_eq!(inline, sync);
    }

    #[tokio::test]
    async fn test_inline_propagates_errors() {
        let blob = ImageBlob::new(vec![1u8, 2, 3], "text/plain");
        let result = compress_inline(blob, CompressionOptions::default(), PlatformLimits::default())
            .await;
        assert!(matches!(result, Err(CompressionError::InvalidInput { .. })));
    }
}
