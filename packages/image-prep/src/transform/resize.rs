use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::DynamicImage;

use crate::constants::PlatformLimits;
use crate::errors::CompressionError;
use crate::transform::dimensions::Dimensions;

/// 描画先のラスタサーフェス（RGB8）
///
/// 出力サイズちょうどで確保し、スコープを抜けると解放される。
pub struct RasterSurface {
    dimensions: Dimensions,
    image: Image<'static>,
}

impl RasterSurface {
    /// キャンバス上限を確認してサーフェスを確保する
    pub fn allocate(target: Dimensions, limits: &PlatformLimits) -> Result<Self, CompressionError> {
        if target.width == 0 || target.height == 0 || target.pixels() > limits.max_canvas_pixels {
            return Err(CompressionError::DimensionError {
                width: target.width,
                height: target.height,
                limit: limits.max_canvas_pixels,
            });
        }

        tracing::trace!(width = target.width, height = target.height, "allocating raster surface");

        Ok(Self {
            dimensions: target,
            image: Image::new(target.width, target.height, PixelType::U8x3),
        })
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// RGB8 のピクセル列
    pub fn pixels(&self) -> &[u8] {
        self.image.buffer()
    }

    /// 画像をサーフェス全体に引き伸ばして描画する（余白なし、Lanczos3）
    pub fn draw_scaled(&mut self, img: &DynamicImage) -> Result<(), CompressionError> {
        let rgb = img.to_rgb8();
        let (width, height) = (rgb.width(), rgb.height());

        let src = Image::from_vec_u8(width, height, rgb.into_raw(), PixelType::U8x3)
            .map_err(|e| CompressionError::EncodeError(format!("failed to wrap source: {e}")))?;

        let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));
        Resizer::new()
            .resize(&src, &mut self.image, &options)
            .map_err(|e| CompressionError::EncodeError(format!("draw failed: {e}")))?;

        Ok(())
    }
}

impl Drop for RasterSurface {
    fn drop(&mut self) {
        tracing::trace!(
            width = self.dimensions.width,
            height = self.dimensions.height,
            "released raster surface"
        );
    }
}
