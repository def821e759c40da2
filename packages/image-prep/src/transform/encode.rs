use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::errors::CompressionError;
use crate::transform::params::OutputFormat;
use crate::transform::resize::RasterSurface;

/// サーフェスの内容をエンコードする
pub fn encode_surface(
    surface: &RasterSurface,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, CompressionError> {
    let dims = surface.dimensions();
    let mut buf = Vec::new();

    match format {
        OutputFormat::Jpeg => {
            JpegEncoder::new_with_quality(&mut buf, quality)
                .write_image(surface.pixels(), dims.width, dims.height, ExtendedColorType::Rgb8)
                .map_err(|e| CompressionError::EncodeError(format!("JPEG encode failed: {e}")))?;
        }
    }

    if buf.is_empty() {
        return Err(CompressionError::EncodeError(
            "encoder produced no output".to_string(),
        ));
    }

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PlatformLimits;
    use crate::transform::dimensions::Dimensions;
    use image::DynamicImage;

    fn surface(w: u32, h: u32) -> RasterSurface {
        let mut surface =
            RasterSurface::allocate(Dimensions::new(w, h), &PlatformLimits::default()).unwrap();
        surface.draw_scaled(&DynamicImage::new_rgb8(w, h)).unwrap();
        surface
    }

    #[test]
    fn test_encode_jpeg() {
        let data = encode_surface(&surface(10, 10), OutputFormat::Jpeg, 80).unwrap();

        assert!(!data.is_empty());
        // JPEG マジックナンバー確認
        assert_eq!(&data[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encoded_dimensions() {
        let data = encode_surface(&surface(64, 16), OutputFormat::Jpeg, 85).unwrap();
        let decoded = image::load_from_memory(&data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 16));
    }

    #[test]
    fn test_lower_quality_is_smaller() {
        let mut noisy = image::RgbImage::new(64, 64);
        for (x, y, px) in noisy.enumerate_pixels_mut() {
            *px = image::Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x ^ y) * 31 % 256) as u8]);
        }
        let mut surface =
            RasterSurface::allocate(Dimensions::new(64, 64), &PlatformLimits::default()).unwrap();
        surface.draw_scaled(&DynamicImage::ImageRgb8(noisy)).unwrap();

        let high = encode_surface(&surface, OutputFormat::Jpeg, 95).unwrap();
        let low = encode_surface(&surface, OutputFormat::Jpeg, 20).unwrap();
        assert!(low.len() < high.len());
    }
}
