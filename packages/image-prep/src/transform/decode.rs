use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;

use crate::errors::CompressionError;
use crate::transform::orientation::{apply_orientation, read_orientation, Orientation};

/// 画像バイト列をデコードする
///
/// 宣言された MIME タイプから形式が分かればそれを使い、分からなければ推測する。
/// EXIF Orientation を適用し、表示上の向きに揃えた画像を返す。
pub fn decode_image(data: &[u8], mime_type: &str) -> Result<DynamicImage, CompressionError> {
    let mut reader = ImageReader::new(Cursor::new(data));

    match ImageFormat::from_mime_type(mime_type.trim().to_ascii_lowercase()) {
        Some(format) => reader.set_format(format),
        None => {
            reader = reader.with_guessed_format().map_err(|e| {
                CompressionError::DecodeError(format!("failed to guess format: {e}"))
            })?;
        }
    }

    let img = reader
        .decode()
        .map_err(|e| CompressionError::DecodeError(e.to_string()))?;

    let orientation = read_orientation(data).unwrap_or(Orientation::Normal);
    Ok(apply_orientation(img, orientation))
}
