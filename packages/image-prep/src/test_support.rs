use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

use crate::blob::ImageBlob;

/// グラデーションのテスト画像
pub fn gradient(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    DynamicImage::ImageRgb8(img)
}

pub fn png_blob(width: u32, height: u32) -> ImageBlob {
    encoded_blob(&gradient(width, height), ImageFormat::Png, "image/png")
}

pub fn jpeg_blob(width: u32, height: u32) -> ImageBlob {
    encoded_blob(&gradient(width, height), ImageFormat::Jpeg, "image/jpeg")
}

pub fn encoded_blob(img: &DynamicImage, format: ImageFormat, mime_type: &str) -> ImageBlob {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    ImageBlob::new(buf.into_inner(), mime_type)
}
