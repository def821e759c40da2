use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::blob::ImageBlob;
use crate::constants::PlatformLimits;
use crate::errors::EncodingError;

/// 画像を `data:<mime>;base64,...` 形式の文字列にする
///
/// エンコード前に推定長で、エンコード後に実際の長さで上限を確認する。
pub fn to_base64(blob: &ImageBlob, limits: &PlatformLimits) -> Result<String, EncodingError> {
    let budget = limits.string_budget();

    if limits.exceeds_string_budget(blob.size()) {
        let estimated = limits.estimated_base64_len(blob.size());
        tracing::warn!(size = blob.size(), estimated, budget, "image too large for base64 encoding");
        return Err(EncodingError::TooLargeForEncoding {
            estimated,
            limit: budget,
        });
    }

    let uri = format!("data:{};base64,{}", blob.mime_type, STANDARD.encode(&blob.data));

    let actual = uri.len() as u64;
    if actual > budget {
        tracing::warn!(actual, budget, "base64 output exceeded limit despite estimate");
        return Err(EncodingError::EncodingOverflow {
            actual,
            limit: budget,
        });
    }

    Ok(uri)
}

/// data URI を ImageBlob に戻す
pub fn from_data_uri(uri: &str) -> Result<ImageBlob, EncodingError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| EncodingError::MalformedDataUri("missing data: prefix".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| EncodingError::MalformedDataUri("missing payload separator".to_string()))?;

    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| EncodingError::MalformedDataUri("payload is not base64".to_string()))?;

    let data = STANDARD
        .decode(payload)
        .map_err(|e| EncodingError::MalformedDataUri(e.to_string()))?;

    Ok(ImageBlob::new(data, mime_type))
}
