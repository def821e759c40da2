pub mod blob;
pub mod compress;
pub mod constants;
pub mod data_uri;
pub mod errors;
pub mod transform;
pub mod validation;
pub mod worker;

#[cfg(test)]
mod test_support;

// 公開API
pub use blob::ImageBlob;
pub use compress::{compress, compress_inline, CompressionResult};
pub use constants::{PlatformLimits, MAX_CANVAS_PIXELS, MAX_STRING_LENGTH};
pub use data_uri::{from_data_uri, to_base64};
pub use errors::{CompressionError, EncodingError, ErrorKind, MediaError};
pub use transform::{plan_dimensions, CompressionOptions, Dimensions, OutputFormat, ResizePlan};
pub use validation::{validate, ValidationFailure, ValidationKind};
pub use worker::{
    CompressionWorker, EncodedResult, WorkerClient, WorkerError, WorkerRequest, WorkerResponse,
};
