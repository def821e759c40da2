pub mod types;

pub use types::{CompressionError, EncodingError, ErrorKind, MediaError};
