pub mod upload;

pub use upload::{validate, ValidationFailure, ValidationKind};
