pub mod client;
pub mod messages;
pub mod runtime;

pub use client::WorkerClient;
pub use messages::{EncodedResult, WorkerError, WorkerRequest, WorkerResponse};
pub use runtime::{handle_request, CompressionWorker};
