use std::thread::{self, JoinHandle};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::compress::compress;
use crate::constants::PlatformLimits;
use crate::data_uri::to_base64;
use crate::errors::MediaError;
use crate::validation::validate;
use crate::worker::messages::{EncodedResult, WorkerError, WorkerRequest, WorkerResponse};

/// 専用スレッドで動く圧縮ワーカー
///
/// 起動直後に `Ready` を送り、その後はリクエストを到着順に 1 件ずつ処理する。
/// レスポンスにはリクエストと同じ id が付く。
/// 送信側がすべて drop されるとスレッドは終了する。
pub struct CompressionWorker {
    requests: UnboundedSender<WorkerRequest>,
    responses: UnboundedReceiver<WorkerResponse>,
    _handle: JoinHandle<()>,
}

impl CompressionWorker {
    pub fn spawn(limits: PlatformLimits) -> std::io::Result<Self> {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (response_tx, response_rx) = mpsc::unbounded_channel();

        let handle = thread::Builder::new()
            .name("image-prep-worker".to_string())
            .spawn(move || worker_loop(limits, request_rx, response_tx))?;

        Ok(Self {
            requests: request_tx,
            responses: response_rx,
            _handle: handle,
        })
    }

    /// リクエストを送る
    pub fn send(&self, request: WorkerRequest) -> Result<(), WorkerError> {
        self.requests
            .send(request)
            .map_err(|_| WorkerError::unavailable())
    }

    /// 次のレスポンスを待つ（ワーカー終了後は None）
    pub async fn recv(&mut self) -> Option<WorkerResponse> {
        self.responses.recv().await
    }

    pub(crate) fn into_parts(
        self,
    ) -> (UnboundedSender<WorkerRequest>, UnboundedReceiver<WorkerResponse>) {
        (self.requests, self.responses)
    }
}

fn worker_loop(
    limits: PlatformLimits,
    mut requests: UnboundedReceiver<WorkerRequest>,
    responses: UnboundedSender<WorkerResponse>,
) {
    tracing::info!("compression worker ready");
    if responses.send(WorkerResponse::Ready).is_err() {
        return;
    }

    while let Some(request) = requests.blocking_recv() {
        let response = handle_request(request, &limits);
        if responses.send(response).is_err() {
            break;
        }
    }

    tracing::info!("compression worker stopped");
}

/// 1 件のリクエストを処理する
pub fn handle_request(request: WorkerRequest, limits: &PlatformLimits) -> WorkerResponse {
    match request {
        WorkerRequest::Compress { id, blob, options } => {
            tracing::info!(id = %id, size = blob.size(), "compressing image");
            let outcome = compress(&blob, &options, limits)
                .map_err(MediaError::from)
                .and_then(|result| {
                    let data_uri = to_base64(&result.compressed_blob, limits)?;
                    Ok(EncodedResult::new(&result, data_uri))
                });

            match outcome {
                Ok(result) => WorkerResponse::Success { id, result },
                Err(err) => {
                    tracing::warn!(id = %id, error = %err, "compression failed");
                    WorkerResponse::Error {
                        id,
                        error: err.into(),
                    }
                }
            }
        }
        WorkerRequest::Validate {
            id,
            blob,
            max_size_bytes,
        } => WorkerResponse::Validation {
            result: validate(&blob, max_size_bytes, limits),
            id,
        },
    }
}
