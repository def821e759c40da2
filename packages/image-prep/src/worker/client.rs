use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::{oneshot, watch};
use uuid::Uuid;

use crate::blob::ImageBlob;
use crate::constants::PlatformLimits;
use crate::errors::ErrorKind;
use crate::transform::CompressionOptions;
use crate::validation::ValidationFailure;
use crate::worker::messages::{EncodedResult, WorkerError, WorkerRequest, WorkerResponse};
use crate::worker::runtime::CompressionWorker;

type Pending = Arc<Mutex<HashMap<String, oneshot::Sender<WorkerResponse>>>>;

fn lock(pending: &Pending) -> MutexGuard<'_, HashMap<String, oneshot::Sender<WorkerResponse>>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// CompressionWorker のクライアント
///
/// レスポンスを id で呼び出し元に振り分けるので、複数のリクエストを同時に投げてよい。
/// 呼び出し元がいなくなったリクエストの返信は捨てる。
#[derive(Clone)]
pub struct WorkerClient {
    requests: UnboundedSender<WorkerRequest>,
    pending: Pending,
    ready: watch::Receiver<bool>,
}

impl WorkerClient {
    /// ワーカーを起動する
    ///
    /// 返信の振り分けタスクを現在の tokio ランタイムに載せる。
    /// ランタイムの外で呼ぶとワーカースレッドを起こさずにエラーを返す。
    pub fn spawn(limits: PlatformLimits) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| std::io::Error::other(format!("worker client needs a tokio runtime: {e}")))?;

        let (requests, responses) = CompressionWorker::spawn(limits)?.into_parts();
        let pending = Pending::default();
        let (ready_tx, ready_rx) = watch::channel(false);

        runtime.spawn(dispatch(responses, pending.clone(), ready_tx));

        Ok(Self {
            requests,
            pending,
            ready: ready_rx,
        })
    }

    /// ワーカーの起動通知を待つ
    pub async fn wait_ready(&self) -> Result<(), WorkerError> {
        let mut ready = self.ready.clone();
        ready
            .wait_for(|ready| *ready)
            .await
            .map(|_| ())
            .map_err(|_| WorkerError::unavailable())
    }

    /// 画像を圧縮して base64 化する
    pub async fn compress(
        &self,
        blob: ImageBlob,
        options: CompressionOptions,
    ) -> Result<EncodedResult, WorkerError> {
        let request = WorkerRequest::Compress {
            id: Uuid::new_v4().to_string(),
            blob,
            options,
        };

        match self.request(request).await? {
            WorkerResponse::Success { result, .. } => Ok(result),
            WorkerResponse::Error { error, .. } => Err(error),
            other => Err(unexpected(&other)),
        }
    }

    /// アップロード前の検証
    pub async fn validate(
        &self,
        blob: ImageBlob,
        max_size_bytes: u64,
    ) -> Result<Option<ValidationFailure>, WorkerError> {
        let request = WorkerRequest::Validate {
            id: Uuid::new_v4().to_string(),
            blob,
            max_size_bytes,
        };

        match self.request(request).await? {
            WorkerResponse::Validation { result, .. } => Ok(result),
            WorkerResponse::Error { error, .. } => Err(error),
            other => Err(unexpected(&other)),
        }
    }

    /// 呼び出し側が付けた id のままリクエストを送り、同じ id の返信を待つ
    pub async fn request(&self, request: WorkerRequest) -> Result<WorkerResponse, WorkerError> {
        let id = request.id().to_string();
        let (tx, rx) = oneshot::channel();

        {
            let mut pending = lock(&self.pending);
            if pending.contains_key(&id) {
                return Err(WorkerError {
                    kind: ErrorKind::Internal,
                    message: format!("request id {id:?} is already in flight"),
                });
            }
            pending.insert(id.clone(), tx);
        }

        if self.requests.send(request).is_err() {
            lock(&self.pending).remove(&id);
            return Err(WorkerError::unavailable());
        }

        rx.await.map_err(|_| WorkerError::unavailable())
    }
}

fn unexpected(response: &WorkerResponse) -> WorkerError {
    WorkerError {
        kind: ErrorKind::Internal,
        message: format!("unexpected worker response: {response:?}"),
    }
}

/// ワーカーの返信を id ごとに呼び出し元へ渡す
async fn dispatch(
    mut responses: UnboundedReceiver<WorkerResponse>,
    pending: Pending,
    ready: watch::Sender<bool>,
) {
    while let Some(response) = responses.recv().await {
        let Some(id) = response.id().map(str::to_owned) else {
            tracing::info!("compression worker announced ready");
            ready.send_replace(true);
            continue;
        };

        let waiter = lock(&pending).remove(&id);
        match waiter {
            Some(tx) => {
                if tx.send(response).is_err() {
                    tracing::debug!(id = %id, "caller went away, dropping late reply");
                }
            }
            None => tracing::debug!(id = %id, "no caller waiting for reply"),
        }
    }

    // ワーカー終了。待っている呼び出し元にはエラーが返る
    tracing::warn!("compression worker channel closed");
    lock(&pending).clear();
}
