//! Bounded pool for synchronous backend SDKs
//!
//! Blocking calls run on tokio's blocking threads, at most `size` at a time.
//! Callers get a [`WorkerHandle`] future; dropping it (orchestrator timeout,
//! client disconnect) cancels the job's [`CancellationToken`]. The blocking
//! thread cannot be pre-empted, so backends should poll
//! `is_cancelled()` between steps.

use futures::future::BoxFuture;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WorkerError {
    #[error("worker pool is closed")]
    Closed,
    #[error("blocking job panicked: {0}")]
    Panicked(String),
}

/// Semaphore-bounded `spawn_blocking`
#[derive(Debug, Clone)]
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Jobs currently holding a slot
    pub fn in_use(&self) -> usize {
        self.size - self.semaphore.available_permits()
    }

    /// Queue a blocking job
    ///
    /// The job starts once a slot frees up. The slot is held until the job
    /// returns, even if the handle was dropped in the meantime.
    pub fn run<F, T>(&self, job: F) -> WorkerHandle<T>
    where
        F: FnOnce(CancellationToken) -> T + Send + 'static,
        T: Send + 'static,
    {
        let cancel = CancellationToken::new();
        let signal = cancel.child_token();
        let semaphore = self.semaphore.clone();

        let inner = Box::pin(async move {
            let permit = semaphore
                .acquire_owned()
                .await
                .map_err(|_| WorkerError::Closed)?;
            tokio::task::spawn_blocking(move || {
                let _permit = permit;
                job(signal)
            })
            .await
            .map_err(|e| WorkerError::Panicked(e.to_string()))
        });

        WorkerHandle { cancel, inner }
    }
}

/// Awaitable, cancel-on-drop handle to a blocking job
pub struct WorkerHandle<T> {
    cancel: CancellationToken,
    inner: BoxFuture<'static, Result<T, WorkerError>>,
}

impl<T> WorkerHandle<T> {
    /// Signal the job to stop without waiting for it
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl<T> Future for WorkerHandle<T> {
    type Output = Result<T, WorkerError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

impl<T> Drop for WorkerHandle<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
