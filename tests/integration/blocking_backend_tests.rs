//! Synchronous SDK backends behind the worker pool

#[cfg(test)]
mod tests {
    use crate::common::fixtures::request;
    use crate::common::assertions::{AIResponseAssertions, assert_exhausted};
    use crate::{assert_err, assert_ok};
    use applytrack_ai::config::{OrchestratorConfig, ProviderConfig};
    use applytrack_ai::core::providers::ProviderRegistry;
    use applytrack_ai::core::router::{HealthTracker, Orchestrator};
    use applytrack_ai::core::types::{AIRequest, RawSuccess};
    use applytrack_ai::{ErrorCategory, ProviderError, SyncBackend};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    /// Blocks for `work`, polling the cancellation token every few milliseconds
    #[derive(Debug, Default)]
    struct LocalModel {
        work: Duration,
        running: AtomicUsize,
        max_running: AtomicUsize,
        saw_cancel: AtomicBool,
    }

    impl SyncBackend for LocalModel {
        fn name(&self) -> &'static str {
            "local-model"
        }

        fn complete(
            &self,
            request: &AIRequest,
            _config: &ProviderConfig,
            cancel: &CancellationToken,
        ) -> Result<RawSuccess, ProviderError> {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_running.fetch_max(now, Ordering::SeqCst);

            let started = std::time::Instant::now();
            let mut cancelled = false;
            while started.elapsed() < self.work {
                if cancel.is_cancelled() {
                    self.saw_cancel.store(true, Ordering::SeqCst);
                    cancelled = true;
                    break;
                }
                std::thread::sleep(Duration::from_millis(5));
            }
            self.running.fetch_sub(1, Ordering::SeqCst);

            if cancelled {
                return Err(ProviderError::timeout("local", "cancelled"));
            }
            Ok(RawSuccess::text(format!("local answer for {}", request.task_type)))
        }
    }

    fn orchestrator(backend: Arc<LocalModel>, timeout: Duration, workers: usize) -> Orchestrator {
        let registry = ProviderRegistry::new(workers).unwrap();
        registry.register_blocking_backend("local-sdk", backend);
        registry.reload(&[ProviderConfig::new("local", "local-sdk", "tiny").with_timeout(timeout)]);
        Orchestrator::new(
            Arc::new(registry),
            Arc::new(HealthTracker::new()),
            OrchestratorConfig {
                same_provider_retries: 0,
                worker_pool_size: workers,
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_blocking_backend_serves_request() {
        let backend = Arc::new(LocalModel {
            work: Duration::from_millis(20),
            ..Default::default()
        });
        let orch = orchestrator(backend, Duration::from_secs(5), 2);

        let response = assert_ok!(orch.dispatch(&request()).await);
        response.assert_served_by("local");
        assert_eq!(response.text, "local answer for resume_optimize");
    }

    #[tokio::test]
    async fn test_timeout_raises_cancel_signal() {
        let backend = Arc::new(LocalModel {
            work: Duration::from_secs(10),
            ..Default::default()
        });
        let orch = orchestrator(backend.clone(), Duration::from_millis(100), 1);

        let err = assert_err!(orch.dispatch(&request()).await);
        assert_exhausted(&err, &[("local", ErrorCategory::Timeout)]);

        for _ in 0..100 {
            if backend.saw_cancel.load(Ordering::SeqCst) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(backend.saw_cancel.load(Ordering::SeqCst));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_worker_pool_bounds_concurrency() {
        let backend = Arc::new(LocalModel {
            work: Duration::from_millis(50),
            ..Default::default()
        });
        let orch = orchestrator(backend.clone(), Duration::from_secs(10), 1);

        let requests: Vec<_> = (0..4).map(|_| request()).collect();
        let results = futures::future::join_all(requests.iter().map(|r| orch.dispatch(r))).await;

        for result in results {
            assert_ok!(result).assert_served_by("local");
        }
        assert_eq!(backend.max_running.load(Ordering::SeqCst), 1);
    }
}
