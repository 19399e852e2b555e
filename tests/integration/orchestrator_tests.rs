//! Fallback orchestration tests
//!
//! Priority order, circuit breaking, rate limiting, deadlines and cancellation
//! observed through scripted in-process backends.

#[cfg(test)]
mod tests {
    use crate::common::assertions::{AIResponseAssertions, assert_exhausted};
    use crate::common::fixtures::{
        ScriptedAdapter, Step, orchestrator_with, orchestrator_with_config, request,
        scripted_config,
    };
    use crate::{assert_err, assert_ok};
    use applytrack_ai::config::OrchestratorConfig;
    use applytrack_ai::core::router::CircuitState;
    use applytrack_ai::core::types::RawSuccess;
    use applytrack_ai::{ErrorCategory, ProviderError};
    use std::time::Duration;
    use tokio::time::Instant;
    use tokio_util::sync::CancellationToken;

    /// A rejects credentials, B times out twice, C answers
    #[tokio::test]
    async fn test_auth_then_timeouts_then_success() {
        let a = ScriptedAdapter::failing(ProviderError::authentication("a", "HTTP 401"), 1);
        let b = ScriptedAdapter::failing(ProviderError::timeout("b", "deadline exceeded"), 2);
        let c = ScriptedAdapter::succeeding();
        let orch = orchestrator_with_config(
            vec![("a", a.clone()), ("b", b.clone()), ("c", c.clone())],
            2,
            OrchestratorConfig {
                same_provider_retries: 1,
                ..Default::default()
            },
        );

        let response = assert_ok!(orch.dispatch(&request()).await);
        response.assert_served_by("c");

        // No retry after an auth failure
        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 2);

        let health = orch.health();
        assert_eq!(health.state("a").disabled, Some(ErrorCategory::AuthError));
        let b_state = health.state("b");
        assert_eq!(b_state.state, CircuitState::Open);
        assert_eq!(b_state.consecutive_failures, 2);

        // A stays excluded and B is cooling down
        let response = assert_ok!(orch.dispatch(&request()).await);
        response.assert_served_by("c");
        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 2);
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let a = ScriptedAdapter::succeeding();
        let b = ScriptedAdapter::succeeding();
        let orch = orchestrator_with(vec![("a", a.clone()), ("b", b.clone())], 3);

        for _ in 0..5 {
            let response = assert_ok!(orch.dispatch(&request()).await);
            response.assert_served_by("a");
        }
        assert_eq!(b.calls(), 0);
    }

    #[tokio::test]
    async fn test_all_rate_limited() {
        let providers: Vec<_> = ["a", "b", "c"]
            .into_iter()
            .map(|id| (id, ScriptedAdapter::failing(ProviderError::rate_limit(id, Some(30)), 1)))
            .collect();
        let adapters: Vec<_> = providers.iter().map(|(_, a)| a.clone()).collect();
        let orch = orchestrator_with(providers, 3);

        let err = assert_err!(orch.dispatch(&request()).await);
        assert_exhausted(
            &err,
            &[
                ("a", ErrorCategory::RateLimited),
                ("b", ErrorCategory::RateLimited),
                ("c", ErrorCategory::RateLimited),
            ],
        );
        assert_eq!(err.user_message(), "AI service temporarily unavailable");
        for adapter in &adapters {
            assert_eq!(adapter.calls(), 1);
        }

        // Rate limiting is not a strike
        assert_eq!(orch.health().state("a").consecutive_failures, 0);

        // Everything is cooling down: nothing eligible, nothing attempted
        let err = assert_err!(orch.dispatch(&request()).await);
        assert_exhausted(&err, &[]);
        for adapter in &adapters {
            assert_eq!(adapter.calls(), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_provider_is_never_selected_until_cooldown() {
        let a = ScriptedAdapter::failing(ProviderError::unavailable("a", "dns failure"), 1);
        let b = ScriptedAdapter::succeeding();
        let orch = orchestrator_with(vec![("a", a.clone()), ("b", b.clone())], 1);

        assert_ok!(orch.dispatch(&request()).await).assert_served_by("b");
        for _ in 0..20 {
            assert_ok!(orch.dispatch(&request()).await).assert_served_by("b");
        }
        assert_eq!(a.calls(), 1);

        // 1s * 2^1
        tokio::time::advance(Duration::from_secs(2)).await;
        assert_ok!(orch.dispatch(&request()).await).assert_served_by("a");
        assert_eq!(a.calls(), 2);
        assert_eq!(orch.health().state("a").state, CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_half_open_trial_across_requests() {
        let a = ScriptedAdapter::scripted(vec![
            Step::Reply(Err(ProviderError::unavailable("a", "refused"))),
            Step::Delayed(Duration::from_secs(5), Ok(RawSuccess::text("trial ok"))),
        ]);
        let b = ScriptedAdapter::succeeding();
        let orch = orchestrator_with(vec![("a", a.clone()), ("b", b.clone())], 1);

        assert_ok!(orch.dispatch(&request()).await).assert_served_by("b");
        tokio::time::advance(Duration::from_secs(2)).await;

        let first = request();
        let second = request();
        let (trial, other) = tokio::join!(orch.dispatch(&first), orch.dispatch(&second));

        assert_ok!(trial).assert_served_by("a");
        assert_ok!(other).assert_served_by("b");
        assert_eq!(a.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_failures_do_not_double_count() {
        let a = ScriptedAdapter::scripted(
            (0..8)
                .map(|_| {
                    Step::Delayed(
                        Duration::from_millis(100),
                        Err(ProviderError::unavailable("a", "refused")),
                    )
                })
                .collect(),
        );
        let b = ScriptedAdapter::succeeding();
        let orch = orchestrator_with(vec![("a", a.clone()), ("b", b.clone())], 3);

        let requests: Vec<_> = (0..8).map(|_| request()).collect();
        let results =
            futures::future::join_all(requests.iter().map(|r| orch.dispatch(r))).await;
        for result in results {
            assert_ok!(result).assert_served_by("b");
        }

        let state = orch.health().state("a");
        assert_eq!(state.state, CircuitState::Open);
        assert_eq!(state.consecutive_failures, 3);
        // 1s * 2^3
        assert_eq!(state.cooldown_remaining_ms, Some(8_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_caller_deadline_caps_total_latency() {
        let a = ScriptedAdapter::scripted(vec![Step::Delayed(
            Duration::from_secs(25),
            Ok(RawSuccess::text("too late")),
        )]);
        let b = ScriptedAdapter::succeeding();
        let orch = orchestrator_with(vec![("a", a.clone()), ("b", b.clone())], 3);

        let started = Instant::now();
        let err = assert_err!(
            orch.dispatch(&request().with_deadline(Duration::from_secs(2)))
                .await
        );

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(2) && elapsed < Duration::from_secs(3));
        assert_exhausted(&err, &[("a", ErrorCategory::Timeout)]);
        assert_eq!(b.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_timeout_counts_as_strike() {
        let a = ScriptedAdapter::scripted(vec![Step::Delayed(
            Duration::from_secs(60),
            Ok(RawSuccess::text("too late")),
        )]);
        let b = ScriptedAdapter::succeeding();
        let orch = orchestrator_with(vec![("a", a.clone()), ("b", b.clone())], 3);

        // Provider timeout (30s) is well inside the global ceiling (60s)
        let started = Instant::now();
        assert_ok!(orch.dispatch(&request()).await).assert_served_by("b");
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(30) && elapsed < Duration::from_secs(31));
        assert_eq!(orch.health().state("a").consecutive_failures, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_fallback() {
        let a = ScriptedAdapter::scripted(vec![Step::Delayed(
            Duration::from_secs(10),
            Ok(RawSuccess::text("never seen")),
        )]);
        let b = ScriptedAdapter::succeeding();
        let orch = orchestrator_with(vec![("a", a.clone()), ("b", b.clone())], 3);

        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let err = assert_err!(orch.dispatch_with_cancel(&request(), &token).await);
        assert!(err.is_cancelled());
        assert!(err.aggregate().is_none());
        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 0);
        // Cancellation is not a provider failure
        assert_eq!(orch.health().state("a").consecutive_failures, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_dispatch_attempts_nothing_further() {
        let a = ScriptedAdapter::scripted(vec![Step::Delayed(
            Duration::from_secs(10),
            Ok(RawSuccess::text("never seen")),
        )]);
        let b = ScriptedAdapter::succeeding();
        let orch = orchestrator_with(vec![("a", a.clone()), ("b", b.clone())], 3);

        let request = request();
        let outcome = tokio::time::timeout(Duration::from_secs(1), orch.dispatch(&request)).await;
        assert!(outcome.is_err());

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(b.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_does_not_interrupt_in_flight_dispatch() {
        let a = ScriptedAdapter::scripted(vec![Step::Delayed(
            Duration::from_secs(1),
            Err(ProviderError::unavailable("a", "refused")),
        )]);
        let b = ScriptedAdapter::succeeding();
        let c = ScriptedAdapter::succeeding();
        let orch = orchestrator_with(vec![("a", a.clone()), ("b", b.clone())], 3);
        orch.registry().register_adapter("c", c.clone());

        let request = request();
        let (result, report) = tokio::join!(orch.dispatch(&request), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            orch.registry().reload(&[scripted_config("c", 0, 3)])
        });

        // The dispatch finished against the snapshot it started with
        assert_ok!(result).assert_served_by("b");
        assert_eq!(report.removed, vec!["a", "b"]);
        assert_eq!(c.calls(), 0);

        assert_ok!(orch.dispatch(&request).await).assert_served_by("c");
    }

    #[tokio::test]
    async fn test_invalid_response_is_retried_once() {
        let a = ScriptedAdapter::scripted(vec![
            Step::Reply(Ok(RawSuccess::text("   "))),
            Step::Reply(Ok(RawSuccess::text("usable answer"))),
        ]);
        let orch = orchestrator_with_config(
            vec![("a", a.clone())],
            3,
            OrchestratorConfig {
                same_provider_retries: 1,
                ..Default::default()
            },
        );

        let response = assert_ok!(orch.dispatch(&request()).await);
        assert_eq!(response.text, "usable answer");
        assert_eq!(a.calls(), 2);
        assert_eq!(orch.health().state("a").consecutive_failures, 0);
    }
}
