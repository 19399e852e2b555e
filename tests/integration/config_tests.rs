//! Configuration loading and hot reload tests

#[cfg(test)]
mod tests {
    use crate::assert_ok;
    use applytrack_ai::config::Config;
    use applytrack_ai::{ErrorCategory, Gateway};
    use std::io::Write;
    use std::time::Duration;
    use tempfile::{NamedTempFile, TempDir};

    const MIXED: &str = r#"
server:
  port: 8123
orchestrator:
  global_timeout_ms: 15000
providers:
  - id: openrouter-primary
    provider_type: openrouter
    model: openai/gpt-4o-mini
    api_key: "${APPLYTRACK_IT_OPENROUTER_KEY}"
    priority: 0
  - id: broken-url
    provider_type: openai
    model: gpt-4o-mini
    api_key: sk-test
    base_url: "not a url"
    priority: 1
  - id: no-key
    provider_type: anthropic
    model: claude-3-5-haiku-latest
    api_key_env: APPLYTRACK_IT_SURELY_UNSET
    priority: 2
  - id: parked
    provider_type: gemini
    model: gemini-1.5-flash
    api_key: g-test
    enabled: false
  - id: gemini-backup
    provider_type: gemini
    model: gemini-1.5-flash
    api_key: g-test
    priority: 3
"#;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_invalid_entries_are_rejected_individually() {
        unsafe { std::env::set_var("APPLYTRACK_IT_OPENROUTER_KEY", "or-from-env") };
        let file = config_file(MIXED);

        let config = assert_ok!(Config::from_file(file.path()).await);
        assert_eq!(config.server().port, 8123);
        assert_eq!(config.providers()[0].api_key, "or-from-env");

        let gateway = assert_ok!(Gateway::new(config));
        let snapshot = gateway.registry().snapshot();

        assert_eq!(snapshot.ids(), vec!["openrouter-primary", "gemini-backup"]);
        assert_eq!(snapshot.disabled, vec!["parked"]);

        let mut rejected: Vec<_> = snapshot
            .rejected
            .iter()
            .map(|err| (err.provider().to_string(), err.category()))
            .collect();
        rejected.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            rejected,
            vec![
                ("broken-url".to_string(), ErrorCategory::ConfigError),
                ("no-key".to_string(), ErrorCategory::ConfigError),
            ]
        );

        unsafe { std::env::remove_var("APPLYTRACK_IT_OPENROUTER_KEY") };
    }

    #[tokio::test]
    async fn test_missing_env_reference_rejects_only_that_provider() {
        let file = config_file(
            r#"
providers:
  - id: needs-env
    provider_type: openai
    model: gpt-4o-mini
    api_key: "${APPLYTRACK_IT_NEVER_SET_KEY}"
    api_key_env: APPLYTRACK_IT_NEVER_SET_KEY
  - id: inline
    provider_type: gemini
    model: gemini-1.5-flash
    api_key: g-inline
"#,
        );

        let config = assert_ok!(Config::from_file(file.path()).await);
        let gateway = assert_ok!(Gateway::new(config));
        let snapshot = gateway.registry().snapshot();

        assert_eq!(snapshot.ids(), vec!["inline"]);
        assert_eq!(snapshot.rejected.len(), 1);
        assert_eq!(snapshot.rejected[0].provider(), "needs-env");
    }

    #[tokio::test]
    async fn test_duplicate_ids_fail_the_whole_file() {
        let file = config_file(
            r#"
providers:
  - id: twin
    provider_type: openai
    model: gpt-4o-mini
    api_key: sk-a
  - id: twin
    provider_type: gemini
    model: gemini-1.5-flash
    api_key: g-b
"#,
        );

        let err = Config::from_file(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("twin"));
    }

    #[tokio::test]
    async fn test_load_falls_back_to_environment_when_file_missing() {
        let dir = TempDir::new().unwrap();
        let config = assert_ok!(Config::load(Some(&dir.path().join("absent.yaml"))).await);
        assert_eq!(config.orchestrator().global_timeout(), Duration::from_secs(60));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_watched_file_change_republishes_registry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gateway.yaml");
        std::fs::write(
            &path,
            r#"
providers:
  - id: first
    provider_type: openai
    model: gpt-4o-mini
    api_key: sk-first
"#,
        )
        .unwrap();

        let config = assert_ok!(Config::from_file(&path).await);
        let gateway = assert_ok!(Gateway::new(config));
        let _handle = assert_ok!(gateway.watch_config(&path));
        let initial = gateway.registry().version();
        assert_eq!(gateway.registry().snapshot().ids(), vec!["first"]);

        // Give the watcher a moment to register before writing
        tokio::time::sleep(Duration::from_millis(200)).await;
        std::fs::write(
            &path,
            r#"
providers:
  - id: first
    provider_type: openai
    model: gpt-4o-mini
    api_key: sk-first
  - id: second
    provider_type: gemini
    model: gemini-1.5-flash
    api_key: g-second
    priority: 1
"#,
        )
        .unwrap();

        let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
        while gateway.registry().snapshot().len() < 2 {
            assert!(
                tokio::time::Instant::now() < deadline,
                "registry was not republished after the file changed"
            );
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        assert!(gateway.registry().version() > initial);
        assert_eq!(gateway.registry().snapshot().ids(), vec!["first", "second"]);
    }
}
