use std::io::Write;
use std::time::Duration;

use scrapegate::config::ScrapeConfig;
use scrapegate::error::ScrapeError;
use scrapegate::fetch::Fetcher;

#[test]
fn loads_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
gate:
  min_spacing_ms: 250
  max_calls_per_window: 4
  window_secs: 30
fetch:
  timeout_secs: 3
  user_agent: "scrapegate-test/1.0"
  preview_length: 80
"#
    )
    .unwrap();

    let config = ScrapeConfig::from_file(file.path()).unwrap();

    assert_eq!(config.gate.min_spacing(), Duration::from_millis(250));
    assert_eq!(config.gate.max_calls_per_window, 4);
    assert_eq!(config.gate.window_duration(), Duration::from_secs(30));
    assert_eq!(config.fetch.timeout(), Duration::from_secs(3));
    assert_eq!(config.fetch.user_agent, "scrapegate-test/1.0");
    assert_eq!(config.fetch.preview_length, 80);

    let fetcher = Fetcher::from_config(&config).unwrap();
    assert_eq!(fetcher.default_timeout(), Duration::from_secs(3));
    assert_eq!(fetcher.gate().remaining(), 4);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ScrapeConfig::from_file(dir.path().join("absent.yaml")).unwrap_err();

    assert!(matches!(err, ScrapeError::Io(_)));
}

#[test]
fn invalid_values_are_config_errors() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "fetch:\n  timeout_secs: 0").unwrap();

    let err = ScrapeConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ScrapeError::Config(_)));
}
