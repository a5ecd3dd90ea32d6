//! omniprobe.toml 통합 설정 테스트
//!
//! - omniprobe.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 환경변수 우선순위 테스트

use omniprobe_core::config::{FULL_DB_ENV, ProbeConfig};
use omniprobe_core::error::{ConfigError, OmniprobeError};

const EXAMPLE: &str = include_str!("../../../omniprobe.toml.example");

/// 환경변수를 설정하고 클로저 실행 후 원래 값으로 되돌립니다.
fn with_env<R>(key: &str, value: &str, f: impl FnOnce() -> R) -> R {
    let original = std::env::var(key).ok();
    // SAFETY: serial 테스트에서만 호출되어 환경변수 조작이 직렬화됩니다.
    unsafe {
        std::env::set_var(key, value);
    }

    let result = f();

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var(key, val),
            None => std::env::remove_var(key),
        }
    }
    result
}

// =============================================================================
// omniprobe.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let config = ProbeConfig::parse(EXAMPLE).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "pretty");
    assert_eq!(config.service.base_url, "http://localhost:44444");
}

#[test]
fn example_config_passes_validation() {
    let config = ProbeConfig::parse(EXAMPLE).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_matches_code_defaults() {
    let example = ProbeConfig::parse(EXAMPLE).expect("should parse");
    let defaults = ProbeConfig::default();

    assert_eq!(example.runner.jobs, defaults.runner.jobs);
    assert_eq!(
        example.runner.scenario_timeout_secs,
        defaults.runner.scenario_timeout_secs
    );
    assert_eq!(example.runner.include_full_db, defaults.runner.include_full_db);
    assert_eq!(
        example.runner.fail_on_check_failure,
        defaults.runner.fail_on_check_failure
    );
    assert_eq!(example.runner.reset_cache, defaults.runner.reset_cache);
    assert_eq!(
        example.service.connect_timeout_secs,
        defaults.service.connect_timeout_secs
    );
    assert_eq!(
        example.service.cache_responses,
        defaults.service.cache_responses
    );
    assert_eq!(example.scenarios.files, defaults.scenarios.files);
}

// =============================================================================
// 부분 설정 테스트
// =============================================================================

#[test]
fn partial_config_runner_only() {
    let toml = r#"
[runner]
jobs = 3
include_full_db = true
"#;
    let config = ProbeConfig::parse(toml).expect("should parse");

    assert_eq!(config.runner.jobs, 3);
    assert!(config.runner.include_full_db);
    assert_eq!(config.runner.scenario_timeout_secs, 120);
    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.service.base_url, "http://localhost:44444");
}

#[test]
fn partial_config_scenario_files() {
    let toml = r#"
[scenarios]
files = ["a.toml", "b.toml"]
"#;
    let config = ProbeConfig::parse(toml).expect("should parse");
    assert_eq!(config.scenarios.files, vec!["a.toml", "b.toml"]);
}

#[test]
fn unknown_value_type_is_parse_error() {
    let toml = r#"
[runner]
jobs = "many"
"#;
    let err = ProbeConfig::parse(toml).unwrap_err();
    assert!(matches!(
        err,
        OmniprobeError::Config(ConfigError::ParseFailed { .. })
    ));
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[test]
#[serial_test::serial]
fn env_override_takes_precedence_over_toml() {
    let toml = r#"
[service]
base_url = "http://localhost:44444"
"#;

    let result = with_env("OMNIPROBE_SERVICE_BASE_URL", "https://omnipathdb.org", || {
        let mut config = ProbeConfig::parse(toml).expect("should parse");
        config.apply_env_overrides();
        config.service.base_url
    });

    assert_eq!(result, "https://omnipathdb.org");
}

#[test]
#[serial_test::serial]
fn env_override_numeric_field() {
    let result = with_env("OMNIPROBE_RUNNER_SCENARIO_TIMEOUT_SECS", "15", || {
        let mut config = ProbeConfig::default();
        config.apply_env_overrides();
        config.runner.scenario_timeout_secs
    });

    assert_eq!(result, 15);
}

#[test]
#[serial_test::serial]
fn env_override_invalid_numeric_keeps_toml_value() {
    let result = with_env("OMNIPROBE_RUNNER_JOBS", "lots", || {
        let mut config = ProbeConfig::parse("[runner]\njobs = 5").expect("should parse");
        config.apply_env_overrides();
        config.runner.jobs
    });

    assert_eq!(result, 5);
}

#[test]
#[serial_test::serial]
fn full_db_env_accepts_every_truthy_spelling() {
    for value in ["1", "true", "TRUE", "t", "yes", "Y"] {
        let enabled = with_env(FULL_DB_ENV, value, || {
            let mut config = ProbeConfig::default();
            config.apply_env_overrides();
            config.runner.include_full_db
        });
        assert!(enabled, "'{value}' should enable full-db scenarios");
    }
}

#[test]
#[serial_test::serial]
fn full_db_env_falsy_leaves_default() {
    for value in ["0", "false", "no", ""] {
        let enabled = with_env(FULL_DB_ENV, value, || {
            let mut config = ProbeConfig::default();
            config.apply_env_overrides();
            config.runner.include_full_db
        });
        assert!(!enabled, "'{value}' should not enable full-db scenarios");
    }
}

#[tokio::test]
#[serial_test::serial]
async fn load_or_default_without_path_uses_defaults() {
    let config = ProbeConfig::load_or_default(None)
        .await
        .expect("defaults should load");
    assert_eq!(config.runner.jobs, 1);
}

#[tokio::test]
#[serial_test::serial]
async fn load_or_default_with_path_reads_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("omniprobe.toml");
    std::fs::write(&path, "[runner]\nfail_on_check_failure = true\n").expect("write");

    let config = ProbeConfig::load_or_default(Some(path.as_path()))
        .await
        .expect("file should load");
    assert!(config.runner.fail_on_check_failure);
}
