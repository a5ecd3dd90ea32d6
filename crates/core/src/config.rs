//! 설정 관리 -- omniprobe.toml 파싱 및 런타임 설정
//!
//! [`ProbeConfig`]는 모든 컴포넌트의 설정을 담는 최상위 구조체입니다.
//! 쿼리 서비스 클라이언트는 전역 상태가 아닌 이 구조체를 통해 설정을 받으므로,
//! 여러 하네스 인스턴스가 서로 간섭하지 않습니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`OMNIPROBE_SERVICE_BASE_URL=...` 형식)
//! 3. 설정 파일 (`omniprobe.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), omniprobe_core::error::OmniprobeError> {
//! use omniprobe_core::config::ProbeConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = ProbeConfig::load("omniprobe.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = ProbeConfig::parse("[runner]\njobs = 4")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, OmniprobeError};

/// full-db 시나리오 포함 여부를 켜는 환경변수
pub const FULL_DB_ENV: &str = "OMNIPROBE_FULL_DB";

/// 진리값으로 인정되는 환경변수 값 (대소문자 무시)
const TRUTHY_VALUES: [&str; 5] = ["1", "true", "t", "yes", "y"];

/// 최대 동시 실행 시나리오 수
pub const MAX_JOBS: usize = 64;

/// omniprobe 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 쿼리 서비스 연결 설정
    #[serde(default)]
    pub service: ServiceConfig,
    /// 배치 실행 설정
    #[serde(default)]
    pub runner: RunnerConfig,
    /// 추가 시나리오 파일
    #[serde(default)]
    pub scenarios: ScenarioSourceConfig,
}

impl ProbeConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, OmniprobeError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 경로가 주어지면 파일에서, 아니면 기본값에서 시작해 환경변수를 적용합니다.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, OmniprobeError> {
        match path {
            Some(path) => Self::load(path).await,
            None => {
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, OmniprobeError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                OmniprobeError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                OmniprobeError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, OmniprobeError> {
        toml::from_str(toml_str).map_err(|e| {
            OmniprobeError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `OMNIPROBE_{SECTION}_{FIELD}`
    /// 예: `OMNIPROBE_RUNNER_JOBS=4`
    ///
    /// [`FULL_DB_ENV`]는 진리값일 때만 `runner.include_full_db`를 켭니다.
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "OMNIPROBE_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "OMNIPROBE_GENERAL_LOG_FORMAT");

        // Service
        override_string(&mut self.service.base_url, "OMNIPROBE_SERVICE_BASE_URL");
        override_u64(
            &mut self.service.connect_timeout_secs,
            "OMNIPROBE_SERVICE_CONNECT_TIMEOUT_SECS",
        );
        override_bool(
            &mut self.service.cache_responses,
            "OMNIPROBE_SERVICE_CACHE_RESPONSES",
        );
        override_string(&mut self.service.user_agent, "OMNIPROBE_SERVICE_USER_AGENT");

        // Runner
        override_usize(&mut self.runner.jobs, "OMNIPROBE_RUNNER_JOBS");
        override_u64(
            &mut self.runner.scenario_timeout_secs,
            "OMNIPROBE_RUNNER_SCENARIO_TIMEOUT_SECS",
        );
        override_bool(
            &mut self.runner.fail_on_check_failure,
            "OMNIPROBE_RUNNER_FAIL_ON_CHECK_FAILURE",
        );
        override_bool(&mut self.runner.reset_cache, "OMNIPROBE_RUNNER_RESET_CACHE");
        if full_db_env_enabled() {
            self.runner.include_full_db = true;
        }

        // Scenarios
        override_csv(&mut self.scenarios.files, "OMNIPROBE_SCENARIOS_FILES");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), OmniprobeError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        let url = self.service.base_url.as_str();
        let host = url
            .strip_prefix("http://")
            .or_else(|| url.strip_prefix("https://"));
        if host.is_none_or(|rest| rest.trim_matches('/').is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "service.base_url".to_owned(),
                reason: format!("'{url}' is not an http(s) URL with a host"),
            }
            .into());
        }

        if self.runner.jobs == 0 || self.runner.jobs > MAX_JOBS {
            return Err(ConfigError::InvalidValue {
                field: "runner.jobs".to_owned(),
                reason: format!("must be between 1 and {MAX_JOBS}"),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 쿼리 서비스 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// 서비스 기본 URL
    pub base_url: String,
    /// 연결 타임아웃 (초)
    pub connect_timeout_secs: u64,
    /// 응답 캐시 사용 여부 (프로세스 메모리)
    pub cache_responses: bool,
    /// HTTP User-Agent
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:44444".to_owned(),
            connect_timeout_secs: 10,
            cache_responses: false,
            user_agent: concat!("omniprobe/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

/// 배치 실행 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// 동시 실행 시나리오 수 (1이면 순차 실행)
    pub jobs: usize,
    /// 시나리오별 타임아웃 (초, 0이면 무제한)
    pub scenario_timeout_secs: u64,
    /// full-db 시나리오 포함 여부
    pub include_full_db: bool,
    /// 검증 실패도 종료 코드에 반영할지 여부
    pub fail_on_check_failure: bool,
    /// 배치 시작 전 서비스 캐시 초기화 여부
    pub reset_cache: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            jobs: 1,
            scenario_timeout_secs: 120,
            include_full_db: false,
            fail_on_check_failure: false,
            reset_cache: true,
        }
    }
}

/// 추가 시나리오 파일 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioSourceConfig {
    /// 내장 카탈로그 뒤에 추가할 시나리오 TOML 파일 경로
    pub files: Vec<String>,
}

/// 값이 진리값(`1`, `true`, `t`, `yes`, `y`)인지 판정합니다.
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    TRUTHY_VALUES.contains(&value.as_str())
}

/// [`FULL_DB_ENV`] 환경변수가 진리값인지 여부
pub fn full_db_env_enabled() -> bool {
    std::env::var(FULL_DB_ENV).is_ok_and(|v| is_truthy(&v))
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_has_sane_values() {
        let config = ProbeConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.service.base_url, "http://localhost:44444");
        assert_eq!(config.runner.jobs, 1);
        assert_eq!(config.runner.scenario_timeout_secs, 120);
        assert!(!config.runner.include_full_db);
        assert!(!config.runner.fail_on_check_failure);
        assert!(config.scenarios.files.is_empty());
    }

    #[test]
    fn default_config_passes_validation() {
        ProbeConfig::default().validate().unwrap();
    }

    #[test]
    fn from_str_empty_toml_uses_defaults() {
        let config = ProbeConfig::parse("").unwrap();
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.runner.jobs, 1);
    }

    #[test]
    fn from_str_partial_toml_merges_with_defaults() {
        let toml = r#"
[service]
base_url = "https://omnipathdb.org"

[runner]
jobs = 4
"#;
        let config = ProbeConfig::parse(toml).unwrap();
        assert_eq!(config.service.base_url, "https://omnipathdb.org");
        assert_eq!(config.service.connect_timeout_secs, 10);
        assert_eq!(config.runner.jobs, 4);
        assert!(config.runner.reset_cache);
    }

    #[test]
    fn from_str_full_toml() {
        let toml = r#"
[general]
log_level = "debug"
log_format = "json"

[service]
base_url = "http://10.0.0.5:44444"
connect_timeout_secs = 3
cache_responses = true
user_agent = "ci-probe"

[runner]
jobs = 8
scenario_timeout_secs = 0
include_full_db = true
fail_on_check_failure = true
reset_cache = false

[scenarios]
files = ["extra/regressions.toml"]
"#;
        let config = ProbeConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_format, "json");
        assert!(config.service.cache_responses);
        assert_eq!(config.service.user_agent, "ci-probe");
        assert_eq!(config.runner.scenario_timeout_secs, 0);
        assert!(config.runner.include_full_db);
        assert!(config.runner.fail_on_check_failure);
        assert!(!config.runner.reset_cache);
        assert_eq!(config.scenarios.files, vec!["extra/regressions.toml"]);
        config.validate().unwrap();
    }

    #[test]
    fn from_str_invalid_toml_returns_error() {
        let err = ProbeConfig::parse("invalid = [[[toml").unwrap_err();
        assert!(matches!(
            err,
            OmniprobeError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = ProbeConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_non_http_base_url() {
        let mut config = ProbeConfig::default();
        config.service.base_url = "ftp://example.org".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base_url"));

        config.service.base_url = "http://".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_jobs() {
        let mut config = ProbeConfig::default();
        config.runner.jobs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("runner.jobs"));
    }

    #[test]
    fn validate_rejects_too_many_jobs() {
        let mut config = ProbeConfig::default();
        config.runner.jobs = MAX_JOBS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn truthy_values_are_case_insensitive() {
        for value in ["1", "true", "T", "Yes", "y", " TRUE "] {
            assert!(is_truthy(value), "{value} should be truthy");
        }
        for value in ["0", "false", "no", "", "on", "2"] {
            assert!(!is_truthy(value), "{value} should not be truthy");
        }
    }

    #[test]
    #[serial]
    fn full_db_env_turns_on_include_full_db() {
        let mut config = ProbeConfig::default();
        // SAFETY: serial 테스트에서만 환경변수를 조작합니다.
        unsafe { std::env::set_var(FULL_DB_ENV, "YES") };
        config.apply_env_overrides();
        unsafe { std::env::remove_var(FULL_DB_ENV) };
        assert!(config.runner.include_full_db);
    }

    #[test]
    #[serial]
    fn falsy_full_db_env_keeps_config_value() {
        let mut config = ProbeConfig::default();
        config.runner.include_full_db = true;
        // SAFETY: serial 테스트에서만 환경변수를 조작합니다.
        unsafe { std::env::set_var(FULL_DB_ENV, "0") };
        config.apply_env_overrides();
        unsafe { std::env::remove_var(FULL_DB_ENV) };
        assert!(config.runner.include_full_db);
    }

    #[test]
    #[serial]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: serial 테스트에서만 환경변수를 조작합니다.
        unsafe { std::env::set_var("TEST_OMNIPROBE_STR", "overridden") };
        override_string(&mut val, "TEST_OMNIPROBE_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_OMNIPROBE_STR") };
    }

    #[test]
    #[serial]
    fn env_override_bool_invalid_keeps_original() {
        let mut val = false;
        // SAFETY: serial 테스트에서만 환경변수를 조작합니다.
        unsafe { std::env::set_var("TEST_OMNIPROBE_BOOL_BAD", "not-a-bool") };
        override_bool(&mut val, "TEST_OMNIPROBE_BOOL_BAD");
        assert!(!val);
        unsafe { std::env::remove_var("TEST_OMNIPROBE_BOOL_BAD") };
    }

    #[test]
    #[serial]
    fn env_override_csv_drops_empty_entries() {
        let mut val = vec!["a".to_owned()];
        // SAFETY: serial 테스트에서만 환경변수를 조작합니다.
        unsafe { std::env::set_var("TEST_OMNIPROBE_CSV", "x.toml, ,y.toml") };
        override_csv(&mut val, "TEST_OMNIPROBE_CSV");
        assert_eq!(val, vec!["x.toml", "y.toml"]);
        unsafe { std::env::remove_var("TEST_OMNIPROBE_CSV") };
    }

    #[test]
    #[serial]
    fn env_override_jobs() {
        let mut config = ProbeConfig::default();
        // SAFETY: serial 테스트에서만 환경변수를 조작합니다.
        unsafe { std::env::set_var("OMNIPROBE_RUNNER_JOBS", "6") };
        config.apply_env_overrides();
        unsafe { std::env::remove_var("OMNIPROBE_RUNNER_JOBS") };
        assert_eq!(config.runner.jobs, 6);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let err = ProbeConfig::from_file("/nonexistent/path/omniprobe.toml")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OmniprobeError::Config(ConfigError::FileNotFound { .. })
        ));
    }

    #[tokio::test]
    #[serial]
    async fn load_reads_file_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("omniprobe.toml");
        std::fs::write(&path, "[runner]\njobs = 2\n").unwrap();

        let config = ProbeConfig::load(&path).await.unwrap();
        assert_eq!(config.runner.jobs, 2);
    }

    #[tokio::test]
    async fn load_rejects_invalid_values_in_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("omniprobe.toml");
        std::fs::write(&path, "[general]\nlog_format = \"xml\"\n").unwrap();

        let err = ProbeConfig::from_file(&path).await.unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = ProbeConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = ProbeConfig::parse(&toml_str).unwrap();
        assert_eq!(config.service.base_url, parsed.service.base_url);
        assert_eq!(config.runner.jobs, parsed.runner.jobs);
    }
}
