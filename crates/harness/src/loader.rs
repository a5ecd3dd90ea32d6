//! 시나리오 파일 로더 -- TOML 파일에서 추가 시나리오를 로드합니다.
//!
//! 파일 형식:
//!
//! ```toml
//! [[scenario]]
//! id = "interactions_tf_target"
//! query_kind = "interactions"
//! description = "transcriptional interactions"
//! tags = ["smoke"]
//!
//! [scenario.arguments]
//! datasets = "collectri,dorothea"
//! genesymbols = true
//!
//! [[scenario.expect]]
//! check = "has_columns"
//! columns = ["source", "target"]
//! ```
//!
//! 파일 하나라도 실패하면 전체 로딩이 실패합니다. 시작 시점의 에러로 취급합니다.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::Deserialize;

use omniprobe_core::error::ScenarioError;
use omniprobe_core::types::{Arguments, QueryKind};

use crate::scenario::Scenario;
use crate::validate::{Expectation, Validator};

/// 시나리오 파일 최대 크기
const MAX_SCENARIO_FILE_SIZE: u64 = 1024 * 1024; // 1MB
/// 파일 하나에 허용하는 최대 시나리오 수
const MAX_SCENARIOS_PER_FILE: usize = 1_000;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioFile {
    #[serde(default)]
    scenario: Vec<ScenarioEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioEntry {
    id: String,
    query_kind: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: BTreeSet<String>,
    #[serde(default)]
    arguments: Arguments,
    #[serde(default)]
    expect: Vec<Expectation>,
}

impl ScenarioEntry {
    fn into_scenario(self) -> Result<Scenario, ScenarioError> {
        let query_kind: QueryKind = self.query_kind.parse()?;

        let mut scenario = Scenario::new(self.id, query_kind).describe(self.description);
        scenario.arguments = self.arguments;
        scenario.tags = self.tags;
        if !self.expect.is_empty() {
            let validator = self
                .expect
                .into_iter()
                .fold(Validator::new(), Validator::expect);
            scenario = scenario.with_validator(validator);
        }

        scenario.validate()?;
        Ok(scenario)
    }
}

/// 시나리오 파일 로더
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// 여러 파일을 순서대로 로드합니다.
    ///
    /// 파일 사이의 ID 중복도 에러입니다. 레지스트리와의 중복은
    /// [`crate::registry::ScenarioRegistry::extend`]가 검사합니다.
    pub async fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Scenario>, ScenarioError> {
        let mut scenarios = Vec::new();
        let mut seen = HashSet::new();

        for path in paths {
            for scenario in Self::load_file(path).await? {
                if !seen.insert(scenario.id.clone()) {
                    return Err(ScenarioError::DuplicateId(scenario.id));
                }
                scenarios.push(scenario);
            }
        }

        Ok(scenarios)
    }

    /// 단일 TOML 파일에서 시나리오를 로드합니다.
    pub async fn load_file(path: impl AsRef<Path>) -> Result<Vec<Scenario>, ScenarioError> {
        let path = path.as_ref();

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| ScenarioError::Load {
                path: path.display().to_string(),
                reason: format!("failed to read file metadata: {e}"),
            })?;

        if metadata.len() > MAX_SCENARIO_FILE_SIZE {
            return Err(ScenarioError::Load {
                path: path.display().to_string(),
                reason: format!(
                    "file too large: {} bytes (max: {MAX_SCENARIO_FILE_SIZE})",
                    metadata.len()
                ),
            });
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ScenarioError::Load {
                path: path.display().to_string(),
                reason: format!("failed to read file: {e}"),
            })?;

        let scenarios = Self::parse_toml(&content, &path.display().to_string())?;
        tracing::info!(
            path = %path.display(),
            count = scenarios.len(),
            "loaded scenario file"
        );
        Ok(scenarios)
    }

    /// TOML 문자열을 파싱하여 시나리오 목록을 생성합니다.
    pub fn parse_toml(toml_str: &str, source: &str) -> Result<Vec<Scenario>, ScenarioError> {
        let file: ScenarioFile = toml::from_str(toml_str).map_err(|e| ScenarioError::Load {
            path: source.to_owned(),
            reason: format!("TOML parse error: {e}"),
        })?;

        if file.scenario.len() > MAX_SCENARIOS_PER_FILE {
            return Err(ScenarioError::Load {
                path: source.to_owned(),
                reason: format!("too many scenarios: max {MAX_SCENARIOS_PER_FILE}"),
            });
        }

        file.scenario
            .into_iter()
            .map(ScenarioEntry::into_scenario)
            .collect()
    }
}
