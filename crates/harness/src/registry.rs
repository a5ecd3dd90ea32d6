//! 시나리오 레지스트리 -- 등록 순서를 보존하는 읽기 전용 카탈로그
//!
//! 레지스트리는 시작 시 한 번 구성되고, 이후에는 조회만 합니다.
//! 모든 조회 결과는 등록 순서를 유지하므로 보고서를 실행 간에 비교할 수 있습니다.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use omniprobe_core::error::ScenarioError;

use crate::catalog::builtin_scenarios;
use crate::scenario::Scenario;

/// 시나리오 레지스트리
#[derive(Debug, Clone, Default)]
pub struct ScenarioRegistry {
    scenarios: Vec<Arc<Scenario>>,
}

impl ScenarioRegistry {
    /// 내장 카탈로그로 레지스트리를 구성합니다.
    pub fn builtin() -> Self {
        Self {
            scenarios: builtin_scenarios().into_iter().map(Arc::new).collect(),
        }
    }

    /// 주어진 시나리오들로 레지스트리를 구성합니다.
    ///
    /// # Errors
    /// - 시나리오 정의가 유효하지 않은 경우
    /// - ID가 중복된 경우
    pub fn new(scenarios: Vec<Scenario>) -> Result<Self, ScenarioError> {
        let mut registry = Self::default();
        registry.extend(scenarios)?;
        Ok(registry)
    }

    /// 시나리오들을 레지스트리 뒤쪽에 추가합니다.
    ///
    /// 하나라도 실패하면 아무것도 추가하지 않습니다.
    pub fn extend(&mut self, scenarios: Vec<Scenario>) -> Result<(), ScenarioError> {
        let mut seen: HashSet<&str> = self.scenarios.iter().map(|s| s.id.as_str()).collect();
        for scenario in &scenarios {
            scenario.validate()?;
            if !seen.insert(scenario.id.as_str()) {
                return Err(ScenarioError::DuplicateId(scenario.id.clone()));
            }
        }
        self.scenarios
            .extend(scenarios.into_iter().map(Arc::new));
        Ok(())
    }

    /// 모든 시나리오 (등록 순서)
    pub fn list_all(&self) -> &[Arc<Scenario>] {
        &self.scenarios
    }

    /// ID가 주어진 집합에 속하는 시나리오 (등록 순서)
    ///
    /// 알 수 없는 ID는 조용히 무시합니다. 결과가 비었는지는 호출자가 판단합니다.
    pub fn find_by_ids<I, S>(&self, ids: I) -> Vec<Arc<Scenario>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted: HashSet<String> = ids.into_iter().map(|id| id.as_ref().to_owned()).collect();
        self.scenarios
            .iter()
            .filter(|s| wanted.contains(&s.id))
            .cloned()
            .collect()
    }

    /// 태그를 가진 시나리오 (등록 순서)
    pub fn filter_by_tag(&self, tag: &str) -> Vec<Arc<Scenario>> {
        self.scenarios
            .iter()
            .filter(|s| s.has_tag(tag))
            .cloned()
            .collect()
    }

    /// ID로 단일 시나리오를 조회합니다.
    pub fn get(&self, id: &str) -> Option<&Arc<Scenario>> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    /// 등록된 모든 태그 (정렬됨)
    pub fn tags(&self) -> BTreeSet<&str> {
        self.scenarios
            .iter()
            .flat_map(|s| s.tags.iter().map(String::as_str))
            .collect()
    }

    /// 등록된 시나리오 수
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
