//! 시나리오 -- 쿼리 종류, 인자, 검증기, 태그를 묶은 선언적 테스트 케이스

use std::collections::BTreeSet;

use omniprobe_core::error::ScenarioError;
use omniprobe_core::types::{ArgValue, Arguments, QueryKind};

use crate::validate::{Expectation, Validator};

/// 완전한 데이터셋이 필요한 시나리오를 표시하는 태그
pub const FULL_DB_TAG: &str = "full-db";

/// 시나리오 ID 최대 길이
const MAX_ID_LEN: usize = 128;

/// 선언적 테스트 케이스
///
/// 빌더 메서드로 구성한 뒤 레지스트리에 등록되면 더 이상 변경되지 않습니다.
///
/// ```
/// use omniprobe_core::types::QueryKind;
/// use omniprobe_harness::scenario::Scenario;
/// use omniprobe_harness::validate::Expectation;
///
/// let scenario = Scenario::new("enzsub_basic", QueryKind::Enzsub)
///     .describe("single enzyme and substrate")
///     .arg("enzymes", "P06239")
///     .arg("limit", 10_i64)
///     .tag("smoke")
///     .expect(Expectation::NonEmpty);
/// assert!(scenario.has_tag("smoke"));
/// ```
#[derive(Debug, Clone)]
pub struct Scenario {
    /// 레지스트리 내 고유 ID
    pub id: String,
    /// 호출할 쿼리 종류
    pub query_kind: QueryKind,
    /// 한 줄 설명
    pub description: String,
    /// 선언된 인자 (정규화 전)
    pub arguments: Arguments,
    /// 결과 검증기 (없으면 "에러 없음"이 곧 성공)
    pub validator: Option<Validator>,
    /// 선택용 태그
    pub tags: BTreeSet<String>,
}

impl Scenario {
    /// 인자, 검증기, 태그가 없는 시나리오를 생성합니다.
    pub fn new(id: impl Into<String>, query_kind: QueryKind) -> Self {
        Self {
            id: id.into(),
            query_kind,
            description: String::new(),
            arguments: Arguments::new(),
            validator: None,
            tags: BTreeSet::new(),
        }
    }

    /// 설명을 지정합니다.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// 인자를 추가합니다.
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    /// 태그를 추가합니다.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// 여러 태그를 추가합니다.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// 선언적 기대값을 추가합니다.
    pub fn expect(mut self, expectation: Expectation) -> Self {
        let validator = self.validator.take().unwrap_or_default();
        self.validator = Some(validator.expect(expectation));
        self
    }

    /// 이름 붙은 검사 함수를 추가합니다.
    pub fn check<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&omniprobe_core::types::QueryOutput) -> bool + Send + Sync + 'static,
    {
        let validator = self.validator.take().unwrap_or_default();
        self.validator = Some(validator.check(name, predicate));
        self
    }

    /// 검증기를 통째로 지정합니다.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// 태그 보유 여부
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// 완전한 데이터셋이 필요한 시나리오인지 여부
    pub fn requires_full_db(&self) -> bool {
        self.has_tag(FULL_DB_TAG)
    }

    /// 시나리오 정의의 유효성을 검증합니다.
    ///
    /// ID는 비어 있지 않아야 하며 공백이나 쉼표를 포함할 수 없습니다
    /// (명령줄에서 쉼표로 여러 ID를 연결하기 때문).
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.id.is_empty() {
            return Err(ScenarioError::Invalid {
                id: "(empty)".to_owned(),
                reason: "scenario id must not be empty".to_owned(),
            });
        }

        if self.id.len() > MAX_ID_LEN {
            return Err(ScenarioError::Invalid {
                id: self.id.clone(),
                reason: format!("scenario id must not exceed {MAX_ID_LEN} characters"),
            });
        }

        if self.id.chars().any(|c| c.is_whitespace() || c == ',') {
            return Err(ScenarioError::Invalid {
                id: self.id.clone(),
                reason: "scenario id must not contain whitespace or commas".to_owned(),
            });
        }

        if self.tags.iter().any(|t| t.trim().is_empty()) {
            return Err(ScenarioError::Invalid {
                id: self.id.clone(),
                reason: "tags must not be empty".to_owned(),
            });
        }

        Ok(())
    }
}
