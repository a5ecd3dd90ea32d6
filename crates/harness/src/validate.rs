//! 검증기 -- 쿼리 결과에 대한 선언적 검사
//!
//! [`Validator`]는 이름이 붙은 검사들의 순서 있는 목록입니다.
//! 평가 결과는 검사별 [`CheckOutcome`]으로 남아 어떤 항목이 실패했는지
//! 개별적으로 보고할 수 있습니다.
//!
//! # TOML 스키마
//! ```toml
//! [[scenario.expect]]
//! check = "min_rows"
//! min = 1
//!
//! [[scenario.expect]]
//! check = "values_in"
//! column = "entity_type"
//! allowed = ["protein", "complex"]
//! ```

use std::fmt;
use std::sync::Arc;

use omniprobe_core::types::QueryOutput;
use serde::{Deserialize, Serialize};

/// 코드로 정의하는 검사 함수
pub type CheckFn = Arc<dyn Fn(&QueryOutput) -> bool + Send + Sync>;

/// 선언적 기대값
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum Expectation {
    /// 결과가 비어 있지 않음
    NonEmpty,
    /// 최소 행 수
    MinRows { min: usize },
    /// 최대 행 수
    MaxRows { max: usize },
    /// 모든 컬럼이 존재
    HasColumns { columns: Vec<String> },
    /// 컬럼의 모든 값이 허용 목록 안에 있음 (빈 값은 무시)
    ValuesIn { column: String, allowed: Vec<String> },
    /// 컬럼의 모든 값이 같음
    AllEqual { column: String, value: String },
    /// 컬럼에 값이 하나 이상 존재 (`;`로 구분된 다중 값 포함)
    ContainsValue { column: String, value: String },
}

impl Expectation {
    /// 보고용 검사 이름
    pub fn name(&self) -> String {
        match self {
            Self::NonEmpty => "non_empty".to_owned(),
            Self::MinRows { min } => format!("min_rows({min})"),
            Self::MaxRows { max } => format!("max_rows({max})"),
            Self::HasColumns { columns } => format!("has_columns({})", columns.join(",")),
            Self::ValuesIn { column, .. } => format!("values_in({column})"),
            Self::AllEqual { column, value } => format!("all_equal({column}={value})"),
            Self::ContainsValue { column, value } => format!("contains({column}={value})"),
        }
    }

    /// 결과에 대해 기대값을 평가합니다.
    pub fn evaluate(&self, output: &QueryOutput) -> CheckOutcome {
        let name = self.name();
        match self {
            Self::NonEmpty => {
                let rows = output.row_count();
                let detail = (rows == 0).then(|| "result is empty".to_owned());
                CheckOutcome::new(name, rows > 0, detail)
            }
            Self::MinRows { min } => {
                let rows = output.row_count();
                CheckOutcome::new(
                    name,
                    rows >= *min,
                    (rows < *min).then(|| format!("got {rows} rows")),
                )
            }
            Self::MaxRows { max } => {
                let rows = output.row_count();
                CheckOutcome::new(
                    name,
                    rows <= *max,
                    (rows > *max).then(|| format!("got {rows} rows")),
                )
            }
            Self::HasColumns { columns } => {
                let missing: Vec<&str> = columns
                    .iter()
                    .filter(|column| !output.has_column(column))
                    .map(String::as_str)
                    .collect();
                let detail =
                    (!missing.is_empty()).then(|| format!("missing: {}", missing.join(", ")));
                CheckOutcome::new(name, missing.is_empty(), detail)
            }
            Self::ValuesIn { column, allowed } => match output.column_values(column) {
                None => CheckOutcome::missing_column(name, column),
                Some(values) => {
                    let unexpected: Vec<String> = values
                        .into_iter()
                        .filter(|v| !v.is_empty() && !allowed.contains(v))
                        .collect();
                    let detail = unexpected
                        .first()
                        .map(|v| format!("unexpected value '{v}' ({} total)", unexpected.len()));
                    CheckOutcome::new(name, unexpected.is_empty(), detail)
                }
            },
            Self::AllEqual { column, value } => match output.column_values(column) {
                None => CheckOutcome::missing_column(name, column),
                Some(values) => {
                    let other = values.iter().find(|v| *v != value);
                    let detail = other.map(|v| format!("found '{v}'"));
                    CheckOutcome::new(name, other.is_none(), detail)
                }
            },
            Self::ContainsValue { column, value } => match output.column_values(column) {
                None => CheckOutcome::missing_column(name, column),
                Some(values) => {
                    let found = values
                        .iter()
                        .any(|cell| cell == value || cell.split(';').any(|part| part == value));
                    let detail = (!found).then(|| format!("'{value}' not found"));
                    CheckOutcome::new(name, found, detail)
                }
            },
        }
    }
}

/// 개별 검사 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    /// 검사 이름
    pub name: String,
    /// 통과 여부
    pub passed: bool,
    /// 실패 시 부가 설명
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CheckOutcome {
    /// 새 검사 결과를 생성합니다.
    pub fn new(name: impl Into<String>, passed: bool, detail: Option<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail,
        }
    }

    fn missing_column(name: String, column: &str) -> Self {
        Self::new(name, false, Some(format!("column '{column}' missing")))
    }
}

/// 검증기 전체 평가 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    /// 모든 검사 통과 여부
    pub passed: bool,
    /// 검사별 결과 (정의 순서)
    pub checks: Vec<CheckOutcome>,
}

impl ValidationOutcome {
    /// 검사 결과 목록으로부터 생성합니다. 검사가 없으면 통과입니다.
    pub fn from_checks(checks: Vec<CheckOutcome>) -> Self {
        Self {
            passed: checks.iter().all(|c| c.passed),
            checks,
        }
    }

    /// 통과한 검사 수
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// 실패한 검사 수
    pub fn failed_count(&self) -> usize {
        self.checks.len() - self.passed_count()
    }

    /// 실패한 검사들
    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.checks.iter().filter(|c| !c.passed)
    }
}

#[derive(Clone)]
enum Check {
    Expect(Expectation),
    Custom { name: String, predicate: CheckFn },
}

/// 검사 목록
///
/// 선언적 [`Expectation`]과 코드로 작성한 검사 함수를 섞어 쓸 수 있습니다.
#[derive(Clone, Default)]
pub struct Validator {
    checks: Vec<Check>,
}

impl Validator {
    /// 빈 검증기를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 선언적 기대값을 추가합니다.
    pub fn expect(mut self, expectation: Expectation) -> Self {
        self.checks.push(Check::Expect(expectation));
        self
    }

    /// 이름이 붙은 검사 함수를 추가합니다.
    pub fn check<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&QueryOutput) -> bool + Send + Sync + 'static,
    {
        self.checks.push(Check::Custom {
            name: name.into(),
            predicate: Arc::new(predicate),
        });
        self
    }

    /// 등록된 검사 수
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// 검사가 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// 검사 이름 목록 (정의 순서)
    pub fn check_names(&self) -> Vec<String> {
        self.checks
            .iter()
            .map(|check| match check {
                Check::Expect(e) => e.name(),
                Check::Custom { name, .. } => name.clone(),
            })
            .collect()
    }

    /// 모든 검사를 정의 순서대로 평가합니다.
    pub fn evaluate(&self, output: &QueryOutput) -> ValidationOutcome {
        let checks = self
            .checks
            .iter()
            .map(|check| match check {
                Check::Expect(e) => e.evaluate(output),
                Check::Custom { name, predicate } => {
                    CheckOutcome::new(name.clone(), predicate(output), None)
                }
            })
            .collect();
        ValidationOutcome::from_checks(checks)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("checks", &self.check_names())
            .finish()
    }
}
