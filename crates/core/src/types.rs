//! 도메인 타입 -- 쿼리 종류, 인자 값, 쿼리 결과
//!
//! 쿼리 서비스와 하네스가 공유하는 값 타입을 정의합니다.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::ScenarioError;

/// 쿼리 서비스가 제공하는 쿼리 종류
///
/// 문자열 이름은 레지스트리 구성 시점에 한 번만 해석되므로,
/// 알 수 없는 이름은 호출 시점이 아니라 시작 시점에 실패합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryKind {
    /// 분자 상호작용 네트워크
    Interactions,
    /// 단백질/복합체 주석
    Annotations,
    /// 단백질 복합체
    Complexes,
    /// 효소-기질 관계 (번역 후 변형)
    Enzsub,
    /// 세포 간 통신 역할
    Intercell,
    /// 주석 리소스 요약
    AnnotationsSummary,
    /// intercell 카테고리 요약
    IntercellSummary,
    /// 리소스 메타데이터
    Resources,
    /// 쿼리 인자 안내
    Queries,
}

impl QueryKind {
    /// 모든 쿼리 종류 (선언 순서)
    pub const ALL: [QueryKind; 9] = [
        Self::Interactions,
        Self::Annotations,
        Self::Complexes,
        Self::Enzsub,
        Self::Intercell,
        Self::AnnotationsSummary,
        Self::IntercellSummary,
        Self::Resources,
        Self::Queries,
    ];

    /// 서비스 URL 경로 세그먼트
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Interactions => "interactions",
            Self::Annotations => "annotations",
            Self::Complexes => "complexes",
            Self::Enzsub => "enzsub",
            Self::Intercell => "intercell",
            Self::AnnotationsSummary => "annotations_summary",
            Self::IntercellSummary => "intercell_summary",
            Self::Resources => "resources",
            Self::Queries => "queries",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

impl FromStr for QueryKind {
    type Err = ScenarioError;

    /// 서비스가 허용하는 동의어를 대소문자 구분 없이 받아들입니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_lowercase().as_str() {
            "interactions" | "interaction" | "network" => Self::Interactions,
            "annotations" | "annotation" | "annot" => Self::Annotations,
            "complexes" | "complex" => Self::Complexes,
            "enzsub" | "enz_sub" | "enz-sub" | "ptms" | "ptm" | "enzyme-substrate"
            | "enzyme_substrate" => Self::Enzsub,
            "intercell" | "intercellular" | "inter_cell" | "inter-cell" => Self::Intercell,
            "annotations_summary" => Self::AnnotationsSummary,
            "intercell_summary" => Self::IntercellSummary,
            "resources" => Self::Resources,
            "queries" => Self::Queries,
            _ => return Err(ScenarioError::UnknownQueryKind(s.to_owned())),
        };
        Ok(kind)
    }
}

impl Serialize for QueryKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.endpoint())
    }
}

impl<'de> Deserialize<'de> for QueryKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// 시나리오 인자 값
///
/// `Absent`는 "인자 생략"을 뜻하며 절대 서비스로 전달되지 않습니다.
/// JSON `null`은 `Absent`로 역직렬화됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// 인자 생략
    Absent,
    /// 불리언 (`yes`/`no`로 전송)
    Bool(bool),
    /// 정수
    Int(i64),
    /// 실수
    Float(f64),
    /// 문자열
    Text(String),
    /// 다중 값 (쉼표로 연결해 전송)
    List(Vec<ArgValue>),
}

impl ArgValue {
    /// 서비스 쿼리 문자열에 들어갈 값으로 인코딩합니다.
    pub fn to_query_value(&self) -> String {
        match self {
            Self::Absent => String::new(),
            Self::Bool(true) => "yes".to_owned(),
            Self::Bool(false) => "no".to_owned(),
            Self::Int(n) => n.to_string(),
            Self::Float(x) => x.to_string(),
            Self::Text(s) => s.clone(),
            Self::List(items) => items
                .iter()
                .map(Self::to_query_value)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("<absent>"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            other => f.write_str(&other.to_query_value()),
        }
    }
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ArgValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for ArgValue {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for ArgValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<ArgValue>> From<Vec<T>> for ArgValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ArgValue>, const N: usize> From<[T; N]> for ArgValue {
    fn from(v: [T; N]) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ArgValue>> From<Option<T>> for ArgValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Absent, Into::into)
    }
}

/// 인자 이름 → 값 (결정적 순서)
pub type Arguments = BTreeMap<String, ArgValue>;

/// 탭 구분 응답을 파싱한 테이블
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// 헤더 행
    pub columns: Vec<String>,
    /// 데이터 행 (헤더 제외)
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// 컬럼 위치
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// 쿼리 서비스 응답
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    /// 행 × 이름 있는 컬럼 (TSV)
    Table(Table),
    /// 레코드 배열 (JSON 배열)
    Records(Vec<Value>),
    /// 배열이 아닌 JSON 문서
    Document(Value),
    /// 분류할 수 없는 텍스트
    Text(String),
}

impl QueryOutput {
    /// 결과 행 수
    ///
    /// 테이블은 행 수, 레코드는 원소 수, JSON 문서는 배열 길이 또는
    /// 비어 있지 않으면 1, 텍스트는 비어 있지 않으면 1입니다.
    pub fn row_count(&self) -> usize {
        match self {
            Self::Table(table) => table.rows.len(),
            Self::Records(records) => records.len(),
            Self::Document(Value::Null) => 0,
            Self::Document(Value::Array(items)) => items.len(),
            Self::Document(Value::Object(map)) => usize::from(!map.is_empty()),
            Self::Document(_) => 1,
            Self::Text(text) => usize::from(!text.trim().is_empty()),
        }
    }

    /// 결과가 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// 컬럼 이름 목록
    ///
    /// 레코드의 경우 모든 객체 키의 합집합을 처음 등장한 순서대로 반환합니다.
    pub fn columns(&self) -> Vec<String> {
        match self {
            Self::Table(table) => table.columns.clone(),
            Self::Records(records) => {
                let mut columns: Vec<String> = Vec::new();
                for record in records {
                    if let Value::Object(map) = record {
                        for key in map.keys() {
                            if !columns.iter().any(|c| c == key) {
                                columns.push(key.clone());
                            }
                        }
                    }
                }
                columns
            }
            Self::Document(Value::Object(map)) => map.keys().cloned().collect(),
            Self::Document(_) | Self::Text(_) => Vec::new(),
        }
    }

    /// 컬럼 존재 여부
    pub fn has_column(&self, name: &str) -> bool {
        match self {
            Self::Table(table) => table.column_index(name).is_some(),
            _ => self.columns().iter().any(|c| c == name),
        }
    }

    /// 컬럼의 행별 값 (문자열화)
    ///
    /// JSON 배열 셀은 TSV 표현과 같도록 `;`로 연결합니다.
    /// 컬럼이 없으면 `None`을 반환합니다.
    pub fn column_values(&self, name: &str) -> Option<Vec<String>> {
        match self {
            Self::Table(table) => {
                let idx = table.column_index(name)?;
                Some(
                    table
                        .rows
                        .iter()
                        .map(|row| row.get(idx).cloned().unwrap_or_default())
                        .collect(),
                )
            }
            Self::Records(records) => {
                if !self.has_column(name) {
                    return None;
                }
                Some(
                    records
                        .iter()
                        .map(|record| record.get(name).map(cell_to_string).unwrap_or_default())
                        .collect(),
                )
            }
            Self::Document(Value::Object(map)) => {
                map.get(name).map(|v| vec![cell_to_string(v)])
            }
            Self::Document(_) | Self::Text(_) => None,
        }
    }
}

fn cell_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(cell_to_string)
            .collect::<Vec<_>>()
            .join(";"),
        other => other.to_string(),
    }
}
