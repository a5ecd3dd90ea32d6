//! 시나리오 실행 결과

use std::time::Duration;

use omniprobe_core::types::QueryKind;
use serde::Serialize;

use crate::validate::ValidationOutcome;

/// 시나리오 최종 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// 서비스 호출 성공 (검사 실패 여부와 무관)
    Success,
    /// 서비스 호출 실패, 타임아웃, 실행 중 패닉
    Error,
    /// 실행하지 않음 (full-db 게이트)
    Skipped,
}

impl RunStatus {
    /// 메트릭 레이블 및 출력용 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 시나리오 하나의 실행 결과
///
/// 생성 후에는 변경하지 않고 요약 단계로 값 그대로 전달됩니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    pub id: String,
    pub query_kind: QueryKind,
    pub status: RunStatus,
    /// 성공한 경우의 결과 행 수
    pub row_count: Option<usize>,
    /// 검증기가 있는 성공 시나리오의 검사 결과
    pub validation: Option<ValidationOutcome>,
    pub error_message: Option<String>,
    pub skip_reason: Option<String>,
    pub duration_ms: u64,
}

impl RunResult {
    /// 성공 결과
    pub fn success(
        id: impl Into<String>,
        query_kind: QueryKind,
        row_count: usize,
        validation: Option<ValidationOutcome>,
        duration: Duration,
    ) -> Self {
        Self {
            id: id.into(),
            query_kind,
            status: RunStatus::Success,
            row_count: Some(row_count),
            validation,
            error_message: None,
            skip_reason: None,
            duration_ms: millis(duration),
        }
    }

    /// 에러 결과
    pub fn error(
        id: impl Into<String>,
        query_kind: QueryKind,
        message: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            id: id.into(),
            query_kind,
            status: RunStatus::Error,
            row_count: None,
            validation: None,
            error_message: Some(message.into()),
            skip_reason: None,
            duration_ms: millis(duration),
        }
    }

    /// 건너뜀 결과
    pub fn skipped(id: impl Into<String>, query_kind: QueryKind, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            query_kind,
            status: RunStatus::Skipped,
            row_count: None,
            validation: None,
            error_message: None,
            skip_reason: Some(reason.into()),
            duration_ms: 0,
        }
    }

    /// 검증 통과 여부 (검증기가 없거나 실행되지 않았으면 `None`)
    pub fn checks_passed(&self) -> Option<bool> {
        self.validation.as_ref().map(|v| v.passed)
    }

    /// 실패한 검사가 있는지 여부
    pub fn has_failed_checks(&self) -> bool {
        self.checks_passed() == Some(false)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
