//! 요약 -- 실행 결과 목록을 집계하고 결과별 표시 문구를 만듭니다.
//!
//! 표 형태의 렌더링은 CLI의 `Render for RunReport`가 담당합니다.
//!
//! 요약은 표시 전용입니다. 종료 코드는 [`crate::runner::RunReport::exit_code`]가
//! 원본 결과로부터 따로 계산합니다.

use std::fmt;

use serde::Serialize;

use crate::result::{RunResult, RunStatus};

/// 배치 실행 집계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub errored: usize,
    /// 통과한 검사 항목 수 (모든 시나리오 합계)
    pub checks_passed: usize,
    /// 실패한 검사 항목 수
    pub checks_failed: usize,
    /// 실패한 검사가 하나 이상 있는 성공 시나리오 수
    pub scenarios_with_failed_checks: usize,
    /// 시나리오 실행 시간 합계 (밀리초)
    pub duration_ms: u64,
}

impl RunSummary {
    pub fn from_results(results: &[RunResult]) -> Self {
        results.iter().fold(Self::default(), |mut acc, result| {
            acc.total += 1;
            match result.status {
                RunStatus::Success => acc.succeeded += 1,
                RunStatus::Skipped => acc.skipped += 1,
                RunStatus::Error => acc.errored += 1,
            }
            if let Some(validation) = &result.validation {
                acc.checks_passed += validation.passed_count();
                acc.checks_failed += validation.failed_count();
                if !validation.passed {
                    acc.scenarios_with_failed_checks += 1;
                }
            }
            acc.duration_ms = acc.duration_ms.saturating_add(result.duration_ms);
            acc
        })
    }

    /// 총 검사 항목 수
    pub fn checks_total(&self) -> usize {
        self.checks_passed + self.checks_failed
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} scenarios: {} succeeded, {} skipped, {} errored; checks passed {}/{}",
            self.total,
            self.succeeded,
            self.skipped,
            self.errored,
            self.checks_passed,
            self.checks_total()
        )
    }
}

/// 결과 한 줄에 붙는 부가 설명 (행 수, 건너뛴 사유, 에러 메시지)
pub fn annotation(result: &RunResult) -> String {
    match result.status {
        RunStatus::Success => {
            let rows = result.row_count.unwrap_or_default();
            format!("{rows} rows in {}ms", result.duration_ms)
        }
        RunStatus::Skipped => result.skip_reason.clone().unwrap_or_default(),
        RunStatus::Error => result.error_message.clone().unwrap_or_default(),
    }
}

/// 검증 결과 표시 (`-`: 검증 없음, `ok 3/3`, `FAILED 1/3 (min_rows_10)`)
pub fn validation_label(result: &RunResult) -> String {
    let Some(validation) = &result.validation else {
        return "-".to_owned();
    };

    let total = validation.checks.len();
    if validation.passed {
        return format!("ok {}/{}", validation.passed_count(), total);
    }

    let failed: Vec<&str> = validation.failures().map(|c| c.name.as_str()).collect();
    format!(
        "FAILED {}/{} ({})",
        validation.passed_count(),
        total,
        failed.join(", ")
    )
}
