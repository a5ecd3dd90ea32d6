//! 실행 디스패처 -- 시나리오 하나를 실행하고 결과를 분류합니다.
//!
//! 디스패처는 시나리오 단위 격리 경계입니다. 서비스 호출의 모든 에러와
//! 타임아웃은 여기서 [`RunResult`]로 변환되며 호출자에게 전파되지 않습니다.

use std::sync::Arc;
use std::time::Duration;

use metrics::{counter, histogram};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use omniprobe_core::error::QueryError;
use omniprobe_core::metrics::{
    LABEL_QUERY_KIND, LABEL_RESULT, LABEL_STATUS, SCENARIO_DURATION_SECONDS, SCENARIOS_TOTAL,
    VALIDATION_CHECKS_TOTAL,
};
use omniprobe_core::service::QueryService;

use crate::normalize::normalize;
use crate::result::{RunResult, RunStatus};
use crate::scenario::Scenario;

/// full-db 게이트로 건너뛸 때 기록하는 사유
pub const FULL_DB_SKIP_REASON: &str = "requires full database";

/// 시나리오 실행기
pub struct Dispatcher<S> {
    service: Arc<S>,
    /// 시나리오별 타임아웃 (`None`이면 제한 없음)
    timeout: Option<Duration>,
}

impl<S> Clone for Dispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            timeout: self.timeout,
        }
    }
}

impl<S: QueryService> Dispatcher<S> {
    /// 타임아웃 없는 디스패처를 생성합니다.
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            timeout: None,
        }
    }

    /// 시나리오별 타임아웃을 지정합니다. 0초는 제한 없음으로 취급합니다.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout.filter(|t| !t.is_zero());
        self
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// 시나리오 하나를 실행합니다.
    ///
    /// full-db 시나리오는 `include_full_db`가 거짓이면 서비스를 호출하지 않고
    /// 건너뜁니다. 그 외에는 인자를 정규화해 서비스를 호출하고, 성공 시
    /// 검증기를 적용합니다. 이 함수는 실패하지 않습니다.
    pub async fn dispatch(&self, scenario: &Scenario, include_full_db: bool) -> RunResult {
        if scenario.requires_full_db() && !include_full_db {
            debug!(scenario = %scenario.id, "skipping full-db scenario");
            let result = RunResult::skipped(&scenario.id, scenario.query_kind, FULL_DB_SKIP_REASON);
            record(&result);
            return result;
        }

        let arguments = normalize(&scenario.arguments);
        debug!(
            scenario = %scenario.id,
            query_kind = %scenario.query_kind,
            arguments = arguments.len(),
            "dispatching scenario"
        );

        let started = Instant::now();
        let outcome = match self.timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, self.service.invoke(scenario.query_kind, &arguments))
                    .await
                {
                    Ok(outcome) => outcome,
                    Err(_) => Err(QueryError::Timeout { limit }),
                }
            }
            None => self.service.invoke(scenario.query_kind, &arguments).await,
        };
        let elapsed = started.elapsed();

        let result = match outcome {
            Ok(output) => {
                let validation = scenario.validator.as_ref().map(|v| v.evaluate(&output));
                RunResult::success(
                    &scenario.id,
                    scenario.query_kind,
                    output.row_count(),
                    validation,
                    elapsed,
                )
            }
            Err(e) => RunResult::error(&scenario.id, scenario.query_kind, e.to_string(), elapsed),
        };

        log_result(&result);
        record(&result);
        result
    }
}

fn log_result(result: &RunResult) {
    match result.status {
        RunStatus::Success if result.has_failed_checks() => {
            let failed: Vec<&str> = result
                .validation
                .iter()
                .flat_map(|v| v.failures())
                .map(|c| c.name.as_str())
                .collect();
            warn!(
                scenario = %result.id,
                query_kind = %result.query_kind,
                duration_ms = result.duration_ms,
                failed_checks = ?failed,
                "scenario succeeded with failed checks"
            );
        }
        RunStatus::Success => {
            info!(
                scenario = %result.id,
                query_kind = %result.query_kind,
                rows = result.row_count.unwrap_or_default(),
                duration_ms = result.duration_ms,
                "scenario succeeded"
            );
        }
        RunStatus::Error => {
            warn!(
                scenario = %result.id,
                query_kind = %result.query_kind,
                duration_ms = result.duration_ms,
                error = result.error_message.as_deref().unwrap_or_default(),
                "scenario failed"
            );
        }
        RunStatus::Skipped => {}
    }
}

fn record(result: &RunResult) {
    counter!(SCENARIOS_TOTAL, LABEL_STATUS => result.status.as_str()).increment(1);

    if result.status == RunStatus::Skipped {
        return;
    }

    histogram!(SCENARIO_DURATION_SECONDS, LABEL_QUERY_KIND => result.query_kind.endpoint())
        .record(result.duration().as_secs_f64());

    if let Some(validation) = &result.validation {
        counter!(VALIDATION_CHECKS_TOTAL, LABEL_RESULT => "pass")
            .increment(validation.passed_count() as u64);
        counter!(VALIDATION_CHECKS_TOTAL, LABEL_RESULT => "fail")
            .increment(validation.failed_count() as u64);
    }
}
