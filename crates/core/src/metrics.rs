//! 메트릭 상수 및 설명 등록
//!
//! 하네스와 클라이언트가 기록하는 메트릭의 이름과 설명을 한 곳에서 정의합니다.
//! 레코더가 설치되지 않았다면 `metrics` 매크로 호출은 아무 일도 하지 않습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `omniprobe_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//! use omniprobe_core::metrics::{SCENARIOS_TOTAL, LABEL_STATUS};
//!
//! counter!(SCENARIOS_TOTAL, LABEL_STATUS => "ok").increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 시나리오 결과 상태 레이블 키 (ok, error, skipped)
pub const LABEL_STATUS: &str = "status";

/// 쿼리 종류 레이블 키 (interactions, annotations, ...)
pub const LABEL_QUERY_KIND: &str = "query_kind";

/// 결과 레이블 키 (검증: pass, fail / 요청: ok, cached, error)
pub const LABEL_RESULT: &str = "result";

/// 서비스 엔드포인트 레이블 키
pub const LABEL_ENDPOINT: &str = "endpoint";

// ─── 하네스 메트릭 ─────────────────────────────────────────────────

/// 실행한 시나리오 수 (counter, label: status)
pub const SCENARIOS_TOTAL: &str = "omniprobe_scenarios_total";

/// 시나리오 실행 시간 (histogram, 초, label: query_kind)
pub const SCENARIO_DURATION_SECONDS: &str = "omniprobe_scenario_duration_seconds";

/// 검증 항목 수 (counter, label: result)
pub const VALIDATION_CHECKS_TOTAL: &str = "omniprobe_validation_checks_total";

// ─── 클라이언트 메트릭 ─────────────────────────────────────────────

/// 쿼리 서비스 요청 수 (counter, labels: endpoint, result)
pub const QUERY_REQUESTS_TOTAL: &str = "omniprobe_query_requests_total";

/// 모든 메트릭의 설명을 등록합니다.
///
/// 레코더를 설치한 직후 한 번 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        SCENARIOS_TOTAL,
        "Scenarios executed, labelled by final status"
    );
    describe_histogram!(
        SCENARIO_DURATION_SECONDS,
        "Wall-clock time of a single scenario in seconds, by query kind"
    );
    describe_counter!(
        VALIDATION_CHECKS_TOTAL,
        "Validation checks evaluated, labelled by result"
    );
    describe_counter!(
        QUERY_REQUESTS_TOTAL,
        "Query service requests, labelled by endpoint and result"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_METRIC_NAMES: &[&str] = &[
        SCENARIOS_TOTAL,
        SCENARIO_DURATION_SECONDS,
        VALIDATION_CHECKS_TOTAL,
        QUERY_REQUESTS_TOTAL,
    ];

    #[test]
    fn all_metrics_start_with_omniprobe_prefix() {
        for name in ALL_METRIC_NAMES {
            assert!(
                name.starts_with("omniprobe_"),
                "Metric '{name}' does not start with 'omniprobe_' prefix"
            );
        }
    }

    #[test]
    fn metric_suffixes_follow_convention() {
        assert!(SCENARIOS_TOTAL.ends_with("_total"));
        assert!(VALIDATION_CHECKS_TOTAL.ends_with("_total"));
        assert!(QUERY_REQUESTS_TOTAL.ends_with("_total"));
        assert!(SCENARIO_DURATION_SECONDS.ends_with("_seconds"));
    }

    #[test]
    fn describe_all_does_not_panic() {
        describe_all();
    }
}
