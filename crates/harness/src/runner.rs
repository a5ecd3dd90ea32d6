//! 배치 실행기와 선택기
//!
//! [`resolve_selection`]이 명령 수준의 선택 정책을 구체적인 시나리오 목록으로
//! 바꾸고, [`BatchRunner`]가 그 목록을 실행해 [`RunReport`]를 만듭니다.
//!
//! # 선택 정책
//!
//! 1. 시나리오 ID가 주어지면 해당 ID만 실행합니다 (태그 필터는 무시).
//! 2. 그렇지 않고 태그 필터가 있으면 포함 태그 중 하나라도 가지며
//!    제외 태그는 하나도 갖지 않는 시나리오를 실행합니다.
//! 3. 둘 다 없으면 레지스트리 전체를 실행합니다.
//!
//! 결과가 비면 [`SelectionError`]입니다. full-db 게이트는 선택 이후
//! 디스패처가 모든 모드에서 적용합니다.
//!
//! # 동시성
//!
//! 시나리오마다 별도 태스크를 띄워 실행 중 패닉이 배치 전체를 멈추지 않게 합니다.
//! `jobs > 1`이면 세마포어로 동시 실행 수를 제한하고, 결과는 항상 입력 순서로
//! 모읍니다.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use omniprobe_core::config::RunnerConfig;
use omniprobe_core::error::SelectionError;
use omniprobe_core::service::QueryService;

use crate::dispatch::Dispatcher;
use crate::registry::ScenarioRegistry;
use crate::result::{RunResult, RunStatus};
use crate::scenario::Scenario;
use crate::summary::RunSummary;

/// 명령 수준의 시나리오 선택
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// 실행할 시나리오 ID (비어 있으면 태그 필터 또는 전체)
    pub scenario_ids: Vec<String>,
    /// 포함 태그 (하나라도 가지면 선택)
    pub include_tags: Vec<String>,
    /// 제외 태그 (하나라도 가지면 제외)
    pub exclude_tags: Vec<String>,
}

impl Selection {
    /// 전체 레지스트리 선택
    pub fn all() -> Self {
        Self::default()
    }

    /// ID 선택
    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scenario_ids: ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// 포함 태그를 추가합니다.
    pub fn include_tag(mut self, tag: impl Into<String>) -> Self {
        self.include_tags.push(tag.into());
        self
    }

    /// 제외 태그를 추가합니다.
    pub fn exclude_tag(mut self, tag: impl Into<String>) -> Self {
        self.exclude_tags.push(tag.into());
        self
    }

    fn requested_ids(&self) -> Vec<String> {
        self.scenario_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
            .collect()
    }

    fn has_tag_filter(&self) -> bool {
        !self.include_tags.is_empty() || !self.exclude_tags.is_empty()
    }
}

/// 선택 정책을 적용해 실행할 시나리오 목록을 구합니다 (레지스트리 순서).
///
/// # Errors
/// 선택 결과가 비어 있으면 [`SelectionError`]를 반환합니다.
pub fn resolve_selection(
    registry: &ScenarioRegistry,
    selection: &Selection,
) -> Result<Vec<Arc<Scenario>>, SelectionError> {
    let requested = selection.requested_ids();

    // `--scenario=` 처럼 ID 요청은 있지만 모두 공백인 경우
    if !selection.scenario_ids.is_empty() && requested.is_empty() {
        return Err(SelectionError::Empty {
            requested: Vec::new(),
        });
    }

    if !requested.is_empty() {
        if selection.has_tag_filter() {
            warn!("scenario ids were given, ignoring tag filters");
        }
        let found = registry.find_by_ids(&requested);
        if found.is_empty() {
            return Err(SelectionError::Empty { requested });
        }
        if found.len() < requested.len() {
            let unknown: Vec<&str> = requested
                .iter()
                .map(String::as_str)
                .filter(|id| registry.get(id).is_none())
                .collect();
            warn!(unknown = ?unknown, "some requested scenarios are not registered");
        }
        return Ok(found);
    }

    if selection.has_tag_filter() {
        let selected: Vec<Arc<Scenario>> = registry
            .list_all()
            .iter()
            .filter(|s| {
                selection.include_tags.is_empty()
                    || selection.include_tags.iter().any(|t| s.has_tag(t))
            })
            .filter(|s| !selection.exclude_tags.iter().any(|t| s.has_tag(t)))
            .cloned()
            .collect();
        if selected.is_empty() {
            return Err(SelectionError::NoTagMatch {
                include: selection.include_tags.clone(),
                exclude: selection.exclude_tags.clone(),
            });
        }
        return Ok(selected);
    }

    if registry.is_empty() {
        return Err(SelectionError::Empty {
            requested: Vec::new(),
        });
    }
    Ok(registry.list_all().to_vec())
}

/// 배치 실행 옵션
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// full-db 시나리오 포함 여부
    pub include_full_db: bool,
    /// 동시 실행 수 (1이면 순차)
    pub jobs: usize,
    /// 시나리오별 타임아웃
    pub timeout: Option<Duration>,
    /// 검증 실패도 종료 코드에 반영
    pub strict: bool,
    /// 배치 시작 전 서비스 캐시 초기화
    pub reset_cache: bool,
}

impl RunOptions {
    /// 러너 설정으로부터 생성합니다.
    pub fn from_config(config: &RunnerConfig) -> Self {
        Self {
            include_full_db: config.include_full_db,
            jobs: config.jobs.max(1),
            timeout: (config.scenario_timeout_secs > 0)
                .then(|| Duration::from_secs(config.scenario_timeout_secs)),
            strict: config.fail_on_check_failure,
            reset_cache: config.reset_cache,
        }
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::from_config(&RunnerConfig::default())
    }
}

/// 배치 실행 보고서
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// 실행 식별자
    pub run_id: Uuid,
    pub include_full_db: bool,
    pub strict: bool,
    /// 시나리오별 결과 (선택 순서)
    pub results: Vec<RunResult>,
    pub summary: RunSummary,
}

impl RunReport {
    /// 결과 목록으로 보고서를 만듭니다.
    pub fn new(run_id: Uuid, include_full_db: bool, strict: bool, results: Vec<RunResult>) -> Self {
        let summary = RunSummary::from_results(&results);
        Self {
            run_id,
            include_full_db,
            strict,
            results,
            summary,
        }
    }

    /// 에러로 끝난 시나리오가 있는지 여부
    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|r| r.status == RunStatus::Error)
    }

    /// 실패한 검사가 있는지 여부
    pub fn has_failed_checks(&self) -> bool {
        self.results.iter().any(RunResult::has_failed_checks)
    }

    /// 배치 성공 여부
    ///
    /// 에러가 없으면 성공입니다. strict 모드에서는 실패한 검사도 실패로 봅니다.
    /// 건너뛴 시나리오는 영향이 없습니다.
    pub fn is_success(&self) -> bool {
        !self.has_errors() && !(self.strict && self.has_failed_checks())
    }

    /// 프로세스 종료 코드 (0 또는 1)
    pub fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }
}

/// 배치 실행기
pub struct BatchRunner<S> {
    dispatcher: Dispatcher<S>,
    options: RunOptions,
}

impl<S: QueryService> BatchRunner<S> {
    pub fn new(service: Arc<S>, options: RunOptions) -> Self {
        let dispatcher = Dispatcher::new(service).with_timeout(options.timeout);
        Self {
            dispatcher,
            options,
        }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// 주어진 시나리오들을 실행하고 보고서를 만듭니다.
    ///
    /// 개별 시나리오의 실패는 결과로 기록될 뿐 배치를 중단하지 않습니다.
    /// 보고서는 모든 시나리오가 끝난 뒤에 만들어집니다.
    pub async fn run(&self, scenarios: &[Arc<Scenario>]) -> RunReport {
        let run_id = Uuid::new_v4();
        info!(
            run_id = %run_id,
            scenarios = scenarios.len(),
            jobs = self.options.jobs,
            include_full_db = self.options.include_full_db,
            "starting batch"
        );

        if self.options.reset_cache {
            if let Err(e) = self.dispatcher.service().reset_cache().await {
                warn!(error = %e, "failed to reset service cache");
            }
        }

        let results = if self.options.jobs <= 1 {
            self.run_sequential(scenarios).await
        } else {
            self.run_concurrent(scenarios).await
        };

        let report = RunReport::new(
            run_id,
            self.options.include_full_db,
            self.options.strict,
            results,
        );
        info!(
            run_id = %run_id,
            succeeded = report.summary.succeeded,
            skipped = report.summary.skipped,
            errored = report.summary.errored,
            checks_failed = report.summary.checks_failed,
            "batch finished"
        );
        report
    }

    async fn run_sequential(&self, scenarios: &[Arc<Scenario>]) -> Vec<RunResult> {
        let mut results = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            let handle = self.spawn_scenario(Arc::clone(scenario), None);
            results.push(join_scenario(scenario, handle).await);
        }
        results
    }

    async fn run_concurrent(&self, scenarios: &[Arc<Scenario>]) -> Vec<RunResult> {
        let semaphore = Arc::new(Semaphore::new(self.options.jobs));
        let handles: Vec<JoinHandle<RunResult>> = scenarios
            .iter()
            .map(|s| self.spawn_scenario(Arc::clone(s), Some(Arc::clone(&semaphore))))
            .collect();

        let mut results = Vec::with_capacity(scenarios.len());
        for (scenario, handle) in scenarios.iter().zip(handles) {
            results.push(join_scenario(scenario, handle).await);
        }
        results
    }

    fn spawn_scenario(
        &self,
        scenario: Arc<Scenario>,
        semaphore: Option<Arc<Semaphore>>,
    ) -> JoinHandle<RunResult> {
        let dispatcher = self.dispatcher.clone();
        let include_full_db = self.options.include_full_db;

        tokio::spawn(async move {
            // 태스크 종료 시 반환
            let _permit = match semaphore {
                Some(semaphore) => semaphore.acquire_owned().await.ok(),
                None => None,
            };
            dispatcher.dispatch(&scenario, include_full_db).await
        })
    }
}

/// 태스크 결과를 회수합니다. 패닉이나 취소는 에러 결과로 바꿉니다.
async fn join_scenario(scenario: &Scenario, handle: JoinHandle<RunResult>) -> RunResult {
    match handle.await {
        Ok(result) => result,
        Err(e) => {
            error!(scenario = %scenario.id, error = %e, "scenario task aborted");
            RunResult::error(
                &scenario.id,
                scenario.query_kind,
                format!("scenario execution aborted: {e}"),
                Duration::ZERO,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use omniprobe_core::types::QueryKind;

    use super::*;
    use crate::scenario::FULL_DB_TAG;
    use crate::validate::{CheckOutcome, ValidationOutcome};

    fn registry() -> ScenarioRegistry {
        ScenarioRegistry::new(vec![
            Scenario::new("a", QueryKind::Interactions).tags(["smoke", "core"]),
            Scenario::new("b", QueryKind::Annotations).tag(FULL_DB_TAG),
            Scenario::new("c", QueryKind::Complexes).tags(["json", "core"]),
            Scenario::new("d", QueryKind::Resources).tag("json"),
        ])
        .unwrap()
    }

    fn ids(scenarios: &[Arc<Scenario>]) -> Vec<&str> {
        scenarios.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn default_selection_is_whole_registry() {
        let selected = resolve_selection(&registry(), &Selection::all()).unwrap();
        assert_eq!(ids(&selected), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn ids_select_in_registry_order() {
        let selected = resolve_selection(&registry(), &Selection::ids(["d", "a"])).unwrap();
        assert_eq!(ids(&selected), vec!["a", "d"]);
    }

    #[test]
    fn ids_take_precedence_over_tags() {
        let selection = Selection::ids(["b"]).include_tag("json");
        let selected = resolve_selection(&registry(), &selection).unwrap();
        assert_eq!(ids(&selected), vec!["b"]);
    }

    #[test]
    fn unknown_ids_are_a_selection_error() {
        let err = resolve_selection(&registry(), &Selection::ids(["does_not_exist"])).unwrap_err();
        assert_eq!(
            err,
            SelectionError::Empty {
                requested: vec!["does_not_exist".to_owned()]
            }
        );
    }

    #[test]
    fn blank_ids_are_a_selection_error() {
        let err = resolve_selection(&registry(), &Selection::ids(["", " "])).unwrap_err();
        assert_eq!(err, SelectionError::Empty { requested: vec![] });

        let err = resolve_selection(&registry(), &Selection::ids([""]).include_tag("smoke"))
            .unwrap_err();
        assert!(matches!(err, SelectionError::Empty { .. }));
    }

    #[test]
    fn blank_entries_next_to_real_ids_are_ignored() {
        let selected = resolve_selection(&registry(), &Selection::ids(["", "c"])).unwrap();
        assert_eq!(ids(&selected), vec!["c"]);
    }

    #[test]
    fn include_tags_are_any_of() {
        let selection = Selection::all().include_tag("smoke").include_tag("json");
        let selected = resolve_selection(&registry(), &selection).unwrap();
        assert_eq!(ids(&selected), vec!["a", "c", "d"]);
    }

    #[test]
    fn exclude_tags_remove_matches() {
        let selection = Selection::all().include_tag("core").exclude_tag("json");
        let selected = resolve_selection(&registry(), &selection).unwrap();
        assert_eq!(ids(&selected), vec!["a"]);

        let selection = Selection::all().exclude_tag(FULL_DB_TAG);
        let selected = resolve_selection(&registry(), &selection).unwrap();
        assert_eq!(ids(&selected), vec!["a", "c", "d"]);
    }

    #[test]
    fn tag_filter_without_match_is_an_error() {
        let selection = Selection::all().include_tag("nope");
        let err = resolve_selection(&registry(), &selection).unwrap_err();
        assert!(matches!(err, SelectionError::NoTagMatch { ref include, .. } if include == &["nope"]));
    }

    #[test]
    fn empty_registry_is_an_error() {
        let err = resolve_selection(&ScenarioRegistry::default(), &Selection::all()).unwrap_err();
        assert!(matches!(err, SelectionError::Empty { .. }));
    }

    #[test]
    fn options_from_config() {
        let config = RunnerConfig {
            jobs: 4,
            scenario_timeout_secs: 0,
            include_full_db: true,
            fail_on_check_failure: true,
            reset_cache: false,
        };
        let options = RunOptions::from_config(&config);
        assert_eq!(options.jobs, 4);
        assert!(options.timeout.is_none());
        assert!(options.include_full_db);
        assert!(options.strict);
        assert!(!options.reset_cache);

        let defaults = RunOptions::default();
        assert_eq!(defaults.jobs, 1);
        assert_eq!(defaults.timeout, Some(Duration::from_secs(120)));
        assert!(!defaults.strict);
    }

    fn failed_check_result() -> RunResult {
        RunResult::success(
            "c",
            QueryKind::Complexes,
            1,
            Some(ValidationOutcome::from_checks(vec![CheckOutcome::new(
                "never", false, None,
            )])),
            Duration::ZERO,
        )
    }

    #[test]
    fn exit_code_ignores_skips_and_failed_checks_by_default() {
        let report = RunReport::new(
            Uuid::new_v4(),
            false,
            false,
            vec![
                RunResult::skipped("b", QueryKind::Annotations, "requires full database"),
                failed_check_result(),
            ],
        );
        assert!(report.has_failed_checks());
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn strict_mode_fails_on_failed_checks() {
        let report = RunReport::new(Uuid::new_v4(), false, true, vec![failed_check_result()]);
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn any_error_fails_the_batch() {
        let report = RunReport::new(
            Uuid::new_v4(),
            false,
            false,
            vec![
                RunResult::success("a", QueryKind::Interactions, 3, None, Duration::ZERO),
                RunResult::error("x", QueryKind::Enzsub, "boom", Duration::ZERO),
            ],
        );
        assert!(report.has_errors());
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.summary.errored, 1);
    }
}
