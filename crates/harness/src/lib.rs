//! # omniprobe-harness
//!
//! 시나리오 기반 회귀 테스트 하네스입니다.
//!
//! ## 구성
//!
//! - [`scenario`]: 쿼리 종류, 인자, 검증기, 태그를 묶은 테스트 케이스
//! - [`validate`]: 선언적 기대값과 검사 함수
//! - [`normalize`]: 인자를 서비스 호출 형태로 정규화
//! - [`registry`] / [`catalog`]: 시나리오 레지스트리와 내장 카탈로그
//! - [`loader`]: TOML 시나리오 파일 로더
//! - [`dispatch`]: 시나리오 단위 실행과 에러 격리
//! - [`runner`]: 선택 정책, 배치 실행, 종료 코드
//! - [`summary`]: 결과 집계와 텍스트 요약
//!
//! ## 실행 흐름
//!
//! ```text
//! ScenarioRegistry --resolve_selection--> [Scenario] --BatchRunner--> Dispatcher --> QueryService
//!                                                                          |
//!                                                      RunReport <-- [RunResult]
//! ```

pub mod catalog;
pub mod dispatch;
pub mod loader;
pub mod normalize;
pub mod registry;
pub mod result;
pub mod runner;
pub mod scenario;
pub mod summary;
pub mod validate;

pub use dispatch::{Dispatcher, FULL_DB_SKIP_REASON};
pub use loader::ScenarioLoader;
pub use registry::ScenarioRegistry;
pub use result::{RunResult, RunStatus};
pub use runner::{BatchRunner, RunOptions, RunReport, Selection, resolve_selection};
pub use scenario::{FULL_DB_TAG, Scenario};
pub use summary::RunSummary;
pub use validate::{CheckOutcome, Expectation, ValidationOutcome, Validator};
