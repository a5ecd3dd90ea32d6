//! omniprobe 공통 크레이트
//!
//! 쿼리 종류와 인자 타입, 서비스 trait, 에러, 설정, 메트릭 이름을 정의합니다.
//! 클라이언트와 하네스 크레이트는 모두 이 크레이트에만 의존합니다.

pub mod config;
pub mod error;
pub mod metrics;
pub mod service;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, OmniprobeError, QueryError, ScenarioError, SelectionError};

// 설정
pub use config::ProbeConfig;

// 서비스 trait
pub use service::QueryService;

// 도메인 타입
pub use types::{ArgValue, Arguments, QueryKind, QueryOutput, Table};
