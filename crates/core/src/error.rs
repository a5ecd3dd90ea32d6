//! 에러 타입 -- 도메인별 에러 정의
//!
//! [`OmniprobeError`]는 최상위 에러이며, 하위 에러는 `#[from]`으로 변환됩니다.
//!
//! - [`QueryError`]: 쿼리 서비스 호출 실패. 시나리오 경계에서 항상 잡혀
//!   `error` 결과로 기록되며 배치 밖으로 전파되지 않습니다.
//! - [`SelectionError`]: 선택된 시나리오가 없음. 실행 전에 보고됩니다.
//! - [`ScenarioError`]: 시나리오 정의/로딩 실패 (중복 ID, 알 수 없는 쿼리 종류).
//! - [`ConfigError`]: 설정 파일 로딩/검증 실패.

/// omniprobe 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum OmniprobeError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 쿼리 서비스 에러
    #[error("query error: {0}")]
    Query(#[from] QueryError),

    /// 시나리오 정의 에러
    #[error("scenario error: {0}")]
    Scenario(#[from] ScenarioError),

    /// 시나리오 선택 에러
    #[error("selection error: {0}")]
    Selection(#[from] SelectionError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 쿼리 서비스 호출 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// 연결 실패, 요청 전송 실패 등
    #[error("transport failure: {0}")]
    Transport(String),

    /// 2xx가 아닌 HTTP 상태
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// 서비스가 인자를 거부함 (200 응답 본문에 경고 메시지)
    #[error("service rejected the query: {0}")]
    Rejected(String),

    /// 응답 본문 디코딩 실패
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// 시나리오 타임아웃
    #[error("query timed out after {limit:?}")]
    Timeout { limit: std::time::Duration },

    /// 요청을 구성할 수 없음 (잘못된 URL 등)
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// 시나리오 정의/로딩 에러
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// 레지스트리 내 중복 ID
    #[error("duplicate scenario id: {0}")]
    DuplicateId(String),

    /// 알 수 없는 쿼리 종류
    #[error("unknown query kind: {0}")]
    UnknownQueryKind(String),

    /// 시나리오 파일 로딩 실패
    #[error("failed to load scenarios from {path}: {reason}")]
    Load { path: String, reason: String },

    /// 유효하지 않은 시나리오 정의
    #[error("invalid scenario '{id}': {reason}")]
    Invalid { id: String, reason: String },
}

/// 시나리오 선택 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// 요청한 ID 중 등록된 것이 없음
    #[error("no registered scenario matches the requested ids: {}", .requested.join(", "))]
    Empty { requested: Vec<String> },

    /// 태그 필터를 통과한 시나리오가 없음
    #[error("no scenario left after tag filtering (include: [{}], exclude: [{}])", .include.join(", "), .exclude.join(", "))]
    NoTagMatch {
        include: Vec<String>,
        exclude: Vec<String>,
    },
}
