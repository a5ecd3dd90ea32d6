//! 쿼리 서비스 trait -- 하네스와 서비스 구현 사이의 경계
//!
//! 하네스는 [`QueryService`]만 알고 있으며, 실제 HTTP 클라이언트나
//! 테스트용 모의 서비스가 이 trait을 구현합니다.

use std::future::Future;
use std::sync::Arc;

use crate::error::QueryError;
use crate::types::{Arguments, QueryKind, QueryOutput};

/// 외부 쿼리 서비스 추상화
///
/// # 에러 처리
///
/// 구현체는 전송 실패, HTTP 상태 오류, 서비스의 인자 거부를 모두
/// [`QueryError`]로 반환해야 합니다. 호출자는 시나리오 단위로 에러를 격리합니다.
pub trait QueryService: Send + Sync + 'static {
    /// 쿼리 종류와 정규화된 인자로 서비스를 호출합니다.
    ///
    /// `arguments`에는 값이 없는 인자가 포함되지 않습니다.
    fn invoke(
        &self,
        kind: QueryKind,
        arguments: &Arguments,
    ) -> impl Future<Output = Result<QueryOutput, QueryError>> + Send;

    /// 서비스 측 캐시를 비웁니다.
    ///
    /// 배치 시작 전에 호출됩니다. 캐시가 없는 구현체는 기본 구현을 사용합니다.
    fn reset_cache(&self) -> impl Future<Output = Result<(), QueryError>> + Send {
        async { Ok(()) }
    }
}

impl<T: QueryService> QueryService for Arc<T> {
    fn invoke(
        &self,
        kind: QueryKind,
        arguments: &Arguments,
    ) -> impl Future<Output = Result<QueryOutput, QueryError>> + Send {
        (**self).invoke(kind, arguments)
    }

    fn reset_cache(&self) -> impl Future<Output = Result<(), QueryError>> + Send {
        (**self).reset_cache()
    }
}
