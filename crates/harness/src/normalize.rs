//! 인자 정규화 -- 선언된 인자를 서비스 호출 형태로 변환
//!
//! 규칙은 세 가지뿐입니다.
//! - 값 없음(`Absent`), 빈 문자열, 공백 문자열: 제거
//! - 쉼표를 포함한 문자열: 잘라서 다중 값 목록으로 변환 (각 조각은 trim, 빈 조각 제거)
//! - 그 외: 그대로 유지
//!
//! 순수 함수이며 멱등입니다. 정규화된 인자를 다시 정규화해도 같은 결과가 나옵니다.

use omniprobe_core::types::{ArgValue, Arguments};

/// 다중 값 구분자
pub const LIST_DELIMITER: char = ',';

/// 인자 맵 전체를 정규화합니다.
pub fn normalize(arguments: &Arguments) -> Arguments {
    arguments
        .iter()
        .filter_map(|(name, value)| normalize_value(value).map(|v| (name.clone(), v)))
        .collect()
}

/// 단일 값을 정규화합니다. 제거 대상이면 `None`을 반환합니다.
pub fn normalize_value(value: &ArgValue) -> Option<ArgValue> {
    match value {
        ArgValue::Absent => None,
        ArgValue::Text(text) if text.trim().is_empty() => None,
        ArgValue::Text(text) if text.contains(LIST_DELIMITER) => {
            let items: Vec<ArgValue> = text
                .split(LIST_DELIMITER)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| ArgValue::Text(item.to_owned()))
                .collect();
            (!items.is_empty()).then_some(ArgValue::List(items))
        }
        other => Some(other.clone()),
    }
}
