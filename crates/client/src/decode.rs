//! Response body decoding.
//!
//! The service answers either JSON (`format=json`) or tab separated text.
//! When a query's arguments are invalid it still answers `200 OK`, with a
//! plain-text complaint in the body; that case is detected here.

use omniprobe_core::error::QueryError;
use omniprobe_core::types::{QueryOutput, Table};
use serde_json::Value;

/// Prefix the service uses when it refuses a query's arguments.
pub const REJECTION_PREFIX: &str = "Something is not entirely good";

/// Body flavour derived from the response `Content-Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Tsv,
    Unknown,
}

impl BodyKind {
    /// Classifies a `Content-Type` header value.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        match content_type.map(str::to_ascii_lowercase) {
            Some(ct) if ct.contains("json") => Self::Json,
            Some(ct) if ct.contains("tab-separated") || ct.contains("tsv") => Self::Tsv,
            _ => Self::Unknown,
        }
    }
}

/// Decodes a successful response body.
///
/// `has_header` controls whether the first TSV line is read as column names.
pub fn decode_body(
    kind: BodyKind,
    body: &str,
    has_header: bool,
) -> Result<QueryOutput, QueryError> {
    let trimmed = body.trim_start();
    if trimmed.starts_with(REJECTION_PREFIX) {
        return Err(QueryError::Rejected(rejection_message(trimmed)));
    }

    let looks_like_json = trimmed.starts_with('[') || trimmed.starts_with('{');
    match kind {
        BodyKind::Json => decode_json(body),
        BodyKind::Tsv => decode_tsv(body, has_header),
        BodyKind::Unknown if looks_like_json => decode_json(body),
        BodyKind::Unknown if body.contains('\t') => decode_tsv(body, has_header),
        BodyKind::Unknown => Ok(QueryOutput::Text(body.to_owned())),
    }
}

fn rejection_message(body: &str) -> String {
    // fixed phrase first, the service's reason after it
    let detail = body
        .strip_prefix(REJECTION_PREFIX)
        .unwrap_or(body)
        .trim_start_matches(':')
        .trim();
    if detail.is_empty() {
        REJECTION_PREFIX.to_owned()
    } else {
        detail
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Decodes a JSON body. Arrays become records, everything else a document.
pub fn decode_json(body: &str) -> Result<QueryOutput, QueryError> {
    if body.trim().is_empty() {
        return Ok(QueryOutput::Records(Vec::new()));
    }
    let value: Value =
        serde_json::from_str(body).map_err(|e| QueryError::Decode(format!("invalid JSON: {e}")))?;
    Ok(match value {
        Value::Array(items) => QueryOutput::Records(items),
        other => QueryOutput::Document(other),
    })
}

/// Decodes a tab separated body into a [`Table`].
pub fn decode_tsv(body: &str, has_header: bool) -> Result<QueryOutput, QueryError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_header)
        .flexible(true)
        .quoting(false)
        .from_reader(body.as_bytes());

    let columns = if has_header {
        reader
            .headers()
            .map_err(|e| QueryError::Decode(format!("invalid TSV header: {e}")))?
            .iter()
            .map(str::to_owned)
            .collect()
    } else {
        Vec::new()
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| QueryError::Decode(format!("invalid TSV row: {e}")))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record.iter().map(str::to_owned).collect());
    }

    Ok(QueryOutput::Table(Table { columns, rows }))
}
