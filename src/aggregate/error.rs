use crate::upstream::UpstreamError;

/// Failure of a fetch-and-derive pass
///
/// Absence of data is never an error (accessors return `Ok(None)`); these
/// are upstream transport faults and records that do not have the expected
/// shape.
#[derive(Debug)]
pub enum AggregateError {
    Upstream(UpstreamError),
    Malformed { what: &'static str, source: serde_json::Error },
    MissingField(&'static str),
    Amount(String),
}

impl From<UpstreamError> for AggregateError {
    fn from(err: UpstreamError) -> Self {
        AggregateError::Upstream(err)
    }
}

impl std::fmt::Display for AggregateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregateError::Upstream(e) => write!(f, "Upstream error: {}", e),
            AggregateError::Malformed { what, source } => write!(f, "Malformed {}: {}", what, source),
            AggregateError::MissingField(field) => write!(f, "Missing field: {}", field),
            AggregateError::Amount(raw) => write!(f, "Invalid amount: {:?}", raw),
        }
    }
}

impl std::error::Error for AggregateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AggregateError::Upstream(e) => Some(e),
            AggregateError::Malformed { source, .. } => Some(source),
            AggregateError::MissingField(_) | AggregateError::Amount(_) => None,
        }
    }
}
