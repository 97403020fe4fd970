//! The parameter rules every resource endpoint enforces before delegating.

use voltlink_types::{DateRangeFilter, Envelope, Pagination};

/// Maximum length of top-level and device-level resource identifiers.
pub const MAX_IDENTIFIER_LEN: usize = 39;

/// Maximum length of further-nested leaf identifiers (e.g. a connector
/// under a device).
pub const MAX_LEAF_IDENTIFIER_LEN: usize = 36;

/// A structurally invalid request parameter. Detected locally, never
/// delegated, never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("offset must be >= 0, got {0}")]
    NegativeOffset(i64),

    #[error("limit must be >= 0, got {0}")]
    NegativeLimit(i64),

    #[error("date_from must not be after date_to")]
    InvertedDateRange,

    #[error("identifier '{value}' exceeds {max} characters")]
    IdentifierTooLong { value: String, max: usize },
}

impl ParamError {
    /// Renders this violation as the uniform failure envelope.
    pub fn into_envelope<T>(self) -> Envelope<T> {
        Envelope::invalid_parameters(self.to_string())
    }
}

/// `offset >= 0`; `limit`, when present, `>= 0`. A limit of zero is a
/// valid "report totals, return nothing" request.
pub fn validate_pagination(pagination: Pagination) -> Result<(), ParamError> {
    if pagination.offset < 0 {
        return Err(ParamError::NegativeOffset(pagination.offset));
    }
    if let Some(limit) = pagination.limit {
        if limit < 0 {
            return Err(ParamError::NegativeLimit(limit));
        }
    }
    Ok(())
}

/// When both bounds are present, `date_from <= date_to`. Either bound
/// alone, or neither, is open-ended filtering and always valid.
pub fn validate_date_range(filter: &DateRangeFilter) -> Result<(), ParamError> {
    if let (Some(from), Some(to)) = (filter.date_from, filter.date_to) {
        if from > to {
            return Err(ParamError::InvertedDateRange);
        }
    }
    Ok(())
}

/// Top-level / device-level identifier: at most 39 characters.
pub fn validate_identifier(value: &str) -> Result<(), ParamError> {
    validate_max_len(value, MAX_IDENTIFIER_LEN)
}

/// Nested leaf identifier: at most 36 characters.
pub fn validate_leaf_identifier(value: &str) -> Result<(), ParamError> {
    validate_max_len(value, MAX_LEAF_IDENTIFIER_LEN)
}

fn validate_max_len(value: &str, max: usize) -> Result<(), ParamError> {
    if value.chars().count() > max {
        return Err(ParamError::IdentifierTooLong {
            value: value.to_owned(),
            max,
        });
    }
    Ok(())
}
