use thiserror::Error;

/// Input rejected before any integration runs.
#[derive(Debug, Error)]
pub enum BallisticsError {
    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("invalid {name} curve: {reason}")]
    InvalidCurve { name: &'static str, reason: String },

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("malformed input record: {0}")]
    Json(#[from] serde_json::Error),
}

impl BallisticsError {
    pub fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter { name, value, reason }
    }

    pub fn curve(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidCurve { name, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, BallisticsError>;

/// Ensure `value` is finite and strictly positive.
pub fn require_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(BallisticsError::invalid(name, value, "must be finite and > 0"))
    }
}

/// Ensure `value` is finite and not negative.
pub fn require_non_negative(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(BallisticsError::invalid(name, value, "must be finite and >= 0"))
    }
}
