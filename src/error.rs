use thiserror::Error;

/// Main error type for the planning system
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Validation error on {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Itinerary not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    /// Build a validation error for a specific input field
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PlannerError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            PlannerError::Validation { .. } => "VALIDATION_ERROR",
            PlannerError::NotFound(_) => "NOT_FOUND",
            PlannerError::Serialization(_) => "SERIALIZATION_ERROR",
            PlannerError::Config(_) => "CONFIG_ERROR",
            PlannerError::Unknown(_) => "UNKNOWN_ERROR",
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        let details = match self {
            PlannerError::Validation { field, reason } => serde_json::json!({
                "field": field,
                "reason": reason,
            }),
            _ => serde_json::Value::Null,
        };

        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "details": details,
            }
        })
    }
}
