//! Validation error types

use std::fmt;

/// Validation error for a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format (e.g., email)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Number outside its permitted range
    OutOfRange {
        field: &'static str,
        min: i64,
        max: Option<i64>,
    },

    /// Field was explicitly null but the column is not nullable
    Null { field: &'static str },

    /// Request could not be decoded at all (bad JSON, bad query string, bad path)
    Malformed { field: &'static str, reason: String },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field }
            | Self::TooLong { field, .. }
            | Self::InvalidFormat { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::Null { field }
            | Self::Malformed { field, .. } => field,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::OutOfRange {
                field,
                min,
                max: Some(max),
            } => write!(f, "{} must be between {} and {}", field, min, max),
            Self::OutOfRange {
                field,
                min,
                max: None,
            } => write!(f, "{} must be greater than or equal to {}", field, min),
            Self::Null { field } => write!(f, "{} may not be null", field),
            Self::Malformed { field, reason } => write!(f, "invalid {}: {}", field, reason),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Every violation found in one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, err: ValidationError) {
        self.0.push(err);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Names of the offending fields, in report order.
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(ValidationError::field).collect()
    }

    /// `Ok(value)` when nothing was pushed, otherwise the collected errors.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(err: ValidationError) -> Self {
        Self(vec![err])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "name",
            max: 255,
        };
        assert_eq!(
            err.to_string(),
            "name exceeds maximum length of 255 characters"
        );

        let err = ValidationError::OutOfRange {
            field: "page_size",
            min: 1,
            max: Some(100),
        };
        assert_eq!(err.to_string(), "page_size must be between 1 and 100");
    }

    #[test]
    fn collected_errors_join() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::Empty { field: "name" });
        errors.push(ValidationError::Empty { field: "message" });

        assert_eq!(errors.fields(), vec!["name", "message"]);
        assert_eq!(
            errors.to_string(),
            "name cannot be empty; message cannot be empty"
        );
        assert!(errors.into_result(()).is_err());
    }
}
