//! Error types for the risk model layer
//!
//! The model itself never fails: degenerate inputs collapse to a zero risk so an
//! interactive caller can keep evaluating while values are half-entered. The
//! `try_*` entry points surface the same situations as [`ModelError`] so an API
//! layer can tell an undefined result apart from a genuine 0%.

/// Errors that can occur when evaluating or configuring the models
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A denominator of the closed-form equations is exactly zero
    ZeroDivision {
        /// Name of the vanishing quantity (e.g. `"ventilation_rate"`)
        quantity: &'static str,
    },
    /// A sampling range cannot be built from the given bounds
    InvalidTimeRange {
        /// Human-readable description of the problem
        reason: String,
    },
    /// A preset lookup by name did not match any table entry
    UnknownPreset {
        /// Table that was searched (e.g. `"mask"`)
        table: &'static str,
        /// Name that failed to match
        name: String,
    },
}

impl ModelError {
    pub(crate) fn unknown_preset(table: &'static str, name: &str) -> Self {
        ModelError::UnknownPreset {
            table,
            name: name.to_string(),
        }
    }
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::ZeroDivision { quantity } => {
                write!(f, "Degenerate parameters: {quantity} must be non-zero")
            }
            ModelError::InvalidTimeRange { reason } => write!(f, "Invalid time range: {reason}"),
            ModelError::UnknownPreset { table, name } => {
                write!(f, "Unknown {table} preset: '{name}'")
            }
        }
    }
}

impl std::error::Error for ModelError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = ModelError::ZeroDivision {
            quantity: "ventilation_rate",
        };
        assert_eq!(
            err.to_string(),
            "Degenerate parameters: ventilation_rate must be non-zero"
        );

        let err = ModelError::unknown_preset("mask", "N99");
        assert_eq!(err.to_string(), "Unknown mask preset: 'N99'");
    }
}
