// ============================================================================
// Calculation Errors
// Typed failures for decimal arithmetic, rounding, and version lookup
// ============================================================================

use thiserror::Error;

/// Errors surfaced by the calculation engine.
///
/// Every failure reaches the immediate caller unchanged; nothing in the
/// crate substitutes a default or a partially computed value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Input string is not a plain decimal literal
    #[error("invalid decimal literal: {literal:?}")]
    InvalidDecimalLiteral { literal: String },

    /// Denominator was zero
    #[error("division by zero in {operation}")]
    DivisionByZero { operation: String },

    /// Magnitude or scale exceeded the representable range
    #[error("precision overflow in {operation}")]
    PrecisionOverflow { operation: String },

    /// No rounding rule matches the context
    #[error("unknown rounding context: {context}")]
    UnknownRoundingContext { context: String },

    /// Calculation name not present in the resolved version
    #[error("unknown calculation {name:?} in version {version}")]
    UnknownCalculation { name: String, version: String },

    /// Version id was never registered
    #[error("unknown calculation version: {version_id}")]
    UnknownVersion { version_id: String },

    /// Version id is already registered
    #[error("calculation version already registered: {version_id}")]
    DuplicateVersion { version_id: String },

    /// Wrong number of inputs, or an input outside the calculation's domain
    #[error("invalid arguments for {calculation}: expected {expected}, got {got}")]
    InvalidArguments {
        calculation: String,
        expected: String,
        got: String,
    },

    /// A boolean result cannot be rounded
    #[error("result of {calculation} is not numeric and cannot be rounded")]
    NonNumericResult { calculation: String },
}

/// Discriminant of [`CalcError`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    InvalidDecimalLiteral,
    DivisionByZero,
    PrecisionOverflow,
    UnknownRoundingContext,
    UnknownCalculation,
    UnknownVersion,
    DuplicateVersion,
    InvalidArguments,
    NonNumericResult,
}

impl CalcError {
    pub(crate) fn invalid_literal(literal: impl Into<String>) -> Self {
        CalcError::InvalidDecimalLiteral {
            literal: literal.into(),
        }
    }

    pub(crate) fn division_by_zero(operation: impl Into<String>) -> Self {
        CalcError::DivisionByZero {
            operation: operation.into(),
        }
    }

    pub(crate) fn overflow(operation: impl Into<String>) -> Self {
        CalcError::PrecisionOverflow {
            operation: operation.into(),
        }
    }

    /// The variant of this error, for callers that branch on the taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CalcError::InvalidDecimalLiteral { .. } => ErrorKind::InvalidDecimalLiteral,
            CalcError::DivisionByZero { .. } => ErrorKind::DivisionByZero,
            CalcError::PrecisionOverflow { .. } => ErrorKind::PrecisionOverflow,
            CalcError::UnknownRoundingContext { .. } => ErrorKind::UnknownRoundingContext,
            CalcError::UnknownCalculation { .. } => ErrorKind::UnknownCalculation,
            CalcError::UnknownVersion { .. } => ErrorKind::UnknownVersion,
            CalcError::DuplicateVersion { .. } => ErrorKind::DuplicateVersion,
            CalcError::InvalidArguments { .. } => ErrorKind::InvalidArguments,
            CalcError::NonNumericResult { .. } => ErrorKind::NonNumericResult,
        }
    }
}

/// Result type alias for calculation operations
pub type CalcResult<T> = Result<T, CalcError>;
