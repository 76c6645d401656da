// ============================================================================
// Calculation Result Domain Model
// ============================================================================

use crate::numeric::{CalcError, CalcResult, DecimalValue};
use chrono::{DateTime, Utc};
use smallvec::SmallVec;
use std::fmt;
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Inputs recorded on a result; most calculations take four or fewer.
pub type CalculationInputs = SmallVec<[DecimalValue; 4]>;

/// Output of a calculation: an amount or ratio, or the outcome of a
/// tolerance comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum CalculatedValue {
    Amount(DecimalValue),
    Flag(bool),
}

impl CalculatedValue {
    /// The numeric value, if this is one.
    pub fn as_decimal(&self) -> Option<DecimalValue> {
        match self {
            CalculatedValue::Amount(value) => Some(*value),
            CalculatedValue::Flag(_) => None,
        }
    }

    /// The comparison outcome, if this is one.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            CalculatedValue::Amount(_) => None,
            CalculatedValue::Flag(flag) => Some(*flag),
        }
    }
}

impl From<DecimalValue> for CalculatedValue {
    fn from(value: DecimalValue) -> Self {
        CalculatedValue::Amount(value)
    }
}

impl From<bool> for CalculatedValue {
    fn from(flag: bool) -> Self {
        CalculatedValue::Flag(flag)
    }
}

impl fmt::Display for CalculatedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculatedValue::Amount(value) => write!(f, "{}", value),
            CalculatedValue::Flag(flag) => write!(f, "{}", flag),
        }
    }
}

/// Full-precision outcome of one calculation, with what is needed to
/// reproduce it: name, version, inputs and formula.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CalculationResult {
    /// Unique result identifier
    pub id: Uuid,

    /// Unrounded value
    pub value: CalculatedValue,

    pub calculation_name: String,

    /// Version id the formula was taken from
    pub calculation_version: String,

    pub calculated_at: DateTime<Utc>,

    /// Human-readable formula, for audit display
    pub formula: String,

    /// Caller-supplied label (e.g. "campaign.update")
    pub context: Option<String>,

    pub inputs: CalculationInputs,
}

impl CalculationResult {
    pub fn new(
        value: CalculatedValue,
        calculation_name: String,
        calculation_version: String,
        formula: String,
        inputs: CalculationInputs,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            value,
            calculation_name,
            calculation_version,
            calculated_at: Utc::now(),
            formula,
            context: None,
            inputs,
        }
    }

    /// Builder method: attach a caller context label
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// The numeric value.
    ///
    /// # Errors
    /// `NonNumericResult` for comparison results.
    pub fn amount(&self) -> CalcResult<DecimalValue> {
        self.value
            .as_decimal()
            .ok_or_else(|| CalcError::NonNumericResult {
                calculation: self.calculation_name.clone(),
            })
    }
}

/// A result rounded for one context. Derived, never stored on its own.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RoundedValue {
    pub formatted_value: String,

    /// Fractional digits in `formatted_value`
    pub precision: u32,

    pub source_result: CalculationResult,

    pub context: String,
}

impl fmt::Display for RoundedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted_value)
    }
}
