// ============================================================================
// Numeric Module
// Exact decimal arithmetic for monetary and ratio calculations
// ============================================================================
//
// This module provides:
// - DecimalValue: immutable decimal used for every calculation input/output
// - FixedDecimal<D>: fixed-point storage representation (StorageAmount = 6 places)
// - RoundingMode: HALF_UP, HALF_EVEN, DOWN, UP
// - CalcError: the crate-wide error taxonomy
//
// Design principles:
// - No floating-point operations
// - All arithmetic returns Result (no panics)
// - Rounding happens only when a caller asks for it

mod decimal_value;
mod errors;
mod fixed_decimal;
mod rounding_mode;

pub use decimal_value::{DecimalValue, MAX_SCALE, MIN_FRACTIONAL_DIGITS};
pub use errors::{CalcError, CalcResult, ErrorKind};
pub use fixed_decimal::{FixedDecimal, StorageAmount, MAX_DECIMALS};
pub use rounding_mode::RoundingMode;
