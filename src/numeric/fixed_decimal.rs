// ============================================================================
// Fixed-Point Decimal
// Fixed-precision storage representation for persisted amounts
// ============================================================================

use super::decimal_value::DecimalValue;
use super::errors::{CalcError, CalcResult};
use super::rounding_mode::RoundingMode;
use std::fmt;
use std::str::FromStr;

/// Fixed-point decimal with compile-time precision, used at the storage
/// boundary.
///
/// Internally stores `value × 10^DECIMALS` as an i64.
///
/// # Type Parameter
/// - `DECIMALS`: Number of decimal places (0-18). Default is 6, the
///   storage precision for calculated amounts. Larger values fail to
///   compile once the type is used.
///
/// # Value Range
/// With DECIMALS=6 (default):
/// - Minimum: -9,223,372,036,854.775808
/// - Maximum: +9,223,372,036,854.775807
///
/// # Example
/// ```
/// use calculation_engine::numeric::{DecimalValue, RoundingMode, StorageAmount};
///
/// let ratio: DecimalValue = "0.1666666666".parse().unwrap();
/// let stored = StorageAmount::from_value(ratio, RoundingMode::HalfUp).unwrap();
/// assert_eq!(stored.raw_value(), 166_667);
/// assert_eq!(stored.to_string(), "0.166667");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct FixedDecimal<const DECIMALS: u8 = 6>(i64);

/// Largest precision whose scale factor fits in an i64
pub const MAX_DECIMALS: u8 = 18;

/// Compute 10^n at compile time
const fn pow10(n: u8) -> i64 {
    let mut result: i64 = 1;
    let mut i = 0;
    while i < n {
        result *= 10;
        i += 1;
    }
    result
}

impl<const D: u8> FixedDecimal<D> {
    const VALID_DECIMALS: () = assert!(
        D <= MAX_DECIMALS,
        "FixedDecimal supports at most 18 decimals"
    );

    /// The scale factor (10^DECIMALS)
    pub const SCALE: i64 = {
        let () = Self::VALID_DECIMALS;
        pow10(D)
    };

    /// Zero value
    pub const ZERO: Self = Self(0);

    // ========================================================================
    // Construction
    // ========================================================================

    /// Create from the raw stored integer (already scaled).
    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        let () = Self::VALID_DECIMALS;
        Self(raw)
    }

    /// Round a full-precision value to `DECIMALS` places and store it.
    ///
    /// # Errors
    /// `PrecisionOverflow` if the scaled value does not fit in an i64.
    pub fn from_value(value: DecimalValue, mode: RoundingMode) -> CalcResult<Self> {
        let () = Self::VALID_DECIMALS;
        let rounded = value.round(D as u32, mode)?;
        let widen = pow10(D - rounded.scale() as u8) as i128;
        let raw = rounded
            .mantissa()
            .checked_mul(widen)
            .ok_or_else(|| CalcError::overflow("to_storage"))?;

        i64::try_from(raw)
            .map(Self)
            .map_err(|_| CalcError::overflow("to_storage"))
    }

    /// Store a value that already fits in `DECIMALS` places.
    ///
    /// # Errors
    /// `PrecisionOverflow` if the value carries more fractional digits than
    /// the storage precision or does not fit in an i64.
    pub fn from_exact(value: DecimalValue) -> CalcResult<Self> {
        let rounded = value.round(D as u32, RoundingMode::Down)?;
        if rounded != value {
            return Err(CalcError::overflow("to_storage"));
        }
        Self::from_value(rounded, RoundingMode::Down)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get the raw stored value (scaled).
    #[inline]
    pub const fn raw_value(self) -> i64 {
        self.0
    }

    /// Get the integer part (truncated toward zero).
    #[inline]
    pub const fn integer_part(self) -> i64 {
        self.0 / Self::SCALE
    }

    /// Get the fractional part as a positive value.
    #[inline]
    pub const fn fractional_part(self) -> u64 {
        (self.0 % Self::SCALE).unsigned_abs()
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Convert back to a full decimal. Exact.
    pub fn to_value(self) -> DecimalValue {
        let () = Self::VALID_DECIMALS;
        DecimalValue::from_storage(self.0, D as u32)
    }

    // ========================================================================
    // Arithmetic Operations
    // ========================================================================

    /// Checked addition of two stored amounts.
    #[inline]
    pub fn checked_add(self, rhs: Self) -> CalcResult<Self> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or_else(|| CalcError::overflow("storage add"))
    }

    /// Checked subtraction of two stored amounts.
    #[inline]
    pub fn checked_sub(self, rhs: Self) -> CalcResult<Self> {
        self.0
            .checked_sub(rhs.0)
            .map(Self)
            .ok_or_else(|| CalcError::overflow("storage sub"))
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl<const D: u8> fmt::Debug for FixedDecimal<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedDecimal<{}>({}, raw={})", D, self, self.0)
    }
}

impl<const D: u8> fmt::Display for FixedDecimal<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int_part = self.integer_part();
        let frac_part = self.fractional_part();

        if D == 0 {
            write!(f, "{}", int_part)
        } else if self.0 < 0 && int_part == 0 {
            // Handle -0.xxx case
            write!(f, "-0.{:0>width$}", frac_part, width = D as usize)
        } else {
            write!(f, "{}.{:0>width$}", int_part, frac_part, width = D as usize)
        }
    }
}

impl<const D: u8> FromStr for FixedDecimal<D> {
    type Err = CalcError;

    /// Parse a stored literal. More than `DECIMALS` fractional digits is an
    /// error rather than a silent rounding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_exact(s.parse()?)
    }
}

#[cfg(feature = "serde")]
impl<const D: u8> serde::Serialize for FixedDecimal<D> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de, const D: u8> serde::Deserialize<'de> for FixedDecimal<D> {
    fn deserialize<De>(deserializer: De) -> Result<Self, De::Error>
    where
        De: serde::Deserializer<'de>,
    {
        let literal = String::deserialize(deserializer)?;
        literal.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Type Aliases for Common Use Cases
// ============================================================================

/// Persisted amount with 6 decimal places
pub type StorageAmount = FixedDecimal<6>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::ErrorKind;

    fn d(s: &str) -> DecimalValue {
        s.parse().unwrap()
    }

    #[test]
    fn test_constants() {
        assert_eq!(StorageAmount::SCALE, 1_000_000);
        assert_eq!(StorageAmount::ZERO.raw_value(), 0);
    }

    #[test]
    fn test_from_value_rounds() {
        let x = StorageAmount::from_value(d("123.4567895"), RoundingMode::HalfUp).unwrap();
        assert_eq!(x.raw_value(), 123_456_790);
        assert_eq!(x.integer_part(), 123);
        assert_eq!(x.fractional_part(), 456_790);

        let y = StorageAmount::from_value(d("123.4567895"), RoundingMode::Down).unwrap();
        assert_eq!(y.raw_value(), 123_456_789);
    }

    #[test]
    fn test_from_value_widens_short_scale() {
        let x = StorageAmount::from_value(d("0.02"), RoundingMode::HalfUp).unwrap();
        assert_eq!(x.raw_value(), 20_000);
        assert_eq!(x.to_string(), "0.020000");
    }

    #[test]
    fn test_from_exact_rejects_extra_digits() {
        let err = StorageAmount::from_exact(d("1.0000001")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PrecisionOverflow);
        assert!(StorageAmount::from_exact(d("1.000001")).is_ok());
    }

    #[test]
    fn test_storage_overflow() {
        let err = StorageAmount::from_value(d("10000000000000"), RoundingMode::HalfUp).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PrecisionOverflow);
    }

    #[test]
    fn test_round_trip_value() {
        let x = StorageAmount::from_value(d("-5.5"), RoundingMode::HalfUp).unwrap();
        assert!(x.is_negative());
        assert_eq!(x.to_value(), d("-5.5"));
        assert_eq!(x.to_value().scale(), 6);
    }

    #[test]
    fn test_display() {
        assert_eq!(StorageAmount::from_raw(123_456_000).to_string(), "123.456000");
        assert_eq!(StorageAmount::from_raw(-100_000).to_string(), "-0.100000");
        assert_eq!(FixedDecimal::<0>::from_raw(42).to_string(), "42");
    }

    #[test]
    fn test_from_str() {
        let x: StorageAmount = "42.5".parse().unwrap();
        assert_eq!(x.raw_value(), 42_500_000);

        let result: Result<StorageAmount, _> = "1.1234567".parse();
        assert_eq!(result.unwrap_err().kind(), ErrorKind::PrecisionOverflow);

        let result: Result<StorageAmount, _> = "not_a_number".parse();
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidDecimalLiteral);
    }

    #[test]
    fn test_checked_sums() {
        let a = StorageAmount::from_raw(1_500_000);
        let b = StorageAmount::from_raw(500_000);
        assert_eq!(a.checked_add(b).unwrap().raw_value(), 2_000_000);
        assert_eq!(b.checked_sub(a).unwrap().raw_value(), -1_000_000);
        assert!(StorageAmount::from_raw(i64::MAX).checked_add(b).is_err());
    }

    #[test]
    fn test_different_decimal_places() {
        type FD4 = FixedDecimal<4>;
        assert_eq!(FD4::SCALE, 10_000);
        let x = FD4::from_value(d("0.02"), RoundingMode::HalfUp).unwrap();
        assert_eq!(x.to_string(), "0.0200");
    }

    #[test]
    fn test_widest_precision() {
        type FD18 = FixedDecimal<MAX_DECIMALS>;
        assert_eq!(FD18::SCALE, 1_000_000_000_000_000_000);

        let x = FD18::from_value(d("1.5"), RoundingMode::HalfUp).unwrap();
        assert_eq!(x.raw_value(), 1_500_000_000_000_000_000);
        assert_eq!(x.to_value(), d("1.5"));
        assert_eq!(x.to_string(), "1.500000000000000000");

        // 10 integer digits at 18 places no longer fit in an i64
        let err = FD18::from_value(d("10"), RoundingMode::HalfUp).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PrecisionOverflow);
    }
}
