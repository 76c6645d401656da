// ============================================================================
// Decimal Value
// Exact base-10 arithmetic for monetary amounts and ratios
// ============================================================================

use super::errors::{CalcError, CalcResult};
use super::rounding_mode::RoundingMode;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Immutable decimal number used for every monetary and ratio value.
///
/// Backed by a 96-bit base-10 mantissa (28 significant digits). Magnitudes
/// are kept strictly below 10^22 so that at least six fractional digits
/// always fit; any operation producing a larger value fails with
/// `PrecisionOverflow`. Values never pass through `f32`/`f64`.
///
/// # Example
/// ```
/// use calculation_engine::numeric::DecimalValue;
///
/// let revenue: DecimalValue = "120".parse().unwrap();
/// let cost = DecimalValue::from_parts(100, 0).unwrap();
/// let margin = revenue.checked_sub(cost).unwrap();
/// assert_eq!(margin.to_api_string(), "20");
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct DecimalValue(Decimal);

/// Exclusive upper bound on magnitude: 10^22.
const MAX_MAGNITUDE: Decimal = Decimal::from_parts(2_990_538_752, 434_162_106, 542, false, 0);

/// Largest scale the mantissa supports.
pub const MAX_SCALE: u32 = 28;

/// Fractional digits guaranteed to survive every operation.
pub const MIN_FRACTIONAL_DIGITS: u32 = 6;

impl DecimalValue {
    pub const ZERO: Self = Self(Decimal::ZERO);
    pub const ONE: Self = Self(Decimal::ONE);
    pub const ONE_HUNDRED: Self = Self(Decimal::ONE_HUNDRED);
    pub const ONE_THOUSAND: Self = Self(Decimal::ONE_THOUSAND);
    /// 0.01
    pub const ONE_CENT: Self = Self(Decimal::from_parts(1, 0, 0, false, 2));

    // ========================================================================
    // Construction
    // ========================================================================

    /// Create from an unscaled integer and a scale: `(12345, 2)` is `123.45`.
    ///
    /// # Errors
    /// `PrecisionOverflow` if the scale exceeds 28, the mantissa does not fit
    /// in 96 bits, or the magnitude reaches 10^22.
    pub fn from_parts(unscaled: i128, scale: u32) -> CalcResult<Self> {
        if scale > MAX_SCALE {
            return Err(CalcError::overflow("from_parts"));
        }
        let inner = Decimal::try_from_i128_with_scale(unscaled, scale)
            .map_err(|_| CalcError::overflow("from_parts"))?;
        Self::bounded(inner, "from_parts")
    }

    /// Create from a whole number.
    pub fn from_integer(value: i64) -> CalcResult<Self> {
        Self::bounded(Decimal::from(value), "from_integer")
    }

    /// Parse a plain decimal literal: optional sign, digits, optional
    /// fraction. Exponents, separators and empty digit runs are rejected.
    ///
    /// # Errors
    /// - `InvalidDecimalLiteral` for anything outside that grammar
    /// - `PrecisionOverflow` for well-formed literals that do not fit
    pub fn parse_literal(literal: &str) -> CalcResult<Self> {
        let trimmed = literal.trim();
        if !is_plain_literal(trimmed) {
            return Err(CalcError::invalid_literal(literal));
        }

        let inner =
            Decimal::from_str_exact(trimmed).map_err(|_| CalcError::overflow("parse_literal"))?;
        Self::bounded(inner, "parse_literal")
    }

    /// Wrap an existing `rust_decimal::Decimal`, enforcing the magnitude bound.
    pub fn from_decimal(inner: Decimal) -> CalcResult<Self> {
        Self::bounded(inner, "from_decimal")
    }

    /// Rebuild a stored fixed-point amount. An i64 mantissa is always below
    /// 10^22, so no bound check is needed.
    pub(super) fn from_storage(raw: i64, scale: u32) -> Self {
        Self(Decimal::new(raw, scale))
    }

    fn bounded(inner: Decimal, operation: &str) -> CalcResult<Self> {
        if inner.abs() >= MAX_MAGNITUDE {
            Err(CalcError::overflow(operation))
        } else {
            Ok(Self(inner))
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The underlying decimal.
    #[inline]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Number of digits after the decimal point.
    #[inline]
    pub fn scale(&self) -> u32 {
        self.0.scale()
    }

    /// Unscaled mantissa: `123.45` is `12345`.
    #[inline]
    pub fn mantissa(&self) -> i128 {
        self.0.mantissa()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        !self.0.is_zero() && self.0.is_sign_negative()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        !self.0.is_zero() && self.0.is_sign_positive()
    }

    // ========================================================================
    // Arithmetic Operations
    // ========================================================================

    /// Checked addition.
    pub fn checked_add(self, rhs: Self) -> CalcResult<Self> {
        let sum = self
            .0
            .checked_add(rhs.0)
            .ok_or_else(|| CalcError::overflow("add"))?;
        Self::bounded(sum, "add")
    }

    /// Checked subtraction.
    pub fn checked_sub(self, rhs: Self) -> CalcResult<Self> {
        let difference = self
            .0
            .checked_sub(rhs.0)
            .ok_or_else(|| CalcError::overflow("sub"))?;
        Self::bounded(difference, "sub")
    }

    /// Checked multiplication.
    ///
    /// Products needing more than 28 significant digits lose digits at the
    /// far end of the fraction only; the magnitude bound keeps at least six.
    pub fn checked_mul(self, rhs: Self) -> CalcResult<Self> {
        let product = self
            .0
            .checked_mul(rhs.0)
            .ok_or_else(|| CalcError::overflow("mul"))?;
        Self::bounded(product, "mul")
    }

    /// Checked division.
    ///
    /// # Errors
    /// `DivisionByZero` when `rhs` is zero, `PrecisionOverflow` when the
    /// quotient is out of range.
    pub fn checked_div(self, rhs: Self) -> CalcResult<Self> {
        if rhs.is_zero() {
            return Err(CalcError::division_by_zero("div"));
        }
        let quotient = self
            .0
            .checked_div(rhs.0)
            .ok_or_else(|| CalcError::overflow("div"))?;
        Self::bounded(quotient, "div")
    }

    /// Absolute value. Never fails: the bound is symmetric.
    #[inline]
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Negation. Never fails for the same reason; zero stays positive.
    #[inline]
    pub fn neg(self) -> Self {
        if self.0.is_zero() {
            self
        } else {
            Self(-self.0)
        }
    }

    /// Sum a sequence without intermediate rounding.
    pub fn sum<'a, I>(values: I) -> CalcResult<Self>
    where
        I: IntoIterator<Item = &'a DecimalValue>,
    {
        values
            .into_iter()
            .try_fold(Self::ZERO, |total, value| total.checked_add(*value))
    }

    // ========================================================================
    // Rounding and Rendering
    // ========================================================================

    /// Round to `places` fractional digits with `mode`.
    ///
    /// The result carries at most `places` of scale; values that already fit
    /// are returned unchanged.
    pub fn round(self, places: u32, mode: RoundingMode) -> CalcResult<Self> {
        if places > MAX_SCALE {
            return Err(CalcError::overflow("round"));
        }

        let mut rounded = self.0.round_dp_with_strategy(places, mode.strategy());
        if rounded.is_zero() {
            rounded.set_sign_positive(true);
        }
        // Rounding away from zero can carry a value just under the bound onto it.
        Self::bounded(rounded, "round")
    }

    /// Render with exactly `places` fractional digits, no exponent.
    ///
    /// Only pads: callers round first.
    pub(crate) fn to_fixed_string(self, places: u32) -> String {
        let mut rendered = self.to_api_string();
        let current = self.0.scale();
        if places > current {
            if current == 0 {
                rendered.push('.');
            }
            rendered.extend(std::iter::repeat('0').take((places - current) as usize));
        }
        rendered
    }

    /// Plain decimal string for API boundaries: keeps the value's scale,
    /// never uses scientific notation, never prints `-0`.
    pub fn to_api_string(&self) -> String {
        let mut inner = self.0;
        if inner.is_zero() {
            inner.set_sign_positive(true);
        }
        inner.to_string()
    }

    /// Compare ignoring scale: `1.0` and `1.00` are equal.
    #[inline]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

/// Accepts `[+-]?digits[.digits]`, `[+-]?digits.` and `[+-]?.digits`.
fn is_plain_literal(s: &str) -> bool {
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (unsigned, ""),
    };

    let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    (!int_part.is_empty() || !frac_part.is_empty()) && digits(int_part) && digits(frac_part)
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl FromStr for DecimalValue {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_literal(s)
    }
}

impl TryFrom<Decimal> for DecimalValue {
    type Error = CalcError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl From<DecimalValue> for Decimal {
    fn from(value: DecimalValue) -> Self {
        value.0
    }
}

impl fmt::Debug for DecimalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DecimalValue({})", self.to_api_string())
    }
}

impl fmt::Display for DecimalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_api_string())
    }
}

// Serialized as a string so JSON consumers never see a binary float.
#[cfg(feature = "serde")]
impl serde::Serialize for DecimalValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_api_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for DecimalValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let literal = String::deserialize(deserializer)?;
        Self::parse_literal(&literal).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================
