// ============================================================================
// Calculation Interface
// Defines the contract for versioned business formulas
// ============================================================================

use crate::domain::CalculatedValue;
use crate::numeric::{CalcError, CalcResult, DecimalValue};
use std::fmt;

/// Number of inputs a calculation accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    /// Inclusive range
    Between(usize, usize),
    /// Any number of inputs, including none
    Variadic,
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::Between(min, max) => (min..=max).contains(&count),
            Arity::Variadic => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(1) => write!(f, "1 input"),
            Arity::Exactly(n) => write!(f, "{} inputs", n),
            Arity::Between(min, max) => write!(f, "{} to {} inputs", min, max),
            Arity::Variadic => write!(f, "any number of inputs"),
        }
    }
}

/// Strategy interface for a single business formula.
/// Implementations must be pure: same inputs, same output, no shared state.
pub trait Calculation: Send + Sync {
    /// Name the formula is registered under (e.g. "marginPercentage")
    fn name(&self) -> &str;

    /// Human-readable formula for audit display
    fn formula(&self) -> &str;

    fn arity(&self) -> Arity;

    /// Evaluate at full precision. Inputs have already passed `check_arity`.
    fn evaluate(&self, args: &[DecimalValue]) -> CalcResult<CalculatedValue>;

    /// Reject input counts the formula does not accept.
    fn check_arity(&self, args: &[DecimalValue]) -> CalcResult<()> {
        if self.arity().accepts(args.len()) {
            Ok(())
        } else {
            Err(CalcError::InvalidArguments {
                calculation: self.name().to_string(),
                expected: self.arity().to_string(),
                got: args.len().to_string(),
            })
        }
    }
}

/// A calculation backed by a plain function pointer.
#[derive(Clone, Copy)]
pub struct FormulaFn {
    name: &'static str,
    formula: &'static str,
    arity: Arity,
    eval: fn(&[DecimalValue]) -> CalcResult<CalculatedValue>,
}

impl FormulaFn {
    pub const fn new(
        name: &'static str,
        formula: &'static str,
        arity: Arity,
        eval: fn(&[DecimalValue]) -> CalcResult<CalculatedValue>,
    ) -> Self {
        Self {
            name,
            formula,
            arity,
            eval,
        }
    }
}

impl Calculation for FormulaFn {
    fn name(&self) -> &str {
        self.name
    }

    fn formula(&self) -> &str {
        self.formula
    }

    fn arity(&self) -> Arity {
        self.arity
    }

    fn evaluate(&self, args: &[DecimalValue]) -> CalcResult<CalculatedValue> {
        (self.eval)(args)
    }
}

impl fmt::Debug for FormulaFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormulaFn")
            .field("name", &self.name)
            .field("formula", &self.formula)
            .field("arity", &self.arity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::ErrorKind;

    fn double(args: &[DecimalValue]) -> CalcResult<CalculatedValue> {
        Ok(args[0].checked_add(args[0])?.into())
    }

    #[test]
    fn test_arity_accepts() {
        assert!(Arity::Exactly(2).accepts(2));
        assert!(!Arity::Exactly(2).accepts(3));
        assert!(Arity::Between(2, 3).accepts(3));
        assert!(!Arity::Between(2, 3).accepts(1));
        assert!(Arity::Variadic.accepts(0));
    }

    #[test]
    fn test_formula_fn() {
        let calc = FormulaFn::new("double", "x + x", Arity::Exactly(1), double);
        assert_eq!(calc.name(), "double");
        assert_eq!(calc.formula(), "x + x");

        let out = calc.evaluate(&["2.5".parse().unwrap()]).unwrap();
        assert_eq!(out, CalculatedValue::Amount("5.0".parse().unwrap()));
    }

    #[test]
    fn test_check_arity() {
        let calc = FormulaFn::new("double", "x + x", Arity::Exactly(1), double);
        assert!(calc.check_arity(&[DecimalValue::ONE]).is_ok());

        let err = calc.check_arity(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArguments);
        assert_eq!(
            err.to_string(),
            "invalid arguments for double: expected 1 input, got 0"
        );
    }
}
