// ============================================================================
// Calculation Engine Library
// Versioned, exact-decimal financial calculations for campaign planning
// ============================================================================

//! # Calculation Engine
//!
//! Computes campaign margins, unit costs, pacing indices and plan totals
//! with exact decimal arithmetic, under explicit calculation versions, and
//! rounds results per usage context as a separate step.
//!
//! ## Features
//!
//! - **Exact decimals**: no value ever passes through `f32`/`f64`
//! - **Versioned formulas**: every result records the version that produced
//!   it, and old versions stay registered so results can be reproduced
//! - **Context rounding**: one full-precision result, rounded separately for
//!   storage, display, or a platform/unit combination
//! - **Typed errors**: no silent defaults or partial results
//!
//! ## Example
//!
//! ```rust
//! use calculation_engine::prelude::*;
//! use calculation_engine::numeric::DecimalValue;
//!
//! let engine = create_default_engine().unwrap();
//!
//! let revenue: DecimalValue = "120".parse().unwrap();
//! let cost: DecimalValue = "100".parse().unwrap();
//! let margin = engine
//!     .calculate("marginPercentage", None, &[revenue, cost])
//!     .unwrap();
//!
//! // Same result, two contexts
//! let stored = engine.with_precision(&margin, "storage").unwrap();
//! let shown = engine.with_precision(&margin, "percentage").unwrap();
//! assert_eq!(stored.formatted_value, "0.166667");
//! assert_eq!(shown.formatted_value, "16.67");
//! ```

pub mod domain;
pub mod engine;
pub mod interfaces;
pub mod numeric;
pub mod utils;

pub use numeric::{CalcError, CalcResult, ErrorKind};

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        CalculatedValue, CalculationResult, CalculationVersion, DisplayUnit, RoundedValue,
        RoundingPolicyTable, RoundingRule,
    };
    pub use crate::engine::{
        create_default_engine, CalculationEngine, CalculationEngineBuilder,
        CalculationVersionRegistry,
    };
    pub use crate::interfaces::{
        Arity, Calculation, CalculationEvent, EventHandler, FormulaFn, LoggingEventHandler,
        NoOpEventHandler,
    };
    pub use crate::numeric::{CalcError, CalcResult, DecimalValue, ErrorKind, RoundingMode};
}
