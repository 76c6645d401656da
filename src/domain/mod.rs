// ============================================================================
// Domain Models Module
// Contains all core domain entities and value objects
// ============================================================================

pub mod calculation_result;
pub mod rounding_policy;
pub mod version;

pub use calculation_result::{CalculatedValue, CalculationInputs, CalculationResult, RoundedValue};
pub use rounding_policy::{DisplayUnit, RoundingPolicyTable, RoundingRule};
pub use version::{CalculationVersion, CalculationVersionBuilder};
