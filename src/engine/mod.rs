// ============================================================================
// Engine Module
// Contains the calculation formulas, version registry and engine facade
// ============================================================================

mod calculation_engine;
mod registry;

pub mod calculations;
pub mod factory;

pub use calculation_engine::CalculationEngine;
pub use factory::{create_default_engine, CalculationEngineBuilder};
pub use registry::CalculationVersionRegistry;
