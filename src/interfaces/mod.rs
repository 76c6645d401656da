// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod calculation;
mod event_handler;

pub use calculation::{Arity, Calculation, FormulaFn};
pub use event_handler::{CalculationEvent, EventHandler, LoggingEventHandler, NoOpEventHandler};
