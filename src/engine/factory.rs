// ============================================================================
// Calculation Engine Factory
// Creates calculation engines with proper configuration
// ============================================================================

use crate::domain::{RoundingPolicyTable, RoundingRule};
use crate::engine::{CalculationEngine, CalculationVersionRegistry};
use crate::interfaces::{EventHandler, NoOpEventHandler};
use crate::numeric::RoundingMode;
use std::sync::Arc;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates an engine with the built-in versions, the standard rounding
/// table and no event handler.
///
/// # Example
/// ```
/// use calculation_engine::engine::factory::create_default_engine;
/// use calculation_engine::numeric::DecimalValue;
///
/// let engine = create_default_engine().unwrap();
/// let result = engine
///     .calculate("actualUnitCost", None, &[
///         "1000".parse::<DecimalValue>().unwrap(),
///         "50000".parse::<DecimalValue>().unwrap(),
///     ])
///     .unwrap();
/// assert_eq!(engine.with_precision(&result, "unit.cost").unwrap().formatted_value, "0.0200");
/// ```
pub fn create_default_engine() -> Result<CalculationEngine, String> {
    CalculationEngineBuilder::new().build()
}

// ============================================================================
// Builder Pattern for Advanced Configuration
// ============================================================================

/// Builder for creating calculation engines with fluent API
///
/// # Example
/// ```
/// use calculation_engine::prelude::*;
/// use calculation_engine::numeric::RoundingMode;
/// use std::sync::Arc;
///
/// let engine = CalculationEngineBuilder::new()
///     .with_default_rounding_mode(RoundingMode::HalfEven)
///     .with_event_handler(Arc::new(LoggingEventHandler))
///     .build()
///     .unwrap();
///
/// assert_eq!(engine.get_version(None).unwrap().version_id(), "1.1.0");
/// ```
pub struct CalculationEngineBuilder {
    registry: Option<Arc<CalculationVersionRegistry>>,
    rounding: RoundingPolicyTable,
    event_handler: Arc<dyn EventHandler>,
}

impl CalculationEngineBuilder {
    /// Create a new builder with the standard rounding table
    pub fn new() -> Self {
        Self {
            registry: None,
            rounding: RoundingPolicyTable::standard(),
            event_handler: Arc::new(NoOpEventHandler),
        }
    }

    // ========================================================================
    // Registry Configuration
    // ========================================================================

    /// Use an existing registry instead of the built-in versions
    pub fn with_registry(mut self, registry: Arc<CalculationVersionRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    // ========================================================================
    // Rounding Configuration
    // ========================================================================

    /// Replace the rounding table
    pub fn with_rounding_policy(mut self, rounding: RoundingPolicyTable) -> Self {
        self.rounding = rounding;
        self
    }

    /// Switch every configured rule to `mode`
    pub fn with_default_rounding_mode(mut self, mode: RoundingMode) -> Self {
        self.rounding = self.rounding.with_default_mode(mode);
        self
    }

    /// Add or replace a generic context rule
    pub fn with_rounding_rule(mut self, context: impl Into<String>, rule: RoundingRule) -> Self {
        self.rounding = self.rounding.with_rule(context, rule);
        self
    }

    /// Add or replace a `platform:unitType` override
    pub fn with_rounding_override(
        mut self,
        platform: &str,
        unit_type: &str,
        rule: RoundingRule,
    ) -> Self {
        self.rounding = self.rounding.with_override(platform, unit_type, rule);
        self
    }

    // ========================================================================
    // Additional Configuration
    // ========================================================================

    /// Set the event handler
    pub fn with_event_handler(mut self, event_handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = event_handler;
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Validate the configuration and build the engine
    pub fn build(self) -> Result<CalculationEngine, String> {
        self.rounding.validate()?;

        let registry = match self.registry {
            Some(registry) => registry,
            None => Arc::new(CalculationVersionRegistry::with_builtin_versions()?),
        };

        Ok(CalculationEngine::new(
            registry,
            Arc::new(self.rounding),
            self.event_handler,
        ))
    }

    /// Get the rounding table without building (for inspection)
    pub fn get_rounding_policy(&self) -> &RoundingPolicyTable {
        &self.rounding
    }
}

impl Default for CalculationEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CalculationVersion;
    use crate::engine::calculations::{version_1_0_0, VERSION_1_0_0};

    #[test]
    fn test_create_default_engine() {
        let engine = create_default_engine().unwrap();
        assert_eq!(engine.registry().len(), 2);
        assert!(engine.rounding_policy().resolve("storage").is_ok());
    }

    #[test]
    fn test_builder_with_registry() {
        let registry = Arc::new(CalculationVersionRegistry::new());
        registry.register(version_1_0_0().unwrap()).unwrap();

        let engine = CalculationEngineBuilder::new()
            .with_registry(Arc::clone(&registry))
            .build()
            .unwrap();

        assert_eq!(engine.get_version(None).unwrap().version_id(), VERSION_1_0_0);
    }

    #[test]
    fn test_isolated_engines() {
        let a = create_default_engine().unwrap();
        let b = create_default_engine().unwrap();

        a.set_current_version(VERSION_1_0_0).unwrap();
        assert_eq!(a.get_version(None).unwrap().version_id(), VERSION_1_0_0);
        assert_eq!(b.get_version(None).unwrap().version_id(), "1.1.0");
    }

    #[test]
    fn test_builder_rounding_configuration() {
        let builder = CalculationEngineBuilder::new()
            .with_default_rounding_mode(RoundingMode::Down)
            .with_rounding_rule("display.cpm", RoundingRule::new(2, RoundingMode::HalfUp))
            .with_rounding_override("linkedin", "clicks", RoundingRule::new(3, RoundingMode::Up));

        let table = builder.get_rounding_policy();
        assert_eq!(table.resolve("storage").unwrap().mode, RoundingMode::Down);
        assert_eq!(table.resolve("display.cpm").unwrap().mode, RoundingMode::HalfUp);
        assert_eq!(table.resolve("linkedin:clicks").unwrap().places, 3);

        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_builder_rejects_invalid_rounding() {
        let result = CalculationEngineBuilder::new()
            .with_rounding_rule("bad:key", RoundingRule::new(2, RoundingMode::HalfUp))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_with_empty_registry() {
        let engine = CalculationEngineBuilder::new()
            .with_registry(Arc::new(CalculationVersionRegistry::new()))
            .build()
            .unwrap();
        assert!(engine.get_version(None).is_err());

        let version: CalculationVersion = version_1_0_0().unwrap();
        engine.register_version(version).unwrap();
        assert!(engine.get_version(None).is_ok());
    }
}
