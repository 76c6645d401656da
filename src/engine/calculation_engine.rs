// ============================================================================
// Calculation Engine
// Single entry point: versioned calculation, then context rounding
// ============================================================================

use crate::domain::rounding_policy::STORAGE;
use crate::domain::{
    CalculationInputs, CalculationResult, CalculationVersion, RoundedValue, RoundingPolicyTable,
    RoundingRule,
};
use crate::engine::CalculationVersionRegistry;
use crate::interfaces::{CalculationEvent, EventHandler};
use crate::numeric::{CalcError, CalcResult, DecimalValue, StorageAmount};
use chrono::Utc;
use std::sync::Arc;

/// Facade over the version registry and the rounding policy.
///
/// Calculating and rounding are separate calls: one full-precision
/// [`CalculationResult`] can be rounded for storage, for a UI label and for
/// a platform/unit combination without recomputing, and without rounding
/// an already-rounded number.
///
/// The engine holds no mutable state of its own; clone the `Arc`s and share
/// it across threads freely.
pub struct CalculationEngine {
    /// Versions of the formulas
    registry: Arc<CalculationVersionRegistry>,

    /// Context -> rounding rule
    rounding: Arc<RoundingPolicyTable>,

    /// Audit hook for results, failures and registry changes
    event_handler: Arc<dyn EventHandler>,
}

impl CalculationEngine {
    /// Create a new calculation engine.
    ///
    /// The rounding table is trusted as given: callers pass a table that has
    /// passed [`RoundingPolicyTable::validate`], as
    /// [`CalculationEngineBuilder::build`](crate::engine::CalculationEngineBuilder::build)
    /// does. Debug builds assert it.
    pub fn new(
        registry: Arc<CalculationVersionRegistry>,
        rounding: Arc<RoundingPolicyTable>,
        event_handler: Arc<dyn EventHandler>,
    ) -> Self {
        debug_assert!(
            rounding.validate().is_ok(),
            "invalid rounding table: {:?}",
            rounding.validate()
        );
        Self {
            registry,
            rounding,
            event_handler,
        }
    }

    // ========================================================================
    // Calculation
    // ========================================================================

    /// Run `name` from `version` (or the current version) on `args`.
    ///
    /// # Errors
    /// - `UnknownVersion` if the version is not registered
    /// - `UnknownCalculation` if the version has no such formula
    /// - `InvalidArguments` for the wrong number of inputs
    /// - whatever the formula itself raises (`DivisionByZero`, ...)
    pub fn calculate(
        &self,
        name: &str,
        version: Option<&str>,
        args: &[DecimalValue],
    ) -> CalcResult<CalculationResult> {
        let outcome = self.run(name, version, args);

        match &outcome {
            Ok(result) => {
                tracing::debug!(
                    calculation = name,
                    version = %result.calculation_version,
                    value = %result.value,
                    "calculated"
                );
                self.event_handler.on_event(CalculationEvent::Calculated {
                    result_id: result.id,
                    calculation_name: result.calculation_name.clone(),
                    calculation_version: result.calculation_version.clone(),
                    value: result.value.to_string(),
                    timestamp: result.calculated_at,
                });
            }
            Err(err) => {
                tracing::warn!(calculation = name, error = %err, "calculation failed");
                self.event_handler.on_event(CalculationEvent::CalculationFailed {
                    calculation_name: name.to_string(),
                    calculation_version: version
                        .map(str::to_string)
                        .or_else(|| self.registry.current_version_id()),
                    error: err.kind(),
                    reason: err.to_string(),
                    timestamp: Utc::now(),
                });
            }
        }

        outcome
    }

    /// [`calculate`](Self::calculate), recording a caller context label
    /// (e.g. "campaign.update") on the result.
    pub fn calculate_in_context(
        &self,
        name: &str,
        version: Option<&str>,
        args: &[DecimalValue],
        context: &str,
    ) -> CalcResult<CalculationResult> {
        self.calculate(name, version, args)
            .map(|result| result.with_context(context))
    }

    fn run(
        &self,
        name: &str,
        version: Option<&str>,
        args: &[DecimalValue],
    ) -> CalcResult<CalculationResult> {
        let version = self.registry.get(version)?;
        let calculation =
            version
                .calculation(name)
                .ok_or_else(|| CalcError::UnknownCalculation {
                    name: name.to_string(),
                    version: version.version_id().to_string(),
                })?;

        calculation.check_arity(args)?;
        let value = calculation.evaluate(args)?;

        Ok(CalculationResult::new(
            value,
            calculation.name().to_string(),
            version.version_id().to_string(),
            calculation.formula().to_string(),
            CalculationInputs::from_slice(args),
        ))
    }

    // ========================================================================
    // Rounding
    // ========================================================================

    /// Round an existing result for `context`. Never re-runs the
    /// calculation and never touches `result`.
    ///
    /// # Errors
    /// `UnknownRoundingContext` if no rule matches, `NonNumericResult` for
    /// comparison results.
    pub fn with_precision(
        &self,
        result: &CalculationResult,
        context: &str,
    ) -> CalcResult<RoundedValue> {
        let rule = self.rounding.resolve(context)?;
        self.round_with(result, context, rule)
    }

    /// Like [`with_precision`](Self::with_precision), but a
    /// `"<platform>:<unitType>"` override wins over `context` when present.
    pub fn with_precision_for(
        &self,
        result: &CalculationResult,
        context: &str,
        platform: &str,
        unit_type: &str,
    ) -> CalcResult<RoundedValue> {
        let rule = self.rounding.resolve_for(context, platform, unit_type)?;
        self.round_with(result, context, rule)
    }

    fn round_with(
        &self,
        result: &CalculationResult,
        context: &str,
        rule: RoundingRule,
    ) -> CalcResult<RoundedValue> {
        let formatted_value = rule.render(result.amount()?)?;

        tracing::debug!(
            calculation = %result.calculation_name,
            context,
            places = rule.places,
            mode = %rule.mode,
            formatted = %formatted_value,
            "rounded"
        );
        self.event_handler.on_event(CalculationEvent::Rounded {
            result_id: result.id,
            context: context.to_string(),
            formatted_value: formatted_value.clone(),
            timestamp: Utc::now(),
        });

        Ok(RoundedValue {
            formatted_value,
            precision: rule.places,
            source_result: result.clone(),
            context: context.to_string(),
        })
    }

    /// Fixed-point storage form of a result, rounded with the `storage` rule.
    ///
    /// # Errors
    /// `PrecisionOverflow` if the storage rule keeps more places than the
    /// storage representation, or the value does not fit.
    pub fn to_storage(&self, result: &CalculationResult) -> CalcResult<StorageAmount> {
        let rule = self.rounding.resolve(STORAGE)?;
        let rounded = result.amount()?.round(rule.places, rule.mode)?;
        StorageAmount::from_exact(rounded)
    }

    // ========================================================================
    // Version Management
    // ========================================================================

    /// Register a new version. See [`CalculationVersionRegistry::register`].
    pub fn register_version(&self, version: CalculationVersion) -> CalcResult<()> {
        let version = self.registry.register(version)?;
        self.event_handler
            .on_event(CalculationEvent::VersionRegistered {
                version_id: version.version_id().to_string(),
                timestamp: Utc::now(),
            });
        Ok(())
    }

    /// The named version, or the current one.
    pub fn get_version(&self, version_id: Option<&str>) -> CalcResult<Arc<CalculationVersion>> {
        self.registry.get(version_id)
    }

    /// Move the current-version pointer.
    pub fn set_current_version(&self, version_id: &str) -> CalcResult<()> {
        let previous = self.registry.set_current(version_id)?;
        self.event_handler
            .on_event(CalculationEvent::CurrentVersionChanged {
                previous,
                current: version_id.to_string(),
                timestamp: Utc::now(),
            });
        Ok(())
    }

    pub fn registry(&self) -> &CalculationVersionRegistry {
        &self.registry
    }

    pub fn rounding_policy(&self) -> &RoundingPolicyTable {
        &self.rounding
    }
}
