// ============================================================================
// Rounding Policy
// Context label -> rounding rule table, with platform/unit-type overrides
// ============================================================================

use crate::numeric::{CalcError, CalcResult, DecimalValue, RoundingMode, MAX_SCALE};
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Well-known Contexts
// ============================================================================

/// Persisted values: 6 places
pub const STORAGE: &str = "storage";
/// Generic display amounts: 2 places
pub const DISPLAY: &str = "display";
/// Dollar amounts in the UI: 2 places
pub const DISPLAY_DOLLARS: &str = "display.dollars";
/// Sub-cent amounts in the UI (CPV, CPC): 3 places
pub const DISPLAY_SUBCENT: &str = "display.subcent";
/// Unit costs: 4 places
pub const UNIT_COST: &str = "unit.cost";
/// Ratios shown as percentages: 2 places after scaling by 100
pub const PERCENTAGE: &str = "percentage";

// ============================================================================
// Rounding Rule
// ============================================================================

/// How a ratio is presented before rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DisplayUnit {
    /// Value is rendered as-is
    #[default]
    Plain,
    /// Value is a ratio rendered as a percentage (0.1667 -> 16.67)
    Percent,
}

/// Number of places and the mode used to reach them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoundingRule {
    pub places: u32,
    pub mode: RoundingMode,
    #[cfg_attr(feature = "serde", serde(default))]
    pub unit: DisplayUnit,
}

impl RoundingRule {
    pub const fn new(places: u32, mode: RoundingMode) -> Self {
        Self {
            places,
            mode,
            unit: DisplayUnit::Plain,
        }
    }

    /// A rule whose values are ratios shown as percentages.
    pub const fn percent(places: u32, mode: RoundingMode) -> Self {
        Self {
            places,
            mode,
            unit: DisplayUnit::Percent,
        }
    }

    /// Round `value` to `places` with `mode` and render it with exactly
    /// `places` fractional digits. Ignores `unit`, so applying a rule to its
    /// own output returns the same string.
    ///
    /// # Example
    /// ```
    /// use calculation_engine::domain::RoundingRule;
    /// use calculation_engine::numeric::{DecimalValue, RoundingMode};
    ///
    /// let rule = RoundingRule::new(0, RoundingMode::HalfUp);
    /// let value: DecimalValue = "-2.5".parse().unwrap();
    /// assert_eq!(rule.apply(value).unwrap(), "-3");
    /// ```
    pub fn apply(&self, value: DecimalValue) -> CalcResult<String> {
        let rounded = value.round(self.places, self.mode)?;
        Ok(rounded.to_fixed_string(self.places))
    }

    /// Scale for the rule's display unit, then [`apply`](Self::apply).
    pub fn render(&self, value: DecimalValue) -> CalcResult<String> {
        match self.unit {
            DisplayUnit::Plain => self.apply(value),
            DisplayUnit::Percent => self.apply(value.checked_mul(DecimalValue::ONE_HUNDRED)?),
        }
    }
}

// ============================================================================
// Rounding Policy Table
// ============================================================================

/// Mapping from context label to rounding rule.
///
/// Generic contexts are plain labels (`display.dollars`); overrides are
/// keyed `"<platform>:<unitType>"` and win over generic contexts. A label
/// that matches neither is an error: there is no default rule.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoundingPolicyTable {
    #[cfg_attr(feature = "serde", serde(default))]
    contexts: BTreeMap<String, RoundingRule>,
    #[cfg_attr(feature = "serde", serde(default))]
    overrides: BTreeMap<String, RoundingRule>,
}

impl RoundingPolicyTable {
    /// An empty table. Every lookup fails until rules are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: add or replace a generic context rule
    pub fn with_rule(mut self, context: impl Into<String>, rule: RoundingRule) -> Self {
        self.contexts.insert(context.into(), rule);
        self
    }

    /// Builder method: add or replace a `platform:unitType` override
    pub fn with_override(
        mut self,
        platform: &str,
        unit_type: &str,
        rule: RoundingRule,
    ) -> Self {
        self.overrides.insert(compound_key(platform, unit_type), rule);
        self
    }

    /// Builder method: switch every rule to `mode`, keeping places and unit
    pub fn with_default_mode(mut self, mode: RoundingMode) -> Self {
        for rule in self.contexts.values_mut().chain(self.overrides.values_mut()) {
            rule.mode = mode;
        }
        self
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve a context label: exact override match first, then exact
    /// generic match.
    ///
    /// # Errors
    /// `UnknownRoundingContext` when neither table has the label.
    pub fn resolve(&self, context: &str) -> CalcResult<RoundingRule> {
        self.overrides
            .get(context)
            .or_else(|| self.contexts.get(context))
            .copied()
            .ok_or_else(|| CalcError::UnknownRoundingContext {
                context: context.to_string(),
            })
    }

    /// Resolve for a platform/unit combination, falling back to the generic
    /// `context` when no override exists for `"<platform>:<unitType>"`.
    pub fn resolve_for(
        &self,
        context: &str,
        platform: &str,
        unit_type: &str,
    ) -> CalcResult<RoundingRule> {
        match self.overrides.get(&compound_key(platform, unit_type)) {
            Some(rule) => Ok(*rule),
            None => self.resolve(context),
        }
    }

    /// Resolve `context` and render `value` with its rule.
    pub fn render(&self, value: DecimalValue, context: &str) -> CalcResult<String> {
        self.resolve(context)?.render(value)
    }

    /// Every generic context label, sorted.
    pub fn contexts(&self) -> impl Iterator<Item = &str> {
        self.contexts.keys().map(String::as_str)
    }

    /// Every override key, sorted.
    pub fn overrides(&self) -> impl Iterator<Item = &str> {
        self.overrides.keys().map(String::as_str)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate the table
    pub fn validate(&self) -> Result<(), String> {
        for (key, rule) in &self.contexts {
            if key.trim().is_empty() {
                return Err("Rounding context cannot be empty".to_string());
            }
            if key.contains(':') {
                return Err(format!(
                    "Generic rounding context '{}' must not contain ':'",
                    key
                ));
            }
            validate_places(key, rule)?;
        }

        for (key, rule) in &self.overrides {
            match key.split_once(':') {
                Some((platform, unit_type))
                    if !platform.is_empty() && !unit_type.is_empty() && !unit_type.contains(':') => {}
                _ => {
                    return Err(format!(
                        "Rounding override '{}' must have the form platform:unitType",
                        key
                    ))
                }
            }
            validate_places(key, rule)?;
        }

        Ok(())
    }

    /// Load a table from JSON and validate it.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, String> {
        let table: Self = serde_json::from_str(json).map_err(|e| e.to_string())?;
        table.validate()?;
        Ok(table)
    }
}

fn validate_places(key: &str, rule: &RoundingRule) -> Result<(), String> {
    if rule.places > MAX_SCALE {
        return Err(format!(
            "Rounding context '{}' has {} places; at most {} are supported",
            key, rule.places, MAX_SCALE
        ));
    }
    Ok(())
}

fn compound_key(platform: &str, unit_type: &str) -> String {
    format!("{}:{}", platform, unit_type)
}

// ============================================================================
// Preset Configurations
// ============================================================================

impl RoundingPolicyTable {
    /// The standard campaign-planning table, all HALF_UP:
    /// - storage 6, display 2, display.dollars 2, display.subcent 3
    /// - unit.cost 4, percentage 2 (as percent)
    /// - youtube:views 4, tiktok:views 4, meta:impressions 2
    pub fn standard() -> Self {
        Self::standard_with_mode(RoundingMode::HalfUp)
    }

    /// The standard table with a different rounding mode throughout.
    pub fn standard_with_mode(mode: RoundingMode) -> Self {
        Self::new()
            .with_rule(STORAGE, RoundingRule::new(6, mode))
            .with_rule(DISPLAY, RoundingRule::new(2, mode))
            .with_rule(DISPLAY_DOLLARS, RoundingRule::new(2, mode))
            .with_rule(DISPLAY_SUBCENT, RoundingRule::new(3, mode))
            .with_rule(UNIT_COST, RoundingRule::new(4, mode))
            .with_rule(PERCENTAGE, RoundingRule::percent(2, mode))
            .with_override("youtube", "views", RoundingRule::new(4, mode))
            .with_override("tiktok", "views", RoundingRule::new(4, mode))
            .with_override("meta", "impressions", RoundingRule::new(2, mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::ErrorKind;

    fn d(s: &str) -> DecimalValue {
        s.parse().unwrap()
    }

    #[test]
    fn test_standard_contexts() {
        let table = RoundingPolicyTable::standard();
        assert!(table.validate().is_ok());

        assert_eq!(table.resolve(STORAGE).unwrap().places, 6);
        assert_eq!(table.resolve(DISPLAY_DOLLARS).unwrap().places, 2);
        assert_eq!(table.resolve(DISPLAY_SUBCENT).unwrap().places, 3);
        assert_eq!(table.resolve(UNIT_COST).unwrap().places, 4);

        let percentage = table.resolve(PERCENTAGE).unwrap();
        assert_eq!(percentage.places, 2);
        assert_eq!(percentage.unit, DisplayUnit::Percent);
        assert_eq!(percentage.mode, RoundingMode::HalfUp);
    }

    #[test]
    fn test_unknown_context_fails() {
        let table = RoundingPolicyTable::standard();
        let err = table.resolve("display.euros").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownRoundingContext);

        let err = RoundingPolicyTable::new().resolve(STORAGE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownRoundingContext);
    }

    #[test]
    fn test_override_precedence() {
        let table = RoundingPolicyTable::standard();

        assert_eq!(table.resolve("youtube:views").unwrap().places, 4);
        assert_eq!(
            table
                .resolve_for(DISPLAY_SUBCENT, "youtube", "views")
                .unwrap()
                .places,
            4
        );
        // No override for this pair: generic context applies
        assert_eq!(
            table
                .resolve_for(DISPLAY_SUBCENT, "youtube", "clicks")
                .unwrap()
                .places,
            3
        );
        assert!(table.resolve("youtube:clicks").is_err());
    }

    #[test]
    fn test_apply_pads_and_rounds() {
        let four = RoundingRule::new(4, RoundingMode::HalfUp);
        assert_eq!(four.apply(d("0.02")).unwrap(), "0.0200");

        let zero = RoundingRule::new(0, RoundingMode::HalfUp);
        assert_eq!(zero.apply(d("2.5")).unwrap(), "3");
        assert_eq!(zero.apply(d("-2.5")).unwrap(), "-3");

        let two = RoundingRule::new(2, RoundingMode::HalfUp);
        assert_eq!(two.apply(d("1234567.891")).unwrap(), "1234567.89");
    }

    #[test]
    fn test_apply_is_idempotent() {
        let rule = RoundingRule::new(2, RoundingMode::HalfEven);
        let once = rule.apply(d("10.125")).unwrap();
        let twice = rule.apply(once.parse().unwrap()).unwrap();
        assert_eq!(once, "10.12");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_render_percent() {
        let table = RoundingPolicyTable::standard();
        let ratio = d("20").checked_div(d("120")).unwrap();
        assert_eq!(table.render(ratio, PERCENTAGE).unwrap(), "16.67");
        assert_eq!(table.render(d("-0.05"), PERCENTAGE).unwrap(), "-5.00");
    }

    #[test]
    fn test_with_default_mode() {
        let table = RoundingPolicyTable::standard_with_mode(RoundingMode::HalfEven);
        assert_eq!(table.render(d("0.125"), DISPLAY_DOLLARS).unwrap(), "0.12");

        let table = RoundingPolicyTable::standard();
        assert_eq!(table.render(d("0.125"), DISPLAY_DOLLARS).unwrap(), "0.13");

        let table = RoundingPolicyTable::standard().with_default_mode(RoundingMode::Down);
        assert_eq!(table.resolve("youtube:views").unwrap().mode, RoundingMode::Down);
    }

    #[test]
    fn test_validation() {
        let bad_generic =
            RoundingPolicyTable::new().with_rule("a:b", RoundingRule::new(2, RoundingMode::HalfUp));
        assert!(bad_generic.validate().is_err());

        let bad_override =
            RoundingPolicyTable::new().with_override("", "views", RoundingRule::new(2, RoundingMode::HalfUp));
        assert!(bad_override.validate().is_err());

        let too_precise =
            RoundingPolicyTable::new().with_rule("storage", RoundingRule::new(29, RoundingMode::HalfUp));
        assert!(too_precise.validate().is_err());
    }

    #[test]
    fn test_listing() {
        let table = RoundingPolicyTable::standard();
        assert!(table.contexts().any(|c| c == STORAGE));
        assert_eq!(table.overrides().count(), 3);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json() {
        let json = r#"{
            "contexts": {
                "storage": { "places": 6, "mode": "HALF_UP" },
                "percentage": { "places": 1, "mode": "HALF_EVEN", "unit": "percent" }
            },
            "overrides": {
                "youtube:views": { "places": 4, "mode": "HALF_UP" }
            }
        }"#;

        let table = RoundingPolicyTable::from_json(json).unwrap();
        assert_eq!(table.resolve(STORAGE).unwrap().places, 6);
        assert_eq!(table.resolve(PERCENTAGE).unwrap().unit, DisplayUnit::Percent);
        assert_eq!(table.resolve("youtube:views").unwrap().places, 4);

        assert!(RoundingPolicyTable::from_json(r#"{"overrides": {"views": {"places": 2, "mode": "UP"}}}"#).is_err());
    }
}
