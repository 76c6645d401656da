// ============================================================================
// Calculation Version Domain Model
// Named, dated, immutable bundle of calculation formulas
// ============================================================================

use crate::interfaces::Calculation;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Immutable bundle of formulas under one version id.
///
/// Built once through [`CalculationVersionBuilder`]; there are no mutating
/// methods, so a registered version reproduces its results forever.
#[derive(Clone)]
pub struct CalculationVersion {
    version_id: String,
    effective_date: NaiveDate,
    description: String,
    calculations: BTreeMap<String, Arc<dyn Calculation>>,
}

impl CalculationVersion {
    /// Start building a version
    pub fn builder(
        version_id: impl Into<String>,
        effective_date: NaiveDate,
        description: impl Into<String>,
    ) -> CalculationVersionBuilder {
        CalculationVersionBuilder {
            version_id: version_id.into(),
            effective_date,
            description: description.into(),
            calculations: BTreeMap::new(),
        }
    }

    pub fn version_id(&self) -> &str {
        &self.version_id
    }

    pub fn effective_date(&self) -> NaiveDate {
        self.effective_date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Look up a formula by name
    pub fn calculation(&self, name: &str) -> Option<&Arc<dyn Calculation>> {
        self.calculations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.calculations.contains_key(name)
    }

    /// Formula names, sorted
    pub fn calculation_names(&self) -> impl Iterator<Item = &str> {
        self.calculations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.calculations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calculations.is_empty()
    }
}

impl fmt::Debug for CalculationVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalculationVersion")
            .field("version_id", &self.version_id)
            .field("effective_date", &self.effective_date)
            .field("description", &self.description)
            .field("calculations", &self.calculations.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`CalculationVersion`]
pub struct CalculationVersionBuilder {
    version_id: String,
    effective_date: NaiveDate,
    description: String,
    calculations: BTreeMap<String, Arc<dyn Calculation>>,
}

impl CalculationVersionBuilder {
    /// Add a formula, replacing any formula of the same name
    pub fn with_calculation(mut self, calculation: Arc<dyn Calculation>) -> Self {
        self.calculations
            .insert(calculation.name().to_string(), calculation);
        self
    }

    /// Carry over every formula of an earlier version. Formulas added
    /// afterwards with the same name supersede the inherited ones.
    pub fn inherit(mut self, previous: &CalculationVersion) -> Self {
        for (name, calculation) in &previous.calculations {
            self.calculations.insert(name.clone(), Arc::clone(calculation));
        }
        self
    }

    /// Validate and build the version
    pub fn build(self) -> Result<CalculationVersion, String> {
        if !is_semver_like(&self.version_id) {
            return Err(format!(
                "Version id '{}' must look like MAJOR.MINOR.PATCH",
                self.version_id
            ));
        }

        if self.calculations.is_empty() {
            return Err(format!(
                "Version '{}' must contain at least one calculation",
                self.version_id
            ));
        }

        Ok(CalculationVersion {
            version_id: self.version_id,
            effective_date: self.effective_date,
            description: self.description,
            calculations: self.calculations,
        })
    }
}

/// `1.2.3`, optionally followed by `-label` (e.g. `2.0.0-rc1`).
fn is_semver_like(id: &str) -> bool {
    let core = id.split_once('-').map_or(id, |(core, _)| core);
    let parts: Vec<&str> = core.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CalculatedValue;
    use crate::interfaces::{Arity, FormulaFn};
    use crate::numeric::{CalcResult, DecimalValue};

    fn zero(_: &[DecimalValue]) -> CalcResult<CalculatedValue> {
        Ok(DecimalValue::ZERO.into())
    }

    fn one(_: &[DecimalValue]) -> CalcResult<CalculatedValue> {
        Ok(DecimalValue::ONE.into())
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_build_version() {
        let version = CalculationVersion::builder("1.0.0", date(), "initial")
            .with_calculation(Arc::new(FormulaFn::new("zero", "0", Arity::Variadic, zero)))
            .build()
            .unwrap();

        assert_eq!(version.version_id(), "1.0.0");
        assert_eq!(version.effective_date(), date());
        assert_eq!(version.description(), "initial");
        assert!(version.contains("zero"));
        assert_eq!(version.len(), 1);
        assert!(version.calculation("one").is_none());
    }

    #[test]
    fn test_inherit_and_supersede() {
        let v1 = CalculationVersion::builder("1.0.0", date(), "initial")
            .with_calculation(Arc::new(FormulaFn::new("a", "0", Arity::Variadic, zero)))
            .with_calculation(Arc::new(FormulaFn::new("b", "0", Arity::Variadic, zero)))
            .build()
            .unwrap();

        let v2 = CalculationVersion::builder("1.1.0", date(), "supersedes b")
            .inherit(&v1)
            .with_calculation(Arc::new(FormulaFn::new("b", "1", Arity::Variadic, one)))
            .build()
            .unwrap();

        assert_eq!(v2.calculation_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(v2.calculation("b").unwrap().formula(), "1");
        // The earlier version is untouched
        assert_eq!(v1.calculation("b").unwrap().formula(), "0");
    }

    #[test]
    fn test_invalid_versions() {
        let calc: Arc<dyn Calculation> = Arc::new(FormulaFn::new("a", "0", Arity::Variadic, zero));

        for bad in ["", "1", "1.0", "v1.0.0", "1.0.x", "1..0"] {
            let result = CalculationVersion::builder(bad, date(), "")
                .with_calculation(Arc::clone(&calc))
                .build();
            assert!(result.is_err(), "{bad:?}");
        }

        assert!(CalculationVersion::builder("2.0.0-rc1", date(), "")
            .with_calculation(calc)
            .build()
            .is_ok());

        assert!(CalculationVersion::builder("1.0.0", date(), "")
            .build()
            .is_err());
    }
}
