// ============================================================================
// Calculation Version Registry
// Append-only store of calculation versions with a "current" pointer
// ============================================================================

use crate::domain::CalculationVersion;
use crate::engine::calculations::{version_1_0_0, version_1_1_0};
use crate::numeric::{CalcError, CalcResult};
use chrono::NaiveDate;
use parking_lot::RwLock;
use std::sync::Arc;

/// Ordered, append-only collection of calculation versions.
///
/// Versions are never mutated or removed once registered; a newer formula
/// ships under a new version id. Writes take the lock exclusively, reads
/// share it and clone an `Arc` out, so no lock is held while a formula runs.
pub struct CalculationVersionRegistry {
    state: RwLock<RegistryState>,
}

#[derive(Default)]
struct RegistryState {
    /// In registration order
    versions: Vec<Arc<CalculationVersion>>,
    /// Index into `versions`
    current: Option<usize>,
}

impl RegistryState {
    fn position(&self, version_id: &str) -> Option<usize> {
        self.versions
            .iter()
            .position(|v| v.version_id() == version_id)
    }
}

impl CalculationVersionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// Registry holding the built-in versions 1.0.0 and 1.1.0, with 1.1.0
    /// current.
    pub fn with_builtin_versions() -> Result<Self, String> {
        let registry = Self::new();
        let v1 = version_1_0_0()?;
        let v11 = version_1_1_0(&v1)?;
        let current = v11.version_id().to_string();

        registry.register(v1).map_err(|e| e.to_string())?;
        registry.register(v11).map_err(|e| e.to_string())?;
        registry.set_current(&current).map_err(|e| e.to_string())?;
        Ok(registry)
    }

    /// Append a version. The first version registered becomes current.
    ///
    /// # Errors
    /// `DuplicateVersion` if the id is taken; the registry is left unchanged.
    pub fn register(&self, version: CalculationVersion) -> CalcResult<Arc<CalculationVersion>> {
        let mut state = self.state.write();

        if state.position(version.version_id()).is_some() {
            tracing::warn!(
                version_id = version.version_id(),
                "rejected duplicate calculation version"
            );
            return Err(CalcError::DuplicateVersion {
                version_id: version.version_id().to_string(),
            });
        }

        let version = Arc::new(version);
        state.versions.push(Arc::clone(&version));
        if state.current.is_none() {
            state.current = Some(state.versions.len() - 1);
        }

        tracing::info!(
            version_id = version.version_id(),
            effective_date = %version.effective_date(),
            calculations = version.len(),
            "registered calculation version"
        );
        Ok(version)
    }

    /// The named version, or the current one when `version_id` is `None`.
    ///
    /// # Errors
    /// `UnknownVersion` for an unregistered id, or when nothing is current.
    pub fn get(&self, version_id: Option<&str>) -> CalcResult<Arc<CalculationVersion>> {
        let state = self.state.read();

        let index = match version_id {
            Some(id) => state.position(id),
            None => state.current,
        };

        index
            .map(|i| Arc::clone(&state.versions[i]))
            .ok_or_else(|| CalcError::UnknownVersion {
                version_id: version_id.unwrap_or("<current>").to_string(),
            })
    }

    /// Point "current" at a registered version. Returns the previous id.
    ///
    /// # Errors
    /// `UnknownVersion` if the id is not registered.
    pub fn set_current(&self, version_id: &str) -> CalcResult<Option<String>> {
        let mut state = self.state.write();

        let index = state
            .position(version_id)
            .ok_or_else(|| CalcError::UnknownVersion {
                version_id: version_id.to_string(),
            })?;

        let previous = state
            .current
            .map(|i| state.versions[i].version_id().to_string());
        state.current = Some(index);

        tracing::info!(
            previous = previous.as_deref().unwrap_or("<none>"),
            current = version_id,
            "current calculation version changed"
        );
        Ok(previous)
    }

    /// Id of the current version, if any
    pub fn current_version_id(&self) -> Option<String> {
        let state = self.state.read();
        state
            .current
            .map(|i| state.versions[i].version_id().to_string())
    }

    /// The latest-registered version whose effective date is on or before
    /// `date`, for re-running a computation as of a past day.
    pub fn effective_on(&self, date: NaiveDate) -> Option<Arc<CalculationVersion>> {
        let state = self.state.read();
        state
            .versions
            .iter()
            .filter(|v| v.effective_date() <= date)
            .max_by_key(|v| v.effective_date())
            .cloned()
    }

    /// Registered ids, in registration order
    pub fn version_ids(&self) -> Vec<String> {
        self.state
            .read()
            .versions
            .iter()
            .map(|v| v.version_id().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().versions.is_empty()
    }
}

impl Default for CalculationVersionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
