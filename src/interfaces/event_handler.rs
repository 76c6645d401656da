// ============================================================================
// Event Handler Interface
// Defines the contract for observing calculations and registry changes
// ============================================================================

use crate::numeric::ErrorKind;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted by the calculation engine
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CalculationEvent {
    /// Calculation produced a full-precision result
    Calculated {
        result_id: Uuid,
        calculation_name: String,
        calculation_version: String,
        value: String,
        timestamp: DateTime<Utc>,
    },

    /// Calculation failed; nothing was produced
    CalculationFailed {
        calculation_name: String,
        calculation_version: Option<String>,
        error: ErrorKind,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// A result was rounded for a context
    Rounded {
        result_id: Uuid,
        context: String,
        formatted_value: String,
        timestamp: DateTime<Utc>,
    },

    /// New calculation version registered
    VersionRegistered {
        version_id: String,
        timestamp: DateTime<Utc>,
    },

    /// Current version pointer moved
    CurrentVersionChanged {
        previous: Option<String>,
        current: String,
        timestamp: DateTime<Utc>,
    },
}

/// Event handler trait for processing calculation engine events
/// Implementations can handle audit logs, metrics, notifications, etc.
pub trait EventHandler: Send + Sync {
    /// Handle a calculation event
    fn on_event(&self, event: CalculationEvent);
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: CalculationEvent) {
        // Do nothing
    }
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: CalculationEvent) {
        tracing::debug!("Calculation engine event: {:?}", event);
    }
}
