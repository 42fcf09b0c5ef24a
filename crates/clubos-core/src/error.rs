//! # Error Types
//!
//! Typed domain failures for clubos-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  clubos-core errors (this file)                                        │
//! │  ├── EngineError      - Business rule violations (typed, per rule)     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  Host-side errors (separate services)                                  │
//! │  ├── Not-found for unknown aggregate ids (persistence layer)           │
//! │  └── API errors (what the frontend sees, serialized)                   │
//! │                                                                         │
//! │  Flow: ValidationError → EngineError → API error → user message        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ids, amounts, limits)
//! 3. Errors are enum variants, never String
//! 4. Nothing here is retried internally; the caller decides
//!
//! A subscription id that does not exist is NOT an engine error: the
//! persistence layer surfaces that as not-found before the engine runs.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Admission Denial Reason
// =============================================================================

/// Why an admission request was denied.
///
/// Carried inside [`EngineError::AdmissionDenied`] so the door UI can show
/// the member (or front desk) a precise message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// The subscription was cancelled; terminal, overrides everything else.
    Cancelled,
    /// An active freeze window covers today.
    Frozen,
    /// The plan's entry allowance is exhausted.
    MaxEntriesReached,
    /// The catalog plan itself has been retired.
    TypeInactive,
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DenialReason::Cancelled => "subscription is cancelled",
            DenialReason::Frozen => "subscription is frozen",
            DenialReason::MaxEntriesReached => "entry allowance exhausted",
            DenialReason::TypeInactive => "subscription type is inactive",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Engine Error
// =============================================================================

/// Business rule violations surfaced by the engine.
///
/// These are typed results, not exceptions-for-control-flow: every variant
/// maps to a user-facing message in the API layer, and none are retried
/// automatically inside the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A gym entry was refused.
    #[error("admission denied: {reason}")]
    AdmissionDenied { reason: DenialReason },

    /// A freeze request would exceed the plan's freeze-day allowance.
    #[error("freeze limit exceeded: {consumed} of {allowed} days consumed, {requested} requested")]
    FreezeLimitExceeded {
        allowed: i64,
        consumed: i64,
        requested: i64,
    },

    /// The subscription or freeze request was already cancelled.
    ///
    /// Cancellation is one-way; a second cancel must not recompute a
    /// refund or claw back more days.
    #[error("{entity} {id} is already cancelled")]
    AlreadyCancelled { entity: &'static str, id: String },

    /// A payment amount must be strictly positive.
    #[error("invalid payment amount: {cents} cents")]
    InvalidAmount { cents: i64 },

    /// Recording the payment would push total payments over the
    /// subscription's effective price.
    #[error(
        "overpayment: {paid_cents} cents already paid of {price_cents}, attempted {attempted_cents} more"
    )]
    Overpayment {
        price_cents: i64,
        paid_cents: i64,
        attempted_cents: i64,
    },

    /// The coach's concurrent active private-subscription count is at cap.
    #[error("coach {coach_id} is at capacity ({max_trainees} trainees)")]
    CoachCapacityExceeded { coach_id: String, max_trainees: i64 },

    /// The payroll record was already finalized; finalization is one-way
    /// and must not emit a second expense.
    #[error("payroll {payroll_id} is already finalized")]
    AlreadyFinalized { payroll_id: String },

    /// The payroll record belongs to a different period than the one
    /// supplied for finalization; booking it would charge the wrong club.
    #[error("payroll {payroll_id} belongs to period {expected_period_id}, got {period_id}")]
    PeriodMismatch {
        payroll_id: String,
        expected_period_id: String,
        period_id: String,
    },

    /// No employment contract covers the requested date.
    ///
    /// Informational rather than fatal: payroll computation treats a
    /// missing contract as zeroed hours (commission-only coaches), but
    /// callers that require a contract can surface this directly.
    #[error("no effective contract for employee {employee_id} as of {as_of}")]
    NoEffectiveContract { employee_id: String, as_of: String },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller-supplied input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., invalid UUID, invalid date order).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Operation not allowed for this plan (e.g., coach assignment on a
    /// non-private plan).
    #[error("{field} not allowed: {reason}")]
    NotAllowed { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denial_messages() {
        let err = EngineError::AdmissionDenied {
            reason: DenialReason::MaxEntriesReached,
        };
        assert_eq!(err.to_string(), "admission denied: entry allowance exhausted");
    }

    #[test]
    fn test_overpayment_message() {
        let err = EngineError::Overpayment {
            price_cents: 30_000,
            paid_cents: 25_000,
            attempted_cents: 10_000,
        };
        assert_eq!(
            err.to_string(),
            "overpayment: 25000 cents already paid of 30000, attempted 10000 more"
        );
    }

    #[test]
    fn test_validation_converts_to_engine_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "requested_days".to_string(),
        };
        let engine_err: EngineError = validation_err.into();
        assert!(matches!(engine_err, EngineError::Validation(_)));
    }
}
