//! # Validation Module
//!
//! Input validation rules for clubos-core.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: API layer (out of repo)                                      │
//! │  ├── Shape checks (deserialization, required fields)                   │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business-rule input validation                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database constraints (persistence layer)                     │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::{Money, RevenueShare};
use crate::types::{CoachCompensation, CompensationKind};
use crate::MAX_SHARE_BPS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a payment amount in cents.
///
/// ## Rules
/// - Must be positive (> 0); zero and negative payments are rejected
///
/// ## Example
/// ```rust
/// use clubos_core::validation::validate_payment_amount;
///
/// assert!(validate_payment_amount(30_000).is_ok());
/// assert!(validate_payment_amount(0).is_err());
/// assert!(validate_payment_amount(-100).is_err());
/// ```
pub fn validate_payment_amount(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a freeze request's day count.
///
/// ## Rules
/// - Must be positive (> 0); allowance accounting is done elsewhere
pub fn validate_freeze_days(days: i64) -> ValidationResult<()> {
    if days <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "requested_days".to_string(),
        });
    }

    Ok(())
}

/// Validates a revenue share in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_share_bps(bps: u32) -> ValidationResult<()> {
    if bps > MAX_SHARE_BPS {
        return Err(ValidationError::OutOfRange {
            field: "compensation percent".to_string(),
            min: 0,
            max: MAX_SHARE_BPS as i64,
        });
    }

    Ok(())
}

/// Validates an effective price bound at subscription creation.
///
/// ## Rules
/// - Must be non-negative (a fully discounted subscription is legal)
/// - Must not exceed the catalog list price
pub fn validate_effective_price(effective_cents: i64, list_cents: i64) -> ValidationResult<()> {
    if effective_cents < 0 || effective_cents > list_cents {
        return Err(ValidationError::OutOfRange {
            field: "effective price".to_string(),
            min: 0,
            max: list_cents,
        });
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Validates that a date range runs forwards.
pub fn validate_date_order(start: NaiveDate, end: NaiveDate) -> ValidationResult<()> {
    if end < start {
        return Err(ValidationError::InvalidFormat {
            field: "date range".to_string(),
            reason: format!("end {} precedes start {}", end, start),
        });
    }

    Ok(())
}

// =============================================================================
// Compensation Builder
// =============================================================================

/// Builds validated coach compensation terms from raw assignment input.
///
/// This is the single place compensation values are checked. The split
/// calculation assumes terms were validated at assignment time and does
/// not re-validate.
///
/// ## Rules
/// - Percent splits must be within 0..=100% (basis points 0..=10000)
/// - Flat fees must be non-negative
///
/// ## Example
/// ```rust
/// use clubos_core::types::CompensationKind;
/// use clubos_core::validation::build_compensation;
///
/// let pct = build_compensation(CompensationKind::FromSubscriptionPercent, 7000, 0);
/// assert!(pct.is_ok());
///
/// let too_big = build_compensation(CompensationKind::FromSubscriptionPercent, 10_500, 0);
/// assert!(too_big.is_err());
/// ```
pub fn build_compensation(
    kind: CompensationKind,
    percent_bps: u32,
    amount_cents: i64,
) -> ValidationResult<CoachCompensation> {
    match kind {
        CompensationKind::FromSubscriptionPercent => {
            validate_share_bps(percent_bps)?;
            Ok(CoachCompensation::SubscriptionPercent(
                RevenueShare::from_bps(percent_bps),
            ))
        }
        CompensationKind::ExternalAmount => {
            if amount_cents < 0 {
                return Err(ValidationError::MustBePositive {
                    field: "compensation amount".to_string(),
                });
            }
            Ok(CoachCompensation::ExternalAmount(Money::from_cents(
                amount_cents,
            )))
        }
    }
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use clubos_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(1).is_ok());
        assert!(validate_payment_amount(30_000).is_ok());

        assert!(validate_payment_amount(0).is_err());
        assert!(validate_payment_amount(-500).is_err());
    }

    #[test]
    fn test_validate_freeze_days() {
        assert!(validate_freeze_days(1).is_ok());
        assert!(validate_freeze_days(0).is_err());
        assert!(validate_freeze_days(-3).is_err());
    }

    #[test]
    fn test_validate_share_bps() {
        assert!(validate_share_bps(0).is_ok());
        assert!(validate_share_bps(7000).is_ok());
        assert!(validate_share_bps(10_000).is_ok());
        assert!(validate_share_bps(10_001).is_err());
    }

    #[test]
    fn test_validate_effective_price() {
        assert!(validate_effective_price(0, 30_000).is_ok());
        assert!(validate_effective_price(30_000, 30_000).is_ok());
        assert!(validate_effective_price(30_001, 30_000).is_err());
        assert!(validate_effective_price(-1, 30_000).is_err());
    }

    #[test]
    fn test_validate_date_order() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert!(validate_date_order(start, end).is_ok());
        assert!(validate_date_order(start, start).is_ok());
        assert!(validate_date_order(end, start).is_err());
    }

    #[test]
    fn test_build_compensation() {
        let pct = build_compensation(CompensationKind::FromSubscriptionPercent, 7000, 0).unwrap();
        assert!(matches!(pct, CoachCompensation::SubscriptionPercent(_)));

        let flat = build_compensation(CompensationKind::ExternalAmount, 0, 10_000).unwrap();
        assert!(matches!(flat, CoachCompensation::ExternalAmount(_)));

        assert!(build_compensation(CompensationKind::FromSubscriptionPercent, 10_001, 0).is_err());
        assert!(build_compensation(CompensationKind::ExternalAmount, 0, -1).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
