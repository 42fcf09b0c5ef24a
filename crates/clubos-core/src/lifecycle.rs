//! # Subscription Lifecycle
//!
//! The derived state machine and the orchestration entry points that
//! create subscriptions and assign coaches.
//!
//! ## Derived Status, Not A Stored Enum
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  status(subscription, now) — pure, order-sensitive classification       │
//! │                                                                         │
//! │  1. is_cancelled?                    ──► Cancelled   (terminal)         │
//! │  2. active freeze covers today?      ──► Frozen                         │
//! │  3. past end date, or entry cap hit? ──► Expired                        │
//! │  4. start date in the future?        ──► Upcoming                       │
//! │  5. otherwise                        ──► Active                         │
//! │                                                                         │
//! │  Recomputed on every read. Nothing stores this enum, so stored flags    │
//! │  and derived facts can never drift apart.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The legacy system scattered ad hoc boolean checks across admin screens
//! and serializers; every consumer here goes through [`status`] instead.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

use crate::compensation::ensure_coach_capacity;
use crate::error::{EngineResult, ValidationError};
use crate::freeze::is_currently_frozen;
use crate::types::{
    CoachAssignment, CoachCompensation, CoachProfile, FreezeRequest, Subscription,
    SubscriptionType,
};
use crate::validation::validate_effective_price;

// =============================================================================
// Status
// =============================================================================

/// The five lifecycle states of a subscription.
///
/// `Cancelled` is terminal and overrides all others.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Start date is in the future.
    Upcoming,
    /// Usable today.
    Active,
    /// An active freeze window covers today.
    Frozen,
    /// Past its end date or out of entries.
    Expired,
    /// Logically cancelled; terminal.
    Cancelled,
}

/// Classifies a subscription as of `today`.
///
/// Pure function of its inputs: calling it repeatedly with unchanged
/// inputs returns the same state and mutates nothing.
pub fn status(
    subscription: &Subscription,
    plan: &SubscriptionType,
    freezes: &[FreezeRequest],
    today: NaiveDate,
) -> SubscriptionStatus {
    if subscription.is_cancelled {
        return SubscriptionStatus::Cancelled;
    }

    if is_currently_frozen(freezes, today) {
        return SubscriptionStatus::Frozen;
    }

    let entries_exhausted =
        plan.has_entry_limit() && subscription.entry_count >= plan.max_entries;
    if subscription.end_date < today || entries_exhausted {
        return SubscriptionStatus::Expired;
    }

    if subscription.start_date > today {
        return SubscriptionStatus::Upcoming;
    }

    SubscriptionStatus::Active
}

// =============================================================================
// Creation
// =============================================================================

/// Creates a subscription from a catalog plan.
///
/// ## Behavior
/// - `end_date = start_date + plan.duration_days`
/// - The **effective price** is bound now: the list price, or the
///   special-offer price when one applies. All later payment and refund
///   math uses this bound price, never the (possibly since-changed)
///   catalog price.
pub fn create_subscription(
    club_id: &str,
    member_id: &str,
    plan: &SubscriptionType,
    start_date: NaiveDate,
    effective_price_cents: Option<i64>,
    now: DateTime<Utc>,
) -> EngineResult<Subscription> {
    if plan.duration_days <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "duration_days".to_string(),
        }
        .into());
    }

    let price_cents = effective_price_cents.unwrap_or(plan.price_cents);
    validate_effective_price(price_cents, plan.price_cents)?;

    let subscription = Subscription {
        id: Uuid::new_v4().to_string(),
        club_id: club_id.to_string(),
        member_id: member_id.to_string(),
        type_id: plan.id.clone(),
        coach: None,
        start_date,
        end_date: start_date + Duration::days(plan.duration_days),
        entry_count: 0,
        price_cents,
        paid_cents: 0,
        remaining_cents: price_cents,
        is_cancelled: false,
        cancellation_date: None,
        refund_cents: None,
        created_at: now,
        updated_at: now,
    };

    debug!(
        subscription_id = %subscription.id,
        member_id,
        plan = %plan.name,
        price = %subscription.price(),
        "subscription created"
    );

    Ok(subscription)
}

// =============================================================================
// Coach Assignment
// =============================================================================

/// Assigns a coach with validated compensation terms.
///
/// ## Preconditions
/// - The plan must be a private-training plan
/// - The coach must be under their trainee cap; `active_private_count` is
///   the coach's current number of active private subscriptions from the
///   directory read model
///
/// Build `compensation` through [`crate::validation::build_compensation`]
/// so percent/flat values are checked at assignment time.
pub fn assign_coach(
    mut subscription: Subscription,
    plan: &SubscriptionType,
    coach: &CoachProfile,
    active_private_count: i64,
    compensation: CoachCompensation,
    now: DateTime<Utc>,
) -> EngineResult<Subscription> {
    if !plan.is_private_training {
        return Err(ValidationError::NotAllowed {
            field: "coach".to_string(),
            reason: format!("plan '{}' is not a private-training plan", plan.name),
        }
        .into());
    }

    ensure_coach_capacity(coach, active_private_count)?;

    subscription.coach = Some(CoachAssignment {
        coach_id: coach.id.clone(),
        compensation,
    });
    subscription.updated_at = now;

    Ok(subscription)
}

// =============================================================================
// Unit Tests
// =============================================================================
