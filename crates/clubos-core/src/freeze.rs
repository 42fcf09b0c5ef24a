//! # Freeze Ledger
//!
//! Banks membership pauses ("freezes") against a plan's freeze-day
//! allowance, extends the subscription's end date while frozen, and claws
//! unused days back on early cancellation.
//!
//! ## Freeze Life
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  request_freeze(10 days)                                                │
//! │      │   subscription.end_date += 10                                   │
//! │      ▼                                                                  │
//! │  ACTIVE ──(window passes)──► NATURALLY COMPLETED                        │
//! │      │                        counts all 10 days against allowance     │
//! │      │                                                                  │
//! │      └──(cancel after 4 days)──► CANCELLED EARLY                        │
//! │                                   subscription.end_date -= 6            │
//! │                                   only the 4 used days ever counted    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Allowance Accounting
//! Only freeze requests that ran to **natural completion** count their full
//! `requested_days` against the allowance. Early-cancelled requests do not
//! count beyond the days actually used — and those used days are already
//! reflected in the end date, so the allowance check derives consumption
//! from completed requests, never from cancelled requests' `requested_days`.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::types::{FreezeRequest, Subscription, SubscriptionType};
use crate::validation::validate_freeze_days;
use uuid::Uuid;

// =============================================================================
// Queries
// =============================================================================

/// Freeze days consumed so far, for the allowance check.
///
/// Counts `requested_days` of requests that ran to natural completion.
/// Requests still flagged active whose window has already passed are
/// counted too, so an unsettled store (no [`settle_expired`] sweep yet)
/// cannot under-count.
pub fn consumed_days(requests: &[FreezeRequest], today: NaiveDate) -> i64 {
    requests
        .iter()
        .filter(|r| r.ran_to_completion() || (r.is_active && r.has_lapsed(today)))
        .map(|r| r.requested_days)
        .sum()
}

/// Whether an active freeze window covers the given day.
pub fn is_currently_frozen(requests: &[FreezeRequest], today: NaiveDate) -> bool {
    requests.iter().any(|r| r.is_active && r.covers(today))
}

// =============================================================================
// Mutations
// =============================================================================

/// Requests a freeze against the subscription's allowance.
///
/// ## Behavior
/// - Fails with [`EngineError::FreezeLimitExceeded`] when consumed days
///   plus the request would exceed `type.max_freeze_days`
/// - On success the subscription's end date is pushed out by the full
///   requested duration, and an active [`FreezeRequest`] with
///   `end_date = start_date + requested_days` is returned for insertion
pub fn request_freeze(
    mut subscription: Subscription,
    plan: &SubscriptionType,
    existing: &[FreezeRequest],
    requested_days: i64,
    start_date: NaiveDate,
    now: DateTime<Utc>,
) -> EngineResult<(Subscription, FreezeRequest)> {
    validate_freeze_days(requested_days)?;

    let consumed = consumed_days(existing, now.date_naive());
    if consumed + requested_days > plan.max_freeze_days {
        return Err(EngineError::FreezeLimitExceeded {
            allowed: plan.max_freeze_days,
            consumed,
            requested: requested_days,
        });
    }

    subscription.end_date += Duration::days(requested_days);
    subscription.updated_at = now;

    let request = FreezeRequest {
        id: Uuid::new_v4().to_string(),
        subscription_id: subscription.id.clone(),
        requested_days,
        start_date,
        end_date: start_date + Duration::days(requested_days),
        is_active: true,
        cancelled_at: None,
        created_at: now,
    };

    debug!(
        subscription_id = %subscription.id,
        requested_days,
        new_end_date = %subscription.end_date,
        "freeze requested"
    );

    Ok((subscription, request))
}

/// Cancels an active freeze early and claws back the unused extension.
///
/// ## Behavior
/// - `used = clamp(today - start_date, 0, requested_days)`
/// - The subscription's end date moves back by `requested_days - used`
/// - The request is closed with `cancelled_at` set, which excludes it from
///   future allowance accounting
/// - Fails with [`EngineError::AlreadyCancelled`] if the request is no
///   longer active (idempotence guard)
pub fn cancel_freeze(
    mut subscription: Subscription,
    mut request: FreezeRequest,
    now: DateTime<Utc>,
) -> EngineResult<(Subscription, FreezeRequest)> {
    if !request.is_active {
        return Err(EngineError::AlreadyCancelled {
            entity: "freeze request",
            id: request.id,
        });
    }

    let today = now.date_naive();
    let used = (today - request.start_date)
        .num_days()
        .clamp(0, request.requested_days);
    let unused = request.requested_days - used;

    subscription.end_date -= Duration::days(unused);
    subscription.updated_at = now;

    request.is_active = false;
    request.cancelled_at = Some(now);

    debug!(
        subscription_id = %subscription.id,
        freeze_id = %request.id,
        used_days = used,
        clawed_back = unused,
        "freeze cancelled"
    );

    Ok((subscription, request))
}

/// Marks active requests whose window has passed as naturally completed.
///
/// `cancelled_at` stays empty, which is what makes them count in
/// [`consumed_days`]. Returns how many requests were settled; the caller
/// persists the updated rows.
pub fn settle_expired(requests: &mut [FreezeRequest], today: NaiveDate) -> usize {
    let mut settled = 0;
    for request in requests.iter_mut() {
        if request.is_active && request.has_lapsed(today) {
            request.is_active = false;
            settled += 1;
        }
    }
    settled
}

// =============================================================================
// Unit Tests
// =============================================================================
