//! # Refund Calculator
//!
//! Prorates a refund when a subscription is cancelled mid-term and
//! performs the cancellation itself.
//!
//! ## Proration
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Entry-limited plan (max_entries > 0):                                  │
//! │     refund = paid × (max_entries − entry_count) / max_entries           │
//! │     (unused admissions, not unused days)                                │
//! │                                                                         │
//! │  Unlimited plan:                                                        │
//! │     refund = paid × (end_date − today) / (end_date − start_date)        │
//! │     (unused days)                                                       │
//! │                                                                         │
//! │  Rounded half-up to the cent, computed exactly once at cancellation.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No Refund
//! Nothing paid, already cancelled, already expired by date, or entry
//! allowance fully consumed.
//!
//! Cancellation emits a **negative income adjustment** side effect: a
//! refund reduces recognized revenue, and the persistence layer books it in
//! the same transaction as the subscription update.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::money::Money;
use crate::types::{SideEffect, Subscription, SubscriptionType};

/// Computes the prorated refund the member is owed if cancelled today.
///
/// Pure and side-effect free; [`cancel`] is what binds the result to the
/// subscription.
pub fn calculate_refund(
    subscription: &Subscription,
    plan: &SubscriptionType,
    today: NaiveDate,
) -> Money {
    if subscription.paid_cents == 0
        || subscription.is_cancelled
        || subscription.end_date < today
    {
        return Money::zero();
    }

    if plan.has_entry_limit() {
        if subscription.entry_count >= plan.max_entries {
            return Money::zero();
        }
        let unused = plan.max_entries - subscription.entry_count;
        return subscription.paid().prorate(unused, plan.max_entries);
    }

    // Unlimited entries: time-based proration. An upcoming subscription
    // (today before start) refunds the full paid amount via the clamp.
    let remaining_days = (subscription.end_date - today).num_days();
    subscription
        .paid()
        .prorate(remaining_days, subscription.term_days())
}

/// Cancels the subscription and binds the refund exactly once.
///
/// ## Behavior
/// - Fails with [`EngineError::AlreadyCancelled`] on a second cancel; the
///   bound `refund_cents` is never recomputed
/// - Emits an [`SideEffect::IncomeAdjustment`] of **minus** the refund when
///   the refund is positive
pub fn cancel(
    mut subscription: Subscription,
    plan: &SubscriptionType,
    now: DateTime<Utc>,
) -> EngineResult<(Subscription, Vec<SideEffect>)> {
    if subscription.is_cancelled {
        return Err(EngineError::AlreadyCancelled {
            entity: "subscription",
            id: subscription.id,
        });
    }

    let today = now.date_naive();
    let refund = calculate_refund(&subscription, plan, today);

    subscription.is_cancelled = true;
    subscription.cancellation_date = Some(today);
    subscription.refund_cents = Some(refund.cents());
    subscription.updated_at = now;

    let mut effects = Vec::new();
    if refund.is_positive() {
        effects.push(SideEffect::IncomeAdjustment {
            club_id: subscription.club_id.clone(),
            subscription_id: subscription.id.clone(),
            amount_cents: (-refund).cents(),
        });
    }

    debug!(
        subscription_id = %subscription.id,
        refund = %refund,
        "subscription cancelled"
    );

    Ok((subscription, effects))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CompensationKind;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
    }

    fn plan(max_entries: i64) -> SubscriptionType {
        SubscriptionType {
            id: "t1".into(),
            club_id: "c1".into(),
            name: "Plan".into(),
            price_cents: 30_000,
            duration_days: 30,
            max_entries,
            max_freeze_days: 0,
            is_private_training: false,
            default_compensation_kind: CompensationKind::FromSubscriptionPercent,
            is_active: true,
            created_at: ts(2025, 1, 1),
        }
    }

    fn subscription(paid_cents: i64) -> Subscription {
        Subscription {
            id: "s1".into(),
            club_id: "c1".into(),
            member_id: "m1".into(),
            type_id: "t1".into(),
            coach: None,
            start_date: date(2025, 1, 1),
            end_date: date(2025, 1, 31),
            entry_count: 0,
            price_cents: 30_000,
            paid_cents,
            remaining_cents: 30_000 - paid_cents,
            is_cancelled: false,
            cancellation_date: None,
            refund_cents: None,
            created_at: ts(2025, 1, 1),
            updated_at: ts(2025, 1, 1),
        }
    }

    #[test]
    fn test_time_based_proration() {
        // 30-day term, $300 paid, cancelled on the 16th: 15 days remain
        let refund = calculate_refund(&subscription(30_000), &plan(0), date(2025, 1, 16));
        assert_eq!(refund.cents(), 15_000); // $150.00
    }

    #[test]
    fn test_entry_based_proration() {
        // 20 entries, 5 used, $200 paid: refund 200 × 15/20 = 150
        let mut sub = subscription(20_000);
        sub.entry_count = 5;
        let refund = calculate_refund(&sub, &plan(20), date(2025, 1, 10));
        assert_eq!(refund.cents(), 15_000); // $150.00
    }

    #[test]
    fn test_no_refund_when_nothing_paid() {
        let refund = calculate_refund(&subscription(0), &plan(0), date(2025, 1, 10));
        assert!(refund.is_zero());
    }

    #[test]
    fn test_no_refund_after_expiry() {
        let refund = calculate_refund(&subscription(30_000), &plan(0), date(2025, 2, 5));
        assert!(refund.is_zero());
    }

    #[test]
    fn test_no_refund_when_entries_exhausted() {
        let mut sub = subscription(20_000);
        sub.entry_count = 20;
        let refund = calculate_refund(&sub, &plan(20), date(2025, 1, 10));
        assert!(refund.is_zero());
    }

    #[test]
    fn test_upcoming_subscription_refunds_full_paid_amount() {
        let mut sub = subscription(30_000);
        sub.start_date = date(2025, 2, 1);
        sub.end_date = date(2025, 3, 3);
        let refund = calculate_refund(&sub, &plan(0), date(2025, 1, 10));
        assert_eq!(refund.cents(), 30_000);
    }

    #[test]
    fn test_cancel_binds_refund_and_emits_negative_income() {
        let (sub, effects) = cancel(subscription(30_000), &plan(0), ts(2025, 1, 16)).unwrap();
        assert!(sub.is_cancelled);
        assert_eq!(sub.cancellation_date, Some(date(2025, 1, 16)));
        assert_eq!(sub.refund_cents, Some(15_000));
        assert_eq!(
            effects,
            vec![SideEffect::IncomeAdjustment {
                club_id: "c1".into(),
                subscription_id: "s1".into(),
                amount_cents: -15_000,
            }]
        );
    }

    #[test]
    fn test_cancel_with_zero_refund_emits_nothing() {
        let (sub, effects) = cancel(subscription(0), &plan(0), ts(2025, 1, 16)).unwrap();
        assert_eq!(sub.refund_cents, Some(0));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_cancel_twice_rejected_and_refund_set_once() {
        let (sub, _) = cancel(subscription(30_000), &plan(0), ts(2025, 1, 16)).unwrap();
        let bound = sub.refund_cents;
        let res = cancel(sub.clone(), &plan(0), ts(2025, 1, 20));
        assert!(matches!(res, Err(EngineError::AlreadyCancelled { .. })));
        assert_eq!(sub.refund_cents, bound);
    }
}
