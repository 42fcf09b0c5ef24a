//! # Admission Control
//!
//! Decides whether a subscription may register one more gym entry "now".
//!
//! ## Decision Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RFID scan at the door                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  caller: is_rate_limited? ── yes ──► bounce (no engine call)            │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  cancelled? ──► Denied(Cancelled)      (never suspended)                │
//! │  frozen today? ──► Denied(Frozen)      ┐                                │
//! │  entries exhausted? ──► Denied(Max)    ├ skipped when policy            │
//! │  plan retired? ──► Denied(TypeInactive)┘ suspends restrictions          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  entry_count += 1, AdmissionEvent for the attendance log                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Caller Contract
//! Admission requests for the same member must be serialized, and at most
//! one may succeed per rolling 60-second window per member, independent of
//! club. The engine supplies the pure window check ([`is_rate_limited`]);
//! the caller owns the serialization and the lookup of the member's last
//! admission timestamp.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{DenialReason, EngineError, EngineResult};
use crate::freeze::is_currently_frozen;
use crate::types::{AdmissionEvent, FreezeRequest, PolicyConfig, Subscription, SubscriptionType};
use crate::ADMISSION_WINDOW_SECS;

// =============================================================================
// Queries
// =============================================================================

/// Why the subscription cannot be admitted right now, if any reason exists.
///
/// Checks run in a fixed order; cancellation wins over everything and is
/// never suspended by policy.
pub fn denial_reason(
    subscription: &Subscription,
    plan: &SubscriptionType,
    freezes: &[FreezeRequest],
    policy: PolicyConfig,
    now: DateTime<Utc>,
) -> Option<DenialReason> {
    if subscription.is_cancelled {
        return Some(DenialReason::Cancelled);
    }

    if policy.admission_restrictions_suspended {
        return None;
    }

    if is_currently_frozen(freezes, now.date_naive()) {
        return Some(DenialReason::Frozen);
    }

    if plan.has_entry_limit() && subscription.entry_count >= plan.max_entries {
        return Some(DenialReason::MaxEntriesReached);
    }

    if !plan.is_active {
        return Some(DenialReason::TypeInactive);
    }

    None
}

/// Whether the subscription may register one more entry now.
pub fn can_admit(
    subscription: &Subscription,
    plan: &SubscriptionType,
    freezes: &[FreezeRequest],
    policy: PolicyConfig,
    now: DateTime<Utc>,
) -> bool {
    denial_reason(subscription, plan, freezes, policy, now).is_none()
}

/// Pure 60-second window check for the caller-side rate limiter.
///
/// Returns true when the member's previous admission is too recent. The
/// caller must check this (under per-member serialization) before calling
/// [`admit`].
pub fn is_rate_limited(last_admitted_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match last_admitted_at {
        Some(previous) => (now - previous).num_seconds() < ADMISSION_WINDOW_SECS,
        None => false,
    }
}

// =============================================================================
// Mutations
// =============================================================================

/// Registers one gym entry against the subscription.
///
/// On success the entry count increments and an [`AdmissionEvent`] is
/// returned for the door/attendance collaborator; on failure the typed
/// denial reason comes back in [`EngineError::AdmissionDenied`].
pub fn admit(
    mut subscription: Subscription,
    plan: &SubscriptionType,
    freezes: &[FreezeRequest],
    policy: PolicyConfig,
    now: DateTime<Utc>,
) -> EngineResult<(Subscription, AdmissionEvent)> {
    if let Some(reason) = denial_reason(&subscription, plan, freezes, policy, now) {
        return Err(EngineError::AdmissionDenied { reason });
    }

    subscription.entry_count += 1;
    subscription.updated_at = now;

    let event = AdmissionEvent::new(&subscription, now);

    debug!(
        subscription_id = %subscription.id,
        member_id = %subscription.member_id,
        entry_count = subscription.entry_count,
        "entry admitted"
    );

    Ok((subscription, event))
}

/// Reverses the last admission, e.g. when an admission record is deleted.
///
/// The entry count is floored at zero; revoking on a fresh subscription is
/// a no-op rather than an error, since record deletion is an administrative
/// correction.
pub fn revoke_last_admission(mut subscription: Subscription, now: DateTime<Utc>) -> Subscription {
    if subscription.entry_count > 0 {
        subscription.entry_count -= 1;
        subscription.updated_at = now;
    }
    subscription
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CompensationKind;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap()
    }

    fn plan(max_entries: i64) -> SubscriptionType {
        SubscriptionType {
            id: "t1".into(),
            club_id: "c1".into(),
            name: "10-Session Pack".into(),
            price_cents: 20_000,
            duration_days: 30,
            max_entries,
            max_freeze_days: 0,
            is_private_training: false,
            default_compensation_kind: CompensationKind::FromSubscriptionPercent,
            is_active: true,
            created_at: ts(2025, 1, 1),
        }
    }

    fn subscription() -> Subscription {
        Subscription {
            id: "s1".into(),
            club_id: "c1".into(),
            member_id: "m1".into(),
            type_id: "t1".into(),
            coach: None,
            start_date: date(2025, 1, 1),
            end_date: date(2025, 1, 31),
            entry_count: 0,
            price_cents: 20_000,
            paid_cents: 20_000,
            remaining_cents: 0,
            is_cancelled: false,
            cancellation_date: None,
            refund_cents: None,
            created_at: ts(2025, 1, 1),
            updated_at: ts(2025, 1, 1),
        }
    }

    fn active_freeze() -> FreezeRequest {
        FreezeRequest {
            id: "f1".into(),
            subscription_id: "s1".into(),
            requested_days: 10,
            start_date: date(2025, 1, 5),
            end_date: date(2025, 1, 15),
            is_active: true,
            cancelled_at: None,
            created_at: ts(2025, 1, 4),
        }
    }

    #[test]
    fn test_admit_increments_and_emits_event() {
        let (sub, event) = admit(
            subscription(),
            &plan(10),
            &[],
            PolicyConfig::default(),
            ts(2025, 1, 2),
        )
        .unwrap();
        assert_eq!(sub.entry_count, 1);
        assert_eq!(event.subscription_id, "s1");
        assert_eq!(event.member_id, "m1");
        assert_eq!(event.admitted_at, ts(2025, 1, 2));
    }

    #[test]
    fn test_cancelled_denied() {
        let mut sub = subscription();
        sub.is_cancelled = true;
        let res = admit(sub, &plan(10), &[], PolicyConfig::default(), ts(2025, 1, 2));
        assert!(matches!(
            res,
            Err(EngineError::AdmissionDenied {
                reason: DenialReason::Cancelled
            })
        ));
    }

    #[test]
    fn test_frozen_denied() {
        let res = admit(
            subscription(),
            &plan(10),
            &[active_freeze()],
            PolicyConfig::default(),
            ts(2025, 1, 10),
        );
        assert!(matches!(
            res,
            Err(EngineError::AdmissionDenied {
                reason: DenialReason::Frozen
            })
        ));
    }

    #[test]
    fn test_entry_cap_denied_exactly_at_limit() {
        let mut sub = subscription();
        let cap = plan(10);
        // Admit up to the cap
        for day in 0..10i64 {
            let now = ts(2025, 1, 2) + Duration::hours(day * 25);
            let (next, _) = admit(sub, &cap, &[], PolicyConfig::default(), now).unwrap();
            sub = next;
        }
        assert_eq!(sub.entry_count, 10);
        // The eleventh is denied
        let res = admit(sub, &cap, &[], PolicyConfig::default(), ts(2025, 1, 20));
        assert!(matches!(
            res,
            Err(EngineError::AdmissionDenied {
                reason: DenialReason::MaxEntriesReached
            })
        ));
    }

    #[test]
    fn test_unlimited_plan_never_caps() {
        let mut sub = subscription();
        sub.entry_count = 500;
        assert!(can_admit(
            &sub,
            &plan(0),
            &[],
            PolicyConfig::default(),
            ts(2025, 1, 2)
        ));
    }

    #[test]
    fn test_inactive_type_denied() {
        let mut retired = plan(10);
        retired.is_active = false;
        let res = admit(
            subscription(),
            &retired,
            &[],
            PolicyConfig::default(),
            ts(2025, 1, 2),
        );
        assert!(matches!(
            res,
            Err(EngineError::AdmissionDenied {
                reason: DenialReason::TypeInactive
            })
        ));
    }

    #[test]
    fn test_suspended_policy_skips_restrictions_but_not_cancellation() {
        let policy = PolicyConfig {
            admission_restrictions_suspended: true,
        };

        // Frozen + retired plan + at cap: all waved through
        let mut sub = subscription();
        sub.entry_count = 10;
        let mut retired = plan(10);
        retired.is_active = false;
        assert!(can_admit(&sub, &retired, &[active_freeze()], policy, ts(2025, 1, 10)));

        // Cancellation still denies
        sub.is_cancelled = true;
        assert!(!can_admit(&sub, &retired, &[], policy, ts(2025, 1, 10)));
    }

    #[test]
    fn test_rate_limit_window() {
        let now = ts(2025, 1, 2);
        assert!(!is_rate_limited(None, now));
        assert!(is_rate_limited(Some(now - Duration::seconds(59)), now));
        assert!(!is_rate_limited(Some(now - Duration::seconds(60)), now));
        assert!(!is_rate_limited(Some(now - Duration::minutes(5)), now));
    }

    #[test]
    fn test_revoke_floors_at_zero() {
        let sub = subscription();
        let sub = revoke_last_admission(sub, ts(2025, 1, 2));
        assert_eq!(sub.entry_count, 0);

        let mut sub = subscription();
        sub.entry_count = 3;
        let sub = revoke_last_admission(sub, ts(2025, 1, 2));
        assert_eq!(sub.entry_count, 2);
    }
}
