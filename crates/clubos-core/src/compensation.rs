//! # Coach Compensation
//!
//! Splits private-training revenue between the coach and the club.
//!
//! ## Models
//! - **Percent of subscription**: the coach earns a fixed share of what the
//!   member actually paid; the club keeps the rest.
//! - **External amount**: the coach earns a flat fee independent of
//!   collected revenue. The club share is whatever is left and **may be
//!   negative** when the fee exceeds collections — that is surfaced (and
//!   logged), never clamped, so operators notice pricing errors.
//!
//! Compensation values are validated at assignment time
//! ([`crate::validation::build_compensation`]); this module does not
//! re-validate.

use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::money::Money;
use crate::types::{CoachCompensation, CoachProfile, Subscription};

/// The division of a subscription's collected revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompensationSplit {
    /// What the coach earns.
    pub coach_share: Money,
    /// What the club keeps; negative when a flat fee is misconfigured.
    pub club_share: Money,
}

/// Computes the coach/club split for a subscription's collected revenue.
///
/// Returns `None` when no coach is assigned — plain memberships have no
/// split to compute.
pub fn split(subscription: &Subscription) -> Option<CompensationSplit> {
    let assignment = subscription.coach.as_ref()?;
    let paid = subscription.paid();

    let coach_share = match assignment.compensation {
        CoachCompensation::SubscriptionPercent(share) => paid.share_of(share),
        CoachCompensation::ExternalAmount(fee) => fee,
    };
    let club_share = paid - coach_share;

    if club_share.is_negative() {
        warn!(
            subscription_id = %subscription.id,
            coach_id = %assignment.coach_id,
            coach_share = %coach_share,
            club_share = %club_share,
            "coach fee exceeds collected revenue"
        );
    }

    Some(CompensationSplit {
        coach_share,
        club_share,
    })
}

/// The coach's share of a single payment.
///
/// Percent compensation accrues proportionally with every payment; a flat
/// external fee does not scale with payments and is attributed separately
/// by the payroll engine (to the period of the subscription's first
/// payment).
pub fn payment_share(compensation: &CoachCompensation, amount: Money) -> Money {
    match compensation {
        CoachCompensation::SubscriptionPercent(share) => amount.share_of(*share),
        CoachCompensation::ExternalAmount(_) => Money::zero(),
    }
}

/// Rejects a coach assignment when the coach is at their trainee cap.
///
/// `active_private_count` is the coach's current number of active private
/// subscriptions, supplied by the directory read model. A cap of zero
/// means uncapped.
pub fn ensure_coach_capacity(
    coach: &CoachProfile,
    active_private_count: i64,
) -> EngineResult<()> {
    if coach.max_trainees > 0 && active_private_count >= coach.max_trainees {
        return Err(EngineError::CoachCapacityExceeded {
            coach_id: coach.id.clone(),
            max_trainees: coach.max_trainees,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
