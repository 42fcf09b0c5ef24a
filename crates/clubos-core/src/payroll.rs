//! # Payroll Engine
//!
//! Derives an employee's pay for a period from attendance records,
//! employment contracts, and private-training compensation, then finalizes
//! it into an expense.
//!
//! ## Computation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  compute_draft(employee, period)                                        │
//! │                                                                         │
//! │  contract   = latest contract effective at period start                 │
//! │  actual     = Σ closed shifts at this club checked in within the period │
//! │  absent     = max(0, expected − actual)                                 │
//! │  base       = actual hours × rate      (no contract ⇒ all four zero)    │
//! │  absence    = absent hours × rate                                       │
//! │  private    = Σ coach shares of payments collected this period          │
//! │  deductions = absence + manual deductions                               │
//! │  total      = base + private + bonuses − deductions                     │
//! │                                                                         │
//! │  finalize(): Draft → Finalized, one-way; books an Expense side effect   │
//! │  and freezes the record against recomputation.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Caller Contract
//! Finalization must be serialized per (employee, period) pair, or two
//! concurrent finalizes could book the expense twice.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::compensation::payment_share;
use crate::error::{EngineError, EngineResult};
use crate::money::Money;
use crate::types::{
    CoachCompensation, EmployeeContract, Payment, Payroll, PayrollDeduction, PayrollPeriod,
    SideEffect, StaffAttendance, Subscription,
};
use crate::{MINUTES_PER_HOUR, PAYROLL_EXPENSE_CATEGORY};

// =============================================================================
// Inputs
// =============================================================================

/// Read models a payroll draft is computed from; all supplied by the
/// persistence layer, none loaded here.
#[derive(Debug, Clone, Copy)]
pub struct PayrollInputs<'a> {
    /// The employee's contracts (any club-scoped filtering done upstream).
    pub contracts: &'a [EmployeeContract],

    /// Shift records; open shifts are ignored, never estimated.
    pub attendance: &'a [StaffAttendance],

    /// Scheduled minutes for the period.
    pub expected_minutes: i64,

    /// Manager-entered bonuses in cents.
    pub bonuses_cents: i64,

    /// Manual deductions for this employee and period.
    pub deductions: &'a [PayrollDeduction],

    /// Private-training revenue context; `None` for non-coaching staff.
    pub coaching: Option<CoachingRevenue<'a>>,
}

/// The coach's private subscriptions and their payment ledgers.
#[derive(Debug, Clone, Copy)]
pub struct CoachingRevenue<'a> {
    pub subscriptions: &'a [Subscription],
    pub payments: &'a [Payment],
}

// =============================================================================
// Contract Resolution
// =============================================================================

/// Resolves the contract effective for an employee on a date: the latest
/// start among contracts covering that day.
///
/// The error is informational — [`compute_draft`] maps it to zeroed hours
/// for commission-only staff rather than failing.
pub fn effective_contract<'a>(
    contracts: &'a [EmployeeContract],
    employee_id: &str,
    as_of: NaiveDate,
) -> EngineResult<&'a EmployeeContract> {
    contracts
        .iter()
        .filter(|c| c.employee_id == employee_id && c.covers(as_of))
        .max_by_key(|c| c.start_date)
        .ok_or_else(|| EngineError::NoEffectiveContract {
            employee_id: employee_id.to_string(),
            as_of: as_of.to_string(),
        })
}

// =============================================================================
// Derivations
// =============================================================================

/// Worked minutes from closed shifts checked in within the period, at the
/// period's club.
///
/// Shifts worked at another club fall into that club's payroll, never this
/// one's.
pub fn actual_minutes(
    attendance: &[StaffAttendance],
    employee_id: &str,
    period: &PayrollPeriod,
) -> i64 {
    attendance
        .iter()
        .filter(|a| {
            a.employee_id == employee_id
                && a.club_id == period.club_id
                && period.contains_timestamp(a.check_in)
        })
        .filter_map(StaffAttendance::worked_minutes)
        .sum()
}

/// Pay for worked minutes at an hourly rate, rounded half-up to the cent.
fn salary_for_minutes(hourly_rate: Money, minutes: i64) -> Money {
    let cents = (2 * hourly_rate.cents() as i128 * minutes as i128 + MINUTES_PER_HOUR as i128)
        / (2 * MINUTES_PER_HOUR as i128);
    Money::from_cents(cents as i64)
}

/// The coach's share of private-training revenue collected in the period.
///
/// Percent compensation accrues per payment whose timestamp falls in the
/// period. A flat external fee does not scale with payments; it is
/// attributed once, to the period containing the subscription's first
/// recorded payment.
pub fn private_earnings(
    coaching: &CoachingRevenue<'_>,
    coach_id: &str,
    period: &PayrollPeriod,
) -> Money {
    let mut total = Money::zero();

    for subscription in coaching.subscriptions {
        let Some(assignment) = subscription.coach.as_ref() else {
            continue;
        };
        if assignment.coach_id != coach_id {
            continue;
        }

        let ledger: Vec<&Payment> = coaching
            .payments
            .iter()
            .filter(|p| p.subscription_id == subscription.id)
            .collect();

        match assignment.compensation {
            CoachCompensation::SubscriptionPercent(_) => {
                for payment in ledger.iter().filter(|p| period.contains_timestamp(p.paid_at)) {
                    total += payment_share(&assignment.compensation, payment.amount());
                }
            }
            CoachCompensation::ExternalAmount(fee) => {
                let first_payment = ledger.iter().min_by_key(|p| p.paid_at);
                if first_payment.is_some_and(|p| period.contains_timestamp(p.paid_at)) {
                    total += fee;
                }
            }
        }
    }

    total
}

// =============================================================================
// Draft Computation
// =============================================================================

/// Computes one employee's payroll draft for a period.
///
/// Missing contract ⇒ zeroed hours, base salary, and absence deduction
/// (commission-only coaches still earn their private share and bonuses).
pub fn compute_draft(
    employee_id: &str,
    period: &PayrollPeriod,
    inputs: &PayrollInputs<'_>,
    now: DateTime<Utc>,
) -> Payroll {
    let contract = effective_contract(inputs.contracts, employee_id, period.start_date).ok();

    let (actual, absent, base, absence_deduction) = match contract {
        Some(contract) => {
            let actual = actual_minutes(inputs.attendance, employee_id, period);
            let absent = (inputs.expected_minutes - actual).max(0);
            let base = salary_for_minutes(contract.hourly_rate(), actual);
            let absence_deduction = salary_for_minutes(contract.hourly_rate(), absent);
            (actual, absent, base, absence_deduction)
        }
        None => (0, 0, Money::zero(), Money::zero()),
    };

    let private = inputs
        .coaching
        .as_ref()
        .map(|revenue| private_earnings(revenue, employee_id, period))
        .unwrap_or_default();

    let manual: Money = inputs
        .deductions
        .iter()
        .filter(|d| d.employee_id == employee_id && d.period_id == period.id)
        .map(PayrollDeduction::amount)
        .sum();

    let total_deductions = absence_deduction + manual;
    let bonuses = Money::from_cents(inputs.bonuses_cents);
    let total_salary = base + private + bonuses - total_deductions;

    debug!(
        employee_id,
        period_id = %period.id,
        actual_minutes = actual,
        base = %base,
        private = %private,
        total = %total_salary,
        "payroll draft computed"
    );

    Payroll {
        id: Uuid::new_v4().to_string(),
        employee_id: employee_id.to_string(),
        period_id: period.id.clone(),
        expected_minutes: inputs.expected_minutes,
        actual_minutes: actual,
        absent_minutes: absent,
        base_salary_cents: base.cents(),
        absence_deduction_cents: absence_deduction.cents(),
        private_earnings_cents: private.cents(),
        bonuses_cents: inputs.bonuses_cents,
        total_deductions_cents: total_deductions.cents(),
        total_salary_cents: total_salary.cents(),
        is_finalized: false,
        finalized_at: None,
        created_at: now,
    }
}

// =============================================================================
// Finalization
// =============================================================================

/// Finalizes a payroll draft into a booked expense.
///
/// The period must be the one the draft was computed for (its club takes
/// the expense); a mismatch fails with [`EngineError::PeriodMismatch`].
///
/// One-way: a second finalize fails with [`EngineError::AlreadyFinalized`]
/// and must not emit a second expense. After this the record is frozen —
/// later attendance edits never trigger recomputation.
pub fn finalize(
    mut payroll: Payroll,
    period: &PayrollPeriod,
    now: DateTime<Utc>,
) -> EngineResult<(Payroll, Vec<SideEffect>)> {
    if payroll.period_id != period.id {
        return Err(EngineError::PeriodMismatch {
            payroll_id: payroll.id,
            expected_period_id: payroll.period_id,
            period_id: period.id.clone(),
        });
    }

    if payroll.is_finalized {
        return Err(EngineError::AlreadyFinalized {
            payroll_id: payroll.id,
        });
    }

    payroll.is_finalized = true;
    payroll.finalized_at = Some(now);

    let effects = vec![SideEffect::Expense {
        club_id: period.club_id.clone(),
        payroll_id: payroll.id.clone(),
        amount_cents: payroll.total_salary_cents,
        category: PAYROLL_EXPENSE_CATEGORY.to_string(),
    }];

    debug!(
        payroll_id = %payroll.id,
        employee_id = %payroll.employee_id,
        total = %payroll.total_salary(),
        "payroll finalized"
    );

    Ok((payroll, effects))
}

// =============================================================================
// Unit Tests
// =============================================================================
