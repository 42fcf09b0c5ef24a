//! # Domain Types
//!
//! Core domain records for the subscription lifecycle and settlement engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Records                                  │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐      │
//! │  │ SubscriptionType │  │   Subscription   │  │   FreezeRequest  │      │
//! │  │  ──────────────  │  │  ──────────────  │  │  ──────────────  │      │
//! │  │  price_cents     │  │  member_id       │  │  requested_days  │      │
//! │  │  duration_days   │  │  start/end date  │  │  start/end date  │      │
//! │  │  max_entries     │  │  entry_count     │  │  is_active       │      │
//! │  │  max_freeze_days │  │  paid/remaining  │  │  cancelled_at    │      │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────┘      │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐      │
//! │  │     Payment      │  │ EmployeeContract │  │     Payroll      │      │
//! │  │  amount_cents    │  │  hourly_rate     │  │  hours, salary,  │      │
//! │  │  method, paid_at │  │  start/end date  │  │  deductions, ... │      │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every record has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business keys (member_id + type, employee_id + period) alongside
//!
//! ## Snapshot Discipline
//! The engine never loads anything: every operation takes the current
//! records as arguments and returns updated copies. Catalog data
//! ([`SubscriptionType`]) is read-only to the engine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::{Money, RevenueShare};

// =============================================================================
// Subscription Type (catalog)
// =============================================================================

/// A membership plan from the club catalog.
///
/// Immutable per use: the engine reads it, never writes it. Pricing changes
/// in the catalog do not retroactively change sold subscriptions, because a
/// [`Subscription`] binds its effective price at creation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubscriptionType {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Club this plan belongs to (multi-tenant scoping).
    pub club_id: String,

    /// Display name ("Gold Monthly", "10-Session PT Pack").
    pub name: String,

    /// List price in cents.
    pub price_cents: i64,

    /// Membership length in days; end date = start date + duration.
    pub duration_days: i64,

    /// Maximum gym entries; 0 means unlimited.
    pub max_entries: i64,

    /// Maximum freeze (pause) days a member may bank over the term.
    pub max_freeze_days: i64,

    /// Private-training plan: admits a coach assignment and a revenue split.
    pub is_private_training: bool,

    /// Default compensation model offered when a coach is assigned.
    pub default_compensation_kind: CompensationKind,

    /// Whether the plan is still sold/usable (soft retire).
    pub is_active: bool,

    /// When the plan was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl SubscriptionType {
    /// Returns the list price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether this plan caps the number of gym entries.
    #[inline]
    pub fn has_entry_limit(&self) -> bool {
        self.max_entries > 0
    }
}

// =============================================================================
// Coach Compensation
// =============================================================================

/// How a coach is paid for a private-training subscription.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CompensationKind {
    /// Coach earns a percentage of what the member actually paid.
    FromSubscriptionPercent,
    /// Coach earns a flat fee, independent of collected revenue.
    ExternalAmount,
}

/// A coach's compensation terms, validated at assignment time.
///
/// Modeled as an enum so a percent split can never carry a flat amount and
/// vice versa. Built through [`crate::validation::build_compensation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CoachCompensation {
    /// Percentage of collected revenue, in basis points (0..=10000).
    SubscriptionPercent(RevenueShare),
    /// Flat fee in cents (>= 0).
    ExternalAmount(Money),
}

impl CoachCompensation {
    /// The kind tag, for persistence and catalog defaults.
    pub fn kind(&self) -> CompensationKind {
        match self {
            CoachCompensation::SubscriptionPercent(_) => CompensationKind::FromSubscriptionPercent,
            CoachCompensation::ExternalAmount(_) => CompensationKind::ExternalAmount,
        }
    }
}

/// A coach assigned to a private-training subscription.
///
/// ## Invariant
/// Compensation terms exist if and only if a coach is assigned; bundling
/// them in one struct makes the illegal state unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CoachAssignment {
    /// Coach identifier (UUID v4 of the staff member).
    pub coach_id: String,

    /// How the coach's cut is computed.
    pub compensation: CoachCompensation,
}

/// Directory read-model for a coach, supplied by the identity collaborator.
///
/// Only what the capacity check needs; profile CRUD lives elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CoachProfile {
    /// Coach identifier (UUID v4).
    pub id: String,

    /// Maximum concurrent active private subscriptions; 0 means uncapped.
    pub max_trainees: i64,
}

// =============================================================================
// Subscription
// =============================================================================

/// A member's purchased membership.
///
/// ## Lifecycle
/// Created when a member purchases a plan; mutated by every engine
/// component; never physically deleted while payments or attendance
/// reference it. Cancellation is a logical state, not deletion.
///
/// ## Derived Fields
/// `paid_cents` and `remaining_cents` are derived from the payment ledger
/// and recomputed on every recorded payment; `end_date` is derived at
/// creation and mutated only by the freeze ledger (extension/clawback)
/// and renewal.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Subscription {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Club this subscription belongs to.
    pub club_id: String,

    /// The purchasing member.
    pub member_id: String,

    /// Catalog plan this subscription was sold from.
    pub type_id: String,

    /// Coach assignment, present only on private-training subscriptions.
    pub coach: Option<CoachAssignment>,

    /// First usable day.
    #[ts(as = "String")]
    pub start_date: NaiveDate,

    /// Last usable day; start + duration at creation, moved by freezes.
    #[ts(as = "String")]
    pub end_date: NaiveDate,

    /// Gym entries consumed so far; monotonic except for explicit
    /// admission-record deletion.
    pub entry_count: i64,

    /// Effective price bound at creation (list price minus any special
    /// offer). This, not the catalog price, is the overpayment ceiling.
    pub price_cents: i64,

    /// Sum of recorded payments.
    pub paid_cents: i64,

    /// price - paid, never negative.
    pub remaining_cents: i64,

    /// Logical cancellation flag; terminal.
    pub is_cancelled: bool,

    /// Day the subscription was cancelled.
    #[ts(as = "Option<String>")]
    pub cancellation_date: Option<NaiveDate>,

    /// Refund computed exactly once at cancellation.
    pub refund_cents: Option<i64>,

    /// When the subscription was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the subscription was last mutated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Returns the effective price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the amount paid so far as Money.
    #[inline]
    pub fn paid(&self) -> Money {
        Money::from_cents(self.paid_cents)
    }

    /// Returns the remaining balance as Money.
    #[inline]
    pub fn remaining(&self) -> Money {
        Money::from_cents(self.remaining_cents)
    }

    /// Total membership length in days.
    #[inline]
    pub fn term_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

// =============================================================================
// Freeze Request
// =============================================================================

/// A membership pause banked against the plan's freeze-day allowance.
///
/// ## Closing
/// A request closes one of two ways:
/// - natural expiry: its window passes; `is_active` flips to false with
///   `cancelled_at` left empty (see [`crate::freeze::settle_expired`]);
///   its full `requested_days` then count against the allowance
/// - explicit cancellation: unused days are clawed back from the
///   subscription's end date and the request stops counting beyond the
///   days actually used
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FreezeRequest {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The frozen subscription.
    pub subscription_id: String,

    /// Days requested; strictly positive.
    pub requested_days: i64,

    /// First frozen day.
    #[ts(as = "String")]
    pub start_date: NaiveDate,

    /// Last frozen day; start + requested_days.
    #[ts(as = "String")]
    pub end_date: NaiveDate,

    /// Whether the freeze window is still open.
    pub is_active: bool,

    /// Set only on explicit cancellation; natural expiry leaves it empty.
    #[ts(as = "Option<String>")]
    pub cancelled_at: Option<DateTime<Utc>>,

    /// When the request was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl FreezeRequest {
    /// Whether the freeze window contains the given day (inclusive).
    #[inline]
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }

    /// Whether the window has fully passed.
    #[inline]
    pub fn has_lapsed(&self, today: NaiveDate) -> bool {
        self.end_date < today
    }

    /// Ran to natural completion (closed without explicit cancellation).
    #[inline]
    pub fn ran_to_completion(&self) -> bool {
        !self.is_active && self.cancelled_at.is_none()
    }
}

// =============================================================================
// Payment
// =============================================================================

/// How a member paid.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash at the front desk.
    Cash,
    /// Card on an external terminal.
    Card,
    /// Bank transfer reconciled by the back office.
    BankTransfer,
}

/// A payment towards a subscription.
///
/// A subscription can have several payments (installments); the ledger
/// enforces that their sum never exceeds the effective price.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Payment {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The subscription being paid for.
    pub subscription_id: String,

    /// Amount paid in cents; strictly positive.
    pub amount_cents: i64,

    /// How the member paid.
    pub method: PaymentMethod,

    /// When the payment was taken; payroll attributes coach earnings to
    /// the period containing this timestamp.
    #[ts(as = "String")]
    pub paid_at: DateTime<Utc>,
}

impl Payment {
    /// Returns the payment amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Admission Event
// =============================================================================

/// A successful gym entry, handed to the door/attendance collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AdmissionEvent {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The subscription the entry was registered against.
    pub subscription_id: String,

    /// The admitted member.
    pub member_id: String,

    /// Club where the entry happened.
    pub club_id: String,

    /// Entry timestamp; feeds the caller-side 60-second rate limiter.
    #[ts(as = "String")]
    pub admitted_at: DateTime<Utc>,
}

impl AdmissionEvent {
    /// Builds an admission event for a subscription at the given instant.
    pub fn new(subscription: &Subscription, now: DateTime<Utc>) -> Self {
        AdmissionEvent {
            id: Uuid::new_v4().to_string(),
            subscription_id: subscription.id.clone(),
            member_id: subscription.member_id.clone(),
            club_id: subscription.club_id.clone(),
            admitted_at: now,
        }
    }
}

// =============================================================================
// Staff Attendance & Contracts
// =============================================================================

/// An employee shift check-in/out pair, read-only to the engine.
///
/// Open shifts (no check-out) are excluded from payroll hours, never
/// estimated.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StaffAttendance {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Club where the shift was worked.
    pub club_id: String,

    /// The employee on shift.
    pub employee_id: String,

    /// Shift start.
    #[ts(as = "String")]
    pub check_in: DateTime<Utc>,

    /// Shift end; empty while the shift is open.
    #[ts(as = "Option<String>")]
    pub check_out: Option<DateTime<Utc>>,
}

impl StaffAttendance {
    /// Worked minutes for a closed shift; `None` while open. Clock skew
    /// (check-out before check-in) counts as zero, not negative.
    pub fn worked_minutes(&self) -> Option<i64> {
        self.check_out
            .map(|out| (out - self.check_in).num_minutes().max(0))
    }
}

/// An employment contract; at most one effective per (employee, club) on
/// any given date.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmployeeContract {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Club the contract is with.
    pub club_id: String,

    /// The contracted employee.
    pub employee_id: String,

    /// Hourly rate in cents.
    pub hourly_rate_cents: i64,

    /// First effective day.
    #[ts(as = "String")]
    pub start_date: NaiveDate,

    /// Last effective day; open-ended when empty.
    #[ts(as = "Option<String>")]
    pub end_date: Option<NaiveDate>,
}

impl EmployeeContract {
    /// Returns the hourly rate as Money.
    #[inline]
    pub fn hourly_rate(&self) -> Money {
        Money::from_cents(self.hourly_rate_cents)
    }

    /// Whether the contract is effective on the given day.
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date <= day && self.end_date.map_or(true, |end| day <= end)
    }
}

// =============================================================================
// Payroll
// =============================================================================

/// A club-scoped pay period; at most one active per club.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PayrollPeriod {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Club the period belongs to.
    pub club_id: String,

    /// First day of the period.
    #[ts(as = "String")]
    pub start_date: NaiveDate,

    /// Last day of the period (inclusive).
    #[ts(as = "String")]
    pub end_date: NaiveDate,

    /// Whether the period is the club's current open period.
    pub is_active: bool,
}

impl PayrollPeriod {
    /// Whether a day falls inside the period (inclusive on both ends).
    #[inline]
    pub fn contains_date(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }

    /// Whether a timestamp's calendar day falls inside the period.
    #[inline]
    pub fn contains_timestamp(&self, ts: DateTime<Utc>) -> bool {
        self.contains_date(ts.date_naive())
    }
}

/// A manual payroll deduction entered by a manager (uniform damage,
/// advance repayment, ...). Absence deductions are computed, not stored
/// here.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PayrollDeduction {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The deducted employee.
    pub employee_id: String,

    /// The period the deduction applies to.
    pub period_id: String,

    /// Deduction in cents; positive.
    pub amount_cents: i64,

    /// Human-readable reason shown on the payslip.
    pub reason: String,
}

impl PayrollDeduction {
    /// Returns the deduction as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

/// One employee's pay for one period.
///
/// ## State Machine
/// `Draft → Finalized`, one-way. A finalized payroll is frozen: it must
/// not be recomputed even if underlying attendance later changes, because
/// its expense has already been booked.
///
/// Hours are stored in minutes so shift math stays integral; rates are
/// per hour.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Payroll {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The paid employee.
    pub employee_id: String,

    /// The period this pay covers; one payroll per (employee, period).
    pub period_id: String,

    /// Scheduled minutes for the period.
    pub expected_minutes: i64,

    /// Worked minutes derived from closed attendance records.
    pub actual_minutes: i64,

    /// max(0, expected - actual).
    pub absent_minutes: i64,

    /// actual hours x hourly rate.
    pub base_salary_cents: i64,

    /// absent hours x hourly rate.
    pub absence_deduction_cents: i64,

    /// Coach share of private-training revenue collected this period.
    pub private_earnings_cents: i64,

    /// Manager-entered bonuses.
    pub bonuses_cents: i64,

    /// absence deduction + manual deductions.
    pub total_deductions_cents: i64,

    /// base + private earnings + bonuses - total deductions.
    pub total_salary_cents: i64,

    /// One-way finalization flag.
    pub is_finalized: bool,

    /// When the payroll was finalized.
    #[ts(as = "Option<String>")]
    pub finalized_at: Option<DateTime<Utc>>,

    /// When the draft was computed.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Payroll {
    /// Returns the total salary as Money (may be negative when deductions
    /// exceed earnings; surfaced, not clamped, so managers notice).
    #[inline]
    pub fn total_salary(&self) -> Money {
        Money::from_cents(self.total_salary_cents)
    }
}

// =============================================================================
// Side Effects
// =============================================================================

/// A financial instruction the persistence layer must apply in the same
/// transaction as the domain mutation that produced it.
///
/// Replaces implicit save-hooks: the engine never writes ledgers itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SideEffect {
    /// Adjust recognized income; negative for refunds.
    IncomeAdjustment {
        club_id: String,
        subscription_id: String,
        amount_cents: i64,
    },
    /// Book an expense (payroll finalization).
    Expense {
        club_id: String,
        payroll_id: String,
        amount_cents: i64,
        category: String,
    },
}

// =============================================================================
// Policy Configuration
// =============================================================================

/// Call-time policy switches.
///
/// Replaces the legacy process-wide "restrictions suspended" toggle: the
/// caller passes policy explicitly into each admission, so behaviour is
/// auditable per request and testable without global state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PolicyConfig {
    /// When true, freeze/entry-limit/inactive-type denials are skipped
    /// (maintenance windows, data migrations). A cancelled subscription is
    /// still refused.
    pub admission_restrictions_suspended: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_freeze_request_window() {
        let req = FreezeRequest {
            id: "f1".into(),
            subscription_id: "s1".into(),
            requested_days: 10,
            start_date: date(2025, 3, 1),
            end_date: date(2025, 3, 11),
            is_active: true,
            cancelled_at: None,
            created_at: Utc::now(),
        };
        assert!(req.covers(date(2025, 3, 1)));
        assert!(req.covers(date(2025, 3, 11)));
        assert!(!req.covers(date(2025, 3, 12)));
        assert!(!req.has_lapsed(date(2025, 3, 11)));
        assert!(req.has_lapsed(date(2025, 3, 12)));
    }

    #[test]
    fn test_attendance_minutes() {
        let check_in = Utc.with_ymd_and_hms(2025, 2, 3, 9, 0, 0).unwrap();
        let open = StaffAttendance {
            id: "a1".into(),
            club_id: "c1".into(),
            employee_id: "e1".into(),
            check_in,
            check_out: None,
        };
        assert_eq!(open.worked_minutes(), None);

        let closed = StaffAttendance {
            check_out: Some(Utc.with_ymd_and_hms(2025, 2, 3, 17, 30, 0).unwrap()),
            ..open.clone()
        };
        assert_eq!(closed.worked_minutes(), Some(510));

        // Clock skew never yields negative minutes
        let skewed = StaffAttendance {
            check_out: Some(Utc.with_ymd_and_hms(2025, 2, 3, 8, 0, 0).unwrap()),
            ..open
        };
        assert_eq!(skewed.worked_minutes(), Some(0));
    }

    #[test]
    fn test_contract_coverage() {
        let contract = EmployeeContract {
            id: "c1".into(),
            club_id: "club".into(),
            employee_id: "e1".into(),
            hourly_rate_cents: 5000,
            start_date: date(2025, 1, 1),
            end_date: Some(date(2025, 6, 30)),
        };
        assert!(contract.covers(date(2025, 1, 1)));
        assert!(contract.covers(date(2025, 6, 30)));
        assert!(!contract.covers(date(2024, 12, 31)));
        assert!(!contract.covers(date(2025, 7, 1)));

        let open_ended = EmployeeContract {
            end_date: None,
            ..contract
        };
        assert!(open_ended.covers(date(2030, 1, 1)));
    }

    #[test]
    fn test_period_contains_timestamp() {
        let period = PayrollPeriod {
            id: "p1".into(),
            club_id: "c1".into(),
            start_date: date(2025, 2, 1),
            end_date: date(2025, 2, 28),
            is_active: true,
        };
        let inside = Utc.with_ymd_and_hms(2025, 2, 28, 23, 59, 0).unwrap();
        let outside = Utc.with_ymd_and_hms(2025, 3, 1, 0, 1, 0).unwrap();
        assert!(period.contains_timestamp(inside));
        assert!(!period.contains_timestamp(outside));
    }

    #[test]
    fn test_compensation_kind_tag() {
        let pct = CoachCompensation::SubscriptionPercent(RevenueShare::from_bps(7000));
        assert_eq!(pct.kind(), CompensationKind::FromSubscriptionPercent);
        let flat = CoachCompensation::ExternalAmount(Money::from_cents(10_000));
        assert_eq!(flat.kind(), CompensationKind::ExternalAmount);
    }

    #[test]
    fn test_side_effect_wire_shape() {
        // Side-effect instructions cross the boundary to the persistence
        // layer as JSON; the tag must stay snake_case and stable.
        let refund = SideEffect::IncomeAdjustment {
            club_id: "c1".into(),
            subscription_id: "s1".into(),
            amount_cents: -7500,
        };
        let json = serde_json::to_value(&refund).unwrap();
        assert_eq!(json["income_adjustment"]["amount_cents"], -7500);

        let expense = SideEffect::Expense {
            club_id: "c1".into(),
            payroll_id: "pay1".into(),
            amount_cents: 605_000,
            category: "Payroll".into(),
        };
        let encoded = serde_json::to_string(&expense).unwrap();
        let decoded: SideEffect = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, expense);
    }
}
