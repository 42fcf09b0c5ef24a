//! # clubos-core: Subscription Lifecycle & Settlement Engine
//!
//! This crate is the **heart** of ClubOS. It contains all the membership,
//! settlement, and payroll rules as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         ClubOS Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 HTTP/API Layer (out of repo)                    │   │
//! │  │   auth ──► routing ──► permission middleware ──► handlers       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ plain function calls                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ clubos-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │  ┌──────────┐ ┌─────────┐ ┌─────────┐ ┌────────┐ ┌──────────┐  │   │
//! │  │  │admission │ │ freeze  │ │ payment │ │ refund │ │ payroll  │  │   │
//! │  │  └──────────┘ └─────────┘ └─────────┘ └────────┘ └──────────┘  │   │
//! │  │  ┌──────────────┐ ┌───────────┐ ┌───────┐ ┌──────────────┐    │   │
//! │  │  │ lifecycle    │ │compensation│ │ money │ │ types/errors │    │   │
//! │  │  └──────────────┘ └───────────┘ └───────┘ └──────────────┘    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ aggregate + side-effect instructions   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              Persistence layer (out of repo)                    │   │
//! │  │   applies field updates, inserts, income/expense records        │   │
//! │  │   inside ONE serializable transaction per mutation              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Subscription, FreezeRequest, Payroll, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Typed domain failures
//! - [`validation`] - Input validation rules
//! - [`admission`] - Gym-entry admission control and the 60-second window
//! - [`freeze`] - Freeze-day allowance, end-date extension and clawback
//! - [`payment`] - Payment recording with the overpayment ceiling
//! - [`refund`] - Mid-term cancellation and prorated refunds
//! - [`compensation`] - Coach/club revenue split
//! - [`lifecycle`] - Derived subscription status + creation/coach assignment
//! - [`payroll`] - Attendance-driven salary computation and finalization
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every operation is deterministic - same input =
//!    same output. `status()` is a classifier, never a stored flag.
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here.
//! 3. **Integer Money**: All monetary values are in minor units (i64 cents).
//! 4. **Explicit Errors**: All failures are typed, never strings or panics.
//! 5. **Explicit Side Effects**: Mutations return the updated aggregate plus
//!    a list of [`types::SideEffect`] instructions. No hidden hooks.
//!
//! ## Concurrency Contract (caller-side)
//!
//! The engine never locks or retries. Callers must guarantee:
//! - at most one in-flight mutation per subscription id (row lock or
//!   optimistic-concurrency retry),
//! - at most one admission per member per rolling 60-second window
//!   (see [`admission::is_rate_limited`]),
//! - payroll finalization serialized per (employee, period) pair.
//!
//! ## Example Usage
//!
//! ```rust
//! use clubos_core::money::Money;
//! use clubos_core::money::RevenueShare;
//!
//! // Create money from cents (never from floats!)
//! let paid = Money::from_cents(100_000); // $1000.00
//!
//! // A coach on a 70% split earns $700.00 of it
//! let share = RevenueShare::from_bps(7000);
//! assert_eq!(paid.share_of(share).cents(), 70_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod admission;
pub mod compensation;
pub mod error;
pub mod freeze;
pub mod lifecycle;
pub mod money;
pub mod payment;
pub mod payroll;
pub mod refund;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use clubos_core::Money` instead of
// `use clubos_core::money::Money`

pub use error::{DenialReason, EngineError, EngineResult, ValidationError};
pub use lifecycle::SubscriptionStatus;
pub use money::{Money, RevenueShare};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Rolling admission window per member, in seconds.
///
/// ## Business Reason
/// A second RFID scan within a minute is a turnstile bounce or a tailgating
/// attempt, not a second visit. The caller must serialize admissions per
/// member and check [`admission::is_rate_limited`] before calling
/// [`admission::admit`].
pub const ADMISSION_WINDOW_SECS: i64 = 60;

/// Expense category tag attached to finalized payroll expenses.
///
/// The persistence layer groups financial records by this tag when building
/// ledgers; it must match the category the back office reports on.
pub const PAYROLL_EXPENSE_CATEGORY: &str = "Payroll";

/// Minutes per hour, named to keep payroll math self-describing.
pub const MINUTES_PER_HOUR: i64 = 60;

/// Maximum revenue share in basis points (100%).
pub const MAX_SHARE_BPS: u32 = 10_000;
