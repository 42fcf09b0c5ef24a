//! # Payment Ledger
//!
//! Records payments towards a subscription and keeps the derived balance
//! fields honest.
//!
//! ## Invariants
//! - Σ payments for a subscription never exceeds the subscription's
//!   **effective** price (the possibly-discounted price bound at creation,
//!   not the catalog list price)
//! - `paid_cents` is always recomputed as the sum of the ledger, never
//!   incremented blindly
//! - `remaining_cents = price - paid`, clamped at zero
//!
//! The caller supplies the subscription's existing payments and must run
//! the whole operation inside one transaction per subscription id, or two
//! concurrent installments could both pass the ceiling check.

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::money::Money;
use crate::types::{Payment, PaymentMethod, Subscription};
use crate::validation::validate_payment_amount;

/// Sum of a subscription's recorded payments.
pub fn paid_total(payments: &[Payment]) -> Money {
    payments.iter().map(Payment::amount).sum()
}

/// Records one payment and rederives the subscription's balances.
///
/// ## Failure Modes
/// - [`EngineError::InvalidAmount`] for zero or negative amounts
/// - [`EngineError::Overpayment`] when the ledger plus this payment would
///   exceed the effective price
pub fn record_payment(
    mut subscription: Subscription,
    existing: &[Payment],
    amount_cents: i64,
    method: PaymentMethod,
    now: DateTime<Utc>,
) -> EngineResult<(Subscription, Payment)> {
    validate_payment_amount(amount_cents).map_err(|_| EngineError::InvalidAmount {
        cents: amount_cents,
    })?;

    let already_paid = paid_total(existing);
    if already_paid.cents() + amount_cents > subscription.price_cents {
        return Err(EngineError::Overpayment {
            price_cents: subscription.price_cents,
            paid_cents: already_paid.cents(),
            attempted_cents: amount_cents,
        });
    }

    let payment = Payment {
        id: Uuid::new_v4().to_string(),
        subscription_id: subscription.id.clone(),
        amount_cents,
        method,
        paid_at: now,
    };

    let paid = already_paid + payment.amount();
    subscription.paid_cents = paid.cents();
    subscription.remaining_cents = (subscription.price() - paid).clamp_non_negative().cents();
    subscription.updated_at = now;

    debug!(
        subscription_id = %subscription.id,
        amount = %payment.amount(),
        paid = %subscription.paid(),
        remaining = %subscription.remaining(),
        "payment recorded"
    );

    Ok((subscription, payment))
}

// =============================================================================
// Unit Tests
// =============================================================================
