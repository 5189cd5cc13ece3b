//! Pure ledger computations: balances, cross-group aggregation, settlement
//! planning and reconciliation. Nothing in here performs I/O or keeps state
//! between calls; callers fetch a snapshot and invoke these functions fresh
//! after every change.

pub mod aggregation;
pub mod balances;
pub mod planner;
pub mod reconciler;

pub use aggregation::aggregate_user_balances;
pub use balances::{compute_group_balances, compute_ledger_balances, split_equally};
pub use planner::plan_settlements;
pub use reconciler::filter_new_settlements;

/// Two amounts closer than this are treated as equal.
pub const AMOUNT_TOLERANCE: f64 = 0.01;

pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < AMOUNT_TOLERANCE
}

/// Whole cents for `amount`, or `None` when it carries more than two decimals.
pub(crate) fn exact_cents(amount: f64) -> Option<i64> {
    let cents = amount * 100.0;
    let rounded = cents.round();
    ((cents - rounded).abs() <= 1e-6).then_some(rounded as i64)
}

pub(crate) fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
