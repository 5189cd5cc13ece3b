use tracing::{debug, warn};

use super::{AMOUNT_TOLERANCE, round_cents};
use crate::core::errors::{LedgerError, LedgerResult};
use crate::core::models::{BalanceMap, Transfer};

const HALF_CENT: f64 = AMOUNT_TOLERANCE / 2.0;

/// Greedy debt simplification.
///
/// Creditors are matched largest first against debtors most-negative first;
/// each step moves `min(debt, credit)` and retires at least one side, so the
/// plan has at most `creditors + debtors - 1` transfers. Equal balances keep
/// member-id order, which makes the output deterministic.
///
/// Refuses to plan when the balances don't sum to zero.
///
/// Transfers are emitted in whole cents. A step that rounds to zero cents is
/// dropped, and a side retires once less than half a cent remains. Sub-cent
/// balances (ten creditors at +0.009 against one debtor at -0.09, say) are
/// therefore paid as rounded cents, and each transfer can differ from the
/// exact debt by up to half a cent.
pub fn plan_settlements(balances: &BalanceMap) -> LedgerResult<Vec<Transfer>> {
    let imbalance = balances.total();
    if imbalance.abs() >= AMOUNT_TOLERANCE {
        warn!(imbalance, "refusing to plan settlements for unbalanced ledger");
        return Err(LedgerError::ConservationViolation { imbalance });
    }

    let mut creditors: Vec<(&String, f64)> = balances.iter().filter(|(_, b)| *b > 0.0).collect();
    let mut debtors: Vec<(&String, f64)> = balances
        .iter()
        .filter(|(_, b)| *b < 0.0)
        .map(|(member, b)| (member, -b))
        .collect();

    // sort_by is stable: ties stay in member-id order
    creditors.sort_by(|a, b| b.1.total_cmp(&a.1));
    debtors.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut transfers = Vec::new();
    let (mut d, mut c) = (0, 0);
    while d < debtors.len() && c < creditors.len() {
        let amount = debtors[d].1.min(creditors[c].1);

        let rounded = round_cents(amount);
        if rounded > 0.0 {
            transfers.push(Transfer::new(debtors[d].0.as_str(), creditors[c].0.as_str(), rounded));
        }

        debtors[d].1 -= amount;
        creditors[c].1 -= amount;

        if debtors[d].1 < HALF_CENT {
            d += 1;
        }
        if creditors[c].1 < HALF_CENT {
            c += 1;
        }
    }

    debug!(
        creditors = creditors.len(),
        debtors = debtors.len(),
        transfers = transfers.len(),
        "planned settlements"
    );

    Ok(transfers)
}
