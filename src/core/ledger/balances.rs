use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use super::approx_eq;
use crate::core::errors::{LedgerError, LedgerResult};
use crate::core::models::{BalanceMap, BalanceReport, DataInconsistency, Expense, Settlement};

/// Reduces a group's expenses into per-member balances.
///
/// Every member in `members` starts at zero. The payer of each expense is
/// credited the full amount and every member in its splits is debited their
/// share. Expenses whose splits don't add up, or that mention someone outside
/// `members`, still contribute their raw numbers and produce a warning.
pub fn compute_group_balances(expenses: &[Expense], members: &[String]) -> BalanceReport {
    let known: BTreeSet<&str> = members.iter().map(String::as_str).collect();
    let mut balances = BalanceMap::new();
    let mut warnings = Vec::new();

    for member in members {
        balances.ensure(member);
    }

    for expense in expenses {
        apply_expense(expense, &known, &mut balances, &mut warnings);
    }

    debug!(
        expenses = expenses.len(),
        members = balances.len(),
        warnings = warnings.len(),
        "computed group balances"
    );

    BalanceReport { balances, warnings }
}

/// Same as [`compute_group_balances`], then applies every completed
/// settlement on top: the payer's balance rises by the amount and the
/// recipient's falls by it. Pending settlements are ignored.
pub fn compute_ledger_balances(
    expenses: &[Expense],
    settlements: &[Settlement],
    members: &[String],
) -> BalanceReport {
    let known: BTreeSet<&str> = members.iter().map(String::as_str).collect();
    let mut report = compute_group_balances(expenses, members);

    for settlement in settlements.iter().filter(|s| s.is_completed()) {
        for party in [&settlement.from, &settlement.to] {
            if !known.contains(party.as_str()) {
                report.warnings.push(unknown_member(&settlement.id, party));
            }
        }
        report.balances.adjust(&settlement.from, settlement.amount);
        report.balances.adjust(&settlement.to, -settlement.amount);
    }

    report
}

fn apply_expense(
    expense: &Expense,
    known: &BTreeSet<&str>,
    balances: &mut BalanceMap,
    warnings: &mut Vec<DataInconsistency>,
) {
    let split_total = expense.split_total();
    if !approx_eq(split_total, expense.amount) {
        warn!(
            expense_id = %expense.id,
            amount = expense.amount,
            split_total,
            "expense splits do not sum to its amount"
        );
        warnings.push(DataInconsistency::SplitSumMismatch {
            record_id: expense.id.clone(),
            amount: expense.amount,
            split_total,
        });
    }

    if !known.contains(expense.paid_by.as_str()) {
        warnings.push(unknown_member(&expense.id, &expense.paid_by));
    }
    balances.adjust(&expense.paid_by, expense.amount);

    for (member, share) in &expense.splits {
        if !known.contains(member.as_str()) {
            warnings.push(unknown_member(&expense.id, member));
        }
        balances.adjust(member, -share);
    }
}

fn unknown_member(record_id: &str, member: &str) -> DataInconsistency {
    warn!(record_id, member, "record references a member outside the group");
    DataInconsistency::UnknownMember {
        record_id: record_id.to_string(),
        member: member.to_string(),
    }
}

/// Splits `amount` evenly across `members`, working in cents so the shares
/// add back up to the amount exactly. Leftover cents go one each to the
/// first members in id order.
pub fn split_equally(amount: f64, members: &[String]) -> LedgerResult<BTreeMap<String, f64>> {
    let ordered: BTreeSet<&String> = members.iter().collect();
    if ordered.is_empty() {
        return Err(LedgerError::InvalidConfiguration(
            "cannot split an expense across zero members".to_string(),
        ));
    }
    if !amount.is_finite() || amount < 0.0 {
        return Err(LedgerError::InvalidConfiguration(format!(
            "cannot split invalid amount {}",
            amount
        )));
    }

    let total_cents = (amount * 100.0).round() as i64;
    let count = ordered.len() as i64;
    let base = total_cents / count;
    let remainder = total_cents % count;

    Ok(ordered
        .into_iter()
        .enumerate()
        .map(|(i, member)| {
            let cents = base + i64::from((i as i64) < remainder);
            (member.clone(), cents as f64 / 100.0)
        })
        .collect())
}
