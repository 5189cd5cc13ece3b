//! Property-based tests for the pure ledger functions.
//!
//! These tests verify that:
//! - Balances always sum to zero when every expense is fully split
//! - Expense order never changes the resulting balances
//! - Applying a settlement plan brings every member back to zero
//! - A plan moves exactly the total owed to creditors
//! - Filtering recorded settlements is repeatable and only ever removes transfers

use std::collections::BTreeMap;

use chrono::Utc;
use proptest::prelude::*;
use splitledger::core::ledger::AMOUNT_TOLERANCE;
use splitledger::core::models::{BalanceMap, Expense, Settlement, SettlementStatus, Transfer};
use splitledger::{
    aggregate_user_balances, compute_group_balances, filter_new_settlements, plan_settlements, split_equally,
};

const MEMBERS: [&str; 5] = ["ana", "ben", "cho", "dev", "eli"];

fn member_ids() -> Vec<String> {
    MEMBERS.iter().map(|m| m.to_string()).collect()
}

/// Strategy for an expense paid by one member and split equally across a
/// non-empty subset of the group.
fn arb_expense() -> impl Strategy<Value = Expense> {
    (
        0..MEMBERS.len(),
        1i64..500_000,
        prop::collection::vec(any::<bool>(), MEMBERS.len()),
        "[a-z0-9]{8}",
    )
        .prop_filter("someone must share", |(_, _, mask, _)| mask.iter().any(|b| *b))
        .prop_map(|(payer, cents, mask, id)| {
            let sharers: Vec<String> = MEMBERS
                .iter()
                .zip(&mask)
                .filter(|(_, included)| **included)
                .map(|(m, _)| m.to_string())
                .collect();
            let amount = cents as f64 / 100.0;
            let now = Utc::now();
            Expense {
                id,
                group_id: "g".to_string(),
                description: "generated".to_string(),
                category: None,
                memo: None,
                amount,
                paid_by: MEMBERS[payer].to_string(),
                splits: split_equally(amount, &sharers).unwrap(),
                date: now,
                created_at: now,
            }
        })
}

/// Strategy for a zero-sum balance map expressed in whole cents.
fn arb_balances() -> impl Strategy<Value = BalanceMap> {
    prop::collection::vec(-100_000i64..100_000, MEMBERS.len() - 1).prop_map(|cents| {
        let last = -cents.iter().sum::<i64>();
        cents
            .into_iter()
            .chain(std::iter::once(last))
            .zip(MEMBERS)
            .map(|(c, m)| (m.to_string(), c as f64 / 100.0))
            .collect()
    })
}

fn arb_transfer() -> impl Strategy<Value = Transfer> {
    (0..MEMBERS.len(), 0..MEMBERS.len(), 1i64..5_000)
        .prop_filter("distinct parties", |(from, to, _)| from != to)
        .prop_map(|(from, to, cents)| Transfer::new(MEMBERS[from], MEMBERS[to], cents as f64 / 100.0))
}

fn as_pending(transfers: &[Transfer]) -> Vec<Settlement> {
    transfers
        .iter()
        .enumerate()
        .map(|(i, t)| Settlement {
            id: format!("s{}", i),
            group_id: "g".to_string(),
            from: t.from.clone(),
            to: t.to.clone(),
            amount: t.amount,
            remarks: None,
            date: Utc::now(),
            status: SettlementStatus::Pending,
            confirmed_by: None,
        })
        .collect()
}

proptest! {
    /// Fully split expenses only move money around.
    #[test]
    fn balances_sum_to_zero(expenses in prop::collection::vec(arb_expense(), 0..20)) {
        let report = compute_group_balances(&expenses, &member_ids());

        prop_assert!(report.is_consistent());
        prop_assert!(report.balances.total().abs() < AMOUNT_TOLERANCE);
    }

    /// Any permutation of the expense list yields the same balances.
    #[test]
    fn balances_ignore_order(
        (expenses, shuffled) in prop::collection::vec(arb_expense(), 0..20)
            .prop_flat_map(|expenses| (Just(expenses.clone()), Just(expenses).prop_shuffle()))
    ) {
        let original = compute_group_balances(&expenses, &member_ids());
        let permuted = compute_group_balances(&shuffled, &member_ids());

        for (member, balance) in original.balances.iter() {
            let other = permuted.balances.get(member).unwrap_or(f64::NAN);
            prop_assert!((balance - other).abs() < AMOUNT_TOLERANCE);
        }
    }

    /// Executing the plan settles everyone within a bounded number of transfers.
    #[test]
    fn plan_settles_everyone(balances in arb_balances()) {
        let transfers = plan_settlements(&balances).unwrap();

        let mut remaining: BTreeMap<String, f64> =
            balances.iter().map(|(m, b)| (m.clone(), b)).collect();
        for t in &transfers {
            prop_assert!(t.amount > 0.0);
            prop_assert_ne!(&t.from, &t.to);
            *remaining.get_mut(&t.from).unwrap() += t.amount;
            *remaining.get_mut(&t.to).unwrap() -= t.amount;
        }
        for balance in remaining.values() {
            prop_assert!(balance.abs() < AMOUNT_TOLERANCE);
        }

        let moved: f64 = transfers.iter().map(|t| t.amount).sum();
        let owed: f64 = balances.iter().map(|(_, b)| b).filter(|b| *b > 0.0).sum();
        prop_assert!((moved - owed).abs() < AMOUNT_TOLERANCE);

        let creditors = balances.iter().filter(|(_, b)| *b >= AMOUNT_TOLERANCE).count();
        let debtors = balances.iter().filter(|(_, b)| *b <= -AMOUNT_TOLERANCE).count();
        prop_assert!(transfers.len() <= (creditors + debtors).saturating_sub(1));
    }

    /// Planning is deterministic.
    #[test]
    fn plan_is_deterministic(balances in arb_balances()) {
        prop_assert_eq!(plan_settlements(&balances).unwrap(), plan_settlements(&balances).unwrap());
    }

    /// Filtering keeps a sub-list and repeating the call gives the same answer.
    #[test]
    fn filtering_is_repeatable(
        proposed in prop::collection::vec(arb_transfer(), 0..10),
        recorded in prop::collection::vec(arb_transfer(), 0..10),
    ) {
        let recorded = as_pending(&recorded);
        let first = filter_new_settlements(&proposed, &recorded);
        let second = filter_new_settlements(&proposed, &recorded);

        prop_assert!(first.len() <= proposed.len());
        prop_assert!(first.len() + recorded.len() >= proposed.len());
        prop_assert!(first.iter().all(|t| proposed.contains(t)));
        prop_assert_eq!(first, second);
    }

    /// Once every planned transfer is recorded there is nothing left to suggest.
    #[test]
    fn recorded_plan_leaves_nothing(balances in arb_balances()) {
        let plan = plan_settlements(&balances).unwrap();
        let recorded = as_pending(&plan);
        prop_assert!(filter_new_settlements(&plan, &recorded).is_empty());
    }

    /// The summary's net figure is what is owed minus what is owing.
    #[test]
    fn summary_net_matches_totals(groups in prop::collection::vec(arb_balances(), 0..6)) {
        let per_group: BTreeMap<String, BalanceMap> =
            groups.into_iter().enumerate().map(|(i, b)| (format!("g{}", i), b)).collect();

        let summary = aggregate_user_balances(&per_group, "ana");

        prop_assert!(summary.total_owe >= 0.0);
        prop_assert!(summary.total_owed >= 0.0);
        prop_assert!((summary.net_balance - (summary.total_owed - summary.total_owe)).abs() < 1e-9);
        prop_assert_eq!(summary.per_group.len(), per_group.len());
    }
}
