use std::collections::BTreeMap;

use crate::core::models::{BalanceMap, UserSummary};

/// Combines one member's balances across several groups.
///
/// Every group in `per_group_balances` shows up in `per_group`, with zero
/// when the member has no entry there.
pub fn aggregate_user_balances(per_group_balances: &BTreeMap<String, BalanceMap>, user: &str) -> UserSummary {
    let mut summary = UserSummary::default();

    for (group_id, balances) in per_group_balances {
        let balance = balances.get(user).unwrap_or(0.0);
        if balance < 0.0 {
            summary.total_owe += balance.abs();
        } else if balance > 0.0 {
            summary.total_owed += balance;
        }
        summary.per_group.insert(group_id.clone(), balance);
    }

    summary.net_balance = summary.total_owed - summary.total_owe;
    summary
}
