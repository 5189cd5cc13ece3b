use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Signed net position of every member in one group. Positive means the
/// member is owed money, negative means they owe.
///
/// Backed by a `BTreeMap` so iteration order (and therefore everything
/// derived from it) is deterministic.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(transparent)]
pub struct BalanceMap(BTreeMap<String, f64>);

impl BalanceMap {
    pub fn new() -> Self {
        BalanceMap(BTreeMap::new())
    }

    pub fn get(&self, member: &str) -> Option<f64> {
        self.0.get(member).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, f64)> {
        self.0.iter().map(|(member, balance)| (member, *balance))
    }

    /// Sum over all members; zero whenever money was only redistributed.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub(crate) fn ensure(&mut self, member: &str) {
        self.0.entry(member.to_string()).or_insert(0.0);
    }

    pub(crate) fn adjust(&mut self, member: &str, delta: f64) {
        *self.0.entry(member.to_string()).or_insert(0.0) += delta;
    }
}

impl FromIterator<(String, f64)> for BalanceMap {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        BalanceMap(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(&str, f64); N]> for BalanceMap {
    fn from(entries: [(&str, f64); N]) -> Self {
        entries.into_iter().map(|(m, b)| (m.to_string(), b)).collect()
    }
}

/// Historical data that could not be reconciled with the group's current
/// state. Calculation carries on with the raw numbers; these are surfaced as
/// warnings next to the result.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataInconsistency {
    SplitSumMismatch {
        record_id: String,
        amount: f64,
        split_total: f64,
    },
    UnknownMember { record_id: String, member: String },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct BalanceReport {
    pub balances: BalanceMap,
    pub warnings: Vec<DataInconsistency>,
}

impl BalanceReport {
    pub fn is_consistent(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// A suggested payment produced by the planner.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Transfer {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

impl Transfer {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: f64) -> Self {
        Transfer {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}

/// One member's position across all their groups.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UserSummary {
    pub total_owe: f64,
    pub total_owed: f64,
    pub net_balance: f64,
    pub per_group: BTreeMap<String, f64>,
}
