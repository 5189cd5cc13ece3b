use super::approx_eq;
use crate::core::models::{Settlement, Transfer};

/// Drops proposed transfers that already have a matching recorded settlement.
///
/// A match needs the same direction (`from` and `to`) and an amount within
/// tolerance. Each recorded settlement can account for at most one proposed
/// transfer, so two identical suggestions are only both hidden by two
/// recordings.
pub fn filter_new_settlements(proposed: &[Transfer], recorded: &[Settlement]) -> Vec<Transfer> {
    let mut consumed = vec![false; recorded.len()];

    proposed
        .iter()
        .filter(|transfer| {
            let matched = recorded.iter().zip(&consumed).position(|(settlement, used)| {
                !*used
                    && settlement.from == transfer.from
                    && settlement.to == transfer.to
                    && approx_eq(settlement.amount, transfer.amount)
            });
            match matched {
                Some(i) => {
                    consumed[i] = true;
                    false
                }
                None => true,
            }
        })
        .cloned()
        .collect()
}
