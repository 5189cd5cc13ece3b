use crate::constants::{
    EXPENSE_ADDED, EXPENSE_DELETED, EXPENSE_UPDATED, GROUP_CREATED, MAX_AMOUNT, MAX_DESCRIPTION_LENGTH,
    MAX_NAME_LENGTH, MEMBER_ADDED, MEMBER_REMOVED, SETTLEMENT_CONFIRMED, SETTLEMENT_RECORDED,
    STRICT_SETTLEMENT_MODE_TOGGLED,
};
use crate::core::errors::LedgerError;
use crate::core::ledger::{
    aggregate_user_balances, approx_eq, compute_ledger_balances, exact_cents, filter_new_settlements,
    plan_settlements, split_equally,
};
use crate::core::models::{
    AppLog, BalanceMap, BalanceReport, Expense, Group, NewExpense, Settlement, SettlementStatus, SplitSpec, Transfer,
    UserSummary,
};
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::Storage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// Everything a group screen needs, recomputed from one storage snapshot.
#[derive(Serialize, Deserialize, Debug, ToSchema, Clone, PartialEq)]
pub struct GroupSnapshot {
    pub group_id: String,
    pub report: BalanceReport,
    pub suggestions: Vec<Transfer>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone, PartialEq)]
pub struct PayerTotal {
    pub member: String,
    pub amount: f64,
}

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone, PartialEq)]
pub struct GroupStatistics {
    pub group_id: String,
    pub expense_count: usize,
    pub total_spent: f64,
    pub by_category: BTreeMap<String, f64>,
    pub top_payers: Vec<PayerTotal>,
}

/// One member's settlements across every group they belong to, newest first.
/// Totals only count completed settlements.
#[derive(Serialize, Deserialize, Debug, ToSchema, Clone, PartialEq)]
pub struct PaymentHistory {
    pub member: String,
    pub settlements: Vec<Settlement>,
    pub total_paid: f64,
    pub total_received: f64,
}

/// Handle returned by [`LedgerService::watch_group`]. Dropping it stops the
/// watcher.
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        self.handle.abort();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub struct LedgerService<L: LoggingService, S: Storage> {
    storage: S,
    logging: L,
    strict_by_default: bool,
}

impl<L: LoggingService, S: Storage> LedgerService<L, S> {
    pub fn new(storage: S, logging: L, strict_by_default: bool) -> Self {
        LedgerService {
            storage,
            logging,
            strict_by_default,
        }
    }

    async fn fetch_group(&self, group_id: &str) -> Result<Group, LedgerError> {
        self.storage
            .get_group(group_id)
            .await?
            .ok_or_else(|| LedgerError::GroupNotFound(group_id.to_string()))
    }

    async fn validate_group_membership(&self, group_id: &str, member: &str) -> Result<Group, LedgerError> {
        let group = self.fetch_group(group_id).await?;
        if !group.is_member(member) {
            return Err(LedgerError::NotGroupMember(member.to_string()));
        }
        Ok(group)
    }

    async fn log_and_audit(
        &self,
        group_id: Option<&str>,
        action: &str,
        details: serde_json::Value,
        member: Option<&str>,
    ) -> Result<(), LedgerError> {
        info!(action, group_id = group_id.unwrap_or("-"), member = member.unwrap_or("-"), "ledger action");
        self.logging.log_action(action, details, group_id, member).await
    }

    fn validate_string_input(&self, field: &str, value: &str, max_length: usize) -> Result<(), LedgerError> {
        if value.trim().is_empty() {
            return Err(LedgerError::invalid_input(
                field,
                &format!("Invalid {}", field),
                format!("{} cannot be empty", field),
            ));
        }
        if value.len() > max_length {
            return Err(LedgerError::invalid_input(
                field,
                &format!("{} Too Long", field),
                format!("{} cannot exceed {} characters", field, max_length),
            ));
        }
        if value.chars().any(|c| c.is_control() || "<>{}[]".contains(c)) {
            return Err(LedgerError::invalid_input(
                field,
                &format!("Invalid {}", field),
                format!("{} contains invalid characters", field),
            ));
        }
        Ok(())
    }

    fn validate_amount_input(&self, field: &str, amount: f64) -> Result<(), LedgerError> {
        if !amount.is_finite() {
            return Err(LedgerError::invalid_input(field, "Invalid Amount", "Amount must be a finite number"));
        }
        if amount <= 0.0 {
            return Err(LedgerError::invalid_input(field, "Invalid Amount", "Amount must be greater than 0"));
        }
        if amount > MAX_AMOUNT {
            return Err(LedgerError::invalid_input(
                field,
                "Amount Too Large",
                "Amount cannot exceed 1,000,000",
            ));
        }
        if exact_cents(amount).is_none() {
            return Err(LedgerError::invalid_input(
                field,
                "Invalid Amount",
                "Amount cannot have more than 2 decimal places",
            ));
        }
        Ok(())
    }

    // GROUPS

    pub async fn create_group(
        &self,
        name: String,
        members: Vec<String>,
        created_by: &str,
    ) -> Result<Group, LedgerError> {
        self.validate_string_input("name", &name, MAX_NAME_LENGTH)?;

        let mut all_members: Vec<String> = Vec::with_capacity(members.len() + 1);
        for member in std::iter::once(created_by.to_string()).chain(members) {
            self.validate_string_input("member", &member, MAX_NAME_LENGTH)?;
            if !all_members.contains(&member) {
                all_members.push(member);
            }
        }

        let group = Group {
            id: Uuid::new_v4().to_string(),
            name,
            members: all_members,
            strict_settlement_mode: self.strict_by_default,
            created_at: Utc::now(),
        };
        self.storage.save_group(group.clone()).await?;

        self.log_and_audit(
            Some(&group.id),
            GROUP_CREATED,
            json!({ "group_id": group.id, "name": group.name, "members": group.members }),
            Some(created_by),
        )
        .await?;

        Ok(group)
    }

    pub async fn get_group(&self, group_id: &str) -> Result<Group, LedgerError> {
        self.fetch_group(group_id).await
    }

    pub async fn add_member(&self, group_id: &str, member: &str, added_by: &str) -> Result<Group, LedgerError> {
        let mut group = self.validate_group_membership(group_id, added_by).await?;
        self.validate_string_input("member", member, MAX_NAME_LENGTH)?;
        if group.is_member(member) {
            return Err(LedgerError::AlreadyGroupMember(member.to_string()));
        }

        group.members.push(member.to_string());
        self.storage.save_group(group.clone()).await?;

        self.log_and_audit(
            Some(group_id),
            MEMBER_ADDED,
            json!({ "group_id": group_id, "member": member }),
            Some(added_by),
        )
        .await?;
        Ok(group)
    }

    /// Removes a member whose ledger balance is already settled.
    pub async fn remove_member(&self, group_id: &str, member: &str, removed_by: &str) -> Result<Group, LedgerError> {
        let mut group = self.validate_group_membership(group_id, removed_by).await?;
        if !group.is_member(member) {
            return Err(LedgerError::NotGroupMember(member.to_string()));
        }
        if group.members.len() <= 1 {
            return Err(LedgerError::CannotRemoveLastMember);
        }

        let balance = self.ledger_report(&group).await?.balances.get(member).unwrap_or(0.0);
        if !approx_eq(balance, 0.0) {
            return Err(LedgerError::OutstandingBalance {
                member: member.to_string(),
                balance,
            });
        }

        group.members.retain(|m| m != member);
        self.storage.save_group(group.clone()).await?;

        self.log_and_audit(
            Some(group_id),
            MEMBER_REMOVED,
            json!({ "group_id": group_id, "member": member }),
            Some(removed_by),
        )
        .await?;
        Ok(group)
    }

    pub async fn set_strict_settlement_mode(
        &self,
        group_id: &str,
        enabled: bool,
        toggled_by: &str,
    ) -> Result<Group, LedgerError> {
        let mut group = self.validate_group_membership(group_id, toggled_by).await?;
        group.strict_settlement_mode = enabled;
        self.storage.save_group(group.clone()).await?;

        self.log_and_audit(
            Some(group_id),
            STRICT_SETTLEMENT_MODE_TOGGLED,
            json!({ "group_id": group_id, "enabled": enabled }),
            Some(toggled_by),
        )
        .await?;
        Ok(group)
    }

    // EXPENSES

    fn build_expense(
        &self,
        group: &Group,
        id: String,
        new: NewExpense,
        created_at: DateTime<Utc>,
    ) -> Result<Expense, LedgerError> {
        self.validate_string_input("description", &new.description, MAX_DESCRIPTION_LENGTH)?;
        if let Some(ref category) = new.category {
            self.validate_string_input("category", category, MAX_NAME_LENGTH)?;
        }
        if let Some(ref memo) = new.memo {
            self.validate_string_input("memo", memo, MAX_DESCRIPTION_LENGTH)?;
        }
        self.validate_amount_input("amount", new.amount)?;
        if !group.is_member(&new.paid_by) {
            return Err(LedgerError::NotGroupMember(new.paid_by));
        }

        let splits = match new.split {
            SplitSpec::Equal => split_equally(new.amount, &group.members)?,
            // Shares must add up to the amount to the cent. Any drift would
            // accumulate across expenses and block settlement planning.
            SplitSpec::Manual(shares) => {
                let mut split_cents: i64 = 0;
                for (member, share) in &shares {
                    if !group.is_member(member) {
                        return Err(LedgerError::InvalidSplitUser(member.clone()));
                    }
                    if !share.is_finite() || *share < 0.0 {
                        return Err(LedgerError::invalid_input(
                            "splits",
                            "Invalid Share",
                            format!("Share for {} must be a non-negative number", member),
                        ));
                    }
                    match exact_cents(*share) {
                        Some(cents) => split_cents = split_cents.saturating_add(cents),
                        None => {
                            return Err(LedgerError::invalid_input(
                                "splits",
                                "Invalid Share",
                                format!("Share for {} cannot have more than 2 decimal places", member),
                            ));
                        }
                    }
                }
                if Some(split_cents) != exact_cents(new.amount) {
                    return Err(LedgerError::InvalidSplit {
                        amount: new.amount,
                        split_total: shares.values().sum(),
                    });
                }
                shares
            }
        };

        Ok(Expense {
            id,
            group_id: group.id.clone(),
            description: new.description,
            category: new.category,
            memo: new.memo,
            amount: new.amount,
            paid_by: new.paid_by,
            splits,
            date: new.date.unwrap_or(created_at),
            created_at,
        })
    }

    pub async fn add_expense(&self, group_id: &str, new: NewExpense, created_by: &str) -> Result<Expense, LedgerError> {
        let group = self.validate_group_membership(group_id, created_by).await?;
        let expense = self.build_expense(&group, Uuid::new_v4().to_string(), new, Utc::now())?;
        self.storage.save_expense(expense.clone()).await?;

        self.log_and_audit(
            Some(group_id),
            EXPENSE_ADDED,
            json!({
                "expense_id": expense.id,
                "description": expense.description,
                "amount": expense.amount,
                "paid_by": expense.paid_by
            }),
            Some(created_by),
        )
        .await?;

        Ok(expense)
    }

    /// Replaces an expense in place. Balances are always recomputed from the
    /// full expense set, so this behaves as delete followed by create.
    pub async fn update_expense(
        &self,
        expense_id: &str,
        new: NewExpense,
        updated_by: &str,
    ) -> Result<Expense, LedgerError> {
        let existing = self
            .storage
            .get_expense(expense_id)
            .await?
            .ok_or_else(|| LedgerError::ExpenseNotFound(expense_id.to_string()))?;
        let group = self.validate_group_membership(&existing.group_id, updated_by).await?;
        let expense = self.build_expense(&group, existing.id.clone(), new, existing.created_at)?;
        self.storage.save_expense(expense.clone()).await?;

        self.log_and_audit(
            Some(&group.id),
            EXPENSE_UPDATED,
            json!({
                "expense_id": expense.id,
                "old_amount": existing.amount,
                "amount": expense.amount,
                "paid_by": expense.paid_by
            }),
            Some(updated_by),
        )
        .await?;

        Ok(expense)
    }

    pub async fn delete_expense(&self, expense_id: &str, deleted_by: &str) -> Result<(), LedgerError> {
        let existing = self
            .storage
            .get_expense(expense_id)
            .await?
            .ok_or_else(|| LedgerError::ExpenseNotFound(expense_id.to_string()))?;
        self.validate_group_membership(&existing.group_id, deleted_by).await?;
        self.storage.delete_expense(expense_id).await?;

        self.log_and_audit(
            Some(&existing.group_id),
            EXPENSE_DELETED,
            json!({ "expense_id": expense_id, "amount": existing.amount }),
            Some(deleted_by),
        )
        .await
    }

    pub async fn list_expenses(&self, group_id: &str) -> Result<Vec<Expense>, LedgerError> {
        self.fetch_group(group_id).await?;
        self.storage.get_expenses(group_id).await
    }

    // SETTLEMENTS

    pub async fn record_settlement(
        &self,
        group_id: &str,
        from: &str,
        to: &str,
        amount: f64,
        remarks: Option<String>,
        created_by: &str,
    ) -> Result<Settlement, LedgerError> {
        let group = self.validate_group_membership(group_id, created_by).await?;
        if from == to {
            return Err(LedgerError::SelfSettlement);
        }
        for party in [from, to] {
            if !group.is_member(party) {
                return Err(LedgerError::NotGroupMember(party.to_string()));
            }
        }
        self.validate_amount_input("amount", amount)?;
        if let Some(ref text) = remarks {
            self.validate_string_input("remarks", text, MAX_DESCRIPTION_LENGTH)?;
        }

        let strict = group.strict_settlement_mode;
        let settlement = Settlement {
            id: Uuid::new_v4().to_string(),
            group_id: group_id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            amount,
            remarks,
            date: Utc::now(),
            status: if strict {
                SettlementStatus::Pending
            } else {
                SettlementStatus::Completed
            },
            confirmed_by: if strict { None } else { Some(created_by.to_string()) },
        };
        self.storage.save_settlement(settlement.clone()).await?;

        self.log_and_audit(
            Some(group_id),
            SETTLEMENT_RECORDED,
            json!({
                "settlement_id": settlement.id,
                "from": from,
                "to": to,
                "amount": amount,
                "status": settlement.status.to_string()
            }),
            Some(created_by),
        )
        .await?;

        Ok(settlement)
    }

    /// Marks a pending settlement as received. Only the recipient may do so.
    pub async fn confirm_settlement(&self, settlement_id: &str, confirmed_by: &str) -> Result<Settlement, LedgerError> {
        let mut settlement = self
            .storage
            .get_settlement(settlement_id)
            .await?
            .ok_or_else(|| LedgerError::SettlementNotFound(settlement_id.to_string()))?;

        if settlement.is_completed() {
            return Err(LedgerError::SettlementAlreadyConfirmed(settlement_id.to_string()));
        }
        if confirmed_by != settlement.to {
            return Err(LedgerError::UnauthorizedSettlementConfirmation(confirmed_by.to_string()));
        }

        settlement.status = SettlementStatus::Completed;
        settlement.confirmed_by = Some(confirmed_by.to_string());
        self.storage.save_settlement(settlement.clone()).await?;

        self.log_and_audit(
            Some(&settlement.group_id),
            SETTLEMENT_CONFIRMED,
            json!({ "settlement_id": settlement.id, "amount": settlement.amount }),
            Some(confirmed_by),
        )
        .await?;

        Ok(settlement)
    }

    pub async fn list_settlements(&self, group_id: &str) -> Result<Vec<Settlement>, LedgerError> {
        self.fetch_group(group_id).await?;
        self.storage.get_settlements(group_id).await
    }

    pub async fn pending_settlements(&self, group_id: &str) -> Result<Vec<Settlement>, LedgerError> {
        let settlements = self.list_settlements(group_id).await?;
        Ok(settlements.into_iter().filter(Settlement::is_pending).collect())
    }

    pub async fn member_settlements(&self, member: &str) -> Result<PaymentHistory, LedgerError> {
        let mut settlements = Vec::new();
        for group in self.storage.get_member_groups(member).await? {
            let recorded = self.storage.get_settlements(&group.id).await?;
            settlements.extend(recorded.into_iter().filter(|s| s.from == member || s.to == member));
        }
        settlements.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));

        let (mut total_paid, mut total_received) = (0.0, 0.0);
        for settlement in settlements.iter().filter(|s| s.is_completed()) {
            if settlement.from == member {
                total_paid += settlement.amount;
            } else {
                total_received += settlement.amount;
            }
        }

        Ok(PaymentHistory {
            member: member.to_string(),
            settlements,
            total_paid,
            total_received,
        })
    }

    // QUERIES

    async fn ledger_report(&self, group: &Group) -> Result<BalanceReport, LedgerError> {
        let expenses = self.storage.get_expenses(&group.id).await?;
        let settlements = self.storage.get_settlements(&group.id).await?;
        Ok(compute_ledger_balances(&expenses, &settlements, &group.members))
    }

    pub async fn group_balances(&self, group_id: &str) -> Result<BalanceReport, LedgerError> {
        let group = self.fetch_group(group_id).await?;
        self.ledger_report(&group).await
    }

    pub async fn group_snapshot(&self, group_id: &str) -> Result<GroupSnapshot, LedgerError> {
        let group = self.fetch_group(group_id).await?;
        let expenses = self.storage.get_expenses(group_id).await?;
        let settlements = self.storage.get_settlements(group_id).await?;

        let report = compute_ledger_balances(&expenses, &settlements, &group.members);
        let plan = plan_settlements(&report.balances)?;
        let pending: Vec<Settlement> = settlements.into_iter().filter(Settlement::is_pending).collect();
        let suggestions = filter_new_settlements(&plan, &pending);

        debug!(
            group_id,
            planned = plan.len(),
            pending = pending.len(),
            suggested = suggestions.len(),
            "built group snapshot"
        );

        Ok(GroupSnapshot {
            group_id: group_id.to_string(),
            report,
            suggestions,
        })
    }

    /// Transfers that would settle the group, minus those already recorded
    /// and awaiting confirmation.
    pub async fn suggested_settlements(&self, group_id: &str) -> Result<Vec<Transfer>, LedgerError> {
        Ok(self.group_snapshot(group_id).await?.suggestions)
    }

    pub async fn user_summary(&self, member: &str) -> Result<UserSummary, LedgerError> {
        let groups = self.storage.get_member_groups(member).await?;
        let mut per_group: BTreeMap<String, BalanceMap> = BTreeMap::new();
        for group in groups {
            let report = self.ledger_report(&group).await?;
            per_group.insert(group.id, report.balances);
        }
        Ok(aggregate_user_balances(&per_group, member))
    }

    pub async fn group_statistics(&self, group_id: &str) -> Result<GroupStatistics, LedgerError> {
        let expenses = self.list_expenses(group_id).await?;

        let mut by_category: BTreeMap<String, f64> = BTreeMap::new();
        let mut by_payer: HashMap<String, f64> = HashMap::new();
        for expense in &expenses {
            let category = expense.category.clone().unwrap_or_else(|| "uncategorized".to_string());
            *by_category.entry(category).or_insert(0.0) += expense.amount;
            *by_payer.entry(expense.paid_by.clone()).or_insert(0.0) += expense.amount;
        }

        let mut top_payers: Vec<PayerTotal> = by_payer
            .into_iter()
            .map(|(member, amount)| PayerTotal { member, amount })
            .collect();
        top_payers.sort_by(|a, b| b.amount.total_cmp(&a.amount).then_with(|| a.member.cmp(&b.member)));

        Ok(GroupStatistics {
            group_id: group_id.to_string(),
            expense_count: expenses.len(),
            total_spent: expenses.iter().map(|e| e.amount).sum(),
            by_category,
            top_payers,
        })
    }

    pub async fn get_app_logs(&self) -> Result<Vec<AppLog>, LedgerError> {
        self.logging.get_logs(None).await
    }

    pub async fn get_group_logs(&self, group_id: &str) -> Result<Vec<AppLog>, LedgerError> {
        self.fetch_group(group_id).await?;
        self.logging.get_logs(Some(group_id)).await
    }
}

impl<L: LoggingService + 'static, S: Storage + 'static> LedgerService<L, S> {
    /// Calls `on_change` with a fresh snapshot of the group right away and
    /// again after every stored change to it. Nothing is cached between
    /// calls; each notification triggers a full recomputation.
    pub fn watch_group<F>(self: &Arc<Self>, group_id: &str, on_change: F) -> Subscription
    where
        F: Fn(GroupSnapshot) + Send + 'static,
    {
        let service = Arc::clone(self);
        let group_id = group_id.to_string();
        let mut events = self.storage.subscribe();

        let handle = tokio::spawn(async move {
            let mut refresh = true;
            loop {
                if refresh {
                    match service.group_snapshot(&group_id).await {
                        Ok(snapshot) => on_change(snapshot),
                        Err(e) => warn!(group_id = %group_id, error = %e, "failed to recompute group snapshot"),
                    }
                }
                refresh = match events.recv().await {
                    Ok(event) => event.group_id == group_id,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(group_id = %group_id, skipped, "change feed lagged, recomputing");
                        true
                    }
                    Err(RecvError::Closed) => break,
                };
            }
        });

        Subscription { handle }
    }
}
