use std::collections::HashMap;

use async_trait::async_trait;
use finguard_application::TransactionRepository;
use finguard_core::AppResult;
use finguard_domain::Transaction;
use tokio::sync::RwLock;

/// In-memory transaction store keyed by owner.
#[derive(Default)]
pub struct InMemoryTransactionRepository {
    transactions: RwLock<HashMap<String, Vec<Transaction>>>,
}

impl InMemoryTransactionRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn insert_transaction(&self, transaction: Transaction) -> AppResult<()> {
        self.transactions
            .write()
            .await
            .entry(transaction.owner().to_owned())
            .or_default()
            .push(transaction);

        Ok(())
    }

    async fn list_transactions(&self, owner: &str) -> AppResult<Vec<Transaction>> {
        let mut transactions = self
            .transactions
            .read()
            .await
            .get(owner)
            .cloned()
            .unwrap_or_default();
        transactions.sort_by(|left, right| {
            right
                .occurred_on()
                .cmp(&left.occurred_on())
                .then_with(|| right.created_at().cmp(&left.created_at()))
        });

        Ok(transactions)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use finguard_application::TransactionRepository;
    use finguard_core::AppResult;
    use finguard_domain::{Transaction, TransactionKind};

    use super::InMemoryTransactionRepository;

    fn transaction(owner: &str, day: u32) -> AppResult<Transaction> {
        Transaction::new(
            owner,
            "Coffee",
            "dining",
            TransactionKind::Expense,
            350,
            NaiveDate::from_ymd_opt(2026, 10, day).unwrap_or_default(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn lists_only_the_owner_newest_first() -> AppResult<()> {
        let repository = InMemoryTransactionRepository::new();
        repository.insert_transaction(transaction("alice", 3)?).await?;
        repository.insert_transaction(transaction("alice", 9)?).await?;
        repository.insert_transaction(transaction("bob", 5)?).await?;

        let listed = repository.list_transactions("alice").await?;
        let days: Vec<String> = listed
            .iter()
            .map(|transaction| transaction.occurred_on().to_string())
            .collect();
        assert_eq!(days, vec!["2026-10-09", "2026-10-03"]);
        assert!(repository.list_transactions("carol").await?.is_empty());
        Ok(())
    }
}
