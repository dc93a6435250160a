//! Ledger operations: recording transactions and reading accounts.
//!
//! A transaction insert and the matching balance change always commit
//! together. The balance change itself is one atomic
//! `UPDATE accounts SET balance = balance + ?` so concurrent recorders for
//! the same account cannot lose updates; the balance is never read, modified
//! and written back in separate steps.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Statement, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    Account, EngineError, Money, RecordTransactionCmd, ResultEngine, Transaction, TransactionKind,
    TransactionMeans, accounts, transactions,
};

use super::{Engine, require_user, with_tx};

/// Filters for [`Engine::list_transactions`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TransactionListFilter {
    pub kind: Option<TransactionKind>,
    pub means: Option<TransactionMeans>,
    pub limit: Option<u64>,
}

impl TransactionListFilter {
    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn means(mut self, means: TransactionMeans) -> Self {
        self.means = Some(means);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl Engine {
    /// Records a transaction and applies it to the owner's account balance.
    ///
    /// Validation (amount bounds, reference rule) runs before anything is
    /// written. Deposits add the amount; withdrawals, rent payments and fee
    /// payments subtract it.
    pub async fn record_transaction(&self, cmd: RecordTransactionCmd) -> ResultEngine<Uuid> {
        let backend = self.database.get_database_backend();
        with_tx!(self, |db_tx| {
            let user = require_user(&db_tx, &cmd.username).await?;
            let user_id = Uuid::parse_str(&user.id)
                .map_err(|_| EngineError::NotFound(format!("user {}", cmd.username)))?;

            let tx = Transaction::new(
                user_id,
                cmd.kind,
                cmd.means,
                Money::new(cmd.amount_minor),
                cmd.reference.clone(),
                cmd.notes.clone(),
                cmd.created_at,
            )?;
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;

            apply_to_account(&db_tx, backend, &user.id, cmd.kind.signed(tx.amount)).await?;

            tracing::debug!(
                user = %cmd.username,
                kind = tx.kind.as_str(),
                amount = %tx.amount,
                "transaction recorded"
            );
            Ok(tx.id)
        })
    }

    /// Returns the ledger account owned by `username`.
    pub async fn account_for(&self, username: &str) -> ResultEngine<Account> {
        let user = require_user(&self.database, username).await?;
        let model = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user.id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("account of {username}")))?;
        Account::try_from(model)
    }

    /// Lists a user's transactions, newest first.
    pub async fn list_transactions(
        &self,
        username: &str,
        filter: TransactionListFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        let user = require_user(&self.database, username).await?;

        let mut query = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user.id))
            .order_by_desc(transactions::Column::CreatedAt);
        if let Some(kind) = filter.kind {
            query = query.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(means) = filter.means {
            query = query.filter(transactions::Column::Means.eq(means.as_str()));
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        let models = query.all(&self.database).await?;
        models.into_iter().map(Transaction::try_from).collect()
    }
}

/// Adds `delta` to the account owned by `user_id` with a single atomic
/// update expression.
pub(super) async fn apply_to_account<C>(
    conn: &C,
    backend: DatabaseBackend,
    user_id: &str,
    delta: Money,
) -> ResultEngine<()>
where
    C: ConnectionTrait,
{
    let result = conn
        .execute(Statement::from_sql_and_values(
            backend,
            "UPDATE accounts SET balance = balance + ? WHERE user_id = ?",
            vec![delta.minor().into(), user_id.into()],
        ))
        .await?;
    if result.rows_affected() != 1 {
        return Err(EngineError::NotFound(format!("account of user {user_id}")));
    }
    Ok(())
}
