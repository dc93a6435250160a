//! Transaction primitives.
//!
//! A `Transaction` is an immutable, typed record of money movement against a
//! user's account. Rows are append-only: the engine exposes no update path
//! and the persistence hook below rejects any save of an existing row.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, ConnectionTrait, DbErr, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// Reference used for Cash transactions instead of a gateway id.
pub const CASH_REFERENCE: &str = "--";

/// Shortest accepted non-Cash reference.
const MIN_REFERENCE_LEN: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    RentPayment,
    FeePayment,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "Deposit",
            Self::Withdrawal => "Withdrawal",
            Self::RentPayment => "Rent Payment",
            Self::FeePayment => "Fee Payment",
        }
    }

    /// Sign applied to the owning account when the transaction is recorded.
    pub fn signed(self, amount: Money) -> Money {
        match self {
            Self::Deposit => amount,
            Self::Withdrawal | Self::RentPayment | Self::FeePayment => -amount,
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Deposit" => Ok(Self::Deposit),
            "Withdrawal" => Ok(Self::Withdrawal),
            "Rent Payment" => Ok(Self::RentPayment),
            "Fee Payment" => Ok(Self::FeePayment),
            other => Err(EngineError::Validation(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionMeans {
    Cash,
    Mpesa,
    Bank,
    Other,
}

impl TransactionMeans {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Mpesa => "M-PESA",
            Self::Bank => "Bank",
            Self::Other => "Other",
        }
    }
}

impl TryFrom<&str> for TransactionMeans {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Cash" => Ok(Self::Cash),
            "M-PESA" => Ok(Self::Mpesa),
            "Bank" => Ok(Self::Bank),
            "Other" => Ok(Self::Other),
            other => Err(EngineError::Validation(format!(
                "invalid transaction means: {other}"
            ))),
        }
    }
}

/// Checks the reference rule for a pair of means/reference.
///
/// Cash transactions carry the literal [`CASH_REFERENCE`] sentinel; every
/// other means requires a real reference of at least four characters drawn
/// from `[A-Za-z0-9_-]`.
pub fn validate_reference(means: TransactionMeans, reference: &str) -> ResultEngine<()> {
    if means == TransactionMeans::Cash {
        if reference != CASH_REFERENCE {
            return Err(EngineError::Validation(format!(
                "reference should be '{CASH_REFERENCE}' if transaction means is Cash"
            )));
        }
        return Ok(());
    }

    if reference.is_empty() {
        return Err(EngineError::Validation("reference is required".to_string()));
    }
    if reference == CASH_REFERENCE {
        return Err(EngineError::Validation(format!(
            "reference cannot be '{CASH_REFERENCE}' if means is not Cash"
        )));
    }
    if reference.len() < MIN_REFERENCE_LEN
        || !reference
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(EngineError::Validation(format!(
            "reference must be at least {MIN_REFERENCE_LEN} characters of letters, digits, '_' or '-'"
        )));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: TransactionKind,
    pub means: TransactionMeans,
    pub amount: Money,
    pub reference: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        user_id: Uuid,
        kind: TransactionKind,
        means: TransactionMeans,
        amount: Money,
        reference: String,
        notes: Option<String>,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::Validation("amount must be > 0".to_string()));
        }
        if amount > Money::MAX {
            return Err(EngineError::Validation(format!(
                "amount exceeds the ledger bound of {}",
                Money::MAX
            )));
        }
        validate_reference(means, &reference)?;
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            means,
            amount,
            reference,
            notes,
            created_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub means: String,
    pub amount_minor: i64,
    pub reference: String,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    // Append-only table: the ledger stays auditable only if recorded rows
    // can never be rewritten.
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert {
            Ok(self)
        } else {
            Err(DbErr::Custom(
                "transactions are immutable; record a correcting entry instead".to_string(),
            ))
        }
    }
}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            user_id: ActiveValue::Set(tx.user_id.to_string()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            means: ActiveValue::Set(tx.means.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount.minor()),
            reference: ActiveValue::Set(tx.reference.clone()),
            notes: ActiveValue::Set(tx.notes.clone()),
            created_at: ActiveValue::Set(tx.created_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("transaction".to_string()))?,
            user_id: Uuid::parse_str(&model.user_id)
                .map_err(|_| EngineError::NotFound("user".to_string()))?,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            means: TransactionMeans::try_from(model.means.as_str())?,
            amount: Money::new(model.amount_minor),
            reference: model.reference,
            notes: model.notes,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cash_requires_sentinel() {
        assert!(validate_reference(TransactionMeans::Cash, CASH_REFERENCE).is_ok());
        assert!(validate_reference(TransactionMeans::Cash, "QWERTY12").is_err());
    }

    #[test]
    fn non_cash_rejects_sentinel_and_short_references() {
        assert!(validate_reference(TransactionMeans::Mpesa, "--").is_err());
        assert!(validate_reference(TransactionMeans::Mpesa, "").is_err());
        assert!(validate_reference(TransactionMeans::Mpesa, "ab").is_err());
        assert!(validate_reference(TransactionMeans::Mpesa, "ref with spaces").is_err());
        assert!(validate_reference(TransactionMeans::Mpesa, "QGH7TX81").is_ok());
        assert!(validate_reference(TransactionMeans::Bank, "ch_2026-07").is_ok());
    }

    #[test]
    fn kind_sign_convention() {
        let amount = Money::new(500_00);
        assert_eq!(TransactionKind::Deposit.signed(amount), amount);
        assert_eq!(TransactionKind::Withdrawal.signed(amount), -amount);
        assert_eq!(TransactionKind::RentPayment.signed(amount), -amount);
        assert_eq!(TransactionKind::FeePayment.signed(amount), -amount);
    }

    #[test]
    fn new_rejects_out_of_bound_amounts() {
        let user = Uuid::new_v4();
        let err = Transaction::new(
            user,
            TransactionKind::Deposit,
            TransactionMeans::Cash,
            Money::ZERO,
            CASH_REFERENCE.to_string(),
            None,
            chrono::Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        let err = Transaction::new(
            user,
            TransactionKind::Deposit,
            TransactionMeans::Cash,
            Money::MAX + Money::new(1),
            CASH_REFERENCE.to_string(),
            None,
            chrono::Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn kind_round_trips_through_str() {
        for kind in [
            TransactionKind::Deposit,
            TransactionKind::Withdrawal,
            TransactionKind::RentPayment,
            TransactionKind::FeePayment,
        ] {
            assert_eq!(TransactionKind::try_from(kind.as_str()).unwrap(), kind);
        }
        assert!(TransactionKind::try_from("Refund").is_err());
    }
}
