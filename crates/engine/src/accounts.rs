//! Per-user ledger accounts.
//!
//! An account holds a single running balance. It is created together with its
//! user, never deleted while the user exists, and mutated only by the
//! transaction recorder through one atomic balance update (see
//! `ops::ledger`). Nothing else writes to it.

use sea_orm::entity::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::{EngineError, Money};

/// A user's ledger account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub user_id: Uuid,
    pub balance: Money,
}

impl Account {
    /// How much the user owes: `max(0, -balance)`.
    #[must_use]
    pub fn debt_amount(&self) -> Money {
        if self.balance.is_negative() {
            -self.balance
        } else {
            Money::ZERO
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub user_id: String,
    pub balance: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("account".to_string()))?,
            user_id: Uuid::parse_str(&model.user_id)
                .map_err(|_| EngineError::NotFound("user".to_string()))?,
            balance: Money::new(model.balance),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debt_amount_is_zero_for_credit_balances() {
        let account = Account {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            balance: Money::new(10_00),
        };
        assert_eq!(account.debt_amount(), Money::ZERO);
    }

    #[test]
    fn debt_amount_mirrors_negative_balances() {
        let account = Account {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            balance: Money::new(-2500_00),
        };
        assert_eq!(account.debt_amount(), Money::new(2500_00));
    }
}
