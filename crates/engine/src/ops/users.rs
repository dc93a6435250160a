//! User management.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, QueryFilter, TransactionTrait,
};
use uuid::Uuid;

use crate::{EngineError, NewUserCmd, ResultEngine, accounts, users};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Creates a user and, atomically, its zero-balance ledger account.
    ///
    /// The account exists for as long as the user does; no other operation
    /// creates or deletes accounts.
    pub async fn create_user(&self, cmd: NewUserCmd) -> ResultEngine<Uuid> {
        let username = normalize_required_name(&cmd.username, "user")?;
        with_tx!(self, |db_tx| {
            let existing = users::Entity::find()
                .filter(users::Column::Username.eq(username.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::Conflict(format!(
                    "username {username} already taken"
                )));
            }

            let user_id = Uuid::new_v4();
            users::ActiveModel {
                id: ActiveValue::Set(user_id.to_string()),
                username: ActiveValue::Set(username.clone()),
                first_name: ActiveValue::Set(cmd.first_name.clone()),
                last_name: ActiveValue::Set(cmd.last_name.clone()),
                email: ActiveValue::Set(cmd.email.clone()),
                phone_number: ActiveValue::Set(cmd.phone_number.clone()),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            accounts::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                user_id: ActiveValue::Set(user_id.to_string()),
                balance: ActiveValue::Set(0),
            }
            .insert(&db_tx)
            .await?;

            tracing::debug!(user = %username, "user created with fresh account");
            Ok(user_id)
        })
    }
}
