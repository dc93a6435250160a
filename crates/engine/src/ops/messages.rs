//! Personal-message queue for tenants.

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, messages};

use super::{Engine, require_tenant, with_tx};

impl Engine {
    /// Lists a tenant's messages, newest first.
    pub async fn list_messages(&self, tenant_id: Uuid) -> ResultEngine<Vec<messages::Model>> {
        let tenant = require_tenant(&self.database, tenant_id).await?;
        let models = messages::Entity::find()
            .filter(messages::Column::TenantId.eq(tenant.id))
            .order_by_desc(messages::Column::CreatedAt)
            .all(&self.database)
            .await?;
        Ok(models)
    }

    /// Marks one message as read.
    pub async fn mark_message_read(&self, message_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let message = messages::Entity::find_by_id(message_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound(format!("message {message_id}")))?;
            let mut active: messages::ActiveModel = message.into();
            active.is_read = ActiveValue::Set(true);
            active.update(&db_tx).await?;
            Ok(())
        })
    }
}
