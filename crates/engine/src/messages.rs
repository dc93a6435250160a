//! Personal messages delivered to tenants.
//!
//! The engine only enqueues rows; actual delivery (email/SMS) is an external
//! collaborator and fire-and-forget from the ledger's perspective.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageCategory {
    #[default]
    General,
    Payment,
    Maintenance,
    Warning,
    Other,
}

impl MessageCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Payment => "Payment",
            Self::Maintenance => "Maintenance",
            Self::Warning => "Warning",
            Self::Other => "Other",
        }
    }
}

impl TryFrom<&str> for MessageCategory {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "General" => Ok(Self::General),
            "Payment" => Ok(Self::Payment),
            "Maintenance" => Ok(Self::Maintenance),
            "Warning" => Ok(Self::Warning),
            "Other" => Ok(Self::Other),
            other => Err(EngineError::Validation(format!(
                "invalid message category: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "personal_messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub tenant_id: String,
    pub category: String,
    pub subject: String,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenants::Entity",
        from = "Column::TenantId",
        to = "super::tenants::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Tenants,
}

impl Related<super::tenants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
