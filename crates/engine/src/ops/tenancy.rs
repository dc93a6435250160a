//! Tenant lifecycle: binding users to units and keeping occupancy in sync.
//!
//! Assigning a tenant flips the unit to Occupied; releasing flips it back to
//! Vacant unless the unit was administratively Closed. A unit backs at most
//! one tenant: the tenants table carries a unique index on `unit_id` and the
//! assign path checks explicitly so callers get a conflict error rather than
//! a bare database failure.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    EngineError, ExtraFeeCmd, OccupiedStatus, ResultEngine, Tenant, TenantCmd, extra_fees,
    tenant_fees, tenants, units,
};

use super::{Engine, normalize_required_name, require_tenant, require_unit, require_user, with_tx};

impl Engine {
    /// Creates a tenancy, optionally assigning a unit right away.
    ///
    /// When a unit is assigned on this first save, its
    /// `last_rent_payment_date` is stamped with the lease start as the
    /// billing baseline.
    pub async fn create_tenant(&self, cmd: TenantCmd) -> ResultEngine<Uuid> {
        with_tx!(self, |db_tx| {
            let user = require_user(&db_tx, &cmd.username).await?;
            let existing = tenants::Entity::find()
                .filter(tenants::Column::UserId.eq(user.id.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::Conflict(format!(
                    "user {} already has a tenancy",
                    cmd.username
                )));
            }

            let tenant_id = Uuid::new_v4();
            if let Some(unit_id) = cmd.unit_id {
                claim_unit(&db_tx, unit_id, None, cmd.lease_start_date).await?;
            }

            tenants::ActiveModel {
                id: ActiveValue::Set(tenant_id.to_string()),
                user_id: ActiveValue::Set(user.id),
                unit_id: ActiveValue::Set(cmd.unit_id.map(|id| id.to_string())),
                lease_start_date: ActiveValue::Set(cmd.lease_start_date),
                lease_end_date: ActiveValue::Set(cmd.lease_end_date),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            Ok(tenant_id)
        })
    }

    /// Returns one tenant.
    pub async fn tenant(&self, tenant_id: Uuid) -> ResultEngine<Tenant> {
        let model = require_tenant(&self.database, tenant_id).await?;
        Tenant::try_from(model)
    }

    /// Returns the tenancy of `username`, if any.
    pub async fn tenant_for(&self, username: &str) -> ResultEngine<Tenant> {
        let user = require_user(&self.database, username).await?;
        let model = tenants::Entity::find()
            .filter(tenants::Column::UserId.eq(user.id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("tenancy of {username}")))?;
        Tenant::try_from(model)
    }

    /// Moves a tenant onto `unit_id`, releasing any previously held unit.
    pub async fn assign_unit(
        &self,
        tenant_id: Uuid,
        unit_id: Uuid,
        effective_date: NaiveDate,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let tenant = require_tenant(&db_tx, tenant_id).await?;
            if tenant.unit_id.as_deref() == Some(unit_id.to_string().as_str()) {
                return Ok(());
            }

            claim_unit(&db_tx, unit_id, Some(tenant.id.as_str()), effective_date).await?;
            if let Some(old_unit_id) = tenant.unit_id.clone() {
                vacate_unit(&db_tx, &old_unit_id).await?;
            }

            let mut active: tenants::ActiveModel = tenant.into();
            active.unit_id = ActiveValue::Set(Some(unit_id.to_string()));
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Clears a tenant's unit reference, leaving the unit Vacant.
    pub async fn release_unit(&self, tenant_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let tenant = require_tenant(&db_tx, tenant_id).await?;
            let Some(unit_id) = tenant.unit_id.clone() else {
                return Ok(());
            };

            vacate_unit(&db_tx, &unit_id).await?;
            let mut active: tenants::ActiveModel = tenant.into();
            active.unit_id = ActiveValue::Set(None);
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Deletes a tenancy. The unit survives and goes Vacant.
    pub async fn remove_tenant(&self, tenant_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let tenant = require_tenant(&db_tx, tenant_id).await?;
            if let Some(unit_id) = tenant.unit_id.clone() {
                vacate_unit(&db_tx, &unit_id).await?;
            }
            tenant_fees::Entity::delete_many()
                .filter(tenant_fees::Column::TenantId.eq(tenant.id.clone()))
                .exec(&db_tx)
                .await?;
            tenants::Entity::delete_by_id(tenant.id).exec(&db_tx).await?;
            Ok(())
        })
    }

    /// Creates an extra fee.
    pub async fn create_extra_fee(&self, cmd: ExtraFeeCmd) -> ResultEngine<Uuid> {
        let name = normalize_required_name(&cmd.name, "fee")?;
        if cmd.amount_minor <= 0 {
            return Err(EngineError::Validation(
                "fee amount must be > 0".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            let existing = extra_fees::Entity::find()
                .filter(extra_fees::Column::Name.eq(name.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::Conflict(format!("fee {name} already exists")));
            }

            let fee_id = Uuid::new_v4();
            extra_fees::ActiveModel {
                id: ActiveValue::Set(fee_id.to_string()),
                name: ActiveValue::Set(name),
                details: ActiveValue::Set(cmd.details.clone()),
                amount_minor: ActiveValue::Set(cmd.amount_minor),
            }
            .insert(&db_tx)
            .await?;
            Ok(fee_id)
        })
    }

    /// Marks an extra fee as applicable to a tenant.
    pub async fn add_extra_fee(&self, tenant_id: Uuid, fee_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let tenant = require_tenant(&db_tx, tenant_id).await?;
            let fee = extra_fees::Entity::find_by_id(fee_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound(format!("fee {fee_id}")))?;

            let existing = tenant_fees::Entity::find_by_id((tenant.id.clone(), fee.id.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Ok(());
            }
            tenant_fees::ActiveModel {
                tenant_id: ActiveValue::Set(tenant.id),
                extra_fee_id: ActiveValue::Set(fee.id),
            }
            .insert(&db_tx)
            .await?;
            Ok(())
        })
    }

    /// Detaches an extra fee from a tenant.
    pub async fn remove_extra_fee(&self, tenant_id: Uuid, fee_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            tenant_fees::Entity::delete_by_id((tenant_id.to_string(), fee_id.to_string()))
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Lists the extra fees applicable to a tenant.
    pub async fn list_extra_fees(&self, tenant_id: Uuid) -> ResultEngine<Vec<extra_fees::Model>> {
        let tenant = require_tenant(&self.database, tenant_id).await?;
        let links = tenant_fees::Entity::find()
            .filter(tenant_fees::Column::TenantId.eq(tenant.id))
            .all(&self.database)
            .await?;

        let mut fees = Vec::with_capacity(links.len());
        for link in links {
            if let Some(fee) = extra_fees::Entity::find_by_id(link.extra_fee_id)
                .one(&self.database)
                .await?
            {
                fees.push(fee);
            }
        }
        Ok(fees)
    }
}

/// Marks a unit Occupied for a (new or moving) tenant.
///
/// `claiming_tenant` is the tenant id performing the claim, used to make the
/// operation idempotent for the current holder.
async fn claim_unit<C>(
    conn: &C,
    unit_id: Uuid,
    claiming_tenant: Option<&str>,
    baseline: NaiveDate,
) -> ResultEngine<()>
where
    C: ConnectionTrait,
{
    let unit = require_unit(conn, unit_id).await?;

    if let Some(holder) = tenants::Entity::find()
        .filter(tenants::Column::UnitId.eq(Some(unit_id.to_string())))
        .one(conn)
        .await?
    {
        if claiming_tenant != Some(holder.id.as_str()) {
            return Err(EngineError::Conflict(format!(
                "unit {} already backs a tenant",
                unit.name
            )));
        }
    }

    let status = OccupiedStatus::try_from(unit.occupied_status.as_str())?;
    if status == OccupiedStatus::Closed {
        return Err(EngineError::Conflict(format!("unit {} is closed", unit.name)));
    }

    let stamp_baseline = unit.last_rent_payment_date.is_none();
    let mut active: units::ActiveModel = unit.into();
    active.occupied_status = ActiveValue::Set(OccupiedStatus::Occupied.as_str().to_string());
    if stamp_baseline {
        active.last_rent_payment_date = ActiveValue::Set(Some(baseline));
    }
    active.update(conn).await?;
    Ok(())
}

/// Flips a unit back to Vacant when its tenant leaves. Closed stays Closed.
async fn vacate_unit<C>(conn: &C, unit_id: &str) -> ResultEngine<()>
where
    C: ConnectionTrait,
{
    let unit = units::Entity::find_by_id(unit_id)
        .one(conn)
        .await?
        .ok_or_else(|| EngineError::NotFound(format!("unit {unit_id}")))?;

    let status = OccupiedStatus::try_from(unit.occupied_status.as_str())?;
    if status == OccupiedStatus::Occupied {
        let mut active: units::ActiveModel = unit.into();
        active.occupied_status = ActiveValue::Set(OccupiedStatus::Vacant.as_str().to_string());
        active.update(conn).await?;
    }
    Ok(())
}
