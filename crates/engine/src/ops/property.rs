//! Houses, unit groups and units.
//!
//! Saving a unit group tops its unit rows up to `number_of_units` with
//! sequential ordinals and template-generated names. Lowering the target
//! never deletes rows; the creation path alone honors the target.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    EngineError, Money, NewHouseCmd, OccupiedStatus, ResultEngine, Unit, UnitGroup, UnitGroupCmd,
    UnitGroupSummary, caretakers, houses, unit_groups, units,
};

use super::{Engine, normalize_required_name, require_unit, require_unit_group, with_tx};

impl Engine {
    /// Creates a house.
    pub async fn create_house(&self, cmd: NewHouseCmd) -> ResultEngine<Uuid> {
        let name = normalize_required_name(&cmd.name, "house")?;
        with_tx!(self, |db_tx| {
            let existing = houses::Entity::find()
                .filter(houses::Column::Name.eq(name.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::Conflict(format!(
                    "house {name} already exists"
                )));
            }

            let house_id = Uuid::new_v4();
            houses::ActiveModel {
                id: ActiveValue::Set(house_id.to_string()),
                name: ActiveValue::Set(name),
                address: ActiveValue::Set(cmd.address.clone()),
                description: ActiveValue::Set(cmd.description.clone()),
                picture: ActiveValue::Set(cmd.picture.clone()),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            Ok(house_id)
        })
    }

    /// Creates a unit group and its initial units.
    ///
    /// Both name formats are validated here, so unit-name generation can
    /// assume well-formed templates later on.
    pub async fn create_unit_group(&self, cmd: UnitGroupCmd) -> ResultEngine<Uuid> {
        let name = normalize_required_name(&cmd.name, "unit group")?;
        let abbreviated_name = normalize_required_name(&cmd.abbreviated_name, "unit group")?;
        if cmd.monthly_rent_minor <= 0 {
            return Err(EngineError::Validation(
                "monthly rent must be > 0".to_string(),
            ));
        }
        if cmd.deposit_minor < 0 {
            return Err(EngineError::Validation(
                "deposit cannot be negative".to_string(),
            ));
        }

        let group = UnitGroup {
            id: Uuid::new_v4(),
            house_id: cmd.house_id,
            name,
            abbreviated_name,
            description: cmd.description.clone(),
            number_of_units: cmd.number_of_units,
            picture: cmd.picture.clone(),
            monthly_rent: Money::new(cmd.monthly_rent_minor),
            deposit_amount: Money::new(cmd.deposit_minor),
            unit_name_format: cmd.unit_name_format.clone(),
            unit_abbreviated_name_format: cmd.unit_abbreviated_name_format.clone(),
            last_rent_payment_date: None,
        };
        group.validate_formats()?;

        with_tx!(self, |db_tx| {
            let house = houses::Entity::find_by_id(cmd.house_id.to_string())
                .one(&db_tx)
                .await?;
            if house.is_none() {
                return Err(EngineError::NotFound(format!("house {}", cmd.house_id)));
            }

            let mut model: unit_groups::ActiveModel = (&group).into();
            model.created_at = ActiveValue::Set(Utc::now());
            let inserted = model.insert(&db_tx).await?;

            let created = ensure_units(&db_tx, &inserted).await?;
            tracing::debug!(group = %group.name, units = created, "unit group created");
            Ok(group.id)
        })
    }

    /// Changes a group's target unit count, lazily creating missing units.
    ///
    /// Returns how many units were created. Existing rows beyond a lowered
    /// target are left in place.
    pub async fn set_number_of_units(&self, group_id: Uuid, target: u32) -> ResultEngine<usize> {
        with_tx!(self, |db_tx| {
            let model = require_unit_group(&db_tx, group_id).await?;
            let mut active: unit_groups::ActiveModel = model.into();
            active.number_of_units = ActiveValue::Set(target as i32);
            let updated = active.update(&db_tx).await?;
            ensure_units(&db_tx, &updated).await
        })
    }

    /// Returns one unit group.
    pub async fn unit_group(&self, group_id: Uuid) -> ResultEngine<UnitGroup> {
        let model = require_unit_group(&self.database, group_id).await?;
        UnitGroup::try_from(model)
    }

    /// Lists every unit group.
    pub async fn list_unit_groups(&self) -> ResultEngine<Vec<UnitGroup>> {
        let models = unit_groups::Entity::find().all(&self.database).await?;
        models.into_iter().map(UnitGroup::try_from).collect()
    }

    /// Lists a group's units ordered by ordinal.
    pub async fn list_units(&self, group_id: Uuid) -> ResultEngine<Vec<Unit>> {
        require_unit_group(&self.database, group_id).await?;
        let models = units::Entity::find()
            .filter(units::Column::UnitGroupId.eq(group_id.to_string()))
            .order_by_asc(units::Column::Ordinal)
            .all(&self.database)
            .await?;
        models.into_iter().map(Unit::try_from).collect()
    }

    /// Returns one unit.
    pub async fn unit(&self, unit_id: Uuid) -> ResultEngine<Unit> {
        let model = require_unit(&self.database, unit_id).await?;
        Unit::try_from(model)
    }

    /// Administrative transition: any state -> Closed.
    ///
    /// Closed is sticky; releasing a tenant later will not reopen the unit.
    pub async fn close_unit(&self, unit_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let unit = require_unit(&db_tx, unit_id).await?;
            let mut active: units::ActiveModel = unit.into();
            active.occupied_status =
                ActiveValue::Set(OccupiedStatus::Closed.as_str().to_string());
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Replaces a group's caretaker set.
    pub async fn set_caretakers(&self, group_id: Uuid, usernames: &[String]) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_unit_group(&db_tx, group_id).await?;
            caretakers::Entity::delete_many()
                .filter(caretakers::Column::UnitGroupId.eq(group_id.to_string()))
                .exec(&db_tx)
                .await?;
            for username in usernames {
                let user = super::require_user(&db_tx, username).await?;
                caretakers::ActiveModel {
                    unit_group_id: ActiveValue::Set(group_id.to_string()),
                    user_id: ActiveValue::Set(user.id),
                }
                .insert(&db_tx)
                .await?;
            }
            Ok(())
        })
    }

    /// Builds the JSON summary consumed by external layers.
    pub async fn unit_group_summary(&self, group_id: Uuid) -> ResultEngine<UnitGroupSummary> {
        let model = require_unit_group(&self.database, group_id).await?;
        let group = UnitGroup::try_from(model)?;

        let number_of_vacant_units = units::Entity::find()
            .filter(units::Column::UnitGroupId.eq(group_id.to_string()))
            .filter(units::Column::OccupiedStatus.eq(OccupiedStatus::Vacant.as_str()))
            .count(&self.database)
            .await?;

        let caretaker_models = caretakers::Entity::find()
            .filter(caretakers::Column::UnitGroupId.eq(group_id.to_string()))
            .all(&self.database)
            .await?;
        let mut caretakers_ids = Vec::with_capacity(caretaker_models.len());
        for model in caretaker_models {
            caretakers_ids.push(
                Uuid::parse_str(&model.user_id)
                    .map_err(|_| EngineError::NotFound("user".to_string()))?,
            );
        }

        Ok(UnitGroupSummary {
            id: group.id,
            name: group.name,
            abbreviated_name: group.abbreviated_name,
            description: group.description,
            number_of_units: group.number_of_units,
            number_of_vacant_units,
            picture: group.picture,
            deposit_amount: group.deposit_amount.minor(),
            monthly_rent: group.monthly_rent.minor(),
            caretakers_ids,
        })
    }
}

/// Creates missing units up to the group's target count.
pub(super) async fn ensure_units<C>(
    conn: &C,
    group_model: &unit_groups::Model,
) -> ResultEngine<usize>
where
    C: ConnectionTrait,
{
    let group = UnitGroup::try_from(group_model.clone())?;
    let existing = units::Entity::find()
        .filter(units::Column::UnitGroupId.eq(group_model.id.clone()))
        .count(conn)
        .await?;

    let mut created = 0;
    let mut ordinal = existing as u32 + 1;
    while u64::from(ordinal) <= u64::from(group.number_of_units) {
        let unit = Unit {
            id: Uuid::new_v4(),
            unit_group_id: group.id,
            ordinal,
            name: group.generate_unit_name(ordinal)?,
            abbreviated_name: group.generate_abbr_unit_name(ordinal)?,
            occupied_status: OccupiedStatus::Vacant,
            last_rent_payment_date: None,
        };
        units::ActiveModel::from(&unit).insert(conn).await?;
        created += 1;
        ordinal += 1;
    }
    Ok(created)
}
