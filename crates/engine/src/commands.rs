//! Command structs for engine operations.
//!
//! These types group parameters for write operations (users, ledger entries,
//! property records, tenancies), keeping call sites readable and avoiding
//! long argument lists.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    transactions::{CASH_REFERENCE, TransactionKind, TransactionMeans},
    unit_groups::{DEFAULT_UNIT_ABBR_FORMAT, DEFAULT_UNIT_NAME_FORMAT},
};

/// Create a user together with its zero-balance account.
#[derive(Clone, Debug)]
pub struct NewUserCmd {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

impl NewUserCmd {
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            first_name: None,
            last_name: None,
            email: None,
            phone_number: None,
        }
    }

    #[must_use]
    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    #[must_use]
    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }
}

/// Record one money movement against a user's account.
#[derive(Clone, Debug)]
pub struct RecordTransactionCmd {
    pub username: String,
    pub kind: TransactionKind,
    pub means: TransactionMeans,
    pub amount_minor: i64,
    pub reference: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RecordTransactionCmd {
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        kind: TransactionKind,
        means: TransactionMeans,
        amount_minor: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            username: username.into(),
            kind,
            means,
            amount_minor,
            reference: CASH_REFERENCE.to_string(),
            notes: None,
            created_at,
        }
    }

    #[must_use]
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Create a house.
#[derive(Clone, Debug)]
pub struct NewHouseCmd {
    pub name: String,
    pub address: String,
    pub description: Option<String>,
    pub picture: Option<String>,
}

impl NewHouseCmd {
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            description: None,
            picture: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn picture(mut self, picture: impl Into<String>) -> Self {
        self.picture = Some(picture.into());
        self
    }
}

/// Create a unit group and its initial units.
#[derive(Clone, Debug)]
pub struct UnitGroupCmd {
    pub house_id: Uuid,
    pub name: String,
    pub abbreviated_name: String,
    pub description: Option<String>,
    pub number_of_units: u32,
    pub picture: Option<String>,
    pub monthly_rent_minor: i64,
    pub deposit_minor: i64,
    pub unit_name_format: String,
    pub unit_abbreviated_name_format: String,
}

impl UnitGroupCmd {
    #[must_use]
    pub fn new(
        house_id: Uuid,
        name: impl Into<String>,
        abbreviated_name: impl Into<String>,
        number_of_units: u32,
        monthly_rent_minor: i64,
    ) -> Self {
        Self {
            house_id,
            name: name.into(),
            abbreviated_name: abbreviated_name.into(),
            description: None,
            number_of_units,
            picture: None,
            monthly_rent_minor,
            deposit_minor: 0,
            unit_name_format: DEFAULT_UNIT_NAME_FORMAT.to_string(),
            unit_abbreviated_name_format: DEFAULT_UNIT_ABBR_FORMAT.to_string(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn picture(mut self, picture: impl Into<String>) -> Self {
        self.picture = Some(picture.into());
        self
    }

    #[must_use]
    pub fn deposit_minor(mut self, deposit_minor: i64) -> Self {
        self.deposit_minor = deposit_minor;
        self
    }

    #[must_use]
    pub fn unit_name_format(mut self, format: impl Into<String>) -> Self {
        self.unit_name_format = format.into();
        self
    }

    #[must_use]
    pub fn unit_abbreviated_name_format(mut self, format: impl Into<String>) -> Self {
        self.unit_abbreviated_name_format = format.into();
        self
    }
}

/// Create a tenancy for a user, optionally assigning a unit right away.
#[derive(Clone, Debug)]
pub struct TenantCmd {
    pub username: String,
    pub unit_id: Option<Uuid>,
    pub lease_start_date: NaiveDate,
    pub lease_end_date: Option<NaiveDate>,
}

impl TenantCmd {
    #[must_use]
    pub fn new(username: impl Into<String>, lease_start_date: NaiveDate) -> Self {
        Self {
            username: username.into(),
            unit_id: None,
            lease_start_date,
            lease_end_date: None,
        }
    }

    #[must_use]
    pub fn unit_id(mut self, unit_id: Uuid) -> Self {
        self.unit_id = Some(unit_id);
        self
    }

    #[must_use]
    pub fn lease_end_date(mut self, lease_end_date: NaiveDate) -> Self {
        self.lease_end_date = Some(lease_end_date);
        self
    }
}

/// Create an extra fee.
#[derive(Clone, Debug)]
pub struct ExtraFeeCmd {
    pub name: String,
    pub details: String,
    pub amount_minor: i64,
}

impl ExtraFeeCmd {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        details: impl Into<String>,
        amount_minor: i64,
    ) -> Self {
        Self {
            name: name.into(),
            details: details.into(),
            amount_minor,
        }
    }
}
