//! Rent-ledger and occupancy engine for the kodisha rental backend.
//!
//! The engine owns the relational model (users, accounts, transactions,
//! houses, unit groups, units, tenants, fees, messages) and every business
//! rule over it: the append-only ledger, the unit occupancy state machine,
//! tenant lifecycle, and the monthly rent batch. Outer layers (HTTP, admin
//! tooling, schedulers) call into [`Engine`] and never touch the tables
//! directly.

pub use accounts::Account;
pub use commands::{
    ExtraFeeCmd, NewHouseCmd, NewUserCmd, RecordTransactionCmd, TenantCmd, UnitGroupCmd,
};
pub use currency::Currency;
pub use error::EngineError;
pub use messages::MessageCategory;
pub use money::Money;
pub use ops::{
    Engine, EngineBuilder, RentCharge, RentCycleCmd, RentCycleMode, RentCycleReport, RentFailure,
    RentReference, TransactionListFilter,
};
pub use template::{NameTemplate, Placeholder};
pub use tenants::Tenant;
pub use transactions::{CASH_REFERENCE, Transaction, TransactionKind, TransactionMeans};
pub use unit_groups::{
    DEFAULT_UNIT_ABBR_FORMAT, DEFAULT_UNIT_NAME_FORMAT, UnitGroup, UnitGroupSummary,
};
pub use units::{OccupiedStatus, Unit};

pub mod accounts;
pub mod caretakers;
mod commands;
mod currency;
mod error;
pub mod extra_fees;
pub mod houses;
pub mod messages;
mod money;
mod ops;
mod template;
pub mod tenant_fees;
pub mod tenants;
pub mod transactions;
pub mod unit_groups;
pub mod units;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;
