use std::error::Error;

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use sea_orm::Database;
use uuid::Uuid;

use engine::{
    Engine, ExtraFeeCmd, Money, NewHouseCmd, NewUserCmd, RecordTransactionCmd, RentCycleCmd,
    RentCycleMode, RentReference, TenantCmd, TransactionKind, TransactionListFilter,
    TransactionMeans, UnitGroupCmd,
};
use migration::MigratorTrait;

#[derive(Parser, Debug)]
#[command(name = "kodisha_admin")]
#[command(about = "Admin utilities for Kodisha (bootstrap records, run rent cycles)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./kodisha.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    House(House),
    Group(Group),
    Tenant(Tenant),
    Fee(Fee),
    Tx(Tx),
    Account(AccountArgs),
    Rent(Rent),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone_number: Option<String>,
}

#[derive(Args, Debug)]
struct House {
    #[command(subcommand)]
    command: HouseCommand,
}

#[derive(Subcommand, Debug)]
enum HouseCommand {
    Create(HouseCreateArgs),
}

#[derive(Args, Debug)]
struct HouseCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args, Debug)]
struct Group {
    #[command(subcommand)]
    command: GroupCommand,
}

#[derive(Subcommand, Debug)]
enum GroupCommand {
    Create(GroupCreateArgs),
    Grow(GroupGrowArgs),
    Show(GroupShowArgs),
}

#[derive(Args, Debug)]
struct GroupCreateArgs {
    #[arg(long)]
    house_id: Uuid,
    #[arg(long)]
    name: String,
    #[arg(long)]
    abbreviated_name: String,
    #[arg(long)]
    units: u32,
    /// Monthly rent, e.g. "5000" or "5000.50".
    #[arg(long)]
    rent: String,
    /// Deposit, same format as --rent.
    #[arg(long, default_value = "0")]
    deposit: String,
    #[arg(long)]
    unit_name_format: Option<String>,
    #[arg(long)]
    unit_abbreviated_name_format: Option<String>,
}

#[derive(Args, Debug)]
struct GroupGrowArgs {
    #[arg(long)]
    group_id: Uuid,
    /// New target unit count.
    #[arg(long)]
    units: u32,
}

#[derive(Args, Debug)]
struct GroupShowArgs {
    #[arg(long)]
    group_id: Uuid,
}

#[derive(Args, Debug)]
struct Tenant {
    #[command(subcommand)]
    command: TenantCommand,
}

#[derive(Subcommand, Debug)]
enum TenantCommand {
    Create(TenantCreateArgs),
    Assign(TenantAssignArgs),
    Release(TenantIdArgs),
    Remove(TenantIdArgs),
}

#[derive(Args, Debug)]
struct TenantCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    unit_id: Option<Uuid>,
    /// Lease start (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    lease_start: Option<NaiveDate>,
    #[arg(long)]
    lease_end: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct TenantAssignArgs {
    #[arg(long)]
    tenant_id: Uuid,
    #[arg(long)]
    unit_id: Uuid,
    /// Effective date (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct TenantIdArgs {
    #[arg(long)]
    tenant_id: Uuid,
}

#[derive(Args, Debug)]
struct Fee {
    #[command(subcommand)]
    command: FeeCommand,
}

#[derive(Subcommand, Debug)]
enum FeeCommand {
    Create(FeeCreateArgs),
    Add(FeeLinkArgs),
    Remove(FeeLinkArgs),
}

#[derive(Args, Debug)]
struct FeeCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    details: String,
    /// Fee amount, e.g. "300" or "300.50".
    #[arg(long)]
    amount: String,
}

#[derive(Args, Debug)]
struct FeeLinkArgs {
    #[arg(long)]
    tenant_id: Uuid,
    #[arg(long)]
    fee_id: Uuid,
}

#[derive(Args, Debug)]
struct Tx {
    #[command(subcommand)]
    command: TxCommand,
}

#[derive(Subcommand, Debug)]
enum TxCommand {
    Record(TxRecordArgs),
    List(TxListArgs),
}

#[derive(Args, Debug)]
struct TxRecordArgs {
    #[arg(long)]
    username: String,
    /// One of: Deposit, Withdrawal, "Rent Payment", "Fee Payment".
    #[arg(long, value_parser = parse_kind)]
    kind: TransactionKind,
    /// One of: Cash, M-PESA, Bank, Other.
    #[arg(long, value_parser = parse_means, default_value = "Cash")]
    means: TransactionMeans,
    /// Amount, e.g. "1500" or "1500.75".
    #[arg(long)]
    amount: String,
    /// Gateway reference; leave unset for Cash.
    #[arg(long)]
    reference: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Args, Debug)]
struct TxListArgs {
    #[arg(long)]
    username: String,
    #[arg(long, value_parser = parse_kind)]
    kind: Option<TransactionKind>,
    #[arg(long, value_parser = parse_means)]
    means: Option<TransactionMeans>,
    #[arg(long, default_value_t = 20)]
    limit: u64,
}

#[derive(Args, Debug)]
struct AccountArgs {
    #[command(subcommand)]
    command: AccountCommand,
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    Show(AccountShowArgs),
}

#[derive(Args, Debug)]
struct AccountShowArgs {
    #[arg(long)]
    username: String,
}

#[derive(Args, Debug)]
struct Rent {
    #[command(subcommand)]
    command: RentCommand,
}

#[derive(Subcommand, Debug)]
enum RentCommand {
    Run(RentRunArgs),
}

#[derive(Args, Debug)]
struct RentRunArgs {
    #[arg(long)]
    group_id: Uuid,
    /// Cycle date (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    as_of: Option<NaiveDate>,
    /// Skip the due-date filter and charge every occupied unit.
    #[arg(long)]
    demo: bool,
    /// Record the charges as Cash with the `--` sentinel reference instead
    /// of generated tokens.
    #[arg(long)]
    cash_reference: bool,
}

fn parse_kind(raw: &str) -> Result<TransactionKind, String> {
    TransactionKind::try_from(raw).map_err(|err| err.to_string())
}

fn parse_means(raw: &str) -> Result<TransactionMeans, String> {
    TransactionMeans::try_from(raw).map_err(|err| err.to_string())
}

fn parse_amount(raw: &str) -> Result<i64, Box<dyn Error + Send + Sync>> {
    let money: Money = raw.parse()?;
    Ok(money.minor())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = Database::connect(&cli.database_url).await?;
    migration::Migrator::up(&db, None).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(user) => match user.command {
            UserCommand::Create(args) => {
                let mut cmd = NewUserCmd::new(args.username);
                if let Some(first_name) = args.first_name {
                    cmd = cmd.first_name(first_name);
                }
                if let Some(last_name) = args.last_name {
                    cmd = cmd.last_name(last_name);
                }
                if let Some(email) = args.email {
                    cmd = cmd.email(email);
                }
                if let Some(phone_number) = args.phone_number {
                    cmd = cmd.phone_number(phone_number);
                }
                let user_id = engine.create_user(cmd).await?;
                println!("created user {user_id}");
            }
        },
        Command::House(house) => match house.command {
            HouseCommand::Create(args) => {
                let mut cmd = NewHouseCmd::new(args.name, args.address);
                if let Some(description) = args.description {
                    cmd = cmd.description(description);
                }
                let house_id = engine.create_house(cmd).await?;
                println!("created house {house_id}");
            }
        },
        Command::Group(group) => match group.command {
            GroupCommand::Create(args) => {
                let mut cmd = UnitGroupCmd::new(
                    args.house_id,
                    args.name,
                    args.abbreviated_name,
                    args.units,
                    parse_amount(&args.rent)?,
                )
                .deposit_minor(parse_amount(&args.deposit)?);
                if let Some(format) = args.unit_name_format {
                    cmd = cmd.unit_name_format(format);
                }
                if let Some(format) = args.unit_abbreviated_name_format {
                    cmd = cmd.unit_abbreviated_name_format(format);
                }
                let group_id = engine.create_unit_group(cmd).await?;
                println!("created unit group {group_id}");
            }
            GroupCommand::Grow(args) => {
                let created = engine.set_number_of_units(args.group_id, args.units).await?;
                println!("created {created} new unit(s)");
            }
            GroupCommand::Show(args) => {
                let summary = engine.unit_group_summary(args.group_id).await?;
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
        },
        Command::Tenant(tenant) => match tenant.command {
            TenantCommand::Create(args) => {
                let lease_start = args.lease_start.unwrap_or_else(today);
                let mut cmd = TenantCmd::new(args.username, lease_start);
                if let Some(unit_id) = args.unit_id {
                    cmd = cmd.unit_id(unit_id);
                }
                if let Some(lease_end) = args.lease_end {
                    cmd = cmd.lease_end_date(lease_end);
                }
                let tenant_id = engine.create_tenant(cmd).await?;
                println!("created tenant {tenant_id}");
            }
            TenantCommand::Assign(args) => {
                let date = args.date.unwrap_or_else(today);
                engine.assign_unit(args.tenant_id, args.unit_id, date).await?;
                println!("assigned unit {} to tenant {}", args.unit_id, args.tenant_id);
            }
            TenantCommand::Release(args) => {
                engine.release_unit(args.tenant_id).await?;
                println!("released tenant {}", args.tenant_id);
            }
            TenantCommand::Remove(args) => {
                engine.remove_tenant(args.tenant_id).await?;
                println!("removed tenant {}", args.tenant_id);
            }
        },
        Command::Fee(fee) => match fee.command {
            FeeCommand::Create(args) => {
                let fee_id = engine
                    .create_extra_fee(ExtraFeeCmd::new(
                        args.name,
                        args.details,
                        parse_amount(&args.amount)?,
                    ))
                    .await?;
                println!("created fee {fee_id}");
            }
            FeeCommand::Add(args) => {
                engine.add_extra_fee(args.tenant_id, args.fee_id).await?;
                println!("fee {} now applies to tenant {}", args.fee_id, args.tenant_id);
            }
            FeeCommand::Remove(args) => {
                engine.remove_extra_fee(args.tenant_id, args.fee_id).await?;
                println!("fee {} detached from tenant {}", args.fee_id, args.tenant_id);
            }
        },
        Command::Tx(tx) => match tx.command {
            TxCommand::Record(args) => {
                let mut cmd = RecordTransactionCmd::new(
                    args.username,
                    args.kind,
                    args.means,
                    parse_amount(&args.amount)?,
                    Utc::now(),
                );
                if let Some(reference) = args.reference {
                    cmd = cmd.reference(reference);
                }
                if let Some(notes) = args.notes {
                    cmd = cmd.notes(notes);
                }
                let tx_id = engine.record_transaction(cmd).await?;
                println!("recorded transaction {tx_id}");
            }
            TxCommand::List(args) => {
                let mut filter = TransactionListFilter::default().limit(args.limit);
                if let Some(kind) = args.kind {
                    filter = filter.kind(kind);
                }
                if let Some(means) = args.means {
                    filter = filter.means(means);
                }
                let transactions = engine.list_transactions(&args.username, filter).await?;
                for tx in transactions {
                    println!(
                        "{}  {:<12}  {:<8}  {}  (ref {})",
                        tx.created_at.format("%Y-%m-%d"),
                        tx.kind.as_str(),
                        tx.means.as_str(),
                        tx.amount,
                        tx.reference,
                    );
                }
            }
        },
        Command::Account(account) => match account.command {
            AccountCommand::Show(args) => {
                let account = engine.account_for(&args.username).await?;
                println!(
                    "balance {}  debt {}",
                    account.balance,
                    account.debt_amount()
                );
            }
        },
        Command::Rent(rent) => match rent.command {
            RentCommand::Run(args) => {
                let mut cmd = RentCycleCmd::new(args.group_id, args.as_of.unwrap_or_else(today));
                if args.demo {
                    cmd = cmd.mode(RentCycleMode::Demo);
                }
                if args.cash_reference {
                    cmd = cmd.reference(RentReference::CashSentinel);
                }
                let report = engine.process_rent_payments(cmd).await?;
                for charge in &report.charged {
                    println!("charged {}  {}", charge.unit_name, charge.amount);
                }
                for failure in &report.failures {
                    println!("FAILED {}: {}", failure.unit_name, failure.error);
                }
                println!(
                    "charged {} unit(s), skipped {}, {} failure(s)",
                    report.charged.len(),
                    report.skipped,
                    report.failures.len()
                );
                if !report.failures.is_empty() {
                    std::process::exit(1);
                }
            }
        },
    }

    Ok(())
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
