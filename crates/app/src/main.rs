//! Haberdash Application CLI
//!
//! Operational entry points that must not live in the request path: seeding
//! default tax settings and managing coupons and category rate overrides.

use std::process;

use clap::{Args, Parser, Subcommand};
use haberdash::discounts::DiscountType;
use haberdash_app::{
    database::{self, Db},
    domain::{
        coupons::{
            CouponsService, PgCouponsService,
            models::{CouponUuid, NewCoupon},
        },
        tax::{
            PgTaxService, TaxService,
            models::{CategoryTaxRule, CategoryTaxRuleUuid},
        },
    },
};
use jiff::Timestamp;
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "haberdash-app", about = "Haberdash CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Settings(SettingsCommand),
    Coupon(CouponCommand),
    Tax(TaxCommand),
}

#[derive(Debug, Args)]
struct SettingsCommand {
    #[command(subcommand)]
    command: SettingsSubcommand,
}

#[derive(Debug, Subcommand)]
enum SettingsSubcommand {
    /// Idempotently seed the default tax settings row.
    Seed(DatabaseArgs),
}

#[derive(Debug, Args)]
struct CouponCommand {
    #[command(subcommand)]
    command: CouponSubcommand,
}

#[derive(Debug, Subcommand)]
enum CouponSubcommand {
    Create(CreateCouponArgs),
}

#[derive(Debug, Args)]
struct TaxCommand {
    #[command(subcommand)]
    command: TaxSubcommand,
}

#[derive(Debug, Subcommand)]
enum TaxSubcommand {
    /// Create or replace a category GST rate override.
    SetRule(SetRuleArgs),
}

#[derive(Debug, Args)]
struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[derive(Debug, Args)]
struct CreateCouponArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Coupon code; stored uppercase
    #[arg(long)]
    code: String,

    /// Discount type: `percentage` or `fixed`
    #[arg(long)]
    discount_type: String,

    /// Discount value: percent for `percentage`, rupees for `fixed`
    #[arg(long)]
    value: Decimal,

    /// Optional RFC 3339 expiry, e.g. `2027-01-01T00:00:00Z`
    #[arg(long)]
    expires_at: Option<String>,

    /// Optional maximum number of redemptions
    #[arg(long)]
    usage_limit: Option<u32>,
}

#[derive(Debug, Args)]
struct SetRuleArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Category UUID the override applies to
    #[arg(long)]
    category: Uuid,

    /// GST rate as a percentage, e.g. `5`
    #[arg(long)]
    rate: Decimal,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Settings(SettingsCommand {
            command: SettingsSubcommand::Seed(args),
        }) => seed_settings(args).await,
        Commands::Coupon(CouponCommand {
            command: CouponSubcommand::Create(args),
        }) => create_coupon(args).await,
        Commands::Tax(TaxCommand {
            command: TaxSubcommand::SetRule(args),
        }) => set_rule(args).await,
    }
}

async fn connect(database_url: &str) -> Result<Db, String> {
    let pool = database::connect(database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    Ok(Db::new(pool))
}

async fn seed_settings(args: DatabaseArgs) -> Result<(), String> {
    let db = connect(&args.database_url).await?;

    let seeded = PgTaxService::new(db)
        .ensure_default_settings()
        .await
        .map_err(|error| format!("failed to seed tax settings: {error}"))?;

    if seeded {
        println!("tax settings seeded with defaults");
    } else {
        println!("tax settings already present; nothing to do");
    }

    Ok(())
}

async fn create_coupon(args: CreateCouponArgs) -> Result<(), String> {
    let discount_type = args
        .discount_type
        .parse::<DiscountType>()
        .map_err(|error| error.to_string())?;

    let expires_at = args
        .expires_at
        .map(|raw| raw.parse::<Timestamp>())
        .transpose()
        .map_err(|error| format!("invalid expiry: {error}"))?;

    let db = connect(&args.database.database_url).await?;

    let coupon = PgCouponsService::new(db)
        .create_coupon(NewCoupon {
            uuid: CouponUuid::new(),
            code: args.code,
            discount_type,
            discount_value: args.value,
            expires_at,
            usage_limit: args.usage_limit,
        })
        .await
        .map_err(|error| format!("failed to create coupon: {error}"))?;

    println!("coupon_uuid: {}", coupon.uuid);
    println!("coupon_code: {}", coupon.code);

    Ok(())
}

async fn set_rule(args: SetRuleArgs) -> Result<(), String> {
    let db = connect(&args.database.database_url).await?;

    let rule = PgTaxService::new(db)
        .set_category_rule(CategoryTaxRule {
            uuid: CategoryTaxRuleUuid::new(),
            category_uuid: args.category,
            rate: args.rate,
        })
        .await
        .map_err(|error| format!("failed to set category rule: {error}"))?;

    println!("rule_uuid: {}", rule.uuid);
    println!("category_uuid: {}", rule.category_uuid);
    println!("rate: {}", rule.rate);

    Ok(())
}
