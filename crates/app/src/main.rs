//! Tiffin Application CLI

use std::process;

use clap::{Args, Parser, Subcommand};
use tiffin_app::{
    database::{self, Db},
    domain::{
        coupons::{CouponsService, PgCouponsService},
        settings::{PgSettingsService, SettingsService},
    },
};

#[derive(Debug, Parser)]
#[command(name = "tiffin-app", about = "Tiffin CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Coupon(CouponCommand),
    Settings(SettingsCommand),
}

#[derive(Debug, Args)]
struct CouponCommand {
    #[command(subcommand)]
    command: CouponSubcommand,
}

#[derive(Debug, Subcommand)]
enum CouponSubcommand {
    /// Consume one use of a coupon
    Redeem(RedeemArgs),
    /// List coupons visible to customers
    List(ListCouponsArgs),
}

#[derive(Debug, Args)]
struct SettingsCommand {
    #[command(subcommand)]
    command: SettingsSubcommand,
}

#[derive(Debug, Subcommand)]
enum SettingsSubcommand {
    /// Print the latest published order settings
    Show(ShowSettingsArgs),
}

#[derive(Debug, Args)]
struct RedeemArgs {
    /// Coupon code to redeem
    #[arg(long)]
    code: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[derive(Debug, Args)]
struct ListCouponsArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[derive(Debug, Args)]
struct ShowSettingsArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
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
        Commands::Coupon(CouponCommand {
            command: CouponSubcommand::Redeem(args),
        }) => redeem_coupon(args).await,
        Commands::Coupon(CouponCommand {
            command: CouponSubcommand::List(args),
        }) => list_coupons(args).await,
        Commands::Settings(SettingsCommand {
            command: SettingsSubcommand::Show(args),
        }) => show_settings(args).await,
    }
}

async fn redeem_coupon(args: RedeemArgs) -> Result<(), String> {
    let db = connect(&args.database_url).await?;
    let service = PgCouponsService::new(db);

    let redemption = service
        .redeem_coupon(&args.code)
        .await
        .map_err(|error| format!("redemption failed ({}): {error}", error.code()))?;

    println!("code: {}", redemption.code);
    println!("used_count: {}", redemption.used_count);
    println!("usage_limit: {}", redemption.usage_limit);

    Ok(())
}

async fn list_coupons(args: ListCouponsArgs) -> Result<(), String> {
    let db = connect(&args.database_url).await?;
    let service = PgCouponsService::new(db);

    let coupons = service
        .list_visible_coupons()
        .await
        .map_err(|error| format!("failed to list coupons: {error}"))?;

    if coupons.is_empty() {
        println!("no visible coupons");
        return Ok(());
    }

    for coupon in coupons {
        println!(
            "{}: {:?} {} (used {}/{})",
            coupon.code, coupon.coupon_type, coupon.value, coupon.used_count, coupon.usage_limit
        );
    }

    Ok(())
}

async fn show_settings(args: ShowSettingsArgs) -> Result<(), String> {
    let db = connect(&args.database_url).await?;
    let service = PgSettingsService::new(db);

    let snapshot = service
        .fetch_order_settings()
        .await
        .map_err(|error| format!("failed to fetch settings: {error}"))?;

    match snapshot {
        Some(snapshot) => {
            println!("version: {}", snapshot.version);
            println!(
                "base_delivery_charge: {:?}",
                snapshot.settings.base_delivery_charge.value()
            );
            println!(
                "extra_item_threshold: {:?}",
                snapshot.settings.extra_item_threshold.value()
            );
            println!(
                "extra_item_charge: {:?}",
                snapshot.settings.extra_item_charge.value()
            );
            println!(
                "light_item_threshold: {:?}",
                snapshot.settings.light_item_threshold.value()
            );
            println!("heavy_items: {}", snapshot.settings.heavy_items.len());
            println!("light_items: {}", snapshot.settings.light_items.len());
            println!(
                "campuses: {}",
                snapshot.settings.delivery_campus_config.len()
            );
        }
        None => println!("no published settings"),
    }

    Ok(())
}

async fn connect(database_url: &str) -> Result<Db, String> {
    let pool = database::connect(database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    Ok(Db::new(pool))
}
