//! Ledger integrity checker for Khata.
//!
//! Rebuilds the trial balance for one business and exits nonzero when the
//! ledger does not balance, so cron jobs and deploy gates can watch the
//! books without scraping logs.
//!
//! Usage:
//!   verify-balance <business-id> [as-of-date]
//!
//! `as-of-date` is `YYYY-MM-DD` and defaults to today.

use chrono::{NaiveDate, Utc};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use khata_db::repositories::StatementRepository;
use khata_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "khata=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let business_id: Uuid = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("usage: verify-balance <business-id> [as-of-date]"))?
        .parse()?;
    let as_of = match args.next() {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")?,
        None => Utc::now().date_naive(),
    };

    // Load configuration
    let config = AppConfig::load()?;

    // Connect to database
    let db = khata_db::connect(&config.database.url).await?;
    info!("Connected to database");

    let report = StatementRepository::new(db)
        .trial_balance(business_id, as_of)
        .await?;

    println!("Trial balance for {business_id} as of {as_of}");
    for row in &report.rows {
        println!(
            "  {:<6} {:<28} Dr {:>14} Cr {:>14}",
            row.code, row.name, row.total_debit, row.total_credit
        );
    }
    println!("  Total debits:  {}", report.total_debit);
    println!("  Total credits: {}", report.total_credit);

    if report.balanced {
        println!("Ledger balanced.");
        Ok(())
    } else {
        println!("LEDGER OUT OF BALANCE by {}", report.discrepancy);
        std::process::exit(1);
    }
}
