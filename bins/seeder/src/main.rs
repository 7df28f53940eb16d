//! Reference data seeder for Tally development and testing.
//!
//! Seeds the chart of accounts and the tax rates used by projections.
//! Rows that already exist are left alone, so the seeder can be re-run.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tally_db::entities::{accounts, tax_rates};
use tally_shared::AppConfig;
use uuid::Uuid;

/// Seed account: external id, code, name, type, tax type, system flag.
type SeedAccount = (&'static str, &'static str, &'static str, &'static str, Option<&'static str>, bool);

const ACCOUNTS: [SeedAccount; 5] = [
    ("ar-xero", "610", "Accounts Receivable", "CURRENT", Some("BASEXCLUDED"), true),
    ("gst-xero", "820", "GST", "CURRLIAB", Some("BASEXCLUDED"), true),
    ("sales-xero", "200", "Sales", "REVENUE", Some("OUTPUT"), false),
    ("other-revenue-xero", "260", "Other Revenue", "REVENUE", Some("OUTPUT"), false),
    ("bank-xero", "090", "Business Bank Account", "BANK", None, false),
];

const TAX_RATES: [(&str, Decimal, &str); 3] = [
    ("GST on Income", dec!(0.10), "OUTPUT"),
    ("GST Free Income", dec!(0), "EXEMPTOUTPUT"),
    ("BAS Excluded", dec!(0), "BASEXCLUDED"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    println!("Connecting to database...");
    let db = tally_db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding accounts...");
    seed_accounts(&db).await?;

    println!("Seeding tax rates...");
    seed_tax_rates(&db).await?;

    println!("Seeding complete!");
    Ok(())
}

/// Seeds the chart of accounts.
async fn seed_accounts(db: &DatabaseConnection) -> anyhow::Result<()> {
    let mut inserted = 0;

    for (xero_id, code, name, account_type, tax_type, is_system) in ACCOUNTS {
        let existing = accounts::Entity::find()
            .filter(accounts::Column::XeroId.eq(xero_id))
            .one(db)
            .await?;
        if existing.is_some() {
            println!("  Account {code} {name} already exists, skipping...");
            continue;
        }

        accounts::ActiveModel {
            id: Set(Uuid::now_v7()),
            xero_id: Set(xero_id.to_string()),
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            account_type: Set(account_type.to_string()),
            status: Set("ACTIVE".to_string()),
            tax_type: Set(tax_type.map(str::to_string)),
            is_system_account: Set(is_system),
            currency_code: Set("AUD".to_string()),
        }
        .insert(db)
        .await
        .with_context(|| format!("Failed to insert account {code}"))?;
        inserted += 1;
    }

    println!("  Created {inserted} accounts");
    Ok(())
}

/// Seeds the tax rates selectable by name.
async fn seed_tax_rates(db: &DatabaseConnection) -> anyhow::Result<()> {
    let mut inserted = 0;

    for (name, rate, tax_type) in TAX_RATES {
        let existing = tax_rates::Entity::find()
            .filter(tax_rates::Column::Name.eq(name))
            .one(db)
            .await?;
        if existing.is_some() {
            println!("  Tax rate '{name}' already exists, skipping...");
            continue;
        }

        tax_rates::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.to_string()),
            rate: Set(rate),
            tax_type: Set(Some(tax_type.to_string())),
        }
        .insert(db)
        .await
        .with_context(|| format!("Failed to insert tax rate '{name}'"))?;
        inserted += 1;
    }

    println!("  Created {inserted} tax rates");
    Ok(())
}
