//! Initial database migration.
//!
//! Creates the reference tables (accounts, tax rates) and the projected
//! journal tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: REFERENCE DATA
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(TAX_RATES_SQL).await?;

        // ============================================================
        // PART 2: PROJECTED JOURNALS
        // ============================================================
        db.execute_unprepared(PROJECTED_JOURNALS_SQL).await?;
        db.execute_unprepared(PROJECTED_JOURNAL_LINES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    xero_id VARCHAR(64) NOT NULL UNIQUE,
    code VARCHAR(16) NOT NULL,
    name VARCHAR(255) NOT NULL,
    type VARCHAR(16) NOT NULL CHECK (type IN (
        'BANK', 'CURRENT', 'CURRLIAB', 'DEPRECIATN', 'DIRECTCOSTS', 'EQUITY',
        'EXPENSE', 'FIXED', 'INVENTORY', 'LIABILITY', 'NONCURRENT',
        'OTHERINCOME', 'OVERHEADS', 'PREPAYMENT', 'REVENUE', 'SALES', 'TERMLIAB'
    )),
    status VARCHAR(16) NOT NULL DEFAULT 'ACTIVE',
    tax_type VARCHAR(16),
    is_system_account BOOLEAN NOT NULL DEFAULT FALSE,
    currency_code CHAR(3) NOT NULL DEFAULT 'AUD'
);

CREATE INDEX idx_accounts_system_type ON accounts(type) WHERE is_system_account;
";

const TAX_RATES_SQL: &str = r"
CREATE TABLE tax_rates (
    id UUID PRIMARY KEY,
    name VARCHAR(100) NOT NULL UNIQUE,
    rate NUMERIC(9, 6) NOT NULL CHECK (rate >= 0),
    tax_type VARCHAR(16)
);
";

const PROJECTED_JOURNALS_SQL: &str = r"
CREATE TABLE projected_journals (
    id UUID PRIMARY KEY,
    date TIMESTAMP NOT NULL,
    source_type VARCHAR(16) NOT NULL CHECK (source_type IN ('ACCREC', 'ACCRECPAYMENT')),
    reference VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_projected_journals_date ON projected_journals(date, id);
CREATE INDEX idx_projected_journals_source_type ON projected_journals(source_type);
";

const PROJECTED_JOURNAL_LINES_SQL: &str = r"
CREATE TABLE projected_journal_lines (
    id UUID PRIMARY KEY,
    projected_journal_id UUID NOT NULL REFERENCES projected_journals(id) ON DELETE CASCADE,
    account_xero_id VARCHAR(64) NOT NULL,
    net_amount NUMERIC(19, 2) NOT NULL,
    gross_amount NUMERIC(19, 2) NOT NULL,
    tax_amount NUMERIC(19, 2) NOT NULL,
    tax_type VARCHAR(16),
    account_type VARCHAR(16) NOT NULL,
    line_number INTEGER NOT NULL,
    CONSTRAINT chk_line_gross_is_net_plus_tax CHECK (gross_amount = net_amount + tax_amount),
    CONSTRAINT uq_line_number UNIQUE (projected_journal_id, line_number)
);

CREATE INDEX idx_projected_journal_lines_journal ON projected_journal_lines(projected_journal_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS projected_journal_lines CASCADE;
DROP TABLE IF EXISTS projected_journals CASCADE;
DROP TABLE IF EXISTS tax_rates CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
";
