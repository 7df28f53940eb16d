//! Projected journal repository.
//!
//! A projection (invoice journal, payment journal and all their lines) is
//! written inside one database transaction. Any failure rolls the whole
//! projection back.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tally_core::projection::{
    JournalFilter, JournalLine, JournalStore, ProjectedJournal, Projection, ProjectionError,
};
use tally_shared::types::{JournalLineId, ProjectedJournalId};
use tracing::{debug, warn};
use uuid::Uuid;

use super::error::{StoreError, parse_column};
use crate::entities::{projected_journal_lines, projected_journals};

/// Stores projected journals in the database.
///
/// The connection is shared with the other repositories through an [`Arc`].
#[derive(Debug, Clone)]
pub struct SeaOrmJournalStore {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmJournalStore {
    /// Creates a new projected journal repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Saves both journals of `projection` in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails; nothing is committed then.
    pub async fn save(&self, projection: &Projection) -> Result<(), StoreError> {
        let txn = self.db.begin().await?;
        debug!(invoice_id = %projection.invoice.id, "Transaction started");

        match Self::insert_projection(&txn, projection).await {
            Ok(()) => {
                txn.commit().await?;
                debug!(invoice_id = %projection.invoice.id, "Transaction committed");
                Ok(())
            }
            Err(err) => {
                warn!(invoice_id = %projection.invoice.id, error = %err, "Rolling back projection");
                if let Err(rollback_err) = txn.rollback().await {
                    warn!(
                        invoice_id = %projection.invoice.id,
                        error = %rollback_err,
                        "Rollback failed"
                    );
                }
                Err(err)
            }
        }
    }

    async fn insert_projection(
        txn: &DatabaseTransaction,
        projection: &Projection,
    ) -> Result<(), StoreError> {
        let now = Utc::now().fixed_offset();
        let journals = projection.journals();

        let headers = journals.iter().map(|journal| projected_journals::ActiveModel {
            id: Set(journal.id.into_inner()),
            date: Set(journal.date),
            source_type: Set(journal.source_type.as_str().to_string()),
            reference: Set(journal.reference.clone()),
            created_at: Set(now),
        });
        projected_journals::Entity::insert_many(headers)
            .exec_without_returning(txn)
            .await?;

        let lines = journals.iter().flat_map(|journal| {
            journal
                .lines
                .iter()
                .zip(1..)
                .map(|(line, line_number)| line_to_active_model(journal.id, line, line_number))
        });
        projected_journal_lines::Entity::insert_many(lines)
            .exec_without_returning(txn)
            .await?;

        Ok(())
    }

    /// Lists journals matching `filter`, ordered by date then id.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a row holds an unknown enum value.
    pub async fn list(&self, filter: &JournalFilter) -> Result<Vec<ProjectedJournal>, StoreError> {
        let mut query = projected_journals::Entity::find();
        if let Some(source_type) = filter.source_type {
            query = query.filter(projected_journals::Column::SourceType.eq(source_type.as_str()));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(projected_journals::Column::Date.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(projected_journals::Column::Date.lte(to));
        }

        let headers = query
            .order_by_asc(projected_journals::Column::Date)
            .order_by_asc(projected_journals::Column::Id)
            .all(self.db.as_ref())
            .await?;
        if headers.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = headers.iter().map(|header| header.id).collect();
        let mut lines_by_journal: HashMap<Uuid, Vec<projected_journal_lines::Model>> = HashMap::new();
        for line in projected_journal_lines::Entity::find()
            .filter(projected_journal_lines::Column::ProjectedJournalId.is_in(ids))
            .order_by_asc(projected_journal_lines::Column::ProjectedJournalId)
            .order_by_asc(projected_journal_lines::Column::LineNumber)
            .all(self.db.as_ref())
            .await?
        {
            lines_by_journal
                .entry(line.projected_journal_id)
                .or_default()
                .push(line);
        }

        headers
            .into_iter()
            .map(|header| {
                let lines = lines_by_journal.remove(&header.id).unwrap_or_default();
                journal_from_models(header, lines)
            })
            .collect()
    }

    /// Finds one journal with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a row holds an unknown enum value.
    pub async fn find(&self, id: ProjectedJournalId) -> Result<Option<ProjectedJournal>, StoreError> {
        let Some(header) = projected_journals::Entity::find_by_id(id.into_inner())
            .one(self.db.as_ref())
            .await?
        else {
            return Ok(None);
        };

        let lines = projected_journal_lines::Entity::find()
            .filter(projected_journal_lines::Column::ProjectedJournalId.eq(header.id))
            .order_by_asc(projected_journal_lines::Column::LineNumber)
            .all(self.db.as_ref())
            .await?;

        journal_from_models(header, lines).map(Some)
    }
}

fn line_to_active_model(
    journal_id: ProjectedJournalId,
    line: &JournalLine,
    line_number: i32,
) -> projected_journal_lines::ActiveModel {
    projected_journal_lines::ActiveModel {
        id: Set(line.id.into_inner()),
        projected_journal_id: Set(journal_id.into_inner()),
        account_xero_id: Set(line.account_xero_id.clone()),
        net_amount: Set(line.net_amount),
        gross_amount: Set(line.gross_amount),
        tax_amount: Set(line.tax_amount),
        tax_type: Set(line.tax_type.map(|tax_type| tax_type.as_str().to_string())),
        account_type: Set(line.account_type.as_str().to_string()),
        line_number: Set(line_number),
    }
}

fn journal_from_models(
    header: projected_journals::Model,
    lines: Vec<projected_journal_lines::Model>,
) -> Result<ProjectedJournal, StoreError> {
    let lines = lines
        .into_iter()
        .map(line_from_model)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ProjectedJournal {
        id: ProjectedJournalId::from_uuid(header.id),
        date: header.date,
        source_type: parse_column("projected_journals", "source_type", &header.source_type)?,
        reference: header.reference,
        lines,
    })
}

fn line_from_model(model: projected_journal_lines::Model) -> Result<JournalLine, StoreError> {
    let tax_type = model
        .tax_type
        .as_deref()
        .map(|value| parse_column("projected_journal_lines", "tax_type", value))
        .transpose()?;

    Ok(JournalLine {
        id: JournalLineId::from_uuid(model.id),
        account_type: parse_column("projected_journal_lines", "account_type", &model.account_type)?,
        account_xero_id: model.account_xero_id,
        net_amount: model.net_amount,
        gross_amount: model.gross_amount,
        tax_amount: model.tax_amount,
        tax_type,
    })
}

#[async_trait]
impl JournalStore for SeaOrmJournalStore {
    async fn save_projection(&self, projection: &Projection) -> Result<(), ProjectionError> {
        Ok(self.save(projection).await?)
    }

    async fn list_journals(
        &self,
        filter: &JournalFilter,
    ) -> Result<Vec<ProjectedJournal>, ProjectionError> {
        Ok(self.list(filter).await?)
    }

    async fn find_journal(
        &self,
        id: ProjectedJournalId,
    ) -> Result<Option<ProjectedJournal>, ProjectionError> {
        Ok(self.find(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, Transaction};
    use tally_core::projection::{
        Account, AccountType, JournalProjector, ProjectionInput, SourceType, TaxRate, TaxType,
        date_format, validate_journal,
    };

    fn projection() -> Projection {
        let input = ProjectionInput {
            date: date_format::parse("2017-01-01 00:00:00").unwrap(),
            reference: Some("INV-0001".into()),
            amount: dec!(100.00),
            tax_rate: TaxRate::new("GST on Income", dec!(0.10)),
            revenue_account: Account::new("sales-xero", "200", "Sales", AccountType::Revenue),
            bank_account: Account::new("bank-xero", "090", "Bank", AccountType::Bank),
            receivable_account: Account::new("ar-xero", "610", "AR", AccountType::Current).system(),
            tax_account: Account::new("gst-xero", "820", "GST", AccountType::CurrLiab).system(),
        };
        JournalProjector::default().project(&input).unwrap()
    }

    fn header(journal: &ProjectedJournal) -> projected_journals::Model {
        projected_journals::Model {
            id: journal.id.into_inner(),
            date: journal.date,
            source_type: journal.source_type.as_str().to_string(),
            reference: journal.reference.clone(),
            created_at: Utc::now().fixed_offset(),
        }
    }

    fn line_models(journal: &ProjectedJournal) -> Vec<projected_journal_lines::Model> {
        journal
            .lines
            .iter()
            .zip(1..)
            .map(|(line, line_number)| projected_journal_lines::Model {
                id: line.id.into_inner(),
                projected_journal_id: journal.id.into_inner(),
                account_xero_id: line.account_xero_id.clone(),
                net_amount: line.net_amount,
                gross_amount: line.gross_amount,
                tax_amount: line.tax_amount,
                tax_type: line.tax_type.map(|t| t.as_str().to_string()),
                account_type: line.account_type.as_str().to_string(),
                line_number,
            })
            .collect()
    }

    fn exec_result(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn store(db: DatabaseConnection) -> SeaOrmJournalStore {
        SeaOrmJournalStore::new(Arc::new(db))
    }

    /// Drops `store` and returns the statements the mock saw, one list per
    /// transaction.
    fn statements(store: SeaOrmJournalStore) -> Vec<Vec<String>> {
        let Ok(db) = Arc::try_unwrap(store.db) else {
            panic!("connection still shared");
        };
        db.into_transaction_log()
            .iter()
            .map(|txn: &Transaction| txn.statements().iter().map(|stmt| stmt.sql.clone()).collect())
            .collect()
    }

    fn is_insert_into(sql: &str, table: &str) -> bool {
        sql.starts_with(&format!(r#"INSERT INTO "{table}""#))
    }

    #[tokio::test]
    async fn test_save_projection() {
        let store = store(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec_result(2), exec_result(5)])
                .into_connection(),
        );

        store.save_projection(&projection()).await.unwrap();

        let log = statements(store);
        assert_eq!(log.len(), 1);
        let txn = &log[0];
        assert_eq!(txn.len(), 4);
        assert_eq!(txn[0], "BEGIN");
        assert!(is_insert_into(&txn[1], "projected_journals"));
        assert!(is_insert_into(&txn[2], "projected_journal_lines"));
        assert_eq!(txn[3], "COMMIT");
    }

    #[tokio::test]
    async fn test_failed_line_insert_rolls_back() {
        let store = store(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec_result(2)])
                .append_exec_errors([DbErr::Custom("check constraint violated".into())])
                .into_connection(),
        );

        let err = store.save_projection(&projection()).await.unwrap_err();
        assert!(
            matches!(err, ProjectionError::Persistence(ref msg) if msg.contains("check constraint violated"))
        );

        let log = statements(store);
        assert_eq!(log.len(), 1);
        let txn = &log[0];
        assert_eq!(txn.first().map(String::as_str), Some("BEGIN"));
        assert_eq!(txn.last().map(String::as_str), Some("ROLLBACK"));
        assert!(!txn.iter().any(|sql| sql == "COMMIT"));
        assert_eq!(
            txn.iter()
                .filter(|sql| sql.starts_with("INSERT INTO"))
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn test_failed_header_insert_skips_lines() {
        let store = store(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_errors([DbErr::Custom("duplicate key".into())])
                .into_connection(),
        );

        let err = store.save_projection(&projection()).await.unwrap_err();
        assert!(matches!(err, ProjectionError::Persistence(ref msg) if msg.contains("duplicate key")));

        let log = statements(store);
        let txn = &log[0];
        assert!(!txn.iter().any(|sql| is_insert_into(sql, "projected_journal_lines")));
        assert_eq!(txn.last().map(String::as_str), Some("ROLLBACK"));
    }

    #[tokio::test]
    async fn test_find_journal_with_lines() {
        let projection = projection();
        let invoice = &projection.invoice;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![header(invoice)]])
            .append_query_results([line_models(invoice)])
            .into_connection();

        let found = store(db)
            .find_journal(invoice.id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(&found, invoice);
        assert_eq!(found.lines[1].tax_type, Some(TaxType::Output));
        assert_eq!(found.lines[2].account_type, AccountType::CurrLiab);
    }

    #[tokio::test]
    async fn test_find_missing_journal() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<projected_journals::Model>::new()])
            .into_connection();

        let found = store(db)
            .find_journal(ProjectedJournalId::new())
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_list_groups_lines_by_journal() {
        let projection = projection();
        let (invoice, payment) = (&projection.invoice, &projection.payment);
        let mut lines = line_models(invoice);
        lines.extend(line_models(payment));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![header(invoice), header(payment)]])
            .append_query_results([lines])
            .into_connection();

        let journals = store(db)
            .list_journals(&JournalFilter::default())
            .await
            .unwrap();

        assert_eq!(journals.len(), 2);
        assert_eq!(journals[0].source_type, SourceType::Accrec);
        assert_eq!(journals[0].lines.len(), 3);
        assert_eq!(journals[1].source_type, SourceType::AccrecPayment);
        assert_eq!(journals[1].lines.len(), 2);
        assert!(journals.iter().all(|journal| validate_journal(journal).is_ok()));
        assert_eq!(journals[0].totals().gross, dec!(-10.00));
    }

    #[tokio::test]
    async fn test_list_with_no_matches_skips_line_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<projected_journals::Model>::new()])
            .into_connection();

        let journals = store(db)
            .list_journals(&JournalFilter::default().with_source_type(SourceType::Accrec))
            .await
            .unwrap();
        assert!(journals.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_source_type_is_persistence_failure() {
        let projection = projection();
        let mut bad = header(&projection.invoice);
        bad.source_type = "ACCPAY".into();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![bad]])
            .append_query_results([Vec::<projected_journal_lines::Model>::new()])
            .into_connection();

        let err = store(db)
            .find_journal(projection.invoice.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ProjectionError::Persistence(ref msg) if msg.contains("ACCPAY")));
    }
}
