//! Reference data repository: accounts and tax rates.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tally_core::projection::{Account, AccountType, ProjectionError, ReferenceData, TaxRate};
use tally_shared::types::AccountId;

use super::error::{StoreError, parse_column};
use crate::entities::{accounts, tax_rates};

/// Reads accounts and tax rates from the database.
#[derive(Debug, Clone)]
pub struct SeaOrmReferenceData {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmReferenceData {
    /// Creates a new reference data repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn account_by_xero_id(&self, xero_id: &str) -> Result<Option<Account>, StoreError> {
        accounts::Entity::find()
            .filter(accounts::Column::XeroId.eq(xero_id))
            .one(self.db.as_ref())
            .await?
            .map(account_from_model)
            .transpose()
    }

    async fn system_account(&self, account_type: AccountType) -> Result<Option<Account>, StoreError> {
        accounts::Entity::find()
            .filter(accounts::Column::IsSystemAccount.eq(true))
            .filter(accounts::Column::AccountType.eq(account_type.as_str()))
            .order_by_asc(accounts::Column::Code)
            .one(self.db.as_ref())
            .await?
            .map(account_from_model)
            .transpose()
    }

    async fn tax_rate_by_name(&self, name: &str) -> Result<Option<TaxRate>, StoreError> {
        let rate = tax_rates::Entity::find()
            .filter(tax_rates::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await?;
        Ok(rate.map(|model| TaxRate::new(model.name, model.rate)))
    }
}

/// Maps an accounts row onto the domain account.
pub(crate) fn account_from_model(model: accounts::Model) -> Result<Account, StoreError> {
    let account_type = parse_column("accounts", "type", &model.account_type)?;
    let tax_type = model
        .tax_type
        .as_deref()
        .map(|value| parse_column("accounts", "tax_type", value))
        .transpose()?;

    Ok(Account {
        id: AccountId::from_uuid(model.id),
        xero_id: model.xero_id,
        code: model.code,
        name: model.name,
        account_type,
        tax_type,
        is_system_account: model.is_system_account,
    })
}

#[async_trait]
impl ReferenceData for SeaOrmReferenceData {
    async fn find_account(&self, xero_id: &str) -> Result<Option<Account>, ProjectionError> {
        Ok(self.account_by_xero_id(xero_id).await?)
    }

    async fn find_system_account(
        &self,
        account_type: AccountType,
    ) -> Result<Option<Account>, ProjectionError> {
        Ok(self.system_account(account_type).await?)
    }

    async fn find_tax_rate(&self, name: &str) -> Result<Option<TaxRate>, ProjectionError> {
        Ok(self.tax_rate_by_name(name).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
    use tally_core::projection::TaxType;
    use uuid::Uuid;

    fn gst_account() -> accounts::Model {
        accounts::Model {
            id: Uuid::now_v7(),
            xero_id: "gst-xero".into(),
            code: "820".into(),
            name: "GST".into(),
            account_type: "CURRLIAB".into(),
            status: "ACTIVE".into(),
            tax_type: Some("BASEXCLUDED".into()),
            is_system_account: true,
            currency_code: "AUD".into(),
        }
    }

    #[tokio::test]
    async fn test_find_system_account() {
        let model = gst_account();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model.clone()]])
            .into_connection();

        let account = SeaOrmReferenceData::new(Arc::new(db))
            .find_system_account(AccountType::CurrLiab)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(account.id.into_inner(), model.id);
        assert_eq!(account.account_type, AccountType::CurrLiab);
        assert_eq!(account.tax_type, Some(TaxType::BasExcluded));
        assert!(account.is_system_account);
    }

    #[tokio::test]
    async fn test_find_account_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<accounts::Model>::new()])
            .into_connection();

        let account = SeaOrmReferenceData::new(Arc::new(db)).find_account("nope").await.unwrap();
        assert!(account.is_none());
    }

    #[tokio::test]
    async fn test_unknown_account_type_is_persistence_failure() {
        let mut model = gst_account();
        model.account_type = "ASSET".into();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model]])
            .into_connection();

        let err = SeaOrmReferenceData::new(Arc::new(db))
            .find_account("gst-xero")
            .await
            .unwrap_err();
        assert!(matches!(err, ProjectionError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_find_tax_rate() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![tax_rates::Model {
                id: Uuid::now_v7(),
                name: "GST on Income".into(),
                rate: dec!(0.100000),
                tax_type: Some("OUTPUT".into()),
            }]])
            .into_connection();

        let rate = SeaOrmReferenceData::new(Arc::new(db))
            .find_tax_rate("GST on Income")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rate.name, "GST on Income");
        assert_eq!(rate.rate, dec!(0.10));
    }

    #[tokio::test]
    async fn test_query_error_is_persistence_failure() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection refused".into())])
            .into_connection();

        let err = SeaOrmReferenceData::new(Arc::new(db))
            .find_tax_rate("GST on Income")
            .await
            .unwrap_err();
        assert!(matches!(err, ProjectionError::Persistence(ref msg) if msg.contains("connection refused")));
    }
}
