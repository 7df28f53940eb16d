//! Property-based tests for the projection service.
//!
//! A projection is either stored whole or not at all.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::RoundingMode;

use super::account::TaxRate;
use super::journal::date_format;
use super::memory::{InMemoryJournalStore, StaticReferenceData};
use super::projector::tests::{bank, gst, receivable, sales};
use super::service::ProjectionService;
use super::types::{JournalFilter, ProjectInvoiceRequest};
use super::validation::validate_journal;

fn service() -> ProjectionService<StaticReferenceData, InMemoryJournalStore> {
    let reference = StaticReferenceData::new()
        .with_account(receivable())
        .with_account(sales())
        .with_account(gst())
        .with_account(bank())
        .with_tax_rate(TaxRate::new("GST on Income", Decimal::new(10, 2)));
    ProjectionService::new(reference, InMemoryJournalStore::new(), RoundingMode::Bankers)
}

fn request(amount: Decimal, tax_rate: &str) -> ProjectInvoiceRequest {
    ProjectInvoiceRequest {
        date: date_format::parse("2017-01-01").unwrap(),
        revenue_account_id: "sales-xero".into(),
        bank_account_id: "bank-xero".into(),
        tax_rate: tax_rate.into(),
        amount,
        reference: None,
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Every successful call stores exactly one balanced pair.
    #[test]
    fn prop_each_call_stores_one_pair(
        amounts in prop::collection::vec((1i64..10_000_000i64).prop_map(|c| Decimal::new(c, 2)), 1..8),
    ) {
        let rt = runtime();
        let service = service();

        for amount in &amounts {
            rt.block_on(service.project_invoice(&request(*amount, "GST on Income"))).unwrap();
        }

        let stored = service.store().all().unwrap();
        prop_assert_eq!(stored.len(), amounts.len() * 2);
        prop_assert!(stored.iter().all(|journal| validate_journal(journal).is_ok()));

        let summary = rt.block_on(service.summarize(&JournalFilter::default())).unwrap();
        prop_assert!(summary.outstanding().is_zero());
        prop_assert_eq!(summary.invoiced_gross, summary.invoiced_net + summary.tax_collected);
    }

    /// Failed calls leave the store untouched.
    #[test]
    fn prop_failures_store_nothing(
        cents in 1i64..10_000_000i64,
        valid in any::<bool>(),
    ) {
        let rt = runtime();
        let service = service();
        let tax_rate = if valid { "GST on Income" } else { "Unknown Rate" };

        let result = rt.block_on(service.project_invoice(&request(Decimal::new(cents, 2), tax_rate)));

        let stored = service.store().all().unwrap();
        if valid {
            prop_assert!(result.is_ok());
            prop_assert_eq!(stored.len(), 2);
        } else {
            prop_assert!(result.is_err());
            prop_assert!(stored.is_empty());
        }
    }
}
