//! A [`RecordStore`] over a fixed, in-memory record set.

use std::collections::BTreeSet;
use std::path::Path;

use async_trait::async_trait;
use invest_map_analytics::{aggregate, breakdown, filter::matches};
use invest_map_analytics_models::{
    DashboardMetric, FilterState, PageRequest, RecordPage, RegionMetric,
};
use invest_map_investment_models::InvestmentRecord;

use crate::{RecordStore, StoreError};

/// Serves queries over a record set held in memory, using the aggregation
/// engine for every metric.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Vec<InvestmentRecord>,
}

impl InMemoryStore {
    /// Creates a store over `records`.
    #[must_use]
    pub fn from_records(records: Vec<InvestmentRecord>) -> Self {
        log::debug!("In-memory store holding {} records", records.len());
        Self { records }
    }

    /// Parses a JSON array of records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Json`] if the input is not a valid record array.
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let records: Vec<InvestmentRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    /// Reads a JSON array of records from a file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be read, or
    /// [`StoreError::Json`] if its contents are not a valid record array.
    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path)?;
        let store = Self::from_json_str(&json)?;
        log::info!(
            "Loaded {} investment records from {}",
            store.records.len(),
            path.display()
        );
        Ok(store)
    }

    /// All records held by the store.
    #[must_use]
    pub fn records(&self) -> &[InvestmentRecord] {
        &self.records
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn fetch_dashboard_metrics(
        &self,
        filter: &FilterState,
    ) -> Result<DashboardMetric, StoreError> {
        let mut dashboard = aggregate(&self.records, filter).dashboard;
        dashboard.growth_rate = None;
        Ok(dashboard)
    }

    async fn fetch_region_metrics(
        &self,
        filter: &FilterState,
    ) -> Result<Vec<RegionMetric>, StoreError> {
        let mut regions = aggregate(&self.records, filter).regions;
        for region in &mut regions {
            region.growth_rate = None;
        }
        Ok(regions)
    }

    async fn fetch_available_years(&self) -> Result<BTreeSet<i32>, StoreError> {
        Ok(breakdown::available_years(&self.records))
    }

    async fn fetch_records(
        &self,
        filter: &FilterState,
        page: PageRequest,
    ) -> Result<RecordPage, StoreError> {
        let page = PageRequest::new(page.page, page.per_page);
        let matching: Vec<&InvestmentRecord> =
            self.records.iter().filter(|r| matches(r, filter)).collect();
        let records = matching
            .iter()
            .skip(page.offset())
            .take(page.per_page as usize)
            .map(|r| (*r).clone())
            .collect();
        Ok(RecordPage {
            records,
            page: page.page,
            per_page: page.per_page,
            total: matching.len() as u64,
        })
    }

    async fn fetch_cities(&self) -> Result<Vec<String>, StoreError> {
        Ok(breakdown::available_cities(&self.records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invest_map_investment_models::{CapitalStatus, Subsector};
    use rust_decimal::Decimal;

    const RECORDS_JSON: &str = r#"[
        {"companyName": "PT Rasa Priangan", "registrationId": "9120000000001",
         "classificationCode": "56101", "classificationTitle": "Restoran",
         "subsector": "CULINARY", "region": "Kota Bandung", "amount": "200",
         "workers": 10, "capitalStatus": "PMDN", "year": 2023, "quarter": 1},
        {"companyName": "PT Lensa Kota", "registrationId": "9120000000002",
         "classificationCode": "74201", "classificationTitle": "Fotografi",
         "subsector": "PHOTOGRAPHY", "region": "Kota Bandung", "amount": "250",
         "workers": 4, "capitalStatus": "PMA", "year": 2024, "quarter": 2},
        {"companyName": "PT Nada Bekasi", "registrationId": "9120000000003",
         "classificationCode": "59201", "classificationTitle": "Rekaman Suara",
         "subsector": "MUSIC", "region": "Kota Bekasi", "amount": "300",
         "workers": 20, "capitalStatus": "PMDN", "year": 2024, "quarter": 3}
    ]"#;

    fn store() -> InMemoryStore {
        InMemoryStore::from_json_str(RECORDS_JSON).unwrap()
    }

    #[test]
    fn parses_json_records() {
        let store = store();
        assert_eq!(store.records().len(), 3);
        assert_eq!(store.records()[1].subsector, Subsector::Photography);
        assert_eq!(store.records()[1].capital_status, CapitalStatus::Pma);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            InMemoryStore::from_json_str("{"),
            Err(StoreError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            InMemoryStore::from_path(Path::new("/nonexistent/records.json")),
            Err(StoreError::Io(_))
        ));
    }

    #[tokio::test]
    async fn region_metrics_are_raw_totals() {
        let regions = store()
            .fetch_region_metrics(&FilterState::default().with_year(2024))
            .await
            .unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].region, "Kota Bandung");
        assert_eq!(regions[0].total_investment, Decimal::from(250));
        assert!(regions.iter().all(|m| m.growth_rate.is_none()));
    }

    #[tokio::test]
    async fn dashboard_metrics_sum_scope() {
        let dashboard = store()
            .fetch_dashboard_metrics(&FilterState::default())
            .await
            .unwrap();
        assert_eq!(dashboard.company_count, 3);
        assert_eq!(dashboard.total_investment, Decimal::from(750));
        assert_eq!(dashboard.total_workers, 34);
    }

    #[tokio::test]
    async fn years_and_cities() {
        let store = store();
        let years: Vec<_> = store
            .fetch_available_years()
            .await
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(years, [2023, 2024]);
        assert_eq!(
            store.fetch_cities().await.unwrap(),
            ["Kota Bandung", "Kota Bekasi"]
        );
    }

    #[tokio::test]
    async fn pages_through_matching_records() {
        let store = store();
        let first = store
            .fetch_records(&FilterState::default(), PageRequest::new(1, 2))
            .await
            .unwrap();
        assert_eq!(first.total, 3);
        assert_eq!(first.records.len(), 2);
        assert_eq!(first.page_count(), 2);

        let second = store
            .fetch_records(&FilterState::default(), PageRequest::new(2, 2))
            .await
            .unwrap();
        assert_eq!(second.records.len(), 1);
        assert_eq!(second.records[0].company_name, "PT Nada Bekasi");

        let searched = store
            .fetch_records(
                &FilterState {
                    search: Some("lensa".to_string()),
                    ..FilterState::default()
                },
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(searched.total, 1);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let page = store()
            .fetch_records(&FilterState::default(), PageRequest::new(9, 25))
            .await
            .unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.total, 3);
    }
}
