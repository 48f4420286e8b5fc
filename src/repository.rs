//! Named finder operations over a [`CatalogStore`]. The store is injected at
//! construction; nothing here reaches into ambient state.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::{CatalogError, CatalogResult};
use crate::filter::{history, HistoryFilter, RecordFilter, StatusFilter, TemplateFilter};
use crate::models::{
    HarvestHistory, MetadataIdentifierTemplate, MetadataRecord, MetadataSourceInfo, MetadataStatus,
    SimpleMetadata,
};
use crate::page::{Page, PageRequest};
use crate::store::CatalogStore;

pub struct CatalogRepository<S> {
    store: S,
}

impl<S: CatalogStore> CatalogRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Looks up a record by its caller-supplied identifier string. A string
    /// that does not parse as an integer is rejected before the store is
    /// touched; an unknown id is `Ok(None)`, not an error.
    pub fn find_one_by_id(&self, id: &str) -> CatalogResult<Option<MetadataRecord>> {
        let id: i32 = id.parse().map_err(|_| {
            CatalogError::invalid_argument(format!(
                "record id must be parsable to an integer, got '{id}'"
            ))
        })?;
        self.store.find_record(id)
    }

    pub fn find_records(
        &self,
        filter: &RecordFilter,
        page: Option<&PageRequest>,
    ) -> CatalogResult<Page<MetadataRecord>> {
        self.store.find_records(filter, page)
    }

    pub fn find_all_ids_and_change_dates(
        &self,
        page: Option<&PageRequest>,
    ) -> CatalogResult<Page<(i32, NaiveDateTime)>> {
        self.store.find_ids_and_change_dates(page)
    }

    /// Identifiers of every record matching the filter. Unbounded: the
    /// caller owns result sizing.
    pub fn find_all_ids_matching(&self, filter: &RecordFilter) -> CatalogResult<Vec<i32>> {
        self.store.find_record_ids(filter)
    }

    /// The record whose change date precedes every other record's. Errors
    /// with [`CatalogError::NotFound`] when the catalog is empty.
    pub fn find_oldest_by_change_date(&self) -> CatalogResult<MetadataRecord> {
        self.store.find_oldest_by_change_date()
    }

    /// Source info for every record matching the filter, keyed by record id.
    /// Unbounded: the caller owns result sizing.
    pub fn find_all_source_info(
        &self,
        filter: &RecordFilter,
    ) -> CatalogResult<HashMap<i32, MetadataSourceInfo>> {
        self.store.find_source_info(filter)
    }

    /// Summaries of every record harvested from the given source instance.
    /// Unbounded: the caller owns result sizing.
    pub fn find_all_simple_summaries(
        &self,
        harvester_uuid: &str,
    ) -> CatalogResult<Vec<SimpleMetadata>> {
        debug!(harvester_uuid, "listing simple summaries");
        self.store.find_simple_summaries(harvester_uuid)
    }

    pub fn find_all_by_harvester_type(
        &self,
        harvester_type: &str,
    ) -> CatalogResult<Vec<HarvestHistory>> {
        self.store
            .find_history(&history::has_harvester_type(harvester_type))
    }

    pub fn find_all_by_harvester_uuid(&self, uuid: &str) -> CatalogResult<Vec<HarvestHistory>> {
        self.store.find_history(&history::has_harvester_uuid(uuid))
    }

    pub fn find_history(&self, filter: &HistoryFilter) -> CatalogResult<Vec<HarvestHistory>> {
        self.store.find_history(filter)
    }

    pub fn find_templates(
        &self,
        filter: &TemplateFilter,
    ) -> CatalogResult<Vec<MetadataIdentifierTemplate>> {
        self.store.find_templates(filter)
    }

    pub fn find_statuses(&self, filter: &StatusFilter) -> CatalogResult<Vec<MetadataStatus>> {
        self.store.find_statuses(filter)
    }
}
