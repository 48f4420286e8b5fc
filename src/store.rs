use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::error::CatalogResult;
use crate::filter::{HistoryFilter, RecordFilter, StatusFilter, TemplateFilter};
use crate::models::{
    HarvestHistory, MetadataIdentifierTemplate, MetadataRecord, MetadataSourceInfo, MetadataStatus,
    SimpleMetadata,
};
use crate::page::{Page, PageRequest};

/// The backing-store seam of the query subsystem. Every operation is
/// read-only and safe to call from concurrent threads; "nothing matched" is
/// an empty collection or page, never an error. Implementations must compute
/// page totals against the filtered but un-paged set and keep unsorted
/// results in a stable id order.
pub trait CatalogStore: Send + Sync {
    fn find_record(&self, id: i32) -> CatalogResult<Option<MetadataRecord>>;

    fn find_records(
        &self,
        filter: &RecordFilter,
        page: Option<&PageRequest>,
    ) -> CatalogResult<Page<MetadataRecord>>;

    /// Raw identifier projection. Unbounded; the caller owns result sizing.
    fn find_record_ids(&self, filter: &RecordFilter) -> CatalogResult<Vec<i32>>;

    fn find_ids_and_change_dates(
        &self,
        page: Option<&PageRequest>,
    ) -> CatalogResult<Page<(i32, NaiveDateTime)>>;

    /// Errors with [`crate::CatalogError::NotFound`] on an empty catalog.
    fn find_oldest_by_change_date(&self) -> CatalogResult<MetadataRecord>;

    /// Bulk id-to-source-info projection. Unbounded; the caller owns result
    /// sizing.
    fn find_source_info(
        &self,
        filter: &RecordFilter,
    ) -> CatalogResult<HashMap<i32, MetadataSourceInfo>>;

    /// Summaries of every record harvested from the given source. Unbounded;
    /// the caller owns result sizing.
    fn find_simple_summaries(&self, harvester_uuid: &str) -> CatalogResult<Vec<SimpleMetadata>>;

    fn find_history(&self, filter: &HistoryFilter) -> CatalogResult<Vec<HarvestHistory>>;

    fn find_templates(
        &self,
        filter: &TemplateFilter,
    ) -> CatalogResult<Vec<MetadataIdentifierTemplate>>;

    fn find_statuses(&self, filter: &StatusFilter) -> CatalogResult<Vec<MetadataStatus>>;
}
