//! In-memory [`CatalogStore`] with the same paging and ordering semantics as
//! the Postgres adapter. Backs the hermetic test suite and any caller that
//! needs the query contract without a database.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::error::{CatalogError, CatalogResult};
use crate::filter::{HistoryFilter, RecordFilter, StatusFilter, TemplateFilter};
use crate::models::{
    HarvestHistory, MetadataIdentifierTemplate, MetadataRecord, MetadataSourceInfo, MetadataStatus,
    SimpleMetadata,
};
use crate::page::{Page, PageRequest, SortDirection, SortField, SortKey};
use crate::store::CatalogStore;

#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    records: Vec<MetadataRecord>,
    history: Vec<HarvestHistory>,
    templates: Vec<MetadataIdentifierTemplate>,
    statuses: Vec<MetadataStatus>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(mut self, records: Vec<MetadataRecord>) -> Self {
        self.records = records;
        self
    }

    pub fn with_history(mut self, history: Vec<HarvestHistory>) -> Self {
        self.history = history;
        self
    }

    pub fn with_templates(mut self, templates: Vec<MetadataIdentifierTemplate>) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_statuses(mut self, statuses: Vec<MetadataStatus>) -> Self {
        self.statuses = statuses;
        self
    }
}

fn compare_records(a: &MetadataRecord, b: &MetadataRecord, sort: &[SortKey]) -> Ordering {
    for key in sort {
        let ordering = match key.field {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Uuid => a.uuid.cmp(&b.uuid),
            SortField::ChangeDate => a.data_info.change_date.cmp(&b.data_info.change_date),
        };
        let ordering = match key.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    // Stable tiebreak so equal sort keys page deterministically.
    a.id.cmp(&b.id)
}

fn paginate<T>(matched: Vec<T>, page: Option<&PageRequest>) -> Page<T> {
    let total = matched.len() as u64;
    match page {
        Some(request) => {
            let start = request.offset() as usize;
            let end = start.saturating_add(request.size as usize);
            let items = if start >= matched.len() {
                Vec::new()
            } else {
                matched
                    .into_iter()
                    .skip(start)
                    .take(end - start)
                    .collect()
            };
            Page {
                items,
                page: request.page,
                size: request.size,
                total,
            }
        }
        None => Page {
            page: 0,
            size: matched.len() as u32,
            total,
            items: matched,
        },
    }
}

impl InMemoryCatalogStore {
    fn sorted_matches(&self, filter: &RecordFilter, sort: &[SortKey]) -> Vec<MetadataRecord> {
        let mut matched: Vec<MetadataRecord> = self
            .records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        matched.sort_by(|a, b| compare_records(a, b, sort));
        matched
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn find_record(&self, id: i32) -> CatalogResult<Option<MetadataRecord>> {
        Ok(self.records.iter().find(|record| record.id == id).cloned())
    }

    fn find_records(
        &self,
        filter: &RecordFilter,
        page: Option<&PageRequest>,
    ) -> CatalogResult<Page<MetadataRecord>> {
        let sort = page.map(|request| request.sort.as_slice()).unwrap_or(&[]);
        Ok(paginate(self.sorted_matches(filter, sort), page))
    }

    fn find_record_ids(&self, filter: &RecordFilter) -> CatalogResult<Vec<i32>> {
        Ok(self
            .sorted_matches(filter, &[])
            .into_iter()
            .map(|record| record.id)
            .collect())
    }

    fn find_ids_and_change_dates(
        &self,
        page: Option<&PageRequest>,
    ) -> CatalogResult<Page<(i32, NaiveDateTime)>> {
        let sort = page.map(|request| request.sort.as_slice()).unwrap_or(&[]);
        let pairs = self
            .sorted_matches(&RecordFilter::All, sort)
            .into_iter()
            .map(|record| (record.id, record.data_info.change_date))
            .collect();
        Ok(paginate(pairs, page))
    }

    fn find_oldest_by_change_date(&self) -> CatalogResult<MetadataRecord> {
        self.records
            .iter()
            .min_by(|a, b| {
                a.data_info
                    .change_date
                    .cmp(&b.data_info.change_date)
                    .then(a.id.cmp(&b.id))
            })
            .cloned()
            .ok_or(CatalogError::NotFound)
    }

    fn find_source_info(
        &self,
        filter: &RecordFilter,
    ) -> CatalogResult<HashMap<i32, MetadataSourceInfo>> {
        Ok(self
            .records
            .iter()
            .filter(|record| filter.matches(record))
            .map(|record| (record.id, record.source_info.clone()))
            .collect())
    }

    fn find_simple_summaries(&self, harvester_uuid: &str) -> CatalogResult<Vec<SimpleMetadata>> {
        let mut matched: Vec<&MetadataRecord> = self
            .records
            .iter()
            .filter(|record| {
                record.source_info.harvester_uuid.as_deref() == Some(harvester_uuid)
            })
            .collect();
        matched.sort_by_key(|record| record.id);
        Ok(matched.into_iter().map(SimpleMetadata::from).collect())
    }

    fn find_history(&self, filter: &HistoryFilter) -> CatalogResult<Vec<HarvestHistory>> {
        let mut matched: Vec<HarvestHistory> = self
            .history
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect();
        matched.sort_by_key(|entry| entry.id);
        Ok(matched)
    }

    fn find_templates(
        &self,
        filter: &TemplateFilter,
    ) -> CatalogResult<Vec<MetadataIdentifierTemplate>> {
        let mut matched: Vec<MetadataIdentifierTemplate> = self
            .templates
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect();
        matched.sort_by_key(|entry| entry.id);
        Ok(matched)
    }

    fn find_statuses(&self, filter: &StatusFilter) -> CatalogResult<Vec<MetadataStatus>> {
        let mut matched: Vec<MetadataStatus> = self
            .statuses
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            (a.metadata_id, a.user_id, a.change_date).cmp(&(b.metadata_id, b.user_id, b.change_date))
        });
        Ok(matched)
    }
}
