//! Composable filter specifications over catalog entities.
//!
//! A [`Filter`] describes which rows match a query without committing to how
//! the query executes: the in-memory store evaluates it with
//! [`Predicate::matches`], the Postgres store lowers it to SQL. `And` of an
//! empty sequence matches everything, and composition order never changes
//! the result set.

use uuid::Uuid;

use crate::models::{
    HarvestHistory, MetadataIdentifierTemplate, MetadataRecord, MetadataStatus, RecordKind,
};

/// A field-level comparison that can be checked against a candidate entity.
pub trait Predicate {
    type Entity;

    fn matches(&self, entity: &Self::Entity) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter<P> {
    /// Identity: matches every row.
    All,
    Is(P),
    And(Vec<Filter<P>>),
}

impl<P> Filter<P> {
    /// Combines filters with AND semantics. Zero filters match everything.
    pub fn and_all(filters: Vec<Filter<P>>) -> Filter<P> {
        Filter::And(filters)
    }
}

impl<P: Predicate> Filter<P> {
    pub fn matches(&self, entity: &P::Entity) -> bool {
        match self {
            Filter::All => true,
            Filter::Is(predicate) => predicate.matches(entity),
            Filter::And(children) => children.iter().all(|child| child.matches(entity)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordPredicate {
    HasUuid(Uuid),
    HasSource(String),
    HasHarvesterUuid(String),
    IsHarvested(bool),
    IsKind(RecordKind),
}

impl Predicate for RecordPredicate {
    type Entity = MetadataRecord;

    fn matches(&self, record: &MetadataRecord) -> bool {
        match self {
            RecordPredicate::HasUuid(uuid) => record.uuid == *uuid,
            RecordPredicate::HasSource(source_id) => record.source_info.source_id == *source_id,
            RecordPredicate::HasHarvesterUuid(uuid) => {
                record.source_info.harvester_uuid.as_deref() == Some(uuid.as_str())
            }
            RecordPredicate::IsHarvested(flag) => record.source_info.harvested == *flag,
            RecordPredicate::IsKind(kind) => record.data_info.kind == *kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusPredicate {
    HasMetadataId(i32),
    HasUserId(i32),
}

impl Predicate for StatusPredicate {
    type Entity = MetadataStatus;

    fn matches(&self, status: &MetadataStatus) -> bool {
        match self {
            StatusPredicate::HasMetadataId(metadata_id) => status.metadata_id == *metadata_id,
            StatusPredicate::HasUserId(user_id) => status.user_id == *user_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePredicate {
    IsSystemProvided(bool),
}

impl Predicate for TemplatePredicate {
    type Entity = MetadataIdentifierTemplate;

    fn matches(&self, template: &MetadataIdentifierTemplate) -> bool {
        match self {
            TemplatePredicate::IsSystemProvided(flag) => template.system_provided == *flag,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryPredicate {
    HasHarvesterType(String),
    HasHarvesterUuid(String),
}

impl Predicate for HistoryPredicate {
    type Entity = HarvestHistory;

    fn matches(&self, entry: &HarvestHistory) -> bool {
        match self {
            HistoryPredicate::HasHarvesterType(harvester_type) => {
                entry.harvester_type == *harvester_type
            }
            HistoryPredicate::HasHarvesterUuid(uuid) => entry.harvester_uuid == *uuid,
        }
    }
}

pub type RecordFilter = Filter<RecordPredicate>;
pub type StatusFilter = Filter<StatusPredicate>;
pub type TemplateFilter = Filter<TemplatePredicate>;
pub type HistoryFilter = Filter<HistoryPredicate>;

/// Reusable filter fragments over metadata records.
pub mod record {
    use super::{Filter, RecordFilter, RecordPredicate};
    use crate::models::RecordKind;
    use uuid::Uuid;

    pub fn has_uuid(uuid: Uuid) -> RecordFilter {
        Filter::Is(RecordPredicate::HasUuid(uuid))
    }

    pub fn has_source(source_id: impl Into<String>) -> RecordFilter {
        Filter::Is(RecordPredicate::HasSource(source_id.into()))
    }

    pub fn has_harvester_uuid(uuid: impl Into<String>) -> RecordFilter {
        Filter::Is(RecordPredicate::HasHarvesterUuid(uuid.into()))
    }

    pub fn is_harvested(flag: bool) -> RecordFilter {
        Filter::Is(RecordPredicate::IsHarvested(flag))
    }

    pub fn is_kind(kind: RecordKind) -> RecordFilter {
        Filter::Is(RecordPredicate::IsKind(kind))
    }
}

/// Reusable filter fragments over record workflow statuses.
pub mod status {
    use super::{Filter, StatusFilter, StatusPredicate};

    pub fn has_metadata_id(metadata_id: i32) -> StatusFilter {
        Filter::Is(StatusPredicate::HasMetadataId(metadata_id))
    }

    pub fn has_user_id(user_id: i32) -> StatusFilter {
        Filter::Is(StatusPredicate::HasUserId(user_id))
    }
}

/// Reusable filter fragments over identifier templates.
pub mod template {
    use super::{Filter, TemplateFilter, TemplatePredicate};

    pub fn is_system_provided(flag: bool) -> TemplateFilter {
        Filter::Is(TemplatePredicate::IsSystemProvided(flag))
    }
}

/// Reusable filter fragments over harvest history entries.
pub mod history {
    use super::{Filter, HistoryFilter, HistoryPredicate};

    pub fn has_harvester_type(harvester_type: impl Into<String>) -> HistoryFilter {
        Filter::Is(HistoryPredicate::HasHarvesterType(harvester_type.into()))
    }

    pub fn has_harvester_uuid(uuid: impl Into<String>) -> HistoryFilter {
        Filter::Is(HistoryPredicate::HasHarvesterUuid(uuid.into()))
    }
}
