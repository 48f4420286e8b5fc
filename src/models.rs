use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// What a catalog row represents: a plain record, a template used to create
/// new records, or a sub-template fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Metadata,
    Template,
    SubTemplate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataDataInfo {
    /// Timestamp of the most recent modification; advances on every edit.
    pub change_date: NaiveDateTime,
    pub kind: RecordKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataSourceInfo {
    /// Identifier of the owning or harvesting source.
    pub source_id: String,
    /// Harvesting source instance, matched by value; not a foreign key.
    pub harvester_uuid: Option<String>,
    pub harvested: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataRecord {
    pub id: i32,
    pub uuid: Uuid,
    pub data_info: MetadataDataInfo,
    pub source_info: MetadataSourceInfo,
}

/// One completed execution of a harvesting job. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarvestHistory {
    pub id: i32,
    pub harvester_uuid: String,
    pub harvester_type: String,
    pub harvester_name: String,
    pub harvest_date: NaiveDateTime,
    pub elapsed_seconds: i32,
    pub info: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataIdentifierTemplate {
    pub id: i32,
    pub name: String,
    pub template: String,
    pub system_provided: bool,
}

/// Workflow status of a record as set by a user. Filters only ever compose
/// equality on `metadata_id` and `user_id`; no uniqueness across change
/// dates is assumed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataStatus {
    pub metadata_id: i32,
    pub user_id: i32,
    pub status_id: i32,
    pub change_date: NaiveDateTime,
}

/// Read-only listing projection, always recomputed from the source record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimpleMetadata {
    pub id: i32,
    pub uuid: Uuid,
    pub change_date: NaiveDateTime,
    pub kind: RecordKind,
}

impl From<&MetadataRecord> for SimpleMetadata {
    fn from(record: &MetadataRecord) -> Self {
        Self {
            id: record.id,
            uuid: record.uuid,
            change_date: record.data_info.change_date,
            kind: record.data_info.kind,
        }
    }
}
