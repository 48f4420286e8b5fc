use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use serde_json::json;
use uuid::Uuid;

use metacat::models::{
    HarvestHistory, MetadataDataInfo, MetadataIdentifierTemplate, MetadataRecord,
    MetadataSourceInfo, MetadataStatus, RecordKind,
};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("valid date")
        .and_hms_opt(0, 0, 0)
        .expect("valid time")
}

pub fn record(id: i32, change_date: NaiveDateTime) -> MetadataRecord {
    MetadataRecord {
        id,
        uuid: Uuid::new_v4(),
        data_info: MetadataDataInfo {
            change_date,
            kind: RecordKind::Metadata,
        },
        source_info: MetadataSourceInfo {
            source_id: "portal".to_string(),
            harvester_uuid: None,
            harvested: false,
        },
    }
}

#[allow(dead_code)]
pub fn harvested_record(
    id: i32,
    change_date: NaiveDateTime,
    harvester_uuid: &str,
) -> MetadataRecord {
    let mut record = record(id, change_date);
    record.source_info.harvester_uuid = Some(harvester_uuid.to_string());
    record.source_info.harvested = true;
    record
}

#[allow(dead_code)]
pub fn template(id: i32, name: &str, system_provided: bool) -> MetadataIdentifierTemplate {
    MetadataIdentifierTemplate {
        id,
        name: name.to_string(),
        template: "{uuid}".to_string(),
        system_provided,
    }
}

#[allow(dead_code)]
pub fn status(metadata_id: i32, user_id: i32, status_id: i32) -> MetadataStatus {
    MetadataStatus {
        metadata_id,
        user_id,
        status_id,
        change_date: date(2022, 1, 1),
    }
}

#[allow(dead_code)]
pub fn history_entry(id: i32, harvester_uuid: &str, harvester_type: &str) -> HarvestHistory {
    HarvestHistory {
        id,
        harvester_uuid: harvester_uuid.to_string(),
        harvester_type: harvester_type.to_string(),
        harvester_name: format!("{harvester_type}-{id}"),
        harvest_date: date(2023, 4, 1),
        elapsed_seconds: 12,
        info: json!({ "added": 3, "updated": 1 }),
    }
}

/// The worked three-record catalog: ids 1..3 with change dates 2020-01-01,
/// 2019-06-15 and 2021-03-03.
#[allow(dead_code)]
pub static EXAMPLE_CATALOG: Lazy<Vec<MetadataRecord>> = Lazy::new(|| {
    vec![
        record(1, date(2020, 1, 1)),
        record(2, date(2019, 6, 15)),
        record(3, date(2021, 3, 3)),
    ]
});
