mod common;

use std::collections::BTreeSet;

use common::{date, harvested_record, history_entry, record, status, template};
use metacat::filter::{record as records, status as statuses, template as templates, Filter};
use metacat::models::RecordKind;
use metacat::{CatalogRepository, InMemoryCatalogStore};

fn repository() -> CatalogRepository<InMemoryCatalogStore> {
    let store = InMemoryCatalogStore::new()
        .with_records(vec![
            record(1, date(2020, 1, 1)),
            harvested_record(2, date(2020, 2, 1), "csw-1"),
            harvested_record(3, date(2020, 3, 1), "csw-1"),
            harvested_record(4, date(2020, 4, 1), "oai-1"),
        ])
        .with_templates(vec![
            template(1, "default", true),
            template(2, "doi", false),
            template(3, "internal", true),
        ])
        .with_statuses(vec![
            status(1, 10, 1),
            status(1, 11, 2),
            status(2, 10, 3),
        ])
        .with_history(vec![
            history_entry(1, "csw-1", "csw"),
            history_entry(2, "csw-1", "csw"),
            history_entry(3, "oai-1", "oaipmh"),
        ]);
    CatalogRepository::new(store)
}

#[test]
fn zero_predicates_match_every_record() {
    let repository = repository();
    let ids = repository
        .find_all_ids_matching(&Filter::and_all(vec![]))
        .unwrap();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[test]
fn and_composition_is_the_intersection_and_order_independent() {
    let repository = repository();

    let forward = Filter::and_all(vec![
        records::is_harvested(true),
        records::has_harvester_uuid("csw-1"),
    ]);
    let reversed = Filter::and_all(vec![
        records::has_harvester_uuid("csw-1"),
        records::is_harvested(true),
    ]);

    let forward_ids = repository.find_all_ids_matching(&forward).unwrap();
    let reversed_ids = repository.find_all_ids_matching(&reversed).unwrap();
    assert_eq!(forward_ids, vec![2, 3]);
    assert_eq!(forward_ids, reversed_ids);
}

#[test]
fn record_uuid_and_kind_filters_select_exactly() {
    let repository = repository();
    let target = repository.find_one_by_id("4").unwrap().unwrap();

    let by_uuid = repository
        .find_all_ids_matching(&records::has_uuid(target.uuid))
        .unwrap();
    assert_eq!(by_uuid, vec![4]);

    let by_kind = repository
        .find_all_ids_matching(&records::is_kind(RecordKind::Template))
        .unwrap();
    assert!(by_kind.is_empty());
}

#[test]
fn system_provided_flag_partitions_the_template_set() {
    let repository = repository();

    let provided = repository
        .find_templates(&templates::is_system_provided(true))
        .unwrap();
    let custom = repository
        .find_templates(&templates::is_system_provided(false))
        .unwrap();

    let provided_ids: BTreeSet<i32> = provided.iter().map(|entry| entry.id).collect();
    let custom_ids: BTreeSet<i32> = custom.iter().map(|entry| entry.id).collect();

    assert_eq!(provided_ids, BTreeSet::from([1, 3]));
    assert_eq!(custom_ids, BTreeSet::from([2]));
    assert!(provided_ids.is_disjoint(&custom_ids));
    assert!(provided.iter().all(|entry| entry.system_provided));
    assert!(custom.iter().all(|entry| !entry.system_provided));
}

#[test]
fn status_filters_compose_over_the_two_key_fields() {
    let repository = repository();

    let for_record = repository
        .find_statuses(&statuses::has_metadata_id(1))
        .unwrap();
    assert_eq!(for_record.len(), 2);

    let for_user = repository.find_statuses(&statuses::has_user_id(10)).unwrap();
    assert_eq!(for_user.len(), 2);

    let both = repository
        .find_statuses(&Filter::and_all(vec![
            statuses::has_metadata_id(1),
            statuses::has_user_id(10),
        ]))
        .unwrap();
    assert_eq!(both.len(), 1);
    assert_eq!((both[0].metadata_id, both[0].user_id), (1, 10));
}

#[test]
fn source_info_projection_keys_by_record_id() {
    let repository = repository();
    let info = repository
        .find_all_source_info(&records::is_harvested(true))
        .unwrap();

    assert_eq!(info.len(), 3);
    assert_eq!(info[&2].harvester_uuid.as_deref(), Some("csw-1"));
    assert_eq!(info[&4].harvester_uuid.as_deref(), Some("oai-1"));
    assert!(!info.contains_key(&1));
}

#[test]
fn simple_summaries_scope_by_harvesting_source() {
    let repository = repository();
    let summaries = repository.find_all_simple_summaries("csw-1").unwrap();

    let ids: Vec<i32> = summaries.iter().map(|summary| summary.id).collect();
    assert_eq!(ids, vec![2, 3]);
    assert!(summaries
        .iter()
        .all(|summary| summary.kind == RecordKind::Metadata));

    assert!(repository
        .find_all_simple_summaries("unknown")
        .unwrap()
        .is_empty());
}

#[test]
fn history_finders_match_by_type_and_uuid() {
    let repository = repository();

    let by_type = repository.find_all_by_harvester_type("csw").unwrap();
    let ids: Vec<i32> = by_type.iter().map(|entry| entry.id).collect();
    assert_eq!(ids, vec![1, 2]);

    let by_uuid = repository.find_all_by_harvester_uuid("oai-1").unwrap();
    assert_eq!(by_uuid.len(), 1);
    assert_eq!(by_uuid[0].harvester_type, "oaipmh");

    // Unknown harvesters are an empty list, never an error.
    assert!(repository.find_all_by_harvester_type("webdav").unwrap().is_empty());
}
