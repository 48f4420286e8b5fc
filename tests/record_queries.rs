mod common;

use std::collections::BTreeSet;

use common::{date, record, EXAMPLE_CATALOG};
use metacat::page::{PageRequest, SortField};
use metacat::{CatalogError, CatalogRepository, CatalogStore, InMemoryCatalogStore};

fn example_repository() -> CatalogRepository<InMemoryCatalogStore> {
    CatalogRepository::new(InMemoryCatalogStore::new().with_records(EXAMPLE_CATALOG.clone()))
}

#[test]
fn oldest_returns_the_minimum_change_date() {
    let repository = example_repository();
    let oldest = repository.find_oldest_by_change_date().unwrap();
    assert_eq!(oldest.id, 2);
    assert_eq!(oldest.data_info.change_date, date(2019, 6, 15));
}

#[test]
fn oldest_errors_on_an_empty_catalog() {
    let repository = CatalogRepository::new(InMemoryCatalogStore::new());
    assert!(matches!(
        repository.find_oldest_by_change_date(),
        Err(CatalogError::NotFound)
    ));
}

#[test]
fn find_one_rejects_non_integer_ids_before_the_store() {
    let repository = example_repository();
    assert!(matches!(
        repository.find_one_by_id("abc"),
        Err(CatalogError::InvalidArgument(_))
    ));
}

#[test]
fn find_one_on_an_empty_catalog_is_absent_not_an_error() {
    let repository = CatalogRepository::new(InMemoryCatalogStore::new());
    assert_eq!(repository.find_one_by_id("42").unwrap(), None);
}

#[test]
fn find_one_returns_the_matching_record() {
    let repository = example_repository();
    let found = repository.find_one_by_id("2").unwrap().unwrap();
    assert_eq!(found.id, 2);
}

#[test]
fn example_catalog_pages_ids_and_change_dates_by_change_date() {
    let repository = example_repository();

    let request = PageRequest::new(0, 2).sorted_by(SortField::ChangeDate.asc());
    let first = repository
        .find_all_ids_and_change_dates(Some(&request))
        .unwrap();
    assert_eq!(
        first.items,
        vec![(2, date(2019, 6, 15)), (1, date(2020, 1, 1))]
    );
    assert_eq!(first.total, 3);

    let request = PageRequest::new(1, 2).sorted_by(SortField::ChangeDate.asc());
    let second = repository
        .find_all_ids_and_change_dates(Some(&request))
        .unwrap();
    assert_eq!(second.items, vec![(3, date(2021, 3, 3))]);
    assert_eq!(second.total, 3);
}

#[test]
fn concatenated_pages_reproduce_the_catalog_exactly_once() {
    let records = vec![
        record(1, date(2020, 1, 1)),
        record(2, date(2019, 6, 15)),
        record(3, date(2021, 3, 3)),
        record(4, date(2019, 6, 15)),
        record(5, date(2022, 8, 30)),
    ];
    let repository =
        CatalogRepository::new(InMemoryCatalogStore::new().with_records(records.clone()));

    let mut seen = Vec::new();
    for page in 0.. {
        let request = PageRequest::new(page, 2).sorted_by(SortField::ChangeDate.asc());
        let listing = repository
            .find_all_ids_and_change_dates(Some(&request))
            .unwrap();
        assert!(listing.items.len() <= 2);
        assert_eq!(listing.total, records.len() as u64);
        if listing.items.is_empty() {
            break;
        }
        seen.extend(listing.items);
    }

    let ids: Vec<i32> = seen.iter().map(|(id, _)| *id).collect();
    let distinct: BTreeSet<i32> = ids.iter().copied().collect();
    assert_eq!(distinct.len(), records.len());
    assert_eq!(ids.len(), records.len());
    // Ties on change date fall back to id order, so the whole listing is
    // reproducible run to run.
    assert_eq!(ids, vec![2, 4, 1, 3, 5]);
}

#[test]
fn unsorted_requests_fall_back_to_id_order() {
    let repository = example_repository();
    let listing = repository
        .find_all_ids_and_change_dates(Some(&PageRequest::new(0, 10)))
        .unwrap();
    let ids: Vec<i32> = listing.items.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn omitted_page_request_returns_the_full_listing() {
    let repository = example_repository();
    let listing = repository.find_all_ids_and_change_dates(None).unwrap();
    assert_eq!(listing.items.len(), 3);
    assert_eq!(listing.total, 3);
    assert_eq!(listing.page, 0);
}

#[test]
fn page_past_the_end_is_empty_but_keeps_the_total() {
    let repository = example_repository();
    let request = PageRequest::new(9, 2).sorted_by(SortField::ChangeDate.asc());
    let listing = repository
        .find_all_ids_and_change_dates(Some(&request))
        .unwrap();
    assert!(listing.items.is_empty());
    assert_eq!(listing.total, 3);
}

#[test]
fn record_pages_sort_descending_when_asked() {
    let repository = example_repository();
    let request = PageRequest::new(0, 3).sorted_by(SortField::ChangeDate.desc());
    let page = repository
        .find_records(&metacat::filter::Filter::and_all(vec![]), Some(&request))
        .unwrap();
    let ids: Vec<i32> = page.items.iter().map(|record| record.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
}

#[test]
fn store_lookup_by_numeric_id_misses_cleanly() {
    let store = InMemoryCatalogStore::new().with_records(EXAMPLE_CATALOG.clone());
    assert!(store.find_record(99).unwrap().is_none());
    assert_eq!(store.find_record(3).unwrap().unwrap().id, 3);
}
