//! Postgres-backed [`CatalogStore`]. Filters lower into boxed diesel
//! expressions, page totals are counted before offset/limit are applied, and
//! the one-char storage encodings (`y`/`n` flags, record kind codes) are
//! decoded here and nowhere else.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::sql_types::{Bool, Nullable};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::db::PgPool;
use crate::error::{CatalogError, CatalogResult};
use crate::filter::{
    Filter, HistoryFilter, HistoryPredicate, RecordFilter, RecordPredicate, StatusFilter,
    StatusPredicate, TemplateFilter, TemplatePredicate,
};
use crate::models::{
    HarvestHistory, MetadataDataInfo, MetadataIdentifierTemplate, MetadataRecord,
    MetadataSourceInfo, MetadataStatus, RecordKind, SimpleMetadata,
};
use crate::page::{Page, PageRequest, SortDirection, SortField};
use crate::schema::{harvest_history, metadata, metadata_identifier_templates, metadata_status};
use crate::store::CatalogStore;

type PgConn = PooledConnection<ConnectionManager<PgConnection>>;

type PgBool = Nullable<Bool>;
type RecordCond = Box<dyn BoxableExpression<metadata::table, Pg, SqlType = PgBool>>;
type StatusCond = Box<dyn BoxableExpression<metadata_status::table, Pg, SqlType = PgBool>>;
type TemplateCond =
    Box<dyn BoxableExpression<metadata_identifier_templates::table, Pg, SqlType = PgBool>>;
type HistoryCond = Box<dyn BoxableExpression<harvest_history::table, Pg, SqlType = PgBool>>;

/// One-char boolean encoding used by the legacy storage layout.
mod yn {
    use crate::error::{CatalogError, CatalogResult};

    pub fn encode(flag: bool) -> &'static str {
        if flag {
            "y"
        } else {
            "n"
        }
    }

    pub fn decode(raw: &str) -> CatalogResult<bool> {
        match raw {
            "y" => Ok(true),
            "n" => Ok(false),
            other => Err(CatalogError::corrupted(format!(
                "expected 'y' or 'n' flag, got '{other}'"
            ))),
        }
    }
}

fn kind_code(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Metadata => "n",
        RecordKind::Template => "y",
        RecordKind::SubTemplate => "s",
    }
}

fn kind_from_code(raw: &str) -> CatalogResult<RecordKind> {
    match raw {
        "n" => Ok(RecordKind::Metadata),
        "y" => Ok(RecordKind::Template),
        "s" => Ok(RecordKind::SubTemplate),
        other => Err(CatalogError::corrupted(format!(
            "unknown record kind code '{other}'"
        ))),
    }
}

#[derive(Debug, Queryable)]
struct MetadataRow {
    id: i32,
    uuid: Uuid,
    change_date: NaiveDateTime,
    kind: String,
    source_id: String,
    harvester_uuid: Option<String>,
    harvested: String,
}

impl TryFrom<MetadataRow> for MetadataRecord {
    type Error = CatalogError;

    fn try_from(row: MetadataRow) -> CatalogResult<Self> {
        Ok(MetadataRecord {
            id: row.id,
            uuid: row.uuid,
            data_info: MetadataDataInfo {
                change_date: row.change_date,
                kind: kind_from_code(&row.kind)?,
            },
            source_info: MetadataSourceInfo {
                source_id: row.source_id,
                harvester_uuid: row.harvester_uuid,
                harvested: yn::decode(&row.harvested)?,
            },
        })
    }
}

#[derive(Debug, Queryable)]
struct HarvestHistoryRow {
    id: i32,
    harvester_uuid: String,
    harvester_type: String,
    harvester_name: String,
    harvest_date: NaiveDateTime,
    elapsed_seconds: i32,
    info: Value,
}

impl From<HarvestHistoryRow> for HarvestHistory {
    fn from(row: HarvestHistoryRow) -> Self {
        HarvestHistory {
            id: row.id,
            harvester_uuid: row.harvester_uuid,
            harvester_type: row.harvester_type,
            harvester_name: row.harvester_name,
            harvest_date: row.harvest_date,
            elapsed_seconds: row.elapsed_seconds,
            info: row.info,
        }
    }
}

#[derive(Debug, Queryable)]
struct TemplateRow {
    id: i32,
    name: String,
    template: String,
    system_provided: String,
}

impl TryFrom<TemplateRow> for MetadataIdentifierTemplate {
    type Error = CatalogError;

    fn try_from(row: TemplateRow) -> CatalogResult<Self> {
        Ok(MetadataIdentifierTemplate {
            id: row.id,
            name: row.name,
            template: row.template,
            system_provided: yn::decode(&row.system_provided)?,
        })
    }
}

#[derive(Debug, Queryable)]
struct StatusRow {
    metadata_id: i32,
    user_id: i32,
    status_id: i32,
    change_date: NaiveDateTime,
}

impl From<StatusRow> for MetadataStatus {
    fn from(row: StatusRow) -> Self {
        MetadataStatus {
            metadata_id: row.metadata_id,
            user_id: row.user_id,
            status_id: row.status_id,
            change_date: row.change_date,
        }
    }
}

fn record_condition(filter: &RecordFilter) -> RecordCond {
    match filter {
        Filter::All => Box::new(true.into_sql::<Bool>().nullable()),
        Filter::Is(predicate) => record_predicate(predicate),
        Filter::And(children) => children
            .iter()
            .map(record_condition)
            .reduce(|acc, cond| Box::new(acc.and(cond)) as RecordCond)
            .unwrap_or_else(|| Box::new(true.into_sql::<Bool>().nullable())),
    }
}

fn record_predicate(predicate: &RecordPredicate) -> RecordCond {
    match predicate {
        RecordPredicate::HasUuid(uuid) => Box::new(metadata::uuid.eq(*uuid).nullable()),
        RecordPredicate::HasSource(source_id) => {
            Box::new(metadata::source_id.eq(source_id.clone()).nullable())
        }
        RecordPredicate::HasHarvesterUuid(uuid) => {
            Box::new(metadata::harvester_uuid.eq(uuid.clone()).nullable())
        }
        RecordPredicate::IsHarvested(flag) => {
            Box::new(metadata::harvested.eq(yn::encode(*flag)).nullable())
        }
        RecordPredicate::IsKind(kind) => Box::new(metadata::kind.eq(kind_code(*kind)).nullable()),
    }
}

fn status_condition(filter: &StatusFilter) -> StatusCond {
    match filter {
        Filter::All => Box::new(true.into_sql::<Bool>().nullable()),
        Filter::Is(StatusPredicate::HasMetadataId(metadata_id)) => {
            Box::new(metadata_status::metadata_id.eq(*metadata_id).nullable())
        }
        Filter::Is(StatusPredicate::HasUserId(user_id)) => {
            Box::new(metadata_status::user_id.eq(*user_id).nullable())
        }
        Filter::And(children) => children
            .iter()
            .map(status_condition)
            .reduce(|acc, cond| Box::new(acc.and(cond)) as StatusCond)
            .unwrap_or_else(|| Box::new(true.into_sql::<Bool>().nullable())),
    }
}

fn template_condition(filter: &TemplateFilter) -> TemplateCond {
    match filter {
        Filter::All => Box::new(true.into_sql::<Bool>().nullable()),
        Filter::Is(TemplatePredicate::IsSystemProvided(flag)) => Box::new(
            metadata_identifier_templates::system_provided
                .eq(yn::encode(*flag))
                .nullable(),
        ),
        Filter::And(children) => children
            .iter()
            .map(template_condition)
            .reduce(|acc, cond| Box::new(acc.and(cond)) as TemplateCond)
            .unwrap_or_else(|| Box::new(true.into_sql::<Bool>().nullable())),
    }
}

fn history_condition(filter: &HistoryFilter) -> HistoryCond {
    match filter {
        Filter::All => Box::new(true.into_sql::<Bool>().nullable()),
        Filter::Is(HistoryPredicate::HasHarvesterType(harvester_type)) => Box::new(
            harvest_history::harvester_type
                .eq(harvester_type.clone())
                .nullable(),
        ),
        Filter::Is(HistoryPredicate::HasHarvesterUuid(uuid)) => {
            Box::new(harvest_history::harvester_uuid.eq(uuid.clone()).nullable())
        }
        Filter::And(children) => children
            .iter()
            .map(history_condition)
            .reduce(|acc, cond| Box::new(acc.and(cond)) as HistoryCond)
            .unwrap_or_else(|| Box::new(true.into_sql::<Bool>().nullable())),
    }
}

fn assemble_page<T>(items: Vec<T>, page: Option<&PageRequest>, total: u64) -> Page<T> {
    match page {
        Some(request) => Page {
            page: request.page,
            size: request.size,
            total,
            items,
        },
        None => Page {
            page: 0,
            size: items.len() as u32,
            total,
            items,
        },
    }
}

pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> CatalogResult<PgConn> {
        self.pool
            .get()
            .map_err(|err| CatalogError::Pool(err.to_string()))
    }
}

impl CatalogStore for PgCatalogStore {
    fn find_record(&self, id: i32) -> CatalogResult<Option<MetadataRecord>> {
        let mut conn = self.conn()?;
        let row = metadata::table
            .find(id)
            .first::<MetadataRow>(&mut conn)
            .optional()?;
        row.map(MetadataRecord::try_from).transpose()
    }

    fn find_records(
        &self,
        filter: &RecordFilter,
        page: Option<&PageRequest>,
    ) -> CatalogResult<Page<MetadataRecord>> {
        let mut conn = self.conn()?;

        // Total reflects the filtered set before offset/limit.
        let total: i64 = metadata::table
            .filter(record_condition(filter))
            .count()
            .get_result(&mut conn)?;

        let mut query = metadata::table
            .into_boxed()
            .filter(record_condition(filter));
        let sort = page.map(|request| request.sort.as_slice()).unwrap_or(&[]);
        for key in sort {
            query = match (key.field, key.direction) {
                (SortField::Id, SortDirection::Ascending) => {
                    query.then_order_by(metadata::id.asc())
                }
                (SortField::Id, SortDirection::Descending) => {
                    query.then_order_by(metadata::id.desc())
                }
                (SortField::Uuid, SortDirection::Ascending) => {
                    query.then_order_by(metadata::uuid.asc())
                }
                (SortField::Uuid, SortDirection::Descending) => {
                    query.then_order_by(metadata::uuid.desc())
                }
                (SortField::ChangeDate, SortDirection::Ascending) => {
                    query.then_order_by(metadata::change_date.asc())
                }
                (SortField::ChangeDate, SortDirection::Descending) => {
                    query.then_order_by(metadata::change_date.desc())
                }
            };
        }
        // Stable tiebreak so equal sort keys page deterministically.
        query = query.then_order_by(metadata::id.asc());

        if let Some(request) = page {
            query = query
                .offset(i64::from(request.offset()))
                .limit(i64::from(request.size));
        }

        debug!(total, paged = page.is_some(), "loading metadata records");
        let rows: Vec<MetadataRow> = query.load(&mut conn)?;
        let items = rows
            .into_iter()
            .map(MetadataRecord::try_from)
            .collect::<CatalogResult<Vec<_>>>()?;
        Ok(assemble_page(items, page, total as u64))
    }

    fn find_record_ids(&self, filter: &RecordFilter) -> CatalogResult<Vec<i32>> {
        let mut conn = self.conn()?;
        let ids = metadata::table
            .filter(record_condition(filter))
            .select(metadata::id)
            .order(metadata::id.asc())
            .load::<i32>(&mut conn)?;
        Ok(ids)
    }

    fn find_ids_and_change_dates(
        &self,
        page: Option<&PageRequest>,
    ) -> CatalogResult<Page<(i32, NaiveDateTime)>> {
        let mut conn = self.conn()?;

        let total: i64 = metadata::table.count().get_result(&mut conn)?;

        let mut query = metadata::table
            .select((metadata::id, metadata::change_date))
            .into_boxed();
        let sort = page.map(|request| request.sort.as_slice()).unwrap_or(&[]);
        for key in sort {
            query = match (key.field, key.direction) {
                (SortField::Id, SortDirection::Ascending) => {
                    query.then_order_by(metadata::id.asc())
                }
                (SortField::Id, SortDirection::Descending) => {
                    query.then_order_by(metadata::id.desc())
                }
                (SortField::Uuid, SortDirection::Ascending) => {
                    query.then_order_by(metadata::uuid.asc())
                }
                (SortField::Uuid, SortDirection::Descending) => {
                    query.then_order_by(metadata::uuid.desc())
                }
                (SortField::ChangeDate, SortDirection::Ascending) => {
                    query.then_order_by(metadata::change_date.asc())
                }
                (SortField::ChangeDate, SortDirection::Descending) => {
                    query.then_order_by(metadata::change_date.desc())
                }
            };
        }
        query = query.then_order_by(metadata::id.asc());

        if let Some(request) = page {
            query = query
                .offset(i64::from(request.offset()))
                .limit(i64::from(request.size));
        }

        let items = query.load::<(i32, NaiveDateTime)>(&mut conn)?;
        Ok(assemble_page(items, page, total as u64))
    }

    fn find_oldest_by_change_date(&self) -> CatalogResult<MetadataRecord> {
        let mut conn = self.conn()?;
        let row = metadata::table
            .order(metadata::change_date.asc())
            .then_order_by(metadata::id.asc())
            .first::<MetadataRow>(&mut conn)?;
        MetadataRecord::try_from(row)
    }

    fn find_source_info(
        &self,
        filter: &RecordFilter,
    ) -> CatalogResult<HashMap<i32, MetadataSourceInfo>> {
        let mut conn = self.conn()?;
        let rows: Vec<(i32, String, Option<String>, String)> = metadata::table
            .filter(record_condition(filter))
            .select((
                metadata::id,
                metadata::source_id,
                metadata::harvester_uuid,
                metadata::harvested,
            ))
            .load(&mut conn)?;

        debug!(rows = rows.len(), "collected source info projection");
        let mut results = HashMap::with_capacity(rows.len());
        for (id, source_id, harvester_uuid, harvested) in rows {
            results.insert(
                id,
                MetadataSourceInfo {
                    source_id,
                    harvester_uuid,
                    harvested: yn::decode(&harvested)?,
                },
            );
        }
        Ok(results)
    }

    fn find_simple_summaries(&self, harvester_uuid: &str) -> CatalogResult<Vec<SimpleMetadata>> {
        let mut conn = self.conn()?;
        let rows: Vec<(i32, Uuid, NaiveDateTime, String)> = metadata::table
            .filter(metadata::harvester_uuid.eq(harvester_uuid))
            .select((
                metadata::id,
                metadata::uuid,
                metadata::change_date,
                metadata::kind,
            ))
            .order(metadata::id.asc())
            .load(&mut conn)?;

        rows.into_iter()
            .map(|(id, uuid, change_date, kind)| {
                Ok(SimpleMetadata {
                    id,
                    uuid,
                    change_date,
                    kind: kind_from_code(&kind)?,
                })
            })
            .collect()
    }

    fn find_history(&self, filter: &HistoryFilter) -> CatalogResult<Vec<HarvestHistory>> {
        let mut conn = self.conn()?;
        let rows = harvest_history::table
            .filter(history_condition(filter))
            .order(harvest_history::id.asc())
            .load::<HarvestHistoryRow>(&mut conn)?;
        Ok(rows.into_iter().map(HarvestHistory::from).collect())
    }

    fn find_templates(
        &self,
        filter: &TemplateFilter,
    ) -> CatalogResult<Vec<MetadataIdentifierTemplate>> {
        let mut conn = self.conn()?;
        let rows = metadata_identifier_templates::table
            .filter(template_condition(filter))
            .order(metadata_identifier_templates::id.asc())
            .load::<TemplateRow>(&mut conn)?;
        rows.into_iter()
            .map(MetadataIdentifierTemplate::try_from)
            .collect()
    }

    fn find_statuses(&self, filter: &StatusFilter) -> CatalogResult<Vec<MetadataStatus>> {
        let mut conn = self.conn()?;
        let rows = metadata_status::table
            .filter(status_condition(filter))
            .order((
                metadata_status::metadata_id.asc(),
                metadata_status::user_id.asc(),
                metadata_status::change_date.asc(),
            ))
            .load::<StatusRow>(&mut conn)?;
        Ok(rows.into_iter().map(MetadataStatus::from).collect())
    }
}
