use std::env;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use metacat::{
    config::AppConfig,
    db,
    page::{PageRequest, SortField},
    CatalogRepository, PgCatalogStore,
};

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    match args.next().as_deref() {
        Some("oldest") => oldest()?,
        Some("changes") => changes(args.next(), args.next())?,
        Some("summaries") => match args.next() {
            Some(uuid) => summaries(&uuid)?,
            None => usage(),
        },
        Some("history") => match args.next() {
            Some(harvester_type) => history(&harvester_type)?,
            None => usage(),
        },
        _ => usage(),
    }

    Ok(())
}

fn usage() {
    eprintln!(
        "Usage: catalog <command>\n\
         \n\
         Commands:\n\
         \x20 oldest                   print the record with the oldest change date\n\
         \x20 changes [page] [size]    page through (id, change date) pairs\n\
         \x20 summaries <harvester>    list summaries for a harvesting source uuid\n\
         \x20 history <type>           list harvest runs of the given harvester type"
    );
    std::process::exit(1);
}

fn open_repository() -> Result<CatalogRepository<PgCatalogStore>> {
    let config = AppConfig::from_env()?;
    tracing::info!(
        component = "catalog",
        database_url = %config.redacted_database_url(),
        pool_size = config.database_max_pool_size,
        "loaded catalog configuration"
    );
    let pool = db::init_pool_with_size(&config.database_url, config.database_max_pool_size)?;
    db::run_pending_migrations(&pool).context("failed to prepare catalog schema")?;
    Ok(CatalogRepository::new(PgCatalogStore::new(pool)))
}

fn oldest() -> Result<()> {
    let repository = open_repository()?;
    match repository.find_oldest_by_change_date() {
        Ok(record) => {
            println!(
                "{} {} changed {}",
                record.id, record.uuid, record.data_info.change_date
            );
        }
        Err(metacat::CatalogError::NotFound) => println!("The catalog is empty."),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

fn changes(page: Option<String>, size: Option<String>) -> Result<()> {
    let page = page
        .map(|raw| raw.parse().context("page must be a non-negative integer"))
        .transpose()?
        .unwrap_or(0);
    let size = size
        .map(|raw| raw.parse().context("size must be a positive integer"))
        .transpose()?
        .unwrap_or(20);

    let repository = open_repository()?;
    let request = PageRequest::new(page, size).sorted_by(SortField::ChangeDate.asc());
    let listing = repository.find_all_ids_and_change_dates(Some(&request))?;

    println!(
        "Page {} of {} ({} records total)",
        listing.page,
        listing.total_pages(),
        listing.total
    );
    for (id, change_date) in &listing.items {
        println!("{id} changed {change_date}");
    }
    Ok(())
}

fn summaries(harvester_uuid: &str) -> Result<()> {
    let repository = open_repository()?;
    let summaries = repository.find_all_simple_summaries(harvester_uuid)?;

    if summaries.is_empty() {
        println!("No records harvested from {harvester_uuid}.");
        return Ok(());
    }
    for summary in summaries {
        println!(
            "{} {} changed {} ({:?})",
            summary.id, summary.uuid, summary.change_date, summary.kind
        );
    }
    Ok(())
}

fn history(harvester_type: &str) -> Result<()> {
    let repository = open_repository()?;
    let entries = repository.find_all_by_harvester_type(harvester_type)?;

    if entries.is_empty() {
        println!("No harvest runs recorded for type {harvester_type}.");
        return Ok(());
    }
    for entry in entries {
        println!(
            "{} {} ({}) ran {} for {}s",
            entry.id, entry.harvester_name, entry.harvester_uuid, entry.harvest_date,
            entry.elapsed_seconds
        );
    }
    Ok(())
}
