use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use starload_core::CellValue;
use starload_extract::{DataExtractor, Extractor, HttpSource, PostgresSource, Source};
use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

fn database_url() -> Option<String> {
    env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .ok()
}

#[tokio::test]
async fn reads_legacy_table_in_column_order() -> Result<()> {
    let Some(db_url) = database_url() else {
        eprintln!("skipping: set TEST_DATABASE_URL or DATABASE_URL for integration tests");
        return Ok(());
    };
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(10))
        .connect(&db_url)
        .await
        .context("connecting to Postgres")?;

    let nanos = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos();
    let table = format!("legacy_users_{nanos}");
    sqlx::query(&format!(
        "create table {table} (id integer, first_name text, join_date date, email_address text)"
    ))
    .execute(&pool)
    .await?;
    sqlx::query(&format!(
        "insert into {table} values (1, 'Sigfried', '2018-10-10', null), (2, 'Guy', null, 'guy@example.com')"
    ))
    .execute(&pool)
    .await?;

    let extractor = DataExtractor::new(Some(PostgresSource::new(pool.clone())), HttpSource::new(None)?);
    let tables = extractor.list_tables().await?;
    let batch = extractor
        .fetch(&Source::DatabaseTable {
            table: table.clone(),
        })
        .await?
        .context("table should exist")?;
    let missing = extractor
        .fetch(&Source::DatabaseTable {
            table: format!("{table}_missing"),
        })
        .await?;

    sqlx::query(&format!("drop table {table}")).execute(&pool).await?;

    assert!(tables.contains(&table));
    assert!(missing.is_none());
    assert_eq!(batch.columns(), ["id", "first_name", "join_date", "email_address"]);
    assert_eq!(batch.len(), 2);
    assert_eq!(batch.cell(0, "id"), Some(&CellValue::Int(1)));
    assert_eq!(batch.cell(0, "join_date"), Some(&CellValue::text("2018-10-10")));
    assert_eq!(batch.cell(0, "email_address"), Some(&CellValue::Null));
    Ok(())
}
