use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use starload_core::Batch;
use tracing::info;

use crate::error::ExtractError;
use crate::http::HttpSource;
use crate::postgres::PostgresSource;

/// Where a raw batch comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Source {
    /// A table of the legacy Postgres database.
    DatabaseTable { table: String },
    /// Paged store API: a count endpoint plus one detail page per store.
    StoreApi { count_url: String, detail_url: String },
    /// JSON document, either an array of records or a column-oriented object.
    JsonObject { url: String },
    /// CSV object in object storage (`s3://bucket/key`) or at an https URL.
    CsvObject { location: String },
    /// PDF table of card details, by URL or local path.
    PdfDocument { location: String },
}

impl Source {
    pub fn kind(&self) -> &'static str {
        match self {
            Source::DatabaseTable { .. } => "database_table",
            Source::StoreApi { .. } => "store_api",
            Source::JsonObject { .. } => "json_object",
            Source::CsvObject { .. } => "csv_object",
            Source::PdfDocument { .. } => "pdf_document",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::DatabaseTable { table } => write!(f, "table {table}"),
            Source::StoreApi { count_url, .. } => write!(f, "store api {count_url}"),
            Source::JsonObject { url } => write!(f, "json {url}"),
            Source::CsvObject { location } => write!(f, "csv {location}"),
            Source::PdfDocument { location } => write!(f, "pdf {location}"),
        }
    }
}

/// Capability to read raw batches from upstream sources.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Fetch the whole source. `Ok(None)` means the upstream reported the
    /// source as missing; transport failures are errors.
    async fn fetch(&self, source: &Source) -> Result<Option<Batch>, ExtractError>;

    /// List the tables of the legacy database.
    async fn list_tables(&self) -> Result<Vec<String>, ExtractError>;
}

/// Extractor over the legacy database and the HTTP sources.
///
/// The database side is optional so HTTP-only runs need no source database.
#[derive(Debug, Clone)]
pub struct DataExtractor {
    postgres: Option<PostgresSource>,
    http: HttpSource,
}

impl DataExtractor {
    pub fn new(postgres: Option<PostgresSource>, http: HttpSource) -> Self {
        Self { postgres, http }
    }

    fn postgres(&self) -> Result<&PostgresSource, ExtractError> {
        self.postgres
            .as_ref()
            .ok_or_else(|| ExtractError::InvalidSource("no source database configured".to_string()))
    }
}

#[async_trait]
impl Extractor for DataExtractor {
    async fn fetch(&self, source: &Source) -> Result<Option<Batch>, ExtractError> {
        let batch = match source {
            Source::DatabaseTable { table } => self.postgres()?.fetch_table(table).await?,
            Source::StoreApi {
                count_url,
                detail_url,
            } => self.http.fetch_store_api(count_url, detail_url).await?,
            Source::JsonObject { url } => self.http.fetch_json(url).await?,
            Source::CsvObject { location } => self.http.fetch_csv(location).await?,
            Source::PdfDocument { location } => self.http.fetch_pdf(location).await?,
        };

        info!(
            event = "source_extracted",
            source_kind = source.kind(),
            source = %source,
            found = batch.is_some(),
            rows = batch.as_ref().map(Batch::len).unwrap_or(0),
            "source extracted"
        );
        Ok(batch)
    }

    async fn list_tables(&self) -> Result<Vec<String>, ExtractError> {
        self.postgres()?.list_tables().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_deserialize_from_tagged_tables() {
        let source: Source = serde_json::from_str(
            r#"{"kind": "csv_object", "location": "s3://data-handling-public/products.csv"}"#,
        )
        .expect("source");
        assert_eq!(
            source,
            Source::CsvObject {
                location: "s3://data-handling-public/products.csv".to_string()
            }
        );
        assert_eq!(source.kind(), "csv_object");
    }

    #[tokio::test]
    async fn database_sources_need_a_pool() {
        let extractor = DataExtractor::new(None, HttpSource::new(None).expect("client"));
        let err = extractor
            .fetch(&Source::DatabaseTable {
                table: "legacy_users".to_string(),
            })
            .await
            .expect_err("no database");
        assert!(matches!(err, ExtractError::InvalidSource(_)));
    }
}
