use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use starload_core::{Batch, CellValue, ColumnHint, Entity};
use starload_extract::{ExtractError, Extractor, Source};
use starload_load::{resolve_column_types, IfExists, LoadError, LoadSummary, WarehouseLoader};
use starload_pipeline::{PipelineError, Prerequisite, SourceCatalog, StarSchemaService};

#[derive(Default)]
struct FakeExtractor {
    batches: BTreeMap<String, Batch>,
}

impl FakeExtractor {
    fn with(mut self, source: &Source, records: serde_json::Value) -> Self {
        let records = records.as_array().cloned().unwrap_or_default();
        self.batches.insert(
            source.to_string(),
            Batch::from_json_records(&records).expect("records"),
        );
        self
    }
}

#[async_trait]
impl Extractor for FakeExtractor {
    async fn fetch(&self, source: &Source) -> Result<Option<Batch>, ExtractError> {
        Ok(self.batches.get(&source.to_string()).cloned())
    }

    async fn list_tables(&self) -> Result<Vec<String>, ExtractError> {
        Ok(Vec::new())
    }
}

#[derive(Default)]
struct FakeLoader {
    tables: Mutex<BTreeMap<String, Batch>>,
    loads: Mutex<Vec<String>>,
    statements: Mutex<Vec<String>>,
    reject_foreign_keys: bool,
}

#[async_trait]
impl WarehouseLoader for FakeLoader {
    async fn load(
        &self,
        batch: &Batch,
        table: &str,
        hints: &[ColumnHint],
        _if_exists: IfExists,
    ) -> Result<LoadSummary, LoadError> {
        self.tables
            .lock()
            .expect("tables lock")
            .insert(table.to_string(), batch.clone());
        self.loads.lock().expect("loads lock").push(table.to_string());
        Ok(LoadSummary {
            table: table.to_string(),
            rows_loaded: batch.len() as u64,
            columns: resolve_column_types(batch, hints),
        })
    }

    async fn table_exists(&self, table: &str) -> Result<bool, LoadError> {
        Ok(self.tables.lock().expect("tables lock").contains_key(table))
    }

    async fn execute(&self, statement: &str) -> Result<u64, LoadError> {
        if self.reject_foreign_keys && statement.contains("FOREIGN KEY") {
            return Err(LoadError::SchemaMismatch {
                table: "orders_table".to_string(),
                message: "insert or update violates foreign key constraint".to_string(),
            });
        }
        self.statements
            .lock()
            .expect("statements lock")
            .push(statement.to_string());
        Ok(1)
    }
}

fn extractor(catalog: &SourceCatalog) -> FakeExtractor {
    FakeExtractor::default()
        .with(
            &catalog.orders,
            json!([
                {"level_0": 0, "index": 0, "date_uuid": "9476f17e-5d6a-4117-874d-9cdb38ca1fa6",
                 "first_name": null, "last_name": null,
                 "user_uuid": "93caf182-e4e9-4c6e-bebb-60a1a9dcf9b8", "card_number": 30060773296197i64,
                 "store_code": "BL-8387506C", "product_code": "R7-3126933h", "1": null,
                 "product_quantity": 3}
            ]),
        )
        .with(
            &catalog.users,
            json!([
                {"index": 0, "first_name": "Sigfried", "last_name": "Noack", "country": "Germany",
                 "country_code": "DE", "user_uuid": "93caf182-e4e9-4c6e-bebb-60a1a9dcf9b8",
                 "join_date": "2018-10-10"}
            ]),
        )
        .with(
            &catalog.products,
            json!([
                {"index": 0, "product_name": "Tea", "product_price": "£3.20", "weight": "500g",
                 "category": "food-and-drink", "EAN": "6108840000000", "date_added": "2005-12-02",
                 "uuid": "83dc0a69-f96f-4c34-bcb7-928acae19a94", "removed": "Still_avaliable",
                 "product_code": "R7-3126933h"},
                {"index": 1, "product_name": "Junk", "product_price": "£1.00", "weight": "1kg",
                 "category": "diy", "EAN": "1", "date_added": "2005-12-02",
                 "uuid": "83dc0a69-f96f-4c34-bcb7-928acae19a94", "removed": "Removed",
                 "product_code": "??"}
            ]),
        )
}

#[tokio::test]
async fn dimension_upload_creates_orders_table_first() {
    let catalog = SourceCatalog::default();
    let service = StarSchemaService::new(extractor(&catalog), FakeLoader::default(), catalog);

    let first = service.upload(Entity::Users).await.expect("users");
    let second = service.upload(Entity::Users).await.expect("users again");

    assert_eq!(first.prerequisite, Some(Prerequisite::Created));
    assert_eq!(second.prerequisite, Some(Prerequisite::AlreadyPresent));
    assert_eq!(
        *service.loader().loads.lock().expect("loads lock"),
        vec!["orders_table", "dim_users", "dim_users"]
    );

    let tables = service.loader().tables.lock().expect("tables lock");
    let orders = tables.get("orders_table").expect("orders loaded");
    assert!(!orders.has_column("level_0"));
    assert!(!orders.has_column("first_name"));
    assert_eq!(orders.cell(0, "product_quantity"), Some(&CellValue::Int(3)));
}

#[tokio::test]
async fn products_upload_drops_bad_codes_and_runs_migrations() {
    let catalog = SourceCatalog::default();
    let service = StarSchemaService::new(extractor(&catalog), FakeLoader::default(), catalog);

    let outcome = service.upload(Entity::Products).await.expect("products");

    assert_eq!(outcome.table, "dim_products");
    assert_eq!(outcome.rows_extracted, 2);
    assert_eq!(outcome.rows_loaded, 1);
    assert_eq!(outcome.rows_dropped, 1);
    assert!(outcome.migration_failures.is_empty());

    let statements = service.loader().statements.lock().expect("statements lock").clone();
    assert_eq!(statements.len(), 8);
    assert!(statements[0].contains("ADD COLUMN IF NOT EXISTS \"weight_class\""));
    assert!(statements[1].contains("WHEN \"weight\" < 2.0 THEN 'Light'"));
    assert!(statements[2].contains("RENAME COLUMN \"removed\" TO \"still_available\""));
    assert!(statements[3].contains("'Still_avaliable'"));
    assert!(statements[4].contains("REPLACE(\"product_price\", '£', '')"));
    assert!(statements[5].contains("\"still_available\" TYPE BOOLEAN"));
    assert!(statements[6].ends_with("ADD PRIMARY KEY (\"product_code\")"));
    assert!(statements[7].contains("\"dim_products_orders_table_fk\""));

    let tables = service.loader().tables.lock().expect("tables lock");
    let products = tables.get("dim_products").expect("products loaded");
    assert!(products.has_column("ean"));
    assert_eq!(products.cell(0, "weight"), Some(&CellValue::Float(0.5)));
}

#[tokio::test]
async fn failed_migrations_are_recorded_not_raised() {
    let catalog = SourceCatalog::default();
    let loader = FakeLoader {
        reject_foreign_keys: true,
        ..FakeLoader::default()
    };
    let service = StarSchemaService::new(extractor(&catalog), loader, catalog);

    let outcome = service.upload(Entity::Users).await.expect("users");

    assert_eq!(outcome.migration_failures.len(), 1);
    assert_eq!(outcome.migration_failures[0].migration, "foreign_key(user_uuid)");
}

#[tokio::test]
async fn missing_sources_stop_the_upload() {
    let catalog = SourceCatalog::default();
    let service = StarSchemaService::new(extractor(&catalog), FakeLoader::default(), catalog);

    let err = service.upload(Entity::Cards).await.expect_err("no card source");

    assert!(matches!(err, PipelineError::MissingSource(Entity::Cards)));
    assert_eq!(
        *service.loader().loads.lock().expect("loads lock"),
        vec!["orders_table"]
    );
}

#[tokio::test]
async fn prepare_cleans_without_loading() {
    let catalog = SourceCatalog::default();
    let service = StarSchemaService::new(extractor(&catalog), FakeLoader::default(), catalog);

    let output = service.prepare(Entity::Products).await.expect("products");

    assert_eq!(output.batch.len(), 1);
    assert_eq!(output.report.dropped_rows[0].field, "product_code");
    assert!(service.loader().loads.lock().expect("loads lock").is_empty());
}
