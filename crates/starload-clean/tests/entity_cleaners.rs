use chrono::NaiveDate;
use starload_clean::normalizers::SENTINEL_DATE;
use starload_clean::{clean, clean_cards, clean_products, clean_stores};
use starload_core::{Batch, CellValue, Entity};

fn batch(columns: &[&str], rows: Vec<Vec<&str>>) -> Batch {
    Batch::from_rows(
        columns.iter().map(|column| column.to_string()).collect(),
        rows.into_iter()
            .map(|row| row.into_iter().map(CellValue::text).collect())
            .collect(),
    )
    .expect("aligned batch")
}

const PRODUCT_COLUMNS: &[&str] = &[
    "index",
    "product_name",
    "product_price",
    "weight",
    "category",
    "EAN",
    "date_added",
    "uuid",
    "removed",
    "product_code",
];

#[test]
fn clean_product_row_passes_through() {
    let raw = batch(
        PRODUCT_COLUMNS,
        vec![
            vec![
                "0",
                "Cheese Straws",
                "£3.20",
                "0.34kg",
                "diy",
                "7425710935115",
                "2005-12-02",
                "83dc0a69-f96f-4c34-bcb7-928acae19a94",
                "Still_avaliable",
                "AB-12345",
            ],
            vec![
                "1",
                "Garden Hose",
                "£12.99",
                "500g",
                "bogus-category",
                "8846720581243",
                "2018 October 03",
                "f53fd4ad-6c37-4e07-a2d7-e2b3e70b2a8a",
                "Removed",
                "CD-67890",
            ],
        ],
    );

    let cleaned = clean_products(raw);
    assert_eq!(cleaned.len(), 2, "no product row is dropped");
    assert_eq!(cleaned.columns()[5], "ean");

    assert_eq!(cleaned.cell(0, "weight"), Some(&CellValue::Float(0.34)));
    assert_eq!(cleaned.cell(0, "product_price"), Some(&CellValue::text("£3.20")));
    assert_eq!(cleaned.cell(0, "product_code"), Some(&CellValue::text("AB-12345")));
    assert_eq!(cleaned.cell(0, "category"), Some(&CellValue::text("diy")));
    assert_eq!(
        cleaned.cell(0, "uuid"),
        Some(&CellValue::Uuid("83dc0a69-f96f-4c34-bcb7-928acae19a94".into()))
    );

    assert_eq!(cleaned.cell(1, "category"), Some(&CellValue::Null));
    assert_eq!(cleaned.cell(1, "weight"), Some(&CellValue::Float(0.5)));
    assert_eq!(
        cleaned.cell(1, "date_added"),
        Some(&CellValue::Date(
            NaiveDate::from_ymd_opt(2018, 10, 3).unwrap_or(SENTINEL_DATE)
        ))
    );
}

#[test]
fn products_without_valid_code_are_dropped() {
    let raw = batch(
        &["product_name", "product_code"],
        vec![vec!["Soap", "XX"], vec!["Towel", "EF-11111"]],
    );
    let output = clean(Entity::Products, raw);
    assert_eq!(output.batch.len(), 1);
    assert_eq!(output.batch.columns()[0], "index");
    assert_eq!(output.batch.cell(0, "product_name"), Some(&CellValue::text("Towel")));
    assert_eq!(output.report.dropped_rows[0].position, 0);
    assert_eq!(output.report.dropped_rows[0].field, "product_code");
}

#[test]
fn card_rows_with_bad_numbers_are_removed() {
    let raw = batch(
        &["card_number", "expiry_date", "card_provider", "date_payment_confirmed"],
        vec![
            vec!["30060773296197", "09/26", "Diners Club / Carte Blanche", "2015-11-25"],
            vec!["abc", "10/23", "Mastercard", "2001-06-18"],
            vec!["??4971858637664481", "09/23", "VISA 16 digit", "not a date"],
        ],
    );

    let output = clean(Entity::Cards, raw.clone());
    assert_eq!(output.batch.len(), 2);
    assert_eq!(
        output.batch.cell(0, "card_number"),
        Some(&CellValue::Int(30060773296197))
    );
    assert_eq!(
        output.batch.cell(1, "card_number"),
        Some(&CellValue::Int(4971858637664481))
    );
    assert_eq!(
        output.batch.cell(1, "date_payment_confirmed"),
        Some(&CellValue::Date(SENTINEL_DATE))
    );
    assert_eq!(output.report.rows_in, 3);
    assert_eq!(output.report.rows_out, 2);
    assert_eq!(output.report.sentinel_dates, 1);
    assert_eq!(output.report.nulled_by_column.get("card_number"), Some(&1));

    assert_eq!(clean_cards(raw), output.batch);
}

#[test]
fn card_numbers_past_i64_are_kept() {
    let raw = batch(
        &["card_number", "expiry_date", "card_provider", "date_payment_confirmed"],
        vec![vec!["?12345678901234567890", "04/27", "Maestro", "2020-01-31"]],
    );

    let output = clean(Entity::Cards, raw);
    assert_eq!(output.batch.len(), 1);
    assert_eq!(
        output.batch.cell(0, "card_number"),
        Some(&CellValue::text("12345678901234567890"))
    );
    assert!(output.report.dropped_rows.is_empty());
}

#[test]
fn store_reshaping_drops_lat_and_orders_coordinates() {
    let raw = batch(
        &[
            "index",
            "address",
            "longitude",
            "lat",
            "locality",
            "store_code",
            "staff_numbers",
            "opening_date",
            "store_type",
            "latitude",
            "country_code",
            "continent",
        ],
        vec![
            vec![
                "0",
                "N/A",
                "N/A",
                "",
                "N/A",
                "WEB-1388012W",
                "325",
                "2010-06-12",
                "Web Portal",
                "N/A",
                "GB",
                "Europe",
            ],
            vec![
                "1",
                "Flat 72W, Sally isle, East Deantown",
                "51.62907",
                "",
                "High Wycombe",
                "HI-9B97EE4E",
                "34",
                "1996-10-25",
                "Local",
                "-0.7478",
                "GB",
                "eeEurope",
            ],
            vec![
                "2",
                "NULL",
                "NULL",
                "",
                "NULL",
                "NULL",
                "NULL",
                "NULL",
                "NULL",
                "NULL",
                "NULL",
                "NULL",
            ],
        ],
    );

    let cleaned = clean_stores(raw);
    assert!(!cleaned.columns().iter().any(|column| column == "lat"));
    let latitude = cleaned.column_index("latitude").expect("latitude");
    assert_eq!(cleaned.columns()[latitude + 1], "longitude");

    assert_eq!(cleaned.len(), 2, "row with NULL store code is dropped");
    assert_eq!(cleaned.cell(0, "address"), Some(&CellValue::Null));
    assert_eq!(cleaned.cell(0, "longitude"), Some(&CellValue::Null));
    assert_eq!(cleaned.cell(1, "continent"), Some(&CellValue::text("Europe")));
    assert_eq!(cleaned.cell(1, "latitude"), Some(&CellValue::Float(-0.7478)));
    assert_eq!(cleaned.cell(1, "staff_numbers"), Some(&CellValue::Int(34)));
    assert_eq!(cleaned.cell(1, "country_code"), Some(&CellValue::text("GB")));
}

#[test]
fn user_country_pairs_are_reconciled() {
    let raw = batch(
        &["first_name", "country", "country_code", "email_address", "user_uuid"],
        vec![
            vec!["Sigfried", "NULL", "DE", "sig@@example.de", "93caf182-e4e9-4c6e-bebb-60a1a9dcf9b8"],
            vec!["Guy", "Germany", "XX", "guy@example.com", "NULL"],
            vec!["Ada", "Germany", "gb", "ada@example.de", "NULL"],
            vec!["Uta", "Germany", " GB", "uta@example.de", "NULL"],
        ],
    );

    let output = clean(Entity::Users, raw);
    let users = &output.batch;
    assert_eq!(users.cell(0, "country"), Some(&CellValue::text("Germany")));
    assert_eq!(users.cell(0, "country_code"), Some(&CellValue::text("DE")));
    assert_eq!(users.cell(0, "email_address"), Some(&CellValue::text("sig@example.de")));
    assert_eq!(users.cell(1, "country"), Some(&CellValue::text("Germany")));
    assert_eq!(users.cell(1, "country_code"), Some(&CellValue::Null));
    for row in [2, 3] {
        assert_eq!(users.cell(row, "country"), Some(&CellValue::text("Germany")));
        assert_eq!(users.cell(row, "country_code"), Some(&CellValue::Null));
    }
    assert_eq!(output.report.regenerated_uuids, 3);
    assert!(matches!(users.cell(1, "user_uuid"), Some(CellValue::Uuid(_))));
}

#[test]
fn orders_drop_personal_columns() {
    let raw = batch(
        &[
            "level_0",
            "index",
            "date_uuid",
            "first_name",
            "last_name",
            "user_uuid",
            "card_number",
            "store_code",
            "product_code",
            "1",
            "product_quantity",
        ],
        vec![vec![
            "0",
            "0",
            "9476f17e-5d6a-4117-874d-9cdb38ca1fa6",
            "Ana",
            "Lima",
            "93caf182-e4e9-4c6e-bebb-60a1a9dcf9b8",
            "30060773296197",
            "BL-8387506C",
            "R7-3126933h",
            "",
            "3",
        ]],
    );

    let output = clean(Entity::Orders, raw);
    assert_eq!(
        output.batch.columns(),
        [
            "index",
            "date_uuid",
            "user_uuid",
            "card_number",
            "store_code",
            "product_code",
            "product_quantity"
        ]
    );
    assert_eq!(output.batch.cell(0, "product_quantity"), Some(&CellValue::Int(3)));
}

#[test]
fn date_times_are_bounded() {
    let raw = batch(
        &["timestamp", "month", "year", "day", "time_period", "date_uuid"],
        vec![
            vec!["22:00:06", "9", "2012", "19", "Evening", "3b7ca996-37f9-433f-b6d0-ce8391b615ad"],
            vec!["NULL", "13", "1900", "0", "Dawn", "NULL"],
        ],
    );

    let output = clean(Entity::DateTimes, raw);
    let times = &output.batch;
    assert_eq!(times.len(), 2, "date-times have no row-drop rule");
    assert_eq!(times.cell(0, "month"), Some(&CellValue::Int(9)));
    assert_eq!(times.cell(0, "year"), Some(&CellValue::Int(2012)));
    for column in ["timestamp", "month", "year", "day", "time_period"] {
        assert_eq!(times.cell(1, column), Some(&CellValue::Null), "{column}");
    }
}
