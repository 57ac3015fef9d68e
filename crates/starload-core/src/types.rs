use std::fmt;

use serde::Serialize;

/// Semantic type of a batch column; selects the normalizer applied to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "params", rename_all = "snake_case")]
pub enum FieldType {
    /// Placeholder-aware text. The strict variant also rejects digits.
    FreeText { strict: bool },
    Date,
    Uuid,
    Email,
    /// Country name reconciled against the sibling code column.
    Country { code_field: &'static str },
    /// Country code, optionally reconciled against a sibling country column.
    CountryCode { country_field: Option<&'static str> },
    Phone,
    Integer { min_digits: usize },
    /// Card number; digit strings too long for an `i64` stay text.
    CardNumber,
    Float,
    Weight,
    Money,
    Enum(ClosedSet),
    Code(CodeKind),
    /// Integer in `min..max` (max exclusive).
    Bounded { min: i64, max: i64 },
    ExpiryDate,
    Timestamp,
    Ean,
    ProductName,
    Continent,
}

impl FieldType {
    /// Stable identifier used in reports and logs.
    pub fn id(&self) -> &'static str {
        match self {
            FieldType::FreeText { strict: false } => "normalize.free_text",
            FieldType::FreeText { strict: true } => "normalize.free_text_strict",
            FieldType::Date => "normalize.date",
            FieldType::Uuid => "normalize.uuid",
            FieldType::Email => "normalize.email",
            FieldType::Country { .. } => "normalize.country",
            FieldType::CountryCode { .. } => "normalize.country_code",
            FieldType::Phone => "normalize.phone",
            FieldType::Integer { .. } => "normalize.integer",
            FieldType::CardNumber => "normalize.card_number",
            FieldType::Float => "normalize.float",
            FieldType::Weight => "normalize.weight",
            FieldType::Money => "normalize.money",
            FieldType::Enum(_) => "normalize.enum",
            FieldType::Code(CodeKind::Store) => "normalize.store_code",
            FieldType::Code(CodeKind::Product) => "normalize.product_code",
            FieldType::Bounded { .. } => "normalize.bounded_int",
            FieldType::ExpiryDate => "normalize.expiry_date",
            FieldType::Timestamp => "normalize.timestamp",
            FieldType::Ean => "normalize.ean",
            FieldType::ProductName => "normalize.product_name",
            FieldType::Continent => "normalize.continent",
        }
    }
}

/// Fixed vocabularies accepted by enum-membership fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosedSet {
    CardProviders,
    StoreTypes,
    ProductCategories,
    ProductAvailability,
    TimePeriods,
}

const CARD_PROVIDERS: &[&str] = &[
    "Mastercard",
    "JCB 16 digit",
    "VISA 16 digit",
    "Diners Club / Carte Blanche",
    "American Express",
    "JCB 15 digit",
    "VISA 13 digit",
    "Maestro",
    "Discover",
    "VISA 19 digit",
];

const STORE_TYPES: &[&str] = &["Mall Kiosk", "Local", "Outlet", "Super Store", "Web Portal"];

const PRODUCT_CATEGORIES: &[&str] = &[
    "sports-and-leisure",
    "diy",
    "pets",
    "toys-and-games",
    "food-and-drink",
    "health-and-beauty",
    "homeware",
];

const PRODUCT_AVAILABILITY: &[&str] = &["Still_avaliable", "Removed"];

const TIME_PERIODS: &[&str] = &["Morning", "Evening", "Midday", "Late_Hours"];

impl ClosedSet {
    pub fn members(&self) -> &'static [&'static str] {
        match self {
            ClosedSet::CardProviders => CARD_PROVIDERS,
            ClosedSet::StoreTypes => STORE_TYPES,
            ClosedSet::ProductCategories => PRODUCT_CATEGORIES,
            ClosedSet::ProductAvailability => PRODUCT_AVAILABILITY,
            ClosedSet::TimePeriods => TIME_PERIODS,
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.members().contains(&value)
    }
}

/// Structural code formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeKind {
    Store,
    Product,
}

/// Warehouse column types used for hints and migrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "length", rename_all = "snake_case")]
pub enum SqlType {
    Text,
    Varchar(u32),
    Uuid,
    Date,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Boolean,
}

impl SqlType {
    pub fn as_sql(&self) -> String {
        match self {
            SqlType::Text => "TEXT".to_string(),
            SqlType::Varchar(length) => format!("VARCHAR({length})"),
            SqlType::Uuid => "UUID".to_string(),
            SqlType::Date => "DATE".to_string(),
            SqlType::SmallInt => "SMALLINT".to_string(),
            SqlType::Integer => "INTEGER".to_string(),
            SqlType::BigInt => "BIGINT".to_string(),
            SqlType::Float => "FLOAT".to_string(),
            SqlType::Boolean => "BOOLEAN".to_string(),
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_sql())
    }
}

/// Declared warehouse type for one column of a loaded table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnHint {
    pub column: &'static str,
    pub sql_type: SqlType,
}

impl ColumnHint {
    pub const fn new(column: &'static str, sql_type: SqlType) -> Self {
        Self { column, sql_type }
    }
}

/// Look up the hinted type for `column`.
pub fn hinted_type(hints: &[ColumnHint], column: &str) -> Option<SqlType> {
    hints
        .iter()
        .find(|hint| hint.column == column)
        .map(|hint| hint.sql_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sql_types_render_postgres_names() {
        assert_eq!(SqlType::Varchar(13).as_sql(), "VARCHAR(13)");
        assert_eq!(SqlType::SmallInt.to_string(), "SMALLINT");
    }

    #[test]
    fn closed_sets_are_case_sensitive() {
        assert!(ClosedSet::ProductCategories.contains("diy"));
        assert!(!ClosedSet::ProductCategories.contains("DIY"));
        assert!(ClosedSet::ProductAvailability.contains("Still_avaliable"));
    }
}
