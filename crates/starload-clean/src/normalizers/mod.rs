//! Field normalizers.
//!
//! Each normalizer is a total function over [`CellValue`]: it never fails and
//! returns `CellValue::Null` for anything it cannot interpret. [`normalize`]
//! dispatches on the column's [`FieldType`].

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use starload_core::{CellValue, FieldType};

pub mod dates;
pub mod geo;
pub mod identifiers;
pub mod numeric;
pub mod text;

pub use dates::{normalize_date, normalize_timestamp, SENTINEL_DATE};
pub use geo::{normalize_continent, normalize_country, normalize_country_code};
pub use identifiers::{normalize_code, normalize_ean, normalize_uuid};
pub use numeric::{
    normalize_bounded, normalize_card_number, normalize_float, normalize_integer, normalize_weight,
};
pub use text::{
    normalize_email, normalize_enum, normalize_expiry_date, normalize_free_text,
    normalize_money, normalize_phone, normalize_product_name,
};

/// Non-null substitute produced instead of the input value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    RegeneratedUuid,
    SentinelDate,
}

/// Result of normalizing one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub value: CellValue,
    pub fallback: Option<Fallback>,
}

impl Normalized {
    pub fn value(value: CellValue) -> Self {
        Self {
            value,
            fallback: None,
        }
    }

    pub fn fallback(value: CellValue, fallback: Fallback) -> Self {
        Self {
            value,
            fallback: Some(fallback),
        }
    }
}

/// Raw values of the row being cleaned, for normalizers that look at a
/// sibling column.
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    pub columns: &'a [String],
    pub row: &'a [CellValue],
}

impl<'a> RowContext<'a> {
    pub fn new(columns: &'a [String], row: &'a [CellValue]) -> Self {
        Self { columns, row }
    }

    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        let index = self.columns.iter().position(|name| name == column)?;
        self.row.get(index)
    }
}

/// Apply the normalizer for `field_type` to `value`.
pub fn normalize(field_type: &FieldType, value: &CellValue, ctx: &RowContext<'_>) -> Normalized {
    let cleaned = match field_type {
        FieldType::FreeText { strict } => normalize_free_text(value, *strict),
        FieldType::Date => return normalize_date(value),
        FieldType::Uuid => return normalize_uuid(value),
        FieldType::Email => normalize_email(value),
        FieldType::Country { code_field } => {
            normalize_country(value, ctx.get(code_field).unwrap_or(&CellValue::Null))
        }
        FieldType::CountryCode { country_field } => {
            normalize_country_code(value, country_field.and_then(|field| ctx.get(field)))
        }
        FieldType::Phone => normalize_phone(value),
        FieldType::Integer { min_digits } => normalize_integer(value, *min_digits),
        FieldType::CardNumber => normalize_card_number(value),
        FieldType::Float => normalize_float(value),
        FieldType::Weight => normalize_weight(value),
        FieldType::Money => normalize_money(value),
        FieldType::Enum(set) => normalize_enum(value, *set),
        FieldType::Code(kind) => normalize_code(value, *kind),
        FieldType::Bounded { min, max } => normalize_bounded(value, *min, *max),
        FieldType::ExpiryDate => normalize_expiry_date(value),
        FieldType::Timestamp => normalize_timestamp(value),
        FieldType::Ean => normalize_ean(value),
        FieldType::ProductName => normalize_product_name(value),
        FieldType::Continent => normalize_continent(value),
    };
    Normalized::value(cleaned)
}

/// Placeholder strings that stand for a missing value in the sources.
pub(crate) fn is_placeholder(text: &str) -> bool {
    text.is_empty() || text == "NULL" || text == "N/A"
}

pub(crate) fn is_match(regex: &LazyLock<Option<Regex>>, text: &str) -> bool {
    regex.as_ref().is_some_and(|regex| regex.is_match(text))
}

pub(crate) fn compile(pattern: &str) -> Option<Regex> {
    Regex::new(pattern).ok()
}
