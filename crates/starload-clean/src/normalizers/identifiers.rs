use std::sync::LazyLock;

use regex::Regex;
use starload_core::{CellValue, CodeKind};
use uuid::Uuid;

use super::{compile, is_match, Fallback, Normalized};

static UUID_SHAPE: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"\w{8}-\w{4}-\w{4}-\w{4}-\w{12}"));
static STORE_CODE: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"^([A-Z]{2,3}-[A-Z0-9]{8})$"));
static PRODUCT_CODE: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"\w{2}-\w{5,}"));

/// UUID-shaped text passes unchanged; anything else is replaced by a fresh
/// random v4 UUID.
pub fn normalize_uuid(value: &CellValue) -> Normalized {
    match value.as_str() {
        Some(text) if is_match(&UUID_SHAPE, text) => Normalized::value(CellValue::Uuid(text.to_string())),
        _ => Normalized::fallback(
            CellValue::Uuid(Uuid::new_v4().to_string()),
            Fallback::RegeneratedUuid,
        ),
    }
}

/// Structural store and product codes.
pub fn normalize_code(value: &CellValue, kind: CodeKind) -> CellValue {
    let pattern = match kind {
        CodeKind::Store => &STORE_CODE,
        CodeKind::Product => &PRODUCT_CODE,
    };
    match value.as_str() {
        Some(text) if is_match(pattern, text) => CellValue::text(text),
        _ => CellValue::Null,
    }
}

/// EAN barcodes are all digits; integers are rendered to their digits.
pub fn normalize_ean(value: &CellValue) -> CellValue {
    let digits = match value {
        CellValue::Int(number) if *number >= 0 => number.to_string(),
        CellValue::Text(text) => text.clone(),
        _ => return CellValue::Null,
    };
    if !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_digit()) {
        CellValue::Text(digits)
    } else {
        CellValue::Null
    }
}
