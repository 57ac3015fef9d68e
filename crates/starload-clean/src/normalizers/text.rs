use std::sync::LazyLock;

use regex::Regex;
use starload_core::{CellValue, ClosedSet};

use super::{compile, is_match, is_placeholder};

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"^[\w0-9_.+-]+@[\w-]{2,}\.[\w]{2,}[\.\w]{0,}$"));
static REPEATED_AT: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"@{2,}"));
static PHONE_NOISE: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"[a-zA-Z()\s\-.]"));
static EXPIRY_DATE: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"^\d{2}/\d{2}$"));
static MONEY: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"£\d+\.\d{2}"));
static SCRAMBLED_NAME: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"[A-Z0-9]{10}"));

/// Text with placeholders removed; `strict` also rejects any digit.
pub fn normalize_free_text(value: &CellValue, strict: bool) -> CellValue {
    let Some(text) = value.render() else {
        return CellValue::Null;
    };
    if is_placeholder(&text) || (strict && text.chars().any(|ch| ch.is_ascii_digit())) {
        return CellValue::Null;
    }
    CellValue::Text(text)
}

/// Valid addresses pass; a run of `@` characters collapses to one.
pub fn normalize_email(value: &CellValue) -> CellValue {
    let Some(email) = value.as_str() else {
        return CellValue::Null;
    };
    if is_placeholder(email) {
        return CellValue::Null;
    }
    if is_match(&EMAIL, email) {
        return CellValue::text(email);
    }
    match REPEATED_AT.as_ref() {
        Some(regex) if regex.is_match(email) => {
            CellValue::Text(regex.replace_all(email, "@").into_owned())
        }
        _ => CellValue::Null,
    }
}

/// Strip letters and `( ) . -` and whitespace, keeping digits and `+`.
pub fn normalize_phone(value: &CellValue) -> CellValue {
    let Some(phone) = value.render() else {
        return CellValue::Null;
    };
    if is_placeholder(&phone) {
        return CellValue::Null;
    }
    match PHONE_NOISE.as_ref() {
        Some(regex) => {
            let stripped = regex.replace_all(&phone, "");
            if stripped.is_empty() {
                CellValue::Null
            } else {
                CellValue::Text(stripped.into_owned())
            }
        }
        None => CellValue::Null,
    }
}

/// Keep values that belong to the closed set.
pub fn normalize_enum(value: &CellValue, set: ClosedSet) -> CellValue {
    match value.as_str() {
        Some(text) if set.contains(text) => CellValue::text(text),
        _ => CellValue::Null,
    }
}

/// `MM/YY` card expiry.
pub fn normalize_expiry_date(value: &CellValue) -> CellValue {
    match value.as_str().map(str::trim) {
        Some(text) if is_match(&EXPIRY_DATE, text) => CellValue::text(text),
        _ => CellValue::Null,
    }
}

/// Prices must contain a `£` amount with two decimals; the text is kept as is.
pub fn normalize_money(value: &CellValue) -> CellValue {
    match value.as_str() {
        Some(text) if is_match(&MONEY, text) => CellValue::text(text),
        _ => CellValue::Null,
    }
}

/// Product names; a run of ten upper-case letters or digits marks a
/// scrambled row.
pub fn normalize_product_name(value: &CellValue) -> CellValue {
    match value.as_str() {
        Some(text) if !is_placeholder(text) && !is_match(&SCRAMBLED_NAME, text) => {
            CellValue::text(text)
        }
        _ => CellValue::Null,
    }
}
