use starload_core::CellValue;

use super::is_placeholder;

/// Country codes and the one canonical country name each maps to.
pub const COUNTRY_CODES: &[(&str, &str)] = &[
    ("DE", "Germany"),
    ("GB", "United Kingdom"),
    ("US", "United States"),
];

pub const CONTINENTS: &[&str] = &["America", "Europe"];

fn country_for_code(code: &str) -> Option<&'static str> {
    COUNTRY_CODES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, country)| *country)
}

fn is_canonical_country(country: &str) -> bool {
    COUNTRY_CODES.iter().any(|(_, known)| *known == country)
}

/// Present country text, or `None` when it is a placeholder or contains digits.
fn present_country(value: &CellValue) -> Option<&str> {
    value
        .as_str()
        .filter(|text| !is_placeholder(text) && !text.chars().any(|ch| ch.is_ascii_digit()))
}

fn known_code(value: &CellValue) -> Option<&'static str> {
    let code = value.as_str()?.trim();
    COUNTRY_CODES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(code))
        .map(|(known, _)| *known)
}

fn exact_code(value: &CellValue) -> Option<&'static str> {
    let code = value.as_str()?;
    COUNTRY_CODES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(known, _)| *known)
}

/// Known code for a (country, code) pair. Codes next to a present country
/// must match exactly; alone they are trimmed and upper-cased first.
fn resolve_code(code: &CellValue, country_present: bool) -> Option<&'static str> {
    if country_present {
        exact_code(code)
    } else {
        known_code(code)
    }
}

/// Reconcile a country name with its sibling country code.
///
/// An absent country is derived from the code. A present country is
/// overridden by the canonical name of a known code; when the code is not
/// known the country survives only if it is itself canonical.
pub fn normalize_country(country: &CellValue, code: &CellValue) -> CellValue {
    let present = present_country(country);
    let canonical = resolve_code(code, present.is_some()).and_then(country_for_code);
    match (present, canonical) {
        (_, Some(canonical)) => CellValue::text(canonical),
        (Some(country), None) if is_canonical_country(country) => CellValue::text(country),
        _ => CellValue::Null,
    }
}

/// Validate a country code against the canonical map.
///
/// With no sibling country (or an absent one) the code is repaired in
/// isolation (trimmed, upper-cased); otherwise it must already be known.
pub fn normalize_country_code(code: &CellValue, country: Option<&CellValue>) -> CellValue {
    let country_present = country.and_then(present_country).is_some();
    resolve_code(code, country_present)
        .map(CellValue::text)
        .unwrap_or(CellValue::Null)
}

/// Keep known continents; otherwise remove runs of a repeated character
/// (`eeEurope` becomes `Europe`).
pub fn normalize_continent(value: &CellValue) -> CellValue {
    let Some(text) = value.as_str() else {
        return CellValue::Null;
    };
    if CONTINENTS.contains(&text) {
        return CellValue::text(text);
    }

    let chars: Vec<char> = text.chars().collect();
    let mut kept = String::with_capacity(text.len());
    let mut had_run = false;
    let mut start = 0;
    while start < chars.len() {
        let current = chars[start];
        let mut end = start + 1;
        while end < chars.len() && chars[end] == current {
            end += 1;
        }
        let is_word = current.is_alphanumeric() || current == '_';
        if is_word && end - start > 1 {
            had_run = true;
        } else {
            kept.extend(&chars[start..end]);
        }
        start = end;
    }

    if had_run {
        CellValue::Text(kept)
    } else {
        CellValue::Null
    }
}
