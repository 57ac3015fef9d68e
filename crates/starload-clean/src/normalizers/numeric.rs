use std::sync::LazyLock;

use regex::Regex;
use starload_core::CellValue;

use super::compile;

static KILOGRAM_DEBRIS: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"[kKgG]|\s\."));
static GRAM_DEBRIS: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"[gG]|\s\."));

/// Integer cast with a digit-stripping fallback.
///
/// Text that does not parse keeps only its digits, and survives only when
/// more than `min_digits` of them remain.
pub fn normalize_integer(value: &CellValue, min_digits: usize) -> CellValue {
    match value {
        CellValue::Int(number) => CellValue::Int(*number),
        CellValue::Float(number) if number.is_finite() => CellValue::Int(number.trunc() as i64),
        CellValue::Text(text) => {
            if let Ok(number) = text.trim().parse::<i64>() {
                return CellValue::Int(number);
            }
            let digits: String = text.chars().filter(char::is_ascii_digit).collect();
            if digits.len() > min_digits {
                digits.parse::<i64>().map(CellValue::Int).unwrap_or(CellValue::Null)
            } else {
                CellValue::Null
            }
        }
        _ => CellValue::Null,
    }
}

const CARD_NUMBER_MIN_DIGITS: usize = 10;

/// Integer cast for card numbers. Numbers past `i64::MAX` keep their digit
/// string instead of cleaning to null.
pub fn normalize_card_number(value: &CellValue) -> CellValue {
    match (normalize_integer(value, CARD_NUMBER_MIN_DIGITS), value) {
        (CellValue::Null, CellValue::Text(text)) => {
            let digits: String = text.chars().filter(char::is_ascii_digit).collect();
            if digits.len() > CARD_NUMBER_MIN_DIGITS && digits.parse::<i64>().is_err() {
                CellValue::Text(digits)
            } else {
                CellValue::Null
            }
        }
        (cleaned, _) => cleaned,
    }
}

/// Float cast; text that does not parse is kept only when it carries a
/// decimal point and its numeric characters still parse.
pub fn normalize_float(value: &CellValue) -> CellValue {
    match value {
        CellValue::Float(number) => CellValue::Float(*number),
        CellValue::Int(number) => CellValue::Float(*number as f64),
        CellValue::Text(text) => {
            let trimmed = text.trim();
            if let Ok(number) = trimmed.parse::<f64>() {
                return finite(number);
            }
            if !trimmed.contains('.') {
                return CellValue::Null;
            }
            let numeric: String = trimmed
                .chars()
                .filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
                .collect();
            numeric.parse::<f64>().map(finite).unwrap_or(CellValue::Null)
        }
        _ => CellValue::Null,
    }
}

/// Convert a weight to kilograms.
///
/// `ml` counts as grams, grams are divided by 1000, and `N x M` multi-pack
/// notation yields the product `N * M` without unit scaling.
pub fn normalize_weight(value: &CellValue) -> CellValue {
    let text = match value {
        CellValue::Float(number) => return finite(*number),
        CellValue::Int(number) => return CellValue::Float(*number as f64),
        CellValue::Text(text) => text.trim(),
        _ => return CellValue::Null,
    };

    if let Ok(number) = text.parse::<f64>() {
        return finite(number);
    }

    let text = text.replace("ml", "g");
    let lower = text.to_lowercase();

    let (debris, scale) = if lower.contains("kg") {
        (&KILOGRAM_DEBRIS, 1.0)
    } else if lower.contains('g') {
        (&GRAM_DEBRIS, 1000.0)
    } else {
        return CellValue::Null;
    };

    let Some(debris) = debris.as_ref() else {
        return CellValue::Null;
    };
    let stripped = debris.replace_all(&text, "");
    let stripped = stripped.trim();

    if let Ok(number) = stripped.parse::<f64>() {
        return finite(number / scale);
    }
    multipack(stripped)
        .map(|count| CellValue::Float(count as f64))
        .unwrap_or(CellValue::Null)
}

/// Integer in `min..max` parsed from a number or numeric text.
pub fn normalize_bounded(value: &CellValue, min: i64, max: i64) -> CellValue {
    let number = match value {
        CellValue::Int(number) => Some(*number),
        CellValue::Float(number) if number.fract() == 0.0 => Some(*number as i64),
        CellValue::Text(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    match number {
        Some(number) if (min..max).contains(&number) => CellValue::Int(number),
        _ => CellValue::Null,
    }
}

fn multipack(text: &str) -> Option<i64> {
    let (count, each) = text.split_once(" x ")?;
    let count = count.trim().parse::<i64>().ok()?;
    let each = each.trim().parse::<i64>().ok()?;
    count.checked_mul(each)
}

fn finite(number: f64) -> CellValue {
    if number.is_finite() {
        CellValue::Float(number)
    } else {
        CellValue::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kg(value: &str) -> Option<f64> {
        normalize_weight(&CellValue::text(value)).as_f64()
    }

    #[test]
    fn integers_strip_noise_only_for_long_numbers() {
        assert_eq!(normalize_integer(&CellValue::text("42"), 10), CellValue::Int(42));
        assert_eq!(
            normalize_integer(&CellValue::text("??4971858637664481"), 10),
            CellValue::Int(4971858637664481)
        );
        assert_eq!(normalize_integer(&CellValue::text("J78"), 10), CellValue::Null);
        assert_eq!(normalize_integer(&CellValue::text("abc"), 10), CellValue::Null);
        assert_eq!(normalize_integer(&CellValue::Float(3.9), 10), CellValue::Int(3));
        assert_eq!(normalize_integer(&CellValue::Null, 10), CellValue::Null);
    }

    #[test]
    fn integers_that_overflow_are_dropped() {
        let huge = "x".to_string() + &"9".repeat(30);
        assert_eq!(normalize_integer(&CellValue::text(huge), 10), CellValue::Null);
    }

    #[test]
    fn long_card_numbers_keep_their_digits() {
        let twenty = "9".repeat(20);
        assert_eq!(
            normalize_card_number(&CellValue::text(twenty.as_str())),
            CellValue::text(twenty.as_str())
        );
        assert_eq!(
            normalize_card_number(&CellValue::text(format!("??{twenty}"))),
            CellValue::text(twenty.as_str())
        );
        assert_eq!(
            normalize_card_number(&CellValue::text("4971858637664481")),
            CellValue::Int(4971858637664481)
        );
        assert_eq!(normalize_card_number(&CellValue::text("abc")), CellValue::Null);
        assert_eq!(normalize_card_number(&CellValue::text("?123")), CellValue::Null);
    }

    #[test]
    fn floats_need_a_decimal_point_to_be_rescued() {
        assert_eq!(normalize_float(&CellValue::text("-0.12")), CellValue::Float(-0.12));
        assert_eq!(normalize_float(&CellValue::text("51.5N")), CellValue::Float(51.5));
        assert_eq!(normalize_float(&CellValue::text("N/A")), CellValue::Null);
        assert_eq!(normalize_float(&CellValue::text("13KQ")), CellValue::Null);
        assert_eq!(normalize_float(&CellValue::Int(2)), CellValue::Float(2.0));
    }

    #[test]
    fn weights_convert_to_kilograms() {
        assert_eq!(kg("0.5kg"), Some(0.5));
        assert_eq!(kg("1.6KG"), Some(1.6));
        assert_eq!(kg("500g"), Some(0.5));
        assert_eq!(kg("400ml"), Some(0.4));
        assert_eq!(kg("77g ."), Some(0.077));
        assert_eq!(kg("2.2"), Some(2.2));
    }

    #[test]
    fn multipack_weights_are_not_unit_scaled() {
        // "2 x 200g" is kept as the raw product 400, not 0.4 kg.
        assert_eq!(kg("2 x 200g"), Some(400.0));
        assert_eq!(kg("12 x 100g"), Some(1200.0));
    }

    #[test]
    fn weights_with_residual_text_are_rejected() {
        assert_eq!(kg("16oz"), None);
        assert_eq!(kg("9GO9NZ5JTL"), None);
        assert_eq!(normalize_weight(&CellValue::Null), CellValue::Null);
    }

    #[test]
    fn bounded_ints_use_half_open_ranges() {
        assert_eq!(normalize_bounded(&CellValue::text("31"), 1, 32), CellValue::Int(31));
        assert_eq!(normalize_bounded(&CellValue::text("32"), 1, 32), CellValue::Null);
        assert_eq!(normalize_bounded(&CellValue::text("1901"), 1901, 2100), CellValue::Int(1901));
        assert_eq!(normalize_bounded(&CellValue::text("2100"), 1901, 2100), CellValue::Null);
        assert_eq!(normalize_bounded(&CellValue::text("NULL"), 1, 13), CellValue::Null);
        assert_eq!(normalize_bounded(&CellValue::Int(12), 1, 13), CellValue::Int(12));
    }
}
