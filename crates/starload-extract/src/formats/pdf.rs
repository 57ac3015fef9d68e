use std::path::Path;

use lopdf::Document;
use starload_core::{Batch, CellValue};
use tracing::debug;

use crate::error::ExtractError;

/// Columns of the card details table.
pub const CARD_COLUMNS: [&str; 4] = [
    "card_number",
    "expiry_date",
    "card_provider",
    "date_payment_confirmed",
];

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn parse_pdf_bytes(bytes: &[u8]) -> Result<Batch, ExtractError> {
    batch_from_document(&Document::load_mem(bytes)?)
}

pub fn parse_pdf_file(path: impl AsRef<Path>) -> Result<Batch, ExtractError> {
    batch_from_document(&Document::load(path)?)
}

fn batch_from_document(document: &Document) -> Result<Batch, ExtractError> {
    let pages: Vec<u32> = document.get_pages().keys().copied().collect();
    let text = document.extract_text(&pages)?;
    debug!(event = "pdf_text_extracted", pages = pages.len(), chars = text.len(), "pdf text extracted");
    parse_card_lines(&text)
}

/// Parse extracted card-table text, one card per line.
///
/// A line reads `card_number expiry_date card_provider... date_payment_confirmed`.
/// The provider may span several words; the date is the last word, or the
/// last three when they spell a month-name date (`2015 October 30`). Header
/// lines and lines too short to hold a card are skipped.
pub fn parse_card_lines(text: &str) -> Result<Batch, ExtractError> {
    let mut batch = Batch::new(CARD_COLUMNS.iter().map(|column| column.to_string()).collect());

    for line in text.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() || tokens[0] == CARD_COLUMNS[0] {
            continue;
        }

        let date_words = if tokens.len() >= 6 && tokens[tokens.len() - 3..].iter().any(|t| is_month(t)) {
            3
        } else {
            1
        };
        if tokens.len() < 3 + date_words {
            debug!(event = "pdf_line_skipped", line, "line too short for a card row");
            continue;
        }

        let provider_end = tokens.len() - date_words;
        batch.push_row(vec![
            CellValue::text(tokens[0]),
            CellValue::text(tokens[1]),
            CellValue::text(tokens[2..provider_end].join(" ")),
            CellValue::text(tokens[provider_end..].join(" ")),
        ])?;
    }
    Ok(batch)
}

fn is_month(token: &str) -> bool {
    MONTHS.iter().any(|month| month.eq_ignore_ascii_case(token))
}
