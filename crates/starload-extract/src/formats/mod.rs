//! Payload parsers shared by the HTTP sources and the offline `clean` command.

mod delimited;
mod json;
mod pdf;

pub use delimited::parse_csv_batch;
pub use json::parse_json_batch;
pub use pdf::{parse_card_lines, parse_pdf_bytes, parse_pdf_file, CARD_COLUMNS};
