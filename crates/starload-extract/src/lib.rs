//! Extraction of raw batches from the legacy sources.
//!
//! Every source yields a [`Batch`](starload_core::Batch) of uncleaned cells, or
//! `None` when the upstream reports the source as missing.

pub mod digest;
pub mod error;
pub mod extractor;
pub mod formats;
pub mod http;
pub mod postgres;

pub use error::ExtractError;
pub use extractor::{DataExtractor, Extractor, Source};
pub use formats::{parse_card_lines, parse_csv_batch, parse_json_batch};
pub use http::{object_url, HttpSource};
pub use postgres::PostgresSource;
