//! Field normalization and record cleaning for starload.
//!
//! Raw batches go through one cleaner per entity. Cleaners reshape columns,
//! apply the per-field normalizers declared by the entity schema and drop rows
//! whose required field cleans to null. Cleaning never fails.

pub mod cleaners;
pub mod errors;
pub mod normalizers;
pub mod output;
pub mod report;
pub mod weight_class;

pub use cleaners::{
    clean, clean_cards, clean_date_times, clean_orders, clean_products, clean_stores,
    clean_users, CleanOutput,
};
pub use errors::CleanError;
pub use report::{CleanReport, DroppedRow};
pub use weight_class::{weight_class_case_sql, WeightClass, WEIGHT_BANDS};
