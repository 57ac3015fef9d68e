pub mod csv;

pub use self::csv::{batch_to_csv_string, write_batch_csv};
