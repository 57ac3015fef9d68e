use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use starload_core::Batch;

use crate::errors::CleanError;

/// Write a batch as CSV: header row, ISO dates, empty cells for null.
///
/// Returns the number of bytes written.
pub fn write_batch_csv(path: &Path, batch: &Batch) -> Result<u64, CleanError> {
    let writer = BufWriter::new(File::create(path)?);
    Ok(write_batch(CountingWriter::new(writer), batch)?)
}

/// Render a batch as CSV text.
pub fn batch_to_csv_string(batch: &Batch) -> Result<String, CleanError> {
    let mut buffer = Vec::new();
    write_batch(CountingWriter::new(&mut buffer), batch)?;
    String::from_utf8(buffer).map_err(|err| CleanError::Encoding(err.to_string()))
}

fn write_batch<W: Write>(counting: CountingWriter<W>, batch: &Batch) -> Result<u64, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    writer.write_record(batch.columns())?;
    for row in batch.rows() {
        writer.write_record(row.iter().map(|cell| cell.to_csv()))?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
