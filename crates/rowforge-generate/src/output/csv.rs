use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::model::EntityRows;

/// Write an entity's rows as CSV: a header of the column names, then one
/// record per row in generation order. Returns the number of bytes written.
pub fn write_entity_csv(path: &Path, entity: &EntityRows) -> Result<u64, csv::Error> {
    let file = File::create(path).map_err(csv::Error::from)?;
    write_entity_records(BufWriter::new(file), entity)
}

/// Same as [`write_entity_csv`] for any writer.
pub fn write_entity_records<W: Write>(writer: W, entity: &EntityRows) -> Result<u64, csv::Error> {
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    writer.write_record(&entity.columns)?;

    for row in &entity.rows {
        let record: Vec<String> = entity
            .columns
            .iter()
            .map(|column| row.get(column).map(|value| value.to_csv()).unwrap_or_default())
            .collect();
        writer.write_record(&record)?;
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
