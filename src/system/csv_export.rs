use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::system::rate::{RateSample, TrackedField};

/// Appends every rate sample as a CSV row. The header (tracked field names)
/// is written once on creation.
pub struct CsvExporter<W: Write> {
    writer: csv::Writer<W>,
    rows: u64,
}

impl CsvExporter<File> {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create CSV file {}", path.display()))?;
        info!(path = %path.display(), "exporting rate samples to CSV");
        Self::new(file)
    }
}

impl<W: Write> CsvExporter<W> {
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(inner);
        writer
            .write_record(TrackedField::all().iter().map(|f| f.counter_name()))
            .context("Failed to write CSV header")?;
        writer.flush().context("Failed to flush CSV header")?;
        Ok(Self { writer, rows: 0 })
    }

    /// Data rows written so far.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn write_sample(&mut self, sample: &RateSample) -> Result<()> {
        self.writer
            .write_record(TrackedField::all().iter().map(|f| sample.get(*f).to_string()))
            .context("Failed to write CSV row")?;
        // Flush per row so the file is usable while the monitor runs.
        self.writer.flush().context("Failed to flush CSV row")?;
        self.rows += 1;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to finish CSV output: {}", e.error()))
    }
}
