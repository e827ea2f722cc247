use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::error::Result;
use crate::usecase::report::Report;

/// Destination for a finished report. Returns where the output landed.
pub trait ReportSink {
    fn export(&self, report: &Report, file_name: &str) -> Result<PathBuf>;
}

/// Writes `<dir>/<file_name>.csv` with a header row.
pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl ReportSink for CsvSink {
    fn export(&self, report: &Report, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{}.csv", file_name));
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(&report.columns)?;
        for row in &report.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        info!("exported {} rows to {}", report.rows.len(), path.display());
        Ok(path)
    }
}
