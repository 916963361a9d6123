//! CSV rendering of a finished report

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::errors::ReportResult;
use crate::report::Report;

/// Column order of the emitted file
pub const HEADER: [&str; 7] = [
    "store_id",
    "uptime_last_hour",
    "uptime_last_day",
    "uptime_last_week",
    "downtime_last_hour",
    "downtime_last_day",
    "downtime_last_week",
];

/// Write one row per computed store, sorted by store id
///
/// Failed stores are not written. Returns the number of rows written.
pub fn write_csv<W: Write>(report: &Report, writer: W) -> ReportResult<usize> {
    let mut out = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    out.write_record(HEADER)?;

    let rows = report.rows();
    for row in &rows {
        out.serialize(row)?;
    }
    out.flush()?;

    for failure in report.failures() {
        log::warn!("Omitted from CSV: {failure}");
    }
    Ok(rows.len())
}

pub fn write_csv_file(report: &Report, path: impl AsRef<Path>) -> ReportResult<usize> {
    let file = File::create(path.as_ref())?;
    let written = write_csv(report, file)?;
    log::info!("Wrote {written} rows to {}", path.as_ref().display());
    Ok(written)
}
