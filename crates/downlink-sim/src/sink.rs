//! CSV telemetry log.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use tracing::error;

use downlink_endpoint::TelemetrySink;
use downlink_protocol::Telemetry;

/// Writes received telemetry as CSV rows, one per sample.
pub struct CsvSink {
    writer: BufWriter<File>,
}

impl CsvSink {
    /// Creates (truncating) the log file and writes the header row.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{}", Telemetry::csv_header())?;
        Ok(Self { writer })
    }
}

impl TelemetrySink for CsvSink {
    fn record(&mut self, telemetry: &Telemetry) {
        // A failed log write is not a reason to drop the link.
        if let Err(err) = writeln!(self.writer, "{}", telemetry.to_csv_row()) {
            error!(%err, "failed to write telemetry log row");
        }
    }
}

impl Drop for CsvSink {
    fn drop(&mut self) {
        if let Err(err) = self.writer.flush() {
            error!(%err, "failed to flush telemetry log");
        }
    }
}
