// 📝 Reporters - Where observations go
//
// CsvReporter  - one row per mismatch, values verbatim (csv handles quoting)
// JsonReporter - one observation per line

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

use crate::entities::SpotCheckObservation;
use crate::store::Reporter;

#[derive(Debug, Serialize)]
struct MismatchRow<'a> {
    bill: String,
    reference_type: &'static str,
    reference_date_time: String,
    observed_at: String,
    mismatch_type: &'static str,
    reference_data: &'a str,
    observed_data: &'a str,
}

// ============================================================================
// CSV
// ============================================================================

pub struct CsvReporter<W: Write> {
    writer: csv::Writer<W>,
    rows_written: usize,
}

impl<W: Write> CsvReporter<W> {
    pub fn new(inner: W) -> Self {
        CsvReporter {
            writer: csv::Writer::from_writer(inner),
            rows_written: 0,
        }
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV report: {}", e))
    }
}

impl<W: Write> Reporter for CsvReporter<W> {
    fn report(&mut self, observations: &[SpotCheckObservation]) -> Result<()> {
        for observation in observations {
            for mismatch in observation.mismatches() {
                self.writer
                    .serialize(MismatchRow {
                        bill: observation.key.to_string(),
                        reference_type: observation.reference_id.ref_type.as_str(),
                        reference_date_time: observation.reference_id.ref_active_date_time.to_string(),
                        observed_at: observation.observed_at.to_rfc3339(),
                        mismatch_type: mismatch.mismatch_type.as_str(),
                        reference_data: &mismatch.reference_data,
                        observed_data: &mismatch.observed_data,
                    })
                    .context("Failed to write CSV report row")?;
                self.rows_written += 1;
            }
        }

        self.writer.flush()?;
        Ok(())
    }
}

// ============================================================================
// JSON LINES
// ============================================================================

pub struct JsonReporter<W: Write> {
    inner: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(inner: W) -> Self {
        JsonReporter { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, observations: &[SpotCheckObservation]) -> Result<()> {
        for observation in observations {
            serde_json::to_writer(&mut self.inner, observation)
                .context("Failed to write JSON observation")?;
            self.inner.write_all(b"\n")?;
        }

        self.inner.flush()?;
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
