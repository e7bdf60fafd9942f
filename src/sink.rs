//! # Ntuple Output
//!
//! Summary records are appended to a sink that is opened once per run and
//! finished once at the end.
//!
//! ## File Formats
//!
//! - `csv`: a header of the 18 schema names followed by one row per event
//! - `jsonl`: one JSON object per event, keys named after the record fields
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut writer = NtupleWriter::create("tpg_info.csv", NtupleFormat::Csv)?;
//! for event in events {
//!     aggregator.process_into(&event?, &calibration, &mut writer)?;
//! }
//! writer.finish()?;
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::calorimeter::EventSummaryRecord;
use crate::error::MonitorError;
use crate::MonitorResult;

/// Append-only destination for event summaries
pub trait OutputSink {
    fn append(&mut self, record: &EventSummaryRecord) -> MonitorResult<()>;

    /// Flush and close; further appends fail
    fn finish(&mut self) -> MonitorResult<()> {
        Ok(())
    }
}

/// On-disk layout of the ntuple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NtupleFormat {
    #[default]
    Csv,
    Jsonl,
}

impl NtupleFormat {
    /// Guess the format from a file extension, CSV otherwise
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("jsonl") | Some("json") => Self::Jsonl,
            _ => Self::Csv,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FILE WRITER
// ═══════════════════════════════════════════════════════════════════════════════

/// Buffered ntuple file
///
/// The buffer is flushed by [`OutputSink::finish`]; if the writer is dropped
/// without finishing, `Drop` flushes and logs any failure.
pub struct NtupleWriter {
    out: Option<BufWriter<File>>,
    path: PathBuf,
    format: NtupleFormat,
    rows: u64,
}

impl NtupleWriter {
    /// Create (truncate) the output file and write the header
    pub fn create(path: impl AsRef<Path>, format: NtupleFormat) -> MonitorResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut out = BufWriter::new(File::create(&path)?);
        if format == NtupleFormat::Csv {
            writeln!(out, "{}", EventSummaryRecord::FIELD_NAMES.join(","))?;
        }
        log::info!("Opened {:?} ntuple {:?}", format, path);
        Ok(Self {
            out: Some(out),
            path,
            format,
            rows: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows written so far
    pub fn rows(&self) -> u64 {
        self.rows
    }

    fn close(&mut self) -> MonitorResult<()> {
        if let Some(mut out) = self.out.take() {
            out.flush()?;
            log::info!("Closed ntuple {:?} with {} rows", self.path, self.rows);
        }
        Ok(())
    }
}

impl OutputSink for NtupleWriter {
    fn append(&mut self, record: &EventSummaryRecord) -> MonitorResult<()> {
        let out = self.out.as_mut().ok_or(MonitorError::SinkClosed)?;
        match self.format {
            NtupleFormat::Csv => {
                let row: Vec<String> = record.to_array().iter().map(|v| v.to_string()).collect();
                writeln!(out, "{}", row.join(","))?;
            }
            NtupleFormat::Jsonl => {
                serde_json::to_writer(&mut *out, record)?;
                out.write_all(b"\n")?;
            }
        }
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> MonitorResult<()> {
        self.close()
    }
}

impl Drop for NtupleWriter {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::error!("Failed to flush ntuple {:?}: {}", self.path, e);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MEMORY SINK
// ═══════════════════════════════════════════════════════════════════════════════

/// Keeps records in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Vec<EventSummaryRecord>,
    finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[EventSummaryRecord] {
        &self.records
    }
}

impl OutputSink for MemorySink {
    fn append(&mut self, record: &EventSummaryRecord) -> MonitorResult<()> {
        if self.finished {
            return Err(MonitorError::SinkClosed);
        }
        self.records.push(*record);
        Ok(())
    }

    fn finish(&mut self) -> MonitorResult<()> {
        self.finished = true;
        Ok(())
    }
}

impl<S: OutputSink + ?Sized> OutputSink for Box<S> {
    fn append(&mut self, record: &EventSummaryRecord) -> MonitorResult<()> {
        (**self).append(record)
    }

    fn finish(&mut self) -> MonitorResult<()> {
        (**self).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_record(pt: f32) -> EventSummaryRecord {
        EventSummaryRecord {
            n_ecal_cells: 4032.0,
            ecal_sum: 12.5,
            pt,
            ..Default::default()
        }
    }

    #[test]
    fn test_csv_writer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tpg.csv");

        let mut writer = NtupleWriter::create(&path, NtupleFormat::Csv).unwrap();
        writer.append(&sample_record(20.0)).unwrap();
        writer.append(&sample_record(0.0)).unwrap();
        assert_eq!(writer.rows(), 2);
        writer.finish().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("nEcalDigi,ecalSum,ecalMax"));
        let first: Vec<f32> = lines[1].split(',').map(|v| v.parse().unwrap()).collect();
        assert_eq!(first.len(), EventSummaryRecord::N_FIELDS);
        assert_eq!(first[0], 4032.0);
        assert_eq!(first[1], 12.5);
        assert_eq!(first[13], 20.0);
    }

    #[test]
    fn test_jsonl_writer_flushes_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tpg.jsonl");
        {
            let mut writer = NtupleWriter::create(&path, NtupleFormat::Jsonl).unwrap();
            writer.append(&sample_record(7.0)).unwrap();
        }

        let content = fs::read_to_string(&path).unwrap();
        let record: EventSummaryRecord =
            serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!(record, sample_record(7.0));
    }

    #[test]
    fn test_append_after_finish_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer =
            NtupleWriter::create(dir.path().join("closed.csv"), NtupleFormat::Csv).unwrap();
        writer.finish().unwrap();
        assert!(matches!(
            writer.append(&sample_record(1.0)),
            Err(MonitorError::SinkClosed)
        ));

        let mut memory = MemorySink::new();
        memory.append(&sample_record(1.0)).unwrap();
        memory.finish().unwrap();
        assert!(memory.append(&sample_record(2.0)).is_err());
        assert_eq!(memory.records().len(), 1);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(NtupleFormat::from_path(Path::new("a.jsonl")), NtupleFormat::Jsonl);
        assert_eq!(NtupleFormat::from_path(Path::new("a.csv")), NtupleFormat::Csv);
        assert_eq!(NtupleFormat::from_path(Path::new("a")), NtupleFormat::Csv);
    }
}
