//! Report line assembled by the reporter task and the text sink it goes to.

use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use crate::sensor::Reading;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    pub sequence: u64,
    pub raw: Reading,
    pub simple: Reading,
    pub moving: Reading,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} Onboard temperature = {:.2} C | Simple Average Temperature = {:.2} C | Moving Average Temperature = {:.2} C",
            self.sequence, self.raw, self.simple, self.moving
        )
    }
}

/// Where the reporter writes. Only the reporter task holds one.
pub trait ReportSink: Send {
    fn emit(&mut self, report: &Report) -> io::Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn emit(&mut self, report: &Report) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{report}")?;
        out.flush()
    }
}

/// Keeps every report in memory. Clones share the same storage, so a test
/// can hand one clone to the pipeline and read results through another.
#[derive(Clone, Default)]
pub struct MemorySink {
    reports: Arc<Mutex<Vec<Report>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.reports.lock().iter().map(|r| r.to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.reports.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.lock().is_empty()
    }
}

impl ReportSink for MemorySink {
    fn emit(&mut self, report: &Report) -> io::Result<()> {
        self.reports.lock().push(*report);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_one_line_with_two_decimals() {
        let report = Report {
            sequence: 3,
            raw: 23.456,
            simple: 23.0,
            moving: 22.999,
        };
        let line = report.to_string();
        assert_eq!(
            line,
            "#3 Onboard temperature = 23.46 C | Simple Average Temperature = 23.00 C | Moving Average Temperature = 23.00 C"
        );
        assert!(!line.contains('\n'));
    }

    #[test]
    fn memory_sink_clones_share_storage() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();
        writer
            .emit(&Report { sequence: 1, raw: 1.0, simple: 1.0, moving: 1.0 })
            .unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.reports()[0].sequence, 1);
    }
}
