//! Per-stage execution records handed to the logging layer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Load,
    Clean,
    Filter,
    Aggregate,
    Pivot,
    Summary,
    Distribution,
    Export,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Load => "load",
            Stage::Clean => "clean",
            Stage::Filter => "filter",
            Stage::Aggregate => "aggregate",
            Stage::Pivot => "pivot",
            Stage::Summary => "summary",
            Stage::Distribution => "distribution",
            Stage::Export => "export",
        }
    }
}

/// What one stage consumed and produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub input_records: usize,
    pub output_records: usize,
    pub messages: Vec<String>,
}

impl StageReport {
    pub fn new(stage: Stage, started_at: DateTime<Utc>, input: usize, output: usize) -> Self {
        StageReport {
            stage,
            started_at,
            finished_at: Utc::now(),
            input_records: input,
            output_records: output,
            messages: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// Emits the report as a structured `info` event.
    pub fn log(&self) {
        info!(
            stage = self.stage.as_str(),
            input = self.input_records,
            output = self.output_records,
            elapsed_ms = self.elapsed_ms(),
            messages = ?self.messages,
            "Stage completed"
        );
    }
}

/// A stage result paired with its report.
#[derive(Debug, Clone)]
pub struct Staged<T> {
    pub value: T,
    pub report: StageReport,
}

impl<T> Staged<T> {
    pub fn new(value: T, report: StageReport) -> Self {
        Self { value, report }
    }

    /// Logs the report and returns the value.
    pub fn logged(self) -> T {
        self.report.log();
        self.value
    }
}
