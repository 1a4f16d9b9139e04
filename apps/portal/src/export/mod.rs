//! Export: turns a recruitment snapshot into a downloadable document.
//!
//! Sinks only ever see a snapshot taken at export time, and action availability
//! is recomputed for every row of every export.

pub mod document;
pub mod spreadsheet;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::recruitment::models::{RecruitmentRecord, RecruitmentSnapshot};
use crate::recruitment::status::RecruitmentStatus;
use crate::recruitment::workflow::{available_actions, Action};

pub use document::MarkdownExportSink;
pub use spreadsheet::CsvExportSink;

pub const DEFAULT_TITLE: &str = "Recruitment Report";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to flush export buffer: {0}")]
    Flush(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Markdown,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" | "spreadsheet" => Ok(ExportFormat::Csv),
            "md" | "markdown" | "document" => Ok(ExportFormat::Markdown),
            other => Err(format!("Unsupported export format: {other}")),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => f.write_str("csv"),
            ExportFormat::Markdown => f.write_str("markdown"),
        }
    }
}

/// Presentation options passed to a sink alongside the snapshot.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub title: String,
    /// Empty means every status.
    pub statuses: Vec<RecruitmentStatus>,
}

impl ExportOptions {
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            title: DEFAULT_TITLE.to_string(),
            statuses: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportDocument {
    pub content_type: &'static str,
    pub file_name: String,
    pub body: Vec<u8>,
}

pub trait ExportSink: Send + Sync {
    fn export(
        &self,
        snapshot: &RecruitmentSnapshot,
        options: &ExportOptions,
    ) -> Result<ExportDocument, ExportError>;
}

/// One exported record with the actions available at export time.
pub struct ExportRow<'a> {
    pub record: &'a RecruitmentRecord,
    pub actions: BTreeSet<Action>,
}

pub fn export_rows(snapshot: &RecruitmentSnapshot) -> Vec<ExportRow<'_>> {
    snapshot
        .records
        .iter()
        .map(|record| ExportRow {
            record,
            actions: available_actions(record),
        })
        .collect()
}

/// Picks the sink for `options.format` and exports the filtered snapshot.
pub fn export_snapshot(
    snapshot: &RecruitmentSnapshot,
    options: &ExportOptions,
) -> Result<ExportDocument, ExportError> {
    let filtered = snapshot.filtered(&options.statuses);
    let sink: &dyn ExportSink = match options.format {
        ExportFormat::Csv => &CsvExportSink,
        ExportFormat::Markdown => &MarkdownExportSink,
    };
    sink.export(&filtered, options)
}

pub(crate) fn file_stem(title: &str, snapshot: &RecruitmentSnapshot) -> String {
    let slug: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let slug = slug
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    let slug = if slug.is_empty() {
        "recruitment".to_string()
    } else {
        slug
    };
    format!("{slug}-{}", snapshot.taken_at.format("%Y%m%d-%H%M%S"))
}

pub(crate) fn actions_cell(actions: &BTreeSet<Action>) -> String {
    actions
        .iter()
        .map(|a| a.describe())
        .collect::<Vec<_>>()
        .join("; ")
}
