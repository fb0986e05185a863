use crate::core::registration::RegistrationEngine;
use crate::domain::model::Course;
use crate::domain::ports::Clock;
use crate::utils::error::{RegistrarError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn from_path(path: &str) -> Option<Self> {
        let extension = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some(ExportFormat::Csv),
            "tsv" => Some(ExportFormat::Tsv),
            _ => None,
        }
    }

    fn delimiter(self) -> u8 {
        match self {
            ExportFormat::Csv => b',',
            ExportFormat::Tsv => b'\t',
        }
    }
}

const HEADER: [&str; 9] = [
    "status",
    "code",
    "title",
    "credits",
    "schedule",
    "location",
    "professor",
    "term",
    "timestamp",
];

#[derive(Debug, Serialize)]
struct ScheduleRow<'a> {
    status: &'static str,
    code: &'a str,
    title: &'a str,
    credits: u32,
    schedule: &'a str,
    location: &'a str,
    professor: &'a str,
    term: String,
    timestamp: String,
}

impl<'a> ScheduleRow<'a> {
    fn new(status: &'static str, course: &'a Course, at: DateTime<Utc>) -> Self {
        Self {
            status,
            code: &course.code,
            title: &course.title,
            credits: course.credits,
            schedule: &course.schedule,
            location: &course.location,
            professor: &course.professor,
            term: course.term.to_string(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// 匯出已註冊（以及選擇性的待確認）課程表。沒有任何課程時仍輸出標題列。
pub fn export_schedule<C: Clock>(
    engine: &RegistrationEngine<C>,
    include_pending: bool,
    format: ExportFormat,
) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(format.delimiter())
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for registered in engine.registered() {
        writer.serialize(ScheduleRow::new("registered", &registered.course, registered.registered_at))?;
    }

    if include_pending {
        for pending in engine.pending() {
            writer.serialize(ScheduleRow::new("pending", &pending.course, pending.pending_at))?;
        }
    }

    writer
        .into_inner()
        .map_err(|e| RegistrarError::IoError(e.into_error()))
}
