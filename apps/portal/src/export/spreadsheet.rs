use csv::WriterBuilder;

use crate::export::{
    actions_cell, export_rows, file_stem, ExportDocument, ExportError, ExportOptions, ExportSink,
};
use crate::recruitment::models::RecruitmentSnapshot;

const HEADER: [&str; 11] = [
    "id",
    "full_name",
    "email",
    "phone",
    "position",
    "applied_at",
    "status",
    "status_label",
    "migrated",
    "employee_id",
    "available_actions",
];

/// Spreadsheet export: one CSV row per record.
pub struct CsvExportSink;

impl ExportSink for CsvExportSink {
    fn export(
        &self,
        snapshot: &RecruitmentSnapshot,
        options: &ExportOptions,
    ) -> Result<ExportDocument, ExportError> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        writer.write_record(HEADER)?;

        for row in export_rows(snapshot) {
            let r = row.record;
            writer.write_record([
                r.id.to_string(),
                r.full_name.clone(),
                r.email.clone(),
                r.phone.clone().unwrap_or_default(),
                r.position.clone(),
                r.applied_at.format("%Y-%m-%d").to_string(),
                r.status.code().to_string(),
                r.status.label().to_string(),
                if r.is_migrated() { "yes" } else { "no" }.to_string(),
                r.hired_employee_ref
                    .map(|e| e.to_string())
                    .unwrap_or_default(),
                actions_cell(&row.actions),
            ])?;
        }

        let body = writer
            .into_inner()
            .map_err(|e| ExportError::Flush(e.to_string()))?;

        Ok(ExportDocument {
            content_type: "text/csv; charset=utf-8",
            file_name: format!("{}.csv", file_stem(&options.title, snapshot)),
            body,
        })
    }
}
