use crate::export::{
    actions_cell, export_rows, file_stem, ExportDocument, ExportError, ExportOptions, ExportSink,
};
use crate::recruitment::models::RecruitmentSnapshot;
use crate::recruitment::status::RecruitmentStatus;

/// Document export: a markdown report grouped by pipeline stage.
pub struct MarkdownExportSink;

impl ExportSink for MarkdownExportSink {
    fn export(
        &self,
        snapshot: &RecruitmentSnapshot,
        options: &ExportOptions,
    ) -> Result<ExportDocument, ExportError> {
        let body = render_snapshot_to_md(&options.title, snapshot);
        Ok(ExportDocument {
            content_type: "text/markdown; charset=utf-8",
            file_name: format!("{}.md", file_stem(&options.title, snapshot)),
            body: body.into_bytes(),
        })
    }
}

/// Renders the snapshot with one section per non-empty stage, in pipeline order.
pub fn render_snapshot_to_md(title: &str, snapshot: &RecruitmentSnapshot) -> String {
    let mut md = format!("# {title}\n\n");
    md.push_str(&format!(
        "_Generated {}, {} record(s)_\n\n",
        snapshot.taken_at.format("%Y-%m-%d %H:%M UTC"),
        snapshot.records.len()
    ));

    let rows = export_rows(snapshot);
    for status in RecruitmentStatus::ALL {
        let section: Vec<_> = rows.iter().filter(|r| r.record.status == status).collect();
        if section.is_empty() {
            continue;
        }
        md.push_str(&format!("## {} ({})\n\n", status.label(), section.len()));
        md.push_str("| Name | Position | Applied | Employee | Actions |\n");
        md.push_str("|---|---|---|---|---|\n");
        for row in section {
            let r = row.record;
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                escape_cell(&r.full_name),
                escape_cell(&r.position),
                r.applied_at.format("%Y-%m-%d"),
                r.hired_employee_ref
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                actions_cell(&row.actions),
            ));
        }
        md.push('\n');
    }
    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
        .replace("\r\n", " ")
        .replace(&['\r', '\n'][..], " ")
}
