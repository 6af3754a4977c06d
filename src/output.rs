use crate::emit::ReportFile;
use crate::types::ReportSummary;
use crate::Report;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Persist a report under `dir` using its suggested file name.
pub fn write_report(dir: &Path, report: &ReportFile) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&report.file_name);
    std::fs::write(&path, &report.bytes)?;
    Ok(path)
}

/// JSON summary of a report. `generated_at` is the instant stamped into
/// the workbook file name.
pub fn report_summary(report: &Report) -> ReportSummary {
    let agg = &report.aggregates;
    let top = agg.top_engineer();
    ReportSummary {
        file_name: report.file.file_name.clone(),
        generated_at: report.file.generated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        total_tickets: agg.total,
        status_counts: agg.status_summary.rows(),
        engineers: agg.engineer_matrix.table_rows(),
        top_engineer: top.map(|r| r.engineer.clone()),
        top_rating: top.map(|r| r.score()),
    }
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}
