use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::render::{MatchClass, RenderedTable};

pub struct ExportReport {
    pub rows: usize,
    pub columns: usize,
}

/// Writes the rendered table as shown: a "Query" sheet with the caption and a
/// "Recommendations" sheet with the header and one line per row.
pub fn export_results(path: &Path, table: &RenderedTable) -> Result<ExportReport> {
    let mut query_rows = vec![vec!["Field".to_string(), "Value".to_string()]];
    if let Some(caption) = &table.caption {
        query_rows.push(vec!["Club".to_string(), caption.club.clone()]);
        query_rows.push(vec!["Role".to_string(), caption.role.clone()]);
    }

    let mut header = table.header.clone();
    // The player cell carries two lines on screen; the sheet gives each its own column.
    if header.len() >= 2 {
        header.insert(2, "Age / Nation".to_string());
    }
    header.push("Match Class".to_string());
    header.push("Key Stat Name".to_string());

    let mut table_rows = vec![header];
    for row in &table.rows {
        let mut line = vec![
            row.rank.clone(),
            row.player_name.clone(),
            row.player_meta.clone(),
            row.squad.clone(),
            row.similarity.text.clone(),
            row.key_stat.value.clone(),
        ];
        line.extend(row.stats.iter().cloned());
        line.push(match_class_label(row.similarity.class).to_string());
        line.push(row.key_stat.caption.clone());
        table_rows.push(line);
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Query")?;
        write_rows(sheet, &query_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Recommendations")?;
        write_rows(sheet, &table_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        rows: table.rows.len(),
        columns: table.column_count(),
    })
}

pub fn export_path(dir: &Path, table: &RenderedTable, now: DateTime<Utc>) -> PathBuf {
    dir.join(export_file_name(table, now))
}

pub fn export_file_name(table: &RenderedTable, now: DateTime<Utc>) -> String {
    let (club, role) = table
        .caption
        .as_ref()
        .map(|c| (c.club.as_str(), c.role.as_str()))
        .unwrap_or(("results", "all"));
    format!(
        "scout_{}_{}_{}.xlsx",
        file_slug(club),
        file_slug(role),
        now.format("%Y%m%d_%H%M%S")
    )
}

pub fn match_class_label(class: MatchClass) -> &'static str {
    match class {
        MatchClass::High => "high",
        MatchClass::Mid => "mid",
    }
}

fn file_slug(raw: &str) -> String {
    let slug: String = raw
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() { "x".to_string() } else { slug }
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
