//! Xlsx workbook writer.
//!
//! One worksheet, a header row, one row per vacancy, and a native table
//! object with banded-row styling spanning the full range. Null fields stay
//! empty cells; salary bounds in particular must never render as zero.

use std::path::Path;

use chrono::{DateTime, FixedOffset};
use rust_xlsxwriter::{Table, TableColumn, TableStyle, Workbook, Worksheet};
use tracing::{debug, info};

use crate::{Salary, Vacancy};

use super::{ExportError, ExportResult};

/// Column captions, in their fixed order.
pub const COLUMN_HEADERS: [&str; 8] = [
    "Title",
    "Company",
    "Salary From",
    "Salary To",
    "Currency",
    "Region",
    "Published At",
    "URL",
];

/// Rendered in the Published At column when the raw timestamp is present
/// but unparsable.
pub const PUBLISHED_AT_FALLBACK: &str = "—";

const PUBLISHED_AT_FORMAT: &str = "%d.%m.%Y %H:%M";
const SHEET_NAME: &str = "Vacancies";
const TABLE_NAME: &str = "VacanciesTable";

/// Fixed projection of a [`Vacancy`] into the eight export columns.
///
/// Derived immediately before writing; `published_at` is already
/// display-formatted at this point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportRow {
    /// Vacancy title
    pub title: Option<String>,
    /// Employer name
    pub company: Option<String>,
    /// Salary lower bound
    pub salary_from: Option<i64>,
    /// Salary upper bound
    pub salary_to: Option<i64>,
    /// Salary currency code
    pub currency: Option<String>,
    /// Region name
    pub region: Option<String>,
    /// Display-formatted publish timestamp
    pub published_at: Option<String>,
    /// Canonical vacancy URL
    pub url: Option<String>,
}

impl ExportRow {
    /// Project one raw vacancy into the export schema.
    pub fn from_vacancy(vacancy: &Vacancy) -> Self {
        let salary: Option<&Salary> = vacancy.salary.as_ref();

        Self {
            title: vacancy.name.clone(),
            company: vacancy.employer.as_ref().and_then(|e| e.name.clone()),
            salary_from: salary.and_then(|s| s.from),
            salary_to: salary.and_then(|s| s.to),
            currency: salary.and_then(|s| s.currency.clone()),
            region: vacancy.area.as_ref().and_then(|a| a.name.clone()),
            published_at: vacancy.published_at.as_deref().map(format_published_at),
            url: vacancy.alternate_url.clone(),
        }
    }
}

/// Reformat a raw publish timestamp for display.
///
/// The API emits RFC3339 with a colon-less offset (`2024-05-01T10:00:00+0300`),
/// which `parse_from_rfc3339` rejects, so a `%z` fallback parse runs next.
/// Anything unparsable renders the [`PUBLISHED_AT_FALLBACK`] sentinel.
pub fn format_published_at(raw: &str) -> String {
    parse_api_timestamp(raw)
        .map(|dt| dt.format(PUBLISHED_AT_FORMAT).to_string())
        .unwrap_or_else(|| PUBLISHED_AT_FALLBACK.to_string())
}

fn parse_api_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .or_else(|| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z").ok())
}

/// Write the accumulated vacancies into a styled workbook at `path`.
///
/// The caller is expected to skip the export entirely for an empty run;
/// an empty slice here is a no-op rather than an empty file.
pub fn write_workbook(vacancies: &[Vacancy], path: &Path) -> ExportResult<()> {
    if vacancies.is_empty() {
        debug!("no rows to export; skipping workbook write");
        return Ok(());
    }

    info!(rows = vacancies.len(), path = %path.display(), "writing workbook");

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ExportError::Io(format!("failed to create {}: {e}", parent.display())))?;
        }
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .map_err(|e| ExportError::Workbook(e.to_string()))?;

    for (index, vacancy) in vacancies.iter().enumerate() {
        // Row 0 belongs to the table header.
        let row = (index + 1) as u32;
        write_row(worksheet, row, &ExportRow::from_vacancy(vacancy))?;
    }

    let columns: Vec<TableColumn> = COLUMN_HEADERS
        .iter()
        .map(|header| TableColumn::new().set_header(*header))
        .collect();
    let table = Table::new()
        .set_name(TABLE_NAME)
        .set_style(TableStyle::Medium9)
        .set_banded_rows(true)
        .set_columns(&columns);

    let last_row = vacancies.len() as u32;
    let last_col = (COLUMN_HEADERS.len() - 1) as u16;
    worksheet
        .add_table(0, 0, last_row, last_col, &table)
        .map_err(|e| ExportError::Workbook(e.to_string()))?;

    workbook
        .save(path)
        .map_err(|e| ExportError::Io(e.to_string()))?;

    Ok(())
}

fn write_row(worksheet: &mut Worksheet, row: u32, data: &ExportRow) -> ExportResult<()> {
    write_text(worksheet, row, 0, data.title.as_deref())?;
    write_text(worksheet, row, 1, data.company.as_deref())?;
    write_amount(worksheet, row, 2, data.salary_from)?;
    write_amount(worksheet, row, 3, data.salary_to)?;
    write_text(worksheet, row, 4, data.currency.as_deref())?;
    write_text(worksheet, row, 5, data.region.as_deref())?;
    write_text(worksheet, row, 6, data.published_at.as_deref())?;
    write_text(worksheet, row, 7, data.url.as_deref())?;
    Ok(())
}

fn write_text(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<&str>,
) -> ExportResult<()> {
    if let Some(value) = value {
        worksheet
            .write_string(row, col, value)
            .map_err(|e| ExportError::Workbook(e.to_string()))?;
    }
    Ok(())
}

fn write_amount(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<i64>,
) -> ExportResult<()> {
    if let Some(value) = value {
        worksheet
            .write_number(row, col, value as f64)
            .map_err(|e| ExportError::Workbook(e.to_string()))?;
    }
    Ok(())
}
