//! Workbook repository for the local draw history

use calamine::{open_workbook, Data, DataType, Range, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::schema::{
    apply_layout, cell_format, header_row, BLUE_COLUMN, CODE_COLUMN, DATE_COLUMN, RED_COLUMNS,
};
use crate::error::{Result, SyncError};
use crate::scraper::parsers::DrawParser;
use crate::types::{format_ball, DrawRecord, RawDraw, SOURCE_DATE_FORMAT};

/// Repository for the draw history workbook
pub struct DrawRepository {
    path: PathBuf,
    sheet_name: String,
}

impl DrawRepository {
    pub fn new(path: impl Into<PathBuf>, sheet_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet_name: sheet_name.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    // ==================== Read ====================

    /// Load all draws; a missing workbook is an empty dataset
    pub fn load(&self) -> Result<Vec<DrawRecord>> {
        if !self.exists() {
            debug!("No workbook at {}", self.path.display());
            return Ok(Vec::new());
        }

        let mut workbook: Xlsx<_> = open_workbook(&self.path)?;
        let sheet_names = workbook.sheet_names();

        // Fall back to the first sheet for files with a different sheet name
        let sheet = if sheet_names.iter().any(|name| name == &self.sheet_name) {
            self.sheet_name.clone()
        } else {
            sheet_names
                .first()
                .cloned()
                .ok_or_else(|| SyncError::InvalidSheet("workbook has no sheets".to_string()))?
        };

        let range = workbook.worksheet_range(&sheet)?;
        let records = Self::parse_range(&range)?;
        debug!("Loaded {} draws from sheet '{}'", records.len(), sheet);

        Ok(records)
    }

    fn parse_range(range: &Range<Data>) -> Result<Vec<DrawRecord>> {
        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            return Ok(Vec::new());
        };
        let columns = ColumnIndex::from_header(header)?;

        let mut records = Vec::new();
        for (offset, row) in rows.enumerate() {
            if row.iter().all(|cell| cell_text(cell).is_empty()) {
                continue;
            }

            // 1-based sheet row number, header is row 1
            let row_no = offset + 2;
            let record = DrawParser::parse(&columns.raw_draw(row))
                .map_err(|e| SyncError::InvalidSheet(format!("row {}: {}", row_no, e)))?;
            records.push(record);
        }

        Ok(records)
    }

    // ==================== Write ====================

    /// Rewrite the whole workbook with `records` in the given order
    ///
    /// Writes to a sibling temporary file first and renames it over the target.
    pub fn save(&self, records: &[DrawRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;
        apply_layout(worksheet)?;

        let format = cell_format();
        for (col, title) in header_row().into_iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, title, &format)?;
        }

        for (index, record) in records.iter().enumerate() {
            let row = (index + 1) as u32;
            for (col, value) in row_values(record).into_iter().enumerate() {
                worksheet.write_string_with_format(row, col as u16, value, &format)?;
            }
        }

        let tmp_path = self.path.with_extension("xlsx.tmp");
        let written = workbook
            .save(&tmp_path)
            .map_err(SyncError::from)
            .and_then(|()| std::fs::rename(&tmp_path, &self.path).map_err(SyncError::from));
        if written.is_err() {
            // Best effort, the original error is what gets reported
            let _ = std::fs::remove_file(&tmp_path);
        }
        written?;

        debug!("Wrote {} draws to {}", records.len(), self.path.display());
        Ok(())
    }
}

/// Cell values of one record in header order
fn row_values(record: &DrawRecord) -> Vec<String> {
    let mut values = Vec::with_capacity(9);
    values.push(record.code.to_string());
    values.push(record.date_display());
    values.extend(record.red.iter().map(|n| format_ball(*n)));
    values.push(format_ball(record.blue));
    values
}

/// Positions of the draw columns, located by header name
struct ColumnIndex {
    code: usize,
    date: usize,
    red: [usize; 6],
    blue: usize,
}

impl ColumnIndex {
    fn from_header(header: &[Data]) -> Result<Self> {
        let find = |name: &str| {
            header
                .iter()
                .position(|cell| cell_text(cell) == name)
                .ok_or_else(|| SyncError::InvalidSheet(format!("missing column '{}'", name)))
        };

        let code = find(CODE_COLUMN)?;
        let date = find(DATE_COLUMN)?;
        let mut red = [0usize; 6];
        for (slot, name) in red.iter_mut().zip(RED_COLUMNS) {
            *slot = find(name)?;
        }
        let blue = find(BLUE_COLUMN)?;

        Ok(Self {
            code,
            date,
            red,
            blue,
        })
    }

    /// Rebuild the source-shaped entry so sheet rows get the same validation
    fn raw_draw(&self, row: &[Data]) -> RawDraw {
        let text = |index: usize| row.get(index).map(cell_text).unwrap_or_default();

        RawDraw {
            code: text(self.code),
            red: self
                .red
                .iter()
                .map(|&index| text(index))
                .collect::<Vec<_>>()
                .join(","),
            blue: text(self.blue),
            date: row.get(self.date).map(cell_date_text).unwrap_or_default(),
        }
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

fn cell_date_text(cell: &Data) -> String {
    match cell {
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map(|d| d.format(SOURCE_DATE_FORMAT).to_string())
            .unwrap_or_default(),
        other => cell_text(other),
    }
}
