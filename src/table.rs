//! Generic styled table writer.
//!
//! Any rectangular dataset goes through [`render_table`]: a dark header band,
//! zebra-striped body rows, an autofilter over the written block and columns
//! sized from their contents. The returned [`TableRegion`] is the only source
//! chart ranges are computed from.

use crate::error::{ReportError, Result};
use crate::theme::ReportTheme;
use chrono::{Datelike, NaiveDateTime, Timelike};
use rust_xlsxwriter::{Color, ExcelDateTime, Format, FormatAlign, FormatBorder, Worksheet, XlsxError};
use tracing::debug;

const DATETIME_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
const DECIMAL_NUM_FORMAT: &str = "0.00";
const DATETIME_WIDTH: usize = 19;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(u64),
    Decimal(f64),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Characters the value occupies once rendered.
    fn display_width(&self) -> usize {
        match self {
            CellValue::Text(s) => s.chars().count(),
            CellValue::Integer(n) => n.to_string().len(),
            CellValue::Decimal(f) => format!("{:.2}", f).len(),
            CellValue::DateTime(_) => DATETIME_WIDTH,
        }
    }
}

/// A typed row that knows its column headers.
pub trait SheetRow {
    fn headers() -> Vec<String>;
    fn cells(&self) -> Vec<CellValue>;
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn from_rows<T: SheetRow>(rows: &[T]) -> Table {
        Table {
            columns: T::headers(),
            rows: rows.iter().map(SheetRow::cells).collect(),
        }
    }

    fn check_shape(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(ReportError::render("table has no columns"));
        }
        if let Some((idx, row)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != self.columns.len())
        {
            return Err(ReportError::render(format!(
                "row {} has {} cells, expected {}",
                idx,
                row.len(),
                self.columns.len()
            )));
        }
        Ok(())
    }
}

/// A single-column block of cells on a named sheet, zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    pub sheet: String,
    pub first_row: u32,
    pub last_row: u32,
    pub col: u16,
}

impl CellRange {
    pub fn new(sheet: impl Into<String>, first_row: u32, last_row: u32, col: u16) -> Self {
        Self {
            sheet: sheet.into(),
            first_row,
            last_row,
            col,
        }
    }

    /// Cells covered; an inverted range covers none.
    pub fn rows(&self) -> usize {
        self.last_row
            .checked_sub(self.first_row)
            .map_or(0, |span| span as usize + 1)
    }

    /// Absolute A1 reference, e.g. `='Resumen Estatus'!$A$3:$A$5`.
    pub fn to_formula(&self) -> String {
        let col = column_letter(self.col);
        format!(
            "='{}'!${}${}:${}${}",
            self.sheet.replace('\'', "''"),
            col,
            self.first_row + 1,
            col,
            self.last_row + 1
        )
    }

    pub fn as_chart_range(&self) -> (&str, u32, u16, u32, u16) {
        (
            self.sheet.as_str(),
            self.first_row,
            self.col,
            self.last_row,
            self.col,
        )
    }
}

pub fn column_letter(col: u16) -> String {
    let mut n = col as u32 + 1;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.iter().rev().map(|b| *b as char).collect()
}

/// Where a table landed on its sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRegion {
    pub sheet: String,
    pub header_row: u32,
    pub columns: u16,
    pub rows: usize,
}

impl TableRegion {
    pub fn first_data_row(&self) -> u32 {
        self.header_row + 1
    }

    /// Body cells of one column; fails when the table has no body rows.
    pub fn column(&self, col: u16) -> Result<CellRange> {
        if col >= self.columns {
            return Err(ReportError::render(format!(
                "column {} outside table on '{}' ({} columns)",
                col, self.sheet, self.columns
            )));
        }
        if self.rows == 0 {
            return Err(ReportError::render(format!(
                "table on '{}' has no data rows",
                self.sheet
            )));
        }
        let first = self.first_data_row();
        Ok(CellRange::new(
            self.sheet.clone(),
            first,
            first + self.rows as u32 - 1,
            col,
        ))
    }
}

/// Column width: the header plus padding, or the widest value plus two.
fn column_width(header: &str, widest: usize, padding: usize) -> usize {
    (header.chars().count() + padding).max(widest + 2)
}

/// `(first_row, first_col, last_row, last_col)` covering header and body.
fn autofilter_bounds(table: &Table) -> (u32, u16, u32, u16) {
    (0, 0, table.rows.len() as u32, (table.columns.len() - 1) as u16)
}

struct TableFormats {
    header: Format,
    // Indexed by [shaded][kind]: text/integer, decimal, datetime.
    body: [[Format; 3]; 2],
}

impl TableFormats {
    fn new(theme: &ReportTheme) -> Self {
        let header = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(theme.table_header))
            .set_font_color(Color::White)
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::Center);
        let base = |shaded: bool| {
            let f = Format::new()
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center);
            if shaded {
                f.set_background_color(Color::RGB(theme.table_zebra))
            } else {
                f
            }
        };
        let body = [false, true].map(|shaded| {
            [
                base(shaded),
                base(shaded).set_num_format(DECIMAL_NUM_FORMAT),
                base(shaded).set_num_format(DATETIME_NUM_FORMAT),
            ]
        });
        Self { header, body }
    }

    fn body(&self, body_row: usize, value: &CellValue) -> &Format {
        // Even body rows carry the shading.
        let shaded = &self.body[usize::from(body_row % 2 == 0)];
        match value {
            CellValue::Text(_) | CellValue::Integer(_) => &shaded[0],
            CellValue::Decimal(_) => &shaded[1],
            CellValue::DateTime(_) => &shaded[2],
        }
    }
}

fn excel_datetime(dt: &NaiveDateTime) -> std::result::Result<ExcelDateTime, XlsxError> {
    let secs = (dt.second() as f64 + dt.nanosecond() as f64 / 1e9).min(59.999);
    ExcelDateTime::from_ymd(dt.year() as u16, dt.month() as u8, dt.day() as u8)?.and_hms(
        dt.hour() as u16,
        dt.minute() as u8,
        secs,
    )
}

fn write_cell(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    format: &Format,
) -> std::result::Result<(), XlsxError> {
    match value {
        CellValue::Text(s) => {
            ws.write_string_with_format(row, col, s.as_str(), format)?;
        }
        CellValue::Integer(n) => {
            ws.write_number_with_format(row, col, *n as f64, format)?;
        }
        CellValue::Decimal(f) => {
            ws.write_number_with_format(row, col, *f, format)?;
        }
        CellValue::DateTime(dt) => {
            let dt = excel_datetime(dt)?;
            ws.write_with_format(row, col, &dt, format)?;
        }
    }
    Ok(())
}

/// Write `table` at the top-left corner of `ws` in the shared table style.
pub fn render_table(ws: &mut Worksheet, table: &Table, theme: &ReportTheme) -> Result<TableRegion> {
    table.check_shape()?;
    let formats = TableFormats::new(theme);

    for (col, name) in table.columns.iter().enumerate() {
        ws.write_string_with_format(0, col as u16, name.as_str(), &formats.header)?;
    }

    for (body_row, row) in table.rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            write_cell(
                ws,
                body_row as u32 + 1,
                col as u16,
                value,
                formats.body(body_row, value),
            )?;
        }
    }

    let (first_row, first_col, last_row, last_col) = autofilter_bounds(table);
    ws.autofilter(first_row, first_col, last_row, last_col)?;

    for (col, name) in table.columns.iter().enumerate() {
        let widest = table
            .rows
            .iter()
            .map(|r| r[col].display_width())
            .max()
            .unwrap_or(0);
        let width = column_width(name, widest, theme.column_padding);
        ws.set_column_width(col as u16, width as f64)?;
    }

    let region = TableRegion {
        sheet: ws.name(),
        header_row: 0,
        columns: table.columns.len() as u16,
        rows: table.rows.len(),
    };
    debug!(sheet = %region.sheet, rows = region.rows, "rendered table");
    Ok(region)
}
