//! Builders for the five report sheets.

use crate::aggregate::{Aggregates, EngineerRating, StatusSummary};
use crate::charts::{self, ChartPlan};
use crate::error::{ReportError, Result};
use crate::table::{render_table, CellValue, SheetRow, Table, TableRegion};
use crate::theme::ReportTheme;
use crate::types::{EngineerStatusRow, Status, TicketRecord};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::debug;

pub const TICKETS_SHEET: &str = "Tickets";
pub const STATUS_SHEET: &str = "Resumen Estatus";
pub const ENGINEERS_SHEET: &str = "Resumen Ingenieros";
pub const DASHBOARD_SHEET: &str = "Dashboard";
pub const RATING_SHEET: &str = "Rating Ingenieros";

/// Sheet order in the emitted workbook.
pub const SHEET_ORDER: [&str; 5] = [
    TICKETS_SHEET,
    STATUS_SHEET,
    ENGINEERS_SHEET,
    DASHBOARD_SHEET,
    RATING_SHEET,
];

impl SheetRow for TicketRecord {
    fn headers() -> Vec<String> {
        ["ticket_id", "date", "status", "engineer"]
            .map(String::from)
            .to_vec()
    }

    fn cells(&self) -> Vec<CellValue> {
        vec![
            CellValue::Integer(self.ticket_id),
            CellValue::DateTime(self.date),
            CellValue::Text(self.status.label().to_string()),
            CellValue::Text(self.engineer.clone()),
        ]
    }
}

impl SheetRow for EngineerStatusRow {
    fn headers() -> Vec<String> {
        let mut headers = vec!["engineer".to_string()];
        headers.extend(Status::ALL.iter().map(|s| s.label().to_string()));
        headers
    }

    fn cells(&self) -> Vec<CellValue> {
        vec![
            CellValue::Text(self.engineer.clone()),
            CellValue::Integer(self.open as u64),
            CellValue::Integer(self.in_progress as u64),
            CellValue::Integer(self.closed as u64),
        ]
    }
}

impl SheetRow for EngineerRating {
    fn headers() -> Vec<String> {
        vec!["Ingeniero".to_string(), "Rating Promedio".to_string()]
    }

    fn cells(&self) -> Vec<CellValue> {
        vec![
            CellValue::Text(self.engineer.clone()),
            CellValue::Decimal(self.score()),
        ]
    }
}

/// Headline numbers shown on the Dashboard sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardCards {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub closed: usize,
}

impl DashboardCards {
    fn from_summary(total: usize, summary: &StatusSummary) -> Self {
        Self {
            total,
            open: summary.count(Status::Open),
            in_progress: summary.count(Status::InProgress),
            closed: summary.count(Status::Closed),
        }
    }
}

/// Where everything landed, for callers that need to inspect the layout.
#[derive(Debug, Clone)]
pub struct WorkbookLayout {
    pub sheets: Vec<String>,
    pub tickets: TableRegion,
    pub status: TableRegion,
    pub engineers: TableRegion,
    pub ratings: TableRegion,
    pub dashboard: DashboardCards,
    /// `(sheet name, chart)` in insertion order.
    pub charts: Vec<(String, ChartPlan)>,
}

impl WorkbookLayout {
    pub fn chart(&self, sheet: &str) -> Option<&ChartPlan> {
        self.charts
            .iter()
            .find(|(name, _)| name == sheet)
            .map(|(_, plan)| plan)
    }
}

fn named_sheet(name: &str) -> Result<Worksheet> {
    let mut ws = Worksheet::new();
    ws.set_name(name)?;
    Ok(ws)
}

pub fn tickets_sheet(tickets: &[TicketRecord], theme: &ReportTheme) -> Result<(Worksheet, TableRegion)> {
    let mut ws = named_sheet(TICKETS_SHEET)?;
    let region = render_table(&mut ws, &Table::from_rows(tickets), theme)?;
    Ok((ws, region))
}

/// Bespoke two-column layout: title banner, header, one colored row per status.
pub fn status_sheet(
    summary: &StatusSummary,
    theme: &ReportTheme,
) -> Result<(Worksheet, TableRegion, ChartPlan)> {
    let mut ws = named_sheet(STATUS_SHEET)?;
    ws.set_tab_color(Color::RGB(theme.summary_tab));
    ws.set_default_row_height(20.0);
    ws.set_column_width(0, 20.0)?;
    ws.set_column_width(1, 20.0)?;

    let title = Format::new()
        .set_bold()
        .set_font_size(18)
        .set_align(FormatAlign::Center)
        .set_background_color(Color::RGB(theme.summary_title))
        .set_border(FormatBorder::Medium);
    let header = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin)
        .set_background_color(Color::RGB(theme.summary_header));

    ws.merge_range(0, 0, 0, 1, "📌 Resumen por Estatus", &title)?;
    ws.write_string_with_format(1, 0, "Estatus", &header)?;
    ws.write_string_with_format(1, 1, "Cantidad", &header)?;

    for (i, (status, count)) in summary.entries().iter().enumerate() {
        let row = 2 + i as u32;
        let style = Format::new()
            .set_align(FormatAlign::Center)
            .set_border(FormatBorder::Thin)
            .set_background_color(Color::RGB(theme.status.color(*status)))
            .set_bold();
        ws.write_string_with_format(row, 0, status.label(), &style)?;
        ws.write_number_with_format(row, 1, *count as f64, &style)?;
    }

    let region = TableRegion {
        sheet: STATUS_SHEET.to_string(),
        header_row: 1,
        columns: 2,
        rows: summary.len(),
    };
    let plan = charts::status_pie(&region, summary, &theme.status)?;
    charts::insert_chart(&mut ws, &plan)?;
    Ok((ws, region, plan))
}

pub fn engineers_sheet(
    agg: &Aggregates,
    theme: &ReportTheme,
) -> Result<(Worksheet, TableRegion, ChartPlan)> {
    let mut ws = named_sheet(ENGINEERS_SHEET)?;
    let table = Table::from_rows(&agg.engineer_matrix.table_rows());
    let region = render_table(&mut ws, &table, theme)?;
    let plan = charts::engineer_columns(&region, &agg.engineer_matrix, &theme.status)?;
    charts::insert_chart(&mut ws, &plan)?;
    Ok((ws, region, plan))
}

pub fn dashboard_sheet(agg: &Aggregates, theme: &ReportTheme) -> Result<(Worksheet, DashboardCards)> {
    let mut ws = named_sheet(DASHBOARD_SHEET)?;
    let cards = DashboardCards::from_summary(agg.total, &agg.status_summary);

    let title = Format::new().set_bold().set_font_size(22);
    ws.write_string_with_format(0, 0, "📊 Dashboard Ejecutivo de Tickets", &title)?;

    let layout: [(u32, u16, String, Option<u32>); 4] = [
        (2, 0, format!("Total: {}", cards.total), None),
        (
            2,
            4,
            format!("Abiertos: {}", cards.open),
            Some(theme.status.color(Status::Open)),
        ),
        (
            6,
            0,
            format!("En Proceso: {}", cards.in_progress),
            Some(theme.status.color(Status::InProgress)),
        ),
        (
            6,
            4,
            format!("Cerrados: {}", cards.closed),
            Some(theme.status.color(Status::Closed)),
        ),
    ];
    for (row, col, text, fill) in layout {
        let mut card = Format::new()
            .set_bold()
            .set_font_size(18)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Medium);
        if let Some(fill) = fill {
            card = card.set_background_color(Color::RGB(fill));
        }
        ws.merge_range(row, col, row + 2, col + 2, &text, &card)?;
    }
    Ok((ws, cards))
}

pub fn rating_sheet(
    agg: &Aggregates,
    theme: &ReportTheme,
) -> Result<(Worksheet, TableRegion, ChartPlan)> {
    let mut ws = named_sheet(RATING_SHEET)?;
    let region = render_table(&mut ws, &Table::from_rows(&agg.ratings), theme)?;

    let top = agg
        .top_engineer()
        .ok_or_else(|| ReportError::render("no engineer ratings to highlight"))?;
    let highlight = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(theme.callout))
        .set_border(FormatBorder::Thin);
    let callout = format!("{} ({})", top.engineer, top.display_score());
    ws.write_string_with_format(1, 4, "🏆 Mejor Ingeniero:", &highlight)?;
    ws.write_string_with_format(1, 5, callout.as_str(), &highlight)?;
    ws.set_column_width(4, 20.0)?;
    ws.set_column_width(5, (callout.chars().count() + 2).max(12) as f64)?;

    let plan = charts::rating_columns(&region, &agg.ratings)?;
    charts::insert_chart(&mut ws, &plan)?;
    Ok((ws, region, plan))
}

/// Build all five sheets, in order, from one set of aggregates.
pub fn compose_workbook(
    tickets: &[TicketRecord],
    agg: &Aggregates,
    theme: &ReportTheme,
) -> Result<(Workbook, WorkbookLayout)> {
    if tickets.len() != agg.total {
        return Err(ReportError::render(format!(
            "aggregates cover {} tickets but {} were supplied",
            agg.total,
            tickets.len()
        )));
    }

    let (ws_tickets, tickets_region) = tickets_sheet(tickets, theme)?;
    let (ws_status, status_region, pie) = status_sheet(&agg.status_summary, theme)?;
    let (ws_engineers, engineers_region, grouped) = engineers_sheet(agg, theme)?;
    let (ws_dashboard, dashboard) = dashboard_sheet(agg, theme)?;
    let (ws_rating, ratings_region, rating_chart) = rating_sheet(agg, theme)?;

    let mut workbook = Workbook::new();
    for ws in [ws_tickets, ws_status, ws_engineers, ws_dashboard, ws_rating] {
        workbook.push_worksheet(ws);
    }
    debug!(sheets = SHEET_ORDER.len(), "composed workbook");

    let layout = WorkbookLayout {
        sheets: SHEET_ORDER.iter().map(|s| s.to_string()).collect(),
        tickets: tickets_region,
        status: status_region,
        engineers: engineers_region,
        ratings: ratings_region,
        dashboard,
        charts: vec![
            (STATUS_SHEET.to_string(), pie),
            (ENGINEERS_SHEET.to_string(), grouped),
            (RATING_SHEET.to_string(), rating_chart),
        ],
    };
    Ok((workbook, layout))
}
