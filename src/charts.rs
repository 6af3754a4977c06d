//! Chart construction bound to rendered table regions.
//!
//! Charts are described first as a [`ChartPlan`] whose ranges come from a
//! [`TableRegion`] and are checked against the row count of the aggregated
//! table they summarize. Only a checked plan is turned into a chart.

use crate::aggregate::{EngineerRating, EngineerStatusMatrix, StatusSummary};
use crate::error::{ReportError, Result};
use crate::table::{CellRange, TableRegion};
use crate::theme::StatusPalette;
use crate::types::Status;
use rust_xlsxwriter::{
    Chart, ChartDataLabel, ChartLegendPosition, ChartPoint, ChartSolidFill, ChartType, Color,
    Worksheet,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Pie,
    Column,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataLabels {
    pub percentage: bool,
    pub category: bool,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPlan {
    pub name: String,
    pub categories: CellRange,
    pub values: CellRange,
    /// Whole-series fill.
    pub fill: Option<u32>,
    /// Per-point fills, one per category row.
    pub point_fills: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPlan {
    pub kind: ChartKind,
    pub title: String,
    /// Top-left cell the chart is anchored to.
    pub anchor: (u32, u16),
    pub series: Vec<SeriesPlan>,
    pub labels: DataLabels,
    pub legend_bottom: bool,
    pub style: Option<u8>,
}

impl ChartPlan {
    fn build(&self) -> Chart {
        let mut chart = Chart::new(match self.kind {
            ChartKind::Pie => ChartType::Pie,
            ChartKind::Column => ChartType::Column,
        });
        chart.title().set_name(self.title.as_str());

        let mut label = ChartDataLabel::new();
        if self.labels.percentage {
            label.show_percentage();
        }
        if self.labels.category {
            label.show_category_name();
        }
        if self.labels.value {
            label.show_value();
        }

        for s in &self.series {
            let series = chart.add_series();
            series
                .set_name(s.name.as_str())
                .set_categories(s.categories.as_chart_range())
                .set_values(s.values.as_chart_range())
                .set_data_label(&label);
            if let Some(fill) = s.fill {
                series.set_format(ChartSolidFill::new().set_color(Color::RGB(fill)));
            }
            if !s.point_fills.is_empty() {
                let points: Vec<ChartPoint> = s
                    .point_fills
                    .iter()
                    .map(|c| ChartPoint::new().set_format(ChartSolidFill::new().set_color(Color::RGB(*c))))
                    .collect();
                series.set_points(&points);
            }
        }

        if self.legend_bottom {
            chart.legend().set_position(ChartLegendPosition::Bottom);
        }
        if let Some(style) = self.style {
            chart.set_style(style);
        }
        chart
    }

    /// Data rows every series spans.
    pub fn category_rows(&self) -> usize {
        self.series.first().map(|s| s.categories.rows()).unwrap_or(0)
    }
}

/// Range of one table column, required to span exactly `expected` rows.
fn bound(region: &TableRegion, col: u16, expected: usize) -> Result<CellRange> {
    let range = region.column(col)?;
    if range.rows() != expected {
        return Err(ReportError::render(format!(
            "range {} spans {} rows but the table has {}",
            range.to_formula(),
            range.rows(),
            expected
        )));
    }
    Ok(range)
}

/// One slice per status row of the Resumen Estatus table.
pub fn status_pie(
    region: &TableRegion,
    summary: &StatusSummary,
    palette: &StatusPalette,
) -> Result<ChartPlan> {
    let categories = bound(region, 0, summary.len())?;
    let values = bound(region, 1, summary.len())?;
    Ok(ChartPlan {
        kind: ChartKind::Pie,
        title: "Estatus de Tickets".to_string(),
        anchor: (2, 3),
        series: vec![SeriesPlan {
            name: "Estatus".to_string(),
            categories,
            values,
            fill: None,
            point_fills: summary
                .entries()
                .iter()
                .map(|(s, _)| palette.color(*s))
                .collect(),
        }],
        labels: DataLabels {
            percentage: true,
            category: true,
            value: true,
        },
        legend_bottom: true,
        style: Some(10),
    })
}

/// One series per status over the engineer column of Resumen Ingenieros.
pub fn engineer_columns(
    region: &TableRegion,
    matrix: &EngineerStatusMatrix,
    palette: &StatusPalette,
) -> Result<ChartPlan> {
    let categories = bound(region, 0, matrix.len())?;
    let series = Status::ALL
        .iter()
        .enumerate()
        .map(|(i, status)| {
            Ok(SeriesPlan {
                name: status.label().to_string(),
                categories: categories.clone(),
                values: bound(region, i as u16 + 1, matrix.len())?,
                fill: Some(palette.color(*status)),
                point_fills: Vec::new(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(ChartPlan {
        kind: ChartKind::Column,
        title: "Estatus por Ingeniero".to_string(),
        anchor: (2, 6),
        series,
        labels: DataLabels {
            value: true,
            ..DataLabels::default()
        },
        legend_bottom: false,
        style: None,
    })
}

/// Single rating series over the Rating Ingenieros table.
pub fn rating_columns(region: &TableRegion, ratings: &[EngineerRating]) -> Result<ChartPlan> {
    Ok(ChartPlan {
        kind: ChartKind::Column,
        title: "Rating por Ingeniero".to_string(),
        anchor: (4, 4),
        series: vec![SeriesPlan {
            name: "Rating".to_string(),
            categories: bound(region, 0, ratings.len())?,
            values: bound(region, 1, ratings.len())?,
            fill: None,
            point_fills: Vec::new(),
        }],
        labels: DataLabels {
            value: true,
            ..DataLabels::default()
        },
        legend_bottom: false,
        style: None,
    })
}

pub fn insert_chart(ws: &mut Worksheet, plan: &ChartPlan) -> Result<()> {
    let chart = plan.build();
    ws.insert_chart(plan.anchor.0, plan.anchor.1, &chart)?;
    debug!(
        title = %plan.title,
        series = plan.series.len(),
        rows = plan.category_rows(),
        "inserted chart"
    );
    Ok(())
}
