use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime};
use std::io::Cursor;
use ticket_report::sheets::{
    DASHBOARD_SHEET, ENGINEERS_SHEET, RATING_SHEET, SHEET_ORDER, STATUS_SHEET, TICKETS_SHEET,
};
use ticket_report::types::RawValue;
use ticket_report::{
    build_report, generate_report, generate_report_at, RawTicket, Report, ReportError,
    ReportTheme, Status, TicketRecord,
};

const ENGINEERS: [&str; 4] = ["Marco Antonio", "Carlos Pérez", "Ana López", "Luis García"];

fn generated_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 4, 2)
        .and_then(|d| d.and_hms_opt(16, 20, 5))
        .unwrap()
}

fn ticket(id: u64, status: Status, engineer: &str) -> TicketRecord {
    TicketRecord {
        ticket_id: id,
        date: NaiveDate::from_ymd_opt(2025, 3, 20)
            .and_then(|d| d.and_hms_opt(8, 30, 0))
            .unwrap()
            + chrono::Duration::hours(id as i64),
        status,
        engineer: engineer.to_string(),
    }
}

/// 250 tickets over four engineers with every status present.
fn mixed_tickets() -> Vec<TicketRecord> {
    (0..250u64)
        .map(|i| {
            let status = Status::ALL[((i / 4) % 3) as usize];
            ticket(i + 1, status, ENGINEERS[(i % 4) as usize])
        })
        .collect()
}

fn build(tickets: &[TicketRecord]) -> Report {
    build_report(tickets, &ReportTheme::DEFAULT, generated_at()).unwrap()
}

fn open(bytes: &[u8]) -> Xlsx<Cursor<Vec<u8>>> {
    open_workbook_from_rs(Cursor::new(bytes.to_vec())).unwrap()
}

fn sheet(bytes: &[u8], name: &str) -> Range<Data> {
    open(bytes).worksheet_range(name).unwrap()
}

fn text(range: &Range<Data>, row: u32, col: u32) -> String {
    match range.get_value((row, col)) {
        Some(Data::String(s)) => s.clone(),
        other => panic!("expected text at ({}, {}), got {:?}", row, col, other),
    }
}

fn number(range: &Range<Data>, row: u32, col: u32) -> f64 {
    match range.get_value((row, col)) {
        Some(Data::Float(f)) => *f,
        Some(Data::Int(i)) => *i as f64,
        other => panic!("expected number at ({}, {}), got {:?}", row, col, other),
    }
}

#[test]
fn test_sheets_in_order() {
    let report = build(&mixed_tickets());
    let names = open(&report.file.bytes).sheet_names();
    assert_eq!(names, SHEET_ORDER.to_vec());
    assert_eq!(report.file.file_name, "Reporte_Tickets_20250402_162005.xlsx");
}

#[test]
fn test_single_engineer_scenario() {
    let tickets = vec![
        ticket(1, Status::Open, "A"),
        ticket(2, Status::Open, "A"),
        ticket(3, Status::Closed, "A"),
    ];
    let report = build(&tickets);
    let bytes = &report.file.bytes;

    let status = sheet(bytes, STATUS_SHEET);
    assert_eq!(text(&status, 1, 0), "Estatus");
    assert_eq!(text(&status, 2, 0), "Abierto");
    assert_eq!(number(&status, 2, 1), 2.0);
    assert_eq!(text(&status, 3, 0), "Cerrado");
    assert_eq!(number(&status, 3, 1), 1.0);
    assert!(status.get_value((4, 0)).map_or(true, |v| *v == Data::Empty));

    let engineers = sheet(bytes, ENGINEERS_SHEET);
    assert_eq!(text(&engineers, 1, 0), "A");
    assert_eq!(
        (number(&engineers, 1, 1), number(&engineers, 1, 2), number(&engineers, 1, 3)),
        (2.0, 0.0, 1.0)
    );

    let rating = sheet(bytes, RATING_SHEET);
    assert_eq!(text(&rating, 1, 0), "A");
    assert_eq!(number(&rating, 1, 1), 2.33);
    assert_eq!(text(&rating, 1, 5), "A (2.33)");

    let pie = report.layout.chart(STATUS_SHEET).unwrap();
    assert_eq!(pie.series[0].values.to_formula(), "='Resumen Estatus'!$B$3:$B$4");
}

#[test]
fn test_perfect_engineer_ranked_first() {
    let tickets = vec![
        ticket(1, Status::InProgress, "A"),
        ticket(2, Status::Closed, "B"),
        ticket(3, Status::Closed, "B"),
    ];
    let report = build(&tickets);
    let rating = sheet(&report.file.bytes, RATING_SHEET);
    assert_eq!(text(&rating, 1, 0), "B");
    assert_eq!(number(&rating, 1, 1), 5.0);
    assert_eq!(text(&rating, 2, 0), "A");
    assert_eq!(number(&rating, 2, 1), 3.0);
    assert_eq!(text(&rating, 1, 5), "B (5.00)");
}

#[test]
fn test_large_mixed_scenario() {
    let tickets = mixed_tickets();
    let report = build(&tickets);
    let bytes = &report.file.bytes;

    let dashboard = sheet(bytes, DASHBOARD_SHEET);
    assert_eq!(text(&dashboard, 2, 0), "Total: 250");
    let agg = &report.aggregates;
    assert_eq!(
        text(&dashboard, 2, 4),
        format!("Abiertos: {}", agg.status_summary.count(Status::Open))
    );
    assert_eq!(
        text(&dashboard, 6, 0),
        format!("En Proceso: {}", agg.status_summary.count(Status::InProgress))
    );
    assert_eq!(
        text(&dashboard, 6, 4),
        format!("Cerrados: {}", agg.status_summary.count(Status::Closed))
    );

    // Pie: three slices whose bound cells add up to the ticket count.
    let pie = report.layout.chart(STATUS_SHEET).unwrap();
    let values = &pie.series[0].values;
    assert_eq!(values.rows(), 3);
    assert_eq!(pie.series[0].point_fills.len(), 3);
    let status = sheet(bytes, STATUS_SHEET);
    let slice_total: f64 = (values.first_row..=values.last_row)
        .map(|r| number(&status, r, values.col as u32))
        .sum();
    assert_eq!(slice_total, 250.0);

    // Grouped columns: one category row per engineer.
    let grouped = report.layout.chart(ENGINEERS_SHEET).unwrap();
    assert_eq!(grouped.series.len(), 3);
    for s in &grouped.series {
        assert_eq!(s.categories.rows(), 4);
        assert_eq!(s.values.rows(), 4);
    }

    let rating = report.layout.chart(RATING_SHEET).unwrap();
    assert_eq!(rating.category_rows(), 4);
    assert_eq!(report.layout.tickets.rows, 250);
}

#[test]
fn test_chart_ranges_track_input_size() {
    for n in [1usize, 2, 7, 40] {
        let tickets: Vec<TicketRecord> = (0..n as u64)
            .map(|i| ticket(i + 1, Status::ALL[(i % 3) as usize], &format!("eng-{:02}", i)))
            .collect();
        let report = build(&tickets);
        let expected_status_rows = n.min(3);
        let pie = report.layout.chart(STATUS_SHEET).unwrap();
        assert_eq!(pie.category_rows(), expected_status_rows);
        assert_eq!(pie.series[0].categories.first_row, 2);
        assert_eq!(
            pie.series[0].categories.last_row,
            2 + expected_status_rows as u32 - 1
        );
        for plan in [
            report.layout.chart(ENGINEERS_SHEET).unwrap(),
            report.layout.chart(RATING_SHEET).unwrap(),
        ] {
            for s in &plan.series {
                assert_eq!(s.categories.rows(), n);
                assert_eq!(s.values.rows(), n);
                assert_eq!(s.values.last_row, n as u32);
            }
        }
    }
}

#[test]
fn test_round_trip_matches_aggregates() {
    let tickets = mixed_tickets();
    let report = build(&tickets);
    let bytes = &report.file.bytes;
    let agg = &report.aggregates;

    let status = sheet(bytes, STATUS_SHEET);
    for (i, (s, count)) in agg.status_summary.entries().iter().enumerate() {
        let row = 2 + i as u32;
        assert_eq!(text(&status, row, 0), s.label());
        assert_eq!(number(&status, row, 1), *count as f64);
    }

    let engineers = sheet(bytes, ENGINEERS_SHEET);
    assert_eq!(text(&engineers, 0, 0), "engineer");
    assert_eq!(text(&engineers, 0, 2), "En proceso");
    for (i, row) in agg.engineer_matrix.table_rows().iter().enumerate() {
        let r = 1 + i as u32;
        assert_eq!(text(&engineers, r, 0), row.engineer);
        assert_eq!(number(&engineers, r, 1), row.open as f64);
        assert_eq!(number(&engineers, r, 2), row.in_progress as f64);
        assert_eq!(number(&engineers, r, 3), row.closed as f64);
    }

    let rating = sheet(bytes, RATING_SHEET);
    assert_eq!(text(&rating, 0, 1), "Rating Promedio");
    for (i, r) in agg.ratings.iter().enumerate() {
        let row = 1 + i as u32;
        assert_eq!(text(&rating, row, 0), r.engineer);
        assert_eq!(number(&rating, row, 1), r.score());
    }

    let raw = sheet(bytes, TICKETS_SHEET);
    assert_eq!(text(&raw, 0, 1), "date");
    for (i, t) in tickets.iter().enumerate() {
        let row = 1 + i as u32;
        assert_eq!(number(&raw, row, 0), t.ticket_id as f64);
        assert!(matches!(raw.get_value((row, 1)), Some(Data::DateTime(_))));
        assert_eq!(text(&raw, row, 2), t.status.label());
        assert_eq!(text(&raw, row, 3), t.engineer);
    }
}

fn raw(id: i64, status: &str, engineer: &str) -> RawTicket {
    RawTicket {
        ticket_id: Some(RawValue::Int(id)),
        date: Some(RawValue::Text("2025-03-01 10:00:00".into())),
        status: Some(RawValue::Text(status.into())),
        engineer: Some(RawValue::Text(engineer.into())),
    }
}

#[test]
fn test_generate_report_from_raw_rows() {
    let file = generate_report(&[raw(1, "Abierto", "Ana"), raw(2, "Closed", "Luis")]).unwrap();
    assert!(file.file_name.starts_with("Reporte_Tickets_"));
    assert!(file.file_name.ends_with(".xlsx"));
    assert_eq!(&file.bytes[..2], b"PK");
}

#[test]
fn test_empty_input_fails() {
    let err = generate_report(&[]).unwrap_err();
    assert!(matches!(err, ReportError::EmptyDataset));
    assert!(err.is_recoverable());

    let err = generate_report_at(&[], &ReportTheme::DEFAULT, generated_at()).unwrap_err();
    assert!(matches!(err, ReportError::EmptyDataset));
}

#[test]
fn test_unknown_status_fails() {
    let err = generate_report(&[raw(1, "Open", "Ana"), raw(2, "Unknown", "Ana")]).unwrap_err();
    assert!(matches!(
        err,
        ReportError::Validation {
            index: 1,
            field: "status",
            ..
        }
    ));
}

#[test]
fn test_typed_tickets_are_checked() {
    let at = generated_at();
    let blank = vec![ticket(1, Status::Open, ""), ticket(2, Status::Closed, "  ")];
    assert!(matches!(
        generate_report_at(&blank, &ReportTheme::DEFAULT, at),
        Err(ReportError::Validation {
            index: 0,
            field: "engineer",
            ..
        })
    ));

    let zero_id = vec![ticket(1, Status::Open, "Ana"), ticket(0, Status::Open, "Ana")];
    let err = build_report(&zero_id, &ReportTheme::DEFAULT, at).unwrap_err();
    assert!(matches!(
        err,
        ReportError::Validation {
            index: 1,
            field: "ticket_id",
            ..
        }
    ));
    assert!(err.is_recoverable());

    let repeated = vec![ticket(3, Status::Open, "Ana"), ticket(3, Status::Closed, "Luis")];
    assert!(matches!(
        build_report(&repeated, &ReportTheme::DEFAULT, at),
        Err(ReportError::DuplicateTicket {
            index: 1,
            ticket_id: 3
        })
    ));

    let mut ancient = ticket(1, Status::Open, "Ana");
    ancient.date = NaiveDate::from_ymd_opt(1800, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap();
    assert!(matches!(
        build_report(&[ancient], &ReportTheme::DEFAULT, at),
        Err(ReportError::Validation { field: "date", .. })
    ));
}

#[test]
fn test_unsupported_field_type_in_payload() {
    let payload = r#"{"tickets": [
        {"ticket_id": 1, "date": "2025-03-01 10:00:00", "status": "Abierto", "engineer": "Ana"},
        {"ticket_id": 2, "date": "2025-03-01 11:00:00", "status": true, "engineer": "Ana"}
    ]}"#;
    let raw = ticket_report::loader::parse_json_payload(payload).unwrap();
    assert!(matches!(
        generate_report(&raw),
        Err(ReportError::Validation {
            index: 1,
            field: "status",
            ..
        })
    ));
}
