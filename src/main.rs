// Entry point and high-level CLI flow.
//
// - Option [1] loads and validates the tickets file, printing diagnostics.
// - Option [2] builds the workbook, writes it (plus a JSON summary) and
//   prints previews of the summary tables.
// - Option [3] loads a synthetic dataset for demos. It is never used as an
//   implicit fallback for an empty or invalid file.
use anyhow::Context;
use chrono::Local;
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use ticket_report::config::{load_config, AppConfig};
use ticket_report::{build_report, loader, output, sample, util, Report, ReportError, ReportTheme, TicketRecord};
use tracing::{error, info};

const CONFIG_FILE: &str = "reporte.toml";

// Loaded tickets survive between menu choices so a report can be rebuilt
// without reloading the file.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { data: None }));

struct AppState {
    data: Option<Vec<TicketRecord>>,
}

fn store_data(data: Vec<TicketRecord>) {
    let mut state = APP_STATE.lock().unwrap_or_else(|e| e.into_inner());
    state.data = Some(data);
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask whether to go back to the menu after generating a report.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to menu (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        let resp = buf.trim().to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: load and validate the configured tickets file.
fn handle_load(config: &AppConfig) {
    let path = config.input_path.as_path();
    let raw = match loader::load_raw(path) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Failed to load file: {:#}\n", e);
            return;
        }
    };
    match loader::validate_tickets(&raw) {
        Ok(data) => {
            println!(
                "Loaded {} tickets from {}.\n",
                util::format_int(data.len()),
                path.display()
            );
            store_data(data);
        }
        Err(ReportError::EmptyDataset) => {
            println!(
                "{} contains no tickets. Choose [3] to load sample data instead.\n",
                path.display()
            );
        }
        Err(e) => {
            eprintln!("Invalid input: {}\n", e);
        }
    }
}

/// Handle option [3]: load the synthetic demo dataset.
fn handle_sample(config: &AppConfig) {
    let data = sample::generate_sample_tickets(config.sample_size, Local::now().naive_local());
    println!(
        "Generated {} sample tickets (demo data).\n",
        util::format_int(data.len())
    );
    store_data(data);
}

fn write_outputs(config: &AppConfig, report: &Report) -> anyhow::Result<()> {
    let path = output::write_report(&config.output_dir, &report.file)
        .with_context(|| format!("Failed to write {}", report.file.file_name))?;
    println!("Report saved to {}", path.display());
    if config.write_summary {
        let summary_path = config.output_dir.join("summary.json");
        output::write_json(&summary_path, &output::report_summary(report))
            .with_context(|| format!("Failed to write {}", summary_path.display()))?;
        println!("Summary saved to {}", summary_path.display());
    }
    println!();
    Ok(())
}

/// Handle option [2]: build the workbook, persist it and print previews.
fn handle_generate_report(config: &AppConfig) {
    let data = {
        let state = APP_STATE.lock().unwrap_or_else(|e| e.into_inner());
        state.data.clone()
    };
    let Some(data) = data else {
        println!("Error: No tickets loaded. Choose [1] or [3] first.\n");
        return;
    };

    println!("Generating report...");
    let report = match build_report(&data, &ReportTheme::DEFAULT, Local::now().naive_local()) {
        Ok(r) => r,
        Err(e) => {
            error!("Report generation failed: {}", e);
            eprintln!("Report generation failed: {}\n", e);
            return;
        }
    };
    if let Err(e) = write_outputs(config, &report) {
        eprintln!("Write error: {:#}\n", e);
    }

    let agg = &report.aggregates;
    println!("Resumen por Estatus ({} tickets)\n", util::format_int(agg.total));
    output::preview_table_rows(&agg.status_summary.rows(), config.preview_rows);
    println!("Resumen por Ingeniero\n");
    output::preview_table_rows(&agg.engineer_matrix.table_rows(), config.preview_rows);
    println!("Rating por Ingeniero\n");
    output::preview_table_rows(&agg.rating_rows(), config.preview_rows);
    if let Some(top) = agg.top_engineer() {
        println!("Mejor Ingeniero: {} ({})\n", top.engineer, top.display_score());
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = load_config(Path::new(CONFIG_FILE))
        .with_context(|| format!("Failed to load configuration from {}", CONFIG_FILE))?;
    info!(input = %config.input_path.display(), output = %config.output_dir.display(), "configuration loaded");

    loop {
        println!("Ticket Report");
        println!("[1] Load tickets file ({})", config.input_path.display());
        println!("[2] Generate report");
        println!("[3] Load sample data (demo)\n");
        match read_choice().as_str() {
            "1" => handle_load(&config),
            "2" => {
                println!();
                handle_generate_report(&config);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => handle_sample(&config),
            _ => println!("Invalid choice. Please enter 1, 2 or 3.\n"),
        }
    }
    Ok(())
}
