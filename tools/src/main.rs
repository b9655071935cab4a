//! desk-runner: headless front end for FeeDesk sheets.
//!
//! Usage:
//!   desk-runner --open fees.csv [--search john] [--month 3 --year 2025] [--export report.pdf]
//!   desk-runner --create fees.csv
//!   desk-runner --generate sample.csv --seed 42 --rows 40
//!   desk-runner --config desk.json --ipc-mode

use anyhow::Result;
use feedesk_core::{
    clock::{Clock, SystemClock},
    config::DeskConfig,
    query::{View, ViewRow},
    reminder::{Mailer, ReminderScope, SmtpMailer},
    rules, sample,
    sheet::{CsvSheetIo, SheetIo},
    types::{Amount, SheetId},
    FeeRecord, FeeSession,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Create { path: String },
    Open { path: String },
    Select { sheet: String },
    Save,
    Add { record: FeeRecord },
    Edit { index: usize, record: FeeRecord },
    Delete { index: usize },
    Search { keyword: String },
    Filter {
        #[serde(default)]
        month: Option<u32>,
        #[serde(default)]
        year: Option<i32>,
    },
    ClearFilters,
    Export { path: String },
    /// No index: everyone with dues. Password falls back to the environment.
    Remind {
        #[serde(default)]
        index: Option<usize>,
        #[serde(default)]
        password: Option<String>,
    },
    Quit,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    session_id: &'a str,
    sheets: Vec<SheetId>,
    selected: Option<&'a str>,
    records_total: usize,
    outstanding_total: Amount,
    view: &'a [ViewRow],
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let config = match arg_value(&args, "--config") {
        Some(path) => DeskConfig::load(path)?,
        None => DeskConfig::default(),
    };

    if let Some(path) = arg_value(&args, "--generate") {
        let seed = parse_arg(&args, "--seed", 42u64);
        let rows = parse_arg(&args, "--rows", 40usize);
        let records = sample::generate_sheet(seed, rows, SystemClock.today());
        CsvSheetIo.write(Path::new(path), &records)?;
        println!("Generated {rows} records (seed {seed}) into {path}");
        return Ok(());
    }

    let mut session = FeeSession::build(config)?;

    if let Some(path) = arg_value(&args, "--create") {
        let id = session.create_sheet(Path::new(path))?;
        println!("Created strict sheet: {id}");
    }

    if ipc_mode {
        return run_ipc_loop(&mut session);
    }

    if let Some(path) = arg_value(&args, "--open") {
        let outcome = session.open_sheet(Path::new(path))?;
        for warning in &outcome.warnings {
            println!("  warning: {warning}");
        }
        if let Some(keyword) = arg_value(&args, "--search") {
            session.search(keyword)?;
        }
        let month = arg_value(&args, "--month").and_then(|m| m.parse().ok());
        let year = arg_value(&args, "--year").and_then(|y| y.parse().ok());
        if month.is_some() || year.is_some() {
            session.filter_by_due_date(month, year)?;
        }
        print_summary(&session)?;

        if let Some(out) = arg_value(&args, "--export") {
            let rows = session.export_report(Path::new(out))?;
            println!("Exported {rows} rows to {out}");
        }
    }
    Ok(())
}

fn run_ipc_loop(session: &mut FeeSession) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };
        if matches!(cmd, IpcCommand::Quit) {
            break;
        }

        match handle_command(session, cmd) {
            Ok(message) => {
                let state = build_ui_state(session, message);
                writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
            }
            Err(e) => {
                log::warn!("Command failed: {e}");
                write_error(&mut stdout, &e.to_string())?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

/// Run one command. Returns an optional message for the operator.
fn handle_command(session: &mut FeeSession, cmd: IpcCommand) -> Result<Option<String>> {
    let message = match cmd {
        IpcCommand::GetState | IpcCommand::Quit => None,
        IpcCommand::Create { path } => {
            let id = session.create_sheet(Path::new(&path))?;
            Some(format!("Created strict file: {id}"))
        }
        IpcCommand::Open { path } => {
            let outcome = session.open_sheet(Path::new(&path))?;
            let mut msg = format!("Loaded {}", outcome.sheet);
            if !outcome.warnings.is_empty() {
                msg.push_str(&format!(
                    " ({} cells could not be read and were reset)",
                    outcome.warnings.len()
                ));
            }
            Some(msg)
        }
        IpcCommand::Select { sheet } => {
            session.select(&sheet)?;
            None
        }
        IpcCommand::Save => {
            session.save()?;
            session.selected().map(|id| format!("Saved {id}"))
        }
        IpcCommand::Add { record } => {
            let index = session.add_record(record)?;
            Some(format!("Added record {index}"))
        }
        IpcCommand::Edit { index, record } => {
            session.edit_record(index, record)?;
            None
        }
        IpcCommand::Delete { index } => {
            let removed = session.delete_record(index)?;
            Some(format!("Deleted {}", removed.name))
        }
        IpcCommand::Search { keyword } => {
            session.search(&keyword)?;
            None
        }
        IpcCommand::Filter { month, year } => {
            session.filter_by_due_date(month, year)?;
            None
        }
        IpcCommand::ClearFilters => {
            session.clear_filters()?;
            None
        }
        IpcCommand::Export { path } => {
            let rows = session.export_report(Path::new(&path))?;
            Some(format!("Saved PDF to {path} ({rows} rows)"))
        }
        IpcCommand::Remind { index, password } => {
            let smtp = &session.config().smtp;
            let settings = match password {
                Some(p) => smtp.with_password(p),
                None => smtp.with_env_password()?,
            };
            let mailer = SmtpMailer::new(&settings)?;
            let scope = match index {
                Some(index) => ReminderScope::Record { index },
                None => ReminderScope::AllWithDues,
            };
            let report = session.send_reminders(scope, &mailer as &dyn Mailer)?;
            Some(report.summary())
        }
    };
    Ok(message)
}

fn build_ui_state(session: &FeeSession, message: Option<String>) -> UiState<'_> {
    let records: &[FeeRecord] = session.records().unwrap_or(&[]);
    let view: &View = session.view();
    UiState {
        session_id: &session.session_id,
        sheets: session.sheets(),
        selected: session.selected(),
        records_total: records.len(),
        outstanding_total: rules::total_outstanding(records),
        view: &view.rows,
        message,
    }
}

fn write_error(stdout: &mut io::Stdout, error: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": error });
    writeln!(stdout, "{}", err_json)?;
    stdout.flush()?;
    Ok(())
}

fn print_summary(session: &FeeSession) -> Result<()> {
    let records = session.records()?;
    let owing = records.iter().filter(|r| r.has_dues()).count();
    let outstanding = rules::total_outstanding(records);

    println!("=== SHEET SUMMARY ===");
    println!("  sheet:        {}", session.selected().unwrap_or("-"));
    println!("  records:      {}", records.len());
    println!("  fully paid:   {}", records.len() - owing);
    println!("  with dues:    {owing}");
    println!("  outstanding:  {outstanding}");
    println!();
    println!("=== CURRENT VIEW ({} rows) ===", session.view().len());
    for row in &session.view().rows {
        let r = &row.record;
        println!(
            "  #{:<4} {:<24} {:<12} balance {:>8}  due {}",
            row.index,
            r.name,
            r.mobile_number,
            r.balance,
            r.due_date.map(|d| d.to_string()).unwrap_or_default()
        );
    }
    Ok(())
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    arg_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
