use crate::cli::{Mode, OutputKind};
use crate::error::Result;
use crate::table::{ResultTable, Row};
use crate::utils::{ensure_directory, timestamp};
use crate::{log_info, log_warn};
use chrono::Local;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Renders `table` the way `output` asks. Without an explicit kind the rows
/// go to stdout as plain space-separated text.
pub fn control_output(
    table: &ResultTable,
    output: Option<OutputKind>,
    mode: Mode,
    results_dir: &Path,
) -> Result<()> {
    match output {
        None => print_stdout(&render_default(table))?,
        Some(OutputKind::Pretty) => print_stdout(&render_pretty(table))?,
        Some(OutputKind::File) => {
            write_csv(table, results_dir, mode.as_str())?;
        }
    }
    Ok(())
}

fn print_stdout(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()
}

pub fn render_default(table: &ResultTable) -> String {
    table
        .rows()
        .iter()
        .map(|row| format!("{}\n", row.join(" ")))
        .collect()
}

/// Bordered table, header first, cells left aligned.
pub fn render_pretty(table: &ResultTable) -> String {
    let widths: Vec<usize> = (0..table.width())
        .map(|column| {
            table
                .rows()
                .iter()
                .map(|row| row[column].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let border = format!(
        "+{}+\n",
        widths
            .iter()
            .map(|width| "-".repeat(width + 2))
            .collect::<Vec<_>>()
            .join("+")
    );
    let line = |row: &Row| {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!(" {:<width$} ", cell, width = *width))
            .collect();
        format!("|{}|\n", cells.join("|"))
    };

    let mut out = String::new();
    out.push_str(&border);
    out.push_str(&line(table.header()));
    out.push_str(&border);
    if !table.is_empty() {
        for row in table.records() {
            out.push_str(&line(row));
        }
        out.push_str(&border);
    }
    out
}

/// Saves the table as `<mode>_<timestamp>.csv` under `results_dir`.
/// A table without data rows writes nothing, not even a header-only file,
/// and returns `None`.
pub fn write_csv(table: &ResultTable, results_dir: &Path, mode: &str) -> Result<Option<PathBuf>> {
    if table.is_empty() {
        log_warn!("[output] No results to save to a file");
        return Ok(None);
    }

    ensure_directory(results_dir)?;
    let file_path = results_dir.join(format!("{}_{}.csv", mode, timestamp(Local::now())));

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(&file_path)?;
    for row in table.rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;

    log_info!("[output] Results saved to {}", file_path.display());
    Ok(Some(file_path))
}
