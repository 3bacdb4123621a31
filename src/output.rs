// Export and console-preview helpers shared by the shell.
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn write_csv<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> Result<(), OutputError> {
    let path = path.as_ref();
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    debug!(path = %path.display(), rows = rows.len(), "wrote CSV export");
    Ok(())
}

pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<(), OutputError> {
    let path = path.as_ref();
    let pretty = serde_json::to_string_pretty(value)?;
    std::fs::write(path, pretty)?;
    debug!(path = %path.display(), "wrote JSON export");
    Ok(())
}

/// Print up to `max_rows` rows as a markdown-style table with a title and
/// an optional parenthesized note. Empty row sets render as `(no rows)`.
pub fn preview_table<T>(title: &str, note: Option<&str>, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}", title);
    if let Some(note) = note {
        println!("({})", note);
    }
    println!();
    if rows.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    let table = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}", table);
    if rows.len() > max_rows {
        println!("(showing {} of {} rows)", max_rows, rows.len());
    }
    println!();
}
