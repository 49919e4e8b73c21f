use crate::error::RenderError;
use crate::utils::log_render;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Serialize `rows` to a CSV file with a header row taken from the field names.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<PathBuf, RenderError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|source| RenderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    log_render(&format!("Wrote {} rows to {}", rows.len(), path.display()));
    Ok(path.to_path_buf())
}

/// Create the output directory if needed.
pub fn ensure_output_dir(dir: &Path) -> Result<(), RenderError> {
    std::fs::create_dir_all(dir).map_err(|source| RenderError::Io {
        path: dir.display().to_string(),
        source,
    })
}

/// Fixed-width text table, columns padded to their widest cell.
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let render_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![render_row(headers.to_vec())];
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(render_row(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}

pub fn print_table(title: &str, headers: &[&str], rows: &[Vec<String>]) {
    println!("\n📋 {}", title);
    if rows.is_empty() {
        println!("   (no rows)");
        return;
    }
    println!("{}", format_table(headers, rows));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Serialize)]
    struct Row {
        state: String,
        filings: usize,
    }

    #[test]
    fn test_write_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("states.csv");
        let rows = vec![
            Row {
                state: "CA".to_string(),
                filings: 3,
            },
            Row {
                state: "DE".to_string(),
                filings: 5,
            },
        ];
        write_csv(&path, &rows).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "state,filings\nCA,3\nDE,5\n");
    }

    #[test]
    fn test_ensure_output_dir_nested() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_output_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_format_table_pads_columns() {
        let table = format_table(
            &["State", "Filings"],
            &[vec!["CA".to_string(), "3".to_string()], vec!["NY".to_string(), "12".to_string()]],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "State  Filings");
        assert_eq!(lines[1], "-----  -------");
        assert_eq!(lines[2], "CA     3");
        assert_eq!(lines[3], "NY     12");
    }
}
