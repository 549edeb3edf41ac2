use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use calamine::{Data, Reader, open_workbook_auto};

use super::model::{Cell, ObservationMatrix};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// File extensions accepted by the file picker.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "txt", "xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Load a file and split it into year labels and monthly values.
pub fn load_matrix(path: &Path) -> Result<ObservationMatrix> {
    let rows = load_rows(path)?;
    ObservationMatrix::from_rows(&rows)
        .with_context(|| format!("reading observations from {}", path.display()))
}

/// Read every non-blank row of a tabular file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma-separated, no header row
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first worksheet
pub fn load_rows(path: &Path) -> Result<Vec<Vec<Cell>>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" | "txt" => load_csv(path),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: no header row, column A holds the year, B–M the months.
/// Rows may have differing widths.
fn load_csv(path: &Path) -> Result<Vec<Vec<Cell>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {}", row_no + 1))?;
        let row: Vec<Cell> = record.iter().map(Cell::parse).collect();
        if is_blank(&row) {
            continue;
        }
        rows.push(row);
    }

    log::debug!("Read {} CSV rows from {}", rows.len(), path.display());
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn load_workbook(path: &Path) -> Result<Vec<Vec<Cell>>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| anyhow!("opening workbook {}: {e}", path.display()))?;

    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .map_err(|e| anyhow!("reading first worksheet: {e}"))?;

    // Ranges start at the first used cell; pad so column A stays index 0.
    let col_offset = range.start().map(|(_, col)| col as usize).unwrap_or(0);

    let mut rows = Vec::new();
    for data_row in range.rows() {
        let row: Vec<Cell> = std::iter::repeat(Cell::Empty)
            .take(col_offset)
            .chain(data_row.iter().map(cell_from_data))
            .collect();
        if is_blank(&row) {
            continue;
        }
        rows.push(row);
    }

    log::debug!("Read {} worksheet rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::parse(s),
        Data::Empty => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}

fn is_blank(row: &[Cell]) -> bool {
    row.iter().all(|c| *c == Cell::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{contents}").unwrap();
        path
    }

    #[test]
    fn test_load_csv_without_header() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "rain.csv",
            "2020,1,2,3,4,5,6,7,8,9,10,11,12\n2021,13,14,15,16,17,18,19,20,21,22,23,24\n",
        );

        let matrix = load_matrix(&path).unwrap();
        assert_eq!(matrix.years, vec!["2020", "2021"]);
        let flat = matrix.flattened();
        assert_eq!(flat.len(), 24);
        assert_eq!(flat.first(), Some(&1.0));
        assert_eq!(flat.last(), Some(&24.0));
    }

    #[test]
    fn test_load_csv_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "rain.csv", "1990,1,2\n\n1991,3,4\n,,\n");

        let rows = load_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_load_csv_ragged_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "rain.csv", "1990,1,2,3\n1991,4\n");

        let matrix = load_matrix(&path).unwrap();
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix.flattened(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_load_csv_rejects_text_observation() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "rain.csv", "year,jan,feb\n");

        let err = format!("{:#}", load_matrix(&path).unwrap_err());
        assert!(err.contains("'jan' is not a number"));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "rain.parquet", "");

        let err = load_rows(&path).unwrap_err().to_string();
        assert_eq!(err, "Unsupported file extension: .parquet");
    }

    #[test]
    fn test_missing_file() {
        let err = format!(
            "{:#}",
            load_rows(Path::new("/tmp/does-not-exist-harmonics-xyz.csv")).unwrap_err()
        );
        assert!(err.contains("opening CSV"));
    }

    /// Write `sheets` (name, first column, rows) to an .xlsx workbook.
    fn write_workbook(dir: &Path, name: &str, sheets: &[(&str, u16, Vec<Vec<f64>>)]) -> PathBuf {
        let path = dir.join(name);
        let mut workbook = rust_xlsxwriter::Workbook::new();
        for (sheet_name, first_col, rows) in sheets {
            let sheet = workbook.add_worksheet();
            sheet.set_name(*sheet_name).unwrap();
            for (r, row) in rows.iter().enumerate() {
                for (c, value) in row.iter().enumerate() {
                    sheet
                        .write_number(r as u32, first_col + c as u16, *value)
                        .unwrap();
                }
            }
        }
        workbook.save(&path).unwrap();
        path
    }

    fn year_row(year: f64, offset: f64) -> Vec<f64> {
        std::iter::once(year)
            .chain((1..=12).map(|m| offset + m as f64))
            .collect()
    }

    #[test]
    fn test_load_workbook_reads_first_sheet_only() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(
            dir.path(),
            "rain.xlsx",
            &[
                ("Rainfall", 0, vec![year_row(2020.0, 0.0), year_row(2021.0, 100.0)]),
                ("Notes", 0, vec![year_row(1900.0, 500.0)]),
            ],
        );

        let matrix = load_matrix(&path).unwrap();
        assert_eq!(matrix.years, vec!["2020", "2021"]);
        let flat = matrix.flattened();
        assert_eq!(flat.len(), 24);
        assert_eq!(flat[0], 1.0);
        assert_eq!(flat[23], 112.0);
    }

    #[test]
    fn test_load_workbook_keeps_column_a_when_range_starts_at_b() {
        let dir = TempDir::new().unwrap();
        let months: Vec<f64> = (1..=12).map(f64::from).collect();
        let path = write_workbook(dir.path(), "shifted.xlsx", &[("Sheet1", 1, vec![months.clone()])]);

        let rows = load_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], Cell::Empty);
        assert_eq!(rows[0][1], Cell::Number(1.0));

        // Column A is blank, so every value in B–M is an observation.
        let matrix = load_matrix(&path).unwrap();
        assert_eq!(matrix.years, vec![""]);
        assert_eq!(matrix.flattened(), months);
    }

    #[test]
    fn test_cell_from_data() {
        assert_eq!(cell_from_data(&Data::Int(2020)), Cell::Number(2020.0));
        assert_eq!(cell_from_data(&Data::Float(1.5)), Cell::Number(1.5));
        assert_eq!(cell_from_data(&Data::String("7".into())), Cell::Number(7.0));
        assert_eq!(cell_from_data(&Data::Empty), Cell::Empty);
    }
}
