use std::fmt;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Month labels used on the chart x-axis and in the results table.
pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Number of monthly columns (B–M) following the year label.
pub const MONTHS_PER_ROW: usize = 12;

/// Month label for a result index. Cycles every 12 entries.
pub fn month_label(index: usize) -> &'static str {
    MONTHS[index % MONTHS_PER_ROW]
}

// ---------------------------------------------------------------------------
// Cell – one raw value from the uploaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as read from CSV or a spreadsheet.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    /// Type a raw CSV field: numbers become `Number`, blanks `Empty`.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(v) => Cell::Number(v),
            Err(_) => Cell::Text(trimmed.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Empty => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// ObservationMatrix – year labels + monthly values
// ---------------------------------------------------------------------------

/// Monthly observations, one row per year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationMatrix {
    /// Column A of every row, in file order.
    pub years: Vec<String>,
    /// Columns B–M of every row (up to 12 values each).
    pub rows: Vec<Vec<f64>>,
}

impl ObservationMatrix {
    /// Split raw rows into year labels (cell 0) and monthly values
    /// (cells 1..=12). Extra columns past M are ignored and empty monthly
    /// cells are skipped.
    pub fn from_rows(raw: &[Vec<Cell>]) -> Result<Self> {
        let mut years = Vec::with_capacity(raw.len());
        let mut rows = Vec::with_capacity(raw.len());

        for (row_no, row) in raw.iter().enumerate() {
            let label = row.first().map(|c| c.to_string()).unwrap_or_default();

            let mut values = Vec::with_capacity(MONTHS_PER_ROW);
            for (col, cell) in row.iter().enumerate().skip(1).take(MONTHS_PER_ROW) {
                match cell {
                    // JSON has no NaN/inf; they would be sent as null.
                    Cell::Number(v) if !v.is_finite() => bail!(
                        "Row {}, column {}: '{v}' is not a finite number",
                        row_no + 1,
                        column_letter(col)
                    ),
                    Cell::Number(v) => values.push(*v),
                    Cell::Empty => {}
                    Cell::Text(s) => bail!(
                        "Row {}, column {}: '{s}' is not a number",
                        row_no + 1,
                        column_letter(col)
                    ),
                }
            }

            years.push(label);
            rows.push(values);
        }

        Ok(Self { years, rows })
    }

    /// All monthly values concatenated in row-major order.
    pub fn flattened(&self) -> Vec<f64> {
        self.rows.iter().flatten().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Spreadsheet-style column name for a zero-based index (0 → A).
fn column_letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

// ---------------------------------------------------------------------------
// AnalysisResult – the remote endpoint's answer
// ---------------------------------------------------------------------------

/// Harmonic components returned by the analysis endpoint.
///
/// The three sequences are expected (not required) to have equal length.
/// A field missing from the response decodes as an empty sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub frequencies: Vec<f64>,
    #[serde(default)]
    pub amplitudes: Vec<f64>,
    #[serde(default)]
    pub phases: Vec<f64>,
}

/// One chart/table row: the i-th component of each sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicRow {
    pub index: usize,
    pub month: &'static str,
    pub frequency: f64,
    pub amplitude: Option<f64>,
    pub phase: Option<f64>,
}

impl AnalysisResult {
    /// Rows indexed by frequency, mirroring how the chart is laid out.
    pub fn rows(&self) -> Vec<HarmonicRow> {
        self.frequencies
            .iter()
            .enumerate()
            .map(|(i, &frequency)| HarmonicRow {
                index: i,
                month: month_label(i),
                frequency,
                amplitude: self.amplitudes.get(i).copied(),
                phase: self.phases.get(i).copied(),
            })
            .collect()
    }
}

/// Comma-joined values, the text placed on the clipboard.
pub fn join_values<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric_row(year: f64, months: &[f64]) -> Vec<Cell> {
        std::iter::once(Cell::Number(year))
            .chain(months.iter().map(|&v| Cell::Number(v)))
            .collect()
    }

    #[test]
    fn test_single_row_split() {
        let months: Vec<f64> = (1..=12).map(f64::from).collect();
        let matrix = ObservationMatrix::from_rows(&[numeric_row(2020.0, &months)]).unwrap();

        assert_eq!(matrix.years, vec!["2020".to_string()]);
        assert_eq!(matrix.flattened(), months);
    }

    #[test]
    fn test_flattened_is_row_major_and_skips_labels() {
        let raw: Vec<Vec<Cell>> = (0..3)
            .map(|r| {
                let months: Vec<f64> = (0..12).map(|m| (r * 100 + m) as f64).collect();
                numeric_row(2000.0 + r as f64, &months)
            })
            .collect();

        let matrix = ObservationMatrix::from_rows(&raw).unwrap();
        let flat = matrix.flattened();

        assert_eq!(flat.len(), 3 * 12);
        assert_eq!(flat[0], 0.0);
        assert_eq!(flat[11], 11.0);
        assert_eq!(flat[12], 100.0);
        assert_eq!(flat[35], 211.0);
        assert_eq!(matrix.years, vec!["2000", "2001", "2002"]);
    }

    #[test]
    fn test_columns_past_m_are_ignored() {
        let months: Vec<f64> = (1..=14).map(f64::from).collect();
        let matrix = ObservationMatrix::from_rows(&[numeric_row(1999.0, &months)]).unwrap();
        assert_eq!(matrix.flattened().len(), 12);
        assert_eq!(matrix.flattened().last(), Some(&12.0));
    }

    #[test]
    fn test_short_row_contributes_what_it_has() {
        let matrix =
            ObservationMatrix::from_rows(&[numeric_row(2021.0, &[5.0, 6.0, 7.0])]).unwrap();
        assert_eq!(matrix.years.len(), 1);
        assert_eq!(matrix.flattened(), vec![5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_empty_monthly_cell_is_skipped() {
        let raw = vec![vec![
            Cell::Text("1990".into()),
            Cell::Number(1.0),
            Cell::Empty,
            Cell::Number(3.0),
        ]];
        let matrix = ObservationMatrix::from_rows(&raw).unwrap();
        assert_eq!(matrix.years, vec!["1990"]);
        assert_eq!(matrix.flattened(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_text_monthly_cell_is_rejected() {
        let raw = vec![vec![
            Cell::Number(1990.0),
            Cell::Number(1.0),
            Cell::Text("n/a".into()),
        ]];
        let err = ObservationMatrix::from_rows(&raw).unwrap_err().to_string();
        assert!(err.contains("Row 1"));
        assert!(err.contains("column C"));
        assert!(err.contains("n/a"));
    }

    #[test]
    fn test_non_finite_monthly_cells_are_rejected() {
        for text in ["NaN", "inf", "-infinity"] {
            let raw = vec![vec![Cell::parse("2020"), Cell::Number(1.0), Cell::parse(text)]];
            let err = ObservationMatrix::from_rows(&raw).unwrap_err().to_string();
            assert!(err.contains("Row 1, column C"), "{err}");
            assert!(err.contains("not a finite number"), "{err}");
        }
    }

    #[test]
    fn test_flattened_always_serializes_as_numbers() {
        let raw = vec![vec![Cell::parse("2020"), Cell::parse("1.5"), Cell::parse("2")]];
        let matrix = ObservationMatrix::from_rows(&raw).unwrap();
        let body = serde_json::to_string(&matrix.flattened()).unwrap();
        assert_eq!(body, "[1.5,2.0]");
    }

    #[test]
    fn test_cell_parse() {
        assert_eq!(Cell::parse(" 12.5 "), Cell::Number(12.5));
        assert_eq!(Cell::parse(""), Cell::Empty);
        assert_eq!(Cell::parse("  "), Cell::Empty);
        assert_eq!(Cell::parse("Jan"), Cell::Text("Jan".into()));
    }

    #[test]
    fn test_month_label_cycles() {
        assert_eq!(month_label(0), "Jan");
        assert_eq!(month_label(11), "Dec");
        assert_eq!(month_label(12), "Jan");
        assert_eq!(month_label(25), "Feb");
    }

    #[test]
    fn test_result_decodes_and_keeps_values() {
        let json = r#"{"frequencies":[1,2],"amplitudes":[3,4],"phases":[5,6]}"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.frequencies, vec![1.0, 2.0]);
        assert_eq!(result.amplitudes, vec![3.0, 4.0]);
        assert_eq!(result.phases, vec![5.0, 6.0]);
    }

    #[test]
    fn test_result_missing_fields_default_to_empty() {
        let result: AnalysisResult = serde_json::from_str(r#"{"frequencies":[0.5]}"#).unwrap();
        assert_eq!(result.frequencies, vec![0.5]);
        assert!(result.amplitudes.is_empty());
        assert!(result.phases.is_empty());
    }

    #[test]
    fn test_rows_tolerate_unequal_lengths() {
        let result = AnalysisResult {
            frequencies: vec![0.0, 0.1, 0.2],
            amplitudes: vec![10.0, 20.0],
            phases: vec![1.0],
        };
        let rows = result.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].month, "Feb");
        assert_eq!(rows[1].amplitude, Some(20.0));
        assert_eq!(rows[1].phase, None);
        assert_eq!(rows[2].amplitude, None);
    }

    #[test]
    fn test_join_values() {
        assert_eq!(join_values(&[1.0, 0.5, -2.25]), "1,0.5,-2.25");
        assert_eq!(join_values::<f64>(&[]), "");
        assert_eq!(join_values(&["2020".to_string(), "2021".to_string()]), "2020,2021");
    }
}
