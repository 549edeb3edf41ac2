use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use calamine::{Data, Reader, open_workbook_auto};
use clap::Parser;

/// Values per output row after the year label.
const MONTHS: usize = 12;

#[derive(Parser, Debug)]
#[command(
    about = "Reshape a single-column series (year labels, then monthly values) into year + 12 months per row"
)]
struct Args {
    /// Input table (.csv or spreadsheet); only column A is read
    input: PathBuf,

    /// How many leading cells of column A are year labels.
    /// Inferred when the column holds exactly N labels and N × 12 values.
    #[arg(long)]
    labels: Option<usize>,

    /// Output CSV path
    #[arg(long, default_value = "reshaped_precipitation.csv")]
    out: PathBuf,
}

/// Non-blank cells of column A, in order.
fn read_first_column(path: &Path) -> Result<Vec<String>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let cells: Vec<String> = match ext.as_str() {
        "csv" | "txt" => {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_path(path)
                .with_context(|| format!("opening CSV {}", path.display()))?;
            let mut cells = Vec::new();
            for (row_no, result) in reader.records().enumerate() {
                let record = result.with_context(|| format!("CSV row {}", row_no + 1))?;
                cells.push(record.get(0).unwrap_or("").trim().to_string());
            }
            cells
        }
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => {
            let mut workbook = open_workbook_auto(path)
                .map_err(|e| anyhow!("opening workbook {}: {e}", path.display()))?;
            let range = workbook
                .worksheet_range_at(0)
                .context("workbook has no worksheets")?
                .map_err(|e| anyhow!("reading first worksheet: {e}"))?;
            if range.start().is_some_and(|(_, col)| col > 0) {
                bail!("column A of the first worksheet is empty");
            }
            range
                .rows()
                .map(|row| match row.first() {
                    Some(Data::Empty) | None => String::new(),
                    Some(cell) => cell.to_string(),
                })
                .collect()
        }
        other => bail!("Unsupported file extension: .{other}"),
    };

    Ok(cells.into_iter().filter(|c| !c.is_empty()).collect())
}

/// Number of labels when `total` splits exactly into N labels + N × 12 values.
fn infer_label_count(total: usize) -> Option<usize> {
    (total % (MONTHS + 1) == 0).then_some(total / (MONTHS + 1))
}

/// Pair the i-th label with the i-th run of 12 values.
///
/// Labels without values yield a label-only row; values beyond the labels
/// yield rows with an empty label.
fn reshape(column: &[String], labels: usize) -> Vec<Vec<String>> {
    let (head, values) = column.split_at(labels.min(column.len()));
    let chunks: Vec<&[String]> = values.chunks(MONTHS).collect();

    (0..head.len().max(chunks.len()))
        .map(|i| {
            let mut row = vec![head.get(i).cloned().unwrap_or_default()];
            if let Some(chunk) = chunks.get(i) {
                row.extend(chunk.iter().cloned());
            }
            row
        })
        .collect()
}

fn main() -> Result<()> {
    let args = Args::parse();

    let column = read_first_column(&args.input)?;
    let labels = match args.labels {
        Some(n) => n,
        None => infer_label_count(column.len()).with_context(|| {
            format!(
                "{} cells cannot be split into N labels and N × 12 values; pass --labels",
                column.len()
            )
        })?,
    };

    let rows = reshape(&column, labels);

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;
    for row in &rows {
        writer.write_record(row).context("writing row")?;
    }
    writer.flush().context("flushing output")?;

    println!(
        "Wrote {} rows ({} labels, {} values) to {}",
        rows.len(),
        labels,
        column.len().saturating_sub(labels),
        args.out.display()
    );
    Ok(())
}
