//! CSV I/O and typed column access over polars data frames.
//!
//! RULE: Stages never edit a frame they were handed. Every step borrows
//! a `DataFrame` and returns a new one (polars columns are shared, so
//! the copy is shallow).

use crate::{
    error::{PricingError, PricingResult},
    types::RowIdx,
};
use polars::prelude::*;
use std::{
    io::{Cursor, Write},
    path::Path,
};

/// Cell contents read as missing, besides the empty cell.
pub const NA_TOKENS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL", "None", "<NA>"];

fn csv_options() -> CsvReadOptions {
    let nulls: Vec<PlSmallStr> = NA_TOKENS.iter().map(|t| PlSmallStr::from(*t)).collect();
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(
            CsvParseOptions::default().with_null_values(Some(NullValues::AllColumns(nulls))),
        )
}

/// Integer columns with gaps are read as floats, the way dataframe
/// tooling with NaN-based missing values reads them.
fn widen_gapped_integers(mut df: DataFrame) -> PricingResult<DataFrame> {
    let gapped: Vec<PlSmallStr> = df
        .get_columns()
        .iter()
        .filter(|c| c.dtype().is_integer() && c.null_count() > 0)
        .map(|c| c.name().clone())
        .collect();
    for name in gapped {
        let widened = df.column(name.as_str())?.cast(&DataType::Float64)?;
        df.with_column(widened)?;
    }
    Ok(df)
}

/// Read a CSV file with a header row. A missing file is reported as
/// `MissingInput` naming the path.
pub fn read_csv(path: &Path) -> PricingResult<DataFrame> {
    if !path.exists() {
        return Err(PricingError::MissingInput { path: path.display().to_string() });
    }
    let df = csv_options()
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    widen_gapped_integers(df)
}

/// Parse CSV text already held in memory.
pub fn read_csv_text(text: &str) -> PricingResult<DataFrame> {
    let df = csv_options()
        .into_reader_with_file_handle(Cursor::new(text.as_bytes().to_vec()))
        .finish()?;
    widen_gapped_integers(df)
}

/// Write `df` with a header row and no index column. Floats keep a
/// trailing `.0`, missing cells are empty.
pub fn write_csv<W: Write>(df: &DataFrame, writer: W) -> PricingResult<()> {
    let mut out = df.clone();
    CsvWriter::new(writer).include_header(true).finish(&mut out)?;
    Ok(())
}

pub fn column_names(df: &DataFrame) -> Vec<&str> {
    df.get_column_names().into_iter().map(PlSmallStr::as_str).collect()
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// The named column, or `MissingColumn`.
pub fn series<'a>(df: &'a DataFrame, name: &str) -> PricingResult<&'a Series> {
    df.column(name)
        .map(Column::as_materialized_series)
        .map_err(|_| PricingError::MissingColumn { column: name.to_string() })
}

/// Fail with `MissingColumn` for the first of `names` not in `df`.
pub fn require_columns(df: &DataFrame, names: &[&str]) -> PricingResult<()> {
    match names.iter().find(|n| !has_column(df, n)) {
        Some(missing) => Err(PricingError::MissingColumn { column: missing.to_string() }),
        None => Ok(()),
    }
}

/// Numeric view of a column. A text column is an `InvalidValue`
/// pointing at its first present cell.
pub fn f64_values(s: &Series) -> PricingResult<Vec<Option<f64>>> {
    if s.dtype() == &DataType::String {
        let (row, value) = s
            .str()?
            .into_iter()
            .enumerate()
            .find_map(|(i, v)| v.map(|v| (i, v.to_string())))
            .unwrap_or((0, String::new()));
        return Err(PricingError::InvalidValue {
            column: s.name().to_string(),
            row,
            value: format!("expected a number, found '{value}'"),
        });
    }
    let cast = s.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().collect())
}

/// Cells rendered as labels, used for categorical levels and ids.
pub fn labels(s: &Series) -> PricingResult<Vec<Option<String>>> {
    match s.dtype() {
        DataType::String => Ok(s.str()?.into_iter().map(|v| v.map(str::to_string)).collect()),
        dt if dt.is_integer() => {
            let cast = s.cast(&DataType::Int64)?;
            Ok(cast.i64()?.into_iter().map(|v| v.map(|x| x.to_string())).collect())
        }
        _ => Ok(f64_values(s)?.into_iter().map(|v| v.map(format_float)).collect()),
    }
}

/// Render a float the way the CSV writer does: integral values keep a
/// trailing `.0`.
pub fn format_float(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 {
        format!("{x:.1}")
    } else {
        format!("{x}")
    }
}

/// Value of one cell as f64, if numeric and present.
pub fn f64_at(df: &DataFrame, column: &str, row: RowIdx) -> PricingResult<Option<f64>> {
    Ok(f64_values(series(df, column)?)?.get(row).copied().flatten())
}
