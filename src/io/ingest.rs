//! Macro CSV ingest.
//!
//! Turns a `Date` + indicator-columns CSV into a clean, date-sorted
//! [`MacroSeries`]:
//! - **Strict schema** for the date column (`MissingColumn`, exit code 2)
//! - **Row-level validation** (rows with bad dates are skipped and reported)
//! - **Column typing**: a column is numeric when every non-missing cell parses

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use log::{debug, warn};

use crate::domain::config::DATE_COLUMN;
use crate::domain::{ColumnInfo, ColumnKind, MacroColumn, MacroSeries};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the cleaned series plus what happened along the way.
#[derive(Debug, Clone)]
pub struct IngestedMacro {
    pub series: MacroSeries,
    /// Every input column in file order, including `Date` and text columns.
    pub column_info: Vec<ColumnInfo>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

pub fn load_macro_csv(path: &Path) -> Result<IngestedMacro, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_macro_csv(file)
}

pub fn read_macro_csv<R: Read>(input: R) -> Result<IngestedMacro, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::invalid_data(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let names: Vec<String> = headers.iter().map(normalize_header_name).collect();
    if let Some(dup) = names
        .iter()
        .enumerate()
        .find(|(i, name)| names[..*i].contains(*name))
        .map(|(_, name)| name)
    {
        return Err(AppError::invalid_data(format!(
            "Duplicate column `{dup}` in the macro CSV header."
        )));
    }
    let header_map: HashMap<&str, usize> = names
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.as_str(), idx))
        .collect();

    let date_idx = *header_map
        .get(DATE_COLUMN)
        .ok_or_else(|| AppError::missing_column(DATE_COLUMN))?;
    let indicator_idx: Vec<usize> = (0..names.len()).filter(|&i| i != date_idx).collect();

    let mut rows: Vec<(NaiveDate, Vec<Option<String>>)> = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header; CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let date = match cell(&record, date_idx).map(parse_date) {
            Some(Ok(d)) => d,
            Some(Err(message)) => {
                row_errors.push(RowError { line, message });
                continue;
            }
            None => {
                row_errors.push(RowError {
                    line,
                    message: format!("Missing `{DATE_COLUMN}` value."),
                });
                continue;
            }
        };

        let cells = indicator_idx
            .iter()
            .map(|&i| cell(&record, i).map(str::to_string))
            .collect();
        rows.push((date, cells));
    }

    if rows.is_empty() {
        return Err(AppError::invalid_data("No valid rows in the macro CSV."));
    }

    rows.sort_by_key(|(date, _)| *date);
    if let Some(dup) = rows.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(AppError::invalid_data(format!(
            "Duplicate date {} in the macro CSV.",
            dup[0].0
        )));
    }

    let dates: Vec<NaiveDate> = rows.iter().map(|(d, _)| *d).collect();
    let mut columns = Vec::new();
    let mut info_by_idx: HashMap<usize, ColumnInfo> = HashMap::new();

    for (pos, &col_idx) in indicator_idx.iter().enumerate() {
        let name = &names[col_idx];
        let raw: Vec<Option<&str>> = rows
            .iter()
            .map(|(_, cells)| cells[pos].as_deref().filter(|s| !is_missing_marker(s)))
            .collect();
        let non_null = raw.iter().filter(|v| v.is_some()).count();

        match parse_numeric_column(&raw) {
            Some(values) => {
                info_by_idx.insert(
                    col_idx,
                    ColumnInfo {
                        name: name.clone(),
                        kind: ColumnKind::Numeric,
                        non_null,
                    },
                );
                columns.push(MacroColumn {
                    name: name.clone(),
                    values,
                });
            }
            None => {
                warn!("Column `{name}` is not numeric; excluding it from the indicator set");
                info_by_idx.insert(
                    col_idx,
                    ColumnInfo {
                        name: name.clone(),
                        kind: ColumnKind::Text,
                        non_null,
                    },
                );
            }
        }
    }

    info_by_idx.insert(
        date_idx,
        ColumnInfo {
            name: DATE_COLUMN.to_string(),
            kind: ColumnKind::Date,
            non_null: dates.len(),
        },
    );
    let column_info = (0..names.len())
        .filter_map(|i| info_by_idx.remove(&i))
        .collect();

    let rows_used = dates.len();
    debug!(
        "Ingested {rows_used}/{rows_read} macro rows, {} indicator columns",
        columns.len()
    );

    Ok(IngestedMacro {
        series: MacroSeries { dates, columns },
        column_info,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn normalize_header_name(name: &str) -> String {
    // UTF-8 CSVs exported from spreadsheets often carry a BOM on the first header.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn cell(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn is_missing_marker(s: &str) -> bool {
    matches!(s, "." | "NA" | "N/A" | "null" | "NULL") || s.eq_ignore_ascii_case("nan")
}

/// Parse every cell as `f64`; `None` if any non-missing cell is not a finite number.
fn parse_numeric_column(raw: &[Option<&str>]) -> Option<Vec<Option<f64>>> {
    raw.iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(s) => s.parse::<f64>().ok().filter(|v| v.is_finite()).map(Some),
        })
        .collect()
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const FMTS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    // Exports from pandas keep a time component on datetime indexes.
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, YYYY/MM/DD, MM/DD/YYYY."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const SAMPLE: &str = "\
Date,Inflation_Rate_%,10Y Treasury Yield,Region
2020-03-01,2.3,,US
2020-01-01,2.5,1.8,US
2020-02-01,,1.5,US
not-a-date,1.0,1.0,US
";

    #[test]
    fn rows_are_sorted_and_missing_cells_kept() {
        let ingest = read_macro_csv(SAMPLE.as_bytes()).unwrap();
        let s = &ingest.series;
        assert_eq!(s.len(), 3);
        assert_eq!(s.dates[0], NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(s.dates[2], NaiveDate::from_ymd_opt(2020, 3, 1).unwrap());

        let inflation = s.column("Inflation_Rate_%").unwrap();
        assert_eq!(inflation.values, vec![Some(2.5), None, Some(2.3)]);
        let tsy = s.column("10Y Treasury Yield").unwrap();
        assert_eq!(tsy.values, vec![Some(1.8), Some(1.5), None]);

        assert_eq!(ingest.rows_read, 4);
        assert_eq!(ingest.rows_used, 3);
        assert_eq!(ingest.row_errors.len(), 1);
        assert_eq!(ingest.row_errors[0].line, 5);
    }

    #[test]
    fn text_columns_are_reported_but_not_indicators() {
        let ingest = read_macro_csv(SAMPLE.as_bytes()).unwrap();
        assert!(ingest.series.column("Region").is_none());
        let kinds: Vec<ColumnKind> = ingest.column_info.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ColumnKind::Date, ColumnKind::Numeric, ColumnKind::Numeric, ColumnKind::Text]
        );
        assert_eq!(ingest.column_info[1].non_null, 2);
    }

    #[test]
    fn missing_date_column_is_fatal() {
        let err = read_macro_csv("When,CPI\n2020-01-01,1.0\n".as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingColumn);
    }

    #[test]
    fn duplicate_dates_are_rejected() {
        let csv = "Date,CPI\n2020-01-01,1.0\n2020-01-01,2.0\n";
        let err = read_macro_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn bom_and_nan_markers_are_handled() {
        let csv = "\u{feff}Date,CPI\n2020-01-01,NaN\n2020-02-01 00:00:00,1.5\n";
        let ingest = read_macro_csv(csv.as_bytes()).unwrap();
        assert_eq!(ingest.series.column("CPI").unwrap().values, vec![None, Some(1.5)]);
    }

    #[test]
    fn duplicate_header_names_are_rejected() {
        let csv = "Date,CPI,CPI\n2020-01-01,1.0,2.0\n";
        let err = read_macro_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(err.to_string().contains("`CPI`"));

        let csv = "Date,CPI,Date\n2020-01-01,1.0,2020-01-02\n";
        let err = read_macro_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }
}
