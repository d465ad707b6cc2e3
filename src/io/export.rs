//! Export the merged table to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or notebooks:
//! one row per macro date, missing values left blank.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::analysis::bucket_labels;
use crate::domain::config::{CLOSE_COLUMN, DATE_COLUMN, FORWARD_RETURN_COLUMN};
use crate::domain::{BucketSpec, MergedTable};
use crate::error::AppError;

pub fn write_merged_csv(path: &Path, table: &MergedTable, buckets: &[BucketSpec]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_merged_rows(BufWriter::new(file), table, buckets)
}

/// Bucket labels such as `(0,2]` carry commas; the writer quotes them.
fn write_merged_rows<W: Write>(out: W, table: &MergedTable, buckets: &[BucketSpec]) -> Result<(), AppError> {
    let labels: Vec<Vec<Option<String>>> = buckets
        .iter()
        .map(|spec| bucket_labels(table, spec))
        .collect::<Result<_, _>>()?;

    let mut wtr = csv::Writer::from_writer(out);

    let mut header = vec![DATE_COLUMN.to_string()];
    header.extend(table.macro_columns.iter().cloned());
    header.push(CLOSE_COLUMN.to_string());
    header.push(FORWARD_RETURN_COLUMN.to_string());
    header.extend(buckets.iter().map(|b| format!("{}_range", b.column)));
    wtr.write_record(&header)
        .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;

    for (row, r) in table.records.iter().enumerate() {
        let mut fields = vec![r.date.to_string()];
        fields.extend(r.values.iter().map(|v| fmt_opt(*v)));
        fields.push(fmt_opt(r.close));
        fields.push(fmt_opt(r.forward_return));
        fields.extend(labels.iter().map(|l| l[row].clone().unwrap_or_default()));
        wtr.write_record(&fields)
            .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }

    wtr.flush()
        .map_err(|e| AppError::io(format!("Failed to flush export CSV: {e}")))
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}
