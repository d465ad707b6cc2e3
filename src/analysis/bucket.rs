//! Range bucketing and per-bucket mean forward return.

use crate::domain::{BucketSpec, BucketStat, BucketSummary, MergedTable};
use crate::error::AppError;

/// Bucket label per merged row (`None` when the value is missing or out of range).
pub fn bucket_labels(table: &MergedTable, spec: &BucketSpec) -> Result<Vec<Option<String>>, AppError> {
    spec.validate()?;
    let values = table.require_values(&spec.column)?;
    Ok(values
        .iter()
        .map(|v| spec.label_for(*v).map(str::to_string))
        .collect())
}

/// Mean `F1M_Return` per bucket of `spec.column`.
///
/// Missing returns are skipped, not treated as zero. Every label appears in
/// the output, in spec order; a bucket without any return has `mean_return = None`.
pub fn summarize_buckets(table: &MergedTable, spec: &BucketSpec) -> Result<BucketSummary, AppError> {
    spec.validate()?;
    let values = table.require_values(&spec.column)?;

    let n = spec.labels.len();
    let mut counts = vec![0usize; n];
    let mut sums = vec![0.0f64; n];
    let mut n_returns = vec![0usize; n];

    for (value, record) in values.iter().zip(&table.records) {
        let Some(idx) = value.and_then(|v| spec.assign(v)) else {
            continue;
        };
        counts[idx] += 1;
        if let Some(r) = record.forward_return.filter(|r| r.is_finite()) {
            sums[idx] += r;
            n_returns[idx] += 1;
        }
    }

    let rows = spec
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| BucketStat {
            label: label.clone(),
            count: counts[i],
            n_returns: n_returns[i],
            mean_return: (n_returns[i] > 0).then(|| sums[i] / n_returns[i] as f64),
        })
        .collect();

    Ok(BucketSummary {
        column: spec.column.clone(),
        rows,
    })
}
