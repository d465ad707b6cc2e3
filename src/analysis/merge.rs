//! Date alignment of the macro table with price-derived fields.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::{MacroSeries, MergedRecord, MergedTable, ReturnRecord, ReturnSeries};

/// Left join on exact date: every macro row survives, unmatched rows carry
/// `None` for `Close` and `F1M_Return`.
pub fn left_join(series: &MacroSeries, returns: &ReturnSeries) -> MergedTable {
    let by_date: HashMap<NaiveDate, &ReturnRecord> =
        returns.records.iter().map(|r| (r.date, r)).collect();

    let records = series
        .dates
        .iter()
        .enumerate()
        .map(|(row, date)| {
            let matched = by_date.get(date);
            MergedRecord {
                date: *date,
                values: series.columns.iter().map(|c| c.values[row]).collect(),
                close: matched.map(|r| r.close),
                forward_return: matched.and_then(|r| r.forward_return),
            }
        })
        .collect();

    MergedTable {
        macro_columns: series.column_names(),
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MacroColumn;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, m, day).unwrap()
    }

    #[test]
    fn unmatched_dates_keep_macro_fields_and_missing_return() {
        let series = MacroSeries {
            dates: vec![d(1, 1), d(2, 1), d(3, 1)],
            columns: vec![
                MacroColumn {
                    name: "CPI".to_string(),
                    values: vec![Some(1.0), Some(2.0), None],
                },
                MacroColumn {
                    name: "10Y".to_string(),
                    values: vec![Some(0.9), Some(1.1), Some(1.4)],
                },
            ],
        };
        let returns = ReturnSeries {
            symbol: "SPY".to_string(),
            horizon: 25,
            records: vec![
                ReturnRecord {
                    date: d(2, 1),
                    close: 380.0,
                    forward_return: Some(0.02),
                },
                ReturnRecord {
                    date: d(3, 1),
                    close: 390.0,
                    forward_return: None,
                },
            ],
        };

        let merged = left_join(&series, &returns);
        assert_eq!(merged.records.len(), 3);
        assert_eq!(merged.macro_columns, vec!["CPI", "10Y"]);

        let first = &merged.records[0];
        assert_eq!(first.values, vec![Some(1.0), Some(0.9)]);
        assert_eq!(first.close, None);
        assert_eq!(first.forward_return, None);

        assert_eq!(merged.records[1].forward_return, Some(0.02));
        assert_eq!(merged.records[2].close, Some(390.0));
        assert_eq!(merged.records[2].forward_return, None);
        assert_eq!(merged.records[2].values, vec![None, Some(1.4)]);
    }
}
