//! Export a transformed table to CSV.
//!
//! One `date` column followed by one column per series, headed by the series
//! id. Missing values are written as empty cells so spreadsheets read them as
//! blanks.

use std::path::Path;

use crate::data::SeriesTable;
use crate::error::AppError;

/// Write `table` to a CSV file.
pub fn write_table_csv(path: &Path, table: &SeriesTable) -> Result<(), AppError> {
    let csv_err = |e: csv::Error| AppError::io(format!("failed to write export CSV '{}'", path.display()), e.into());

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;

    let mut header = vec!["date".to_string()];
    header.extend(table.columns().iter().map(|c| c.id.clone()));
    writer.write_record(&header).map_err(csv_err)?;

    for (row, date) in table.dates().iter().enumerate() {
        let mut record = vec![date.to_string()];
        record.extend(
            table
                .columns()
                .iter()
                .map(|c| c.values[row].map(|v| format!("{v:.6}")).unwrap_or_default()),
        );
        writer.write_record(&record).map_err(csv_err)?;
    }

    writer
        .flush()
        .map_err(|e| AppError::io(format!("failed to flush export CSV '{}'", path.display()), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::Column;

    #[test]
    fn writes_header_and_blank_missing_cells() {
        let dates = vec![
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        ];
        let table = SeriesTable::from_columns(
            dates,
            vec![
                Column { id: "UNRATE".to_string(), values: vec![Some(3.7), None] },
                Column { id: "U6RATE".to_string(), values: vec![None, Some(7.25)] },
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_table_csv(&path, &table).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "date,UNRATE,U6RATE\n2024-01-01,3.700000,\n2024-02-01,,7.250000\n"
        );
    }
}
