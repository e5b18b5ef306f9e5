//! Upload ingestion: delimited text bytes into a named dataset.

use std::io::Cursor;

use color_eyre::Result;
use polars::prelude::*;

/// A loaded tabular dataset together with the name of the upload it came from.
///
/// Each context (exploration, conversation) owns its own `Dataset`; instances
/// are never shared between contexts.
#[derive(Clone, Debug)]
pub struct Dataset {
    pub name: String,
    pub frame: DataFrame,
}

impl Dataset {
    pub fn rows(&self) -> usize {
        self.frame.height()
    }

    pub fn columns(&self) -> usize {
        self.frame.width()
    }
}

/// Parses uploaded bytes as delimited text (header row, inferred schema) and
/// drops rows that are null in every column. Rows with at least one non-null
/// cell are kept unchanged.
///
/// Fails when the bytes cannot be decoded as tabular data; the caller keeps
/// its previous dataset in that case.
pub fn read_dataset(name: &str, bytes: Vec<u8>) -> Result<Dataset> {
    let df = CsvReadOptions::default()
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;
    let frame = drop_fully_null_rows(df)?;
    Ok(Dataset {
        name: name.to_string(),
        frame,
    })
}

/// Removes rows where every column is null. Per-cell nulls elsewhere are kept.
fn drop_fully_null_rows(df: DataFrame) -> Result<DataFrame> {
    if df.width() == 0 || df.height() == 0 {
        return Ok(df);
    }
    let columns = df.get_columns();
    let mut all_null = columns[0].is_null();
    for column in &columns[1..] {
        all_null = all_null & column.is_null();
    }
    Ok(df.filter(&!all_null)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv(text: &str) -> Vec<u8> {
        text.as_bytes().to_vec()
    }

    #[test]
    fn reads_csv_and_keeps_name() {
        let ds = read_dataset("people.csv", csv("age,income\n30,1000\n40,2000\n")).unwrap();
        assert_eq!(ds.name, "people.csv");
        assert_eq!(ds.rows(), 2);
        assert_eq!(ds.columns(), 2);
    }

    #[test]
    fn drops_rows_null_in_every_column() {
        let ds = read_dataset(
            "d.csv",
            csv("age,income,city\n30,1000,NY\n,,\n40,2000,LA\n,,\n"),
        )
        .unwrap();
        assert_eq!(ds.rows(), 2);
        let names: Vec<String> = ds
            .frame
            .get_columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, vec!["age", "income", "city"]);
    }

    #[test]
    fn keeps_partially_null_rows() {
        let ds = read_dataset("d.csv", csv("age,income\n30,\n,2000\n,\n")).unwrap();
        // Two rows each have one value; only the fully empty row is dropped.
        assert_eq!(ds.rows(), 2);
    }

    #[test]
    fn rejects_undecodable_bytes() {
        let result = read_dataset("bad.bin", vec![0xff, 0xfe, 0x00, 0x41, 0x2c, 0xff]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_empty_upload() {
        assert!(read_dataset("empty.csv", Vec::new()).is_err());
    }
}
