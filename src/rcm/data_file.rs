//! Reading of `(time, value)` sample pairs from delimited text files.
//!
//! Columns may be separated by commas, whitespace or both. Blank lines and lines starting
//! with `#` or `%` are ignored, as are non-numeric header lines above the first data row.

use crate::error::{Result, SimError};
use ndarray::prelude::*;
use std::path::Path;

/// Two aligned columns of samples, typically time `[s]` against pressure or volume.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSeries {
    time: Array1<f64>,
    values: Array1<f64>,
}

impl DataSeries {
    pub fn new(time: Array1<f64>, values: Array1<f64>) -> Result<DataSeries> {
        if time.len() != values.len() {
            return Err(SimError::Profile(format!(
                "columns must have the same length: {} != {}",
                time.len(),
                values.len()
            )));
        }
        Ok(DataSeries { time, values })
    }

    pub fn time(&self) -> &Array1<f64> {
        &self.time
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Returns a copy with every value multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> DataSeries {
        DataSeries {
            time: self.time.clone(),
            values: &self.values * factor,
        }
    }

    /// Returns a copy with every time shifted by `dt`
    pub fn shifted(&self, dt: f64) -> DataSeries {
        DataSeries {
            time: &self.time + dt,
            values: self.values.clone(),
        }
    }
}

pub fn read_two_columns(path: impl AsRef<Path>) -> Result<DataSeries> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|err| SimError::io(path, err))?;
    parse_two_columns(&text, &path.display().to_string())
}

/// Parses the first two columns of `text`. `source_name` only labels errors.
pub fn parse_two_columns(text: &str, source_name: &str) -> Result<DataSeries> {
    let mut time: Vec<f64> = Vec::new();
    let mut values: Vec<f64> = Vec::new();
    let error = |line: usize, message: String| SimError::DataFile {
        source_name: source_name.to_string(),
        line,
        message,
    };

    for (i, line) in text.lines().enumerate() {
        let line_number = i + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('%') {
            continue;
        }
        let fields: Vec<&str> = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect();

        let numbers: std::result::Result<Vec<f64>, _> =
            fields.iter().take(2).map(|f| f.parse::<f64>()).collect();
        match numbers {
            Ok(numbers) if numbers.len() == 2 => {
                time.push(numbers[0]);
                values.push(numbers[1]);
            }
            Ok(_) => {
                return Err(error(
                    line_number,
                    format!("expected two columns, found {}", fields.len()),
                ));
            }
            Err(_) if time.is_empty() => {
                tracing::debug!("{}: skipping header line {}", source_name, line_number);
            }
            Err(err) => {
                return Err(error(line_number, format!("unable to parse `{}`: {}", trimmed, err)));
            }
        }
    }

    if time.is_empty() {
        return Err(error(0, "no data rows found".to_string()));
    }
    DataSeries::new(Array1::from(time), Array1::from(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn mixed_delimiters_and_comments() {
        let text = "# volume trace\n\
                    time [s], volume [cm3]\n\
                    0.0, 1.0\n\
                    \n\
                    0.001\t0.9\n\
                    0.002 ,  0.8 , extra\n\
                    % trailing comment\n";
        let data = parse_two_columns(text, "trace").unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data.time(), &array![0.0, 0.001, 0.002]);
        assert_eq!(data.values(), &array![1.0, 0.9, 0.8]);
    }

    #[test]
    fn bad_row_after_data_reports_line() {
        let text = "0.0 1.0\n0.1 oops\n";
        match parse_two_columns(text, "trace") {
            Err(SimError::DataFile { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn single_column_is_an_error() {
        assert!(matches!(
            parse_two_columns("0.0\n", "trace"),
            Err(SimError::DataFile { line: 1, .. })
        ));
    }

    #[test]
    fn empty_file_is_an_error() {
        assert!(parse_two_columns("# nothing\n\n", "trace").is_err());
    }

    #[test]
    fn reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0.0,2.0\n1.0,4.0").unwrap();
        let data = read_two_columns(file.path()).unwrap();
        assert_eq!(data.values(), &array![2.0, 4.0]);
        assert!(matches!(
            read_two_columns(file.path().with_extension("missing")),
            Err(SimError::Io { .. })
        ));
    }

    #[test]
    fn scaled_and_shifted() {
        let data = DataSeries::new(array![0.0, 1.0], array![1.0, 2.0]).unwrap();
        assert_eq!(data.scaled(1e5).values(), &array![1e5, 2e5]);
        assert_eq!(data.shifted(-0.5).time(), &array![-0.5, 0.5]);
    }
}
