use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use ndarray::Array2;
use thiserror::Error;

/// An error when loading a sample file
#[derive(Error, Debug)]
pub enum SampleError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// When the file holds no data rows at all
    #[error("the sample file contains no data rows")]
    Empty,
    /// When a row's field count disagrees with the first row's
    #[error("row {row} has {found} fields, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// When a field does not parse as a number
    #[error("row {row}: {value:?} is not a number")]
    Parse { row: usize, value: String },
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

/// Read a delimited sample file into a `(n_points, n_features)` matrix.
///
/// Every line is one point; the number of features is fixed by the first
/// data line. The delimiter is sniffed from that line: comma, tab, or runs
/// of spaces. No header line is expected.
pub fn read_sample<P: AsRef<Path>>(path: P) -> Result<Array2<f64>, SampleError> {
    sample_from_reader(File::open(path)?)
}

/// Like [`read_sample`], but parses any reader.
pub fn sample_from_reader<R: Read>(mut reader: R) -> Result<Array2<f64>, SampleError> {
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;

    let first = contents
        .lines()
        .find(|line| !line.trim().is_empty())
        .ok_or(SampleError::Empty)?;
    let delimiter = if first.contains(',') {
        b','
    } else if first.contains('\t') {
        b'\t'
    } else {
        b' '
    };

    let mut values: Vec<f64> = Vec::new();
    let mut n_features = 0;
    let mut n_rows = 0;

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(contents.as_bytes());
    for record in csv_reader.records() {
        let record = record?;
        // A run of spaces produces empty fields; they carry no value.
        let fields: Vec<&str> = if delimiter == b' ' {
            record.iter().filter(|field| !field.is_empty()).collect()
        } else {
            record.iter().collect()
        };
        if fields.iter().all(|field| field.is_empty()) {
            continue;
        }

        if n_features == 0 {
            n_features = fields.len();
        }
        if fields.len() != n_features {
            return Err(SampleError::Ragged {
                row: n_rows + 1,
                expected: n_features,
                found: fields.len(),
            });
        }
        for field in fields {
            values.push(field.parse::<f64>().map_err(|_| SampleError::Parse {
                row: n_rows + 1,
                value: field.to_string(),
            })?);
        }
        n_rows += 1;
    }

    if n_rows == 0 {
        return Err(SampleError::Empty);
    }
    Ok(Array2::from_shape_vec((n_rows, n_features), values)?)
}
