#![forbid(unsafe_code)]

//! Row-oriented (CSV) boundary conversions.
//!
//! The first row is always the header: column names in frame order. Each
//! data cell is coerced independently via [`Value::parse`], so a column fed
//! inconsistent text ends up mixed-typed (documented limitation of the
//! format, not repaired here).

use crate::error::FrameError;
use crate::frame::DataFrame;
use crate::value::Value;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Export the frame as text rows: the header first, then one row of
/// [`Display`](std::fmt::Display)-rendered cells per table row.
pub fn to_rows(frame: &DataFrame) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(frame.row_count() + 1);
    rows.push(frame.column_names().map(str::to_owned).collect());
    for row in 0..frame.row_count() {
        rows.push(
            (0..frame.column_count())
                .map(|col| {
                    frame
                        .cell(row, col)
                        .map(ToString::to_string)
                        .unwrap_or_default()
                })
                .collect(),
        );
    }
    rows
}

/// Import text rows. The first row is the header; every following row must
/// have exactly the header's width, else [`FrameError::Malformed`].
pub fn from_rows<I>(rows: I) -> Result<DataFrame, FrameError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut rows = rows.into_iter();
    let header = rows
        .next()
        .ok_or_else(|| FrameError::malformed("input has no header row"))?;
    let mut builder = RowsBuilder::new(header);
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        builder.push_cells(&cells)?;
    }
    builder.finish()
}

/// Stream the frame out as CSV.
pub fn write_csv_to<W: io::Write>(frame: &DataFrame, writer: W) -> Result<(), FrameError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(frame.column_names())
        .map_err(map_csv_error)?;
    for row in 0..frame.row_count() {
        let record: Vec<String> = (0..frame.column_count())
            .map(|col| {
                frame
                    .cell(row, col)
                    .map(ToString::to_string)
                    .unwrap_or_default()
            })
            .collect();
        wtr.write_record(&record).map_err(map_csv_error)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Parse a CSV stream into a frame, with the same header/width/coercion
/// contract as [`from_rows`].
pub fn read_csv_from<R: io::Read>(reader: R) -> Result<DataFrame, FrameError> {
    let mut rdr = csv::ReaderBuilder::new()
        // Headers are handled manually so row accounting stays uniform
        // between this path and `from_rows`.
        .has_headers(false)
        // Width violations are reported by the builder with row positions
        // instead of the csv crate's record-level error.
        .flexible(true)
        .from_reader(reader);

    let mut record = csv::StringRecord::new();
    let has_header = rdr.read_record(&mut record).map_err(map_csv_error)?;
    if !has_header {
        return Err(FrameError::malformed("csv input was empty"));
    }
    let mut builder = RowsBuilder::new(record.iter().map(str::to_owned).collect());
    while rdr.read_record(&mut record).map_err(map_csv_error)? {
        let cells: Vec<&str> = record.iter().collect();
        builder.push_cells(&cells)?;
    }
    builder.finish()
}

/// Write the frame to a CSV file.
///
/// The bytes go to a sibling temporary file first and are renamed into
/// place, so a failed export never leaves a partially written file at
/// `path`.
pub fn write_csv(frame: &DataFrame, path: impl AsRef<Path>) -> Result<(), FrameError> {
    let path = path.as_ref();
    let tmp = temp_sibling(path);
    let written = fs::File::create(&tmp)
        .map_err(FrameError::from)
        .and_then(|file| write_csv_to(frame, file));
    match written {
        Ok(()) => {
            fs::rename(&tmp, path)?;
            Ok(())
        }
        Err(err) => {
            let _ = fs::remove_file(&tmp);
            Err(err)
        }
    }
}

/// Read a CSV file into a frame.
pub fn read_csv(path: impl AsRef<Path>) -> Result<DataFrame, FrameError> {
    read_csv_from(fs::File::open(path)?)
}

impl DataFrame {
    /// See [`write_csv`].
    pub fn to_csv(&self, path: impl AsRef<Path>) -> Result<(), FrameError> {
        write_csv(self, path)
    }

    /// See [`read_csv`].
    pub fn from_csv(path: impl AsRef<Path>) -> Result<DataFrame, FrameError> {
        read_csv(path)
    }
}

struct RowsBuilder {
    names: Vec<String>,
    columns: Vec<Vec<Value>>,
    /// 1-based position of the last consumed row (the header is row 1).
    row: u64,
}

impl RowsBuilder {
    fn new(names: Vec<String>) -> Self {
        let columns = names.iter().map(|_| Vec::new()).collect();
        Self {
            names,
            columns,
            row: 1,
        }
    }

    fn push_cells(&mut self, cells: &[&str]) -> Result<(), FrameError> {
        self.row += 1;
        if cells.len() != self.names.len() {
            return Err(FrameError::malformed(format!(
                "row {} has {} cells, expected {}",
                self.row,
                cells.len(),
                self.names.len()
            )));
        }
        for (column, cell) in self.columns.iter_mut().zip(cells) {
            column.push(Value::parse(cell));
        }
        Ok(())
    }

    fn finish(self) -> Result<DataFrame, FrameError> {
        for (name, values) in self.names.iter().zip(&self.columns) {
            let has_text = values.iter().any(|v| matches!(v, Value::Text(_)));
            let has_number = values
                .iter()
                .any(|v| matches!(v, Value::Int(_) | Value::Float(_)));
            if has_text && has_number {
                log::warn!("column `{name}` coerced to mixed numeric and text cells");
            }
        }
        DataFrame::from_columns(self.names.into_iter().zip(self.columns))
    }
}

fn map_csv_error(err: csv::Error) -> FrameError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => FrameError::Io(e),
        _ => FrameError::Malformed { reason: message },
    }
}

pub(crate) fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("table"));
    name.push(".tmp");
    path.with_file_name(name)
}
