#![forbid(unsafe_code)]

use crate::error::FrameError;
use crate::stats::{ColumnSummary, Moments, StatsProvider};
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq)]
struct Column {
    name: String,
    values: Vec<Value>,
}

/// An in-memory table: an ordered collection of named, equal-length columns.
///
/// Column order is insertion order and defines display and serialization
/// order. Row identity is purely positional: row `i` is the tuple of the
/// `i`-th cell of every column.
///
/// Mutability follows a builder-like asymmetry: [`set_column`] mutates the
/// receiver in place, every other operation leaves the receiver untouched
/// and returns a new frame that shares no storage with it.
///
/// [`set_column`]: DataFrame::set_column
#[derive(Clone, Debug, PartialEq)]
pub struct DataFrame {
    columns: Vec<Column>,
    rows: usize,
}

impl DataFrame {
    /// Build a frame from `(name, values)` pairs, in order.
    ///
    /// Requires at least one column and unique names. The row count is
    /// derived from the **first** column; the remaining lengths are not
    /// cross-checked here, so callers own that invariant (a frame built
    /// from unequal columns will misbehave). Debug builds assert the
    /// lengths agree.
    pub fn from_columns<I, N>(columns: I) -> Result<DataFrame, FrameError>
    where
        I: IntoIterator<Item = (N, Vec<Value>)>,
        N: Into<String>,
    {
        let columns: Vec<Column> = columns
            .into_iter()
            .map(|(name, values)| Column {
                name: name.into(),
                values,
            })
            .collect();

        let Some(first) = columns.first() else {
            return Err(FrameError::malformed("a frame needs at least one column"));
        };
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == col.name) {
                return Err(FrameError::malformed(format!(
                    "duplicate column name `{}`",
                    col.name
                )));
            }
        }

        let rows = first.values.len();
        debug_assert!(
            columns.iter().all(|c| c.values.len() == rows),
            "columns must share one length"
        );
        Ok(DataFrame { columns, rows })
    }

    /// `(row_count, column_count)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns.len())
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// The cell sequence of one column.
    pub fn values(&self, name: &str) -> Result<&[Value], FrameError> {
        let idx = self.require(name)?;
        Ok(&self.columns[idx].values)
    }

    /// Positional cell access; `None` out of bounds.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Value> {
        self.columns.get(col)?.values.get(row)
    }

    fn col_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    fn require(&self, name: &str) -> Result<usize, FrameError> {
        self.col_index(name)
            .ok_or_else(|| FrameError::UnknownColumn(name.to_owned()))
    }

    /// Insert or replace a column in place.
    ///
    /// Fails with [`FrameError::ShapeMismatch`] when `values` disagrees with
    /// the current row count, leaving the frame unchanged. A new name is
    /// appended at the end; an existing name keeps its position.
    pub fn set_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<Value>,
    ) -> Result<(), FrameError> {
        if values.len() != self.rows {
            return Err(FrameError::ShapeMismatch {
                expected: self.rows,
                got: values.len(),
            });
        }
        let name = name.into();
        match self.col_index(&name) {
            Some(idx) => self.columns[idx].values = values,
            None => self.columns.push(Column { name, values }),
        }
        self.rows = self.columns[0].values.len();
        Ok(())
    }

    /// Single-column projection: a new one-column frame holding a copy of
    /// that column's cells.
    pub fn column(&self, name: &str) -> Result<DataFrame, FrameError> {
        let idx = self.require(name)?;
        Ok(DataFrame {
            columns: vec![self.columns[idx].clone()],
            rows: self.rows,
        })
    }

    /// Reduce every column to one scalar, producing a single-row frame.
    ///
    /// Missing cells are skipped: `Sum` adds the cells that are present, and
    /// `Mean` divides by the count of present cells. Text cells fail with
    /// [`FrameError::NonNumeric`]. An all-missing column reduces to
    /// [`Value::Missing`]. All-integer sums stay integers; any float
    /// promotes the result.
    pub fn agg(&self, kind: AggKind) -> Result<DataFrame, FrameError> {
        let mut out = Vec::with_capacity(self.columns.len());
        for col in &self.columns {
            let fold = NumericFold::over(&col.values).map_err(|_| FrameError::NonNumeric {
                column: col.name.clone(),
            })?;
            let value = match kind {
                AggKind::Sum => fold.sum(),
                AggKind::Mean => fold.mean(),
            };
            out.push(Column {
                name: col.name.clone(),
                values: vec![value],
            });
        }
        Ok(DataFrame {
            columns: out,
            rows: 1,
        })
    }

    /// Retain the rows whose cell in `column` satisfies `predicate`.
    ///
    /// Every column keeps only the retained positions, in the original
    /// order. A result with zero rows still carries every column.
    pub fn filter<F>(&self, column: &str, predicate: F) -> Result<DataFrame, FrameError>
    where
        F: Fn(&Value) -> bool,
    {
        let idx = self.require(column)?;
        let keep: Vec<usize> = self.columns[idx]
            .values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| predicate(v).then_some(i))
            .collect();
        Ok(self.take_rows(&keep))
    }

    /// Reorder rows by the `by` column under [`Value::total_cmp`].
    ///
    /// The sort is stable: rows with equal keys keep their relative order,
    /// ascending or descending. No row is ever dropped; missing cells sort
    /// after every present value (first under `descending`).
    pub fn sort_values(&self, by: &str, ascending: bool) -> Result<DataFrame, FrameError> {
        let idx = self.require(by)?;
        let keys = &self.columns[idx].values;
        let mut order: Vec<usize> = (0..self.rows).collect();
        order.sort_by(|&a, &b| {
            let ord = keys[a].total_cmp(&keys[b]);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
        Ok(self.take_rows(&order))
    }

    /// Distinct values per column, in first-appearance order.
    ///
    /// This is a column-wise unique-value summary, **not** a row-wise
    /// deduplication: each requested column is reduced independently, so no
    /// row correspondence survives and the summarized columns may have
    /// different lengths. The result is therefore a [`DistinctSummary`]
    /// rather than a frame.
    pub fn drop_duplicates(&self, by: Option<&[&str]>) -> Result<DistinctSummary, FrameError> {
        let names: Vec<&str> = match by {
            Some(names) => names.to_vec(),
            None => self.columns.iter().map(|c| c.name.as_str()).collect(),
        };
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let idx = self.require(name)?;
            let mut distinct: Vec<Value> = Vec::new();
            for value in &self.columns[idx].values {
                if !distinct.contains(value) {
                    distinct.push(value.clone());
                }
            }
            columns.push((name.to_owned(), distinct));
        }
        Ok(DistinctSummary { columns })
    }

    /// `{mean, median, std}` for every column, in column order, using the
    /// default [`Moments`] provider.
    pub fn describe(&self) -> Result<Vec<(String, ColumnSummary)>, FrameError> {
        self.describe_with(&Moments)
    }

    /// [`describe`](DataFrame::describe) with an explicit statistics
    /// provider.
    pub fn describe_with(
        &self,
        stats: &dyn StatsProvider,
    ) -> Result<Vec<(String, ColumnSummary)>, FrameError> {
        self.columns
            .iter()
            .map(|col| Ok((col.name.clone(), summarize(col, stats)?)))
            .collect()
    }

    /// `{mean, median, std}` for one column.
    pub fn describe_column(&self, name: &str) -> Result<ColumnSummary, FrameError> {
        self.describe_column_with(name, &Moments)
    }

    pub fn describe_column_with(
        &self,
        name: &str,
        stats: &dyn StatsProvider,
    ) -> Result<ColumnSummary, FrameError> {
        let idx = self.require(name)?;
        summarize(&self.columns[idx], stats)
    }

    /// Apply `f` element-wise.
    ///
    /// With a column name, only that column is transformed and every other
    /// column is copied unchanged; without one, every column is
    /// transformed. The result shares no storage with the receiver.
    pub fn apply<F>(&self, f: F, column: Option<&str>) -> Result<DataFrame, FrameError>
    where
        F: Fn(&Value) -> Value,
    {
        match column {
            Some(name) => {
                let idx = self.require(name)?;
                let mut columns = self.columns.clone();
                let transformed: Vec<Value> = columns[idx].values.iter().map(|v| f(v)).collect();
                columns[idx].values = transformed;
                Ok(DataFrame {
                    columns,
                    rows: self.rows,
                })
            }
            None => {
                let columns = self
                    .columns
                    .iter()
                    .map(|col| Column {
                        name: col.name.clone(),
                        values: col.values.iter().map(|v| f(v)).collect(),
                    })
                    .collect();
                Ok(DataFrame {
                    columns,
                    rows: self.rows,
                })
            }
        }
    }

    /// Retain only the rows with no missing cell in any column.
    pub fn dropna(&self) -> DataFrame {
        let keep: Vec<usize> = (0..self.rows)
            .filter(|&i| self.columns.iter().all(|c| !c.values[i].is_missing()))
            .collect();
        self.take_rows(&keep)
    }

    /// Replace every missing cell, in every column, with `value`.
    pub fn fillna(&self, value: Value) -> DataFrame {
        let columns = self
            .columns
            .iter()
            .map(|col| Column {
                name: col.name.clone(),
                values: col
                    .values
                    .iter()
                    .map(|v| {
                        if v.is_missing() {
                            value.clone()
                        } else {
                            v.clone()
                        }
                    })
                    .collect(),
            })
            .collect();
        DataFrame {
            columns,
            rows: self.rows,
        }
    }

    /// Apply a row selection/permutation to every column identically.
    fn take_rows(&self, rows: &[usize]) -> DataFrame {
        let columns = self
            .columns
            .iter()
            .map(|col| Column {
                name: col.name.clone(),
                values: rows.iter().map(|&i| col.values[i].clone()).collect(),
            })
            .collect();
        DataFrame {
            columns,
            rows: rows.len(),
        }
    }

    /// Append the rows of `other`, which must carry the same columns in the
    /// same order. Used by the columnar readers to stitch batches together.
    #[cfg(feature = "arrow")]
    pub(crate) fn append_rows(&mut self, other: DataFrame) -> Result<(), FrameError> {
        let same_schema = self.columns.len() == other.columns.len()
            && self
                .columns
                .iter()
                .zip(&other.columns)
                .all(|(a, b)| a.name == b.name);
        if !same_schema {
            return Err(FrameError::malformed(
                "cannot append rows: column names differ",
            ));
        }
        self.rows += other.rows;
        for (col, mut incoming) in self.columns.iter_mut().zip(other.columns) {
            col.values.append(&mut incoming.values);
        }
        Ok(())
    }
}

fn summarize(col: &Column, stats: &dyn StatsProvider) -> Result<ColumnSummary, FrameError> {
    let mut sample = Vec::with_capacity(col.values.len());
    for value in &col.values {
        match value {
            Value::Missing => {}
            other => {
                sample.push(other.as_f64().ok_or_else(|| FrameError::NonNumeric {
                    column: col.name.clone(),
                })?);
            }
        }
    }
    if sample.is_empty() {
        return Err(FrameError::EmptyColumn {
            column: col.name.clone(),
        });
    }
    Ok(ColumnSummary {
        mean: stats.mean(&sample),
        median: stats.median(&sample),
        std: stats.std(&sample),
    })
}

/// Recognized aggregation kinds. The kinds are data: adding one means adding
/// a variant and its fold, not editing control flow at call sites.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggKind {
    Sum,
    Mean,
}

/// Parses the textual spellings `"sum"` and `"mean"`; anything else fails
/// with [`FrameError::UnsupportedAggregation`].
impl FromStr for AggKind {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sum" => Ok(AggKind::Sum),
            "mean" => Ok(AggKind::Mean),
            other => Err(FrameError::UnsupportedAggregation(other.to_owned())),
        }
    }
}

/// One pass over a column's numeric view: sum plus present-cell count, with
/// the accumulator staying integral until a float shows up.
enum Acc {
    Empty,
    Int(i64),
    Float(f64),
}

struct NumericFold {
    acc: Acc,
    count: usize,
}

impl NumericFold {
    /// Folds the column, skipping missing cells. `Err(())` on text.
    fn over(values: &[Value]) -> Result<NumericFold, ()> {
        let mut acc = Acc::Empty;
        let mut count = 0usize;
        for value in values {
            match value {
                Value::Missing => {}
                Value::Int(v) => {
                    count += 1;
                    acc = match acc {
                        Acc::Empty => Acc::Int(*v),
                        // Overflowing integer sums promote to float rather
                        // than wrap.
                        Acc::Int(sum) => match sum.checked_add(*v) {
                            Some(sum) => Acc::Int(sum),
                            None => Acc::Float(sum as f64 + *v as f64),
                        },
                        Acc::Float(sum) => Acc::Float(sum + *v as f64),
                    };
                }
                Value::Float(v) => {
                    count += 1;
                    acc = match acc {
                        Acc::Empty => Acc::Float(*v),
                        Acc::Int(sum) => Acc::Float(sum as f64 + *v),
                        Acc::Float(sum) => Acc::Float(sum + *v),
                    };
                }
                Value::Text(_) => return Err(()),
            }
        }
        Ok(NumericFold { acc, count })
    }

    fn sum(&self) -> Value {
        match self.acc {
            Acc::Empty => Value::Missing,
            Acc::Int(v) => Value::Int(v),
            Acc::Float(v) => Value::Float(v),
        }
    }

    fn mean(&self) -> Value {
        match self.acc {
            Acc::Empty => Value::Missing,
            Acc::Int(v) => Value::Float(v as f64 / self.count as f64),
            Acc::Float(v) => Value::Float(v / self.count as f64),
        }
    }
}

/// The result of [`DataFrame::drop_duplicates`]: per-column distinct values
/// with no row alignment between columns.
#[derive(Clone, Debug, PartialEq)]
pub struct DistinctSummary {
    columns: Vec<(String, Vec<Value>)>,
}

impl DistinctSummary {
    /// Summarized column names, in request order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Distinct values of one column, in first-appearance order.
    pub fn values(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }
}

/// Plain-text rendering: header, dash rule, one line per row, dash rule,
/// then a `N rows and M columns.` summary line.
impl fmt::Display for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self
            .columns
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(" | ");
        let rule = "-".repeat(header.len());
        writeln!(f, "{header}")?;
        writeln!(f, "{rule}")?;
        for row in 0..self.rows {
            let line = self
                .columns
                .iter()
                .map(|c| c.values[row].to_string())
                .collect::<Vec<_>>()
                .join(" | ");
            writeln!(f, "{line}")?;
        }
        writeln!(f, "{rule}")?;
        write!(
            f,
            "{} rows and {} columns.",
            self.rows,
            self.columns.len()
        )
    }
}
