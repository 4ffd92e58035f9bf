use ndarray::{Array1, Axis};
use crate::config::ColumnGroup;
use crate::error::ScopeError;
use crate::viewport::AxisRange;
/// Name of the leading time column.
pub const TIME_COLUMN: &str = "Time(s)";
/// Time-indexed table: `Time(s)` followed by one column per channel.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeriesTable {
    time: Array1<f64>,
    names: Vec<String>,
    columns: Vec<Array1<f64>>,
}
impl TimeSeriesTable {
    pub fn new(time: Vec<f64>, columns: Vec<(String, Vec<f64>)>) -> Result<Self, ScopeError> {
        let rows = time.len();
        let mut names = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len());
        for (name, column) in columns {
            if column.len() != rows {
                return Err(ScopeError::FrameLayout {
                    expected: rows,
                    actual: column.len(),
                });
            }
            if name == TIME_COLUMN || names.contains(&name) {
                return Err(ScopeError::DuplicateColumn(name));
            }
            names.push(name);
            values.push(Array1::from(column));
        }
        Ok(Self {
            time: Array1::from(time),
            names,
            columns: values,
        })
    }
    pub fn len(&self) -> usize {
        self.time.len()
    }
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
    pub fn time(&self) -> &[f64] {
        self.time.as_slice().unwrap_or(&[])
    }
    /// Channel names in declared order, without the time column.
    pub fn channel_names(&self) -> &[String] {
        &self.names
    }
    /// Every column header, `Time(s)` first.
    pub fn column_names(&self) -> Vec<&str> {
        std::iter::once(TIME_COLUMN)
            .chain(self.names.iter().map(String::as_str))
            .collect()
    }
    pub fn has_column(&self, name: &str) -> bool {
        name == TIME_COLUMN || self.names.iter().any(|n| n == name)
    }
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        if name == TIME_COLUMN {
            return Some(self.time());
        }
        let idx = self.names.iter().position(|n| n == name)?;
        self.columns[idx].as_slice()
    }
    /// `(time, value)` pairs for a whole column.
    pub fn series(&self, name: &str) -> Option<Vec<[f64; 2]>> {
        let values = self.column(name)?;
        Some(self.time().iter().zip(values).map(|(&t, &v)| [t, v]).collect())
    }
    /// `(time, value)` pairs whose time lies inside `range`.
    pub fn points_in_range(&self, name: &str, range: AxisRange) -> Option<Vec<[f64; 2]>> {
        let values = self.column(name)?;
        Some(
            self.time()
                .iter()
                .zip(values)
                .filter(|(t, _)| range.contains(**t))
                .map(|(&t, &v)| [t, v])
                .collect(),
        )
    }
    /// Min and max of the finite values of `columns` for rows whose time lies
    /// inside `range`. `None` when no such value exists.
    pub fn value_bounds_in_range(&self, columns: &[String], range: AxisRange) -> Option<(f64, f64)> {
        let mut bounds: Option<(f64, f64)> = None;
        for name in columns {
            let Some(values) = self.column(name) else {
                continue;
            };
            for (&t, &v) in self.time().iter().zip(values) {
                if !range.contains(t) || !v.is_finite() {
                    continue;
                }
                bounds = Some(match bounds {
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                    None => (v, v),
                });
            }
        }
        bounds
    }
    /// Full time span, `None` for an empty table.
    pub fn time_span(&self) -> Option<AxisRange> {
        let first = *self.time().first()?;
        let last = *self.time().last()?;
        Some(AxisRange::new(first, last))
    }
    /// Keep only rows where `keep` is true.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        let indices: Vec<usize> = keep
            .iter()
            .enumerate()
            .filter_map(|(idx, &k)| k.then_some(idx))
            .collect();
        if indices.len() == self.len() {
            return;
        }
        self.time = self.time.select(Axis(0), &indices);
        for column in &mut self.columns {
            *column = column.select(Axis(0), &indices);
        }
    }
    /// Every column a plot group asks for must exist.
    pub fn validate_plot_columns(&self, groups: &[ColumnGroup]) -> Result<(), ScopeError> {
        let missing: Vec<&str> = groups
            .iter()
            .flat_map(|g| g.columns.iter())
            .filter(|name| !self.has_column(name))
            .map(String::as_str)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ScopeError::ConfigColumnMissing(missing.join(", ")))
        }
    }
}
