use std::collections::HashMap;
use log::{info, warn};
use crate::decoder::DecodedFrames;
use crate::error::ScopeError;
use super::expr::Expression;
use super::table::TimeSeriesTable;
use super::transform::Transform;
use super::{ChannelSource, ChannelSpec};
/// A column that was built with a fallback instead of its configured definition.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnIssue {
    /// Unknown transform key; the column holds the untransformed samples.
    TransformFailure {
        column: String,
        key: String,
        reason: String,
    },
    /// Expression did not parse or referenced an unknown column; the column is all zeros.
    ExpressionFailure {
        column: String,
        expression: String,
        reason: String,
    },
}
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuildReport {
    pub issues: Vec<ColumnIssue>,
    pub rows_before_filter: usize,
    pub rows_after_filter: usize,
}
/// Turn decoded frames into the channel table.
///
/// `raw_columns` names the interior frame columns in order. Channels are built in
/// declared order; then each channel's `filter_vals` removes rows, one channel
/// after another, each seeing only the rows earlier filters kept.
pub fn build_table(
    frames: &DecodedFrames,
    raw_columns: &[String],
    specs: &[ChannelSpec],
) -> Result<(TimeSeriesTable, BuildReport), ScopeError> {
    let rows = frames.len();
    let (frame_rows, frame_cols) = frames.samples.dim();
    if frame_cols != raw_columns.len() {
        return Err(ScopeError::FrameLayout {
            expected: raw_columns.len(),
            actual: frame_cols,
        });
    }
    if frame_rows != rows {
        return Err(ScopeError::FrameLayout {
            expected: rows,
            actual: frame_rows,
        });
    }
    // Each raw name owns one frame slot; a repeated name would shadow an earlier slot.
    if let Some((_, name)) = raw_columns
        .iter()
        .enumerate()
        .find(|(idx, name)| raw_columns[..*idx].contains(*name))
    {
        return Err(ScopeError::DuplicateColumn(name.clone()));
    }
    let raw: HashMap<&str, Vec<f64>> = raw_columns
        .iter()
        .zip(frames.samples.columns())
        .map(|(name, column)| (name.as_str(), column.iter().map(|&v| f64::from(v)).collect()))
        .collect();
    let mut report = BuildReport::default();
    let mut columns = Vec::with_capacity(specs.len());
    for (idx, spec) in specs.iter().enumerate() {
        let name = spec
            .output_name()
            .ok_or_else(|| {
                ScopeError::ConfigColumnMissing(format!("channel #{idx} resolves to no column name"))
            })?
            .to_string();
        let values = match &spec.source {
            ChannelSource::RawColumn(source) => {
                let samples = raw
                    .get(source.as_str())
                    .ok_or_else(|| ScopeError::ConfigColumnMissing(source.clone()))?;
                match spec.transform.as_deref() {
                    None => samples.clone(),
                    Some(key) => match Transform::parse(key) {
                        Ok(transform) => transform.apply_column(samples),
                        Err(err) => {
                            warn!("column '{name}': {err}; using untransformed samples");
                            report.issues.push(ColumnIssue::TransformFailure {
                                column: name.clone(),
                                key: key.to_string(),
                                reason: err.to_string(),
                            });
                            samples.clone()
                        }
                    },
                }
            }
            ChannelSource::Expression { text, .. } => {
                let evaluated = Expression::parse(text).and_then(|expr| {
                    expr.evaluate(rows, |col| raw.get(col).map(Vec::as_slice))
                });
                match evaluated {
                    Ok(values) => values,
                    Err(err) => {
                        warn!("column '{name}': cannot evaluate '{text}': {err}; filling zeros");
                        report.issues.push(ColumnIssue::ExpressionFailure {
                            column: name.clone(),
                            expression: text.clone(),
                            reason: err.to_string(),
                        });
                        vec![0.0; rows]
                    }
                }
            }
        };
        columns.push((name, values));
    }
    let mut table = TimeSeriesTable::new(frames.time.clone(), columns)?;
    report.rows_before_filter = table.len();
    apply_sentinel_filters(&mut table, specs);
    report.rows_after_filter = table.len();
    info!(
        "sentinel filtering: {} -> {} rows",
        report.rows_before_filter, report.rows_after_filter
    );
    Ok((table, report))
}
fn apply_sentinel_filters(table: &mut TimeSeriesTable, specs: &[ChannelSpec]) {
    for spec in specs.iter().filter(|s| !s.filter_vals.is_empty()) {
        let Some(name) = spec.output_name() else {
            continue;
        };
        let Some(values) = table.column(name) else {
            continue;
        };
        let keep: Vec<bool> = values
            .iter()
            .map(|v| !spec.filter_vals.contains(v))
            .collect();
        table.retain_rows(&keep);
    }
}
