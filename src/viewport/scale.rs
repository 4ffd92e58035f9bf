use crate::channel::TimeSeriesTable;
use super::surface::AxisRange;
/// Fraction of the data span added above and below.
const PAD_FRACTION: f64 = 0.1;
/// Vertical range covering `columns` over the rows whose time lies in `x_range`.
///
/// Returns `None` when no row is visible, leaving the pane as it is. A flat
/// signal gets a span of a tenth of its magnitude, or one unit when it sits at zero.
pub fn auto_y_range(
    table: &TimeSeriesTable,
    columns: &[String],
    x_range: AxisRange,
) -> Option<AxisRange> {
    let (min, max) = table.value_bounds_in_range(columns, x_range)?;
    Some(padded(min, max))
}
pub fn padded(min: f64, max: f64) -> AxisRange {
    let mut span = max - min;
    if span == 0.0 {
        span = min.abs() * 0.1;
    }
    if span == 0.0 {
        span = 1.0;
    }
    AxisRange::new(min - span * PAD_FRACTION, max + span * PAD_FRACTION)
}
