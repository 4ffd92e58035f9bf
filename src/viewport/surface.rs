use std::rc::Rc;
/// Closed interval on one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisRange {
    pub start: f64,
    pub end: f64,
}
impl AxisRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
    pub fn span(&self) -> f64 {
        self.end - self.start
    }
    pub fn contains(&self, value: f64) -> bool {
        self.start <= value && value <= self.end
    }
    /// Equal up to a tiny fraction of the span; used to tell real pans from float noise.
    pub fn approx_eq(&self, other: &AxisRange) -> bool {
        let tolerance = self.span().abs().max(other.span().abs()).max(f64::MIN_POSITIVE) * 1e-9;
        (self.start - other.start).abs() <= tolerance && (self.end - other.end).abs() <= tolerance
    }
}
/// Major and minor grid spacing for the time axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickIntervals {
    pub major: f64,
    pub minor: f64,
}
/// Callback a surface invokes when its visible time range changed.
pub type RangeListener = Rc<dyn Fn()>;
/// What the synchronisation core needs from one chart pane.
pub trait ViewportSurface {
    fn visible_x_range(&self) -> AxisRange;
    fn set_visible_x_range(&mut self, range: AxisRange);
    fn set_visible_y_range(&mut self, range: AxisRange);
    fn set_tick_intervals(&mut self, ticks: TickIntervals);
    fn register_range_listener(&mut self, listener: RangeListener);
}
