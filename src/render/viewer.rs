// src/render/viewer.rs
use std::collections::HashMap;
use std::rc::Rc;
use eframe::egui;
use egui::Color32;
use egui_plot::{uniform_grid_spacer, Legend, Line, Plot, PlotBounds, PlotPoints};
use log::info;
use crate::channel::TimeSeriesTable;
use crate::config::DrawConfig;
use crate::error::ScopeError;
use crate::viewport::{
    AxisRange, GridLayout, RangeListener, TickIntervals, ViewportGroup, ViewportId,
    ViewportSurface,
};
use super::{RenderStyle, TIME_AXIS_LABEL};
/// State of one egui plot pane between frames.
pub struct PlotPane {
    title: String,
    columns: Vec<String>,
    x_label: bool,
    x: AxisRange,
    y: AxisRange,
    ticks: TickIntervals,
    // Ranges changed by the group and not yet pushed into the plot.
    dirty: bool,
    listener: Option<RangeListener>,
}
struct PaneView {
    title: String,
    columns: Vec<String>,
    x_label: bool,
    ticks: TickIntervals,
    apply: Option<(AxisRange, AxisRange)>,
}
impl PlotPane {
    pub fn new(title: impl Into<String>, columns: Vec<String>, x_label: bool) -> Self {
        Self {
            title: title.into(),
            columns,
            x_label,
            x: AxisRange::new(0.0, 1.0),
            y: AxisRange::new(0.0, 1.0),
            ticks: TickIntervals {
                major: 1.0,
                minor: 0.5,
            },
            dirty: true,
            listener: None,
        }
    }
    pub fn x_range(&self) -> AxisRange {
        self.x
    }
    pub fn y_range(&self) -> AxisRange {
        self.y
    }
    pub fn ticks(&self) -> TickIntervals {
        self.ticks
    }
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
    fn take_view(&mut self) -> PaneView {
        let apply = self.dirty.then_some((self.x, self.y));
        self.dirty = false;
        PaneView {
            title: self.title.clone(),
            columns: self.columns.clone(),
            x_label: self.x_label,
            ticks: self.ticks,
            apply,
        }
    }
    /// Record where the user left the plot. Returns the listener to call when the
    /// time range actually moved; the caller invokes it outside the group borrow.
    pub fn observe_bounds(&mut self, x: AxisRange, y: AxisRange) -> Option<RangeListener> {
        if x.approx_eq(&self.x) {
            return None;
        }
        self.x = x;
        self.y = y;
        self.listener.clone()
    }
}
impl ViewportSurface for PlotPane {
    fn visible_x_range(&self) -> AxisRange {
        self.x
    }
    fn set_visible_x_range(&mut self, range: AxisRange) {
        self.x = range;
        self.dirty = true;
    }
    fn set_visible_y_range(&mut self, range: AxisRange) {
        self.y = range;
        self.dirty = true;
    }
    fn set_tick_intervals(&mut self, ticks: TickIntervals) {
        self.ticks = ticks;
    }
    fn register_range_listener(&mut self, listener: RangeListener) {
        self.listener = Some(listener);
    }
}
/// Grid of linked plot panes over one table.
pub struct ScopeApp {
    group: Rc<ViewportGroup<PlotPane>>,
    layout: GridLayout,
    series: HashMap<String, Vec<[f64; 2]>>,
    colors: Vec<Color32>,
    line_width: f32,
}
impl ScopeApp {
    pub fn new(
        table: TimeSeriesTable,
        draw: &DrawConfig,
        style: &RenderStyle,
    ) -> Result<Self, ScopeError> {
        table.validate_plot_columns(&draw.column_groups)?;
        let table = Rc::new(table);
        let group = ViewportGroup::new(Rc::clone(&table), draw.xaxis_interval);
        let layout = GridLayout::new(draw.column_groups.len(), draw.cols_per_row);
        // Cells come back in group order, so ViewportId(i) shows column_groups[i].
        for cell in layout.cells() {
            let spec = &draw.column_groups[cell.index];
            let pane = PlotPane::new(spec.title(), spec.columns.clone(), cell.x_label);
            let pinned = spec.yaxis.map(|[lo, hi]| AxisRange::new(lo, hi));
            group.register(pane, spec.columns.clone(), pinned)?;
        }
        let series = draw
            .column_groups
            .iter()
            .flat_map(|g| g.columns.iter())
            .filter_map(|name| table.series(name).map(|points| (name.clone(), points)))
            .collect();
        let colors = (0..style.palette.len().max(1))
            .map(|idx| {
                let c = style.series_color(idx);
                Color32::from_rgb(c.0, c.1, c.2)
            })
            .collect();
        info!(
            "viewer: {} panes in a {}x{} grid",
            layout.plots(),
            layout.rows,
            layout.cols
        );
        Ok(Self {
            group,
            layout,
            series,
            colors,
            line_width: style.line_width,
        })
    }
    pub fn group(&self) -> &Rc<ViewportGroup<PlotPane>> {
        &self.group
    }
    fn show_pane(&self, ui: &mut egui::Ui, id: ViewportId, height: f32) {
        let Some(view) = self.group.with_surface(id, PlotPane::take_view) else {
            return;
        };
        let ticks = view.ticks;
        let mut plot = Plot::new(("framescope_pane", id.0))
            .height(height)
            .allow_zoom([true, false])
            .allow_drag([true, false])
            .allow_scroll(false)
            .x_grid_spacer(uniform_grid_spacer(move |_| {
                [ticks.minor, ticks.major, ticks.major * 5.0]
            }))
            .y_axis_label(view.title.clone());
        if view.x_label {
            plot = plot.x_axis_label(TIME_AXIS_LABEL);
        }
        if view.columns.len() > 1 {
            plot = plot.legend(Legend::default());
        }
        let response = plot.show(ui, |plot_ui| {
            if let Some((x, y)) = view.apply {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [x.start, y.start],
                    [x.end, y.end],
                ));
            }
            for (idx, column) in view.columns.iter().enumerate() {
                if let Some(points) = self.series.get(column) {
                    plot_ui.line(
                        Line::new(PlotPoints::new(points.clone()))
                            .name(column)
                            .color(self.colors[idx % self.colors.len()])
                            .width(self.line_width),
                    );
                }
            }
        });
        let bounds = response.transform.bounds();
        let x = AxisRange::new(bounds.min()[0], bounds.max()[0]);
        let y = AxisRange::new(bounds.min()[1], bounds.max()[1]);
        let listener = self
            .group
            .with_surface(id, |pane| pane.observe_bounds(x, y))
            .flatten();
        if let Some(listener) = listener {
            listener();
            ui.ctx().request_repaint();
        }
    }
}
impl eframe::App for ScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.layout.plots() == 0 {
                ui.label("No column groups configured.");
                return;
            }
            let spacing = ui.spacing().item_spacing.y;
            let height =
                (ui.available_height() / self.layout.rows as f32 - spacing).max(80.0);
            ui.columns(self.layout.cols, |columns| {
                for (col, ui) in columns.iter_mut().enumerate() {
                    for cell in self.layout.column(col) {
                        self.show_pane(ui, ViewportId(cell.index), height);
                    }
                }
            });
        });
    }
}
/// Open the interactive viewer and block until its window closes.
pub fn launch(table: TimeSeriesTable, draw: &DrawConfig, style: RenderStyle) -> Result<(), ScopeError> {
    let app = ScopeApp::new(table, draw, &style)?;
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size(style.window_size)
        .with_title(style.window_title.clone());
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        &style.window_title,
        options,
        Box::new(move |_cc| Box::new(app)),
    )
    .map_err(|e| ScopeError::Plot(e.to_string()))
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnGroup;
    use crate::viewport::TickPolicy;
    fn draw_config() -> DrawConfig {
        DrawConfig {
            xaxis_interval: TickPolicy::Auto,
            column_groups: vec![
                ColumnGroup {
                    columns: vec!["a".into()],
                    title: None,
                    yaxis: None,
                },
                ColumnGroup {
                    columns: vec!["a".into(), "b".into()],
                    title: Some("pair".into()),
                    yaxis: None,
                },
                ColumnGroup {
                    columns: vec!["b".into()],
                    title: None,
                    yaxis: Some([-1.0, 1.0]),
                },
            ],
            ..DrawConfig::default()
        }
    }
    fn table() -> TimeSeriesTable {
        TimeSeriesTable::new(
            (0..20).map(|i| i as f64 * 0.5).collect(),
            vec![
                ("a".into(), (0..20).map(|i| i as f64).collect()),
                ("b".into(), (0..20).map(|i| (i % 3) as f64).collect()),
            ],
        )
        .unwrap()
    }
    #[test]
    fn user_pan_marks_other_panes_dirty() {
        let app = ScopeApp::new(table(), &draw_config(), &RenderStyle::default()).unwrap();
        let group = app.group();
        assert_eq!(group.len(), 3);
        for id in group.ids() {
            group.with_surface(id, |pane| {
                pane.take_view();
            });
        }
        let window = AxisRange::new(1.0, 2.0);
        let listener = group
            .with_surface(ViewportId(0), |pane| {
                pane.observe_bounds(window, AxisRange::new(0.0, 20.0))
            })
            .flatten()
            .expect("pan should notify");
        listener();
        assert_eq!(group.passes(), 1);
        group.with_surface(ViewportId(1), |pane| {
            assert!(pane.is_dirty());
            assert_eq!(pane.x_range(), window);
            // a = 2, 3, 4 and b = 2, 0, 1 inside the window.
            assert!((pane.y_range().start + 0.4).abs() < 1e-9);
            assert!((pane.y_range().end - 4.4).abs() < 1e-9);
            assert_eq!(pane.ticks(), TickIntervals { major: 0.1, minor: 0.05 });
        });
        group.with_surface(ViewportId(2), |pane| {
            assert_eq!(pane.y_range(), AxisRange::new(-1.0, 1.0));
            assert_eq!(pane.x_range(), window);
        });
        group.with_surface(ViewportId(0), |pane| assert!(!pane.is_dirty()));
    }
    #[test]
    fn unchanged_bounds_do_not_notify() {
        let mut pane = PlotPane::new("t", vec!["a".into()], true);
        pane.register_range_listener(Rc::new(|| {}));
        pane.set_visible_x_range(AxisRange::new(0.0, 5.0));
        let view = pane.take_view();
        assert!(view.apply.is_some());
        assert!(!pane.is_dirty());
        assert!(pane
            .observe_bounds(AxisRange::new(0.0, 5.0), AxisRange::new(9.0, 9.5))
            .is_none());
        assert!(pane
            .observe_bounds(AxisRange::new(1.0, 5.0), AxisRange::new(9.0, 9.5))
            .is_some());
    }
    #[test]
    fn missing_group_column_fails_construction() {
        let mut draw = draw_config();
        draw.column_groups[0].columns.push("ghost".into());
        assert!(matches!(
            ScopeApp::new(table(), &draw, &RenderStyle::default()),
            Err(ScopeError::ConfigColumnMissing(_))
        ));
    }
}
