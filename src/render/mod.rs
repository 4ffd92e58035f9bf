// src/render/mod.rs
pub mod snapshot;
pub mod viewer;
pub use snapshot::{render_grid_png, save_snapshot};
pub use viewer::{launch, PlotPane, ScopeApp};
use plotters::style::{RGBColor, BLUE, CYAN, GREEN, MAGENTA, RED, YELLOW};
/// Label used on the time axis of the bottom pane in each column.
pub const TIME_AXIS_LABEL: &str = "Time (s)";
/// Presentation settings handed to the viewer and the snapshot renderer.
#[derive(Clone, Debug)]
pub struct RenderStyle {
    pub window_title: String,
    pub window_size: [f32; 2],
    pub line_width: f32,
    /// Size of one grid cell in the PNG snapshot.
    pub cell_width: u32,
    pub cell_height: u32,
    pub font_size: u32,
    pub background: RGBColor,
    pub foreground: RGBColor,
    pub palette: Vec<RGBColor>,
}
impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            window_title: "framescope".into(),
            window_size: [1400.0, 900.0],
            line_width: 1.0,
            cell_width: 600,
            cell_height: 300,
            font_size: 12,
            background: RGBColor(10, 10, 10),
            foreground: RGBColor(230, 230, 230),
            palette: vec![BLUE, RED, GREEN, CYAN, MAGENTA, YELLOW],
        }
    }
}
impl RenderStyle {
    pub fn series_color(&self, idx: usize) -> RGBColor {
        if self.palette.is_empty() {
            return self.foreground;
        }
        self.palette[idx % self.palette.len()]
    }
}
