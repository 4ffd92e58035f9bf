/// Placement of one pane in the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCell {
    /// Index of the plot group this cell shows.
    pub index: usize,
    pub row: usize,
    pub col: usize,
    /// Only the bottom-most populated cell of a column carries the time-axis label.
    pub x_label: bool,
}
/// Column-major grid: groups fill column 0 top to bottom, then column 1, and so on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
    plots: usize,
}
impl GridLayout {
    pub fn new(plots: usize, cols_per_row: usize) -> Self {
        if plots == 0 {
            return Self {
                rows: 0,
                cols: 0,
                plots,
            };
        }
        let cols = cols_per_row.clamp(1, plots);
        let rows = plots.div_ceil(cols);
        Self { rows, cols, plots }
    }
    pub fn plots(&self) -> usize {
        self.plots
    }
    pub fn cells(&self) -> Vec<GridCell> {
        (0..self.plots)
            .map(|index| {
                let row = index % self.rows;
                let col = index / self.rows;
                GridCell {
                    index,
                    row,
                    col,
                    x_label: row == self.last_row_in(col),
                }
            })
            .collect()
    }
    /// Cells of column `col`, top to bottom.
    pub fn column(&self, col: usize) -> Vec<GridCell> {
        self.cells().into_iter().filter(|c| c.col == col).collect()
    }
    /// `(row, col)` of grid slots no group occupies; these are removed from the surface.
    pub fn unused_cells(&self) -> Vec<(usize, usize)> {
        (self.plots..self.rows * self.cols)
            .map(|index| (index % self.rows, index / self.rows))
            .collect()
    }
    fn last_row_in(&self, col: usize) -> usize {
        let last_index = ((col + 1) * self.rows).min(self.plots) - 1;
        last_index - col * self.rows
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn five_plots_in_two_columns() {
        let layout = GridLayout::new(5, 2);
        assert_eq!((layout.rows, layout.cols), (3, 2));
        let cells = layout.cells();
        let positions: Vec<_> = cells.iter().map(|c| (c.row, c.col)).collect();
        assert_eq!(positions, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1)]);
        let labelled: Vec<_> = cells.iter().filter(|c| c.x_label).map(|c| c.index).collect();
        assert_eq!(labelled, vec![2, 4]);
        assert_eq!(layout.unused_cells(), vec![(2, 1)]);
    }
    #[test]
    fn fewer_plots_than_columns() {
        let layout = GridLayout::new(2, 4);
        assert_eq!((layout.rows, layout.cols), (1, 2));
        assert!(layout.cells().iter().all(|c| c.x_label));
        assert!(layout.unused_cells().is_empty());
    }
    #[test]
    fn single_column_labels_only_last() {
        let layout = GridLayout::new(3, 1);
        let labelled: Vec<_> = layout.cells().iter().map(|c| c.x_label).collect();
        assert_eq!(labelled, vec![false, false, true]);
        assert_eq!(layout.column(0).len(), 3);
    }
    #[test]
    fn empty_layout() {
        let layout = GridLayout::new(0, 2);
        assert!(layout.cells().is_empty());
        assert!(layout.unused_cells().is_empty());
    }
}
