//! Canvas and margin geometry, computed once per run and reused for every
//! layer.

use crate::types::LegendPosition;

/// Legend bulk measured during the legend scan, used to widen the legend
/// side's margin.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegendMetrics {
    /// Longest display name across all layers' legend entries.
    pub max_name_len: usize,
    /// Largest distinct-entry count of any single layer.
    pub max_entries: usize,
}

/// Pixel geometry shared by every layer image of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerGeometry {
    /// Block sprite edge length.
    pub scale: u32,
    /// Grid line thickness.
    pub grid: u32,
    /// Cells per grid row (horizontal).
    pub rows: u32,
    /// Cells per grid column (vertical).
    pub cols: u32,
    pub margin_left: u32,
    pub margin_right: u32,
    pub margin_top: u32,
    pub margin_bottom: u32,
    /// Grid region width, including its outer lines.
    pub grid_w: u32,
    /// Grid region height, including its outer lines.
    pub grid_h: u32,
    pub canvas_w: u32,
    pub canvas_h: u32,
}

impl LayerGeometry {
    /// Distance between successive cell origins.
    pub fn stride(&self) -> u32 {
        self.scale + self.grid
    }

    /// Pixel x of a cell origin for a row index.
    pub fn cell_x(&self, row: u32) -> u32 {
        self.margin_left + self.grid + row * self.stride()
    }

    /// Pixel y of a cell origin for a column index. Columns grow upward
    /// from the bottom of the grid region.
    pub fn cell_y(&self, col: u32) -> u32 {
        self.canvas_h - self.margin_bottom - (self.grid + self.scale) - col * self.stride()
    }
}

/// Derive the canvas geometry for a layout of `dims = [primary, row, col]`.
///
/// All four margins start at the configured margin; the legend's side is
/// widened to fit the legend when it needs more room.
pub fn plan(
    dims: [usize; 3],
    scale: u32,
    grid: u32,
    margin: u32,
    legend_position: LegendPosition,
    legend: LegendMetrics,
) -> LayerGeometry {
    let rows = dims[1] as u32;
    let cols = dims[2] as u32;

    let grid_w = rows * scale + grid * (rows + 1);
    let grid_h = cols * scale + grid * (cols + 1);

    let legend_size = if legend_position.is_side() {
        // Monospace-width approximation for the name column.
        scale * 2 + (scale / 3) * legend.max_name_len as u32
    } else {
        scale * 2 + (scale + grid) * legend.max_entries as u32
    };

    let mut margin_left = margin;
    let mut margin_right = margin;
    let mut margin_top = margin;
    let mut margin_bottom = margin;
    let widened = margin.max(legend_size);
    match legend_position {
        LegendPosition::Left => margin_left = widened,
        LegendPosition::Right => margin_right = widened,
        LegendPosition::Top => margin_top = widened,
        LegendPosition::Bottom => margin_bottom = widened,
    }

    LayerGeometry {
        scale,
        grid,
        rows,
        cols,
        margin_left,
        margin_right,
        margin_top,
        margin_bottom,
        grid_w,
        grid_h,
        canvas_w: grid_w + margin_left + margin_right,
        canvas_h: grid_h + margin_top + margin_bottom,
    }
}
