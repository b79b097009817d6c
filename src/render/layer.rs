//! Rasterization of a single layer image.

use std::sync::Arc;

use crate::assets::Sprite;
use crate::layout::planner::LayerGeometry;
use crate::layout::LayerSlice;
use crate::types::LegendPosition;

use super::font::BitmapFont;
use super::legend::{self, LegendEntry};

/// Canvas background (opaque mid-gray).
const BACKGROUND: [u8; 4] = [127, 127, 127, 255];

/// Grid line color.
const GRID_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Renders layers from pre-resolved sprites and shared geometry.
///
/// The renderer keeps no state across layers: each image is a pure function
/// of its own slice, the slice beneath it, and the run's shared inputs.
pub struct LayerRenderer<'a> {
    pub geometry: &'a LayerGeometry,
    /// Composited sprite per palette index, `scale`x`scale`.
    pub sprites: &'a [Arc<Sprite>],
    /// Air flag per palette index; air cells draw nothing.
    pub air: &'a [bool],
    /// Indicator pasted over cells that have a block on the layer below.
    pub below_indicator: Option<&'a Sprite>,
    pub legend_position: LegendPosition,
    pub font: Option<&'a BitmapFont>,
}

impl LayerRenderer<'_> {
    /// Rasterize one layer.
    pub fn render(
        &self,
        layer: &LayerSlice<'_>,
        previous: Option<&LayerSlice<'_>>,
        entries: &[LegendEntry],
    ) -> Sprite {
        let g = self.geometry;
        let mut canvas = Sprite::filled(g.canvas_w, g.canvas_h, BACKGROUND);

        self.draw_grid(&mut canvas);

        for row in 0..layer.rows() {
            let x = g.cell_x(row as u32) as i32;
            for col in 0..layer.cols() {
                let y = g.cell_y(col as u32) as i32;

                let state = layer.get(row, col);
                if !self.air[state] {
                    canvas.overlay(&self.sprites[state], x, y);
                }

                if let (Some(previous), Some(indicator)) = (previous, self.below_indicator) {
                    if !self.air[previous.get(row, col)] {
                        canvas.overlay(indicator, x, y);
                    }
                }
            }
        }

        legend::draw(
            &mut canvas,
            g,
            entries,
            self.legend_position,
            self.font,
        );

        canvas
    }

    /// Draw the grid lines, confined to the grid region box.
    fn draw_grid(&self, canvas: &mut Sprite) {
        let g = self.geometry;
        let left = g.margin_left as i32;
        let top = g.margin_top as i32;

        for row in 0..=g.rows {
            let x = left + (row * g.stride()) as i32;
            canvas.fill_rect(x, top, g.grid, g.grid_h, GRID_COLOR);
        }
        for col in 0..=g.cols {
            let y = top + (col * g.stride()) as i32;
            canvas.fill_rect(left, y, g.grid_w, g.grid, GRID_COLOR);
        }
    }
}
