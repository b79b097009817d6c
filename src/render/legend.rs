//! Per-layer legend collection and drawing.

use std::sync::Arc;

use crate::assets::Sprite;
use crate::compositor::SpriteResolver;
use crate::layout::planner::{LayerGeometry, LegendMetrics};
use crate::layout::Layout3D;
use crate::pipeline::report::BlockCounts;
use crate::types::{BlockState, LegendPosition};

use super::font::BitmapFont;

/// Legend text color.
const TEXT_COLOR: [u8; 3] = [255, 255, 255];

/// One legend row: display name plus its base (property-free) icon.
#[derive(Debug, Clone)]
pub struct LegendEntry {
    pub name: String,
    pub icon: Arc<Sprite>,
}

/// Legend entries for every layer plus the global block counts, gathered in
/// one scan over the layout.
#[derive(Debug, Clone, Default)]
pub struct LegendData {
    /// Entries per layer, ordered by first appearance scanning rows then
    /// columns within the layer.
    pub layers: Vec<Vec<LegendEntry>>,
    /// Occurrence count per distinct display name across all layers, air
    /// excluded, in global first-appearance order.
    pub counts: BlockCounts,
}

impl LegendData {
    /// Measurements the planner needs to size the legend margin.
    pub fn metrics(&self) -> LegendMetrics {
        LegendMetrics {
            max_name_len: self
                .layers
                .iter()
                .flatten()
                .map(|entry| entry.name.len())
                .max()
                .unwrap_or(0),
            max_entries: self.layers.iter().map(Vec::len).max().unwrap_or(0),
        }
    }
}

/// Scan a layout for legend entries and block counts.
///
/// Air cells contribute nothing. Every non-air cell increments its display
/// name's global count; the first cell of a name within a layer also adds a
/// legend entry with the base icon.
pub fn scan(
    layout: &Layout3D,
    palette: &[BlockState],
    resolver: &mut SpriteResolver<'_>,
) -> LegendData {
    let mut data = LegendData::default();
    let [primaries, rows, cols] = layout.dims();

    for primary in 0..primaries {
        let mut entries: Vec<LegendEntry> = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                let state = &palette[layout.get(primary, row, col)];
                if state.is_air() {
                    continue;
                }
                let name = state.display_name().into_owned();
                data.counts.add(&name);
                if !entries.iter().any(|entry| entry.name == name) {
                    let icon = resolver.resolve_base(&name);
                    entries.push(LegendEntry { name, icon });
                }
            }
        }
        data.layers.push(entries);
    }

    data
}

/// Draw one layer's legend into its margin.
///
/// Side legends stack icon+name down the legend column from the top margin;
/// top and bottom legends stack into the horizontal margin, upward for top
/// placement and downward for bottom. Names are skipped when no font is
/// available.
pub fn draw(
    canvas: &mut Sprite,
    geometry: &LayerGeometry,
    entries: &[LegendEntry],
    position: LegendPosition,
    font: Option<&BitmapFont>,
) {
    let scale = geometry.scale as i32;
    let stride = geometry.stride() as i32;
    let text_offset = scale * 3 / 2;
    let glyph_scale = font.map(|f| f.scale_for_height(geometry.scale / 2));

    let (x, mut y, step) = match position {
        LegendPosition::Left => (scale / 2, geometry.margin_top as i32, stride),
        LegendPosition::Right => (
            (geometry.canvas_w - geometry.margin_right) as i32 + scale / 2,
            geometry.margin_top as i32,
            stride,
        ),
        LegendPosition::Bottom => (
            geometry.margin_left as i32,
            (geometry.margin_top + geometry.grid_h) as i32 + scale / 2,
            stride,
        ),
        LegendPosition::Top => (
            geometry.margin_left as i32,
            geometry.margin_top as i32 - scale - scale / 2,
            -stride,
        ),
    };

    for entry in entries {
        canvas.overlay(&entry.icon, x, y);
        if let (Some(font), Some(glyph_scale)) = (font, glyph_scale) {
            font.draw_text(canvas, &entry.name, x + text_offset, y, glyph_scale, TEXT_COLOR);
        }
        y += step;
    }
}
