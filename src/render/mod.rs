//! Layer image rasterization: grid, block cells, below-layer indicator and
//! legend.

pub mod font;
pub mod layer;
pub mod legend;

pub use font::BitmapFont;
pub use layer::LayerRenderer;
pub use legend::{LegendData, LegendEntry};
