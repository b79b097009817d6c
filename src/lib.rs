//! # Schematic Layout
//!
//! A Rust library for turning Minecraft structures into per-layer build
//! diagrams.
//!
//! ## Overview
//!
//! This library takes a Minecraft structure and a sprite asset pack as
//! input, and produces one annotated PNG per horizontal layer: a grid of
//! block sprites, an indicator for blocks on the layer below, and a legend
//! of the blocks the layer uses.
//!
//! ## Quick Start
//!
//! ```ignore
//! use schematic_layout::{load_asset_pack, load_structure, Schematizer};
//!
//! // Load the sprite pack (ZIP or directory)
//! let pack = load_asset_pack("path/to/assets.zip")?;
//!
//! // Load a structure from its JSON form
//! let structure = load_structure("path/to/house.json")?;
//!
//! // Render every layer into ./out/house/
//! let schematizer = Schematizer::new(pack);
//! let run = schematizer.schematize(&structure, "out".as_ref(), "house")?;
//!
//! println!("{} layers, {} sprites missing", run.layer_files.len(), run.missing.len());
//! ```

pub mod assets;
pub mod compositor;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod render;
pub mod types;

// Re-export main types for convenience
pub use assets::{AssetPack, Sprite};
pub use compositor::SpriteResolver;
pub use error::{LayoutError, Result};
pub use layout::{LayerGeometry, Layout3D};
pub use pipeline::{BlockCounts, LayoutConfig, RunReport, Schematizer};
pub use types::{Axis, BlockState, LegendPosition, PositionedBlock, Structure};

/// Load an asset pack from a file path (ZIP or directory).
pub fn load_asset_pack<P: AsRef<std::path::Path>>(path: P) -> Result<AssetPack> {
    assets::loader::load_from_path(path)
}

/// Load an asset pack from ZIP bytes.
pub fn load_asset_pack_from_bytes(data: &[u8]) -> Result<AssetPack> {
    assets::loader::load_from_bytes(data)
}

/// Load a structure from a JSON file.
pub fn load_structure<P: AsRef<std::path::Path>>(path: P) -> Result<Structure> {
    Structure::from_json_file(path)
}
