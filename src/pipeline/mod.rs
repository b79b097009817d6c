//! End-to-end run: slice a structure, resolve its sprites, render every
//! layer to disk and write the optional reports.

pub mod report;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::{AssetPack, Sprite, BELOW_INDICATOR_SPRITE, FONT_SPRITE};
use crate::compositor::SpriteResolver;
use crate::error::{LayoutError, Result};
use crate::layout::planner::{self, LayerGeometry};
use crate::layout::slicer;
use crate::render::{legend, BitmapFont, LayerRenderer};
use crate::types::{Axis, LegendPosition, Structure};

pub use report::BlockCounts;

/// Sprite edge lengths the renderer accepts.
pub const VALID_SCALES: [u32; 4] = [16, 32, 64, 128];

/// Rendering options for a run.
#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    /// Block sprite edge length in pixels. One of [`VALID_SCALES`].
    pub scale: u32,
    /// Grid line thickness in pixels, 1 to 128.
    pub grid_thickness: u32,
    /// Base margin around the grid region in pixels, 10 to 500.
    pub margin: u32,
    pub legend_position: LegendPosition,
    /// Axis the structure is layered along.
    pub axis: Axis,
    /// Place the output files in a subdirectory named after the run.
    pub create_subdirectory: bool,
    /// Write a `{name}_data.csv` block count table.
    pub write_count_report: bool,
    /// Write a `{name}_missing.txt` listing sprites that fell back to the
    /// debug sprite. Only written when something was missing.
    pub write_missing_report: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scale: 64,
            grid_thickness: 2,
            margin: 50,
            legend_position: LegendPosition::Right,
            axis: Axis::Y,
            create_subdirectory: true,
            write_count_report: false,
            write_missing_report: false,
        }
    }
}

impl LayoutConfig {
    /// Check the numeric options against their accepted ranges.
    pub fn validate(&self) -> Result<()> {
        if !VALID_SCALES.contains(&self.scale) {
            return Err(LayoutError::InvalidConfig(format!(
                "scale must be one of {VALID_SCALES:?}, got {}",
                self.scale
            )));
        }
        if !(1..=128).contains(&self.grid_thickness) {
            return Err(LayoutError::InvalidConfig(format!(
                "grid thickness must be between 1 and 128, got {}",
                self.grid_thickness
            )));
        }
        if !(10..=500).contains(&self.margin) {
            return Err(LayoutError::InvalidConfig(format!(
                "margin must be between 10 and 500, got {}",
                self.margin
            )));
        }
        Ok(())
    }
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Directory the files were written into.
    pub out_dir: PathBuf,
    /// Layer image paths, bottom layer first.
    pub layer_files: Vec<PathBuf>,
    /// Block counts across all layers, air excluded.
    pub counts: BlockCounts,
    /// Missing sprite entries, sorted and deduplicated.
    pub missing: Vec<String>,
    /// Geometry shared by every layer image.
    pub geometry: LayerGeometry,
}

/// Turns structures into per-layer images using one asset pack.
///
/// The pack is loaded once and shared across runs; per-run state (sprite
/// cache, missing list) lives in the run itself.
pub struct Schematizer {
    assets: AssetPack,
    config: LayoutConfig,
}

impl Schematizer {
    pub fn new(assets: AssetPack) -> Self {
        Self {
            assets,
            config: LayoutConfig::default(),
        }
    }

    pub fn with_config(assets: AssetPack, config: LayoutConfig) -> Self {
        Self { assets, config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn assets(&self) -> &AssetPack {
        &self.assets
    }

    /// Render every layer of `structure` into `out_dir`, naming the files
    /// after `name`.
    pub fn schematize(&self, structure: &Structure, out_dir: &Path, name: &str) -> Result<RunReport> {
        self.schematize_with_progress(structure, out_dir, name, |_| {})
    }

    /// Like [`schematize`](Self::schematize), reporting progress as a
    /// percentage after each stage and each rendered layer.
    pub fn schematize_with_progress<F>(
        &self,
        structure: &Structure,
        out_dir: &Path,
        name: &str,
        mut progress: F,
    ) -> Result<RunReport>
    where
        F: FnMut(u8),
    {
        progress(0);
        self.config.validate()?;
        structure.validate()?;

        let layout = slicer::slice(structure, self.config.axis);
        let layers = layout.layer_count();
        log::info!(
            "rendering {layers} layers of {}x{}x{} structure \"{name}\"",
            structure.size.x,
            structure.size.y,
            structure.size.z
        );

        let mut resolver = SpriteResolver::new(&self.assets, self.config.scale);
        progress(10);

        let legend_data = legend::scan(&layout, &structure.palette, &mut resolver);

        let air: Vec<bool> = structure.palette.iter().map(|state| state.is_air()).collect();
        // Air cells are never pasted; their palette slots get a blank sprite
        // instead of a resolved one.
        let blank = Arc::new(Sprite::new(self.config.scale, self.config.scale));
        let sprites: Vec<Arc<Sprite>> = structure
            .palette
            .iter()
            .map(|state| {
                if state.is_air() {
                    blank.clone()
                } else {
                    resolver.resolve(state)
                }
            })
            .collect();

        let geometry = planner::plan(
            layout.dims(),
            self.config.scale,
            self.config.grid_thickness,
            self.config.margin,
            self.config.legend_position,
            legend_data.metrics(),
        );
        progress(15);

        let out_dir = if self.config.create_subdirectory {
            out_dir.join(name)
        } else {
            out_dir.to_path_buf()
        };
        std::fs::create_dir_all(&out_dir)?;

        let below_indicator = match self.assets.property_sprite(BELOW_INDICATOR_SPRITE) {
            Some(sprite) => Some(sprite.resize_nearest(self.config.scale, self.config.scale)),
            None => {
                resolver.note_missing(format!("property: {BELOW_INDICATOR_SPRITE}.png"));
                None
            }
        };
        let font = match self.assets.font_sprite(FONT_SPRITE) {
            Some(sprite) => BitmapFont::from_sprite(sprite),
            None => {
                resolver.note_missing(format!("font: {FONT_SPRITE}.png"));
                None
            }
        };
        progress(20);

        let renderer = LayerRenderer {
            geometry: &geometry,
            sprites: &sprites,
            air: &air,
            below_indicator: below_indicator.as_ref(),
            legend_position: self.config.legend_position,
            font: font.as_ref(),
        };

        let mut layer_files = Vec::with_capacity(layers);
        let mut previous = None;
        for index in 0..layers {
            let layer = layout.layer(index);
            let image = renderer.render(&layer, previous.as_ref(), &legend_data.layers[index]);

            let path = out_dir.join(format!("{name}_layer_{}.png", index + 1));
            image.save(&path)?;
            log::debug!("wrote {}", path.display());
            layer_files.push(path);

            previous = Some(layer);
            progress((20 + 79 * (index + 1) / layers) as u8);
        }
        progress(99);

        if self.config.write_count_report {
            let path = out_dir.join(format!("{name}_data.csv"));
            let mut writer = BufWriter::new(File::create(&path)?);
            report::write_counts(&mut writer, &legend_data.counts)?;
            writer.flush()?;
            log::debug!("wrote {}", path.display());
        }

        let missing: Vec<String> = resolver.into_missing().into_iter().collect();
        if !missing.is_empty() {
            log::warn!("{} sprites missing from the asset pack", missing.len());
            if self.config.write_missing_report {
                let path = out_dir.join(format!("{name}_missing.txt"));
                let mut writer = BufWriter::new(File::create(&path)?);
                report::write_missing(&mut writer, &missing)?;
                writer.flush()?;
                log::debug!("wrote {}", path.display());
            }
        }
        progress(100);

        Ok(RunReport {
            out_dir,
            layer_files,
            counts: legend_data.counts,
            missing,
            geometry,
        })
    }
}
