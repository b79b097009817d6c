//! Asset pack loading and sprite lookup.
//!
//! An asset pack is a directory tree or ZIP archive with four sprite roots:
//! `blocks/` (base block sprites), `properties/` (property overlay sprites),
//! `masks/` (cut-out masks for the texture maker), and `fonts/` (bitmap
//! fonts for legend text).

pub mod loader;
pub mod sprite;

pub use sprite::Sprite;

use std::collections::HashMap;

/// Name of the bitmap font sprite looked up in the `fonts/` root.
pub const FONT_SPRITE: &str = "ascii";

/// Name of the block-below indicator sprite in the `properties/` root.
pub const BELOW_INDICATOR_SPRITE: &str = "previous_block";

/// Name of the debug fallback sprite in the `blocks/` root.
pub const DEBUG_SPRITE: &str = "debug";

/// A loaded asset pack: every sprite decoded up front, addressed by name.
#[derive(Debug, Clone)]
pub struct AssetPack {
    blocks: HashMap<String, Sprite>,
    properties: HashMap<String, Sprite>,
    masks: HashMap<String, Sprite>,
    fonts: HashMap<String, Sprite>,
    fallback: Sprite,
}

impl Default for AssetPack {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetPack {
    pub fn new() -> Self {
        Self {
            blocks: HashMap::new(),
            properties: HashMap::new(),
            masks: HashMap::new(),
            fonts: HashMap::new(),
            fallback: Sprite::placeholder(),
        }
    }

    /// Get a base block sprite by canonical (namespace-stripped) name.
    pub fn block_sprite(&self, name: &str) -> Option<&Sprite> {
        self.blocks.get(name)
    }

    /// Get a property overlay sprite by key, e.g. `waterlogged` or
    /// `half_upper`.
    pub fn property_sprite(&self, key: &str) -> Option<&Sprite> {
        self.properties.get(key)
    }

    /// Get a cut-out mask sprite by name.
    pub fn mask_sprite(&self, name: &str) -> Option<&Sprite> {
        self.masks.get(name)
    }

    /// Get a font sprite by name.
    pub fn font_sprite(&self, name: &str) -> Option<&Sprite> {
        self.fonts.get(name)
    }

    /// Debug sprite substituted for unresolved base textures: the pack's
    /// own `blocks/debug.png` when present, else the builtin checkerboard.
    pub fn debug_sprite(&self) -> &Sprite {
        self.blocks.get(DEBUG_SPRITE).unwrap_or(&self.fallback)
    }

    pub fn add_block(&mut self, name: impl Into<String>, sprite: Sprite) {
        self.blocks.insert(name.into(), sprite);
    }

    pub fn add_property(&mut self, key: impl Into<String>, sprite: Sprite) {
        self.properties.insert(key.into(), sprite);
    }

    pub fn add_mask(&mut self, name: impl Into<String>, sprite: Sprite) {
        self.masks.insert(name.into(), sprite);
    }

    pub fn add_font(&mut self, name: impl Into<String>, sprite: Sprite) {
        self.fonts.insert(name.into(), sprite);
    }

    /// Names of all loaded mask sprites, sorted.
    pub fn mask_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.masks.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn mask_count(&self) -> usize {
        self.masks.len()
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
            && self.properties.is_empty()
            && self.masks.is_empty()
            && self.fonts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_sprite_falls_back_to_placeholder() {
        let pack = AssetPack::new();
        assert_eq!(pack.debug_sprite(), &Sprite::placeholder());
    }

    #[test]
    fn test_debug_sprite_prefers_pack_texture() {
        let mut pack = AssetPack::new();
        let debug = Sprite::filled(16, 16, [1, 2, 3, 255]);
        pack.add_block(DEBUG_SPRITE, debug.clone());
        assert_eq!(pack.debug_sprite(), &debug);
    }

    #[test]
    fn test_lookups() {
        let mut pack = AssetPack::new();
        pack.add_block("stone", Sprite::new(16, 16));
        pack.add_property("waterlogged", Sprite::new(16, 16));
        pack.add_mask("mask_fence", Sprite::new(16, 16));

        assert!(pack.block_sprite("stone").is_some());
        assert!(pack.block_sprite("dirt").is_none());
        assert!(pack.property_sprite("waterlogged").is_some());
        assert_eq!(pack.mask_names(), vec!["mask_fence"]);
        assert_eq!(pack.block_count(), 1);
    }
}
