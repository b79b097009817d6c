//! Block state to composited sprite resolution.
//!
//! One resolver is created per schematize run. It owns the run's sprite
//! cache and the missing-asset report, so concurrent runs never share
//! mutable state.

mod rules;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::assets::{AssetPack, Sprite};
use crate::types::{strip_namespace, BlockState};

use rules::{RuleEffect, SPECIAL_RULES};

/// Deterministic cache key for a block state: stripped name plus every
/// property rendered as `.key_value`, keys in lexicographic order. Two
/// states with the same name and property set always share a key no matter
/// how their properties were ordered at the source.
pub fn canonical_key(state: &BlockState) -> String {
    let mut key = strip_namespace(&state.name).into_owned();
    let mut entries: Vec<_> = state.properties.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    for (prop, value) in entries {
        key.push('.');
        key.push_str(prop);
        key.push('_');
        key.push_str(value);
    }
    key
}

/// Resolves palette entries to composited, scaled sprites.
pub struct SpriteResolver<'a> {
    assets: &'a AssetPack,
    scale: u32,
    cache: HashMap<String, Arc<Sprite>>,
    missing: BTreeSet<String>,
}

impl<'a> SpriteResolver<'a> {
    /// Create a resolver producing `scale`×`scale` sprites.
    pub fn new(assets: &'a AssetPack, scale: u32) -> Self {
        Self {
            assets,
            scale,
            cache: HashMap::new(),
            missing: BTreeSet::new(),
        }
    }

    /// Resolve a block state to its fully composited sprite.
    ///
    /// Missing base sprites substitute the pack's debug sprite; missing
    /// overlays are skipped. Both are recorded in the missing-asset report
    /// rather than failing the run.
    pub fn resolve(&mut self, state: &BlockState) -> Arc<Sprite> {
        let key = canonical_key(state);
        if let Some(sprite) = self.cache.get(&key) {
            return sprite.clone();
        }

        let name = strip_namespace(&state.name).into_owned();
        let mut sprite = match self.assets.block_sprite(&name) {
            Some(base) => base.clone(),
            None => {
                self.missing.insert(format!("block: {}.png", name));
                self.assets.debug_sprite().clone()
            }
        };

        let mut remaining: Vec<(&str, &str)> = state
            .properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        remaining.sort_by(|a, b| a.0.cmp(b.0));

        for rule in SPECIAL_RULES {
            if !rule.applies(&name, &state.properties) {
                continue;
            }
            let value = state.properties[rule.property].as_str();
            match rule.effect {
                RuleEffect::WaterBackdrop => {
                    if value == "true" && self.assets.property_sprite(rule.property).is_none() {
                        self.missing.insert(format!(
                            "property: {}.png - block: {}",
                            rule.property, name
                        ));
                    }
                    // The water backdrop never reaches the exported sprite;
                    // the lookup above still runs so a missing overlay shows
                    // up in the report.
                }
                RuleEffect::SheetCrop { top_when } => {
                    sprite = if value == top_when {
                        sprite.top_half()
                    } else {
                        sprite.bottom_half()
                    };
                }
            }
            remaining.retain(|(prop, _)| *prop != rule.property);
        }

        for (prop, value) in remaining {
            let overlay_key = format!("{}_{}", prop, value);
            match self.assets.property_sprite(&overlay_key) {
                Some(overlay) => sprite.overlay(overlay, 0, 0),
                None => {
                    self.missing.insert(format!(
                        "property: {}.png - block: {}",
                        overlay_key, name
                    ));
                }
            }
        }

        let scaled = Arc::new(sprite.resize_nearest(self.scale, self.scale));
        self.cache.insert(key, scaled.clone());
        scaled
    }

    /// Resolve the base-only variant of a block (no properties), used for
    /// legend icons. Cached under the bare name.
    pub fn resolve_base(&mut self, name: &str) -> Arc<Sprite> {
        let state = BlockState::new(name);
        self.resolve(&state)
    }

    /// Record a missing asset that the resolver itself did not look up
    /// (fonts, indicator sprites).
    pub fn note_missing(&mut self, entry: String) {
        self.missing.insert(entry);
    }

    /// Distinct missing-asset descriptions collected so far, sorted.
    pub fn missing(&self) -> &BTreeSet<String> {
        &self.missing
    }

    /// Consume the resolver, keeping only the missing-asset report.
    pub fn into_missing(self) -> BTreeSet<String> {
        self.missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack_with(blocks: &[(&str, Sprite)], properties: &[(&str, Sprite)]) -> AssetPack {
        let mut pack = AssetPack::new();
        for (name, sprite) in blocks {
            pack.add_block(*name, sprite.clone());
        }
        for (key, sprite) in properties {
            pack.add_property(*key, sprite.clone());
        }
        pack
    }

    #[test]
    fn test_canonical_key_is_order_invariant() {
        let a = BlockState::new("minecraft:oak_stairs")
            .with_property("facing", "north")
            .with_property("waterlogged", "false");
        let b = BlockState::new("minecraft:oak_stairs")
            .with_property("waterlogged", "false")
            .with_property("facing", "north");
        assert_eq!(canonical_key(&a), canonical_key(&b));
        assert_eq!(
            canonical_key(&a),
            "oak_stairs.facing_north.waterlogged_false"
        );
    }

    #[test]
    fn test_resolve_caches_by_identity() {
        let pack = pack_with(&[("stone", Sprite::filled(16, 16, [5, 5, 5, 255]))], &[]);
        let mut resolver = SpriteResolver::new(&pack, 16);

        let state = BlockState::new("minecraft:stone");
        let first = resolver.resolve(&state);
        let second = resolver.resolve(&state);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_missing_base_uses_debug_sprite() {
        let pack = AssetPack::new();
        let mut resolver = SpriteResolver::new(&pack, 16);

        let sprite = resolver.resolve(&BlockState::new("minecraft:unobtainium"));
        assert_eq!(sprite.as_ref(), &Sprite::placeholder());
        assert!(resolver.missing().contains("block: unobtainium.png"));
        assert_eq!(resolver.missing().len(), 1);

        // A second resolution of the same state stays deduplicated.
        resolver.resolve(&BlockState::new("minecraft:unobtainium"));
        assert_eq!(resolver.missing().len(), 1);
    }

    #[test]
    fn test_generic_overlay_composites_on_top() {
        let base = Sprite::filled(16, 16, [10, 10, 10, 255]);
        let overlay = Sprite::filled(16, 16, [200, 0, 0, 255]);
        let pack = pack_with(&[("lever", base)], &[("facing_north", overlay)]);
        let mut resolver = SpriteResolver::new(&pack, 16);

        let sprite =
            resolver.resolve(&BlockState::new("minecraft:lever").with_property("facing", "north"));
        assert_eq!(sprite.get_pixel(0, 0), [200, 0, 0, 255]);
        assert!(resolver.missing().is_empty());
    }

    #[test]
    fn test_missing_overlay_is_reported_and_skipped() {
        let pack = pack_with(&[("lever", Sprite::filled(16, 16, [10, 10, 10, 255]))], &[]);
        let mut resolver = SpriteResolver::new(&pack, 16);

        let sprite =
            resolver.resolve(&BlockState::new("minecraft:lever").with_property("facing", "east"));
        assert_eq!(sprite.get_pixel(0, 0), [10, 10, 10, 255]);
        assert!(resolver
            .missing()
            .contains("property: facing_east.png - block: lever"));
    }

    #[test]
    fn test_bed_part_crops_sheet() {
        let mut sheet = Sprite::new(16, 32);
        sheet.fill_rect(0, 0, 16, 16, [1, 0, 0, 255]);
        sheet.fill_rect(0, 16, 16, 16, [0, 1, 0, 255]);
        let pack = pack_with(&[("red_bed", sheet)], &[]);
        let mut resolver = SpriteResolver::new(&pack, 16);

        let head =
            resolver.resolve(&BlockState::new("minecraft:red_bed").with_property("part", "head"));
        assert_eq!(head.get_pixel(0, 0), [1, 0, 0, 255]);

        let foot =
            resolver.resolve(&BlockState::new("minecraft:red_bed").with_property("part", "foot"));
        assert_eq!(foot.get_pixel(0, 0), [0, 1, 0, 255]);
    }

    #[test]
    fn test_door_half_crops_only_doors() {
        let mut sheet = Sprite::new(16, 32);
        sheet.fill_rect(0, 0, 16, 16, [1, 0, 0, 255]);
        sheet.fill_rect(0, 16, 16, 16, [0, 1, 0, 255]);
        let stairs = Sprite::filled(16, 16, [7, 7, 7, 255]);
        let pack = pack_with(&[("oak_door", sheet), ("oak_stairs", stairs)], &[]);
        let mut resolver = SpriteResolver::new(&pack, 16);

        let upper =
            resolver.resolve(&BlockState::new("minecraft:oak_door").with_property("half", "upper"));
        assert_eq!(upper.get_pixel(0, 0), [1, 0, 0, 255]);

        let lower =
            resolver.resolve(&BlockState::new("minecraft:oak_door").with_property("half", "lower"));
        assert_eq!(lower.get_pixel(0, 0), [0, 1, 0, 255]);

        // Stairs keep their sprite; the half property goes through the
        // overlay pass and is reported missing.
        let stairs = resolver
            .resolve(&BlockState::new("minecraft:oak_stairs").with_property("half", "top"));
        assert_eq!(stairs.get_pixel(0, 0), [7, 7, 7, 255]);
        assert!(resolver
            .missing()
            .contains("property: half_top.png - block: oak_stairs"));
    }

    #[test]
    fn test_waterlogged_lookup_reports_missing_overlay() {
        let base = Sprite::filled(16, 16, [10, 10, 10, 255]);
        let pack = pack_with(&[("kelp", base)], &[]);
        let mut resolver = SpriteResolver::new(&pack, 16);

        let sprite = resolver
            .resolve(&BlockState::new("minecraft:kelp").with_property("waterlogged", "true"));
        // Sprite itself is unchanged; only the report notices.
        assert_eq!(sprite.get_pixel(0, 0), [10, 10, 10, 255]);
        assert!(resolver
            .missing()
            .contains("property: waterlogged.png - block: kelp"));
    }

    #[test]
    fn test_waterlogged_never_tints_the_sprite() {
        let base = Sprite::filled(16, 16, [10, 10, 10, 255]);
        let water = Sprite::filled(16, 16, [0, 0, 200, 255]);
        let pack = pack_with(&[("kelp", base)], &[("waterlogged", water)]);
        let mut resolver = SpriteResolver::new(&pack, 16);

        let sprite = resolver
            .resolve(&BlockState::new("minecraft:kelp").with_property("waterlogged", "true"));
        assert_eq!(sprite.get_pixel(0, 0), [10, 10, 10, 255]);
        assert!(resolver.missing().is_empty());
    }

    #[test]
    fn test_resolve_scales_to_target() {
        let pack = pack_with(&[("stone", Sprite::filled(16, 16, [5, 5, 5, 255]))], &[]);
        let mut resolver = SpriteResolver::new(&pack, 64);

        let sprite = resolver.resolve(&BlockState::new("minecraft:stone"));
        assert_eq!((sprite.width, sprite.height), (64, 64));
    }

    #[test]
    fn test_resolve_base_ignores_properties() {
        let sheet = Sprite::filled(16, 32, [3, 3, 3, 255]);
        let pack = pack_with(&[("oak_door", sheet)], &[]);
        let mut resolver = SpriteResolver::new(&pack, 16);

        let icon = resolver.resolve_base("oak_door");
        // Base icon keeps the whole (resized) sheet; no crop applied.
        assert_eq!((icon.width, icon.height), (16, 16));

        let again = resolver.resolve_base("oak_door");
        assert!(Arc::ptr_eq(&icon, &again));
    }
}
