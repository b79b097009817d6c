//! Special-cased state properties applied before the generic overlay pass.

use std::collections::HashMap;

/// What a special rule does to the sprite being composited.
#[derive(Debug, Clone, Copy)]
pub(crate) enum RuleEffect {
    /// Place the block over a water backdrop when the property is `true`.
    WaterBackdrop,
    /// The base sprite is a vertically stacked two-frame sheet; keep the
    /// top frame when the property equals `top_when`, the bottom otherwise.
    SheetCrop { top_when: &'static str },
}

/// One special-cased property. Rules are matched in table order and each
/// match removes its property from the generic overlay pass.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SpecialRule {
    /// Property key the rule consumes.
    pub property: &'static str,
    /// Extra predicate on the stripped block name, if any.
    pub name_contains: Option<&'static str>,
    pub effect: RuleEffect,
}

impl SpecialRule {
    pub(crate) fn applies(&self, name: &str, properties: &HashMap<String, String>) -> bool {
        if !properties.contains_key(self.property) {
            return false;
        }
        match self.name_contains {
            Some(needle) => name.contains(needle),
            None => true,
        }
    }
}

pub(crate) const SPECIAL_RULES: &[SpecialRule] = &[
    SpecialRule {
        property: "waterlogged",
        name_contains: None,
        effect: RuleEffect::WaterBackdrop,
    },
    // Beds: head/foot halves share one sheet.
    SpecialRule {
        property: "part",
        name_contains: None,
        effect: RuleEffect::SheetCrop { top_when: "head" },
    },
    // Doors: upper/lower halves share one sheet. Other blocks with a `half`
    // property (stairs, trapdoors) fall through to the overlay pass.
    SpecialRule {
        property: "half",
        name_contains: Some("door"),
        effect: RuleEffect::SheetCrop { top_when: "upper" },
    },
];
