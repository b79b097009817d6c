//! Shared types used throughout the library.

use std::borrow::Cow;
use std::collections::HashMap;

use glam::{IVec3, UVec3};
use serde::{Deserialize, Deserializer};

use crate::error::{LayoutError, Result};

/// Which structural axis becomes the layer axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    /// Fixed permutation mapping this axis choice to `(primary, row, col)`
    /// indices into a structure's `(x, y, z)` coordinates.
    pub fn order(self) -> [usize; 3] {
        match self {
            Axis::X => [0, 2, 1],
            Axis::Y => [1, 2, 0],
            Axis::Z => [2, 0, 1],
        }
    }
}

/// Which canvas side the legend occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendPosition {
    #[default]
    Right,
    Left,
    Top,
    Bottom,
}

impl LegendPosition {
    /// Legends on the left or right run down a side column; top and bottom
    /// legends stack into the horizontal margin instead.
    pub fn is_side(self) -> bool {
        matches!(self, LegendPosition::Left | LegendPosition::Right)
    }
}

/// A single entry of the structure palette: block name plus state properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BlockState {
    /// Block name, e.g. "minecraft:stone".
    #[serde(alias = "Name")]
    pub name: String,
    /// Block properties, e.g. {"facing": "north"}.
    #[serde(
        alias = "Properties",
        default,
        deserialize_with = "deserialize_properties"
    )]
    pub properties: HashMap<String, String>,
}

impl BlockState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: HashMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Display and lookup name with any namespace prefix removed.
    pub fn display_name(&self) -> Cow<'_, str> {
        strip_namespace(&self.name)
    }

    /// Check if this palette entry is the empty/background block.
    pub fn is_air(&self) -> bool {
        matches!(
            self.display_name().as_ref(),
            "air" | "cave_air" | "void_air"
        )
    }
}

/// Strip a namespace prefix (`"<ns>:"` or `"#<ns>:"`) from a block name.
///
/// `"minecraft:stone"` -> `"stone"`, `"#minecraft:doors"` -> `"#doors"`,
/// `"stone"` -> `"stone"`.
pub fn strip_namespace(name: &str) -> Cow<'_, str> {
    if let Some(tag) = name.strip_prefix('#') {
        if let Some((_, path)) = tag.split_once(':') {
            return Cow::Owned(format!("#{}", path));
        }
        return Cow::Borrowed(name);
    }
    match name.split_once(':') {
        Some((_, path)) => Cow::Borrowed(path),
        None => Cow::Borrowed(name),
    }
}

/// One block placed in the structure, referencing a palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PositionedBlock {
    /// Position within the structure bounds.
    #[serde(alias = "Pos", deserialize_with = "deserialize_ivec3")]
    pub pos: IVec3,
    /// Index into the structure palette.
    #[serde(alias = "State")]
    pub state: usize,
}

impl PositionedBlock {
    pub fn new(pos: IVec3, state: usize) -> Self {
        Self { pos, state }
    }
}

/// A decoded voxel structure: bounding size, placed blocks, and the palette
/// of distinct block states they reference.
#[derive(Debug, Clone, Deserialize)]
pub struct Structure {
    /// Structure dimensions along x, y, z.
    #[serde(deserialize_with = "deserialize_uvec3")]
    pub size: UVec3,
    /// Placed blocks, position-indexed into the palette.
    pub blocks: Vec<PositionedBlock>,
    /// Deduplicated catalog of block states.
    pub palette: Vec<BlockState>,
}

impl Structure {
    /// Parse a structure from its JSON representation.
    pub fn from_json_str(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Read and parse a structure file.
    pub fn from_json_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Validate the structure invariants before any processing starts:
    /// non-zero size on every axis, a non-empty palette, every palette
    /// index in range, and every position inside `[0, size)`.
    pub fn validate(&self) -> Result<()> {
        if self.size.x == 0 || self.size.y == 0 || self.size.z == 0 {
            return Err(LayoutError::DegenerateSize(format!(
                "structure size {}x{}x{} has a zero-length axis",
                self.size.x, self.size.y, self.size.z
            )));
        }
        if self.palette.is_empty() {
            return Err(LayoutError::InvalidStructure(
                "palette is empty".to_string(),
            ));
        }
        for block in &self.blocks {
            if block.state >= self.palette.len() {
                return Err(LayoutError::InvalidStructure(format!(
                    "palette index {} out of range (palette has {} entries)",
                    block.state,
                    self.palette.len()
                )));
            }
            let p = block.pos;
            if p.x < 0
                || p.y < 0
                || p.z < 0
                || p.x as u32 >= self.size.x
                || p.y as u32 >= self.size.y
                || p.z as u32 >= self.size.z
            {
                return Err(LayoutError::InvalidStructure(format!(
                    "block position ({}, {}, {}) outside structure bounds",
                    p.x, p.y, p.z
                )));
            }
        }
        Ok(())
    }

    /// Index of the first air entry in the palette, if any.
    pub fn air_index(&self) -> Option<usize> {
        self.palette.iter().position(|state| state.is_air())
    }
}

fn deserialize_properties<'de, D>(
    deserializer: D,
) -> std::result::Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    // Structure files carry property values as strings, but decoded NBT may
    // surface booleans or numbers; normalize everything to strings.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Value {
        Text(String),
        Flag(bool),
        Number(i64),
    }

    let raw = HashMap::<String, Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::Text(s) => s,
                Value::Flag(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
            };
            (key, value)
        })
        .collect())
}

fn deserialize_ivec3<'de, D>(deserializer: D) -> std::result::Result<IVec3, D::Error>
where
    D: Deserializer<'de>,
{
    let array = <[i32; 3]>::deserialize(deserializer)?;
    Ok(IVec3::from_array(array))
}

fn deserialize_uvec3<'de, D>(deserializer: D) -> std::result::Result<UVec3, D::Error>
where
    D: Deserializer<'de>,
{
    let array = <[u32; 3]>::deserialize(deserializer)?;
    Ok(UVec3::from_array(array))
}
