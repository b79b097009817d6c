//! Asset pack loading from directories and ZIP archives.

use std::io::Read;
use std::path::Path;

use crate::error::{LayoutError, Result};

use super::{AssetPack, Sprite};

/// The four sprite roots recognized inside an asset pack.
const ROOTS: [&str; 4] = ["blocks", "properties", "masks", "fonts"];

/// Load an asset pack from a file path.
///
/// Supports both directories and ZIP archives with the same layout.
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<AssetPack> {
    let path = path.as_ref();

    if path.is_dir() {
        load_from_directory(path)
    } else {
        let data = std::fs::read(path)?;
        load_from_bytes(&data)
    }
}

/// Load an asset pack from ZIP bytes.
pub fn load_from_bytes(data: &[u8]) -> Result<AssetPack> {
    let cursor = std::io::Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)?;

    let mut pack = AssetPack::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let file_path = file.name().to_string();

        if let Some((root, name)) = parse_sprite_path(&file_path) {
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            match Sprite::from_png_bytes(&data) {
                Ok(sprite) => insert_sprite(&mut pack, root, name, sprite),
                Err(e) => {
                    log::warn!("failed to decode sprite {}: {}", file_path, e);
                }
            }
        }
    }

    if pack.is_empty() {
        return Err(LayoutError::InvalidAssetPack(
            "archive contains no sprites under blocks/, properties/, masks/ or fonts/"
                .to_string(),
        ));
    }

    Ok(pack)
}

/// Load an asset pack from a directory tree.
fn load_from_directory(path: &Path) -> Result<AssetPack> {
    // Tolerate a single wrapping "assets" directory.
    let base = if path.join("assets").is_dir() {
        path.join("assets")
    } else {
        path.to_path_buf()
    };

    if !base.join("blocks").is_dir() {
        return Err(LayoutError::InvalidAssetPack(format!(
            "no blocks directory found under {}",
            base.display()
        )));
    }

    let mut pack = AssetPack::new();
    for root in ROOTS {
        let root_path = base.join(root);
        if root_path.is_dir() {
            load_sprites_recursive(&root_path, &root_path, root, &mut pack)?;
        }
    }

    Ok(pack)
}

fn load_sprites_recursive(
    base: &Path,
    dir: &Path,
    root: &str,
    pack: &mut AssetPack,
) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            load_sprites_recursive(base, &path, root, pack)?;
        } else if path.extension().map(|e| e == "png").unwrap_or(false) {
            let name = path
                .strip_prefix(base)
                .unwrap_or(&path)
                .with_extension("")
                .to_string_lossy()
                .replace('\\', "/");

            let data = std::fs::read(&path)?;
            match Sprite::from_png_bytes(&data) {
                Ok(sprite) => insert_sprite(pack, root, &name, sprite),
                Err(e) => {
                    log::warn!("failed to decode sprite {}: {}", path.display(), e);
                }
            }
        }
    }
    Ok(())
}

/// Parse a ZIP entry path into (root, sprite name).
///
/// Expected format: `{root}/{name}.png`, optionally below a leading
/// `assets/` directory.
fn parse_sprite_path(file_path: &str) -> Option<(&str, &str)> {
    let trimmed = file_path.strip_prefix("assets/").unwrap_or(file_path);
    let (root, rest) = trimmed.split_once('/')?;
    if !ROOTS.contains(&root) {
        return None;
    }
    let name = rest.strip_suffix(".png")?;
    if name.is_empty() {
        return None;
    }
    Some((root, name))
}

fn insert_sprite(pack: &mut AssetPack, root: &str, name: &str, sprite: Sprite) {
    match root {
        "blocks" => pack.add_block(name, sprite),
        "properties" => pack.add_property(name, sprite),
        "masks" => pack.add_mask(name, sprite),
        "fonts" => pack.add_font(name, sprite),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sprite_path() {
        assert_eq!(
            parse_sprite_path("blocks/stone.png"),
            Some(("blocks", "stone"))
        );
        assert_eq!(
            parse_sprite_path("assets/properties/waterlogged.png"),
            Some(("properties", "waterlogged"))
        );
        assert_eq!(
            parse_sprite_path("fonts/ascii.png"),
            Some(("fonts", "ascii"))
        );
        assert_eq!(parse_sprite_path("blocks/readme.txt"), None);
        assert_eq!(parse_sprite_path("models/block/stone.png"), None);
        assert_eq!(parse_sprite_path("stone.png"), None);
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocks = dir.path().join("blocks");
        let properties = dir.path().join("properties");
        std::fs::create_dir_all(&blocks).unwrap();
        std::fs::create_dir_all(&properties).unwrap();

        Sprite::filled(16, 16, [1, 1, 1, 255])
            .save(blocks.join("stone.png"))
            .unwrap();
        Sprite::filled(16, 16, [2, 2, 2, 255])
            .save(properties.join("waterlogged.png"))
            .unwrap();
        // Non-PNG files are ignored.
        std::fs::write(blocks.join("notes.txt"), b"hi").unwrap();

        let pack = load_from_path(dir.path()).unwrap();
        assert_eq!(pack.block_count(), 1);
        assert_eq!(pack.property_count(), 1);
        assert!(pack.block_sprite("stone").is_some());
        assert!(pack.property_sprite("waterlogged").is_some());
    }

    #[test]
    fn test_load_from_directory_without_blocks_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("masks")).unwrap();
        assert!(matches!(
            load_from_path(dir.path()),
            Err(LayoutError::InvalidAssetPack(_))
        ));
    }

    #[test]
    fn test_load_from_zip_bytes() {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let mut buf = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
            let options = SimpleFileOptions::default();
            writer.start_file("blocks/dirt.png", options).unwrap();
            writer
                .write_all(&Sprite::filled(16, 16, [9, 9, 9, 255]).to_png().unwrap())
                .unwrap();
            writer.start_file("fonts/ascii.png", options).unwrap();
            writer
                .write_all(&Sprite::new(128, 128).to_png().unwrap())
                .unwrap();
            writer.finish().unwrap();
        }

        let pack = load_from_bytes(&buf).unwrap();
        assert!(pack.block_sprite("dirt").is_some());
        assert!(pack.font_sprite("ascii").is_some());
    }

    #[test]
    fn test_load_from_empty_zip_fails() {
        let mut buf = Vec::new();
        {
            let writer = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
            writer.finish().unwrap();
        }
        assert!(matches!(
            load_from_bytes(&buf),
            Err(LayoutError::InvalidAssetPack(_))
        ));
    }
}
