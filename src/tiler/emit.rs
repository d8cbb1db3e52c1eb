use std::fs::create_dir_all;
use std::path::Path;

use image::{imageops, DynamicImage, GenericImageView, Rgba};

use crate::utils::encode_png;

use super::plan::PlannedTile;
use super::TileError;

/// Folder shared by every fragment that maps into this pyramid level.
pub fn level_folder_name(tile: &PlannedTile) -> String {
    format!("level_{}_{}", tile.global_x_tiles, tile.global_y_tiles)
}

/// `<name>_<x>_<y>_<xTiles>_<yTiles>_<origW>_<origH>[_<size>].png`
///
/// The trailing size suffix is only written for derived sizing; the naming
/// convention stays consistent within one run.
pub fn tile_file_name(name: &str, tile: &PlannedTile, with_size_suffix: bool) -> String {
    let stem = format!(
        "{}_{}_{}_{}_{}_{}_{}",
        name,
        tile.global_x,
        tile.global_y,
        tile.global_x_tiles,
        tile.global_y_tiles,
        tile.original_width,
        tile.original_height
    );

    if with_size_suffix {
        format!("{}_{}.png", stem, tile.out_width)
    } else {
        format!("{}.png", stem)
    }
}

/// Cuts one planned tile out of the source image, resizes it to the output
/// size and writes it into its level folder. Existing files are overwritten.
pub fn emit_tile(
    img: &DynamicImage,
    tile: &PlannedTile,
    output_path: &Path,
    name: &str,
    with_size_suffix: bool,
) -> Result<(), TileError> {
    let level_path = output_path.join(level_folder_name(tile));
    create_dir_all(&level_path)
        .map_err(|e| TileError::new(tile.level, tile.global_x, tile.global_y, e))?;

    let rect = tile.local_rect;
    let sub = img.view(rect.x, rect.y, rect.width, rect.height);
    let resized = resize(&sub, tile.out_width, tile.out_height);

    let file_path = level_path.join(tile_file_name(name, tile, with_size_suffix));
    encode_png(&file_path, &resized)
        .map_err(|e| TileError::new(tile.level, tile.global_x, tile.global_y, e))
}

fn resize<I: GenericImageView<Pixel = Rgba<u8>>>(image: &I, width: u32, height: u32) -> DynamicImage {
    let buffer = imageops::resize(image, width, height, image::imageops::FilterType::Triangle);

    DynamicImage::ImageRgba8(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiler::plan::PixelRect;

    fn planned_tile() -> PlannedTile {
        PlannedTile {
            level: 2,
            local_rect: PixelRect { x: 0, y: 0, width: 256, height: 256 },
            global_x: 13,
            global_y: 5,
            global_x_tiles: 16,
            global_y_tiles: 8,
            original_width: 2048,
            original_height: 1024,
            out_width: 32,
            out_height: 32,
        }
    }

    #[test]
    fn level_folder_is_named_after_the_global_grid() {
        assert_eq!(level_folder_name(&planned_tile()), "level_16_8");
    }

    #[test]
    fn file_name_without_size_suffix() {
        assert_eq!(
            tile_file_name("world", &planned_tile(), false),
            "world_13_5_16_8_2048_1024.png"
        );
    }

    #[test]
    fn file_name_with_size_suffix() {
        assert_eq!(
            tile_file_name("world", &planned_tile(), true),
            "world_13_5_16_8_2048_1024_32.png"
        );
    }
}
