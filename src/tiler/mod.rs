mod batch;
mod emit;
mod plan;
mod tile_error;

use std::path::Path;
use std::time::Instant;

use image::{DynamicImage, GenericImageView};

pub use batch::{
    run_batch, FRAGMENT_BASE_LEVEL, FRAGMENT_INDEX, FRAGMENT_INITIAL_LEVEL, FRAGMENT_MAX_LEVEL,
};
pub use emit::{emit_tile, level_folder_name, tile_file_name};
pub use plan::{plan, plan_level, BaseContext, PixelRect, PlannedTile, PyramidParams, TileSizing};
pub use tile_error::TileError;

/// Tiles one source image into the pyramid described by `params`, writing
/// one folder per global level under `output_path`.
pub fn build_pyramid(
    img: &DynamicImage,
    output_path: &Path,
    name: &str,
    params: &PyramidParams,
) -> anyhow::Result<()> {
    let (width, height) = img.dimensions();
    let with_size_suffix = matches!(params.sizing, TileSizing::Derived);

    for level in params.initial_level..=params.max_level {
        let now = Instant::now();
        let tiles = plan_level(width, height, params, level);

        for tile in &tiles {
            emit_tile(img, tile, output_path, name, with_size_suffix)?;
        }

        println!(
            "    ✔️  Finished {} tiles for level {} in {}ms",
            tiles.len(),
            level,
            now.elapsed().as_millis()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use image::io::Reader as ImageReader;
    use image::{DynamicImage, GenericImageView};

    use crate::utils::with_input_and_output_paths;

    use super::*;

    fn fixed_params(max_level: u32) -> PyramidParams {
        PyramidParams {
            initial_level: 1,
            max_level,
            base: BaseContext::untiled(),
            sizing: TileSizing::Explicit {
                width: 128,
                height: 128,
            },
        }
    }

    fn file_names(path: &Path) -> Vec<String> {
        let mut names: Vec<String> = path
            .read_dir()
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_str().unwrap().to_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn fixed_sizing_writes_the_expected_folders_and_tile_counts() {
        with_input_and_output_paths(|_, output_path| {
            let img = DynamicImage::new_rgba8(256, 256);

            build_pyramid(&img, &output_path, "map", &fixed_params(3)).unwrap();

            assert_eq!(
                file_names(&output_path),
                vec!["level_2_1", "level_4_2", "level_8_4"]
            );
            assert_eq!(file_names(&output_path.join("level_2_1")).len(), 2);
            assert_eq!(file_names(&output_path.join("level_4_2")).len(), 8);
            assert_eq!(file_names(&output_path.join("level_8_4")).len(), 32);

            let tile_path = output_path.join("level_2_1").join("map_0_0_2_1_256_256.png");
            let tile = ImageReader::open(tile_path).unwrap().decode().unwrap();
            assert_eq!(tile.dimensions(), (128, 128));
        })
        .unwrap();
    }

    #[test]
    fn derived_sizing_appends_the_tile_size_to_file_names() {
        with_input_and_output_paths(|_, output_path| {
            let img = DynamicImage::new_rgba8(256, 256);
            let params = PyramidParams {
                initial_level: 1,
                max_level: 3,
                base: BaseContext::untiled(),
                sizing: TileSizing::Derived,
            };

            build_pyramid(&img, &output_path, "map", &params).unwrap();

            // ceil(256 / 2^3) = 32
            let names = file_names(&output_path.join("level_2_1"));
            assert_eq!(
                names,
                vec!["map_0_0_2_1_256_256_32.png", "map_1_0_2_1_256_256_32.png"]
            );

            let tile_path = output_path.join("level_2_1").join(&names[0]);
            let tile = ImageReader::open(tile_path).unwrap().decode().unwrap();
            assert_eq!(tile.dimensions(), (32, 32));
        })
        .unwrap();
    }

    #[test]
    fn initial_level_above_max_level_writes_nothing() {
        with_input_and_output_paths(|_, output_path| {
            let img = DynamicImage::new_rgba8(256, 256);
            let mut params = fixed_params(3);
            params.initial_level = 4;

            build_pyramid(&img, &output_path, "map", &params).unwrap();

            assert!(file_names(&output_path).is_empty());
        })
        .unwrap();
    }

    #[test]
    fn rerunning_overwrites_tiles_byte_for_byte() {
        with_input_and_output_paths(|_, output_path| {
            let mut img = DynamicImage::new_rgba8(256, 256);
            // non-uniform content so the resize arithmetic actually matters
            if let DynamicImage::ImageRgba8(buffer) = &mut img {
                for (x, y, pixel) in buffer.enumerate_pixels_mut() {
                    *pixel = image::Rgba([(x % 256) as u8, (y % 256) as u8, 7, 255]);
                }
            }

            let tile_path = output_path.join("level_2_1").join("map_1_0_2_1_256_256.png");

            build_pyramid(&img, &output_path, "map", &fixed_params(1)).unwrap();
            let first = fs::read(&tile_path).unwrap();

            build_pyramid(&img, &output_path, "map", &fixed_params(1)).unwrap();
            let second = fs::read(&tile_path).unwrap();

            assert_eq!(first, second);
        })
        .unwrap();
    }
}
