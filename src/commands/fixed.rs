use std::fs::create_dir_all;
use std::path::Path;
use std::time::Instant;

use anyhow::bail;
use clap::{arg, App};
use image::io::Reader as ImageReader;

use crate::commands::Command;
use crate::tiler::{build_pyramid, BaseContext, PyramidParams, TileSizing};

/// Fixed-size mode: every emitted tile has the caller-supplied dimensions,
/// file names carry no size suffix.
pub struct Fixed {}

impl Command for Fixed {
    fn identifier(&self) -> &'static str {
        "fixed"
    }

    fn register(&self) -> App<'static> {
        App::new("fixed")
            .about("Cut an image into pyramid tiles of a fixed output size.")
            .arg(arg!(<INPUT_IMAGE> "Path to the source image"))
            .arg(arg!(<OUTPUT_DIR> "Path to the output directory"))
            .arg(arg!(<NAME> "Base name of the emitted tile files"))
            .arg(arg!(--"max-level" [LEVEL] "Maximum level for tiling").default_value("3"))
            .arg(arg!(--"tile-width" [PIXELS] "Width of each tile").default_value("128"))
            .arg(arg!(--"tile-height" [PIXELS] "Height of each tile").default_value("128"))
    }

    fn run(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
        let start = Instant::now();

        let input_path = Path::new(args.value_of("INPUT_IMAGE").unwrap());
        let output_path = Path::new(args.value_of("OUTPUT_DIR").unwrap());
        let name = args.value_of("NAME").unwrap();
        let max_level: u32 = args.value_of("max-level").unwrap().parse()?;
        let tile_width: u32 = args.value_of("tile-width").unwrap().parse()?;
        let tile_height: u32 = args.value_of("tile-height").unwrap().parse()?;

        if !input_path.is_file() {
            bail!("Input image does not exist");
        }
        create_dir_all(output_path)?;

        let now = Instant::now();
        println!("▶️  Loading source image");
        let img = ImageReader::open(input_path)?.decode()?;
        println!("✔️  Loaded source image in {}ms", now.elapsed().as_millis());

        let params = PyramidParams {
            initial_level: 1,
            max_level,
            base: BaseContext::untiled(),
            sizing: TileSizing::Explicit {
                width: tile_width,
                height: tile_height,
            },
        };

        println!("▶️  Building tiles");
        build_pyramid(&img, output_path, name, &params)?;

        println!("\n    🎉  Finished in {}ms", start.elapsed().as_millis());

        Ok(())
    }
}
