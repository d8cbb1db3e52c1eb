use std::fs::create_dir_all;
use std::path::Path;
use std::time::Instant;

use anyhow::bail;
use clap::{arg, App};
use image::io::Reader as ImageReader;

use crate::commands::Command;
use crate::tiler::{build_pyramid, BaseContext, PyramidParams, TileSizing};

/// Composable mode: the output tile size is derived from the source
/// dimensions and appended to every file name, so tile sets generated from
/// sibling fragments compose into one consistent pyramid.
pub struct Pyramid {}

impl Command for Pyramid {
    fn identifier(&self) -> &'static str {
        "pyramid"
    }

    fn register(&self) -> App<'static> {
        App::new("pyramid")
            .about("Cut an image into composable pyramid tiles with a derived output size.")
            .arg(arg!(<INPUT_IMAGE> "Path to the source image"))
            .arg(arg!(<OUTPUT_DIR> "Path to the output directory"))
            .arg(arg!(<NAME> "Base name of the emitted tile files"))
            .arg(arg!(--"max-level" [LEVEL] "Maximum level for tiling").default_value("3"))
    }

    fn run(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
        let start = Instant::now();

        let input_path = Path::new(args.value_of("INPUT_IMAGE").unwrap());
        let output_path = Path::new(args.value_of("OUTPUT_DIR").unwrap());
        let name = args.value_of("NAME").unwrap();
        let max_level: u32 = args.value_of("max-level").unwrap().parse()?;

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
            sizing: TileSizing::Derived,
        };

        println!("▶️  Building tiles");
        build_pyramid(&img, output_path, name, &params)?;

        println!("\n    🎉  Finished in {}ms", start.elapsed().as_millis());

        Ok(())
    }
}
