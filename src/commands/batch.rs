use std::path::Path;
use std::time::Instant;

use anyhow::bail;
use clap::{arg, App};

use crate::commands::Command;
use crate::tiler::{run_batch, FRAGMENT_INDEX};

/// Batch driver: tiles a directory of base-level fragments (Blue-Marble
/// style A1..D2 squares) into one shared global pyramid.
pub struct Batch {}

impl Command for Batch {
    fn identifier(&self) -> &'static str {
        "batch"
    }

    fn register(&self) -> App<'static> {
        App::new("batch")
            .about("Tile a directory of pyramid fragments into one shared pyramid.")
            .arg(arg!(<INPUT_DIR> "Directory containing the fragment images"))
            .arg(arg!(<OUTPUT_DIR> "Path to the output directory"))
            .arg(arg!(<NAME> "Base name of the emitted tile files"))
    }

    fn run(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
        let start = Instant::now();

        let input_path = Path::new(args.value_of("INPUT_DIR").unwrap());
        let output_path = Path::new(args.value_of("OUTPUT_DIR").unwrap());
        let name = args.value_of("NAME").unwrap();

        if !input_path.is_dir() {
            bail!("Input path is not a directory");
        }
        std::fs::create_dir_all(output_path)?;

        run_batch(input_path, output_path, name, &FRAGMENT_INDEX)?;

        println!("\n    🎉  Finished in {}ms", start.elapsed().as_millis());

        Ok(())
    }
}
