use std::path::Path;
use std::time::Instant;

use anyhow::bail;
use glob::glob;
use image::io::Reader as ImageReader;

use super::plan::{BaseContext, PyramidParams, TileSizing};
use super::build_pyramid;

/// Fragments are the eight squares of a 4x2 cut of the original, so they sit
/// two pyramid levels deep.
pub const FRAGMENT_BASE_LEVEL: u32 = 2;
pub const FRAGMENT_INITIAL_LEVEL: u32 = 0;
pub const FRAGMENT_MAX_LEVEL: u32 = 4;

const FRAGMENT_PATTERN: &str = "*.png";

/// Maps a fragment file's type token to the fragment's global tile
/// coordinate on the base level. Follows the Blue-Marble convention of eight
/// squares A1..D2: the letter is the column, the digit the row.
pub const FRAGMENT_INDEX: [(&str, (u32, u32)); 8] = [
    ("A1", (0, 0)),
    ("A2", (0, 1)),
    ("B1", (1, 0)),
    ("B2", (1, 1)),
    ("C1", (2, 0)),
    ("C2", (2, 1)),
    ("D1", (3, 0)),
    ("D2", (3, 1)),
];

/// Extracts the type token from a fragment file name: the first `.`- or
/// `_`-separated component made of one uppercase letter and one digit.
pub fn fragment_token(file_name: &str) -> Option<&str> {
    file_name.split(|c| c == '.' || c == '_').find(|part| {
        let mut chars = part.chars();
        part.len() == 2
            && chars.next().map_or(false, |c| c.is_ascii_uppercase())
            && chars.next().map_or(false, |c| c.is_ascii_digit())
    })
}

fn base_index(token: &str, table: &[(&str, (u32, u32))]) -> Option<(u32, u32)> {
    table.iter().find(|(t, _)| *t == token).map(|(_, index)| *index)
}

/// Tiles every fragment image found in `input_path` into one shared pyramid
/// under `output_path`.
///
/// Each fragment is loaded, tiled and dropped before the next one. Fragments
/// emit disjoint global coordinates, so the shared level folders merge
/// without collisions as long as the base index table is correct.
pub fn run_batch(
    input_path: &Path,
    output_path: &Path,
    name: &str,
    table: &[(&str, (u32, u32))],
) -> anyhow::Result<()> {
    let pattern = match input_path.join(FRAGMENT_PATTERN).to_str() {
        Some(p) => p.to_string(),
        None => bail!("Input path is not valid UTF-8"),
    };

    let mut fragments = 0;
    for entry in glob(&pattern)? {
        let path = entry?;
        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n.to_string(),
            None => bail!("Invalid fragment file name: {}", path.display()),
        };

        let token = match fragment_token(&file_name) {
            Some(t) => t,
            None => bail!("Fragment '{}' carries no type token", file_name),
        };
        let index = match base_index(token, table) {
            Some(i) => i,
            None => bail!("Fragment token '{}' is not in the base index table", token),
        };

        let now = Instant::now();
        println!(
            "▶️  Tiling fragment {} (base index {}/{})",
            file_name, index.0, index.1
        );

        let img = ImageReader::open(&path)?.decode()?;
        let params = PyramidParams {
            initial_level: FRAGMENT_INITIAL_LEVEL,
            max_level: FRAGMENT_MAX_LEVEL,
            base: BaseContext {
                level: FRAGMENT_BASE_LEVEL,
                index,
            },
            sizing: TileSizing::Derived,
        };
        build_pyramid(&img, output_path, name, &params)?;

        println!(
            "✔️  Tiled fragment {} in {}ms",
            file_name,
            now.elapsed().as_millis()
        );
        fragments += 1;
    }

    if fragments == 0 {
        bail!("No fragments found in {}", input_path.display());
    }

    Ok(())
}
