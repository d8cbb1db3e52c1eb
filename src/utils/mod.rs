use image::{codecs::png::PngEncoder, DynamicImage, GenericImageView};
use std::fs::File;
use std::io::{BufWriter, Error, ErrorKind};
use std::path::Path;

pub fn encode_png(
    file_path: &Path,
    img: &DynamicImage,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let file = File::create(file_path)?;
    let mut buf = BufWriter::new(file);
    let encoder = PngEncoder::new(&mut buf);

    let (width, height) = img.dimensions();
    encoder
        .encode(&img.to_bytes(), width, height, img.color())
        .map_err(|err| Error::new(ErrorKind::Other, err.to_string()))?;

    Ok(())
}

#[cfg(test)]
pub fn with_input_and_output_paths(f: fn(std::path::PathBuf, std::path::PathBuf)) -> std::io::Result<()> {
    use std::fs::DirBuilder;
    use tempdir::TempDir;

    let dir = TempDir::new("pyramid-utils")?;
    let temp_dir_path = dir.path();
    let input_path = temp_dir_path.join("input");
    let output_path = temp_dir_path.join("output");
    DirBuilder::new().create(&input_path)?;
    DirBuilder::new().create(&output_path)?;

    f(input_path, output_path);

    dir.close()
}
