type Underlying = Box<dyn std::error::Error + Send + Sync>;

/// Failure while emitting a single tile, tagged with the tile's global
/// pyramid position.
#[derive(thiserror::Error, Debug)]
#[error("Tile {x}/{y} on level {level}: {source}")]
pub struct TileError {
    level: u32,
    x: u32,
    y: u32,
    #[source]
    source: Underlying,
}

impl TileError {
    pub fn new(level: u32, x: u32, y: u32, source: impl Into<Underlying>) -> Self {
        TileError {
            level,
            x,
            y,
            source: source.into(),
        }
    }
}
