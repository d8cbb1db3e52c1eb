/// Pixel rectangle within the currently loaded source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// How the edge length of emitted tiles is chosen.
///
/// Both variants run through the same crop/resize/pyramid core; they only
/// differ in where the output size comes from and whether the size is
/// appended to emitted file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileSizing {
    /// Caller-supplied output dimensions. File names carry no size suffix.
    Explicit { width: u32, height: u32 },
    /// Edge length derived from the source dimensions so that sibling
    /// fragments of one pyramid emit uniformly sized tiles. File names
    /// carry the size as a trailing suffix.
    Derived,
}

/// Position of the loaded image within the pyramid it was cut from.
///
/// `level == 0` means the image is the untiled original; `index` is only
/// meaningful for `level > 0` and gives the fragment's own global tile
/// coordinate on that level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseContext {
    pub level: u32,
    pub index: (u32, u32),
}

impl BaseContext {
    pub fn untiled() -> Self {
        BaseContext { level: 0, index: (0, 0) }
    }
}

/// Parameters for one tiling run over a single source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PyramidParams {
    pub initial_level: u32,
    pub max_level: u32,
    pub base: BaseContext,
    pub sizing: TileSizing,
}

/// One tile the planner wants emitted: where to cut the loaded image and
/// where the cut ends up in the full pyramid's grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedTile {
    pub level: u32,
    pub local_rect: PixelRect,
    pub global_x: u32,
    pub global_y: u32,
    pub global_x_tiles: u32,
    pub global_y_tiles: u32,
    pub original_width: u32,
    pub original_height: u32,
    pub out_width: u32,
    pub out_height: u32,
}

impl PyramidParams {
    /// Grid dimensions of the base level the loaded fragment belongs to.
    /// The top-level grid follows a 2:1 x:y aspect convention.
    fn base_grid(&self) -> (u32, u32) {
        if self.base.level == 0 {
            (1, 1)
        } else {
            (1u32 << self.base.level, 1u32 << (self.base.level - 1))
        }
    }

    /// Pixel dimensions of the full original image the fragment was cut from.
    pub fn original_dimensions(&self, image_width: u32, image_height: u32) -> (u32, u32) {
        let (base_x_tiles, base_y_tiles) = self.base_grid();
        (image_width * base_x_tiles, image_height * base_y_tiles)
    }

    /// Derived output tile edge length: `ceil(2^base * width / 2^(base + max))`.
    /// Constant across all levels of one run.
    pub fn target_tile_size(&self, image_width: u32) -> u32 {
        let total_levels = self.base.level + self.max_level;
        let numerator = (1u64 << self.base.level) * image_width as u64;
        let denominator = 1u64 << total_levels;
        ((numerator + denominator - 1) / denominator) as u32
    }

    /// Pixel dimensions every emitted tile is resized to.
    pub fn output_dimensions(&self, image_width: u32) -> (u32, u32) {
        match self.sizing {
            TileSizing::Explicit { width, height } => (width, height),
            TileSizing::Derived => {
                let edge = self.target_tile_size(image_width);
                (edge, edge)
            }
        }
    }

    /// Grid used for cutting the loaded image on `level`. The y-exponent
    /// drops by one only for an untiled source; fragments of a deeper base
    /// level are square and get a square local grid.
    fn local_grid(&self, level: u32) -> (u32, u32) {
        let max_x_tiles = 1u32 << level;
        let max_y_tiles = if self.base.level == 0 {
            1u32 << level.saturating_sub(1)
        } else {
            1u32 << level
        };
        (max_x_tiles, max_y_tiles)
    }

    /// Grid of the full pyramid on `level`, used for folder and file naming.
    fn global_grid(&self, level: u32) -> (u32, u32) {
        let exponent = level + self.base.level;
        (1u32 << exponent, 1u32 << exponent.saturating_sub(1))
    }

    /// Where the fragment's local `(0, 0)` tile sits in the global grid.
    fn global_offset(&self, level: u32) -> (u32, u32) {
        let (base_x_tiles, base_y_tiles) = self.base_grid();
        let (global_x_tiles, global_y_tiles) = self.global_grid(level);

        (
            (global_x_tiles / base_x_tiles) * self.base.index.0,
            (global_y_tiles / base_y_tiles) * self.base.index.1,
        )
    }
}

/// Plans all tiles of a single level.
///
/// Tile rects come from truncating division; if the image dimensions don't
/// divide evenly by the grid, the remainder pixels at the right/bottom edge
/// are dropped.
pub fn plan_level(
    image_width: u32,
    image_height: u32,
    params: &PyramidParams,
    level: u32,
) -> Vec<PlannedTile> {
    let (max_x_tiles, max_y_tiles) = params.local_grid(level);
    let (global_x_tiles, global_y_tiles) = params.global_grid(level);
    let (x_offset, y_offset) = params.global_offset(level);
    let (original_width, original_height) = params.original_dimensions(image_width, image_height);
    let (out_width, out_height) = params.output_dimensions(image_width);

    let tile_width = image_width / max_x_tiles;
    let tile_height = image_height / max_y_tiles;

    let mut tiles = Vec::with_capacity((max_x_tiles * max_y_tiles) as usize);

    for x_index in 0..max_x_tiles {
        for y_index in 0..max_y_tiles {
            tiles.push(PlannedTile {
                level,
                local_rect: PixelRect {
                    x: x_index * tile_width,
                    y: y_index * tile_height,
                    width: tile_width,
                    height: tile_height,
                },
                global_x: x_offset + x_index,
                global_y: y_offset + y_index,
                global_x_tiles,
                global_y_tiles,
                original_width,
                original_height,
                out_width,
                out_height,
            });
        }
    }

    tiles
}

/// Plans every tile of the run, level by level. An `initial_level` above
/// `max_level` yields an empty plan.
pub fn plan(image_width: u32, image_height: u32, params: &PyramidParams) -> Vec<PlannedTile> {
    (params.initial_level..=params.max_level)
        .flat_map(|level| plan_level(image_width, image_height, params, level))
        .collect()
}
