use thiserror::Error;

use crate::content::TeamId;

/// A tile occupant. Blocks take direct projectile damage; a deflecting
/// block suppresses the projectile instead of stopping it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub team: TeamId,
    pub health: f32,
    pub accepts_collision: bool,
    pub deflects: bool,
}

impl Block {
    pub fn wall(team: TeamId, health: f32) -> Self {
        Self {
            team,
            health,
            accepts_collision: true,
            deflects: false,
        }
    }

    pub fn deflector(team: TeamId, health: f32) -> Self {
        Self {
            team,
            health,
            accepts_collision: true,
            deflects: true,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn apply_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TileGridError {
    #[error("tile ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
}

/// World geometry as seen by the projectile simulation: a rectangular
/// grid of optional block occupants, origin at tile (0, 0).
#[derive(Debug, Clone)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tile_size: f32,
    blocks: Vec<Option<Block>>,
}

impl TileGrid {
    pub fn new(width: u32, height: u32, tile_size: f32) -> Self {
        Self {
            width,
            height,
            tile_size,
            blocks: vec![None; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn place_block(&mut self, x: i32, y: i32, block: Block) -> Result<(), TileGridError> {
        let Some(index) = self.index_of(x, y) else {
            return Err(TileGridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        };
        self.blocks[index] = Some(block);
        Ok(())
    }

    pub fn clear_block(&mut self, x: i32, y: i32) {
        if let Some(index) = self.index_of(x, y) {
            self.blocks[index] = None;
        }
    }

    pub fn block_at(&self, x: i32, y: i32) -> Option<&Block> {
        let index = self.index_of(x, y)?;
        self.blocks[index].as_ref()
    }

    pub fn block_at_mut(&mut self, x: i32, y: i32) -> Option<&mut Block> {
        let index = self.index_of(x, y)?;
        self.blocks[index].as_mut()
    }

    /// Nearest tile coordinate for a world coordinate.
    pub fn world_to_tile(&self, world: f32) -> i32 {
        (world / self.tile_size).round() as i32
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

/// Walks the tile line from `(x0, y0)` to `(x1, y1)` inclusive,
/// invoking `visit` per tile until it returns true. Returns the tile
/// that stopped the walk, if any.
pub fn raycast_tiles(
    mut x0: i32,
    mut y0: i32,
    x1: i32,
    y1: i32,
    mut visit: impl FnMut(i32, i32) -> bool,
) -> Option<(i32, i32)> {
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let step_x = if x0 < x1 { 1 } else { -1 };
    let step_y = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        if visit(x0, y0) {
            return Some((x0, y0));
        }
        if x0 == x1 && y0 == y1 {
            return None;
        }
        let doubled = 2 * err;
        if doubled > -dy {
            err -= dy;
            x0 += step_x;
        }
        if doubled < dx {
            err += dx;
            y0 += step_y;
        }
    }
}
