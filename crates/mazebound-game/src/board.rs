//! The board grid.

use std::sync::Arc;

use crate::direction::Direction;
use crate::error::GameError;
use crate::sprites::SpriteStore;

/// What occupies a board square, as far as movement is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    /// Impassable.
    Wall,
    /// Passable ground. Pellets and units sit on floor squares.
    Floor,
}

/// A rectangular grid of [`Tile`]s.
///
/// Coordinates are `(x, y)` with the origin at the top-left; the board is
/// a torus, so stepping off an edge wraps to the opposite side.
#[derive(Debug, Clone)]
pub struct Board {
    width: usize,
    height: usize,
    /// Row-major, `tiles[y * width + x]`.
    tiles: Vec<Tile>,
}

impl Board {
    /// Board width in squares.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Board height in squares.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The tile at `(x, y)`. Panics if out of bounds; callers only hold
    /// coordinates produced by [`Board::neighbour`] or the map parser.
    pub fn tile(&self, x: usize, y: usize) -> Tile {
        assert!(x < self.width && y < self.height, "square out of bounds");
        self.tiles[y * self.width + x]
    }

    /// The square adjacent to `(x, y)` in `direction`, wrapping around
    /// the edges of the board.
    pub fn neighbour(&self, x: usize, y: usize, direction: Direction) -> (usize, usize) {
        let (dx, dy) = direction.delta();
        let nx = (x as isize + dx).rem_euclid(self.width as isize) as usize;
        let ny = (y as isize + dy).rem_euclid(self.height as isize) as usize;
        (nx, ny)
    }

    /// Whether a unit may occupy the square.
    pub fn passable(&self, x: usize, y: usize) -> bool {
        self.tile(x, y) == Tile::Floor
    }
}

/// Builds [`Board`]s. Holds the sprite store so tile sprites are resolved
/// (and cached) at construction time rather than per frame.
pub struct BoardFactory {
    sprites: Arc<SpriteStore>,
}

impl BoardFactory {
    /// Creates a factory backed by the shared sprite store.
    pub fn new(sprites: Arc<SpriteStore>) -> Self {
        Self { sprites }
    }

    /// Builds a board from a row-major tile grid.
    ///
    /// Fails with [`GameError::EmptyMap`] for a zero-sized grid; the tile
    /// vector length must match `width * height` (map parser invariant).
    pub fn board(
        &self,
        width: usize,
        height: usize,
        tiles: Vec<Tile>,
    ) -> Result<Board, GameError> {
        if width == 0 || height == 0 {
            return Err(GameError::EmptyMap);
        }
        assert_eq!(tiles.len(), width * height, "tile grid size mismatch");

        // Warm the cache so every later board shares the same handles.
        self.sprites.sprite("tile/wall");
        self.sprites.sprite("tile/floor");

        Ok(Board {
            width,
            height,
            tiles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cross_board() -> Board {
        // 3x3 with a wall in the centre.
        let factory = BoardFactory::new(Arc::new(SpriteStore::new()));
        let mut tiles = vec![Tile::Floor; 9];
        tiles[4] = Tile::Wall;
        factory.board(3, 3, tiles).unwrap()
    }

    #[test]
    fn test_tile_lookup() {
        let board = cross_board();
        assert_eq!(board.tile(1, 1), Tile::Wall);
        assert_eq!(board.tile(0, 0), Tile::Floor);
        assert!(!board.passable(1, 1));
        assert!(board.passable(2, 2));
    }

    #[test]
    fn test_neighbour_steps() {
        let board = cross_board();
        assert_eq!(board.neighbour(1, 1, Direction::North), (1, 0));
        assert_eq!(board.neighbour(1, 1, Direction::South), (1, 2));
        assert_eq!(board.neighbour(1, 1, Direction::East), (2, 1));
        assert_eq!(board.neighbour(1, 1, Direction::West), (0, 1));
    }

    #[test]
    fn test_neighbour_wraps_at_edges() {
        let board = cross_board();
        assert_eq!(board.neighbour(0, 0, Direction::North), (0, 2));
        assert_eq!(board.neighbour(0, 0, Direction::West), (2, 0));
        assert_eq!(board.neighbour(2, 2, Direction::South), (2, 0));
        assert_eq!(board.neighbour(2, 2, Direction::East), (0, 2));
    }

    #[test]
    fn test_empty_grid_rejected() {
        let factory = BoardFactory::new(Arc::new(SpriteStore::new()));
        assert!(matches!(
            factory.board(0, 0, Vec::new()),
            Err(GameError::EmptyMap)
        ));
    }
}
