/// The tile grid: a fixed-size rectangular field of cell states.
///
/// The grid is owned by the world state, mutated one cell at a time by
/// pickup consumption, and replaced wholesale on level-up. All queries
/// are in tile coordinates; sub-tile actor positions are mapped to tiles
/// by the physics layer.

use super::tile::Tile;

/// Grid dimensions in tiles. The maze carver and the collision resolver
/// both assume this exact size.
pub const GRID_WIDTH: usize = 19;
pub const GRID_HEIGHT: usize = 22;

/// The tile where the player spawns and the maze carve begins.
pub const SPAWN_TILE: (usize, usize) = (9, 16);

#[derive(Clone, Debug)]
pub struct Grid {
    cells: Vec<Vec<Tile>>,
}

impl Grid {
    /// A grid of solid wall, ready for carving.
    pub fn filled() -> Self {
        Grid {
            cells: vec![vec![Tile::Wall; GRID_WIDTH]; GRID_HEIGHT],
        }
    }

    /// Cell state at (x, y) in tile coordinates.
    ///
    /// Out-of-bounds access is a caller bug and panics; the collision
    /// resolver bounds-checks positions before querying.
    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> Tile {
        self.cells[y][x]
    }

    #[inline]
    pub fn set_cell(&mut self, x: usize, y: usize, tile: Tile) {
        self.cells[y][x] = tile;
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < GRID_WIDTH && y >= 0 && (y as usize) < GRID_HEIGHT
    }

    /// The four pellet tiles, one nearest each maze corner.
    pub fn corner_tiles() -> [(usize, usize); 4] {
        [
            (1, 1),
            (GRID_WIDTH - 2, 1),
            (1, GRID_HEIGHT - 2),
            (GRID_WIDTH - 2, GRID_HEIGHT - 2),
        ]
    }

    /// Number of Dot cells currently on the grid.
    pub fn dot_count(&self) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&c| c == Tile::Dot)
            .count()
    }

    /// Interior cells matching a predicate, in row-major order.
    /// Used for pursuer placement and fruit spawning.
    pub fn interior_cells_where(&self, pred: impl Fn(Tile) -> bool) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for y in 1..GRID_HEIGHT - 1 {
            for x in 1..GRID_WIDTH - 1 {
                if pred(self.cells[y][x]) {
                    out.push((x, y));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_grid_is_all_wall() {
        let g = Grid::filled();
        assert_eq!(g.cell(0, 0), Tile::Wall);
        assert_eq!(g.cell(GRID_WIDTH - 1, GRID_HEIGHT - 1), Tile::Wall);
        assert_eq!(g.dot_count(), 0);
    }

    #[test]
    fn set_cell_changes_one_cell() {
        let mut g = Grid::filled();
        g.set_cell(3, 4, Tile::Dot);
        assert_eq!(g.cell(3, 4), Tile::Dot);
        assert_eq!(g.cell(4, 3), Tile::Wall);
        assert_eq!(g.dot_count(), 1);
    }

    #[test]
    fn corner_tiles_are_interior() {
        for (x, y) in Grid::corner_tiles() {
            assert!(x > 0 && x < GRID_WIDTH - 1);
            assert!(y > 0 && y < GRID_HEIGHT - 1);
        }
    }

    #[test]
    fn interior_cells_exclude_border() {
        let mut g = Grid::filled();
        g.set_cell(0, 0, Tile::Empty);
        g.set_cell(1, 1, Tile::Empty);
        let open = g.interior_cells_where(|t| t.is_open());
        assert_eq!(open, vec![(1, 1)]);
    }
}
