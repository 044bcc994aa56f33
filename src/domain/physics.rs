/// Collision resolver: may a square actor occupy a target position?
///
/// Actors are axis-aligned squares in sub-tile units. Legality is
/// sampled at the square's four corners only, each inset from the true
/// edge by a small buffer. The inset makes the hit box slightly
/// forgiving, so actors do not snag on wall corners when turning into a
/// corridor. The buffer magnitude is part of the movement feel and must
/// not change.
///
/// A position is illegal if any sampled corner lands on a Wall tile or
/// outside the grid. Bounds are checked here, before the grid is
/// queried, so the grid itself never sees an out-of-range index.

use super::entity::Direction;
use super::grid::Grid;

/// Sub-tile units per tile.
pub const TILE_SIZE: f32 = 20.0;
/// Side length of every actor's square hit box.
pub const ACTOR_SIZE: f32 = 20.0;
/// Corner inset from the hit-box edge.
pub const CORNER_BUFFER: f32 = 2.0;

/// The four sampled corners of an actor whose top-left is at (x, y).
#[inline]
pub fn hit_box_corners(x: f32, y: f32) -> [(f32, f32); 4] {
    let near = CORNER_BUFFER;
    let far = ACTOR_SIZE - CORNER_BUFFER - 1.0;
    [
        (x + near, y + near),
        (x + far, y + near),
        (x + near, y + far),
        (x + far, y + far),
    ]
}

/// Tile containing a sub-tile point.
#[inline]
fn tile_of(px: f32, py: f32) -> (i32, i32) {
    ((px / TILE_SIZE).floor() as i32, (py / TILE_SIZE).floor() as i32)
}

/// May an actor's hit box sit at top-left (x, y)?
pub fn can_occupy(grid: &Grid, x: f32, y: f32) -> bool {
    for (cx, cy) in hit_box_corners(x, y) {
        let (tx, ty) = tile_of(cx, cy);
        if !grid.in_bounds(tx, ty) {
            return false;
        }
        if grid.cell(tx as usize, ty as usize).is_wall() {
            return false;
        }
    }
    true
}

/// May an actor at (x, y) take one step of `step` units in `dir`?
pub fn can_step(grid: &Grid, x: f32, y: f32, dir: Direction, step: f32) -> bool {
    let (nx, ny) = dir.stepped(x, y, step);
    can_occupy(grid, nx, ny)
}

/// All directions legal from (x, y) at the given step, in canonical
/// order. Empty when the actor is boxed in.
pub fn legal_directions(grid: &Grid, x: f32, y: f32, step: f32) -> Vec<Direction> {
    Direction::ALL
        .iter()
        .copied()
        .filter(|&d| can_step(grid, x, y, d, step))
        .collect()
}

/// Tile under an actor's center. Callers must bounds-check before using
/// it as a grid index; a legally placed actor is always in bounds.
#[inline]
pub fn center_tile(x: f32, y: f32) -> (i32, i32) {
    tile_of(x + ACTOR_SIZE / 2.0, y + ACTOR_SIZE / 2.0)
}

/// Does a pursuer's hit box touch the player's?
///
/// Tested corner-by-corner against the half-size box around the
/// player's center, matching the tolerant wall sampling above.
pub fn touches_player(px: f32, py: f32, ex: f32, ey: f32) -> bool {
    let cx = px + ACTOR_SIZE / 2.0;
    let cy = py + ACTOR_SIZE / 2.0;
    hit_box_corners(ex, ey)
        .iter()
        .any(|&(kx, ky)| (kx - cx).abs() < ACTOR_SIZE / 2.0 && (ky - cy).abs() < ACTOR_SIZE / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::{GRID_HEIGHT, GRID_WIDTH};
    use crate::domain::tile::Tile;

    /// Grid from string rows; '#' = wall, '.' = dot, anything else empty.
    /// Rows are stamped onto a wall-filled full-size grid from (0, 0).
    fn grid_from(rows: &[&str]) -> Grid {
        let mut g = Grid::filled();
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let tile = match ch {
                    '#' => Tile::Wall,
                    '.' => Tile::Dot,
                    _ => Tile::Empty,
                };
                g.set_cell(x, y, tile);
            }
        }
        g
    }

    #[test]
    fn open_corridor_is_legal() {
        let g = grid_from(&[
            "###",
            "# #",
            "###",
        ]);
        // Actor aligned exactly on the open tile (1, 1).
        assert!(can_occupy(&g, TILE_SIZE, TILE_SIZE));
    }

    #[test]
    fn corner_in_wall_is_illegal() {
        let g = grid_from(&[
            "###",
            "# #",
            "###",
        ]);
        // Shifted right far enough that the far corners cross into (2, 1).
        assert!(!can_occupy(&g, TILE_SIZE + CORNER_BUFFER + 1.0, TILE_SIZE));
    }

    #[test]
    fn buffer_tolerates_slight_overlap() {
        let g = grid_from(&[
            "###",
            "# #",
            "###",
        ]);
        // Overlapping the wall by up to the buffer still passes: the
        // sampled corner stays inside the open tile.
        assert!(can_occupy(&g, TILE_SIZE - CORNER_BUFFER, TILE_SIZE));
        // One unit past the buffer puts the near corner in the wall.
        assert!(!can_occupy(&g, TILE_SIZE - CORNER_BUFFER - 1.0, TILE_SIZE));
    }

    #[test]
    fn out_of_bounds_is_illegal() {
        let g = grid_from(&["   ", "   "]);
        assert!(!can_occupy(&g, -1.0 - CORNER_BUFFER, 0.0));
        assert!(!can_occupy(
            &g,
            (GRID_WIDTH as f32) * TILE_SIZE - 1.0,
            (GRID_HEIGHT as f32) * TILE_SIZE - 1.0,
        ));
    }

    #[test]
    fn legal_directions_in_single_wall_corridor() {
        // Horizontal corridor: only left/right from the middle. The
        // step must exceed the corner buffer for the walls to bite.
        let g = grid_from(&[
            "#####",
            "#   #",
            "#####",
        ]);
        let dirs = legal_directions(&g, 2.0 * TILE_SIZE, TILE_SIZE, 4.0);
        assert_eq!(dirs, vec![Direction::Left, Direction::Right]);
    }

    #[test]
    fn small_steps_may_wiggle_within_the_buffer() {
        // A step no larger than the buffer stays legal even against a
        // wall: the inset corners never leave the open tile.
        let g = grid_from(&[
            "#####",
            "#   #",
            "#####",
        ]);
        assert!(can_step(&g, 2.0 * TILE_SIZE, TILE_SIZE, Direction::Up, 2.0));
        assert!(!can_step(&g, 2.0 * TILE_SIZE, TILE_SIZE, Direction::Up, 3.0));
    }

    #[test]
    fn boxed_in_actor_has_no_directions() {
        let g = grid_from(&[
            "###",
            "# #",
            "###",
        ]);
        // Step of a full tile: every direction hits wall.
        let dirs = legal_directions(&g, TILE_SIZE, TILE_SIZE, TILE_SIZE);
        assert!(dirs.is_empty());
    }

    #[test]
    fn center_tile_of_aligned_actor() {
        assert_eq!(center_tile(9.0 * TILE_SIZE, 16.0 * TILE_SIZE), (9, 16));
        // Slightly off-grid positions still resolve to the nearest tile.
        assert_eq!(center_tile(9.0 * TILE_SIZE - 8.0, 16.0 * TILE_SIZE + 8.0), (9, 16));
    }

    #[test]
    fn touching_and_separated_actors() {
        assert!(touches_player(100.0, 100.0, 104.0, 100.0));
        assert!(touches_player(100.0, 100.0, 100.0, 110.0));
        // A full tile apart: nearest sampled corner is outside the box.
        assert!(!touches_player(100.0, 100.0, 100.0 + ACTOR_SIZE, 100.0));
        assert!(!touches_player(100.0, 100.0, 160.0, 160.0));
    }
}
