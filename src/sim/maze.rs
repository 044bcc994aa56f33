/// Procedural maze carver.
///
/// Randomized depth-first carving on a half-resolution lattice (steps
/// of two tiles) starting from the spawn cell. At each visited cell the
/// four lattice steps are shuffled; a step is taken only when the
/// target is still solid and a branch-probability coin flip succeeds,
/// in which case the intervening cell and the target are carved and
/// the walk descends into the target. Carving runs on an explicit
/// stack, so grid size never threatens the call stack; the visit order
/// is the same depth-first order recursion would produce.
///
/// Every carved cell becomes a Dot with the profile's dot density,
/// otherwise Empty. Carving stays strictly inside the border. After
/// the walk, the four corner cells are re-stamped as power pellets and
/// the spawn cell as a Dot; the carved network is connected by
/// construction, and those five stamps are the only cells placed
/// outside it.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::grid::{Grid, GRID_HEIGHT, GRID_WIDTH, SPAWN_TILE};
use crate::domain::tile::Tile;

use super::profile::Profile;

const LATTICE_STEPS: [(i32, i32); 4] = [(0, -2), (0, 2), (-2, 0), (2, 0)];

struct CarveFrame {
    x: usize,
    y: usize,
    dirs: [(i32, i32); 4],
    next: usize,
}

impl CarveFrame {
    fn new<R: Rng>(x: usize, y: usize, rng: &mut R) -> Self {
        let mut dirs = LATTICE_STEPS;
        dirs.shuffle(rng);
        CarveFrame { x, y, dirs, next: 0 }
    }
}

/// Carve a fresh maze for the given profile.
pub fn generate<R: Rng>(profile: &Profile, rng: &mut R) -> Grid {
    let mut grid = Grid::filled();
    let (sx, sy) = SPAWN_TILE;

    carve_cell(&mut grid, sx, sy, profile, rng);
    let mut stack = vec![CarveFrame::new(sx, sy, rng)];

    loop {
        let (cx, cy, dx, dy, exhausted) = {
            let top = match stack.last_mut() {
                Some(t) => t,
                None => break,
            };
            if top.next >= top.dirs.len() {
                (0, 0, 0, 0, true)
            } else {
                let (dx, dy) = top.dirs[top.next];
                top.next += 1;
                (top.x, top.y, dx, dy, false)
            }
        };
        if exhausted {
            stack.pop();
            continue;
        }

        let nx = cx as i32 + dx;
        let ny = cy as i32 + dy;
        if !is_interior(nx, ny) {
            continue;
        }
        if grid.cell(nx as usize, ny as usize) != Tile::Wall {
            continue; // already part of the network
        }
        if !rng.gen_bool(profile.branch_probability) {
            continue;
        }

        let mx = (cx as i32 + dx / 2) as usize;
        let my = (cy as i32 + dy / 2) as usize;
        carve_cell(&mut grid, mx, my, profile, rng);
        carve_cell(&mut grid, nx as usize, ny as usize, profile, rng);
        stack.push(CarveFrame::new(nx as usize, ny as usize, rng));
    }

    for (px, py) in Grid::corner_tiles() {
        grid.set_cell(px, py, Tile::PowerPellet);
    }
    grid.set_cell(sx, sy, Tile::Dot);

    grid
}

#[inline]
fn is_interior(x: i32, y: i32) -> bool {
    x > 0 && x < GRID_WIDTH as i32 - 1 && y > 0 && y < GRID_HEIGHT as i32 - 1
}

fn carve_cell<R: Rng>(grid: &mut Grid, x: usize, y: usize, profile: &Profile, rng: &mut R) {
    let tile = if rng.gen_bool(profile.dot_density) {
        Tile::Dot
    } else {
        Tile::Empty
    };
    grid.set_cell(x, y, tile);
}
