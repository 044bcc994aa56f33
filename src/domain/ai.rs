/// Pursuer decision making.
///
/// Every policy shares one per-tick contract: given the pursuer's
/// position and the set of currently-legal candidate directions, pick
/// one candidate, or none when the set is empty (the pursuer stays put
/// that tick). Distances are Manhattan in sub-tile space, and each
/// candidate is scored at the position it would reach with the
/// effective step.
///
/// Power-mode overrides every tag: all pursuers flee, maximizing
/// distance to the player at half speed.
///
/// Tags:
///   Direct   — minimize distance to the player.
///   Ambush   — minimize distance to a point 4 tiles ahead of the
///              player's facing.
///   Mixed    — 50/50 per tick between Direct and a random candidate.
///   Adaptive — Direct beyond 8 tiles, otherwise head for a corner
///              re-rolled every tick.

use rand::seq::SliceRandom;
use rand::Rng;

use super::entity::{Behavior, Direction};
use super::grid::Grid;
use super::physics::TILE_SIZE;

/// How far ahead of the player's facing Ambush aims, in tiles.
const AMBUSH_LEAD_TILES: f32 = 4.0;
/// Adaptive chases directly beyond this distance, in tiles.
const ADAPTIVE_CHASE_RANGE_TILES: f32 = 8.0;

/// Per-tick context shared by all policies.
pub struct PursuitCtx {
    pub player_x: f32,
    pub player_y: f32,
    pub player_facing: Direction,
    pub power_mode: bool,
    /// Effective step for this pursuer this tick (already halved while
    /// power-mode is active).
    pub step: f32,
}

pub fn choose_direction<R: Rng>(
    behavior: Behavior,
    x: f32,
    y: f32,
    candidates: &[Direction],
    ctx: &PursuitCtx,
    rng: &mut R,
) -> Option<Direction> {
    if candidates.is_empty() {
        return None;
    }

    let picked = if ctx.power_mode {
        away_from(candidates, x, y, ctx.step, ctx.player_x, ctx.player_y)
    } else {
        match behavior {
            Behavior::Direct => toward(candidates, x, y, ctx.step, ctx.player_x, ctx.player_y),
            Behavior::Ambush => {
                let lead = AMBUSH_LEAD_TILES * TILE_SIZE;
                let (tx, ty) = ctx.player_facing.stepped(ctx.player_x, ctx.player_y, lead);
                toward(candidates, x, y, ctx.step, tx, ty)
            }
            Behavior::Mixed => {
                if rng.gen_bool(0.5) {
                    toward(candidates, x, y, ctx.step, ctx.player_x, ctx.player_y)
                } else {
                    candidates.choose(rng).copied()
                }
            }
            Behavior::Adaptive => {
                let dist = manhattan(x, y, ctx.player_x, ctx.player_y);
                if dist > ADAPTIVE_CHASE_RANGE_TILES * TILE_SIZE {
                    toward(candidates, x, y, ctx.step, ctx.player_x, ctx.player_y)
                } else {
                    let corners = corner_points();
                    let (tx, ty) = corners[rng.gen_range(0..corners.len())];
                    toward(candidates, x, y, ctx.step, tx, ty)
                }
            }
        }
    };

    // Degenerate scoring (no candidate beat the initial bound) falls
    // back to a random legal candidate rather than freezing in place.
    picked.or_else(|| candidates.choose(rng).copied())
}

fn manhattan(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    (x1 - x2).abs() + (y1 - y2).abs()
}

/// Candidate minimizing distance to (tx, ty) after one step.
/// Strict comparison: ties keep the earliest candidate.
fn toward(candidates: &[Direction], x: f32, y: f32, step: f32, tx: f32, ty: f32) -> Option<Direction> {
    let mut best: Option<Direction> = None;
    let mut best_dist = f32::INFINITY;
    for &dir in candidates {
        let (nx, ny) = dir.stepped(x, y, step);
        let dist = manhattan(nx, ny, tx, ty);
        if dist < best_dist {
            best_dist = dist;
            best = Some(dir);
        }
    }
    best
}

/// Candidate maximizing distance to (tx, ty) after one step.
fn away_from(candidates: &[Direction], x: f32, y: f32, step: f32, tx: f32, ty: f32) -> Option<Direction> {
    let mut best: Option<Direction> = None;
    let mut best_dist = f32::NEG_INFINITY;
    for &dir in candidates {
        let (nx, ny) = dir.stepped(x, y, step);
        let dist = manhattan(nx, ny, tx, ty);
        if dist > best_dist {
            best_dist = dist;
            best = Some(dir);
        }
    }
    best
}

/// The four maze corners in sub-tile coordinates.
fn corner_points() -> [(f32, f32); 4] {
    Grid::corner_tiles().map(|(tx, ty)| (tx as f32 * TILE_SIZE, ty as f32 * TILE_SIZE))
}
