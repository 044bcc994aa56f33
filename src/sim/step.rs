/// The step function: advances one session by one tick.
///
/// Processing order:
///   1. Player movement from held input
///   2. Power-mode and fruit timers
///   3. Pursuer decisions + movement
///   4. Pursuer/player contact
///   5. Pickup consumption (dot / pellet / fruit) and level advance
///
/// A fatal contact ends the tick early: the player was just moved to
/// spawn (or the session ended), so nothing later in the tick may act
/// on the pre-contact position.
///
/// Everything here is synchronous and allocation-light; the caller
/// samples input before the tick and renders after it.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::ai::{self, PursuitCtx};
use crate::domain::entity::{Direction, FrameInput};
use crate::domain::physics::{self, TILE_SIZE};
use crate::domain::tile::Tile;

use super::event::GameEvent;
use super::maze;
use super::world::{place_pursuers, scatter_tiles, Session};

/// Player step per tick, sub-tile units.
const PLAYER_SPEED: f32 = 2.0;

const DOT_POINTS: u32 = 10;
const PELLET_POINTS: u32 = 50;
const PURSUER_POINTS: u32 = 200;

pub fn step<R: Rng>(session: &mut Session, input: FrameInput, rng: &mut R) -> Vec<GameEvent> {
    let mut events: Vec<GameEvent> = Vec::new();
    session.tick += 1;

    resolve_player_movement(session, input);
    resolve_timers(session, rng, &mut events);
    resolve_pursuer_movement(session, rng);
    if resolve_contacts(session, rng, &mut events) {
        return events;
    }
    resolve_pickups(session, rng, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Player movement
// ══════════════════════════════════════════════════════════════

/// Apply the first held direction, in priority order, whose move is
/// legal. A held but blocked direction falls through to the next.
fn resolve_player_movement(session: &mut Session, input: FrameInput) {
    let mut moved = false;
    for dir in Direction::ALL {
        if !input.held(dir) {
            continue;
        }
        if physics::can_step(&session.grid, session.player.x, session.player.y, dir, PLAYER_SPEED) {
            let (nx, ny) = dir.stepped(session.player.x, session.player.y, PLAYER_SPEED);
            session.player.x = nx;
            session.player.y = ny;
            session.player.facing = dir;
            session.player.frame += 0.2;
            if session.player.frame >= 2.0 {
                session.player.frame = 0.0;
            }
            moved = true;
            break;
        }
    }

    update_debug(session, input, moved);
}

fn update_debug(session: &mut Session, input: FrameInput, moved: bool) {
    let mut keys = String::new();
    for (dir, ch) in [
        (Direction::Up, 'U'),
        (Direction::Down, 'D'),
        (Direction::Left, 'L'),
        (Direction::Right, 'R'),
    ] {
        if input.held(dir) {
            keys.push(ch);
        }
    }
    if keys.is_empty() {
        keys.push('-');
    }
    let verdict = if moved {
        "yes"
    } else if input.any() {
        "no"
    } else {
        "-"
    };
    let (tx, ty) = physics::center_tile(session.player.x, session.player.y);
    let cell = if session.grid.in_bounds(tx, ty) {
        format!("{:?}", session.grid.cell(tx as usize, ty as usize))
    } else {
        "oob".to_string()
    };
    session.debug = format!(
        "keys:{} move:{} pos:({:.0},{:.0}) tile:({},{}) {}",
        keys, verdict, session.player.x, session.player.y, tx, ty, cell
    );
}

// ══════════════════════════════════════════════════════════════
// Timers
// ══════════════════════════════════════════════════════════════

fn resolve_timers<R: Rng>(session: &mut Session, rng: &mut R, events: &mut Vec<GameEvent>) {
    if session.power_ticks > 0 {
        session.power_ticks -= 1;
        if session.power_ticks == 0 {
            events.push(GameEvent::PowerModeEnded);
        }
    }

    // Fruit is offered on a fixed cadence, one live fruit at a time.
    session.fruit_timer += 1;
    if session.fruit_timer >= session.timing.fruit_spawn_ticks && session.fruit.is_none() {
        let empties = session.grid.interior_cells_where(|t| t == Tile::Empty);
        if let Some(&(x, y)) = empties.choose(rng) {
            session.grid.set_cell(x, y, Tile::Fruit);
            session.fruit = Some((x, y));
            events.push(GameEvent::FruitSpawned { x, y });
        }
        session.fruit_timer = 0;
    }
}

// ══════════════════════════════════════════════════════════════
// Pursuer movement
// ══════════════════════════════════════════════════════════════

fn resolve_pursuer_movement<R: Rng>(session: &mut Session, rng: &mut R) {
    let step = session.pursuer_step();
    let ctx = PursuitCtx {
        player_x: session.player.x,
        player_y: session.player.y,
        player_facing: session.player.facing,
        power_mode: session.power_active(),
        step,
    };

    for i in 0..session.pursuers.len() {
        let (x, y, behavior) = {
            let p = &session.pursuers[i];
            (p.x, p.y, p.behavior)
        };
        let candidates = physics::legal_directions(&session.grid, x, y, step);
        // No legal candidate: stay put, keep facing.
        if let Some(dir) = ai::choose_direction(behavior, x, y, &candidates, &ctx, rng) {
            let (nx, ny) = dir.stepped(x, y, step);
            let p = &mut session.pursuers[i];
            p.x = nx;
            p.y = ny;
            p.facing = dir;
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Contact
// ══════════════════════════════════════════════════════════════

/// Returns true when a fatal contact consumed the rest of the tick.
fn resolve_contacts<R: Rng>(session: &mut Session, rng: &mut R, events: &mut Vec<GameEvent>) -> bool {
    let (px, py) = (session.player.x, session.player.y);

    if session.power_active() {
        // Vulnerable pursuers: every one touching the player is eaten
        // and relocated this tick.
        for i in 0..session.pursuers.len() {
            let (ex, ey) = (session.pursuers[i].x, session.pursuers[i].y);
            if !physics::touches_player(px, py, ex, ey) {
                continue;
            }
            session.score += PURSUER_POINTS;
            let (tx, ty) = scatter_tiles(&session.grid, rng, 1)[0];
            let p = &mut session.pursuers[i];
            p.x = tx as f32 * TILE_SIZE;
            p.y = ty as f32 * TILE_SIZE;
            p.facing = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
            events.push(GameEvent::PursuerEaten { id: p.id });
        }
        return false;
    }

    for i in 0..session.pursuers.len() {
        let (ex, ey) = (session.pursuers[i].x, session.pursuers[i].y);
        if physics::touches_player(px, py, ex, ey) {
            session.lives -= 1;
            events.push(GameEvent::PlayerCaught);
            if session.lives > 0 {
                session.return_player_to_spawn();
            } else {
                events.push(GameEvent::GameOver);
            }
            return true;
        }
    }
    false
}

// ══════════════════════════════════════════════════════════════
// Pickups & level advance
// ══════════════════════════════════════════════════════════════

fn resolve_pickups<R: Rng>(session: &mut Session, rng: &mut R, events: &mut Vec<GameEvent>) {
    let (tx, ty) = physics::center_tile(session.player.x, session.player.y);
    if !session.grid.in_bounds(tx, ty) {
        return;
    }
    let (tx, ty) = (tx as usize, ty as usize);

    match session.grid.cell(tx, ty) {
        Tile::Dot => {
            session.grid.set_cell(tx, ty, Tile::Empty);
            session.score += DOT_POINTS;
            session.dots_collected += 1;
            events.push(GameEvent::DotEaten { x: tx, y: ty });
            if session.dots_collected == session.total_dots {
                advance_level(session, rng, events);
            }
        }
        Tile::PowerPellet => {
            session.grid.set_cell(tx, ty, Tile::Empty);
            session.score += PELLET_POINTS;
            session.power_ticks = session.timing.power_mode_ticks;
            events.push(GameEvent::PowerPelletEaten { x: tx, y: ty });
        }
        Tile::Fruit => {
            session.grid.set_cell(tx, ty, Tile::Empty);
            session.score += session.difficulty.fruit_points();
            session.fruit = None;
            events.push(GameEvent::FruitEaten { x: tx, y: ty });
        }
        _ => {}
    }
}

/// All dots collected: ratchet the profile and rebuild the board.
/// Score and lives carry over untouched.
fn advance_level<R: Rng>(session: &mut Session, rng: &mut R, events: &mut Vec<GameEvent>) {
    session.level += 1;
    session.profile.ratchet();
    session.grid = maze::generate(&session.profile, rng);
    session.total_dots = session.grid.dot_count();
    session.dots_collected = 0;
    session.return_player_to_spawn();
    session.pursuers = place_pursuers(&session.grid, rng);
    session.power_ticks = 0;
    session.fruit = None;
    session.fruit_timer = 0;
    events.push(GameEvent::LevelCleared {
        level: session.level,
    });
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimingConfig;
    use crate::domain::grid::{Grid, GRID_WIDTH, SPAWN_TILE};
    use crate::sim::profile::{Difficulty, Profile};
    use crate::sim::world::{spawn_position, Session, STARTING_LIVES};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn timing() -> TimingConfig {
        TimingConfig {
            tick_rate_ms: 16,
            power_mode_ticks: 625,
            fruit_spawn_ticks: 1875,
        }
    }

    /// A session over a handcrafted board: the spawn row (y = 16) is
    /// open across the interior, everything else is wall. Pursuers are
    /// parked far away unless a test moves them.
    fn corridor_session(difficulty: Difficulty) -> Session {
        let mut grid = Grid::filled();
        for x in 1..GRID_WIDTH - 1 {
            grid.set_cell(x, 16, Tile::Empty);
        }
        grid.set_cell(SPAWN_TILE.0, SPAWN_TILE.1, Tile::Dot);

        let (px, py) = spawn_position();
        let pursuers = vec![crate::domain::entity::Pursuer::new(
            0,
            crate::domain::entity::Behavior::Direct,
            1.0 * TILE_SIZE,
            16.0 * TILE_SIZE,
            Direction::Right,
        )];

        Session {
            difficulty,
            profile: Profile::for_difficulty(difficulty),
            timing: timing(),
            grid,
            player: crate::domain::entity::Player::new(px, py),
            pursuers,
            score: 0,
            level: 1,
            lives: STARTING_LIVES,
            total_dots: 100, // large so tests opt in to level-up explicitly
            dots_collected: 0,
            power_ticks: 0,
            fruit_timer: 0,
            fruit: None,
            tick: 0,
            debug: String::new(),
        }
    }

    fn put_player_on_tile(session: &mut Session, tx: usize, ty: usize) {
        session.player.x = tx as f32 * TILE_SIZE;
        session.player.y = ty as f32 * TILE_SIZE;
    }

    #[test]
    fn dot_then_pellet_then_eaten_pursuer() {
        // The happy path: dot, pellet, then an eaten pursuer, with
        // lives untouched throughout.
        let mut rng = StdRng::seed_from_u64(11);
        let mut s = corridor_session(Difficulty::Easy);
        s.grid.set_cell(11, 16, Tile::PowerPellet);

        // Standing on the spawn dot.
        let events = step(&mut s, FrameInput::default(), &mut rng);
        assert_eq!(s.score, 10);
        assert_eq!(s.dots_collected, 1);
        assert!(matches!(events[0], GameEvent::DotEaten { x: 9, y: 16 }));

        // Step onto the power pellet.
        put_player_on_tile(&mut s, 11, 16);
        step(&mut s, FrameInput::default(), &mut rng);
        assert_eq!(s.score, 60);
        assert!(s.power_active());
        assert_eq!(s.power_ticks, s.timing.power_mode_ticks);

        // A pursuer runs into the player while power-mode is active.
        s.pursuers[0].x = s.player.x;
        s.pursuers[0].y = s.player.y;
        let before = (s.player.x, s.player.y);
        let events = step(&mut s, FrameInput::default(), &mut rng);
        assert_eq!(s.score, 260);
        assert_eq!(s.lives, STARTING_LIVES);
        assert_eq!((s.player.x, s.player.y), before);
        assert!(events.iter().any(|e| matches!(e, GameEvent::PursuerEaten { id: 0 })));
        // Relocated somewhere open, not the spawn tile.
        let tx = (s.pursuers[0].x / TILE_SIZE) as usize;
        let ty = (s.pursuers[0].y / TILE_SIZE) as usize;
        assert!(s.grid.cell(tx, ty).is_open());
        assert_ne!((tx, ty), SPAWN_TILE);
    }

    #[test]
    fn last_life_contact_ends_the_session() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut s = corridor_session(Difficulty::Medium);
        s.grid.set_cell(SPAWN_TILE.0, SPAWN_TILE.1, Tile::Empty);
        s.lives = 1;
        s.pursuers[0].x = s.player.x;
        s.pursuers[0].y = s.player.y;

        let events = step(&mut s, FrameInput::default(), &mut rng);
        assert_eq!(s.lives, 0);
        assert!(events.iter().any(|e| matches!(e, GameEvent::PlayerCaught)));
        assert!(events.iter().any(|e| matches!(e, GameEvent::GameOver)));
    }

    #[test]
    fn contact_with_lives_left_respawns_the_player() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut s = corridor_session(Difficulty::Medium);
        s.grid.set_cell(SPAWN_TILE.0, SPAWN_TILE.1, Tile::Empty);
        put_player_on_tile(&mut s, 3, 16);
        s.pursuers[0].x = s.player.x;
        s.pursuers[0].y = s.player.y;

        let events = step(&mut s, FrameInput::default(), &mut rng);
        assert_eq!(s.lives, STARTING_LIVES - 1);
        assert_eq!((s.player.x, s.player.y), spawn_position());
        assert_eq!(s.player.facing, Direction::Right);
        assert!(events.iter().any(|e| matches!(e, GameEvent::PlayerCaught)));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::GameOver)));
    }

    #[test]
    fn collecting_the_last_dot_advances_the_level() {
        let mut rng = StdRng::seed_from_u64(14);
        let mut s = corridor_session(Difficulty::Easy);
        s.total_dots = 2;
        s.dots_collected = 1;
        s.lives = 2;
        s.score = 370;
        // Park the pursuer where it cannot reach the player this tick.
        s.pursuers[0].x = 1.0 * TILE_SIZE;
        s.pursuers[0].y = 16.0 * TILE_SIZE;

        let events = step(&mut s, FrameInput::default(), &mut rng);

        assert_eq!(s.level, 2);
        assert_eq!(s.dots_collected, 0);
        assert_eq!(s.total_dots, s.grid.dot_count());
        assert!(s.total_dots > 0);
        // Lives and score untouched beyond the dot's own +10.
        assert_eq!(s.lives, 2);
        assert_eq!(s.score, 380);
        assert_eq!((s.player.x, s.player.y), spawn_position());
        assert_eq!(s.pursuers.len(), 4);
        assert!(!s.power_active());
        assert!(s.fruit.is_none());
        assert_eq!(s.fruit_timer, 0);
        assert!(events.iter().any(|e| matches!(e, GameEvent::LevelCleared { level: 2 })));
    }

    #[test]
    fn held_input_moves_player_by_priority() {
        let mut rng = StdRng::seed_from_u64(15);
        let mut s = corridor_session(Difficulty::Easy);
        s.grid.set_cell(SPAWN_TILE.0, SPAWN_TILE.1, Tile::Empty);
        // Already wiggled up by the full corner buffer: another step up
        // would put a corner into the wall row.
        s.player.y -= 2.0;
        let start_x = s.player.x;

        // Up is held but blocked; left is held and legal, so priority
        // falls through and the player slides left.
        let input = FrameInput {
            up: true,
            down: false,
            left: true,
            right: false,
        };
        step(&mut s, input, &mut rng);
        assert_eq!(s.player.x, start_x - PLAYER_SPEED);
        assert_eq!(s.player.facing, Direction::Left);
        assert!(s.player.frame > 0.0);
    }

    #[test]
    fn blocked_input_leaves_player_in_place() {
        let mut rng = StdRng::seed_from_u64(16);
        let mut s = corridor_session(Difficulty::Easy);
        s.grid.set_cell(SPAWN_TILE.0, SPAWN_TILE.1, Tile::Empty);
        s.player.y -= 2.0; // at the top of the buffer slack
        let before = (s.player.x, s.player.y);

        let input = FrameInput {
            up: true,
            down: false,
            left: false,
            right: false,
        };
        step(&mut s, input, &mut rng);
        assert_eq!((s.player.x, s.player.y), before);
        assert!(s.debug.contains("move:no"));
    }

    #[test]
    fn boxed_pursuer_stays_and_keeps_facing() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut s = corridor_session(Difficulty::Hard);
        // A late-level speed: big enough that no direction fits inside
        // an isolated cell's buffer slack.
        s.profile.pursuer_speed = 3.0;
        s.grid.set_cell(5, 5, Tile::Empty); // isolated cell in solid wall
        s.pursuers[0].x = 5.0 * TILE_SIZE;
        s.pursuers[0].y = 5.0 * TILE_SIZE;
        s.pursuers[0].facing = Direction::Down;

        step(&mut s, FrameInput::default(), &mut rng);
        assert_eq!(s.pursuers[0].x, 5.0 * TILE_SIZE);
        assert_eq!(s.pursuers[0].y, 5.0 * TILE_SIZE);
        assert_eq!(s.pursuers[0].facing, Direction::Down);
    }

    #[test]
    fn fruit_spawns_on_schedule_and_scores_by_difficulty() {
        let mut rng = StdRng::seed_from_u64(18);
        let mut s = corridor_session(Difficulty::Easy);
        s.grid.set_cell(SPAWN_TILE.0, SPAWN_TILE.1, Tile::Dot);
        // Exactly one Empty cell so the spawn tile is forced.
        for x in 1..GRID_WIDTH - 1 {
            s.grid.set_cell(x, 16, Tile::Dot);
        }
        s.grid.set_cell(3, 16, Tile::Empty);
        s.fruit_timer = s.timing.fruit_spawn_ticks - 1;

        let events = step(&mut s, FrameInput::default(), &mut rng);
        assert_eq!(s.fruit, Some((3, 16)));
        assert_eq!(s.grid.cell(3, 16), Tile::Fruit);
        assert_eq!(s.fruit_timer, 0);
        assert!(events.iter().any(|e| matches!(e, GameEvent::FruitSpawned { x: 3, y: 16 })));

        let score_before = s.score;
        put_player_on_tile(&mut s, 3, 16);
        let events = step(&mut s, FrameInput::default(), &mut rng);
        assert_eq!(s.score, score_before + 100);
        assert_eq!(s.fruit, None);
        assert_eq!(s.grid.cell(3, 16), Tile::Empty);
        assert!(events.iter().any(|e| matches!(e, GameEvent::FruitEaten { x: 3, y: 16 })));
    }

    #[test]
    fn power_mode_expires_after_its_duration() {
        let mut rng = StdRng::seed_from_u64(19);
        let mut s = corridor_session(Difficulty::Easy);
        s.grid.set_cell(SPAWN_TILE.0, SPAWN_TILE.1, Tile::Empty);
        s.power_ticks = 2;

        let events = step(&mut s, FrameInput::default(), &mut rng);
        assert!(s.power_active());
        assert!(!events.iter().any(|e| matches!(e, GameEvent::PowerModeEnded)));

        let events = step(&mut s, FrameInput::default(), &mut rng);
        assert!(!s.power_active());
        assert!(events.iter().any(|e| matches!(e, GameEvent::PowerModeEnded)));
    }
}
