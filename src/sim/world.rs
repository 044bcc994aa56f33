/// WorldState: everything the game loop owns.
///
/// Two layers:
///   - `WorldState` — always present: phase, menu state, high scores.
///   - `Session`    — one play-through: grid, actors, counters, timers.
///     Created on mode selection, replaced wholesale on restart.
///
/// The session is the single owner of all mutable game state; policies
/// and the collision resolver are pure functions over what they are
/// passed. All mutation happens inside the step function, one tick at
/// a time.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::TimingConfig;
use crate::domain::entity::{Behavior, Direction, Player, Pursuer};
use crate::domain::grid::{Grid, SPAWN_TILE};
use crate::domain::physics::TILE_SIZE;

use super::maze;
use super::profile::{Difficulty, Profile};
use super::save::HighScores;

pub const STARTING_LIVES: u32 = 3;

/// Initial pursuer facings, by roster index.
const INITIAL_FACINGS: [Direction; 4] = [
    Direction::Right,
    Direction::Left,
    Direction::Up,
    Direction::Down,
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    ModeSelect,
    Playing,
    GameOver,
}

pub struct WorldState {
    pub phase: Phase,
    pub session: Option<Session>,
    pub high_scores: HighScores,
    pub timing: TimingConfig,

    // ── UI state ──
    pub menu_cursor: usize,
    pub muted: bool,
    pub paused: bool,
    pub anim_tick: u32,
}

impl WorldState {
    pub fn new(timing: TimingConfig, high_scores: HighScores) -> Self {
        WorldState {
            phase: Phase::ModeSelect,
            session: None,
            high_scores,
            timing,
            menu_cursor: 0,
            muted: false,
            paused: false,
            anim_tick: 0,
        }
    }

    /// Mode selected: create a fresh session and enter play.
    pub fn start_session<R: Rng>(&mut self, difficulty: Difficulty, rng: &mut R) {
        self.session = Some(Session::new(difficulty, self.timing.clone(), rng));
        self.phase = Phase::Playing;
        self.paused = false;
    }

    /// Full reset back to the mode chooser.
    pub fn restart(&mut self) {
        self.session = None;
        self.phase = Phase::ModeSelect;
        self.paused = false;
    }
}

/// One play-through: grid, actors, and session counters.
pub struct Session {
    pub difficulty: Difficulty,
    pub profile: Profile,
    pub timing: TimingConfig,

    pub grid: Grid,
    pub player: Player,
    pub pursuers: Vec<Pursuer>,

    pub score: u32,
    pub level: u32,
    pub lives: u32,
    pub total_dots: usize,
    pub dots_collected: usize,

    /// Remaining power-mode ticks; 0 = inactive.
    pub power_ticks: u32,
    /// Ticks since the last fruit spawn opportunity.
    pub fruit_timer: u32,
    /// The at-most-one live fruit, by tile.
    pub fruit: Option<(usize, usize)>,

    pub tick: u64,
    /// Diagnostic line for the HUD.
    pub debug: String,
}

impl Session {
    pub fn new<R: Rng>(difficulty: Difficulty, timing: TimingConfig, rng: &mut R) -> Self {
        let profile = Profile::for_difficulty(difficulty);
        let grid = maze::generate(&profile, rng);
        let total_dots = grid.dot_count();
        let pursuers = place_pursuers(&grid, rng);
        let (px, py) = spawn_position();

        Session {
            difficulty,
            profile,
            timing,
            grid,
            player: Player::new(px, py),
            pursuers,
            score: 0,
            level: 1,
            lives: STARTING_LIVES,
            total_dots,
            dots_collected: 0,
            power_ticks: 0,
            fruit_timer: 0,
            fruit: None,
            tick: 0,
            debug: String::new(),
        }
    }

    #[inline]
    pub fn power_active(&self) -> bool {
        self.power_ticks > 0
    }

    /// Effective pursuer step this tick: profile speed, halved while
    /// power-mode is active.
    #[inline]
    pub fn pursuer_step(&self) -> f32 {
        if self.power_active() {
            self.profile.pursuer_speed * 0.5
        } else {
            self.profile.pursuer_speed
        }
    }

    pub fn return_player_to_spawn(&mut self) {
        let (px, py) = spawn_position();
        self.player = Player::new(px, py);
    }
}

/// The spawn tile in sub-tile coordinates.
pub fn spawn_position() -> (f32, f32) {
    (
        SPAWN_TILE.0 as f32 * TILE_SIZE,
        SPAWN_TILE.1 as f32 * TILE_SIZE,
    )
}

/// The full pursuer roster on fresh random tiles.
pub fn place_pursuers<R: Rng>(grid: &Grid, rng: &mut R) -> Vec<Pursuer> {
    let tiles = scatter_tiles(grid, rng, Behavior::ROSTER.len());
    Behavior::ROSTER
        .iter()
        .zip(tiles)
        .enumerate()
        .map(|(i, (&behavior, (tx, ty)))| {
            Pursuer::new(
                i,
                behavior,
                tx as f32 * TILE_SIZE,
                ty as f32 * TILE_SIZE,
                INITIAL_FACINGS[i],
            )
        })
        .collect()
}

/// `n` random open interior tiles, spawn excluded. Tiles repeat only
/// when the maze has fewer open cells than requested.
pub fn scatter_tiles<R: Rng>(grid: &Grid, rng: &mut R, n: usize) -> Vec<(usize, usize)> {
    let mut open: Vec<(usize, usize)> = grid
        .interior_cells_where(|t| t.is_open())
        .into_iter()
        .filter(|&pos| pos != SPAWN_TILE)
        .collect();
    if open.is_empty() {
        return vec![SPAWN_TILE; n];
    }
    open.shuffle(rng);
    (0..n).map(|i| open[i % open.len()]).collect()
}
