/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The board is fixed-size (19 x 22 tiles, two terminal columns per
/// tile), so the whole game fits a standard 80x24 terminal with room
/// for the HUD and the debug line. Reads world state only; never
/// blocks the simulation.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{Behavior, Direction};
use crate::domain::grid::{GRID_HEIGHT, GRID_WIDTH};
use crate::domain::physics;
use crate::domain::tile::Tile;
use crate::sim::profile::Difficulty;
use crate::sim::world::{Phase, Session, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells, shared
    /// with Clear so inter-row gap pixels match on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 12, g: 12, b: 24 };

    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: Cell::BASE_BG,
    };

    /// Sentinel cell used to invalidate the back buffer.
    const INVALID: Cell = Cell {
        ch: '?',
        fg: Color::Magenta,
        bg: Color::Magenta,
    };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Cell::new(ch, fg, bg));
            cx += 1;
        }
    }
}

// ── Renderer ──

/// Each game tile spans 2 terminal columns.
const CELL_W: usize = 2;

// Row layout: HUD, then the 22 board rows, then the debug line.
// Exactly 24 rows, so a default terminal fits the whole game.
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 1;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const FRIGHTENED: Color = Color::Rgb { r: 0, g: 0, b: 255 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Phase change → clear for a clean transition
        if self.last_phase != Some(world.phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(world.phase);
        }

        self.front.clear();

        match world.phase {
            Phase::ModeSelect => self.compose_mode_select(world),
            Phase::Playing => self.compose_game(world),
            Phase::GameOver => self.compose_game_over(world),
        }

        if world.paused {
            self.compose_pause_overlay();
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(
            self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: Playing ──

    fn compose_game(&mut self, world: &WorldState) {
        let Some(session) = world.session.as_ref() else {
            return;
        };
        let buf_w = self.front.width;

        // ── HUD row ──
        let power = if session.power_active() {
            let ms = session.power_ticks as u64 * session.timing.tick_rate_ms;
            format!("POWER {}s", (ms + 999) / 1000)
        } else {
            String::new()
        };
        let muted = if world.muted { "[muted]" } else { "" };
        let hud = format!(
            " Lv.{:<2}  Score:{:<7}  ♥x{}  ·{}/{}  {}  {}",
            session.level,
            session.score,
            session.lives,
            session.dots_collected,
            session.total_dots,
            power,
            muted,
        );
        for x in 0..buf_w {
            self.front.set(x, HUD_ROW, Cell::new(' ', Color::White, HUD_BG));
        }
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);

        // ── Board ──
        let blink = (world.anim_tick / 16) % 2 == 0;
        for ty in 0..GRID_HEIGHT {
            let row = MAP_ROW + ty;
            for tx in 0..GRID_WIDTH {
                let col = tx * CELL_W;
                self.compose_tile(session, tx, ty, col, row, blink);
            }
        }

        self.compose_actors(session);

        // ── Debug line ──
        let debug_row = MAP_ROW + GRID_HEIGHT;
        self.front.put_str(0, debug_row, &session.debug, Color::DarkGrey, Cell::BASE_BG);
    }

    fn compose_tile(
        &mut self,
        session: &Session,
        tx: usize,
        ty: usize,
        col: usize,
        row: usize,
        blink: bool,
    ) {
        match session.grid.cell(tx, ty) {
            Tile::Wall => {
                let fg = wall_color(session.difficulty);
                self.front.set(col, row, Cell::new('█', fg, Cell::BASE_BG));
                self.front.set(col + 1, row, Cell::new('█', fg, Cell::BASE_BG));
            }
            Tile::Empty => {
                self.front.set(col, row, Cell::BLANK);
                self.front.set(col + 1, row, Cell::BLANK);
            }
            Tile::Dot => {
                let fg = dot_color(session.difficulty);
                self.front.set(col, row, Cell::new('·', fg, Cell::BASE_BG));
                self.front.set(col + 1, row, Cell::BLANK);
            }
            Tile::PowerPellet => {
                let ch = if blink { '●' } else { '○' };
                self.front.set(col, row, Cell::new(ch, Color::White, Cell::BASE_BG));
                self.front.set(col + 1, row, Cell::BLANK);
            }
            Tile::Fruit => {
                self.front
                    .set(col, row, Cell::new('%', Color::Red, Cell::BASE_BG));
                self.front.set(col + 1, row, Cell::BLANK);
            }
        }
    }

    fn compose_actors(&mut self, session: &Session) {
        // Pursuers first so the player draws on top of an overlap.
        for p in &session.pursuers {
            let (tx, ty) = physics::center_tile(p.x, p.y);
            if !session.grid.in_bounds(tx, ty) {
                continue;
            }
            let fg = if session.power_active() {
                FRIGHTENED
            } else {
                pursuer_color(p.behavior)
            };
            let col = tx as usize * CELL_W;
            let row = MAP_ROW + ty as usize;
            self.front.set(col, row, Cell::new('M', fg, Cell::BASE_BG));
        }

        let (tx, ty) = physics::center_tile(session.player.x, session.player.y);
        if session.grid.in_bounds(tx, ty) {
            // Mouth chomps with the animation phase; closed mouth is a
            // plain circle whatever the facing.
            let ch = if session.player.frame < 1.0 {
                match session.player.facing {
                    Direction::Up => 'v',
                    Direction::Down => '^',
                    Direction::Left => '>',
                    Direction::Right => '<',
                }
            } else {
                'O'
            };
            let col = tx as usize * CELL_W;
            let row = MAP_ROW + ty as usize;
            self.front.set(col, row, Cell::new(ch, Color::Yellow, Cell::BASE_BG));
        }
    }

    // ── Compose: menus ──

    fn compose_mode_select(&mut self, world: &WorldState) {
        let mid = self.term_w / 2;
        let top = 4;

        self.put_centered(mid, top, "M A Z E   C H A S E", Color::Yellow);
        self.put_centered(mid, top + 2, "collect every dot, dodge the pack", Color::DarkGrey);

        for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
            let row = top + 5 + i * 2;
            let selected = world.menu_cursor == i;
            let marker = if selected { '▶' } else { ' ' };
            let line = format!(
                "{} {}  (best: {})",
                marker,
                difficulty.label(),
                world.high_scores.get(*difficulty)
            );
            let fg = if selected { Color::White } else { Color::DarkGrey };
            self.put_centered(mid, row, &line, fg);
        }

        // The pack, introduced by name.
        let legend_row = top + 12;
        let total: usize = Behavior::ROSTER
            .iter()
            .map(|b| b.label().chars().count() + 4)
            .sum();
        let mut col = mid.saturating_sub(total / 2);
        for behavior in Behavior::ROSTER {
            self.front
                .set(col, legend_row, Cell::new('M', pursuer_color(behavior), Cell::BASE_BG));
            self.front
                .put_str(col + 2, legend_row, behavior.label(), Color::DarkGrey, Cell::BASE_BG);
            col += behavior.label().chars().count() + 4;
        }

        self.put_centered(
            mid,
            top + 14,
            "up/down + enter, or 1/2/3  ·  in game: P pause, M mute  ·  Q quits",
            Color::DarkGrey,
        );
    }

    fn compose_game_over(&mut self, world: &WorldState) {
        let mid = self.term_w / 2;
        let top = 6;

        self.put_centered(mid, top, "G A M E   O V E R", Color::Red);

        if let Some(session) = world.session.as_ref() {
            let line = format!("Final score: {}   (level {})", session.score, session.level);
            self.put_centered(mid, top + 3, &line, Color::White);
            let best = world.high_scores.get(session.difficulty);
            let best_line = if session.score >= best && session.score > 0 {
                format!("New {} record: {}", session.difficulty.label(), best)
            } else {
                format!("{} record: {}", session.difficulty.label(), best)
            };
            self.put_centered(mid, top + 5, &best_line, Color::Yellow);
        }

        self.put_centered(mid, top + 8, "Enter: play again   Q: quit", Color::DarkGrey);
    }

    fn compose_pause_overlay(&mut self) {
        let s = "  P A U S E D  ";
        let row = MAP_ROW + GRID_HEIGHT / 2;
        let start = (self.term_w / 2).saturating_sub(s.chars().count() / 2);
        for (i, ch) in s.chars().enumerate() {
            self.front.set(start + i, row, Cell::new(ch, Color::Black, Color::Yellow));
        }
    }

    fn put_centered(&mut self, mid: usize, row: usize, s: &str, fg: Color) {
        let start = mid.saturating_sub(s.chars().count() / 2);
        self.front.put_str(start, row, s, fg, Cell::BASE_BG);
    }
}

// ── Palette ──

fn wall_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Easy => Color::Rgb { r: 0, g: 128, b: 0 },
        Difficulty::Medium => Color::Rgb { r: 128, g: 128, b: 128 },
        Difficulty::Hard => Color::Rgb { r: 128, g: 0, b: 128 },
    }
}

fn dot_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Easy => Color::Rgb { r: 255, g: 255, b: 0 },
        Difficulty::Medium => Color::Rgb { r: 0, g: 255, b: 255 },
        Difficulty::Hard => Color::Rgb { r: 255, g: 192, b: 203 },
    }
}

fn pursuer_color(behavior: Behavior) -> Color {
    match behavior {
        Behavior::Direct => Color::Rgb { r: 255, g: 0, b: 0 },
        Behavior::Ambush => Color::Rgb { r: 255, g: 105, b: 180 },
        Behavior::Mixed => Color::Rgb { r: 0, g: 183, b: 235 },
        Behavior::Adaptive => Color::Rgb { r: 255, g: 165, b: 0 },
    }
}
