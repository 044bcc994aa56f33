/// Actors: the player and the four pursuers, plus per-tick input.

/// Travel direction on the grid. `ALL` doubles as the canonical
/// iteration order: candidate directions are evaluated in this order
/// (ties broken by first match) and held input is applied by the same
/// priority.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit delta in sub-tile space.
    #[inline]
    pub fn delta(self) -> (f32, f32) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }

    /// Position after stepping `step` units from (x, y).
    #[inline]
    pub fn stepped(self, x: f32, y: f32, step: f32) -> (f32, f32) {
        let (dx, dy) = self.delta();
        (x + dx * step, y + dy * step)
    }
}

/// Pursuit heuristic tag. Each pursuer carries exactly one, fixed for
/// the whole session; dispatch happens in the ai module.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Behavior {
    /// Heads straight for the player.
    Direct,
    /// Aims 4 tiles ahead of the player's facing.
    Ambush,
    /// Coin-flips between chasing and wandering each tick.
    Mixed,
    /// Chases when far, drifts to a random corner when close.
    Adaptive,
}

impl Behavior {
    pub const ROSTER: [Behavior; 4] = [
        Behavior::Direct,
        Behavior::Ambush,
        Behavior::Mixed,
        Behavior::Adaptive,
    ];

    /// Display name for the HUD.
    pub fn label(self) -> &'static str {
        match self {
            Behavior::Direct => "rusher",
            Behavior::Ambush => "lurker",
            Behavior::Mixed => "wobbler",
            Behavior::Adaptive => "drifter",
        }
    }
}

/// Frame input: the four direction-held signals, sampled once per tick.
/// No buffering — last sampled state wins.
#[derive(Clone, Copy, Default, Debug)]
pub struct FrameInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl FrameInput {
    #[inline]
    pub fn held(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    /// Top-left corner of the hit box, sub-tile units.
    pub x: f32,
    pub y: f32,
    pub facing: Direction,
    /// Mouth animation phase, advances while moving, wraps at 2.
    pub frame: f32,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Player {
            x,
            y,
            facing: Direction::Right,
            frame: 0.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Pursuer {
    pub id: usize,
    pub behavior: Behavior,
    pub x: f32,
    pub y: f32,
    pub facing: Direction,
}

impl Pursuer {
    pub fn new(id: usize, behavior: Behavior, x: f32, y: f32, facing: Direction) -> Self {
        Pursuer {
            id,
            behavior,
            x,
            y,
            facing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stepped_moves_along_axis() {
        let (x, y) = Direction::Up.stepped(40.0, 40.0, 2.0);
        assert_eq!((x, y), (40.0, 38.0));
        let (x, y) = Direction::Right.stepped(40.0, 40.0, 1.5);
        assert_eq!((x, y), (41.5, 40.0));
    }

    #[test]
    fn input_priority_matches_all_order() {
        let input = FrameInput {
            up: false,
            down: true,
            left: true,
            right: false,
        };
        let first = Direction::ALL.iter().copied().find(|&d| input.held(d));
        assert_eq!(first, Some(Direction::Down));
    }
}
