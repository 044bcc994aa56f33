/// Cell states and their properties.
/// Properties are queried via methods, not stored as flags,
/// so cell semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Wall,
    Empty,
    Dot,
    PowerPellet,
    Fruit,
}

impl Tile {
    /// Does this cell block actor movement?
    pub fn is_wall(self) -> bool {
        matches!(self, Tile::Wall)
    }

    /// Can an actor occupy this cell?
    pub fn is_open(self) -> bool {
        !self.is_wall()
    }

    /// Is this cell something the player consumes by standing on it?
    #[allow(dead_code)]
    pub fn is_pickup(self) -> bool {
        matches!(self, Tile::Dot | Tile::PowerPellet | Tile::Fruit)
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Wall
    }
}
