/// Difficulty selection and the per-session tuning profile.
///
/// A session starts from one of three fixed profiles and ratchets after
/// every cleared level: pursuers speed up, corridors branch less. The
/// ratchet is monotonic and bounded, so late levels stay playable.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Stable key used by the high-score file.
    pub fn key(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Points awarded for eating a fruit at this difficulty.
    pub fn fruit_points(self) -> u32 {
        match self {
            Difficulty::Easy => 100,
            Difficulty::Medium => 300,
            Difficulty::Hard => 500,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Profile {
    /// Pursuer step per tick, sub-tile units.
    pub pursuer_speed: f32,
    /// Chance a maze carve extends into a new corridor.
    pub branch_probability: f64,
    /// Chance a carved cell holds a dot rather than being empty.
    pub dot_density: f64,
    /// Ratcheted alongside the rest but consulted by no policy.
    #[allow(dead_code)]
    pub chase_probability: f64,
}

impl Profile {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Profile {
                pursuer_speed: 1.0,
                branch_probability: 0.98,
                dot_density: 0.9,
                chase_probability: 0.4,
            },
            Difficulty::Medium => Profile {
                pursuer_speed: 1.8,
                branch_probability: 0.85,
                dot_density: 0.75,
                chase_probability: 0.65,
            },
            Difficulty::Hard => Profile {
                pursuer_speed: 2.3,
                branch_probability: 0.7,
                dot_density: 0.65,
                chase_probability: 0.8,
            },
        }
    }

    /// Applied once per cleared level.
    pub fn ratchet(&mut self) {
        self.pursuer_speed += 0.2;
        self.branch_probability = (self.branch_probability - 0.05).max(0.5);
        self.chase_probability = (self.chase_probability + 0.05).min(0.95);
    }
}
