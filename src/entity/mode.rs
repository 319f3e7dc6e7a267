//! Global ghost behavior modes and per-ghost vulnerability.

use strum_macros::AsRefStr;

use crate::constants::modes;

/// The global behavior phase applied to every ghost at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Ghosts head for their home corners.
    Scatter,
    /// Ghosts pursue Pac-Man, each by its own rule.
    Chase,
    /// Ghosts wander randomly and can be eaten.
    Scared,
}

impl Mode {
    /// How long one phase of this mode lasts, in milliseconds.
    pub const fn duration_ms(self) -> u64 {
        match self {
            Mode::Scatter => modes::SCATTER_MS,
            Mode::Chase => modes::CHASE_MS,
            Mode::Scared => modes::SCARED_MS,
        }
    }

    /// Ghost speed relative to Pac-Man's speed.
    pub const fn speed_multiplier(self) -> f32 {
        match self {
            Mode::Scatter | Mode::Chase => modes::NORMAL_SPEED_MULTIPLIER,
            Mode::Scared => modes::SCARED_SPEED_MULTIPLIER,
        }
    }

    /// The mode that follows this one in the scatter/chase alternation.
    ///
    /// Scared is never part of the cycle; leaving it resumes whatever it interrupted.
    pub const fn next_in_cycle(self) -> Mode {
        match self {
            Mode::Scatter => Mode::Chase,
            Mode::Chase | Mode::Scared => Mode::Scatter,
        }
    }
}

/// Whether a ghost can currently be eaten, kills on contact, or is already eaten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Vulnerability {
    /// Lethal on contact.
    #[default]
    Normal,
    /// Edible; only meaningful while the mode is scared.
    Vulnerable,
    /// Already eaten this scared phase; harmless and heading home.
    Consumed,
}

impl Vulnerability {
    pub const fn is_consumed(self) -> bool {
        matches!(self, Vulnerability::Consumed)
    }
}
