//! Commands coming in from the presentation layer and point events going out to it.

use crate::entity::ghost::GhostPersonality;
use crate::entity::mode::Mode;
use crate::map::direction::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameCommand {
    MovePlayer(Direction),
    Restart,
    TogglePause,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// A power pill was eaten and every ghost turned vulnerable.
    ScaredActivated,
    /// The global mode changed.
    ModeChanged { from: Mode, to: Mode },
    GhostEaten { ghost: GhostPersonality, points: u32 },
    GhostReleased { ghost: GhostPersonality },
    PacmanDied { lives_remaining: u8 },
    PacmanRespawned,
    /// Every dot and power pill of `level` is gone.
    LevelComplete { level: u8 },
    /// No further ticks will change the game. `victory` is set when the last level was cleared.
    GameOver { score: u32, victory: bool },
    ScoreSubmitted { score: u32 },
    ScoreSubmissionFailed { score: u32, reason: String },
}

