//! Game state and its transitions
//!
//! Score and lives only change through the methods here, which is what keeps
//! score monotonic, lives decreasing, and `GameOver` terminal.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball in play
    Playing,
    /// Out of lives; only a fresh session continues
    GameOver,
}

/// What a drain signal resulted in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Same drain already counted, or game already over
    Ignored,
    /// Life lost, lives remain: put the ball back
    Respawn,
    /// Last life lost
    GameOver,
}

/// Score, lives and phase for one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    score: u64,
    lives: u8,
    phase: GamePhase,
    /// Set when a drain is counted, cleared once the ball is seen above the
    /// drain line again
    drain_latched: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::with_lives(STARTING_LIVES)
    }

    /// Fresh state with a custom life count (zero starts in `GameOver`)
    pub fn with_lives(lives: u8) -> Self {
        Self {
            score: 0,
            lives,
            phase: if lives == 0 {
                GamePhase::GameOver
            } else {
                GamePhase::Playing
            },
            drain_latched: false,
        }
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[inline]
    pub fn lives(&self) -> u8 {
        self.lives
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Ball hit a bumper. Returns false once the game is over.
    pub fn award_bumper_hit(&mut self) -> bool {
        if self.is_over() {
            return false;
        }
        self.score = self.score.saturating_add(BUMPER_REWARD);
        true
    }

    /// Ball drained. Counts at most once per drain occurrence.
    pub fn register_drain(&mut self) -> DrainOutcome {
        if self.is_over() || self.drain_latched {
            return DrainOutcome::Ignored;
        }
        self.drain_latched = true;
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            log::info!("Game over with score {}", self.score);
            DrainOutcome::GameOver
        } else {
            log::info!("Ball drained, {} lives left", self.lives);
            DrainOutcome::Respawn
        }
    }

    /// Ball observed above the drain line; the next drain counts again
    pub fn rearm_drain(&mut self) {
        self.drain_latched = false;
    }
}
