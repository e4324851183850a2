//! Heads-up display text
//!
//! The HUD is a pure function of the latest `GameState`; callers rebuild it
//! after every mutation rather than observing fields.

use crate::sim::GameState;

pub const GAME_OVER_BANNER: &str = "GAME OVER";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudView {
    pub score: String,
    pub lives: String,
    /// Centered message, shown once the game is over
    pub banner: Option<&'static str>,
}

impl HudView {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: format!("Score: {}", state.score()),
            lives: format!("Lives: {}", state.lives()),
            banner: state.is_over().then_some(GAME_OVER_BANNER),
        }
    }
}

/// Optional debug overlay line
pub fn debug_line(fps: Option<u32>, node_count: Option<usize>) -> Option<String> {
    match (fps, node_count) {
        (Some(fps), Some(nodes)) => Some(format!("{} fps · {} nodes", fps, nodes)),
        (Some(fps), None) => Some(format!("{} fps", fps)),
        (None, Some(nodes)) => Some(format!("{} nodes", nodes)),
        (None, None) => None,
    }
}
