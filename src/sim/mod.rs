//! Engine-agnostic game rules
//!
//! Nothing here touches the physics engine, rendering or platform APIs:
//! - `category`: collision category flag set and pairwise tables
//! - `layout`: body descriptions for one session
//! - `state`: score, lives and phase
//! - `rules`: contact classification, speed clamp, drain test
//! - `animation`: scripted flipper swing and bumper pulse

pub mod animation;
pub mod category;
pub mod layout;
pub mod rules;
pub mod state;

pub use animation::{BumperPulse, FlipperMotion};
pub use category::{BodyFilter, Category, CategoryMask};
pub use layout::FlipperSide;
pub use rules::{ContactKind, clamp_speed, classify};
pub use state::{DrainOutcome, GamePhase, GameState};
