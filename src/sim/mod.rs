//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, one stream per run
//! - Stable iteration order (anchors in spawn order)
//! - No rendering, audio or platform dependencies

pub mod anchor;
pub mod crash;
pub mod onboarding;
pub mod orbit;
pub mod rng;
pub mod scoring;
pub mod spawner;
pub mod state;
pub mod tick;

pub use anchor::{Anchor, AnchorId, AnchorTier, TierDef, TierStyle};
pub use crash::{CrashState, Particle, ShardKind};
pub use onboarding::Onboarding;
pub use rng::RunRng;
pub use scoring::ComboState;
pub use spawner::Lane;
pub use state::{
    FeedbackTimers, FloatLabel, FloatingText, GameEvent, GamePhase, GameState, Player, RunSummary,
    Viewport,
};
pub use tick::{TickInput, die, tick};
