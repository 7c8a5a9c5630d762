//! Simulation controller
//!
//! Owns one `GameState`, the held-input flag and the leaderboard. This is
//! the surface renderers, audio and input wiring talk to: they push input,
//! call `tick` once per frame, read the state and drain events.

use serde::Serialize;

use crate::consts::{
    DANGER_ZONE_WIDTH, MAX_FRAME_DT, MAX_VIEWPORT_SIDE, PLAYER_RADIUS, TRAIL_LENGTH,
};
use crate::highscores::{self, HighScores};
use crate::sim::{
    AnchorTier, GameEvent, GamePhase, GameState, TickInput, TierStyle, Viewport, tick,
};
use crate::tuning::Tuning;

/// Fixed presentation data a renderer reads once at startup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderHints {
    pub player_radius: f32,
    pub trail_length: usize,
    pub danger_zone_width: f32,
    pub tiers: Vec<TierStyle>,
}

impl RenderHints {
    pub fn new() -> Self {
        Self {
            player_radius: PLAYER_RADIUS,
            trail_length: TRAIL_LENGTH,
            danger_zone_width: DANGER_ZONE_WIDTH,
            tiers: AnchorTier::ALL.iter().map(|t| t.style()).collect(),
        }
    }
}

impl Default for RenderHints {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Simulation {
    state: GameState,
    input: TickInput,
    high_scores: HighScores,
    events: Vec<GameEvent>,
}

impl Simulation {
    /// Simulation with the stored leaderboard and default viewport
    pub fn new(tuning: Tuning) -> Self {
        Self::with_high_scores(tuning, Viewport::default(), HighScores::load())
    }

    pub fn with_high_scores(tuning: Tuning, viewport: Viewport, high_scores: HighScores) -> Self {
        let mut state = GameState::new(tuning, viewport);
        state.best_score = high_scores.top_score().unwrap_or(0) as f64;
        Self {
            state,
            input: TickInput::default(),
            high_scores,
            events: Vec::new(),
        }
    }

    /// Start (or restart) a run; `None` picks a fresh seed
    ///
    /// Only valid from the title or game over screens.
    pub fn start_run(&mut self, seed: Option<u32>) -> bool {
        let seed = seed.unwrap_or_else(crate::fresh_seed);
        let started = self.state.start_run(seed);
        self.collect_events();
        started
    }

    /// The game action was pressed: hold, and start a run if idle
    pub fn press(&mut self) {
        self.input.held = true;
        if matches!(self.state.phase, GamePhase::Boot | GamePhase::GameOver) {
            self.start_run(None);
        }
    }

    /// The game action was released
    pub fn release(&mut self) {
        self.input.held = false;
    }

    /// Set the held flag directly; read at the next tick
    pub fn set_input_held(&mut self, held: bool) {
        self.input.held = held;
    }

    pub fn input_held(&self) -> bool {
        self.input.held
    }

    /// Abandon the current run and show the title screen
    pub fn return_to_menu(&mut self) {
        self.input.held = false;
        self.state.return_to_menu();
    }

    /// Advance by one frame; `dt` is clamped to `MAX_FRAME_DT`
    pub fn tick(&mut self, dt: f32) {
        tick(&mut self.state, &self.input, dt.min(MAX_FRAME_DT));
        self.collect_events();
    }

    /// New viewport size; applies to spawning and death checks immediately
    ///
    /// Non-finite, non-positive or oversized sides are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        let valid = |side: f32| side.is_finite() && side > 0.0 && side <= MAX_VIEWPORT_SIDE;
        if !valid(width) || !valid(height) {
            log::warn!("Ignoring viewport resize to {}x{}", width, height);
            return;
        }
        self.state.viewport = Viewport { width, height };
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Take events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn collect_events(&mut self) {
        for event in self.state.drain_events() {
            if let GameEvent::Died {
                final_score,
                max_combo,
                best_bonus,
                ..
            } = event
            {
                self.record_run(final_score, max_combo, best_bonus);
            }
            self.events.push(event);
        }
    }

    fn record_run(&mut self, score: f64, max_combo: u32, best_bonus: f32) {
        let rank = self
            .high_scores
            .add_run(score, max_combo, best_bonus, highscores::now_ms());
        if let Some(rank) = rank {
            log::info!("Leaderboard rank #{}", rank);
            self.high_scores.save();
        }
    }
}
