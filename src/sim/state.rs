//! Game state and core simulation types
//!
//! All state of a run lives in `GameState`; `tick` is its only mutator
//! once a run is going.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::anchor::{Anchor, AnchorId, AnchorTier};
use super::crash::{CrashState, Particle};
use super::onboarding::Onboarding;
use super::rng::RunRng;
use super::scoring::ComboState;
use super::spawner::{self, Lane};
use crate::consts::*;
use crate::tuning::Tuning;

/// Run lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for a start signal
    Boot,
    /// Active gameplay
    Running,
    /// Death explosion playing; physics frozen
    Crashing,
    /// Run ended, waiting for a restart signal
    GameOver,
}

/// Logical viewport size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

/// The orbiter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// World position
    pub pos: Vec2,
    /// Free-flight velocity (ignored while orbiting)
    pub vel: Vec2,
    /// Anchor being orbited
    pub orbit: Option<AnchorId>,
    /// Orbit angle (radians, clockwise in y-down coords)
    pub orbit_angle: f32,
    /// Gravity only applies after the first detach of the run
    pub has_detached: bool,
    /// Recent positions, newest first
    pub trail: Vec<Vec2>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            orbit: None,
            orbit_angle: 0.0,
            has_detached: false,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }
}

impl Player {
    pub fn is_orbiting(&self) -> bool {
        self.orbit.is_some()
    }

    /// Record current position to trail
    pub fn record_trail(&mut self) {
        self.trail.insert(0, self.pos);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop();
        }
    }
}

/// Short feedback timers (seconds remaining)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackTimers {
    pub combo_pulse: f32,
    pub player_burst: f32,
    pub red_flash: f32,
    pub detach_flash: f32,
}

impl FeedbackTimers {
    pub const COMBO_PULSE: f32 = 0.38;
    pub const PLAYER_BURST: f32 = 0.30;
    pub const RED_FLASH: f32 = 0.35;
    pub const DETACH_FLASH: f32 = 0.12;

    pub fn tick(&mut self, dt: f32) {
        for timer in [
            &mut self.combo_pulse,
            &mut self.player_burst,
            &mut self.red_flash,
            &mut self.detach_flash,
        ] {
            *timer = (*timer - dt).max(0.0);
        }
    }
}

/// What a floating text says; formatting is up to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FloatLabel {
    /// Signed attach score
    Bonus(i64),
    /// Same-tier streak milestone
    Combo(u32),
}

/// Score popup drifting up from where it was earned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingText {
    /// World position
    pub pos: Vec2,
    pub label: FloatLabel,
    pub tier: AnchorTier,
    pub life: f32,
    pub large: bool,
}

impl FloatingText {
    const RISE_SPEED: f32 = 50.0;
    const FADE_RATE: f32 = 1.7;

    pub fn advance(&mut self, dt: f32) {
        self.pos.y -= Self::RISE_SPEED * dt;
        self.life -= Self::FADE_RATE * dt;
    }
}

/// Notifications for audio/render/storage collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted {
        seed: u32,
    },
    Attached {
        tier: AnchorTier,
        bonus: f64,
        combo: u32,
    },
    /// `tier` is `None` when the orbited anchor no longer exists
    Detached {
        tier: Option<AnchorTier>,
    },
    Died {
        final_score: f64,
        max_combo: u32,
        best_bonus: f32,
        new_best: bool,
    },
    GameOver,
}

/// Stats frozen at death for the game over screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: f64,
    pub max_combo: u32,
    pub best_bonus: f32,
    pub run_time: f32,
    pub new_best: bool,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub phase: GamePhase,
    /// Run seed for reproducibility
    pub seed: u32,
    pub rng: RunRng,

    /// Seconds since run start
    pub run_time: f32,
    /// World X of the viewport's left edge
    pub camera_x: f32,
    pub scroll_speed: f32,
    pub score: f64,
    pub combo: ComboState,

    pub player: Player,
    pub anchors: Vec<Anchor>,
    pub lanes: Vec<Lane>,

    pub timers: FeedbackTimers,
    pub floating_texts: Vec<FloatingText>,
    pub onboarding: Onboarding,
    pub crash: Option<CrashState>,

    /// Snapshot of the last finished run
    pub summary: Option<RunSummary>,
    /// Best score across runs (seeded by the session from storage)
    pub best_score: f64,

    #[serde(skip)]
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create an idle state on the title screen
    pub fn new(tuning: Tuning, viewport: Viewport) -> Self {
        Self {
            scroll_speed: tuning.scroll_speed_init,
            tuning,
            viewport,
            phase: GamePhase::Boot,
            seed: 0,
            rng: RunRng::new(0),
            run_time: 0.0,
            camera_x: 0.0,
            score: 0.0,
            combo: ComboState::default(),
            player: Player::default(),
            anchors: Vec::new(),
            lanes: Vec::new(),
            timers: FeedbackTimers::default(),
            floating_texts: Vec::new(),
            onboarding: Onboarding::default(),
            crash: None,
            summary: None,
            best_score: 0.0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Start a run from `Boot` or `GameOver`; ignored otherwise
    pub fn start_run(&mut self, seed: u32) -> bool {
        if !matches!(self.phase, GamePhase::Boot | GamePhase::GameOver) {
            log::debug!("start ignored in {:?}", self.phase);
            return false;
        }

        self.reset_run(seed);
        self.phase = GamePhase::Running;
        self.push_event(GameEvent::RunStarted { seed });
        log::info!("Run started with seed {}", seed);
        true
    }

    /// Drop any in-flight run and go back to the title screen
    pub fn return_to_menu(&mut self) {
        if self.phase == GamePhase::Boot {
            return;
        }
        log::info!("Returning to menu from {:?}", self.phase);
        self.clear_run();
        self.phase = GamePhase::Boot;
    }

    fn clear_run(&mut self) {
        self.run_time = 0.0;
        self.camera_x = 0.0;
        self.scroll_speed = self.tuning.scroll_speed_init;
        self.score = 0.0;
        self.combo = ComboState::default();
        self.player = Player::default();
        self.anchors.clear();
        self.lanes.clear();
        self.timers = FeedbackTimers::default();
        self.floating_texts.clear();
        self.onboarding = Onboarding::default();
        self.crash = None;
        self.next_id = 1;
    }

    fn reset_run(&mut self, seed: u32) {
        self.clear_run();
        self.seed = seed;
        self.rng = RunRng::new(seed);

        self.player.pos = Vec2::new(0.0, self.viewport.height * 0.5);
        self.player.vel = Vec2::new(self.tuning.scroll_speed_init, 0.0);
        self.camera_x = self.player.pos.x - self.viewport.width * self.tuning.player_screen_x_ratio;
        self.lanes = spawner::init_lanes(&self.tuning.lanes, self.player.pos.x);

        spawner::place_starter(self);
        spawner::maintain_anchors(self);
    }

    /// Allocate a new anchor handle
    pub fn next_anchor_id(&mut self) -> AnchorId {
        let id = AnchorId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn anchor(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.iter().find(|a| a.id == id)
    }

    pub fn anchor_mut(&mut self, id: AnchorId) -> Option<&mut Anchor> {
        self.anchors.iter_mut().find(|a| a.id == id)
    }

    /// Anchor the player is orbiting, if any
    pub fn orbit_anchor(&self) -> Option<&Anchor> {
        self.player.orbit.and_then(|id| self.anchor(id))
    }

    /// World X to screen X
    pub fn screen_x(&self, world_x: f32) -> f32 {
        world_x - self.camera_x
    }

    /// How far (0..1) the player is inside the left-edge danger zone
    pub fn danger_depth(&self) -> f32 {
        let sx = self.screen_x(self.player.pos.x);
        ((DANGER_ZONE_WIDTH - sx) / DANGER_ZONE_WIDTH).clamp(0.0, 1.0)
    }

    /// Explosion shards of the current crash (empty otherwise)
    pub fn particles(&self) -> &[Particle] {
        match &self.crash {
            Some(crash) => &crash.particles,
            None => &[],
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
