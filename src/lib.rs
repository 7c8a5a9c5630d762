//! Orbit Surge - a side-scrolling orbit-and-surge arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, physics, scoring, crash)
//! - `session`: Controller owning one run and the held-input flag
//! - `tuning`: Data-driven game balance
//! - `highscores`: Best-score leaderboard
//! - `autopilot`: Demo/attract-mode input policy
//! - `web`: wasm-bindgen surface for a JavaScript renderer (wasm32 only)

pub mod autopilot;
pub mod highscores;
pub mod session;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::HighScores;
pub use session::{RenderHints, Simulation};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Largest frame delta the simulation will integrate (tab-switch stalls)
    pub const MAX_FRAME_DT: f32 = 0.05;
    /// Step used by the headless runner
    pub const HEADLESS_DT: f32 = 1.0 / 60.0;

    /// Default viewport (logical pixels)
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1280.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 720.0;
    /// Largest accepted viewport side
    pub const MAX_VIEWPORT_SIDE: f32 = 16_384.0;

    /// Player trail capacity
    pub const TRAIL_LENGTH: usize = 28;
    /// Visual player radius, sent to renderers (not used for collisions)
    pub const PLAYER_RADIUS: f32 = 6.0;

    /// Width of the danger zone at the left screen edge
    pub const DANGER_ZONE_WIDTH: f32 = 150.0;

    /// Explosion shards spawned on death
    pub const PARTICLE_COUNT: usize = 100;
}

/// Unit tangent of a clockwise orbit (y-down screen coords) at `theta`
#[inline]
pub fn clockwise_tangent(theta: f32) -> Vec2 {
    Vec2::new(-theta.sin(), theta.cos())
}

/// Point on a circle of radius `r` around `center` at angle `theta`
#[inline]
pub fn on_circle(center: Vec2, r: f32, theta: f32) -> Vec2 {
    center + Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Exponentially relax `value` toward `target` at `rate` per second
///
/// Frame-rate independent: two half steps equal one full step.
#[inline]
pub fn relax_toward(value: f32, target: f32, rate: f32, dt: f32) -> f32 {
    target + (value - target) * (-rate * dt).exp()
}

/// Seed for a new run: wall clock mixed with an OS random value
#[cfg(not(target_arch = "wasm32"))]
pub fn fresh_seed() -> u32 {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    (millis as u32) ^ rand::random::<u32>()
}

/// Seed for a new run: `Date.now()` mixed with `Math.random()`
#[cfg(target_arch = "wasm32")]
pub fn fresh_seed() -> u32 {
    let millis = js_sys::Date::now() as u64;
    (millis as u32) ^ (js_sys::Math::random() * u32::MAX as f64) as u32
}
