//! Death explosion sequencer
//!
//! Runs for `Tuning::crash_duration` after death. Only decorative state
//! moves here: shards, zoom, fade, shake.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::RunRng;
use crate::consts::PARTICLE_COUNT;
use crate::tuning::Tuning;

/// Shard palette (0xRRGGBB)
pub const SHARD_COLORS: [u32; 8] = [
    0x00ccff, 0xffffff, 0x39ff6a, 0x00ffff, 0xcc44ff, 0xff6600, 0x00d4ff, 0xff00aa,
];

/// Downward pull on shards (px/s²)
const SHARD_GRAVITY: f32 = 18.0;
/// Bright core flash at the death point
const CORE_FLASH: f32 = 0.55;
/// Fade to dark starts at this fraction of the crash
const FADE_START: f32 = 0.85;
const FADE_MAX: f32 = 0.92;

/// Shard behavior class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShardKind {
    /// Rockets to the viewport edges
    Fast,
    /// Lingers mid-field
    Drifter,
    /// Large slow glow near the center
    Glow,
}

impl ShardKind {
    fn roll(rng: &mut RunRng) -> Self {
        match rng.next_f32() {
            r if r < 0.35 => ShardKind::Fast,
            r if r < 0.70 => ShardKind::Drifter,
            _ => ShardKind::Glow,
        }
    }

    /// (speed, decay, radius) ranges
    fn ranges(self) -> [(f32, f32); 3] {
        match self {
            ShardKind::Fast => [(220.0, 780.0), (0.18, 0.43), (1.5, 5.0)],
            ShardKind::Drifter => [(50.0, 230.0), (0.10, 0.22), (4.0, 12.0)],
            ShardKind::Glow => [(10.0, 65.0), (0.07, 0.15), (8.0, 22.0)],
        }
    }
}

/// An explosion shard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1 at spawn, removed at 0
    pub life: f32,
    /// Life lost per second
    pub decay: f32,
    pub radius: f32,
    pub color: u32,
    pub kind: ShardKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrashState {
    /// Where the player died (world)
    pub origin: Vec2,
    pub elapsed: f32,
    /// Camera zoom, 1 = none
    pub zoom: f32,
    /// Darkening overlay alpha
    pub fade: f32,
    /// Screen shake amplitude (px)
    pub shake: f32,
    pub core_timer: f32,
    pub particles: Vec<Particle>,
    /// Duration elapsed; the run is over
    pub finished: bool,
}

impl CrashState {
    /// Start a crash at `origin`, drawing every shard from the run stream
    pub fn new(origin: Vec2, rng: &mut RunRng, tuning: &Tuning) -> Self {
        let particles = (0..PARTICLE_COUNT)
            .map(|_| {
                let angle = rng.next_f32() * TAU;
                let color = SHARD_COLORS[(rng.next_f32() * SHARD_COLORS.len() as f32) as usize
                    % SHARD_COLORS.len()];
                let kind = ShardKind::roll(rng);
                let [speed, decay, radius] = kind.ranges();
                let speed = rng.range(speed.0, speed.1);
                Particle {
                    pos: origin,
                    vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                    life: 1.0,
                    decay: rng.range(decay.0, decay.1),
                    radius: rng.range(radius.0, radius.1),
                    color,
                    kind,
                }
            })
            .collect();

        Self {
            origin,
            elapsed: 0.0,
            zoom: 1.0,
            fade: 0.0,
            shake: tuning.shake_amplitude,
            core_timer: CORE_FLASH,
            particles,
            finished: false,
        }
    }

    /// Advance decorative state; returns true once the crash is over
    pub fn advance(&mut self, dt: f32, tuning: &Tuning) -> bool {
        if self.finished {
            return true;
        }

        self.elapsed += dt;
        let t = (self.elapsed / tuning.crash_duration).min(1.0);

        // Zoom peaks in the first third, then holds
        self.zoom = 1.0 + (tuning.zoom_target - 1.0) * (t * 3.0).min(1.0);
        self.fade = ((t - FADE_START) / (1.0 - FADE_START)).max(0.0) * FADE_MAX;
        self.shake *= (-tuning.shake_decay * dt).exp();
        self.core_timer = (self.core_timer - dt).max(0.0);

        for p in &mut self.particles {
            p.pos += p.vel * dt;
            p.vel.y += SHARD_GRAVITY * dt;
            p.life -= p.decay * dt;
        }
        self.particles.retain(|p| p.life > 0.0);

        if self.elapsed >= tuning.crash_duration {
            self.finished = true;
            self.particles.clear();
            self.shake = 0.0;
        }
        self.finished
    }
}
