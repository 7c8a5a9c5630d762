//! Data-driven game balance
//!
//! Every number that shapes a run lives here so balance passes can ship as
//! JSON without touching the simulation. `Default` is the reference balance.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One procedural lane: vertical bias and jitter, as fractions of height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneDef {
    pub y_bias: f32,
    pub y_range: f32,
}

/// Tier weights that apply once the run has lasted `from_time` seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnBand {
    pub from_time: f32,
    /// Relative weights for [small, medium, large]
    pub weights: [f32; 3],
}

/// Game balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Orbit ===
    pub orbit_radius: f32,
    /// Angular velocity while orbiting (rad/s, clockwise on screen)
    pub orbit_omega: f32,

    // === World scroll ===
    pub scroll_speed_init: f32,
    pub scroll_speed_max: f32,
    /// px/s gained per second
    pub scroll_accel: f32,

    // === Free flight ===
    /// Extra speed along the tangent on detach
    pub surge_boost: f32,
    /// Screen-relative vx on launch never goes below -this
    pub max_backward_screen_v: f32,
    pub vel_damping_x: f32,
    pub vel_damping_y: f32,
    /// Equilibrium screen vx is -scroll_speed * drift_ratio
    pub drift_ratio: f32,
    /// Downward pull after the first detach (px/s²)
    pub gravity: f32,

    // === Scoring ===
    /// Points per second drained while orbiting a penalty anchor
    pub red_orbit_drain: f32,
    pub combo_step: f32,
    pub combo_max: f32,

    // === Layout ===
    pub player_screen_x_ratio: f32,
    pub anchor_y_min: f32,
    pub anchor_y_max: f32,
    pub vertical_death_margin: f32,
    pub starter_offset: f32,

    // === Spawning ===
    pub anchor_dx_min: f32,
    pub anchor_dx_max: f32,
    pub min_anchor_sep: f32,
    pub spawn_attempts: u32,
    pub spawn_x_jitter: f32,
    pub cull_margin: f32,
    pub lookahead_margin: f32,
    pub lanes: Vec<LaneDef>,
    /// Sorted by `from_time`
    pub spawn_bands: Vec<SpawnBand>,

    // === Crash ===
    pub crash_duration: f32,
    pub shake_amplitude: f32,
    pub shake_decay: f32,
    pub zoom_target: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            orbit_radius: 70.0,
            orbit_omega: 3.0,

            scroll_speed_init: 155.0,
            scroll_speed_max: 480.0,
            scroll_accel: 4.0,

            surge_boost: 220.0,
            max_backward_screen_v: 250.0,
            vel_damping_x: 0.75,
            vel_damping_y: 0.9,
            drift_ratio: 0.5,
            gravity: 8.0,

            red_orbit_drain: 200.0,
            combo_step: 0.5,
            combo_max: 4.0,

            player_screen_x_ratio: 0.35,
            anchor_y_min: 0.16,
            anchor_y_max: 0.84,
            vertical_death_margin: 120.0,
            starter_offset: 230.0,

            anchor_dx_min: 380.0,
            anchor_dx_max: 580.0,
            min_anchor_sep: 42.0,
            spawn_attempts: 10,
            spawn_x_jitter: 90.0,
            cull_margin: 280.0,
            lookahead_margin: 620.0,
            lanes: vec![
                LaneDef { y_bias: 0.25, y_range: 0.10 },
                LaneDef { y_bias: 0.50, y_range: 0.13 },
                LaneDef { y_bias: 0.75, y_range: 0.10 },
            ],
            spawn_bands: vec![
                SpawnBand { from_time: 0.0, weights: [5.0, 80.0, 15.0] },
                SpawnBand { from_time: 15.0, weights: [25.0, 50.0, 25.0] },
                SpawnBand { from_time: 45.0, weights: [35.0, 35.0, 30.0] },
            ],

            crash_duration: 5.0,
            shake_amplitude: 18.0,
            shake_decay: 2.5,
            zoom_target: 1.08,
        }
    }
}

/// Reasons a tuning document is rejected
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    Parse(String),
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "tuning parse error: {msg}"),
            Self::Invalid { field, reason } => write!(f, "invalid tuning `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {}

impl Tuning {
    /// Tangential speed while orbiting
    pub fn orbit_speed(&self) -> f32 {
        self.orbit_radius * self.orbit_omega
    }

    /// Parse and validate a JSON tuning document (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Tier weights for a given run time
    pub fn weights_at(&self, run_time: f32) -> [f32; 3] {
        self.spawn_bands
            .iter()
            .rev()
            .find(|b| run_time >= b.from_time)
            .or(self.spawn_bands.first())
            .map(|b| b.weights)
            .unwrap_or([0.0, 1.0, 0.0])
    }

    /// Check ranges the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if self.orbit_radius <= 0.0 {
            return invalid("orbit_radius", "must be positive");
        }
        if self.scroll_speed_init <= 0.0 {
            return invalid("scroll_speed_init", "must be positive");
        }
        if self.scroll_speed_max < self.scroll_speed_init {
            return invalid("scroll_speed_max", "must be at least scroll_speed_init");
        }
        if self.scroll_accel < 0.0 {
            return invalid("scroll_accel", "must not be negative");
        }
        if self.anchor_dx_min <= 0.0 || self.anchor_dx_max < self.anchor_dx_min {
            return invalid("anchor_dx_min", "spacing range must be positive and ordered");
        }
        if !(0.0..=1.0).contains(&self.anchor_y_min)
            || !(0.0..=1.0).contains(&self.anchor_y_max)
            || self.anchor_y_max < self.anchor_y_min
        {
            return invalid("anchor_y_min", "vertical band must be ordered fractions");
        }
        if self.combo_max < 1.0 {
            return invalid("combo_max", "must be at least 1");
        }
        if self.spawn_attempts == 0 {
            return invalid("spawn_attempts", "must be at least 1");
        }
        if self.crash_duration <= 0.0 {
            return invalid("crash_duration", "must be positive");
        }
        if self.lanes.is_empty() {
            return invalid("lanes", "at least one lane is required");
        }
        if self.spawn_bands.is_empty() {
            return invalid("spawn_bands", "at least one band is required");
        }
        if self
            .spawn_bands
            .windows(2)
            .any(|w| w[1].from_time < w[0].from_time)
        {
            return invalid("spawn_bands", "must be sorted by from_time");
        }
        for band in &self.spawn_bands {
            if band.weights.iter().any(|w| *w < 0.0) {
                return invalid("spawn_bands", "weights must not be negative");
            }
            if band.weights.iter().sum::<f32>() <= 0.0 {
                return invalid("spawn_bands", "a weight row sums to zero");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.orbit_speed(), 210.0);
    }

    #[test]
    fn test_weights_follow_run_time() {
        let tuning = Tuning::default();
        assert_eq!(tuning.weights_at(0.0), [5.0, 80.0, 15.0]);
        assert_eq!(tuning.weights_at(14.9), [5.0, 80.0, 15.0]);
        assert_eq!(tuning.weights_at(15.0), [25.0, 50.0, 25.0]);
        assert_eq!(tuning.weights_at(120.0), [35.0, 35.0, 30.0]);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "scroll_speed_max": 600.0 }"#).unwrap();
        assert_eq!(tuning.scroll_speed_max, 600.0);
        assert_eq!(tuning.scroll_speed_init, 155.0);
        assert_eq!(tuning.lanes.len(), 3);
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_rejects_inverted_spacing() {
        let err =
            Tuning::from_json(r#"{ "anchor_dx_min": 600.0, "anchor_dx_max": 400.0 }"#).unwrap_err();
        assert_eq!(
            err,
            TuningError::Invalid {
                field: "anchor_dx_min",
                reason: "spacing range must be positive and ordered"
            }
        );
    }

    #[test]
    fn test_rejects_zero_weight_band() {
        let mut tuning = Tuning::default();
        tuning.spawn_bands[1].weights = [0.0, 0.0, 0.0];
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_json_round_trip_keeps_lanes() {
        let tuning = Tuning::default();
        let back = Tuning::from_json(&tuning.to_json()).unwrap();
        assert_eq!(back, tuning);
    }
}
