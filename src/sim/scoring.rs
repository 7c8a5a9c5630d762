//! Score accrual and the same-tier combo model
//!
//! Score is a signed float and is never clamped: orbiting a penalty anchor
//! can push it below zero.

use serde::{Deserialize, Serialize};

use super::anchor::{Anchor, AnchorTier};
use crate::tuning::Tuning;

/// Same-tier attach streak and the stats derived from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboState {
    /// Tier of the previous attach this run
    pub last_tier: Option<AnchorTier>,
    /// Consecutive attaches to the same tier
    pub streak: u32,
    /// Per-tick orbit score multiplier derived from `streak`
    pub multiplier: f32,
    /// Longest streak this run
    pub max_streak: u32,
    /// Highest tier bonus multiplier attached to this run
    pub best_bonus: f32,
}

impl Default for ComboState {
    fn default() -> Self {
        Self {
            last_tier: None,
            streak: 0,
            multiplier: 1.0,
            max_streak: 0,
            best_bonus: 1.0,
        }
    }
}

/// Result of registering an attach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboUpdate {
    pub streak: u32,
    /// Streak increased (or this is the first attach of the run)
    pub grew: bool,
}

impl ComboState {
    /// Record an attach to `anchor` and recompute the multiplier
    pub fn register(&mut self, anchor: &Anchor, tuning: &Tuning) -> ComboUpdate {
        let prev = self.streak;
        self.streak = if self.last_tier == Some(anchor.tier) {
            self.streak + 1
        } else {
            1
        };
        self.last_tier = Some(anchor.tier);
        self.multiplier = combo_multiplier(self.streak, tuning.combo_step, tuning.combo_max);
        self.max_streak = self.max_streak.max(self.streak);
        self.best_bonus = self.best_bonus.max(anchor.bonus_multiplier);

        ComboUpdate {
            streak: self.streak,
            grew: self.streak > prev || prev == 0,
        }
    }
}

/// `min(max, 1 + (streak - 1) * step)`
pub fn combo_multiplier(streak: u32, step: f32, max: f32) -> f32 {
    (1.0 + streak.saturating_sub(1) as f32 * step).min(max)
}

/// Survival reward, paid every running tick
pub fn survival_points(scroll_speed: f32, dt: f32) -> f64 {
    scroll_speed as f64 * dt as f64
}

/// Per-tick orbit score: drain on the penalty tier, bonus otherwise
pub fn orbit_points(
    anchor: &Anchor,
    scroll_speed: f32,
    combo_multiplier: f32,
    tuning: &Tuning,
    dt: f32,
) -> f64 {
    if anchor.tier.is_penalty() {
        -(tuning.red_orbit_drain as f64) * dt as f64
    } else {
        survival_points(scroll_speed, dt) * anchor.bonus_multiplier as f64 * combo_multiplier as f64
    }
}

/// Instant attach score: flat penalty, or tier bonus scaled by streak
pub fn attach_points(anchor: &Anchor, streak: u32) -> f64 {
    if anchor.tier.is_penalty() {
        anchor.attach_bonus as f64
    } else {
        anchor.attach_bonus as f64 * streak as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::anchor::AnchorId;
    use glam::Vec2;

    fn anchor(tier: AnchorTier) -> Anchor {
        Anchor::new(AnchorId(1), tier, Vec2::ZERO, 1.0)
    }

    #[test]
    fn test_combo_resets_on_tier_change() {
        let tuning = Tuning::default();
        let mut combo = ComboState::default();
        combo.register(&anchor(AnchorTier::Small), &tuning);
        let update = combo.register(&anchor(AnchorTier::Medium), &tuning);
        assert_eq!(update.streak, 1);
        assert!(!update.grew);
        assert_eq!(combo.multiplier, 1.0);
    }

    #[test]
    fn test_combo_three_in_a_row() {
        let tuning = Tuning::default();
        let mut combo = ComboState::default();
        for _ in 0..3 {
            combo.register(&anchor(AnchorTier::Small), &tuning);
        }
        assert_eq!(combo.streak, 3);
        assert_eq!(
            combo.multiplier,
            (1.0 + 2.0 * tuning.combo_step).min(tuning.combo_max)
        );
        assert_eq!(combo.max_streak, 3);
        assert_eq!(combo.best_bonus, 10.0);
    }

    #[test]
    fn test_combo_caps() {
        assert_eq!(combo_multiplier(1, 0.5, 4.0), 1.0);
        assert_eq!(combo_multiplier(7, 0.5, 4.0), 4.0);
        assert_eq!(combo_multiplier(20, 0.5, 4.0), 4.0);
        assert_eq!(combo_multiplier(0, 0.5, 4.0), 1.0);
    }

    #[test]
    fn test_max_streak_survives_reset() {
        let tuning = Tuning::default();
        let mut combo = ComboState::default();
        combo.register(&anchor(AnchorTier::Medium), &tuning);
        combo.register(&anchor(AnchorTier::Medium), &tuning);
        combo.register(&anchor(AnchorTier::Large), &tuning);
        assert_eq!(combo.streak, 1);
        assert_eq!(combo.max_streak, 2);
        assert_eq!(combo.best_bonus, 3.0);
    }

    #[test]
    fn test_attach_points() {
        // Penalty is flat regardless of streak
        assert_eq!(attach_points(&anchor(AnchorTier::Large), 5), -1000.0);
        // Others scale with the streak count, not the multiplier
        assert_eq!(attach_points(&anchor(AnchorTier::Small), 3), 15000.0);
        assert_eq!(attach_points(&anchor(AnchorTier::Medium), 1), 2500.0);
    }

    #[test]
    fn test_orbit_points() {
        let tuning = Tuning::default();
        let drain = orbit_points(&anchor(AnchorTier::Large), 300.0, 4.0, &tuning, 0.5);
        assert_eq!(drain, -100.0);
        let gain = orbit_points(&anchor(AnchorTier::Medium), 200.0, 1.5, &tuning, 0.5);
        assert_eq!(gain, 100.0 * 3.0 * 1.5);
    }
}
