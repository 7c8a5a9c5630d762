//! Demo/attract-mode input policy
//!
//! Looks at a state snapshot and decides whether the action should be held.
//! Plays a plausible game, not a good one.

use crate::clockwise_tangent;
use crate::sim::{GamePhase, GameState};

#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    /// Release once the launch tangent's forward component exceeds this
    pub release_alignment: f32,
    /// Grab penalty anchors too
    pub accept_penalty: bool,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            release_alignment: 0.85,
            accept_penalty: false,
        }
    }
}

impl Autopilot {
    /// Whether the action should be held this tick
    pub fn decide(&self, state: &GameState) -> bool {
        if state.phase != GamePhase::Running {
            return false;
        }

        if let Some(anchor) = state.orbit_anchor() {
            if anchor.tier.is_penalty() && !self.accept_penalty {
                return false;
            }
            let tangent = clockwise_tangent(state.player.orbit_angle);
            return tangent.x < self.release_alignment;
        }

        state.anchors.iter().any(|a| {
            !a.used
                && (self.accept_penalty || !a.tier.is_penalty())
                && a.grab_distance_sq(state.player.pos).is_some()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Anchor, AnchorTier, TickInput, Viewport, tick};
    use crate::tuning::Tuning;
    use glam::Vec2;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn running() -> GameState {
        let mut state = GameState::new(Tuning::default(), Viewport::default());
        state.start_run(10);
        state
    }

    #[test]
    fn test_idle_when_not_running() {
        let state = GameState::new(Tuning::default(), Viewport::default());
        assert!(!Autopilot::default().decide(&state));
    }

    #[test]
    fn test_holds_for_anchor_in_range() {
        let mut state = running();
        let pilot = Autopilot::default();
        assert!(!pilot.decide(&state));
        let starter = state.player.pos + Vec2::new(230.0, 0.0);
        state.player.pos = starter - Vec2::new(50.0, 0.0);
        assert!(pilot.decide(&state));
    }

    #[test]
    fn test_skips_penalty_anchor() {
        let mut state = running();
        let id = state.next_anchor_id();
        let pos = state.player.pos + Vec2::new(0.0, 30.0);
        state.anchors.push(Anchor::new(id, AnchorTier::Large, pos, 1.0));
        assert!(!Autopilot::default().decide(&state));
        let greedy = Autopilot {
            accept_penalty: true,
            ..Default::default()
        };
        assert!(greedy.decide(&state));
    }

    #[test]
    fn test_releases_at_top_of_orbit() {
        let mut state = running();
        let id = state.next_anchor_id();
        let pos = state.player.pos + Vec2::new(10.0, 0.0);
        state.anchors.push(Anchor::new(id, AnchorTier::Medium, pos, 1.0));
        tick(&mut state, &TickInput { held: true }, 1.0 / 60.0);
        assert!(state.player.is_orbiting());

        let pilot = Autopilot::default();
        state.player.orbit_angle = PI;
        assert!(pilot.decide(&state));
        state.player.orbit_angle = -FRAC_PI_2;
        assert!(!pilot.decide(&state));
    }

    #[test]
    fn test_demo_run_scores() {
        let mut state = running();
        let pilot = Autopilot::default();
        for _ in 0..(60 * 20) {
            let input = TickInput {
                held: pilot.decide(&state),
            };
            tick(&mut state, &input, 1.0 / 60.0);
            if state.phase != GamePhase::Running {
                break;
            }
        }
        // The starter anchor alone pays out
        assert!(state.combo.max_streak >= 1);
        assert!(state.score > 2500.0);
    }
}
