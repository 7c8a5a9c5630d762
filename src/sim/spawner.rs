//! Procedural anchor lanes
//!
//! Each lane owns a spawn cursor and a vertical band. Lanes spawn
//! independently until their cursor is past the look-ahead horizon, so the
//! global anchor density is the sum of the lane densities.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::anchor::{Anchor, AnchorId, AnchorTier};
use super::state::GameState;
use crate::tuning::LaneDef;

/// First lane cursor, relative to the player's start X
const LANE_CURSOR_ORIGIN: f32 = -80.0;
/// Cursor offset between consecutive lanes
const LANE_CURSOR_STAGGER: f32 = 110.0;

/// One spawn lane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    /// Vertical center as a fraction of viewport height
    pub y_bias: f32,
    /// Half-height of the vertical jitter, as a fraction of height
    pub y_range: f32,
    /// World X of the rightmost anchor committed by this lane
    pub cursor: f32,
}

impl Lane {
    pub fn new(def: &LaneDef, cursor: f32) -> Self {
        Self {
            y_bias: def.y_bias,
            y_range: def.y_range,
            cursor,
        }
    }
}

/// Build staggered lanes for a run starting at `start_x`
pub fn init_lanes(defs: &[LaneDef], start_x: f32) -> Vec<Lane> {
    defs.iter()
        .enumerate()
        .map(|(i, def)| Lane::new(def, start_x + LANE_CURSOR_ORIGIN + i as f32 * LANE_CURSOR_STAGGER))
        .collect()
}

/// Guaranteed first target: a medium anchor straight ahead of the player
pub fn place_starter(state: &mut GameState) -> AnchorId {
    let id = state.next_anchor_id();
    let pos = state.player.pos + Vec2::new(state.tuning.starter_offset, 0.0);
    state
        .anchors
        .push(Anchor::new(id, AnchorTier::Medium, pos, 1.0));
    id
}

/// Sample a tier from the run-time weight table
pub fn pick_tier(state: &mut GameState) -> AnchorTier {
    let weights = state.tuning.weights_at(state.run_time);
    let index = state
        .rng
        .weighted_index(&weights, AnchorTier::Medium.index());
    AnchorTier::from_index(index).unwrap_or(AnchorTier::Medium)
}

/// Spawn the next anchor of lane `lane_index`, advancing its cursor
pub fn spawn_from_lane(state: &mut GameState, lane_index: usize) -> AnchorId {
    let lane = state.lanes[lane_index];
    let height = state.viewport.height;
    let y_min = height * state.tuning.anchor_y_min;
    let y_max = height * state.tuning.anchor_y_max;

    let dx = state
        .rng
        .range(state.tuning.anchor_dx_min, state.tuning.anchor_dx_max);
    let base_x = lane.cursor + dx;
    let tier = pick_tier(state);
    let new_radius = tier.def().radius;

    let mut first: Option<Vec2> = None;
    let mut chosen: Option<Vec2> = None;
    for attempt in 0..state.tuning.spawn_attempts {
        let x = if attempt == 0 {
            base_x
        } else {
            base_x + state.rng.centered(state.tuning.spawn_x_jitter)
        };
        let raw_y = lane.y_bias * height + state.rng.centered(2.0 * lane.y_range * height);
        let candidate = Vec2::new(x, raw_y.clamp(y_min, y_max));
        first.get_or_insert(candidate);

        let sep = state.tuning.min_anchor_sep;
        let overlaps = state
            .anchors
            .iter()
            .any(|a| a.pos.distance(candidate) < a.radius + new_radius + sep);
        if !overlaps {
            chosen = Some(candidate);
            break;
        }
    }

    let fallback_placed = chosen.is_none();
    let pos = chosen.or(first).unwrap_or(Vec2::new(base_x, lane.y_bias * height));
    if fallback_placed {
        log::debug!(
            "lane {} found no free spot near x={:.0}, placing with overlap",
            lane_index,
            pos.x
        );
    }

    let (sf_min, sf_max) = tier.def().speed_factor_range;
    let speed_factor = state.rng.range(sf_min, sf_max);

    let id = state.next_anchor_id();
    let mut anchor = Anchor::new(id, tier, pos, speed_factor);
    anchor.fallback_placed = fallback_placed;
    state.anchors.push(anchor);
    state.lanes[lane_index].cursor = pos.x;
    id
}

/// Cull anchors behind the camera and refill every lane to the horizon
///
/// The orbited anchor is never culled. Lane cursors never trail the cull
/// line, so refilled anchors always land in the live window.
pub fn maintain_anchors(state: &mut GameState) {
    let cull_x = state.camera_x - state.tuning.cull_margin;
    let orbit = state.player.orbit;
    state
        .anchors
        .retain(|a| Some(a.id) == orbit || a.pos.x > cull_x);

    let ahead_x = state.camera_x + state.viewport.width + state.tuning.lookahead_margin;
    for lane_index in 0..state.lanes.len() {
        // A lane left behind by a camera jump restarts at the cull line
        let lane = &mut state.lanes[lane_index];
        lane.cursor = lane.cursor.max(cull_x);
        while state.lanes[lane_index].cursor < ahead_x {
            spawn_from_lane(state, lane_index);
        }
    }
}
