//! Attach/detach state machine
//!
//! Free flight and orbiting are mutually exclusive; `Player::orbit` is the
//! state. Attach picks the nearest unused anchor in grab range, detach
//! launches along the clockwise tangent and burns the anchor.

use glam::Vec2;

use super::anchor::AnchorId;
use super::scoring::attach_points;
use super::state::{FeedbackTimers, FloatLabel, FloatingText, GameEvent, GameState};
use crate::{clockwise_tangent, on_circle};

/// Floating bonus text sits this far above the anchor's rim
const BONUS_TEXT_LIFT: f32 = 14.0;
/// Combo text sits this far above the player
const COMBO_TEXT_LIFT: f32 = 32.0;
const BONUS_TEXT_LIFE: f32 = 1.0;
const COMBO_TEXT_LIFE: f32 = 1.4;

/// Nearest unused anchor whose grab radius contains `point`
pub fn find_attach_target(state: &GameState, point: Vec2) -> Option<AnchorId> {
    state
        .anchors
        .iter()
        .filter(|a| !a.used)
        .filter_map(|a| a.grab_distance_sq(point).map(|d2| (a.id, d2)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(id, _)| id)
}

/// Attach to the nearest anchor in range; no-op if orbiting or none qualify
pub fn try_attach(state: &mut GameState) -> bool {
    if state.player.is_orbiting() {
        return false;
    }
    match find_attach_target(state, state.player.pos) {
        Some(id) => attach(state, id),
        None => false,
    }
}

/// Enter orbit around `id`
pub fn attach(state: &mut GameState, id: AnchorId) -> bool {
    let Some(anchor) = state.anchor(id).cloned() else {
        return false;
    };
    if anchor.used {
        return false;
    }

    let offset = state.player.pos - anchor.pos;
    let angle = offset.y.atan2(offset.x);
    state.player.orbit = Some(id);
    state.player.orbit_angle = angle;
    state.player.pos = on_circle(anchor.pos, state.tuning.orbit_radius, angle);

    let update = state.combo.register(&anchor, &state.tuning);
    if update.grew {
        state.timers.combo_pulse = FeedbackTimers::COMBO_PULSE;
        state.timers.player_burst = FeedbackTimers::PLAYER_BURST;
    }

    let bonus = attach_points(&anchor, update.streak);
    state.score += bonus;

    state.floating_texts.push(FloatingText {
        pos: anchor.pos - Vec2::new(0.0, anchor.radius + BONUS_TEXT_LIFT),
        label: FloatLabel::Bonus(bonus.round() as i64),
        tier: anchor.tier,
        life: BONUS_TEXT_LIFE,
        large: false,
    });
    if !anchor.tier.is_penalty() && update.streak >= 2 {
        state.floating_texts.push(FloatingText {
            pos: state.player.pos - Vec2::new(0.0, COMBO_TEXT_LIFT),
            label: FloatLabel::Combo(update.streak),
            tier: anchor.tier,
            life: COMBO_TEXT_LIFE,
            large: true,
        });
    }
    if anchor.tier.is_penalty() {
        state.timers.red_flash = FeedbackTimers::RED_FLASH;
    }

    state.onboarding.on_attach();
    state.push_event(GameEvent::Attached {
        tier: anchor.tier,
        bonus,
        combo: update.streak,
    });
    log::debug!(
        "attached {:?} #{} streak={} bonus={:.0}",
        anchor.tier,
        id.0,
        update.streak,
        bonus
    );
    true
}

/// Leave orbit: tangential launch, anchor becomes unattachable
pub fn detach(state: &mut GameState) -> bool {
    let Some(id) = state.player.orbit.take() else {
        return false;
    };

    let tangent = clockwise_tangent(state.player.orbit_angle);
    let launch_speed = state.tuning.orbit_speed() + state.tuning.surge_boost;
    let mut vel = Vec2::new(state.scroll_speed, 0.0) + tangent * launch_speed;
    // Never launch faster leftward (on screen) than the player can survive
    vel.x = vel.x.max(state.scroll_speed - state.tuning.max_backward_screen_v);
    state.player.vel = vel;
    state.player.has_detached = true;
    state.timers.detach_flash = FeedbackTimers::DETACH_FLASH;

    let tier = state.anchor_mut(id).map(|anchor| {
        anchor.used = true;
        anchor.tier
    });
    state.push_event(GameEvent::Detached { tier });
    log::debug!("detached from #{} vel=({:.0}, {:.0})", id.0, vel.x, vel.y);
    true
}
