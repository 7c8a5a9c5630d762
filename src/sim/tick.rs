//! Per-frame simulation tick
//!
//! Core game loop that advances the run. Variable `dt`; every rate is
//! applied in continuous form so results do not depend on frame rate.

use super::crash::CrashState;
use super::orbit;
use super::scoring::{orbit_points, survival_points};
use super::spawner;
use super::state::{GameEvent, GamePhase, GameState, RunSummary};
use crate::highscores::HighScores;
use crate::{on_circle, relax_toward};

/// Input sampled for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// The single game action is held (space, primary button, touch)
    pub held: bool,
}

/// Advance the game state by `dt` seconds
///
/// The caller clamps `dt`; non-positive deltas are ignored.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if dt <= 0.0 {
        return;
    }

    match state.phase {
        GamePhase::Running => {
            state.run_time += dt;
            advance_run(state, input, dt);
        }
        GamePhase::Crashing => advance_crash(state, dt),
        GamePhase::Boot | GamePhase::GameOver => {}
    }
}

fn advance_run(state: &mut GameState, input: &TickInput, dt: f32) {
    let scroll = state.scroll_speed;

    // Survival reward accrues regardless of orbit state
    state.score += survival_points(scroll, dt);

    for anchor in &mut state.anchors {
        anchor.drift(scroll, dt);
    }

    if state.player.is_orbiting() {
        advance_orbit(state, input.held, dt);
    } else {
        advance_free_flight(state, input.held, dt);
    }

    state.camera_x += scroll * dt;
    state.scroll_speed = (scroll + state.tuning.scroll_accel * dt).min(state.tuning.scroll_speed_max);

    state.timers.tick(dt);
    state
        .onboarding
        .advance(input.held, &state.player, &mut state.anchors, dt);
    for text in &mut state.floating_texts {
        text.advance(dt);
    }
    state.floating_texts.retain(|t| t.life > 0.0);
    state.player.record_trail();

    if out_of_bounds(state) {
        die(state);
        return;
    }

    spawner::maintain_anchors(state);
}

fn advance_orbit(state: &mut GameState, held: bool, dt: f32) {
    let Some(anchor) = state.orbit_anchor() else {
        // Handle points at nothing; fall back to free flight
        state.player.orbit = None;
        return;
    };
    let center = anchor.pos;
    let points = orbit_points(
        anchor,
        state.scroll_speed,
        state.combo.multiplier,
        &state.tuning,
        dt,
    );

    // Position is slaved to the (drifting) anchor, never integrated
    state.player.orbit_angle += state.tuning.orbit_omega * dt;
    state.player.pos = on_circle(center, state.tuning.orbit_radius, state.player.orbit_angle);

    if !held {
        orbit::detach(state);
    }
    state.score += points;
}

fn advance_free_flight(state: &mut GameState, held: bool, dt: f32) {
    let player = &mut state.player;
    player.pos += player.vel * dt;

    if held {
        orbit::try_attach(state);
    }

    let tuning = &state.tuning;
    let player = &mut state.player;
    let drift_target = state.scroll_speed * (1.0 - tuning.drift_ratio);
    player.vel.x = relax_toward(player.vel.x, drift_target, tuning.vel_damping_x, dt);
    let gravity = if player.has_detached {
        tuning.gravity * dt
    } else {
        0.0
    };
    player.vel.y = relax_toward(player.vel.y, 0.0, tuning.vel_damping_y, dt) + gravity;
}

/// Left screen edge, or far above/below the viewport
fn out_of_bounds(state: &GameState) -> bool {
    let margin = state.tuning.vertical_death_margin;
    let y = state.player.pos.y;
    state.screen_x(state.player.pos.x) < 0.0 || y < -margin || y > state.viewport.height + margin
}

/// End the run and start the crash sequence
///
/// Only acts while running; repeated calls are ignored.
pub fn die(state: &mut GameState) {
    if state.phase != GamePhase::Running {
        return;
    }
    state.phase = GamePhase::Crashing;

    // Same resolution the leaderboard stores
    let new_best =
        HighScores::floor_score(state.score) > HighScores::floor_score(state.best_score);
    if new_best {
        state.best_score = state.score;
    }
    let summary = RunSummary {
        score: state.score,
        max_combo: state.combo.max_streak,
        best_bonus: state.combo.best_bonus,
        run_time: state.run_time,
        new_best,
    };
    log::info!(
        "Run over after {:.1}s: score={:.0} max_combo={} best_bonus=x{}{}",
        summary.run_time,
        summary.score,
        summary.max_combo,
        summary.best_bonus,
        if new_best { " (new best)" } else { "" }
    );

    state.crash = Some(CrashState::new(
        state.player.pos,
        &mut state.rng,
        &state.tuning,
    ));
    state.push_event(GameEvent::Died {
        final_score: summary.score,
        max_combo: summary.max_combo,
        best_bonus: summary.best_bonus,
        new_best,
    });
    state.summary = Some(summary);
}

fn advance_crash(state: &mut GameState, dt: f32) {
    let finished = match state.crash.as_mut() {
        Some(crash) => crash.advance(dt, &state.tuning),
        None => true,
    };
    if finished {
        state.crash = None;
        state.phase = GamePhase::GameOver;
        state.push_event(GameEvent::GameOver);
        log::info!("Game over");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::anchor::{Anchor, AnchorTier};
    use crate::sim::state::Viewport;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;
    const HOLD: TickInput = TickInput { held: true };
    const RELEASE: TickInput = TickInput { held: false };

    fn running(seed: u32) -> GameState {
        let mut state = GameState::new(Tuning::default(), Viewport::default());
        state.start_run(seed);
        state.drain_events();
        state
    }

    fn crash_now(state: &mut GameState) {
        state.player.vel = Vec2::ZERO;
        state.player.pos.x = state.camera_x - 0.001;
        tick(state, &RELEASE, DT);
        assert_eq!(state.phase, GamePhase::Crashing);
    }

    #[test]
    fn test_idle_phases_do_not_tick() {
        let mut state = GameState::new(Tuning::default(), Viewport::default());
        tick(&mut state, &HOLD, DT);
        assert_eq!(state.phase, GamePhase::Boot);
        assert_eq!(state.run_time, 0.0);
    }

    #[test]
    fn test_non_positive_dt_ignored() {
        let mut state = running(1);
        let before = state.score;
        tick(&mut state, &RELEASE, 0.0);
        tick(&mut state, &RELEASE, -0.1);
        assert_eq!(state.score, before);
        assert_eq!(state.run_time, 0.0);
    }

    #[test]
    fn test_score_grows_with_scroll_when_idle() {
        let mut state = running(2024);
        let mut elapsed = 0.0f64;
        let mut died = false;
        for _ in 0..(60 * 60) {
            let before = state.score;
            let speed = state.scroll_speed;
            tick(&mut state, &RELEASE, DT);
            assert!(state.score > before);
            assert!((state.score - before - speed as f64 * DT as f64).abs() < 1e-6);
            elapsed += DT as f64;
            if state.phase != GamePhase::Running {
                died = true;
                break;
            }
        }
        assert!(died, "drifting player should eventually hit the left edge");
        // Integral of 155 + 4t
        let expected = 155.0 * elapsed + 2.0 * elapsed * elapsed;
        assert!((state.score - expected).abs() < 2.0);
    }

    #[test]
    fn test_scroll_speed_accelerates_to_cap() {
        let mut state = running(3);
        tick(&mut state, &RELEASE, 0.05);
        assert!((state.scroll_speed - 155.2).abs() < 1e-4);
        state.scroll_speed = 479.99;
        state.player.pos.x = state.camera_x + 500.0;
        state.player.vel.x = 480.0;
        tick(&mut state, &RELEASE, 0.05);
        assert_eq!(state.scroll_speed, 480.0);
    }

    #[test]
    fn test_no_gravity_before_first_detach() {
        let mut state = running(4);
        for _ in 0..30 {
            tick(&mut state, &RELEASE, DT);
        }
        assert_eq!(state.player.vel.y, 0.0);
        assert_eq!(state.player.pos.y, 360.0);

        state.player.has_detached = true;
        tick(&mut state, &RELEASE, DT);
        assert!(state.player.vel.y > 0.0);
    }

    #[test]
    fn test_free_flight_relaxes_toward_drift() {
        let mut state = running(4);
        state.player.vel.x = 900.0;
        tick(&mut state, &RELEASE, DT);
        let target = 155.0 * 0.5;
        let expected = target + (900.0 - target) * (-0.75f32 * DT).exp();
        assert!((state.player.vel.x - expected).abs() < 1e-2);
    }

    #[test]
    fn test_guaranteed_first_attach() {
        let mut state = running(555);
        let start = state.player.pos;
        let starter = state
            .anchors
            .iter()
            .find(|a| a.pos == start + Vec2::new(230.0, 0.0))
            .map(|a| a.id)
            .unwrap();
        assert_eq!(state.anchor(starter).unwrap().tier, AnchorTier::Medium);
        assert_eq!(state.anchor(starter).unwrap().pos.y, start.y);

        for _ in 0..120 {
            tick(&mut state, &HOLD, DT);
            if state.player.is_orbiting() {
                break;
            }
        }
        assert_eq!(state.player.orbit, Some(starter));
        assert_eq!(state.combo.streak, 1);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::Attached { tier: AnchorTier::Medium, .. }))
        );
    }

    #[test]
    fn test_release_detaches_next_tick() {
        let mut state = running(8);
        let id = state.next_anchor_id();
        let center = state.player.pos + Vec2::new(10.0, 0.0);
        state.anchors.push(Anchor::new(id, AnchorTier::Medium, center, 1.0));
        tick(&mut state, &HOLD, DT);
        assert_eq!(state.player.orbit, Some(id));

        tick(&mut state, &HOLD, DT);
        assert!(state.player.is_orbiting());
        assert!((state.player.pos.distance(center) - 70.0).abs() < 1e-2);

        tick(&mut state, &RELEASE, DT);
        assert!(!state.player.is_orbiting());
        assert!(state.anchor(id).unwrap().used);

        // Holding again near a used anchor does nothing
        state.player.pos = center;
        tick(&mut state, &HOLD, DT);
        assert_ne!(state.player.orbit, Some(id));
    }

    #[test]
    fn test_orbit_angle_advances_clockwise() {
        let mut state = running(8);
        let id = state.next_anchor_id();
        let center = state.player.pos + Vec2::new(10.0, 0.0);
        state.anchors.push(Anchor::new(id, AnchorTier::Medium, center, 1.0));
        tick(&mut state, &HOLD, DT);
        let angle = state.player.orbit_angle;
        tick(&mut state, &HOLD, DT);
        assert!((state.player.orbit_angle - angle - 3.0 * DT).abs() < 1e-5);
    }

    #[test]
    fn test_penalty_orbit_drains_score() {
        let mut state = running(12);
        let id = state.next_anchor_id();
        let center = state.player.pos + Vec2::new(10.0, 0.0);
        state.anchors.push(Anchor::new(id, AnchorTier::Large, center, 1.0));
        tick(&mut state, &HOLD, DT);
        assert!(state.player.is_orbiting());

        let before = state.score;
        let speed = state.scroll_speed;
        tick(&mut state, &HOLD, DT);
        let expected = speed as f64 * DT as f64 - 200.0 * DT as f64;
        assert!((state.score - before - expected).abs() < 1e-6);
    }

    #[test]
    fn test_orbit_bonus_uses_combo_multiplier() {
        let mut state = running(12);
        let id = state.next_anchor_id();
        let center = state.player.pos + Vec2::new(10.0, 0.0);
        state.anchors.push(Anchor::new(id, AnchorTier::Small, center, 1.0));
        tick(&mut state, &HOLD, DT);
        state.combo.multiplier = 2.0;

        let before = state.score;
        let speed = state.scroll_speed as f64 * DT as f64;
        tick(&mut state, &HOLD, DT);
        let expected = speed + speed * 10.0 * 2.0;
        assert!((state.score - before - expected).abs() < 1e-6);
    }

    #[test]
    fn test_score_may_go_negative() {
        let mut state = running(12);
        let id = state.next_anchor_id();
        let center = state.player.pos + Vec2::new(10.0, 0.0);
        state.anchors.push(Anchor::new(id, AnchorTier::Large, center, 1.0));
        tick(&mut state, &HOLD, DT);
        assert!(state.score < 0.0);
    }

    #[test]
    fn test_left_edge_death() {
        let mut state = running(21);
        crash_now(&mut state);
        let summary = state.summary.clone().unwrap();
        assert_eq!(summary.score, state.score);
        assert!(summary.new_best);
        assert_eq!(state.particles().len(), crate::consts::PARTICLE_COUNT);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::Died { new_best: true, .. }))
        );
    }

    #[test]
    fn test_vertical_death() {
        let mut state = running(22);
        state.player.pos.y = state.viewport.height + 121.0;
        tick(&mut state, &RELEASE, DT);
        assert_eq!(state.phase, GamePhase::Crashing);

        let mut state = running(22);
        state.player.pos.y = -119.0;
        tick(&mut state, &RELEASE, DT);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_repeated_death_ignored() {
        let mut state = running(23);
        crash_now(&mut state);
        let crash = state.crash.clone();
        die(&mut state);
        assert_eq!(state.crash, crash);
        let deaths = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Died { .. }))
            .count();
        assert_eq!(deaths, 1);
    }

    #[test]
    fn test_crash_freezes_physics() {
        let mut state = running(24);
        crash_now(&mut state);
        let camera = state.camera_x;
        let score = state.score;
        let pos = state.player.pos;
        tick(&mut state, &HOLD, DT);
        assert_eq!(state.camera_x, camera);
        assert_eq!(state.score, score);
        assert_eq!(state.player.pos, pos);
        assert!(state.crash.as_ref().unwrap().elapsed > 0.0);
    }

    #[test]
    fn test_crash_ends_in_game_over() {
        let mut state = running(25);
        crash_now(&mut state);
        state.drain_events();

        let duration = state.tuning.crash_duration;
        let mut total = 0.0f32;
        while state.phase == GamePhase::Crashing {
            tick(&mut state, &RELEASE, DT);
            total += DT;
            assert!(total < duration + 1.0);
        }
        assert!(total >= duration - 1e-3);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.particles().is_empty());
        assert_eq!(state.drain_events(), vec![GameEvent::GameOver]);

        // Restart from game over
        assert!(state.start_run(26));
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.summary.is_some());
    }

    #[test]
    fn test_best_score_only_rises() {
        let mut state = running(30);
        state.best_score = 1_000_000.0;
        crash_now(&mut state);
        assert!(!state.summary.as_ref().unwrap().new_best);
        assert_eq!(state.best_score, 1_000_000.0);
    }

    #[test]
    fn test_fractional_gain_is_not_a_new_best() {
        let mut state = running(31);
        state.best_score = 12345.0;
        state.score = 12345.4;
        die(&mut state);
        assert!(!state.summary.as_ref().unwrap().new_best);
        assert_eq!(state.best_score, 12345.0);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::Died { new_best: false, .. }))
        );

        let mut state = running(31);
        state.best_score = 12345.0;
        state.score = 12346.2;
        die(&mut state);
        assert!(state.summary.as_ref().unwrap().new_best);
    }

    #[test]
    fn test_floating_texts_expire() {
        let mut state = running(31);
        let id = state.next_anchor_id();
        let center = state.player.pos + Vec2::new(10.0, 0.0);
        state.anchors.push(Anchor::new(id, AnchorTier::Small, center, 1.0));
        tick(&mut state, &HOLD, DT);
        assert_eq!(state.floating_texts.len(), 1);
        let y = state.floating_texts[0].pos.y;
        tick(&mut state, &HOLD, DT);
        assert!(state.floating_texts[0].pos.y < y);
        for _ in 0..40 {
            tick(&mut state, &HOLD, DT);
        }
        assert!(state.floating_texts.is_empty());
    }

    fn run_script(seed: u32, script: &[bool]) -> GameState {
        let mut state = running(seed);
        for &held in script {
            tick(&mut state, &TickInput { held }, DT);
        }
        state
    }

    proptest! {
        #[test]
        fn prop_same_seed_same_run(
            seed in any::<u32>(),
            script in proptest::collection::vec(any::<bool>(), 1..400),
        ) {
            let a = run_script(seed, &script);
            let b = run_script(seed, &script);
            prop_assert_eq!(
                serde_json::to_string(&a).unwrap(),
                serde_json::to_string(&b).unwrap()
            );
        }
    }
}
