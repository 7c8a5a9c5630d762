//! First-seconds guidance state
//!
//! Pure timers and alphas for the renderer. Nothing here feeds back into
//! physics or scoring.

use serde::{Deserialize, Serialize};

use super::anchor::{Anchor, AnchorId};
use super::state::Player;

/// Onboarding ends after this many attaches...
const ONBOARDING_ATTACHES: u32 = 3;
/// ...or after this long
const ONBOARDING_TIMEOUT: f32 = 10.0;

const YOU_DISPLAY: f32 = 2.5;
const YOU_FADE: f32 = 0.5;

const HINT_MAX_ANCHORS: u32 = 3;
const HINT_MAX_TIME: f32 = 1.5;
const HINT_FADE_IN: f32 = 6.0;
const HINT_FADE_OUT: f32 = 5.0;
const HINT_FADE_OUT_ORBITING: f32 = 8.0;

const IN_GAME_HINT_SHOW: f32 = 2.5;
const IN_GAME_HINT_FADE: f32 = 0.4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Onboarding {
    pub active: bool,
    pub attach_count: u32,
    pub timer: f32,

    /// "YOU" marker over the player
    pub you_alpha: f32,
    pub you_timer: f32,
    pub you_dismissed: bool,
    /// Input was released at least once since the run started
    pub you_input_ready: bool,

    /// Anchor currently showing the attach hint
    pub hint_anchor: Option<AnchorId>,
    pub hint_timer: f32,
    pub hint_alpha: f32,
    pub hint_count: u32,

    pub in_game_hint_timer: f32,
    pub in_game_hint_alpha: f32,
}

impl Default for Onboarding {
    fn default() -> Self {
        Self {
            active: true,
            attach_count: 0,
            timer: 0.0,
            you_alpha: 1.0,
            you_timer: 0.0,
            you_dismissed: false,
            you_input_ready: false,
            hint_anchor: None,
            hint_timer: 0.0,
            hint_alpha: 0.0,
            hint_count: 0,
            in_game_hint_timer: 0.0,
            in_game_hint_alpha: 1.0,
        }
    }
}

impl Onboarding {
    /// Count an attach and dismiss the current hint
    pub fn on_attach(&mut self) {
        if self.active {
            self.attach_count += 1;
        }
        self.hint_anchor = None;
        self.hint_alpha = 0.0;
    }

    pub fn advance(&mut self, held: bool, player: &Player, anchors: &mut [Anchor], dt: f32) {
        if self.in_game_hint_timer <= IN_GAME_HINT_SHOW + IN_GAME_HINT_FADE {
            self.in_game_hint_timer += dt;
            self.in_game_hint_alpha = if self.in_game_hint_timer < IN_GAME_HINT_SHOW {
                1.0
            } else {
                (1.0 - (self.in_game_hint_timer - IN_GAME_HINT_SHOW) / IN_GAME_HINT_FADE).max(0.0)
            };
        }

        // The press that started the run does not dismiss the marker
        if !self.you_input_ready && !held {
            self.you_input_ready = true;
        }
        if self.you_alpha > 0.0 {
            self.you_timer += dt;
            if self.you_input_ready && !self.you_dismissed && held {
                self.you_dismissed = true;
            }
            if self.you_dismissed || self.you_timer >= YOU_DISPLAY {
                self.you_alpha = (self.you_alpha - dt / YOU_FADE).max(0.0);
            }
        }

        if self.active {
            self.timer += dt;
            if self.attach_count >= ONBOARDING_ATTACHES || self.timer >= ONBOARDING_TIMEOUT {
                self.active = false;
            }
        }

        if player.is_orbiting() {
            if self.hint_alpha > 0.0 {
                self.hint_alpha = (self.hint_alpha - dt * HINT_FADE_OUT_ORBITING).max(0.0);
            }
            if self.hint_alpha <= 0.0 {
                self.hint_anchor = None;
            }
            return;
        }

        if let Some(id) = self.hint_anchor {
            self.hint_timer += dt;
            let showing = anchors
                .iter()
                .find(|a| a.id == id)
                .is_some_and(|a| !a.used && a.grab_distance_sq(player.pos).is_some());
            if !showing || self.hint_timer >= HINT_MAX_TIME {
                self.hint_alpha = (self.hint_alpha - dt * HINT_FADE_OUT).max(0.0);
                if self.hint_alpha <= 0.0 {
                    self.hint_anchor = None;
                }
            } else {
                self.hint_alpha = (self.hint_alpha + dt * HINT_FADE_IN).min(1.0);
            }
        }

        if self.hint_anchor.is_none() && self.active && self.hint_count < HINT_MAX_ANCHORS {
            let candidate = anchors
                .iter_mut()
                .find(|a| !a.used && !a.hinted && a.grab_distance_sq(player.pos).is_some());
            if let Some(anchor) = candidate {
                anchor.hinted = true;
                self.hint_anchor = Some(anchor.id);
                self.hint_timer = 0.0;
                self.hint_alpha = 0.0;
                self.hint_count += 1;
            }
        }
    }
}
