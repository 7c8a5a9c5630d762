//! Anchor tiers and anchor entities

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Anchor tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnchorTier {
    /// Small, fast, high reward
    Small,
    /// Medium, standard reward
    Medium,
    /// Large, slow, drains score while orbited
    Large,
}

/// Static per-tier constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierDef {
    pub radius: f32,
    pub grab_radius: f32,
    pub bonus_multiplier: f32,
    /// Instant score on attach (negative for the penalty tier)
    pub attach_bonus: f32,
    pub speed_factor_range: (f32, f32),
    /// 0xRRGGBB
    pub color: u32,
    pub label: &'static str,
}

const TIER_DEFS: [TierDef; 3] = [
    TierDef {
        radius: 9.0,
        grab_radius: 64.0,
        bonus_multiplier: 10.0,
        attach_bonus: 5000.0,
        speed_factor_range: (1.05, 1.15),
        color: 0x39ff6a,
        label: "GREEN",
    },
    TierDef {
        radius: 13.0,
        grab_radius: 88.0,
        bonus_multiplier: 3.0,
        attach_bonus: 2500.0,
        speed_factor_range: (0.95, 1.05),
        color: 0x00d4ff,
        label: "BLUE",
    },
    TierDef {
        radius: 19.0,
        grab_radius: 106.0,
        bonus_multiplier: 1.0,
        attach_bonus: -1000.0,
        speed_factor_range: (0.90, 1.00),
        color: 0xff1a4e,
        label: "RED",
    },
];

impl AnchorTier {
    pub const ALL: [AnchorTier; 3] = [AnchorTier::Small, AnchorTier::Medium, AnchorTier::Large];

    pub fn index(self) -> usize {
        match self {
            AnchorTier::Small => 0,
            AnchorTier::Medium => 1,
            AnchorTier::Large => 2,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    pub fn def(self) -> &'static TierDef {
        &TIER_DEFS[self.index()]
    }

    /// Penalty tier: flat negative attach bonus, score drain while orbiting
    pub fn is_penalty(self) -> bool {
        self == AnchorTier::Large
    }

    /// How renderers should draw this tier
    pub fn style(self) -> TierStyle {
        let def = self.def();
        TierStyle {
            tier: self,
            label: def.label,
            color: format!("#{:06x}", def.color),
            radius: def.radius,
            grab_radius: def.grab_radius,
        }
    }
}

/// Presentation data for one tier, serialized for the browser renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierStyle {
    pub tier: AnchorTier,
    pub label: &'static str,
    /// CSS hex color
    pub color: String,
    pub radius: f32,
    pub grab_radius: f32,
}

/// Stable handle to an anchor in `GameState::anchors`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorId(pub u32);

/// An anchor the player can latch onto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub id: AnchorId,
    pub tier: AnchorTier,
    /// World position
    pub pos: Vec2,
    pub radius: f32,
    pub grab_radius: f32,
    pub bonus_multiplier: f32,
    pub attach_bonus: f32,
    /// World-scroll multiplier sampled at creation
    pub speed_factor: f32,
    /// Set once detached from; never attachable again
    pub used: bool,
    /// Placed ignoring overlap after every spawn attempt collided
    #[serde(default)]
    pub fallback_placed: bool,
    /// Already targeted by the onboarding attach hint
    #[serde(default)]
    pub hinted: bool,
}

impl Anchor {
    pub fn new(id: AnchorId, tier: AnchorTier, pos: Vec2, speed_factor: f32) -> Self {
        let def = tier.def();
        Self {
            id,
            tier,
            pos,
            radius: def.radius,
            grab_radius: def.grab_radius,
            bonus_multiplier: def.bonus_multiplier,
            attach_bonus: def.attach_bonus,
            speed_factor,
            used: false,
            fallback_placed: false,
            hinted: false,
        }
    }

    /// Apply tier-relative drift for one tick
    pub fn drift(&mut self, scroll_speed: f32, dt: f32) {
        self.pos.x += (1.0 - self.speed_factor) * scroll_speed * dt;
    }

    /// Squared distance from `point` if it lies within grab range
    pub fn grab_distance_sq(&self, point: Vec2) -> Option<f32> {
        let d2 = self.pos.distance_squared(point);
        (d2 <= self.grab_radius * self.grab_radius).then_some(d2)
    }
}
