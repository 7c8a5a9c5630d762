//! Browser bindings
//!
//! A JavaScript renderer owns the canvas, audio and input listeners and
//! drives the simulation through `WebSimulation`. Structured data crosses
//! the boundary as JSON.

use wasm_bindgen::prelude::*;

use crate::session::{RenderHints, Simulation};
use crate::sim::GamePhase;
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        return;
    }
    log::info!("Orbit Surge core loaded");
}

#[wasm_bindgen]
pub struct WebSimulation {
    sim: Simulation,
}

#[wasm_bindgen]
impl WebSimulation {
    /// Create a simulation, optionally with a JSON tuning override
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: Option<String>) -> WebSimulation {
        let tuning = match tuning_json.as_deref().map(Tuning::from_json) {
            Some(Ok(tuning)) => tuning,
            Some(Err(e)) => {
                log::warn!("{}; using defaults", e);
                Tuning::default()
            }
            None => Tuning::default(),
        };
        WebSimulation {
            sim: Simulation::new(tuning),
        }
    }

    pub fn start_run(&mut self, seed: Option<u32>) -> bool {
        self.sim.start_run(seed)
    }

    pub fn press(&mut self) {
        self.sim.press();
    }

    pub fn release(&mut self) {
        self.sim.release();
    }

    pub fn set_input_held(&mut self, held: bool) {
        self.sim.set_input_held(held);
    }

    pub fn return_to_menu(&mut self) {
        self.sim.return_to_menu();
    }

    /// Advance by `dt` seconds (clamped)
    pub fn tick(&mut self, dt: f32) {
        self.sim.tick(dt);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.sim.resize(width, height);
    }

    /// "boot" | "running" | "crashing" | "gameover"
    pub fn phase(&self) -> String {
        match self.sim.phase() {
            GamePhase::Boot => "boot",
            GamePhase::Running => "running",
            GamePhase::Crashing => "crashing",
            GamePhase::GameOver => "gameover",
        }
        .to_string()
    }

    pub fn score(&self) -> f64 {
        self.sim.state().score
    }

    pub fn best_score(&self) -> f64 {
        self.sim.state().best_score
    }

    pub fn camera_x(&self) -> f32 {
        self.sim.state().camera_x
    }

    /// Full state as JSON for the renderer
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(self.sim.state()).unwrap_or_else(|e| {
            log::warn!("Snapshot serialization failed: {}", e);
            String::from("null")
        })
    }

    /// Events since the last call, as a JSON array
    pub fn drain_events_json(&mut self) -> String {
        let events = self.sim.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|_| String::from("[]"))
    }

    /// Player radius, trail length and tier colors as JSON
    pub fn render_hints_json(&self) -> String {
        serde_json::to_string(&RenderHints::new()).unwrap_or_else(|_| String::from("{}"))
    }

    /// Leaderboard as JSON
    pub fn high_scores_json(&self) -> String {
        serde_json::to_string(self.sim.high_scores()).unwrap_or_else(|_| String::from("{}"))
    }
}
