//! Orbit Surge entry point
//!
//! Native builds play one headless game with the autopilot and log the
//! result. The browser build is driven from JavaScript via `orbit_surge::web`.
//!
//! Usage: `orbit-surge [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use orbit_surge::autopilot::Autopilot;
    use orbit_surge::consts::HEADLESS_DT;
    use orbit_surge::sim::{GameEvent, GamePhase};
    use orbit_surge::{Simulation, Tuning};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| match s.parse::<u32>() {
        Ok(seed) => Some(seed),
        Err(_) => {
            log::warn!("Ignoring non-numeric seed {:?}", s);
            None
        }
    });
    let tuning = match args.next() {
        Some(path) => load_tuning(&path),
        None => Tuning::default(),
    };

    log::info!("Orbit Surge (headless) starting...");
    let mut sim = Simulation::new(tuning);
    let pilot = Autopilot::default();
    sim.start_run(seed);

    // Ten minutes of game time at most
    let max_ticks = (600.0 / HEADLESS_DT) as u32;
    let mut attaches = 0u32;
    for _ in 0..max_ticks {
        sim.set_input_held(pilot.decide(sim.state()));
        sim.tick(HEADLESS_DT);
        for event in sim.drain_events() {
            match event {
                GameEvent::Attached { tier, bonus, combo } => {
                    attaches += 1;
                    log::debug!("attach {} +{:.0} (x{})", tier.def().label, bonus, combo);
                }
                GameEvent::Died { final_score, .. } => {
                    log::info!("Crashed with {:.0} points", final_score);
                }
                _ => {}
            }
        }
        if sim.phase() == GamePhase::GameOver {
            break;
        }
    }

    let state = sim.state();
    match &state.summary {
        Some(summary) => println!(
            "seed {}: score {:.0}, {:.1}s, {} attaches, max combo {}, best bonus x{}{}",
            state.seed,
            summary.score,
            summary.run_time,
            attaches,
            summary.max_combo,
            summary.best_bonus,
            if summary.new_best { " (new best)" } else { "" }
        ),
        None => println!(
            "seed {}: survived {:.1}s with {:.0} points",
            state.seed, state.run_time, state.score
        ),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> orbit_surge::Tuning {
    use orbit_surge::Tuning;

    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Cannot read tuning {}: {}; using defaults", path, e);
            return Tuning::default();
        }
    };
    match Tuning::from_json(&json) {
        Ok(tuning) => {
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        Err(e) => {
            log::warn!("{}; using defaults", e);
            Tuning::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_main, this is just to satisfy the compiler
}
