//! Boost Ball entry point
//!
//! In the browser the library's `WebMatch` is driven from JS, so the binary
//! does nothing there. Natively it plays a headless match between AI cars
//! and logs how it went.
//!
//! Usage: `boost-ball [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match std::env::args().nth(1) {
        Some(path) => match load_settings(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Could not read settings from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => boost_ball::MatchSettings {
            match_duration_secs: Some(60.0),
            seed: 42,
            ..Default::default()
        },
    };

    headless::run(settings);
}

#[cfg(not(target_arch = "wasm32"))]
fn load_settings(path: &str) -> Result<boost_ball::MatchSettings, String> {
    let json = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    boost_ball::MatchSettings::from_json(&json).map_err(|e| e.to_string())
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use boost_ball::MatchSettings;
    use boost_ball::consts::SIM_DT;
    use boost_ball::sim::{BallChaser, ControlSource, GameEvent, GamePhase, TickInput, World, tick};

    /// Stop an unlimited match after this much simulated time
    const MAX_SIM_SECS: f32 = 600.0;

    pub fn run(settings: MatchSettings) {
        let mut world = World::new(settings);
        let mut drivers: Vec<Box<dyn ControlSource>> = world
            .cars
            .iter()
            .map(|_| Box::new(BallChaser::default()) as Box<dyn ControlSource>)
            .collect();

        world.start_match();
        let max_frames = (MAX_SIM_SECS / SIM_DT) as u64;
        let (mut touches, mut demos, mut pads) = (0u32, 0u32, 0u32);

        while world.match_state.phase != GamePhase::GameOver && world.time_ticks < max_frames {
            let input = TickInput::from_sources(&world, &mut drivers);
            tick(&mut world, &input, SIM_DT);

            for event in world.drain_events() {
                match event {
                    GameEvent::BallTouched { .. } => touches += 1,
                    GameEvent::CarDemolished { .. } => demos += 1,
                    GameEvent::PadCollected { .. } => pads += 1,
                    GameEvent::GoalScored { scorer, score } => log::info!(
                        "[{}] {:?} scores, {}-{}",
                        world.match_state.clock_display(),
                        scorer,
                        score.orange,
                        score.blue
                    ),
                    _ => {}
                }
            }
        }

        let score = world.match_state.score;
        log::info!(
            "Final: {} {}-{} after {:.1}s ({} touches, {} demolitions, {} pads)",
            world.match_state.outcome().label(),
            score.orange,
            score.blue,
            world.time_ticks as f32 * SIM_DT,
            touches,
            demos,
            pads
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is WebMatch, this is just to satisfy the compiler
}
