//! Browser bridge
//!
//! The JS side owns rendering, the HUD and input capture. It forwards key
//! state here, calls [`WebMatch::frame`] from `requestAnimationFrame`, and
//! reads snapshots and events back as JSON.

use wasm_bindgen::prelude::*;

use crate::consts::SIM_DT;
use crate::settings::MatchSettings;
use crate::sim::{
    BallChaser, ControlSource, FrameClock, HeldKeys, Key, TickInput, World, tick,
    trigger_demo_on,
};

/// One match driven by the browser
#[wasm_bindgen]
pub struct WebMatch {
    world: World,
    player: HeldKeys,
    /// One per car after the player's, in car order
    bots: Vec<BallChaser>,
    clock: FrameClock,
}

#[wasm_bindgen]
impl WebMatch {
    /// Build a match from settings JSON. An empty string uses the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str) -> Result<WebMatch, JsValue> {
        console_error_panic_hook::set_once();
        // Ignore the error when a second match re-initializes the logger
        let _ = console_log::init_with_level(log::Level::Info);

        let settings = MatchSettings::from_host(settings_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid settings: {}", e)))?;

        let world = World::new(settings);
        let bots = world
            .cars
            .iter()
            .filter(|c| !c.is_player)
            .map(|_| BallChaser::default())
            .collect();
        log::info!("Boost Ball ready ({} cars)", world.cars.len());

        Ok(WebMatch {
            world,
            player: HeldKeys::default(),
            bots,
            clock: FrameClock::default(),
        })
    }

    /// Reset score and clock, place everyone for kickoff and start the countdown
    pub fn start_match(&mut self) {
        self.player.release_all();
        self.clock = FrameClock::default();
        self.world.start_match();
    }

    /// Press or release a driving key by action name. Returns false for unknown names.
    pub fn set_key(&mut self, name: &str, down: bool) -> bool {
        match Key::from_str(name) {
            Some(key) => {
                self.player.set_key(key, down);
                true
            }
            None => false,
        }
    }

    /// Release every key (window blur)
    pub fn release_keys(&mut self) {
        self.player.release_all();
    }

    /// Advance by the host's frame time in seconds; returns the number of steps run
    pub fn frame(&mut self, dt: f32) -> u32 {
        let steps = self.clock.steps(dt);
        for _ in 0..steps {
            let input = self.gather_input();
            tick(&mut self.world, &input, SIM_DT);
        }
        steps
    }

    /// Demolish the player's car, or an opposing AI car
    pub fn trigger_demo(&mut self, is_player: bool) -> bool {
        trigger_demo_on(&mut self.world, is_player)
    }

    /// Current world state as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.world.snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Events since the last call, as a JSON array
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        let events = self.world.drain_events();
        serde_json::to_string(&events).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// `m:ss` clock for the HUD
    pub fn clock_display(&self) -> String {
        self.world.match_state.clock_display()
    }
}

impl WebMatch {
    fn gather_input(&mut self) -> TickInput {
        let mut bots = self.bots.iter_mut();
        let controls = self
            .world
            .cars
            .iter()
            .map(|car| {
                if car.is_player {
                    self.player.produce_intent(car, &self.world)
                } else {
                    bots.next()
                        .map(|bot| bot.produce_intent(car, &self.world))
                        .unwrap_or_default()
                }
            })
            .collect();
        TickInput { controls }
    }
}
