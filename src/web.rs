//! Browser surface
//!
//! The hosting page owns the canvas, input and animation. It feeds frame
//! deltas and shot commands into a `WebSession` and gets back JSON events to
//! animate (with the timings from `presentation_json`).

use wasm_bindgen::prelude::*;

use crate::consts::*;
use crate::sim::{GameEvent, GameState, TickInput, tick};
use crate::{HighScores, Palette, Settings, aim_angle};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    log::info!("Bubble Shooter starting...");
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// One play session driven by the page's animation loop
#[wasm_bindgen]
pub struct WebSession {
    state: GameState,
    settings: Settings,
    palette: Palette,
    scores: HighScores,
    accumulator: f32,
    input: TickInput,
    recorded: bool,
}

#[wasm_bindgen]
impl WebSession {
    /// New session; seeds from the clock when `seed` is omitted
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<f64>) -> WebSession {
        let seed = seed.unwrap_or_else(js_sys::Date::now) as u64;
        let settings = Settings::load();
        let palette = Palette::default();
        let state = GameState::with_settings(seed, &settings, palette.len());
        log::info!("Session initialized with seed: {}", seed);
        Self {
            state,
            settings,
            palette,
            scores: HighScores::load(),
            accumulator: 0.0,
            input: TickInput::default(),
            recorded: false,
        }
    }

    /// Queue a shot at `angle` (radians, canvas space)
    pub fn shoot(&mut self, angle: f32) {
        self.input.shoot = Some(angle);
    }

    /// Queue a shot toward a canvas point
    pub fn shoot_at(&mut self, x: f32, y: f32) {
        let angle = aim_angle(self.state.geometry.shooter, glam::Vec2::new(x, y));
        self.shoot(angle);
    }

    pub fn toggle_pause(&mut self) {
        self.input.pause = true;
    }

    /// Run the simulation for `dt` seconds of wall time
    ///
    /// Returns the events produced, as a JSON array.
    pub fn tick(&mut self, dt: f32) -> Result<String, JsValue> {
        let mut events: Vec<GameEvent> = Vec::new();
        self.accumulator += dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = std::mem::take(&mut self.input);
            tick(&mut self.state, &input, SIM_DT, &mut events);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        if self.state.is_finished() && !self.recorded {
            self.recorded = true;
            if let Some(rank) = self.scores.add_score(&self.state.stats(), js_sys::Date::now()) {
                log::info!("New high score, rank {}", rank);
                self.scores.save();
            }
        }

        to_js(&events)
    }

    /// Settled bubbles, in grid order
    pub fn bubbles_json(&self) -> Result<String, JsValue> {
        to_js(&self.state.grid)
    }

    /// Loaded bubble, preview and projectile
    pub fn queue_json(&self) -> Result<String, JsValue> {
        to_js(&(&self.state.current, &self.state.next, &self.state.projectile))
    }

    pub fn stats_json(&self) -> Result<String, JsValue> {
        to_js(&self.state.stats())
    }

    pub fn palette_json(&self) -> Result<String, JsValue> {
        to_js(&self.palette)
    }

    pub fn presentation_json(&self) -> Result<String, JsValue> {
        to_js(&self.settings.presentation)
    }

    pub fn settings_json(&self) -> Result<String, JsValue> {
        to_js(&self.settings)
    }

    /// Validate and persist new settings; they apply from the next session
    pub fn save_settings(&mut self, json: &str) -> Result<(), JsValue> {
        let settings = Settings::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        settings.save();
        self.settings = settings;
        Ok(())
    }

    pub fn highscores_json(&self) -> Result<String, JsValue> {
        to_js(&self.scores)
    }

    pub fn time_remaining_secs(&self) -> u32 {
        self.state.time_remaining_secs()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }
}
