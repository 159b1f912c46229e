//! WebAssembly bindings for the Hextrap engine.
//!
//! This module exposes the turn controller to JavaScript through wasm-bindgen.
//! The page owns the animation clock and reports elapsed time via `advance`.

use wasm_bindgen::prelude::*;

use crate::bot::{BotDifficulty, Trapper};
use crate::config::GameConfig;
use crate::controller::TurnController;
use crate::hex::HexCoordinate;
use std::time::Duration;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed game wrapper
#[wasm_bindgen]
pub struct WasmGame {
    controller: TurnController,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a game from a JSON config; an empty string uses the defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmGame, JsValue> {
        let config: GameConfig = if config_json.trim().is_empty() {
            GameConfig::default()
        } else {
            serde_json::from_str(config_json)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };

        let controller =
            TurnController::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmGame { controller })
    }

    /// Get the board snapshot as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(&self.controller.board().snapshot())
            .unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the controller phase as JSON
    #[wasm_bindgen(js_name = getPhase)]
    pub fn get_phase(&self) -> String {
        serde_json::to_string(&self.controller.phase()).unwrap_or_else(|_| "\"Unknown\"".to_string())
    }

    /// Whether a click would be accepted right now
    #[wasm_bindgen(js_name = isAcceptingInput)]
    pub fn is_accepting_input(&self) -> bool {
        self.controller.is_accepting_input()
    }

    /// Block a cell, returns events JSON or error
    #[wasm_bindgen(js_name = placeObstacle)]
    pub fn place_obstacle(&mut self, column: i32, row: i32) -> Result<String, JsValue> {
        match self.controller.place_obstacle(HexCoordinate::new(column, row)) {
            Ok(events) => Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())),
            Err(e) => Err(JsValue::from_str(&format!("Placement rejected: {}", e))),
        }
    }

    /// Start a new round, returns events JSON
    #[wasm_bindgen(js_name = reset)]
    pub fn reset(&mut self) -> String {
        let events = self.controller.reset();
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }

    /// Report elapsed animation time in milliseconds, returns events JSON
    #[wasm_bindgen(js_name = advance)]
    pub fn advance(&mut self, elapsed_ms: f64) -> String {
        let elapsed = Duration::from_millis(elapsed_ms.max(0.0) as u64);
        let events = self.controller.advance(elapsed);
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }

    /// Suggest a cell to block; `null` while input is closed.
    /// difficulty: "Easy", "Medium", or "Hard"
    #[wasm_bindgen(js_name = getHint)]
    pub fn get_hint(&self, difficulty: &str) -> String {
        if !self.controller.is_accepting_input() {
            return "null".to_string();
        }
        let mut bot = Trapper::new(BotDifficulty::from_name(difficulty));
        match bot.choose_cell(self.controller.board()) {
            Some(cell) => serde_json::to_string(&cell).unwrap_or_else(|_| "null".to_string()),
            None => "null".to_string(),
        }
    }

    /// Pixel center of a cell for a pointy-top hex of the given radius
    #[wasm_bindgen(js_name = cellCenter)]
    pub fn cell_center(column: i32, row: i32, hex_size: f64) -> Vec<f64> {
        let (x, y) = HexCoordinate::new(column, row).to_pixel(hex_size);
        vec![x, y]
    }
}
