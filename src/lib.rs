//! WebAssembly tile-blast engine.
//!
//! Owns the board state machine of a tap-to-clear puzzle: flood-fill groups,
//! gravity collapse with refill, super tiles, bomb and teleport boosters, and
//! reshuffle recovery when the board deadlocks. Rendering stays in the host;
//! every accepted tap returns a batch of effects and the host reports back
//! once it has played them.
//!
//! Board snapshots handed to JS are flat and column-major:
//! `cells[col * rows + row]`, with -1 for an empty cell.

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod rng;
pub mod scoring;
pub mod types;

pub use board::Board;
pub use config::GameConfig;
pub use error::ConfigError;
pub use game::{BoosterKind, Effects, Game, InputMode, Outcome, OutcomeKind, Settle, TapResult};
pub use types::{Cell, CollapseMove, Tile, TileColor, TileKind};

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use wasm_bindgen::prelude::*;

    use crate::error::ConfigError;
    use crate::game::{BoosterKind, Game};
    use crate::types::Cell;
    use crate::GameConfig;

    fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()))
    }

    /// One game session, driven by the JS view.
    #[wasm_bindgen(js_name = "BlastGame")]
    pub struct WasmGame {
        inner: Game,
    }

    #[wasm_bindgen(js_class = "BlastGame")]
    impl WasmGame {
        /// Start a game. `config` may be `undefined` or a partial config object.
        #[wasm_bindgen(constructor)]
        pub fn new(config: JsValue) -> Result<WasmGame, JsError> {
            let config: GameConfig = if config.is_undefined() || config.is_null() {
                GameConfig::default()
            } else {
                serde_wasm_bindgen::from_value(config)
                    .map_err(|e| ConfigError::Decode(e.to_string()))?
            };
            Ok(WasmGame {
                inner: Game::new(config)?,
            })
        }

        pub fn rows(&self) -> usize {
            self.inner.board().rows()
        }

        pub fn cols(&self) -> usize {
            self.inner.board().cols()
        }

        /// Color code at `(row, col)`, or -1 when empty or out of range.
        pub fn color(&self, row: usize, col: usize) -> i8 {
            self.inner.board().get(row, col).map_or(-1, |t| t.color.code())
        }

        /// Tile at `(row, col)` as `{ color, kind }`, or `null`.
        pub fn tile(&self, row: usize, col: usize) -> Result<JsValue, JsError> {
            to_js(&self.inner.board().get(row, col))
        }

        /// Whole board as a column-major color array.
        pub fn snapshot(&self) -> js_sys::Int8Array {
            let cells = self.inner.board().snapshot();
            let arr = js_sys::Int8Array::new_with_length(cells.len() as u32);
            arr.copy_from(&cells);
            arr
        }

        pub fn tap(&mut self, row: usize, col: usize) -> Result<JsValue, JsError> {
            to_js(&self.inner.tap(Cell::new(row, col)))
        }

        /// `kind` is `"Bomb"` or `"Teleport"`. Returns whether the booster was armed.
        #[wasm_bindgen(js_name = "activateBooster")]
        pub fn activate_booster(&mut self, kind: JsValue) -> Result<bool, JsError> {
            let kind: BoosterKind =
                serde_wasm_bindgen::from_value(kind).map_err(|e| JsError::new(&e.to_string()))?;
            Ok(self.inner.activate_booster(kind))
        }

        /// Call exactly once after the last dispatched batch finished playing.
        pub fn complete(&mut self) -> Result<JsValue, JsError> {
            to_js(&self.inner.complete())
        }

        pub fn score(&self) -> u64 {
            self.inner.score()
        }

        #[wasm_bindgen(js_name = "movesLeft")]
        pub fn moves_left(&self) -> u32 {
            self.inner.moves_left()
        }

        #[wasm_bindgen(js_name = "boosterCount")]
        pub fn booster_count(&self, kind: JsValue) -> Result<u32, JsError> {
            let kind: BoosterKind =
                serde_wasm_bindgen::from_value(kind).map_err(|e| JsError::new(&e.to_string()))?;
            Ok(self.inner.booster_count(kind))
        }

        #[wasm_bindgen(js_name = "inputMode")]
        pub fn input_mode(&self) -> Result<JsValue, JsError> {
            to_js(&self.inner.input_mode())
        }

        #[wasm_bindgen(js_name = "isBusy")]
        pub fn is_busy(&self) -> bool {
            self.inner.is_busy()
        }

        /// `{ kind, label, score }` once the game is over, else `null`.
        pub fn outcome(&self) -> Result<JsValue, JsError> {
            to_js(&self.inner.outcome())
        }
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "WASM blast engine ready".to_string()
    }
}
