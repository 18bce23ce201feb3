pub mod chat;
pub mod memory;
pub mod snake;
pub mod tictactoe;

use std::str::FromStr;

use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::Promise;

pub use memory::{MemoryEngine, MemoryError, MemoryEvent, MemoryState};
pub use snake::{Direction, SnakeEngine, SnakeEvent, SnakeState};
pub use tictactoe::{
    best_move, Board, BoardError, GameEvent, GameSession, Mark, MoveResolution, Outcome,
    SearchOutcome, SessionError, Status, Verdict,
};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
    web_sys::console::debug_1(&"arcade-core loaded".into());
}

fn to_js_error<E: Serialize>(error: E) -> JsValue {
    to_value(&error).unwrap_or_else(|serialize_err| JsValue::from_str(&serialize_err.to_string()))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

// ---------------------------------------------------------------------------
// Tic-tac-toe
// ---------------------------------------------------------------------------

/// Human-versus-computer tic-tac-toe session held on the Rust side; the UI
/// mirrors it from the JSON resolutions.
#[wasm_bindgen]
pub struct TicTacToeEngine {
    session: GameSession,
}

#[wasm_bindgen]
impl TicTacToeEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(initial_state_json: Option<String>) -> Result<TicTacToeEngine, JsValue> {
        let session = if let Some(json) = initial_state_json {
            serde_json::from_str(&json).map_err(serde_to_js_error)?
        } else {
            GameSession::new()
        };
        Ok(TicTacToeEngine { session })
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session).map_err(serde_to_js_error)
    }

    pub fn set_state_json(&mut self, json: &str) -> Result<(), JsValue> {
        let session: GameSession = serde_json::from_str(json).map_err(serde_to_js_error)?;
        session.board.validate().map_err(to_js_error)?;
        self.session = session;
        Ok(())
    }

    /// Apply the human's click at `index` and return the resolution JSON.
    pub fn human_move_json(&mut self, index: usize) -> Result<String, JsValue> {
        let events = self.session.human_move(index).map_err(to_js_error)?;
        self.resolution_json(events)
    }

    /// Run the perfect-play search, apply its move, return the resolution.
    pub fn computer_move_json(&mut self) -> Result<String, JsValue> {
        let events = self.session.computer_move().map_err(to_js_error)?;
        self.resolution_json(events)
    }

    /// Preview the computer's reply after an artificial thinking pause. The
    /// search itself completes instantly; the delay only paces the UI.
    pub fn think(&self, delay_ms: Option<u32>) -> Promise {
        let session = self.session.clone();
        let delay = delay_ms.unwrap_or(0);

        future_to_promise(async move {
            if delay > 0 {
                TimeoutFuture::new(delay).await;
            }
            let outcome = session.think().map_err(to_js_error)?;
            let json = serde_json::to_string(&outcome).map_err(serde_to_js_error)?;
            Ok(JsValue::from_str(&json))
        })
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    fn resolution_json(&self, events: Vec<GameEvent>) -> Result<String, JsValue> {
        let resolution = MoveResolution::new(self.session.clone(), events);
        serde_json::to_string(&resolution).map_err(serde_to_js_error)
    }
}

/// Classify an arbitrary board snapshot, reporting the winning line as well.
#[wasm_bindgen(js_name = "classifyBoard")]
pub fn classify_board(board: JsValue) -> Result<JsValue, JsValue> {
    let board: Board = from_value(board).map_err(JsValue::from)?;
    to_value(&board.verdict()).map_err(JsValue::from)
}

/// Compute the optimal move for `mark` on a board snapshot. The snapshot is
/// validated first; terminal boards yield an absent move rather than a guess.
#[wasm_bindgen(js_name = "bestMove")]
pub fn best_move_for(board: JsValue, mark: JsValue) -> Result<JsValue, JsValue> {
    let board: Board = from_value(board).map_err(JsValue::from)?;
    let mark: Mark = from_value(mark).map_err(JsValue::from)?;
    board.validate().map_err(to_js_error)?;
    to_value(&best_move(&board, mark)).map_err(JsValue::from)
}

// ---------------------------------------------------------------------------
// Snake
// ---------------------------------------------------------------------------

#[wasm_bindgen]
pub struct SnakeGame {
    engine: SnakeEngine,
}

#[wasm_bindgen]
impl SnakeGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u64>) -> SnakeGame {
        let engine = match seed {
            Some(seed) => SnakeEngine::with_seed(seed),
            None => SnakeEngine::new(),
        };
        SnakeGame { engine }
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.engine.state()).map_err(serde_to_js_error)
    }

    /// Advance one step and return the emitted events as JSON. The UI calls
    /// this from an interval timer set to `state.speed_ms`.
    pub fn tick_json(&mut self) -> Result<String, JsValue> {
        let events = self.engine.tick();
        serde_json::to_string(&events).map_err(serde_to_js_error)
    }

    /// Steer with a key name such as `"ArrowUp"` or `"left"`. Unknown names
    /// and reversals are ignored.
    pub fn set_direction(&mut self, direction: &str) {
        if let Ok(direction) = Direction::from_str(direction) {
            self.engine.set_direction(direction);
        }
    }

    pub fn toggle_pause(&mut self) {
        self.engine.toggle_pause();
    }

    pub fn reset(&mut self) {
        self.engine.reset();
    }
}

// ---------------------------------------------------------------------------
// Memory
// ---------------------------------------------------------------------------

#[wasm_bindgen]
pub struct MemoryGame {
    engine: MemoryEngine,
}

#[wasm_bindgen]
impl MemoryGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u64>) -> MemoryGame {
        let engine = match seed {
            Some(seed) => MemoryEngine::with_seed(seed),
            None => MemoryEngine::new(),
        };
        MemoryGame { engine }
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.engine.state()).map_err(serde_to_js_error)
    }

    pub fn start(&mut self) -> Result<String, JsValue> {
        self.engine.start();
        self.state_json()
    }

    /// Called by the UI when the reveal window elapses.
    pub fn conceal(&mut self) -> Result<String, JsValue> {
        self.engine.conceal();
        self.state_json()
    }

    pub fn flip_json(&mut self, index: usize) -> Result<String, JsValue> {
        let events = self.engine.flip(index).map_err(to_js_error)?;
        serde_json::to_string(&events).map_err(serde_to_js_error)
    }

    /// Called by the UI after its mismatch delay.
    pub fn flip_back(&mut self) -> Result<String, JsValue> {
        self.engine.flip_back();
        self.state_json()
    }

    pub fn next_level(&mut self) -> Result<String, JsValue> {
        self.engine.next_level();
        self.state_json()
    }

    pub fn restart(&mut self) -> Result<String, JsValue> {
        self.engine.restart();
        self.state_json()
    }
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// Scripted reply for a visitor message.
#[wasm_bindgen(js_name = "chatReply")]
pub fn chat_reply(message: &str) -> String {
    chat::reply(message).to_string()
}

/// Opening message of the chat widget.
#[wasm_bindgen(js_name = "chatGreeting")]
pub fn chat_greeting() -> String {
    chat::GREETING.to_string()
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}
