//! Memory core: timed pair-matching puzzle with three levels.

pub mod state;

pub use state::{
    pairs_for_level, MemoryEngine, MemoryError, MemoryEvent, MemoryState, Phase,
    INITIAL_REVEAL_MS, MAX_LEVEL, MIN_REVEAL_MS, REVEAL_STEP_MS, SYMBOLS,
};
