//! Tic-tac-toe core: board model, perfect-play search, and the
//! single-game state machine driven by the UI.

pub mod board;
pub mod search;
pub mod session;

pub use board::{Board, BoardError, Cell, Mark, Outcome, Verdict, LINES};
pub use search::{best_move, SearchOutcome};
pub use session::{GameEvent, GameSession, MoveResolution, SessionError, Status};
