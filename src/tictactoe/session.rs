use serde::{Deserialize, Serialize};

use super::board::{Board, BoardError, Mark, Outcome};
use super::search::{best_move, SearchOutcome};

/// Whose action the session is waiting for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Status {
    AwaitingHuman,
    AwaitingComputer,
    Finished { outcome: Outcome },
}

/// Events emitted while applying a move, mirrored to the UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameEvent {
    MarkPlaced {
        mark: Mark,
        index: usize,
    },
    GameEnded {
        outcome: Outcome,
        #[serde(skip_serializing_if = "Option::is_none")]
        line: Option<[usize; 3]>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum SessionError {
    GameFinished,
    NotHumanTurn,
    NotComputerTurn,
    InvalidCell { error: BoardError },
}

/// State carried across a move: the updated session plus what happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveResolution {
    pub session: GameSession,
    pub events: Vec<GameEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl MoveResolution {
    pub fn new(session: GameSession, events: Vec<GameEvent>) -> Self {
        let outcome = match session.status {
            Status::Finished { outcome } => Some(outcome),
            _ => None,
        };
        Self {
            session,
            events,
            outcome,
        }
    }
}

/// A single human-versus-computer game. The human plays X and always moves
/// first; the computer replies with the perfect-play search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSession {
    pub board: Board,
    pub status: Status,
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            status: Status::AwaitingHuman,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, Status::Finished { .. })
    }

    /// Apply the human's move at a chosen empty cell.
    pub fn human_move(&mut self, index: usize) -> Result<Vec<GameEvent>, SessionError> {
        match self.status {
            Status::AwaitingHuman => {}
            Status::AwaitingComputer => return Err(SessionError::NotHumanTurn),
            Status::Finished { .. } => return Err(SessionError::GameFinished),
        }

        self.board
            .place(index, Mark::X)
            .map_err(|error| SessionError::InvalidCell { error })?;
        Ok(self.after_move(Mark::X, index, Status::AwaitingComputer))
    }

    /// Run the search and apply the returned move for the computer.
    pub fn computer_move(&mut self) -> Result<Vec<GameEvent>, SessionError> {
        match self.status {
            Status::AwaitingComputer => {}
            Status::AwaitingHuman => return Err(SessionError::NotComputerTurn),
            Status::Finished { .. } => return Err(SessionError::GameFinished),
        }

        let SearchOutcome { best_move: chosen, .. } = best_move(&self.board, Mark::O);
        // A non-terminal board always has a candidate; the status checks above
        // keep terminal boards out of this branch.
        let index = chosen.ok_or(SessionError::GameFinished)?;
        self.board
            .place(index, Mark::O)
            .map_err(|error| SessionError::InvalidCell { error })?;
        Ok(self.after_move(Mark::O, index, Status::AwaitingHuman))
    }

    /// Preview the computer's reply without applying it.
    pub fn think(&self) -> Result<SearchOutcome, SessionError> {
        match self.status {
            Status::AwaitingComputer => Ok(best_move(&self.board, Mark::O)),
            Status::AwaitingHuman => Err(SessionError::NotComputerTurn),
            Status::Finished { .. } => Err(SessionError::GameFinished),
        }
    }

    /// Discard the current game and start over with an empty board.
    pub fn reset(&mut self) {
        *self = GameSession::new();
    }

    fn after_move(&mut self, mark: Mark, index: usize, next: Status) -> Vec<GameEvent> {
        let mut events = vec![GameEvent::MarkPlaced { mark, index }];
        let verdict = self.board.verdict();
        if verdict.outcome.is_terminal() {
            self.status = Status::Finished {
                outcome: verdict.outcome,
            };
            events.push(GameEvent::GameEnded {
                outcome: verdict.outcome,
                line: verdict.line,
            });
        } else {
            self.status = next;
        }
        events
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
