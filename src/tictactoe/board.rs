use std::fmt;

use serde::{Deserialize, Serialize};

/// The two symbols players place on the board. X is the human, O the computer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// One board cell: empty or holding a mark.
pub type Cell = Option<Mark>;

/// The 8 index triples that constitute a win, checked in this order:
/// 3 rows, 3 columns, 2 diagonals.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Terminal or non-terminal classification of a board.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Outcome {
    InProgress,
    Won { mark: Mark },
    Draw,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

/// Classification plus the satisfied line, for the UI to highlight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Verdict {
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<[usize; 3]>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum BoardError {
    IndexOutOfRange { index: usize },
    CellOccupied { index: usize },
    MarkCountImbalance { x_count: usize, o_count: usize },
    ConflictingWinners,
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::IndexOutOfRange { index } => {
                write!(f, "cell index {index} is out of range 0-8")
            }
            BoardError::CellOccupied { index } => write!(f, "cell {index} is already occupied"),
            BoardError::MarkCountImbalance { x_count, o_count } => {
                write!(f, "mark counts X={x_count}, O={o_count} are unreachable by alternating play")
            }
            BoardError::ConflictingWinners => {
                write!(f, "both marks hold completed lines")
            }
        }
    }
}

/// A 3×3 board, row-major: index = row × 3 + col. Only 9 bytes, so `Copy`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Board {
    pub cells: [Cell; 9],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Cell {
        self.cells[index]
    }

    pub fn is_empty(&self, index: usize) -> bool {
        self.cells[index].is_none()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// Empty cell indices in ascending order.
    pub fn empty_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|cell| **cell == Some(mark)).count()
    }

    /// Occupy an empty cell with a mark.
    pub fn place(&mut self, index: usize, mark: Mark) -> Result<(), BoardError> {
        if index >= 9 {
            return Err(BoardError::IndexOutOfRange { index });
        }
        if self.cells[index].is_some() {
            return Err(BoardError::CellOccupied { index });
        }
        self.cells[index] = Some(mark);
        Ok(())
    }

    /// Return a cell to empty. Used by the search to undo candidate moves.
    pub fn clear(&mut self, index: usize) {
        self.cells[index] = None;
    }

    /// Classify the board: first satisfied line in the fixed enumeration
    /// order wins, then full board means draw, otherwise in progress.
    pub fn classify(&self) -> Outcome {
        self.verdict().outcome
    }

    /// Like [`classify`](Self::classify), also reporting the winning line.
    pub fn verdict(&self) -> Verdict {
        for line in LINES {
            let [a, b, c] = line;
            if let Some(mark) = self.cells[a] {
                if self.cells[b] == Some(mark) && self.cells[c] == Some(mark) {
                    return Verdict {
                        outcome: Outcome::Won { mark },
                        line: Some(line),
                    };
                }
            }
        }
        if self.is_full() {
            Verdict {
                outcome: Outcome::Draw,
                line: None,
            }
        } else {
            Verdict {
                outcome: Outcome::InProgress,
                line: None,
            }
        }
    }

    /// Reject boards unreachable by alternating legal play. Boards built
    /// through [`GameSession`](super::GameSession) are valid by construction;
    /// this guards snapshots arriving from the JS side.
    pub fn validate(&self) -> Result<(), BoardError> {
        let x_count = self.count(Mark::X);
        let o_count = self.count(Mark::O);
        if x_count.abs_diff(o_count) > 1 {
            return Err(BoardError::MarkCountImbalance { x_count, o_count });
        }

        let x_wins = self.mark_has_line(Mark::X);
        let o_wins = self.mark_has_line(Mark::O);
        if x_wins && o_wins {
            return Err(BoardError::ConflictingWinners);
        }
        Ok(())
    }

    fn mark_has_line(&self, mark: Mark) -> bool {
        LINES
            .iter()
            .any(|&[a, b, c]| [a, b, c].iter().all(|&i| self.cells[i] == Some(mark)))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                let glyph = match self.cells[row * 3 + col] {
                    Some(Mark::X) => 'X',
                    Some(Mark::O) => 'O',
                    None => '.',
                };
                write!(f, "{glyph}")?;
            }
            if row < 2 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn board_from(pattern: &str) -> Board {
    let mut board = Board::new();
    for (index, ch) in pattern.chars().filter(|c| !c.is_whitespace()).enumerate() {
        board.cells[index] = match ch {
            'X' | 'x' => Some(Mark::X),
            'O' | 'o' => Some(Mark::O),
            _ => None,
        };
    }
    board
}
