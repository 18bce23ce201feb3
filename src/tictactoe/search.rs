use serde::{Deserialize, Serialize};

use super::board::{Board, Mark, Outcome};

/// Result of a perfect-play search: the chosen cell (absent when the root is
/// already terminal), the minimax score from the computer's perspective, and
/// the number of positions visited.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_move: Option<usize>,
    pub score: i32,
    pub nodes: u64,
}

/// Compute the game-theoretically optimal move for `to_move` by exhaustive
/// minimax. The computer (O) maximizes, the human (X) minimizes. Terminal
/// scores are biased by depth so the engine prefers the fastest win and the
/// slowest loss among equally optimal lines.
///
/// The full 3×3 tree is at most 9! leaf paths, so no pruning or memoization
/// is used; a call completes in well under a frame.
pub fn best_move(board: &Board, to_move: Mark) -> SearchOutcome {
    let mut scratch = *board;
    let mut nodes = 0;
    let (chosen, score) = minimax(&mut scratch, to_move, 0, &mut nodes);
    debug_assert_eq!(scratch, *board, "search must restore the board exactly");
    SearchOutcome {
        best_move: chosen,
        score,
        nodes,
    }
}

fn terminal_score(outcome: Outcome, depth: i32) -> Option<i32> {
    match outcome {
        Outcome::Won { mark: Mark::X } => Some(-10 + depth),
        Outcome::Won { mark: Mark::O } => Some(10 - depth),
        Outcome::Draw => Some(0),
        Outcome::InProgress => None,
    }
}

fn minimax(board: &mut Board, to_move: Mark, depth: i32, nodes: &mut u64) -> (Option<usize>, i32) {
    *nodes += 1;

    if let Some(score) = terminal_score(board.classify(), depth) {
        return (None, score);
    }

    let maximizing = to_move == Mark::O;
    let mut best: Option<usize> = None;
    let mut best_score = if maximizing { i32::MIN } else { i32::MAX };

    // Candidates in ascending index order; strict comparison keeps the first
    // move encountered on ties, breaking ties toward the lowest index.
    for index in 0..9 {
        if !board.is_empty(index) {
            continue;
        }

        board.cells[index] = Some(to_move);
        let (_, score) = minimax(board, to_move.opponent(), depth + 1, nodes);
        board.clear(index);

        let improved = if maximizing {
            score > best_score
        } else {
            score < best_score
        };
        if improved {
            best_score = score;
            best = Some(index);
        }
    }

    (best, best_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::board::board_from;

    fn optimal_playout(mut board: Board, mut to_move: Mark) -> Outcome {
        loop {
            let outcome = board.classify();
            if outcome.is_terminal() {
                return outcome;
            }
            let result = best_move(&board, to_move);
            board
                .place(result.best_move.expect("non-terminal board"), to_move)
                .unwrap();
            to_move = to_move.opponent();
        }
    }

    #[test]
    fn perfect_play_from_empty_board_is_a_draw() {
        assert_eq!(optimal_playout(Board::new(), Mark::X), Outcome::Draw);
        assert_eq!(optimal_playout(Board::new(), Mark::O), Outcome::Draw);
    }

    #[test]
    fn perfect_play_draws_from_every_opening() {
        for opening in 0..9 {
            let mut board = Board::new();
            board.place(opening, Mark::X).unwrap();
            assert_eq!(optimal_playout(board, Mark::O), Outcome::Draw);
        }
    }

    #[test]
    fn opening_move_follows_ascending_tie_break() {
        // Every opening scores 0 under perfect play, so the first candidate
        // in ascending order wins the tie: corner index 0.
        let result = best_move(&Board::new(), Mark::O);
        assert_eq!(result.best_move, Some(0));
        assert_eq!(result.score, 0);
    }

    #[test]
    fn takes_the_immediate_winning_move() {
        // X at 0,1; O at 3,4; O to move completes {3,4,5}.
        let board = board_from("XX. OO. ...");
        let result = best_move(&board, Mark::O);
        assert_eq!(result.best_move, Some(5));
        assert!(result.score > 0);
    }

    #[test]
    fn prefers_winning_over_blocking() {
        // Both sides threaten; O must win at 5 rather than block at 2.
        let board = board_from("XX. OO. X..");
        let result = best_move(&board, Mark::O);
        assert_eq!(result.best_move, Some(5));
    }

    #[test]
    fn blocks_the_human_diagonal_threat() {
        // X holds 4 and 8, threatening {0,4,8}; O must take index 0.
        let board = board_from(".O. .X. ..X");
        let result = best_move(&board, Mark::O);
        assert_eq!(result.best_move, Some(0));
    }

    #[test]
    fn blocks_when_no_win_is_available() {
        // X holds 0 and 1; O must take 2 on the following ply.
        let board = board_from("XXO O.. ..X");
        let after = {
            let mut after = board;
            let result = best_move(&board, Mark::O);
            after.place(result.best_move.unwrap(), Mark::O).unwrap();
            after
        };
        // No immediate X win may remain.
        for index in after.empty_cells() {
            let mut probe = after;
            probe.place(index, Mark::X).unwrap();
            assert_ne!(probe.classify(), Outcome::Won { mark: Mark::X });
        }
    }

    #[test]
    fn depth_bias_prefers_the_fastest_win() {
        // O can win immediately at 2 or steer toward later wins; the
        // immediate win scores higher because of the depth penalty.
        let board = board_from("OO. XX. ...");
        let result = best_move(&board, Mark::O);
        assert_eq!(result.best_move, Some(2));
        assert_eq!(result.score, 10 - 1);
    }

    #[test]
    fn minimizing_side_picks_the_human_optimum() {
        // X to move can win immediately at 2; the minimizer takes it.
        let board = board_from("XX. OO. ...");
        let result = best_move(&board, Mark::X);
        assert_eq!(result.best_move, Some(2));
        assert!(result.score < 0);
    }

    #[test]
    fn terminal_root_yields_no_move() {
        let board = board_from("XXX OO. ...");
        let result = best_move(&board, Mark::O);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, -10);
        assert_eq!(result.nodes, 1);

        let draw = board_from("XOX XXO OXO");
        let result = best_move(&draw, Mark::X);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn search_leaves_the_input_board_untouched() {
        let board = board_from("X.. .O. ..X");
        let snapshot = board;
        let _ = best_move(&board, Mark::O);
        assert_eq!(board, snapshot);
    }

    #[test]
    fn empty_board_search_visits_the_full_tree() {
        let result = best_move(&Board::new(), Mark::O);
        // Interior nodes included, so well beyond the 255,168 finished games.
        assert!(result.nodes > 255_168);
    }
}
