//! A game of Go: the board plus the positional superko rule.
//!
//! The board itself only knows about captures, suicide and the simple ko;
//! recreating any earlier whole-board position is forbidden too, and that
//! needs history. `Game` keeps a hash of the position after every accepted
//! move, and vets each move by replaying it on a scratch board and looking
//! the resulting hash up in that history.

use crate::board::{
    Board, Color, MoveOutcome, PlayError, PlayOutcome, Point,
};
use crate::rng::Randomness;

pub struct Game {
    board: Board,
    scratch: Board,
    komi: f64,
    // hashes[i] is the position hash right after move i
    hashes: Vec<u64>,
}

impl Game {
    /// Creates a cleared game. Panics for sizes the board rejects.
    pub fn new(size: usize) -> Game {
        Game {
            board: Board::new(size),
            scratch: Board::new(size),
            komi: 0.0,
            hashes: Vec::new(),
        }
    }

    /// Changes the board size, clearing the game. False for unsupported
    /// sizes, leaving the game untouched.
    pub fn set_board_size(&mut self, size: usize) -> bool {
        if !self.board.clear(size) {
            return false;
        }
        let ok = self.scratch.clear(size);
        debug_assert!(ok, "scratch board refused a size the board accepted");
        self.hashes.clear();
        true
    }

    /// Clears the game at the current size.
    pub fn clear(&mut self) {
        let size = self.board.size();
        self.set_board_size(size);
    }

    pub fn set_komi(&mut self, komi: f64) {
        self.komi = komi;
    }

    pub fn komi(&self) -> f64 {
        self.komi
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Plays a move for `color`, checking the full rules including
    /// positional superko. Playing out of turn implies a pass by the
    /// opponent first.
    pub fn play(
        &mut self,
        color: Color,
        x: usize,
        y: usize,
    ) -> Result<PlayOutcome, PlayError> {
        if !self.board.check_play_args(color, x, y) {
            return Err(PlayError::InvalidArgs);
        }
        if !self.board.is_my_turn(color) {
            if let Err(cause) = self.play(color.opponent(), 0, 0) {
                return Err(PlayError::OpponentCannotPass(Box::new(cause)));
            }
        }
        let mv = self.board.point_at(x, y);
        let (outcome, captures) = self.make_move(mv);
        outcome.to_play_result(captures)
    }

    /// The strict form of move execution: legality check (including
    /// superko) first, then the real move, then the hash history update.
    pub fn make_move(&mut self, mv: Point) -> (MoveOutcome, usize) {
        let legality = self.check_legal(mv);
        if !legality.ok() {
            return (legality, 0);
        }
        let (outcome, captures) = self.board.play_move(mv);
        assert!(
            outcome.ok(),
            "board rejected a move the legality check accepted: {outcome}"
        );
        self.hashes.push(self.board.position_hash());
        (outcome, captures)
    }

    /// Tries `mv` on the scratch board and reports how the real board would
    /// answer, with superko layered on: a played move whose resulting
    /// position hash already appears in the history is reported as
    /// [`MoveOutcome::Superko`].
    pub fn check_legal(&mut self, mv: Point) -> MoveOutcome {
        self.scratch.copy_from(&self.board);
        let (outcome, _) = self.scratch.play_move(mv);
        if outcome == MoveOutcome::Played {
            let new_hash = self.scratch.position_hash();
            if self.hashes.iter().any(|&hash| hash == new_hash) {
                return MoveOutcome::Superko;
            }
        }
        outcome
    }

    /// Copies the position onto the scratch board, plays it out randomly,
    /// and hands the finished scratch back for scoring.
    pub fn playout(&mut self, rng: &mut dyn Randomness) -> &Board {
        self.scratch.copy_from(&self.board);
        self.scratch.play_random_game(rng);
        &self.scratch
    }
}
