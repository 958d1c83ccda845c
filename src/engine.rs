//! Move generation by Monte Carlo sampling.
//!
//! For each move request the engine runs a batch of random playouts from
//! the current position and scores every point under the All Moves As First
//! heuristic: a playout's result is credited to each point the generating
//! player occupied during it, not just the first move. The point with the
//! best win ratio that is legal and not one of our own eyes gets played.

use std::time::Instant;

use log::info;

use crate::board::{
    Color, GoBoard, MoveOutcome, PlayError, PlayOutcome, Point, MOVE_TO_PT_MASK,
    PASS,
};
use crate::constants::{DEFAULT_BOARD_SIZE, DEFAULT_SAMPLE_COUNT};
use crate::game::Game;
use crate::rng::{PrngRandomness, Randomness};

/// Result of a move-generation request.
///
/// The engine itself only ever answers `Played` or `Passed`; `Resigned`
/// exists for robot implementations that give up lost games.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GenMoveResult {
    Played,
    Passed,
    Resigned,
}

/// The full robot interface the protocol layer drives.
pub trait GoRobot: GoBoard {
    /// Changes the board size, clearing the board. False if the size is
    /// unsupported.
    fn set_board_size(&mut self, size: usize) -> bool;

    fn clear_board(&mut self);

    fn set_komi(&mut self, komi: f64);

    /// Generates and plays a move for `color`. Either side may be asked to
    /// move.
    fn generate_move(&mut self, color: Color) -> (usize, usize, GenMoveResult);
}

/// Engine construction parameters.
pub struct Config {
    pub board_size: usize,
    /// Playouts per generated move.
    pub sample_count: usize,
    /// Random source; `None` means an OS-seeded PRNG.
    pub randomness: Option<Box<dyn Randomness + Send>>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            board_size: DEFAULT_BOARD_SIZE,
            sample_count: DEFAULT_SAMPLE_COUNT,
            randomness: None,
        }
    }
}

/// A single-threaded Monte Carlo engine.
pub struct Engine {
    pub(crate) game: Game,
    pub(crate) randomness: Box<dyn Randomness + Send>,
    pub(crate) sample_count: usize,

    // per-point playout statistics, indexed by Point
    pub(crate) wins: Vec<i32>,
    pub(crate) hits: Vec<i32>,
    // which points were already credited for the current playout
    updated: Vec<bool>,
    // move-selection scratch, reused across calls
    candidates: Vec<Point>,
}

impl Engine {
    pub fn new(board_size: usize) -> Engine {
        Engine::with_config(Config {
            board_size,
            ..Config::default()
        })
    }

    pub fn with_config(config: Config) -> Engine {
        let mut engine = Engine {
            game: Game::new(config.board_size),
            randomness: config
                .randomness
                .unwrap_or_else(|| Box::new(PrngRandomness::from_entropy())),
            sample_count: config.sample_count,
            wins: Vec::new(),
            hits: Vec::new(),
            updated: Vec::new(),
            candidates: Vec::new(),
        };
        engine.resize_stats();
        engine
    }

    fn resize_stats(&mut self) {
        let cell_count = self.game.board().cell_count();
        self.wins.clear();
        self.wins.resize(cell_count, 0);
        self.hits.clear();
        self.hits.resize(cell_count, 0);
        self.updated.clear();
        self.updated.resize(cell_count, false);
        self.candidates.clear();
        self.candidates.reserve(self.game.board().all_points().len());
    }

    pub fn set_board_size(&mut self, size: usize) -> bool {
        if !self.game.set_board_size(size) {
            return false;
        }
        self.resize_stats();
        true
    }

    pub fn clear_board(&mut self) {
        let size = self.game.board().size();
        self.set_board_size(size);
    }

    pub fn set_komi(&mut self, komi: f64) {
        self.game.set_komi(komi);
    }

    pub fn board_size(&self) -> usize {
        self.game.board().size()
    }

    pub fn cell(&self, x: usize, y: usize) -> Color {
        self.game.board().cell(x, y)
    }

    pub fn play(
        &mut self,
        color: Color,
        x: usize,
        y: usize,
    ) -> Result<PlayOutcome, PlayError> {
        self.game.play(color, x, y)
    }

    /// Runs `samples` random playouts from the current position and fills
    /// `wins`/`hits` with the All Moves As First statistics: for every
    /// point the generating player occupied first during a playout, the
    /// playout's result (+1 win, -1 loss, 0 draw, from the generating
    /// player's side) is added to `wins[pt]` and `hits[pt]` is bumped.
    pub fn find_wins(&mut self, samples: usize) {
        for win in &mut self.wins {
            *win = 0;
        }
        for hit in &mut self.hits {
            *hit = 0;
        }

        let start_move_count = self.game.board().move_count();
        let generating_color = self.game.board().to_play();
        let komi = self.game.komi();

        for _ in 0..samples {
            let scratch = self.game.playout(self.randomness.as_mut());
            let score = scratch.easy_score() as f64;

            let mut win_amount = if score > komi {
                1
            } else if score < komi {
                -1
            } else {
                0 // a draw
            };
            if generating_color == Color::White {
                win_amount = -win_amount;
            }

            // Credit the points the generating player took during this
            // playout: its moves are every second entry from the start.
            for updated in &mut self.updated {
                *updated = false;
            }
            let playout_moves = scratch.moves();
            let mut i = start_move_count;
            while i < playout_moves.len() {
                let point = playout_moves[i] & MOVE_TO_PT_MASK;
                if point != PASS && !self.updated[point] {
                    self.updated[point] = true;
                    self.wins[point] += win_amount;
                    self.hits[point] += 1;
                }
                i += 2;
            }
        }
    }

    /// Picks the sampled point with the best win ratio among those that
    /// were hit at least once, do not fill our own eye, and are strictly
    /// legal. Scanning in a random permutation breaks ties uniformly.
    /// Returns [`PASS`] when nothing qualifies.
    pub(crate) fn select_move(&mut self) -> Point {
        self.candidates.clear();
        let point_count = self.game.board().all_points().len();
        for i in 0..point_count {
            let point = self.game.board().all_points()[i];
            if self.hits[point] > 0
                && !self.game.board().would_fill_eye(point)
                && self.game.check_legal(point) == MoveOutcome::Played
            {
                self.candidates.push(point);
            }
        }

        let mut best_move = PASS;
        let mut best_score = f64::NEG_INFINITY;
        let candidate_count = self.candidates.len();
        for i in 0..candidate_count {
            let random_index = i + self.randomness.below(candidate_count - i);
            let point = self.candidates[random_index];
            self.candidates[random_index] = self.candidates[i];
            self.candidates[i] = point;

            let score = self.wins[point] as f64 / self.hits[point] as f64;
            if score > best_score {
                best_move = point;
                best_score = score;
            }
        }
        best_move
    }

    pub fn generate_move(&mut self, color: Color) -> (usize, usize, GenMoveResult) {
        if !self.game.board().is_my_turn(color) {
            // either side may be asked to move; treat as an opponent pass
            if let Err(cause) = self.game.play(color.opponent(), 0, 0) {
                panic!("other side cannot pass? ({cause})");
            }
        }

        let start = Instant::now();
        self.find_wins(self.sample_count);
        let elapsed = start.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            info!(
                "playouts/second: {:.0}",
                self.sample_count as f64 / elapsed
            );
        }

        let best_move = self.select_move();
        let (outcome, _) = self.game.make_move(best_move);
        match outcome {
            MoveOutcome::Played => {
                let (x, y) = self.game.board().coords(best_move);
                (x, y, GenMoveResult::Played)
            }
            MoveOutcome::Passed => (0, 0, GenMoveResult::Passed),
            other => panic!("can't make generated move? {other}"),
        }
    }
}

impl GoBoard for Engine {
    fn board_size(&self) -> usize {
        Engine::board_size(self)
    }

    fn cell(&self, x: usize, y: usize) -> Color {
        Engine::cell(self, x, y)
    }

    fn play(
        &mut self,
        color: Color,
        x: usize,
        y: usize,
    ) -> Result<PlayOutcome, PlayError> {
        Engine::play(self, color, x, y)
    }
}

impl GoRobot for Engine {
    fn set_board_size(&mut self, size: usize) -> bool {
        Engine::set_board_size(self, size)
    }

    fn clear_board(&mut self) {
        Engine::clear_board(self)
    }

    fn set_komi(&mut self, komi: f64) {
        Engine::set_komi(self, komi)
    }

    fn generate_move(&mut self, color: Color) -> (usize, usize, GenMoveResult) {
        Engine::generate_move(self, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_engine(board_size: usize, sample_count: usize) -> Engine {
        Engine::with_config(Config {
            board_size,
            sample_count,
            randomness: Some(Box::new(PrngRandomness::seeded(12345))),
        })
    }

    #[test]
    fn find_wins_collects_statistics() {
        let mut engine = seeded_engine(3, 20);
        engine.find_wins(20);
        let total_hits: i32 = engine.hits.iter().sum();
        assert!(total_hits > 0, "playouts produced no statistics");
        for (point, &wins) in engine.wins.iter().enumerate() {
            assert!(
                wins.abs() <= engine.hits[point],
                "wins exceed hits at {point}"
            );
        }
        // the pass sentinel is never credited
        assert_eq!(engine.hits[PASS], 0);
    }

    #[test]
    fn generated_move_lands_on_the_board() {
        let mut engine = seeded_engine(5, 50);
        let (x, y, result) = engine.generate_move(Color::Black);
        assert_eq!(result, GenMoveResult::Played);
        assert!((1..=5).contains(&x) && (1..=5).contains(&y));
        assert_eq!(engine.cell(x, y), Color::Black);
    }

    #[test]
    fn single_point_board_generates_a_pass() {
        let mut engine = seeded_engine(1, 20);
        let (_, _, result) = engine.generate_move(Color::Black);
        assert_eq!(result, GenMoveResult::Passed);
    }

    #[test]
    fn board_size_change_resizes_statistics() {
        let mut engine = seeded_engine(9, 10);
        assert!(engine.set_board_size(13));
        assert_eq!(engine.wins.len(), engine.game.board().cell_count());
        assert!(!engine.set_board_size(26));
        assert_eq!(engine.board_size(), 13);
    }
}
