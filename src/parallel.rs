//! Optional fan-out wrapper running one engine per thread.
//!
//! Playout sampling is embarrassingly parallel, so this wrapper keeps a
//! private [`Engine`] per worker and fans each move request out with scoped
//! threads. Engines are never shared: every board mutation is mirrored to
//! every worker, and after a sampling run the workers' `wins`/`hits` tables
//! are summed element-wise into the main engine, which then selects the
//! move as usual.

use std::thread;
use std::time::Instant;

use log::info;

use crate::board::{Color, GoBoard, MoveOutcome, PlayError, PlayOutcome};
use crate::engine::{Config, Engine, GenMoveResult, GoRobot};

pub struct ParallelEngine {
    main: Engine,
    workers: Vec<Engine>,
}

impl ParallelEngine {
    /// Creates a wrapper with one worker per available CPU.
    pub fn new(board_size: usize) -> ParallelEngine {
        let workers = thread::available_parallelism()
            .map(|count| count.get())
            .unwrap_or(1);
        ParallelEngine::with_config(
            Config {
                board_size,
                ..Config::default()
            },
            workers,
        )
    }

    /// Creates a wrapper with an explicit worker count. The configured
    /// random source goes to the main engine (it drives move selection);
    /// each worker gets its own independently seeded source.
    pub fn with_config(config: Config, worker_count: usize) -> ParallelEngine {
        let board_size = config.board_size;
        let sample_count = config.sample_count;
        let workers = (0..worker_count.max(1))
            .map(|_| {
                Engine::with_config(Config {
                    board_size,
                    sample_count,
                    randomness: None,
                })
            })
            .collect();
        ParallelEngine {
            main: Engine::with_config(config),
            workers,
        }
    }

    pub fn set_board_size(&mut self, size: usize) -> bool {
        if !self.main.set_board_size(size) {
            return false;
        }
        self.workers
            .iter_mut()
            .all(|worker| worker.set_board_size(size))
    }

    pub fn clear_board(&mut self) {
        self.main.clear_board();
        for worker in &mut self.workers {
            worker.clear_board();
        }
    }

    pub fn set_komi(&mut self, komi: f64) {
        self.main.set_komi(komi);
        for worker in &mut self.workers {
            worker.set_komi(komi);
        }
    }

    pub fn board_size(&self) -> usize {
        self.main.board_size()
    }

    pub fn cell(&self, x: usize, y: usize) -> Color {
        self.main.cell(x, y)
    }

    pub fn play(
        &mut self,
        color: Color,
        x: usize,
        y: usize,
    ) -> Result<PlayOutcome, PlayError> {
        let result = self.main.play(color, x, y);
        if result.is_ok() {
            for worker in &mut self.workers {
                let mirrored = worker.play(color, x, y);
                debug_assert_eq!(mirrored, result, "worker board out of sync");
            }
        }
        result
    }

    pub fn generate_move(&mut self, color: Color) -> (usize, usize, GenMoveResult) {
        if !self.main.game.board().is_my_turn(color) {
            if let Err(cause) = self.play(color.opponent(), 0, 0) {
                panic!("other side cannot pass? ({cause})");
            }
        }

        // every worker takes an equal share, rounded up
        let share = self.main.sample_count / self.workers.len() + 1;
        let start = Instant::now();
        thread::scope(|scope| {
            for worker in &mut self.workers {
                scope.spawn(move || worker.find_wins(share));
            }
        });
        let elapsed = start.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            info!(
                "playouts/second: {:.0}",
                (share * self.workers.len()) as f64 / elapsed
            );
        }

        for win in &mut self.main.wins {
            *win = 0;
        }
        for hit in &mut self.main.hits {
            *hit = 0;
        }
        for worker in &self.workers {
            for (total, &wins) in self.main.wins.iter_mut().zip(&worker.wins) {
                *total += wins;
            }
            for (total, &hits) in self.main.hits.iter_mut().zip(&worker.hits) {
                *total += hits;
            }
        }

        let best_move = self.main.select_move();
        let (outcome, _) = self.main.game.make_move(best_move);
        let answer = match outcome {
            MoveOutcome::Played => {
                let (x, y) = self.main.game.board().coords(best_move);
                (x, y, GenMoveResult::Played)
            }
            MoveOutcome::Passed => (0, 0, GenMoveResult::Passed),
            other => panic!("can't make generated move? {other}"),
        };
        for worker in &mut self.workers {
            let (mirrored, _) = worker.game.make_move(best_move);
            debug_assert!(mirrored.ok(), "worker rejected the chosen move");
        }
        answer
    }
}

impl GoBoard for ParallelEngine {
    fn board_size(&self) -> usize {
        ParallelEngine::board_size(self)
    }

    fn cell(&self, x: usize, y: usize) -> Color {
        ParallelEngine::cell(self, x, y)
    }

    fn play(
        &mut self,
        color: Color,
        x: usize,
        y: usize,
    ) -> Result<PlayOutcome, PlayError> {
        ParallelEngine::play(self, color, x, y)
    }
}

impl GoRobot for ParallelEngine {
    fn set_board_size(&mut self, size: usize) -> bool {
        ParallelEngine::set_board_size(self, size)
    }

    fn clear_board(&mut self) {
        ParallelEngine::clear_board(self)
    }

    fn set_komi(&mut self, komi: f64) {
        ParallelEngine::set_komi(self, komi)
    }

    fn generate_move(&mut self, color: Color) -> (usize, usize, GenMoveResult) {
        ParallelEngine::generate_move(self, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board_to_string;

    fn small_parallel_engine(board_size: usize) -> ParallelEngine {
        ParallelEngine::with_config(
            Config {
                board_size,
                sample_count: 40,
                ..Config::default()
            },
            2,
        )
    }

    fn assert_workers_in_sync(engine: &ParallelEngine) {
        let main = board_to_string(&engine.main);
        for worker in &engine.workers {
            assert_eq!(board_to_string(worker), main, "worker diverged");
        }
    }

    #[test]
    fn moves_are_mirrored_to_every_worker() {
        let mut engine = small_parallel_engine(5);
        engine.play(Color::Black, 3, 3).unwrap();
        assert_eq!(engine.play(Color::White, 3, 3), Err(PlayError::Occupied));
        assert_workers_in_sync(&engine);

        let (_, _, result) = engine.generate_move(Color::White);
        assert_eq!(result, GenMoveResult::Played);
        assert_workers_in_sync(&engine);
    }

    #[test]
    fn resizing_resets_main_and_workers() {
        let mut engine = small_parallel_engine(5);
        engine.play(Color::Black, 3, 3).unwrap();
        assert!(engine.set_board_size(3));
        assert_eq!(engine.board_size(), 3);
        assert_eq!(engine.cell(2, 2), Color::Empty);
        assert_workers_in_sync(&engine);
    }

    #[test]
    fn generates_a_move_on_an_empty_board() {
        let mut engine = small_parallel_engine(3);
        let (x, y, result) = engine.generate_move(Color::Black);
        assert_eq!(result, GenMoveResult::Played);
        assert_eq!(engine.cell(x, y), Color::Black);
        assert_workers_in_sync(&engine);
    }
}
