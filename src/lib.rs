//! Montego: a Monte Carlo Go engine.
//!
//! The engine estimates moves by playing many random games from the current
//! position and crediting each point with the outcomes of the playouts it
//! appeared in (the "All Moves As First" heuristic). There is no search
//! tree; all the effort goes into fast playouts over a sentinel-padded
//! board.
//!
//! ## Modules
//!
//! - [`board`] - Board state, move execution, captures, random playouts
//! - [`game`] - Positional superko layered over the board
//! - [`engine`] - Playout sampling, move selection, and the engine facade
//! - [`parallel`] - Optional fan-out wrapper running one engine per thread
//! - [`rng`] - The randomness capability used by playouts
//! - [`gtp`] - Go Text Protocol front end
//!
//! ## Example
//!
//! ```
//! use montego::board::Color;
//! use montego::engine::{Engine, GenMoveResult};
//!
//! let mut engine = Engine::new(9);
//! engine.play(Color::Black, 3, 3).unwrap();
//! let (x, y, result) = engine.generate_move(Color::White);
//! assert!(result == GenMoveResult::Played || result == GenMoveResult::Passed);
//! # let _ = (x, y);
//! ```

pub mod board;
pub mod constants;
pub mod engine;
pub mod game;
pub mod gtp;
pub mod parallel;
pub mod rng;
