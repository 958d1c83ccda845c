//! Go board representation and move execution.
//!
//! The board is a one-dimensional array of cells:
//!
//! ```text
//!   X axis (from 1) ->
//!
//!   # # # # #
//!   # . . .
//!   # . . .     ^
//!   # . . .     |
//!   # # # #   Y axis (from 1)
//!
//!   array index = y * stride + x,  stride = size + 1
//! ```
//!
//! Row 0 and column 0 are never used, and every cell that is not a playable
//! point holds the edge sentinel. A neighbor in any cardinal or diagonal
//! direction is
//! reached by adding a fixed offset to an index, and an off-board access
//! lands on an `EDGE` cell instead of needing a bounds check. The array has
//! one extra trailing cell because a diagonal step from the top-right corner
//! overshoots the last row.
//!
//! `neighbor_counts[p]` tracks how many of p's four orthogonal neighbors are
//! not empty (edges count). It is maintained incrementally on every stone
//! placed or removed, and gives an O(1) "this stone might have no liberties"
//! test: a chain can only be captured if every stone in it has a count of 4.

use std::fmt;

use thiserror::Error;

use crate::constants::MAX_BOARD_SIZE;
use crate::rng::Randomness;

/// A point on the board, or a move by the current player at that point.
///
/// Interpreted as a point, it indexes the board's cell array. The invalid
/// index 0 doubles as the pass move.
pub type Point = usize;

/// The pass move.
pub const PASS: Point = 0;

/// Flag on a recorded move: the move captured exactly one stone.
/// Consulted by the next move to detect a simple ko.
pub(crate) const ONE_CAPTURE: Point = 1024;

/// Mask that strips `ONE_CAPTURE` from a recorded move, leaving the point.
pub(crate) const MOVE_TO_PT_MASK: Point = 1023;

/// Contents of one slot in the cell array.
///
/// `WHITE | BLACK == 3` is never stored on the board; scoring uses it as the
/// "touches both colors" sentinel. `CELL_IN_CHAIN` may be OR-ed into an
/// occupied cell during chain traversal and is always cleared again before
/// the traversal returns.
type Cell = u8;

const EMPTY: Cell = 0;
const WHITE: Cell = 1;
const BLACK: Cell = 2;
const EDGE: Cell = 4;
const CELL_IN_CHAIN: Cell = 64;

/// The color of a stone or an empty point.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Color {
    Empty,
    Black,
    White,
}

impl Color {
    /// Returns the other player.
    ///
    /// # Panics
    /// Panics for `Color::Empty`.
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
            Color::Empty => panic!("empty has no opponent"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Empty => "Empty",
            Color::Black => "Black",
            Color::White => "White",
        };
        write!(f, "{name}")
    }
}

fn color_to_cell(color: Color) -> Cell {
    match color {
        Color::White => WHITE,
        Color::Black => BLACK,
        Color::Empty => panic!("no cell for color: {color}"),
    }
}

fn cell_to_color(cell: Cell) -> Color {
    match cell {
        EMPTY => Color::Empty,
        WHITE => Color::White,
        BLACK => Color::Black,
        // an edge, or a leaked chain mark
        other => panic!("can't convert cell to color: {other}"),
    }
}

/// Result of executing a single move on the board.
///
/// [`Played`](MoveOutcome::Played) and [`Passed`](MoveOutcome::Passed) are
/// the two outcomes that change the board; every other variant is a
/// rejection that leaves it untouched.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Played,
    Passed,
    Occupied,
    Suicide,
    SimpleKo,
    Superko,
}

impl MoveOutcome {
    /// True for the outcomes that accepted the move.
    pub fn ok(self) -> bool {
        matches!(self, MoveOutcome::Played | MoveOutcome::Passed)
    }

    pub(crate) fn to_play_result(
        self,
        captures: usize,
    ) -> Result<PlayOutcome, PlayError> {
        match self {
            MoveOutcome::Played => Ok(PlayOutcome::Played { captures }),
            MoveOutcome::Passed => Ok(PlayOutcome::Passed),
            MoveOutcome::Occupied => Err(PlayError::Occupied),
            MoveOutcome::Suicide => Err(PlayError::Suicide),
            MoveOutcome::SimpleKo => Err(PlayError::Ko),
            MoveOutcome::Superko => Err(PlayError::Superko),
        }
    }
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MoveOutcome::Played => "played",
            MoveOutcome::Passed => "passed",
            MoveOutcome::Occupied => "occupied",
            MoveOutcome::Suicide => "suicide",
            MoveOutcome::SimpleKo => "ko",
            MoveOutcome::Superko => "superko",
        };
        write!(f, "{name}")
    }
}

/// A successfully executed `play` request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayOutcome {
    /// A stone was placed; `captures` opposing stones came off the board.
    Played { captures: usize },
    Passed,
}

impl fmt::Display for PlayOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayOutcome::Played { captures } => write!(f, "captures: {captures}"),
            PlayOutcome::Passed => write!(f, "passed"),
        }
    }
}

/// A rejected `play` request. The board is unchanged.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PlayError {
    #[error("invalid args")]
    InvalidArgs,
    #[error("occupied")]
    Occupied,
    #[error("suicide")]
    Suicide,
    #[error("ko")]
    Ko,
    #[error("superko")]
    Superko,
    /// Playing out of turn implies a pass by the opponent, and that pass
    /// itself was rejected.
    #[error("other side cannot pass? ({0})")]
    OpponentCannotPass(Box<PlayError>),
}

/// Read and play access to a Go position, implemented by [`Board`] and by
/// the engines that wrap one.
pub trait GoBoard {
    fn board_size(&self) -> usize;

    /// The color at (x, y), coordinates from 1.
    fn cell(&self, x: usize, y: usize) -> Color;

    /// Adds a move. Moves can be added for either side in any order, for
    /// example to set up a position; if the same player plays twice, the
    /// other player is assumed to have passed. (0, 0) means pass. Captures
    /// are handled automatically.
    fn play(&mut self, color: Color, x: usize, y: usize)
        -> Result<PlayOutcome, PlayError>;
}

/// Renders a position as one line of `.`/`O`/`@` per row, top row first.
pub fn board_to_string<B: GoBoard + ?Sized>(board: &B) -> String {
    let size = board.board_size();
    let mut out = String::with_capacity(size * (size + 1));
    for y in (1..=size).rev() {
        for x in 1..=size {
            out.push(match board.cell(x, y) {
                Color::Empty => '.',
                Color::White => 'O',
                Color::Black => '@',
            });
        }
        if y > 1 {
            out.push('\n');
        }
    }
    out
}

/// A Go position with full rules except positional superko.
///
/// The board records every move made on it, which lets an outer layer keep a
/// parallel history of position hashes and add the superko rule on top.
pub struct Board {
    size: usize,
    stride: usize,
    dir_offsets: [isize; 4],
    diag_offsets: [isize; 4],

    cells: Vec<Cell>,
    neighbor_counts: Vec<u8>,
    all_points: Vec<Point>,

    // Moves in this game, each possibly flagged with ONE_CAPTURE.
    moves: Vec<Point>,
    common_move_count: usize,

    // Scratch buffers, reused across calls to avoid allocation.
    chain_points: Vec<Point>,
    candidates: Vec<Point>,
}

impl Board {
    /// Creates a cleared board.
    ///
    /// # Panics
    /// Panics for sizes [`clear`](Board::clear) rejects; use `clear` when
    /// the size comes from outside.
    pub fn new(size: usize) -> Board {
        let mut board = Board {
            size: 0,
            stride: 0,
            dir_offsets: [0; 4],
            diag_offsets: [0; 4],
            cells: Vec::new(),
            neighbor_counts: Vec::new(),
            all_points: Vec::new(),
            moves: Vec::new(),
            common_move_count: 0,
            chain_points: Vec::new(),
            candidates: Vec::new(),
        };
        assert!(board.clear(size), "unsupported board size: {size}");
        board
    }

    /// Reinitializes the board at the given size. Returns false (leaving the
    /// board untouched) for sizes above [`MAX_BOARD_SIZE`].
    pub fn clear(&mut self, size: usize) -> bool {
        if size > MAX_BOARD_SIZE {
            return false;
        }
        self.size = size;
        self.stride = size + 1;
        let stride = self.stride as isize;
        self.dir_offsets = [1, -1, stride, -stride];
        self.diag_offsets = [stride - 1, stride + 1, -stride - 1, -stride + 1];

        // Fill everything with edge, then carve out the playable points.
        let cell_count = self.stride * (self.stride + 1) + 1;
        self.cells.clear();
        self.cells.resize(cell_count, EDGE);
        self.neighbor_counts.clear();
        self.neighbor_counts.resize(cell_count, 4);
        self.all_points.clear();

        for y in 1..=size {
            for x in 1..=size {
                let point = y * self.stride + x;
                self.cells[point] = EMPTY;
                self.all_points.push(point);
                for dir in 0..4 {
                    let neighbor = offset(point, self.dir_offsets[dir]);
                    self.neighbor_counts[neighbor] -= 1;
                }
            }
        }

        self.moves.clear();
        self.common_move_count = 0;
        self.chain_points.clear();
        self.chain_points.reserve(self.all_points.len());
        self.candidates.clear();
        self.candidates.reserve(self.all_points.len());
        true
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// The playable points, in row-major order from (1, 1).
    pub fn all_points(&self) -> &[Point] {
        &self.all_points
    }

    /// Total length of the cell array, including edge cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// The move history. Entries may carry the single-capture flag; mask
    /// with the point mask before interpreting one as a point.
    pub fn moves(&self) -> &[Point] {
        &self.moves
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    /// The cell index of (x, y), coordinates from 1. (0, 0) maps to
    /// [`PASS`].
    pub fn point_at(&self, x: usize, y: usize) -> Point {
        y * self.stride + x
    }

    /// Inverse of [`point_at`](Board::point_at).
    pub fn coords(&self, point: Point) -> (usize, usize) {
        (point % self.stride, point / self.stride)
    }

    /// The player whose turn it is: Black exactly when the move count is
    /// even.
    pub fn to_play(&self) -> Color {
        if self.moves.len() % 2 == 0 {
            Color::Black
        } else {
            Color::White
        }
    }

    pub fn is_my_turn(&self, color: Color) -> bool {
        self.friendly_cell() == color_to_cell(color)
    }

    fn friendly_cell(&self) -> Cell {
        2 - (self.moves.len() & 1) as Cell
    }

    pub(crate) fn check_play_args(&self, color: Color, x: usize, y: usize) -> bool {
        if color != Color::White && color != Color::Black {
            return false;
        }
        if x == 0 && y == 0 {
            return true;
        }
        x >= 1 && y >= 1 && x <= self.size && y <= self.size
    }

    /// Plays a move directly, without the superko check. Used by tests and
    /// for setting up positions; real games go through `Game`.
    pub fn play(
        &mut self,
        color: Color,
        x: usize,
        y: usize,
    ) -> Result<PlayOutcome, PlayError> {
        if !self.check_play_args(color, x, y) {
            return Err(PlayError::InvalidArgs);
        }
        if !self.is_my_turn(color) {
            // assume the other player passed
            if let Err(cause) = self.play(color.opponent(), 0, 0) {
                return Err(PlayError::OpponentCannotPass(Box::new(cause)));
            }
        }
        let point = self.point_at(x, y);
        let (outcome, captures) = self.play_move(point);
        outcome.to_play_result(captures)
    }

    /// Executes one move for the current player: the fast path used by
    /// playouts. Checks occupation, captures, suicide and simple ko, but
    /// not positional superko. On rejection the board is left exactly as it
    /// was, cells and neighbor counts included.
    pub fn play_move(&mut self, mv: Point) -> (MoveOutcome, usize) {
        let friendly = self.friendly_cell();
        let enemy = friendly ^ 3;

        if mv == PASS {
            self.moves.push(PASS);
            return (MoveOutcome::Passed, 0);
        }
        if self.cells[mv] != EMPTY {
            return (MoveOutcome::Occupied, 0);
        }

        // place the stone and bump the neighbor counts around it
        self.cells[mv] = friendly;
        for dir in 0..4 {
            let neighbor = offset(mv, self.dir_offsets[dir]);
            self.neighbor_counts[neighbor] += 1;
        }

        // remove any enemy chains this move left without liberties
        let mut captures = 0;
        for dir in 0..4 {
            let neighbor = offset(mv, self.dir_offsets[dir]);
            if self.cells[neighbor] == enemy && self.neighbor_counts[neighbor] == 4 {
                captures += self.capture(neighbor);
            }
        }

        if captures == 0 {
            if self.neighbor_counts[mv] == 4 && !self.has_liberties(mv) {
                self.remove_placed_stone(mv);
                return (MoveOutcome::Suicide, 0);
            }
            self.moves.push(mv);
            return (MoveOutcome::Played, 0);
        }

        let mut mv = mv;
        if captures == 1 {
            // Simple ko: the previous move captured exactly one stone, and
            // this move just recaptured it.
            if let Some(&last) = self.moves.last() {
                if last & ONE_CAPTURE != 0
                    && self.cells[last & MOVE_TO_PT_MASK] == EMPTY
                {
                    let revert = last & MOVE_TO_PT_MASK;
                    self.cells[revert] = enemy;
                    for dir in 0..4 {
                        let neighbor = offset(revert, self.dir_offsets[dir]);
                        self.neighbor_counts[neighbor] += 1;
                    }
                    self.remove_placed_stone(mv);
                    return (MoveOutcome::SimpleKo, 0);
                }
            }
            mv |= ONE_CAPTURE;
        }

        self.moves.push(mv);
        (MoveOutcome::Played, captures)
    }

    // Exact inverse of the tentative placement in play_move.
    fn remove_placed_stone(&mut self, mv: Point) {
        self.cells[mv] = EMPTY;
        for dir in 0..4 {
            let neighbor = offset(mv, self.dir_offsets[dir]);
            self.neighbor_counts[neighbor] -= 1;
        }
    }

    /// Given any point in a chain with no liberties, marks every cell in
    /// the chain and records the points in `chain_points`, returning the
    /// chain length. Given a point in a chain that has a liberty, undoes
    /// its marks and returns 0.
    ///
    /// Preconditions: `target` is occupied and has no empty neighbor, and
    /// no cell anywhere carries the chain mark.
    fn mark_surrounded_chain(&mut self, target: Point) -> usize {
        let chain_color = self.cells[target];
        self.chain_points.clear();
        self.chain_points.push(target);
        self.cells[target] |= CELL_IN_CHAIN;

        // Visit each queued point and queue its same-color neighbors. Any
        // such neighbor with a free side proves the chain has a liberty.
        let mut visited = 0;
        while visited < self.chain_points.len() {
            let point = self.chain_points[visited];
            for dir in 0..4 {
                let neighbor = offset(point, self.dir_offsets[dir]);
                if self.cells[neighbor] == chain_color {
                    if self.neighbor_counts[neighbor] != 4 {
                        self.unmark_chain();
                        return 0;
                    }
                    self.cells[neighbor] |= CELL_IN_CHAIN;
                    self.chain_points.push(neighbor);
                }
            }
            visited += 1;
        }
        self.chain_points.len()
    }

    fn unmark_chain(&mut self) {
        for i in 0..self.chain_points.len() {
            let point = self.chain_points[i];
            self.cells[point] ^= CELL_IN_CHAIN;
        }
    }

    /// Removes a libertyless chain from the board and returns its size;
    /// returns 0 (and changes nothing) if the chain turns out to have a
    /// liberty. Preconditions as for `mark_surrounded_chain`.
    fn capture(&mut self, target: Point) -> usize {
        let chain_count = self.mark_surrounded_chain(target);
        for i in 0..chain_count {
            let point = self.chain_points[i];
            self.cells[point] = EMPTY;
            for dir in 0..4 {
                let neighbor = offset(point, self.dir_offsets[dir]);
                self.neighbor_counts[neighbor] -= 1;
            }
        }
        chain_count
    }

    /// Whether the chain containing `target` has any liberty. Used for the
    /// suicide test. Preconditions as for `mark_surrounded_chain`.
    fn has_liberties(&mut self, target: Point) -> bool {
        let chain_count = self.mark_surrounded_chain(target);
        if chain_count == 0 {
            return true;
        }
        self.unmark_chain();
        false
    }

    /// Copies the position and move list from another board of the same
    /// size. The same source must be passed on every call, and the source's
    /// move list may only have been appended to since the previous copy.
    pub fn copy_from(&mut self, other: &Board) {
        assert_eq!(self.size, other.size, "boards must be the same size");
        for i in 0..self.all_points.len() {
            let point = self.all_points[i];
            self.cells[point] = other.cells[point];
            self.neighbor_counts[point] = other.neighbor_counts[point];
        }

        // top off the move list; anything we played past the bookmark is
        // ours alone and gets discarded
        self.moves.truncate(self.common_move_count);
        self.moves
            .extend_from_slice(&other.moves[self.common_move_count..]);
        self.common_move_count = other.moves.len();
    }

    /// Plays random moves in place until the game ends (two consecutive
    /// passes) or the total move count reaches `3 * size²`. The bound keeps
    /// playouts finite: superko is not enforced here, so cycles are
    /// otherwise possible.
    pub fn play_random_game(&mut self, rng: &mut dyn Randomness) {
        let max_moves = self.all_points.len() * 3;

        'captured: loop {
            // fill the candidate list with the unoccupied points
            self.candidates.clear();
            for i in 0..self.all_points.len() {
                let point = self.all_points[i];
                if self.cells[point] == EMPTY {
                    self.candidates.push(point);
                }
            }
            let cand_count = self.candidates.len();

            // Candidates below played_count are occupied now; the rest are
            // still empty. Each turn either plays one move or passes.
            let mut played_count = 0;
            let mut passed_count = 0;
            while self.moves.len() < max_moves {
                // try each candidate, in random order
                let mut i = played_count;
                while i < cand_count {
                    // swap a randomly chosen remaining candidate to the front
                    let random_index = i + rng.below(cand_count - i);
                    let point = self.candidates[random_index];
                    self.candidates[random_index] = self.candidates[i];
                    self.candidates[i] = point;

                    if !self.would_fill_eye(point) {
                        let (outcome, captures) = self.play_move(point);
                        if outcome == MoveOutcome::Played {
                            if captures > 0 {
                                // captures free up points the candidate
                                // list doesn't know about; rebuild it
                                continue 'captured;
                            }
                            played_count += 1;
                            passed_count = 0;
                            break;
                        }
                    }
                    i += 1;
                }
                if i < cand_count {
                    continue; // played a move this turn
                }

                // none of the candidates were suitable
                self.play_move(PASS);
                passed_count += 1;
                if passed_count == 2 {
                    return; // game over
                }
            }
            return; // move bound reached
        }
    }

    /// Whether playing at `mv` would fill the current player's own eye: all
    /// four orthogonal neighbors friendly or edge, and at most one hostile
    /// diagonal, none at all if the point touches the edge.
    pub fn would_fill_eye(&self, mv: Point) -> bool {
        if mv == PASS {
            return false;
        }
        let friendly = self.friendly_cell();
        let enemy = friendly ^ 3;

        for dir in 0..4 {
            let cell = self.cells[offset(mv, self.dir_offsets[dir])];
            if cell != EDGE && cell != friendly {
                return false;
            }
        }

        let mut have_edge = 0;
        let mut enemies = 0;
        for dir in 0..4 {
            let cell = self.cells[offset(mv, self.diag_offsets[dir])];
            if cell == enemy {
                enemies += 1;
            } else if cell == EDGE {
                have_edge = 1;
            }
        }
        enemies + have_edge < 2
    }

    /// Black points minus White points, assuming the game was played out
    /// until every empty region touches only one color. Each empty point
    /// counts for the unique color among its orthogonal neighbors; a point
    /// touching both colors counts for neither. Komi is the caller's
    /// business.
    pub fn easy_score(&self) -> i32 {
        // indices: 1 = white, 2 = black, 3 = touches both (no score)
        let mut cell_counts = [0i32; 4];

        for &point in &self.all_points {
            match self.cells[point] {
                BLACK | WHITE => cell_counts[self.cells[point] as usize] += 1,
                EMPTY => {
                    // OR the neighbors together; works because the stone
                    // colors are single bits and 3 never appears on the
                    // board
                    let mut neighbor_bits = 0;
                    for dir in 0..4 {
                        neighbor_bits |= self.cells[offset(point, self.dir_offsets[dir])];
                    }
                    cell_counts[(neighbor_bits & 3) as usize] += 1;
                }
                _ => {}
            }
        }
        cell_counts[BLACK as usize] - cell_counts[WHITE as usize]
    }

    /// A 64-bit hash of the position, for detecting repeats. This is the
    /// DJB string hash run over the playable cells; distinct positions can
    /// collide, which the superko layer accepts (a collision rejects one
    /// legal move, it never corrupts the game).
    pub fn position_hash(&self) -> u64 {
        let mut hash: u64 = 5381;
        for &point in &self.all_points {
            hash = (hash << 5)
                .wrapping_add(hash)
                .wrapping_add(self.cells[point] as u64);
        }
        hash
    }
}

impl GoBoard for Board {
    fn board_size(&self) -> usize {
        self.size
    }

    fn cell(&self, x: usize, y: usize) -> Color {
        cell_to_color(self.cells[self.point_at(x, y)])
    }

    fn play(
        &mut self,
        color: Color,
        x: usize,
        y: usize,
    ) -> Result<PlayOutcome, PlayError> {
        Board::play(self, color, x, y)
    }
}

#[inline]
fn offset(point: Point, delta: isize) -> Point {
    (point as isize + delta) as usize
}
