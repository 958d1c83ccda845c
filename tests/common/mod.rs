//! Shared helpers for the scenario tests: board layouts as little ASCII
//! pictures (`.`/`@`/`O`, top row first) and a deterministic random source
//! that enumerates every possible playout.

#![allow(dead_code)]

use montego::board::{board_to_string, Board, Color, GoBoard, PlayOutcome};
use montego::engine::GoRobot;
use montego::rng::Randomness;

/// Normalizes a board picture: strips indentation and blank lines.
pub fn trim_board(layout: &str) -> String {
    layout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn check_board<B: GoBoard + ?Sized>(board: &B, expected: &str) {
    assert_eq!(
        board_to_string(board),
        trim_board(expected),
        "board is different"
    );
}

fn place_stones<B: GoBoard + ?Sized>(board: &mut B, layout: &str) {
    let layout = trim_board(layout);
    let lines: Vec<&str> = layout.lines().collect();
    assert_eq!(lines.len(), board.board_size(), "wrong number of lines");
    for (row, line) in lines.iter().enumerate() {
        assert_eq!(line.len(), board.board_size(), "line is wrong length");
        let y = board.board_size() - row;
        for (i, stone) in line.chars().enumerate() {
            let color = match stone {
                '@' => Color::Black,
                'O' => Color::White,
                '.' => continue,
                other => panic!("invalid character in board: {other}"),
            };
            board
                .play(color, i + 1, y)
                .unwrap_or_else(|err| panic!("couldn't place stone: {err}"));
        }
    }
}

/// Builds a bare board (no superko) from a picture; the picture's height
/// sets the size.
pub fn make_board(layout: &str) -> Board {
    let trimmed = trim_board(layout);
    let mut board = Board::new(trimmed.lines().count());
    place_stones(&mut board, &trimmed);
    board
}

/// Clears the robot and plays the pictured stones onto it.
pub fn set_up_board<R: GoRobot>(robot: &mut R, layout: &str) {
    robot.clear_board();
    place_stones(robot, layout);
}

pub fn play_legal<B: GoBoard + ?Sized>(
    board: &mut B,
    color: Color,
    x: usize,
    y: usize,
    expected: &str,
) -> PlayOutcome {
    let outcome = board.play(color, x, y).unwrap_or_else(|err| {
        panic!("legal move rejected: {color} ({x},{y}): {err}")
    });
    check_board(board, expected);
    outcome
}

pub fn play_illegal<B: GoBoard + ?Sized>(
    board: &mut B,
    color: Color,
    x: usize,
    y: usize,
    expected: &str,
) {
    if board.play(color, x, y).is_ok() {
        panic!("illegal move not rejected: {color} ({x},{y})");
    }
    check_board(board, expected);
}

const MAX_OUTPUTS: usize = 64;

/// A fake random source that can be driven through every possible sequence
/// of choices, like a depth-first search. The first run answers all zeros;
/// each call to [`next`](OdometerRandomness::next) advances the deepest
/// output that still has untried values, resetting everything after it,
/// until every possibility has been produced — an odometer whose last wheel
/// can sit at a different depth each run.
pub struct OdometerRandomness {
    inputs: [usize; MAX_OUTPUTS],
    outputs: [usize; MAX_OUTPUTS],
    call_count: usize,
}

impl OdometerRandomness {
    pub fn new() -> OdometerRandomness {
        OdometerRandomness {
            inputs: [0; MAX_OUTPUTS],
            outputs: [0; MAX_OUTPUTS],
            call_count: 0,
        }
    }

    /// Prepares the next untried sequence. False once every possibility has
    /// been produced.
    pub fn next(&mut self) -> bool {
        for i in (0..self.call_count).rev() {
            if self.outputs[i] < self.inputs[i] - 1 {
                self.outputs[i] += 1;
                self.call_count = 0;
                return true;
            }
            self.outputs[i] = 0;
        }
        false
    }
}

impl Randomness for OdometerRandomness {
    fn below(&mut self, n: usize) -> usize {
        assert!(n >= 1, "illegal argument to below");
        if n == 1 {
            return 0; // only one choice; not a decision point
        }
        self.inputs[self.call_count] = n;
        assert!(
            self.outputs[self.call_count] < n,
            "can't use the odometer with a nondeterministic function"
        );
        let result = self.outputs[self.call_count];
        self.call_count += 1;
        result
    }
}
