//! Go Text Protocol (GTP) front end.
//!
//! GTP is a line-oriented text protocol for driving Go-playing programs; a
//! robot that speaks it can be plugged into controllers and user interfaces
//! like GoGui. This module implements the version 2 core: commands arrive
//! one per line, split on whitespace into a name and arguments, and every
//! command gets a response framed as `= <payload>\n\n` on success or
//! `? <message>\n\n` on failure. Blank lines and `#` comments are ignored.
//!
//! Vertices use the traditional coordinates: columns `A`.. with the letter
//! `I` skipped, rows numbered from 1 at the bottom, and the literal "pass".
//!
//! ## Supported commands
//!
//! `protocol_version`, `name`, `version`, `known_command`, `list_commands`,
//! `boardsize`, `clear_board`, `komi`, `play`, `genmove`, `showboard`,
//! `quit`.

use std::io::{self, BufRead, Write};

use log::debug;

use crate::board::{board_to_string, Color};
use crate::constants::MAX_BOARD_SIZE;
use crate::engine::{GenMoveResult, GoRobot};

/// Every command `known_command` answers true for, sorted.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "genmove",
    "known_command",
    "komi",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "version",
];

/// Executes GTP commands against the robot until `quit` or end of input.
/// Returns an error only for I/O failures.
pub fn run<R: GoRobot>(
    robot: &mut R,
    mut input: impl BufRead,
    mut output: impl Write,
) -> io::Result<()> {
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            debug!("end of input without quit");
            return Ok(());
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut words = trimmed.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let args: Vec<&str> = words.collect();

        let (ok, message) = execute(robot, command, &args);
        let prefix = if ok { '=' } else { '?' };
        write!(output, "{prefix} {message}\n\n")?;
        output.flush()?;

        if command == "quit" {
            return Ok(());
        }
    }
}

fn execute<R: GoRobot>(robot: &mut R, command: &str, args: &[&str]) -> (bool, String) {
    match command {
        "protocol_version" => success("2"),
        "name" => success("montego"),
        "version" => success(env!("CARGO_PKG_VERSION")),
        "known_command" => {
            if args.len() != 1 {
                return failure("wrong number of arguments");
            }
            success(&KNOWN_COMMANDS.contains(&args[0]).to_string())
        }
        "list_commands" => {
            if !args.is_empty() {
                return failure("wrong number of arguments");
            }
            success(&KNOWN_COMMANDS.join("\n"))
        }
        "boardsize" => {
            if args.len() != 1 {
                return failure("wrong number of arguments");
            }
            match args[0].parse::<usize>() {
                Ok(size) if robot.set_board_size(size) => success(""),
                _ => failure("unacceptable size"),
            }
        }
        "clear_board" => {
            if !args.is_empty() {
                return failure("wrong number of arguments");
            }
            robot.clear_board();
            success("")
        }
        "komi" => {
            if args.len() != 1 {
                return failure("wrong number of arguments");
            }
            match args[0].parse::<f64>() {
                Ok(komi) => {
                    robot.set_komi(komi);
                    success("")
                }
                Err(_) => failure("syntax error"),
            }
        }
        "play" => {
            if args.len() != 2 {
                return failure("wrong number of arguments");
            }
            let Some(color) = parse_color(args[0]) else {
                return failure("syntax error");
            };
            let Some((x, y)) = parse_vertex(args[1]) else {
                return failure("syntax error");
            };
            match robot.play(color, x, y) {
                Ok(_) => success(""),
                Err(_) => failure("illegal move"),
            }
        }
        "genmove" => {
            if args.len() != 1 {
                return failure("wrong number of arguments");
            }
            let Some(color) = parse_color(args[0]) else {
                return failure("syntax error");
            };
            let (x, y, result) = robot.generate_move(color);
            match result {
                GenMoveResult::Played => match format_vertex(x, y) {
                    Some(vertex) => success(&vertex),
                    None => failure(&format!("invalid: ({x},{y})")),
                },
                GenMoveResult::Passed => success("pass"),
                GenMoveResult::Resigned => success("resign"),
            }
        }
        "showboard" => {
            if !args.is_empty() {
                return failure("wrong number of arguments");
            }
            success(&board_to_string(robot))
        }
        "quit" => success(""),
        _ => failure("unknown command"),
    }
}

fn success(message: &str) -> (bool, String) {
    (true, message.to_string())
}

fn failure(message: &str) -> (bool, String) {
    (false, message.to_string())
}

/// Parses a color word: `b`/`black` or `w`/`white`, any case.
pub fn parse_color(input: &str) -> Option<Color> {
    match input.to_ascii_lowercase().as_str() {
        "b" | "black" => Some(Color::Black),
        "w" | "white" => Some(Color::White),
        _ => None,
    }
}

/// Parses a vertex like `D4`, or `pass` as (0, 0). The column letter `I` is
/// not part of the coordinate system and is rejected.
pub fn parse_vertex(input: &str) -> Option<(usize, usize)> {
    let input = input.to_ascii_uppercase();
    if input == "PASS" {
        return Some((0, 0));
    }
    let bytes = input.as_bytes();
    if bytes.len() < 2 {
        return None;
    }

    let letter = bytes[0];
    if !letter.is_ascii_uppercase() || letter == b'I' {
        return None;
    }
    let mut x = (letter - b'A' + 1) as usize;
    if letter > b'I' {
        x -= 1;
    }
    if x > MAX_BOARD_SIZE {
        return None;
    }

    let y: usize = input[1..].parse().ok()?;
    if y < 1 || y > MAX_BOARD_SIZE {
        return None;
    }
    Some((x, y))
}

/// Formats a vertex as a letter-number pair, skipping the `I` column.
/// (0, 0) and other off-board pairs have no vertex form.
pub fn format_vertex(x: usize, y: usize) -> Option<String> {
    if x < 1 || x > MAX_BOARD_SIZE || y < 1 || y > MAX_BOARD_SIZE {
        return None;
    }
    let mut letter = b'A' + x as u8 - 1;
    if letter >= b'I' {
        letter += 1;
    }
    Some(format!("{}{y}", letter as char))
}
