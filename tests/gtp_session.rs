//! End-to-end protocol sessions against a real engine.

use montego::engine::{Config, Engine};
use montego::gtp;
use montego::rng::PrngRandomness;

fn engine(sample_count: usize) -> Engine {
    Engine::with_config(Config {
        sample_count,
        randomness: Some(Box::new(PrngRandomness::seeded(99))),
        ..Config::default()
    })
}

fn check_session(engine: &mut Engine, input: &str, expected: &str) {
    let mut output = Vec::new();
    gtp::run(engine, input.as_bytes(), &mut output).unwrap();
    assert_eq!(String::from_utf8(output).unwrap(), expected);
}

#[test]
fn a_short_game_session() {
    check_session(
        &mut engine(20),
        "protocol_version\n\
         boardsize 3\n\
         komi 1.5\n\
         play black b2\n\
         showboard\n\
         quit\n",
        "= 2\n\n\
         = \n\n\
         = \n\n\
         = \n\n\
         = ...\n.@.\n...\n\n\
         = \n\n",
    );
}

#[test]
fn genmove_passes_on_a_full_point() {
    check_session(
        &mut engine(20),
        "boardsize 1\ngenmove black\nquit\n",
        "= \n\n= pass\n\n= \n\n",
    );
}

#[test]
fn illegal_moves_and_bad_commands_are_reported() {
    check_session(
        &mut engine(20),
        "boardsize 99\n\
         play black a1\n\
         play white a1\n\
         hug_opponent\n\
         quit\n",
        "? unacceptable size\n\n\
         = \n\n\
         ? illegal move\n\n\
         ? unknown command\n\n\
         = \n\n",
    );
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    check_session(
        &mut engine(20),
        "# a comment\n\nname\nquit\n",
        "= montego\n\n= \n\n",
    );
}
