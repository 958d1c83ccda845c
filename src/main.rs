use std::env;
use std::io;
use std::process;

use montego::engine::{Config, Engine};
use montego::gtp;

fn usage(program: &str) -> ! {
    eprintln!("usage: {program} [sample-count]");
    process::exit(1);
}

fn main() {
    env_logger::init();

    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "montego".to_string());
    let sample_count = match (args.next(), args.next()) {
        (None, _) => Config::default().sample_count,
        (Some(arg), None) => match arg.parse() {
            Ok(count) => count,
            Err(_) => usage(&program),
        },
        _ => usage(&program),
    };

    let mut engine = Engine::with_config(Config {
        sample_count,
        ..Config::default()
    });

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(err) = gtp::run(&mut engine, stdin.lock(), stdout.lock()) {
        eprintln!("unexpected error: {err}");
        process::exit(1);
    }
}
