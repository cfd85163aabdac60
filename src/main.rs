#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

use std::io::{self, Write};
use std::process;

use log::LevelFilter;

mod cli;
mod tools;
mod utils;


fn main() {
    let matches = cli::build_cli().get_matches();

    let verbose = match matches.subcommand() {
        (_, Some(m)) => m.is_present("verbose"),
        _ => false,
    };
    let level = if verbose { LevelFilter::Info } else { LevelFilter::Warn };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(err) = cli::run(&matches) {
        let _ = writeln!(io::stderr(), "error: {}", err);
        process::exit(1);
    }
    process::exit(0);
}
