//! # Loopsong
//!
//! Play a song for at least a given number of seconds, looping a section of
//! it as needed and fading out at the end.

use log::error;

mod cli;
mod logging;
mod progress;
mod runner;

fn main() {
    dotenv::dotenv().ok();
    logging::init();

    let args = cli::args::build_cli().get_matches();

    let code = match runner::run(&args) {
        Ok(code) => code,
        Err(err) => {
            error!("{}", err.to_string().to_lowercase());
            1
        }
    };

    std::process::exit(code)
}
