use clap::Parser;

use osipenko::cli::{self, Cli};
use osipenko::utils::logging;

fn main() {
    logging::init_info();

    let cli = Cli::parse();
    match cli::run(&cli) {
        Ok((xs, ys)) => {
            println!("Produced {} points.", xs.len());
            if let (Some(&x), Some(&y)) = (xs.first(), ys.first()) {
                println!("First point: ({x}, {y})");
            }
        }
        Err(err) => {
            eprintln!("osipenko: {err}");
            std::process::exit(1);
        }
    }
}
