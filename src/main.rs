//! Semana CLI — weekly meal plans from declarative data.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "semana",
    version,
    about = "Constraint-based weekly meal scheduler with portion-resolved shopping lists"
)]
struct Cli {
    #[command(subcommand)]
    command: semana::cli::Commands,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = semana::cli::dispatch(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(e.exit_code());
    }
}
