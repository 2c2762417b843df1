//! Quarry CLI - structured extraction from the command line.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            file,
            task,
            provider,
            model,
            output,
            passes,
            max_char_buffer,
        } => commands::extract::run(
            file,
            task,
            provider,
            model,
            output,
            passes,
            max_char_buffer,
            cli.verbose,
        ),

        Commands::Visualize { file, output, open } => {
            commands::visualize::run(file, output, open, cli.verbose)
        }

        Commands::Status { file, json } => commands::status::run(file, json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
