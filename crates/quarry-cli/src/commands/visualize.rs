//! Visualize command - render saved results as standalone HTML.

use std::path::PathBuf;

use colored::Colorize;
use quarry::visualize;

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    open_in_browser: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let html = visualize::visualize_file(&file)?;
    if verbose {
        println!("Rendered {} bytes of HTML", html.len());
    }

    let output_path = output.unwrap_or_else(|| {
        let mut p = file.clone();
        p.set_extension("html");
        p
    });
    std::fs::write(&output_path, html)?;

    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    if open_in_browser {
        open::that(&output_path)?;
    } else {
        println!("Open this file in a browser to see the interactive results.");
    }

    Ok(())
}
