//! Status command - summarize saved extraction results.

use std::collections::BTreeMap;
use std::path::PathBuf;

use colored::Colorize;
use quarry::io;
use serde_json::json;

pub fn run(file: PathBuf, as_json: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let documents = io::load_annotated_documents(&file)?;

    let mut by_class: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_status: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut total = 0usize;
    let mut aligned = 0usize;

    for document in &documents {
        for extraction in &document.extractions {
            total += 1;
            *by_class.entry(extraction.extraction_class.clone()).or_insert(0) += 1;
            let status = match extraction.alignment_status {
                Some(s) => s.label(),
                None => "Unaligned",
            };
            *by_status.entry(status).or_insert(0) += 1;
            if extraction.is_aligned() {
                aligned += 1;
            }
        }
    }

    if as_json {
        let summary = json!({
            "file": file.display().to_string(),
            "documents": documents.len(),
            "extractions": total,
            "aligned": aligned,
            "by_class": by_class,
            "by_alignment": by_status,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} document{}, {} extractions ({} aligned)",
        documents.len().to_string().white().bold(),
        if documents.len() == 1 { "" } else { "s" },
        total.to_string().white().bold(),
        aligned.to_string().green()
    );

    if total == 0 {
        println!("{}", "No extractions recorded.".yellow());
        return Ok(());
    }

    println!();
    println!("{}", "By class:".yellow().bold());
    for (class, count) in &by_class {
        println!("  {:24} {}", class, count);
    }

    println!();
    println!("{}", "By alignment:".yellow().bold());
    for (status, count) in &by_status {
        println!("  {:24} {}", status, count);
    }

    if verbose {
        println!();
        for document in &documents {
            println!(
                "  {} - {} extractions, {:.0}% aligned",
                document.document_id,
                document.extractions.len(),
                document.alignment_ratio() * 100.0
            );
        }
    }

    Ok(())
}
