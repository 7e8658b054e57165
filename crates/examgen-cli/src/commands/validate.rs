//! The `examgen validate` command.

use std::path::PathBuf;

use anyhow::Result;

use examgen_core::parse_document;
use examgen_core::parser::validate_content;

use super::parse::pool_table;
use super::read_input;

pub fn execute(input: PathBuf) -> Result<()> {
    let content = read_input(&input)?;

    let warnings = validate_content(&content);
    for w in &warnings {
        println!("  WARNING: {}", w.message);
    }

    let doc = parse_document(&content)?;
    println!("{}: {} questions", input.display(), doc.total_questions);
    println!("{}", pool_table(&doc));

    if warnings.is_empty() {
        println!("Question bank looks valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
