//! The `examgen parse` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use examgen_core::model::{self, Difficulty, QuestionType};
use examgen_core::{parse_document, ParsedDocument};

use super::read_input;

pub fn execute(input: PathBuf, json: bool) -> Result<()> {
    let content = read_input(&input)?;
    let doc = parse_document(&content)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    let answered = doc
        .questions
        .iter()
        .filter(|q| q.correct_answer.is_some())
        .count();
    println!(
        "Parsed {} questions from {} ({answered} with a known answer)",
        doc.total_questions,
        input.display()
    );
    println!("{}", pool_table(&doc));

    if !doc.categorized.has_sufficient_categories() {
        println!("Note: the bank lacks theory or practice questions; exams will be drawn uniformly.");
    }

    Ok(())
}

/// The 2x3 type/difficulty grid with row totals.
pub fn pool_table(doc: &ParsedDocument) -> Table {
    let mut table = Table::new();
    let mut header = vec![Cell::new("")];
    header.extend(Difficulty::CONCRETE.iter().map(|d| Cell::new(d.label())));
    header.push(Cell::new("Tổng"));
    table.set_header(header);

    for question_type in QuestionType::CONCRETE {
        let mut row = vec![Cell::new(question_type.label())];
        for difficulty in Difficulty::CONCRETE {
            let count = doc
                .categorized
                .cell(model::Cell {
                    question_type,
                    difficulty,
                })
                .len();
            row.push(Cell::new(count));
        }
        row.push(Cell::new(doc.categorized.type_total(question_type)));
        table.add_row(row);
    }

    table
}
