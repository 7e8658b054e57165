//! The `examgen init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("examgen.toml").exists() {
        println!("examgen.toml already exists, skipping.");
    } else {
        std::fs::write("examgen.toml", SAMPLE_CONFIG)?;
        println!("Created examgen.toml");
    }

    std::fs::create_dir_all("question-sets")?;
    let sample_path = Path::new("question-sets/sample.txt");
    if sample_path.exists() {
        println!("question-sets/sample.txt already exists, skipping.");
    } else {
        std::fs::write(sample_path, SAMPLE_QUESTIONS)?;
        println!("Created question-sets/sample.txt");
    }

    println!("\nNext steps:");
    println!("  1. Replace question-sets/sample.txt with your own question bank");
    println!("  2. Run: examgen validate --input question-sets/sample.txt");
    println!("  3. Run: examgen generate --input question-sets/sample.txt --questions 6 --versions 2");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# examgen configuration

[exam]
question_count = 20
version_count = 3
easy_percent = 40
medium_percent = 40
hard_percent = 20
theory_ratio = 0.5

[export]
format = "txt"
include_answers = false
separate_answer_sheet = true
include_statistics = true
output_dir = "./examgen-output"
"#;

const SAMPLE_QUESTIONS: &str = include_str!("../../question-sets/sample.txt");
