//! The `examgen preview` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use examgen_core::config::load_config_from;
use examgen_core::parse_document;
use examgen_export::html::write_html_preview;
use examgen_export::text::exam_to_text;

use super::{generator, read_input, SettingsArgs};

pub fn execute(
    input: PathBuf,
    settings_args: SettingsArgs,
    seed: Option<u64>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let mut settings = config.exam;
    settings_args.apply(&mut settings);
    settings.version_count = 1;
    settings.validate()?;

    let content = read_input(&input)?;
    let doc = parse_document(&content)?;
    let mut generator = generator(seed);

    match output {
        Some(path) => {
            let result = generator.generate_exams(&doc, &settings, None)?;
            write_html_preview(&result, &path)?;
            println!("HTML preview: {}", path.display());
        }
        None => {
            let exam = generator.generate_preview(&doc, &settings).with_context(|| {
                format!(
                    "cannot preview {} questions from a bank of {}",
                    settings.question_count, doc.total_questions
                )
            })?;
            print!("{}", exam_to_text(&exam, true));
        }
    }

    Ok(())
}
