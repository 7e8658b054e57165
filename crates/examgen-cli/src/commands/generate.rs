//! The `examgen generate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use examgen_core::config::{load_config_from, ExportFormat};
use examgen_core::parser::validate_content;
use examgen_core::{parse_answer_key, parse_document, ExamGenerationResult};
use examgen_export::docx::exam_to_docx;
use examgen_export::text::exam_to_text;
use examgen_export::{write_exam_package, PackageProgress};

use super::{generator, read_input, SettingsArgs};

/// Console progress reporter.
struct ConsoleProgress;

impl PackageProgress for ConsoleProgress {
    fn on_progress(&self, current: usize, total: usize, status: &str) {
        eprintln!("  [{current}/{total}] {status}");
    }
}

pub struct GenerateArgs {
    pub input: PathBuf,
    pub settings: SettingsArgs,
    pub answers: Option<String>,
    pub seed: Option<u64>,
    pub format: Option<String>,
    pub include_answers: bool,
    pub output: Option<PathBuf>,
    pub save_json: bool,
    pub config: Option<PathBuf>,
}

pub fn execute(args: GenerateArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;

    let mut settings = config.exam;
    args.settings.apply(&mut settings);
    settings.validate()?;

    let mut export = config.export;
    if let Some(format) = &args.format {
        export.format = format
            .parse::<ExportFormat>()
            .map_err(|e| anyhow::anyhow!(e))?;
    }
    if args.include_answers {
        export.include_answers = true;
    }
    if let Some(output) = args.output {
        export.output_dir = output;
    }

    let answer_key = args.answers.as_deref().map(parse_answer_key).transpose()?;

    let content = read_input(&args.input)?;
    for w in validate_content(&content) {
        tracing::warn!("{}", w.message);
    }
    let doc = parse_document(&content)?;
    eprintln!(
        "examgen v{}: {} questions parsed, generating {} version(s) x {} questions",
        env!("CARGO_PKG_VERSION"),
        doc.total_questions,
        settings.version_count,
        settings.question_count
    );
    if !doc.categorized.has_sufficient_categories() {
        tracing::warn!("bank lacks theory or practice questions, sampling uniformly");
    }

    let result = generator(args.seed).generate_exams(&doc, &settings, answer_key.as_ref())?;

    let package = write_exam_package(&result.exams, &export, &ConsoleProgress)?;
    println!("Package: {}", package.display());

    if export.include_answers {
        for exam in &result.exams {
            let path = export.output_dir.join(format!(
                "De{:02}_CoDapAn.{}",
                exam.version,
                export.format.extension()
            ));
            let body = match export.format {
                ExportFormat::Txt => exam_to_text(exam, true).into_bytes(),
                ExportFormat::Docx => exam_to_docx(exam, true)?,
            };
            std::fs::write(&path, body)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Answer copy: {}", path.display());
        }
    }

    if args.save_json {
        let timestamp = result.generated_at.format("%Y-%m-%dT%H%M%S");
        let path = export.output_dir.join(format!("result-{timestamp}.json"));
        result.save_json(&path)?;
        println!("Result saved to: {}", path.display());
    }

    print_summary(&result);
    Ok(())
}

fn print_summary(result: &ExamGenerationResult) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Đề", "Số câu", "Dễ", "TB", "Khó", "LT", "TT"]);

    for exam in &result.exams {
        let m = &exam.metadata;
        table.add_row(vec![
            Cell::new(exam.version),
            Cell::new(m.total_questions),
            Cell::new(m.difficulty.easy),
            Cell::new(m.difficulty.medium),
            Cell::new(m.difficulty.hard),
            Cell::new(m.question_type.theory),
            Cell::new(m.question_type.practice),
        ]);
    }

    println!("{table}");
}
