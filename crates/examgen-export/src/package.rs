//! Zip exam package: exams, answer sheets, statistics and a README.

use std::io::{Cursor, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use examgen_core::config::{ExportFormat, ExportOptions};
use examgen_core::GeneratedExam;

use crate::docx::{answer_sheet_to_docx, exam_to_docx};
use crate::text::{answer_sheet_text, exam_to_text, statistics_text};

const EXAM_DIR: &str = "de-thi";
const ANSWER_DIR: &str = "dap-an";
const STATISTICS_FILE: &str = "ThongKe.txt";
const README_FILE: &str = "README.txt";

/// Progress callbacks while a package is assembled.
pub trait PackageProgress {
    fn on_progress(&self, current: usize, total: usize, status: &str);
}

/// No-op progress reporter.
pub struct NoopProgress;

impl PackageProgress for NoopProgress {
    fn on_progress(&self, _: usize, _: usize, _: &str) {}
}

fn exam_entry(version: usize, format: ExportFormat) -> String {
    format!("{EXAM_DIR}/De{version:02}.{}", format.extension())
}

fn answer_entry(version: usize, format: ExportFormat) -> String {
    format!("{ANSWER_DIR}/DapAn{version:02}.{}", format.extension())
}

/// `DeThiTuDong_YYYYMMDD_Nde.zip`
pub fn package_file_name(date: NaiveDate, exam_count: usize) -> String {
    format!("DeThiTuDong_{}_{exam_count}de.zip", date.format("%Y%m%d"))
}

/// Entry names `create_exam_package` would write, sorted.
pub fn package_preview(exams: &[GeneratedExam], options: &ExportOptions) -> Vec<String> {
    let mut files = vec![README_FILE.to_string()];
    for exam in exams {
        files.push(exam_entry(exam.version, options.format));
        if options.separate_answer_sheet {
            files.push(answer_entry(exam.version, options.format));
        }
    }
    if options.include_statistics {
        files.push(STATISTICS_FILE.to_string());
    }
    files.sort();
    files
}

fn readme(exam_count: usize, options: &ExportOptions) -> String {
    let ext = options.format.extension();
    let mut content = String::from("HƯỚNG DẪN SỬ DỤNG\n\nGói đề thi này bao gồm:\n");
    content.push_str(&format!(
        "- {exam_count} đề thi (.{ext}) trong thư mục '{EXAM_DIR}/'\n"
    ));
    if options.separate_answer_sheet {
        content.push_str(&format!(
            "- Đáp án tương ứng (.{ext}) trong thư mục '{ANSWER_DIR}/'\n"
        ));
    }
    if options.include_statistics {
        content.push_str(&format!("- File thống kê '{STATISTICS_FILE}'\n"));
    }
    content.push_str(&format!(
        "\n\nNgày tạo: {}\nTạo bởi: examgen - công cụ tạo đề thi tự động",
        Local::now().format("%H:%M:%S %d/%m/%Y")
    ));
    content
}

/// Build the zip package in memory.
///
/// Exam files never reveal answers, whatever `options.include_answers` says;
/// answers live only in the `dap-an/` sheets.
pub fn create_exam_package(
    exams: &[GeneratedExam],
    options: &ExportOptions,
    progress: &dyn PackageProgress,
) -> Result<Vec<u8>> {
    let per_exam = if options.separate_answer_sheet { 2 } else { 1 };
    let total = exams.len() * per_exam + usize::from(options.include_statistics);
    let mut current = 0;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let file_options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut add = |name: &str, body: &[u8]| -> Result<()> {
        zip.start_file(name, file_options)
            .with_context(|| format!("failed to start package entry {name}"))?;
        zip.write_all(body)
            .with_context(|| format!("failed to write package entry {name}"))?;
        Ok(())
    };

    for exam in exams {
        current += 1;
        progress.on_progress(current, total, &format!("Tạo đề {}...", exam.version));
        let body = match options.format {
            ExportFormat::Txt => exam_to_text(exam, false).into_bytes(),
            ExportFormat::Docx => exam_to_docx(exam, false)?,
        };
        add(&exam_entry(exam.version, options.format), &body)?;

        if options.separate_answer_sheet {
            current += 1;
            progress.on_progress(
                current,
                total,
                &format!("Tạo đáp án đề {}...", exam.version),
            );
            let body = match options.format {
                ExportFormat::Txt => answer_sheet_text(exam).into_bytes(),
                ExportFormat::Docx => answer_sheet_to_docx(exam)?,
            };
            add(&answer_entry(exam.version, options.format), &body)?;
        }
    }

    if options.include_statistics {
        current += 1;
        progress.on_progress(current, total, "Tạo file thống kê...");
        add(STATISTICS_FILE, statistics_text(exams).as_bytes())?;
    }

    add(README_FILE, readme(exams.len(), options).as_bytes())?;
    progress.on_progress(total, total, "Hoàn thành!");

    let cursor = zip.finish().context("failed to finish package archive")?;
    tracing::debug!(entries = total + 1, "built exam package");
    Ok(cursor.into_inner())
}

/// Build the package and write it to `options.output_dir`, returning its path.
pub fn write_exam_package(
    exams: &[GeneratedExam],
    options: &ExportOptions,
    progress: &dyn PackageProgress,
) -> Result<PathBuf> {
    let bytes = create_exam_package(exams, options, progress)?;
    std::fs::create_dir_all(&options.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            options.output_dir.display()
        )
    })?;
    let path = options
        .output_dir
        .join(package_file_name(Local::now().date_naive(), exams.len()));
    std::fs::write(&path, bytes)
        .with_context(|| format!("failed to write package {}", path.display()))?;
    tracing::info!("wrote exam package to {}", path.display());
    Ok(path)
}
