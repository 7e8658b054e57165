//! `.docx` rendering and text extraction on top of `docx-rs`.

use std::io::Cursor;

use anyhow::{Context, Result};
use docx_rs::{
    AlignmentType, DocumentChild, Docx, Paragraph, ParagraphChild, Run, RunChild, RunFonts, Table,
    TableCellContent, TableChild, TableRowChild,
};

use examgen_core::GeneratedExam;

use crate::text::{
    answer_distribution_lines, answer_grid, format_date, format_option_line,
    format_question_line, EXAM_DURATION_MINUTES,
};

const GRID_FONT: &str = "Courier New";

/// Drop characters XML 1.0 cannot carry. Word refuses to open a
/// `document.xml` holding C0 controls other than tab and line breaks.
fn xml_safe(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            !(c.is_control() && !matches!(c, '\t' | '\n' | '\r'))
                && !matches!(c, '\u{FFFE}' | '\u{FFFF}')
        })
        .collect()
}

fn text_run(text: &str) -> Run {
    Run::new().add_text(xml_safe(text))
}

fn title(text: &str) -> Paragraph {
    Paragraph::new()
        .add_run(text_run(text).bold().size(32))
        .align(AlignmentType::Center)
}

fn centered_line(text: &str, size: usize) -> Paragraph {
    Paragraph::new()
        .add_run(text_run(text).size(size))
        .align(AlignmentType::Center)
}

fn line(run: Run) -> Paragraph {
    Paragraph::new().add_run(run)
}

fn grid_run(text: &str) -> Run {
    text_run(text).fonts(RunFonts::new().ascii(GRID_FONT).hi_ansi(GRID_FONT))
}

fn pack(docx: Docx) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .context("failed to pack .docx archive")?;
    Ok(cursor.into_inner())
}

/// Build the exam as a `.docx`. Correct options are bold and starred when
/// `include_answers` is set.
pub fn exam_to_docx(exam: &GeneratedExam, include_answers: bool) -> Result<Vec<u8>> {
    let mut docx = Docx::new()
        .add_paragraph(title(&format!("ĐỀ THI PHIÊN BẢN {}", exam.version)))
        .add_paragraph(centered_line(
            &format!("Tổng số câu: {}", exam.metadata.total_questions),
            24,
        ))
        .add_paragraph(centered_line(
            &format!("Thời gian làm bài: {EXAM_DURATION_MINUTES} phút"),
            24,
        ))
        .add_paragraph(centered_line(
            &format!("Ngày tạo: {}", format_date(&exam.created_at)),
            24,
        ))
        .add_paragraph(centered_line(&"=".repeat(51), 20))
        .add_paragraph(Paragraph::new());

    for (i, question) in exam.questions.iter().enumerate() {
        docx = docx.add_paragraph(line(
            text_run(&format_question_line(i + 1, &question.text))
                .bold()
                .size(24),
        ));
        for (&letter, text) in &question.options {
            let is_correct = include_answers && question.correct_answer == Some(letter);
            let mut run = text_run(&format_option_line(letter, text, is_correct)).size(22);
            if is_correct {
                run = run.bold();
            }
            docx = docx.add_paragraph(line(run));
        }
        docx = docx.add_paragraph(Paragraph::new());
    }

    tracing::debug!(version = exam.version, "rendered exam docx");
    pack(docx)
}

/// Build the answer sheet as a `.docx` with a monospace grid.
pub fn answer_sheet_to_docx(exam: &GeneratedExam) -> Result<Vec<u8>> {
    let mut docx = Docx::new()
        .add_paragraph(title(&format!("ĐÁP ÁN ĐỀ THI PHIÊN BẢN {}", exam.version)))
        .add_paragraph(centered_line(
            &format!("Ngày tạo: {}", format_date(&exam.created_at)),
            24,
        ))
        .add_paragraph(centered_line(&"=".repeat(31), 20))
        .add_paragraph(Paragraph::new());

    for (header, answers) in answer_grid(exam) {
        docx = docx
            .add_paragraph(line(grid_run(&header)))
            .add_paragraph(line(grid_run(&answers).bold()))
            .add_paragraph(Paragraph::new());
    }

    docx = docx.add_paragraph(line(text_run("THỐNG KÊ ĐÁP ÁN:").bold().size(24)));
    for stat in answer_distribution_lines(exam) {
        docx = docx.add_paragraph(line(text_run(&stat).size(22)));
    }

    pack(docx)
}

fn run_text(run: &Run, out: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => out.push_str(&t.text),
            RunChild::Tab(_) => out.push('\t'),
            RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}

fn paragraph_children_text(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => run_text(run, out),
            ParagraphChild::Hyperlink(link) => paragraph_children_text(&link.children, out),
            _ => {}
        }
    }
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    paragraph_children_text(&paragraph.children, &mut text);
    text
}

/// Table cells are read row by row, one line per cell paragraph.
fn table_lines(table: &Table, lines: &mut Vec<String>) {
    for row in &table.rows {
        let TableChild::TableRow(row) = row;
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell;
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(p) => lines.push(paragraph_text(p)),
                    TableCellContent::Table(nested) => table_lines(nested, lines),
                    _ => {}
                }
            }
        }
    }
}

/// Collapse runs of blank lines to one blank line and trim the ends.
fn collapse_blank_lines(text: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    for line in text.lines() {
        let blank = line.trim().is_empty();
        if blank && kept.last().is_some_and(|l| l.is_empty()) {
            continue;
        }
        kept.push(if blank { "" } else { line });
    }
    kept.join("\n").trim().to_string()
}

/// Extract the plain text of a `.docx`, one line per paragraph.
///
/// Line endings are normalized to `\n`, runs of blank lines collapse to a
/// single blank line, and the result is trimmed. An empty body is an error.
pub fn read_docx_text(bytes: &[u8]) -> Result<String> {
    let docx = docx_rs::read_docx(bytes).context("not a valid .docx file")?;

    let mut lines = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(p) => lines.push(paragraph_text(p)),
            DocumentChild::Table(table) => table_lines(table, &mut lines),
            _ => {}
        }
    }

    let normalized = lines.join("\n").replace("\r\n", "\n").replace('\r', "\n");
    let text = collapse_blank_lines(&normalized);

    if text.is_empty() {
        anyhow::bail!("the .docx document has no text content");
    }
    tracing::debug!(chars = text.len(), "extracted docx text");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use docx_rs::{TableCell, TableRow};
    use zip::ZipArchive;

    use super::*;
    use crate::test_support::sample_exam;

    fn document_xml(bytes: &[u8]) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        xml
    }

    #[test]
    fn exam_docx_reads_back() {
        let exam = sample_exam();
        let bytes = exam_to_docx(&exam, false).unwrap();
        let text = read_docx_text(&bytes).unwrap();

        assert!(text.starts_with("ĐỀ THI PHIÊN BẢN 1"));
        assert!(text.contains(&format!("1. {}", exam.questions[0].text)));
        assert!(!text.lines().any(|l| l.starts_with('*')));
    }

    #[test]
    fn revealed_answers_are_starred() {
        let exam = sample_exam();
        let text = read_docx_text(&exam_to_docx(&exam, true).unwrap()).unwrap();
        assert!(text.lines().any(|l| l.starts_with('*')));
    }

    #[test]
    fn answer_sheet_keeps_grid_padding() {
        let exam = sample_exam();
        let text = read_docx_text(&answer_sheet_to_docx(&exam).unwrap()).unwrap();
        assert!(text.contains("Câu 01  Câu 02"));
        assert!(text.contains("THỐNG KÊ ĐÁP ÁN:"));
    }

    #[test]
    fn special_characters_survive() {
        let bytes = pack(Docx::new().add_paragraph(line(text_run("a < b && c > \"d\"")))).unwrap();
        assert_eq!(read_docx_text(&bytes).unwrap(), "a < b && c > \"d\"");
    }

    #[test]
    fn control_characters_are_dropped_from_document_xml() {
        let mut exam = sample_exam();
        exam.questions[0].text = "page\u{C}break\u{1}here".to_string();

        let bytes = exam_to_docx(&exam, true).unwrap();
        let xml = document_xml(&bytes);
        assert!(!xml.contains('\u{C}'));
        assert!(!xml.contains('\u{1}'));
        assert!(xml.contains("pagebreakhere"));

        let text = read_docx_text(&bytes).unwrap();
        assert!(text.contains("1. pagebreakhere"));
    }

    #[test]
    fn xml_safe_keeps_tabs_and_vietnamese() {
        assert_eq!(xml_safe("Câu\t1\u{B}\u{0}: Đúng"), "Câu\t1: Đúng");
    }

    #[test]
    fn runs_within_a_paragraph_keep_their_order() {
        let paragraph = Paragraph::new()
            .add_run(Run::new().add_text("Câu 1: Outer prompt"))
            .add_run(Run::new().add_tab().add_text("middle"))
            .add_run(Run::new().add_text(" tail of outer"));
        let bytes = pack(
            Docx::new()
                .add_paragraph(paragraph)
                .add_paragraph(line(Run::new().add_text("A. one"))),
        )
        .unwrap();

        assert_eq!(
            read_docx_text(&bytes).unwrap(),
            "Câu 1: Outer prompt\tmiddle tail of outer\nA. one"
        );
    }

    #[test]
    fn table_cells_are_read_as_lines() {
        let cell = |text: &str| TableCell::new().add_paragraph(line(Run::new().add_text(text)));
        let table = Table::new(vec![TableRow::new(vec![cell("A. left"), cell("B. right")])]);
        let bytes = pack(
            Docx::new()
                .add_paragraph(line(Run::new().add_text("Câu 1: Pick one")))
                .add_table(table),
        )
        .unwrap();

        assert_eq!(
            read_docx_text(&bytes).unwrap(),
            "Câu 1: Pick one\nA. left\nB. right"
        );
    }

    #[test]
    fn blank_runs_collapse() {
        let bytes = pack(
            Docx::new()
                .add_paragraph(Paragraph::new())
                .add_paragraph(line(Run::new().add_text("first")))
                .add_paragraph(Paragraph::new())
                .add_paragraph(line(Run::new().add_text("   ")))
                .add_paragraph(Paragraph::new())
                .add_paragraph(line(Run::new().add_text("second")))
                .add_paragraph(Paragraph::new()),
        )
        .unwrap();
        assert_eq!(read_docx_text(&bytes).unwrap(), "first\n\nsecond");
    }

    #[test]
    fn empty_document_is_an_error() {
        let bytes = pack(Docx::new().add_paragraph(Paragraph::new())).unwrap();
        let err = read_docx_text(&bytes).unwrap_err();
        assert!(err.to_string().contains("no text content"));
    }

    #[test]
    fn garbage_is_not_a_docx() {
        assert!(read_docx_text(b"definitely not a zip").is_err());
    }
}
