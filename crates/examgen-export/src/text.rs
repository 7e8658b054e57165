//! Plain-text exam, answer sheet and statistics rendering.

use chrono::{DateTime, Local, Utc};

use examgen_core::statistics::{AggregateStats, AnswerDistribution};
use examgen_core::GeneratedExam;

/// Minutes printed in the exam header.
pub const EXAM_DURATION_MINUTES: u32 = 60;

/// Answer-sheet columns per grid row.
pub const ANSWERS_PER_ROW: usize = 5;

/// `dd/mm/yyyy` in local time.
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%d/%m/%Y").to_string()
}

fn rule(width: usize) -> String {
    "=".repeat(width + 1)
}

/// `N. prompt`
pub fn format_question_line(index: usize, text: &str) -> String {
    format!("{index}. {text}")
}

/// `X. option`, prefixed with `*` when it is the revealed correct answer.
pub fn format_option_line(letter: char, text: &str, is_correct: bool) -> String {
    if is_correct {
        format!("*{letter}. {text}")
    } else {
        format!("{letter}. {text}")
    }
}

/// Render one exam. The correct option is starred only when `include_answers`.
pub fn exam_to_text(exam: &GeneratedExam, include_answers: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("ĐỀ THI PHIÊN BẢN {}\n", exam.version));
    out.push_str(&format!("Tổng số câu: {}\n", exam.metadata.total_questions));
    out.push_str(&format!(
        "Thời gian làm bài: {EXAM_DURATION_MINUTES} phút\n"
    ));
    out.push_str(&format!("Ngày tạo: {}\n", format_date(&exam.created_at)));
    out.push_str(&rule(50));
    out.push_str("\n\n");

    for (i, question) in exam.questions.iter().enumerate() {
        out.push_str(&format_question_line(i + 1, &question.text));
        out.push('\n');
        for (&letter, text) in &question.options {
            let is_correct = include_answers && question.correct_answer == Some(letter);
            out.push_str(&format_option_line(letter, text, is_correct));
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

/// Rows of (header line, answer line) for the answer grid.
pub fn answer_grid(exam: &GeneratedExam) -> Vec<(String, String)> {
    exam.questions
        .chunks(ANSWERS_PER_ROW)
        .enumerate()
        .map(|(row, chunk)| {
            let mut header = String::new();
            let mut answers = String::new();
            for (col, question) in chunk.iter().enumerate() {
                let number = row * ANSWERS_PER_ROW + col + 1;
                let answer = question
                    .correct_answer
                    .map_or_else(|| "?".to_string(), |a| a.to_string());
                header.push_str(&format!("{:<8}", format!("Câu {number:02}")));
                answers.push_str(&format!("{answer:<8}"));
            }
            (header, answers)
        })
        .collect()
}

/// One line per letter: `A: 3 câu (30.0%)`.
pub fn answer_distribution_lines(exam: &GeneratedExam) -> Vec<String> {
    let dist = AnswerDistribution::from_exam(exam);
    dist.counts
        .iter()
        .map(|&(letter, count)| {
            format!(
                "{letter}: {count} câu ({:.1}%)",
                dist.percentage(letter)
            )
        })
        .collect()
}

/// Render the answer key of one exam as a grid plus the letter distribution.
pub fn answer_sheet_text(exam: &GeneratedExam) -> String {
    let mut out = String::new();
    out.push_str(&format!("ĐÁP ÁN ĐỀ THI PHIÊN BẢN {}\n", exam.version));
    out.push_str(&format!("Ngày tạo: {}\n", format_date(&exam.created_at)));
    out.push_str(&rule(30));
    out.push_str("\n\n");

    for (header, answers) in answer_grid(exam) {
        out.push_str(&header);
        out.push('\n');
        out.push_str(&answers);
        out.push_str("\n\n");
    }

    out.push_str("\nTHỐNG KÊ ĐÁP ÁN:\n");
    for line in answer_distribution_lines(exam) {
        out.push_str(&line);
        out.push('\n');
    }

    out
}

/// Per-version difficulty/type counts plus averages.
pub fn statistics_text(exams: &[GeneratedExam]) -> String {
    let stats = AggregateStats::from_exams(exams);
    let created = exams.first().map_or_else(Utc::now, |e| e.created_at);

    let mut out = String::new();
    out.push_str("THỐNG KÊ TỔNG QUAN CÁC ĐỀ THI\n");
    out.push_str(&format!("Số lượng đề: {}\n", stats.exam_count));
    out.push_str(&format!("Ngày tạo: {}\n", format_date(&created)));
    out.push_str(&rule(40));
    out.push_str("\n\n");

    for (version, m) in &stats.per_version {
        out.push_str(&format!("ĐỀ {version}:\n"));
        out.push_str(&format!("  Tổng câu hỏi: {}\n", m.total_questions));
        out.push_str(&format!(
            "  Độ khó - Dễ: {}, TB: {}, Khó: {}\n",
            m.difficulty.easy, m.difficulty.medium, m.difficulty.hard
        ));
        out.push_str(&format!(
            "  Loại - LT: {}, TT: {}\n\n",
            m.question_type.theory, m.question_type.practice
        ));
    }

    out.push_str("TRUNG BÌNH:\n");
    out.push_str(&format!("  Câu dễ: {:.1}\n", stats.avg_easy));
    out.push_str(&format!("  Câu TB: {:.1}\n", stats.avg_medium));
    out.push_str(&format!("  Câu khó: {:.1}\n", stats.avg_hard));

    out
}
