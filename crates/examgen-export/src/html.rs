//! HTML exam preview.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::Result;
use std::path::Path;

use examgen_core::model::{Cell, Difficulty, QuestionType};
use examgen_core::{ExamGenerationResult, GeneratedExam};

use crate::text::format_date;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn difficulty_class(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "easy",
        Difficulty::Medium => "medium",
        Difficulty::Hard => "hard",
        Difficulty::Unknown => "unknown",
    }
}

/// Generate an HTML preview of a generation result.
pub fn generate_html(result: &ExamGenerationResult) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"vi\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>examgen preview: {} đề</title>\n",
        result.exams.len()
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str("<h1>Xem trước đề thi</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">{} đề | {} câu mỗi đề | ngân hàng {} câu | {}</p>\n",
        result.exams.len(),
        result.settings.question_count,
        result.source_stats.total_questions,
        format_date(&result.generated_at)
    ));
    html.push_str(
        "<button type=\"button\" onclick=\"toggleAnswers()\">Hiện / ẩn đáp án</button>\n",
    );
    html.push_str("</header>\n");

    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Ngân hàng câu hỏi</h2>\n");
    html.push_str(&pool_table(result));
    html.push_str("<h2>Tổng quan</h2>\n");
    html.push_str(&summary_table(&result.exams));
    html.push_str("</section>\n");

    for exam in &result.exams {
        html.push_str(&exam_section(exam));
    }

    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(result)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML preview to a file.
pub fn write_html_preview(result: &ExamGenerationResult, path: &Path) -> Result<()> {
    let html = generate_html(result);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn pool_table(result: &ExamGenerationResult) -> String {
    let pool = &result.source_stats.categorized;
    let mut table = String::from("<table class=\"pool\">\n<thead><tr><th></th>");
    for difficulty in Difficulty::CONCRETE {
        table.push_str(&format!("<th>{}</th>", difficulty.label()));
    }
    table.push_str("<th>Tổng</th></tr></thead>\n<tbody>\n");
    for question_type in QuestionType::CONCRETE {
        table.push_str(&format!("<tr><th>{}</th>", question_type.label()));
        for difficulty in Difficulty::CONCRETE {
            let count = pool
                .cell(Cell {
                    question_type,
                    difficulty,
                })
                .len();
            let class = if count == 0 { " class=\"empty\"" } else { "" };
            table.push_str(&format!("<td{class}>{count}</td>"));
        }
        table.push_str(&format!("<td>{}</td></tr>\n", pool.type_total(question_type)));
    }
    table.push_str("</tbody></table>\n");
    table
}

fn summary_table(exams: &[GeneratedExam]) -> String {
    let mut table = String::from("<table class=\"summary\">\n");
    table.push_str("<thead><tr><th>Đề</th><th>Số câu</th><th>Dễ</th><th>TB</th><th>Khó</th><th>LT</th><th>TT</th></tr></thead>\n");
    table.push_str("<tbody>\n");
    for exam in exams {
        let m = &exam.metadata;
        table.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            exam.version,
            m.total_questions,
            m.difficulty.easy,
            m.difficulty.medium,
            m.difficulty.hard,
            m.question_type.theory,
            m.question_type.practice,
        ));
    }
    table.push_str("</tbody></table>\n");
    table
}

fn exam_section(exam: &GeneratedExam) -> String {
    let mut section = format!(
        "<section class=\"exam\" id=\"{}\">\n<h2>Đề {}</h2>\n",
        html_escape(&exam.id),
        exam.version
    );
    for (i, question) in exam.questions.iter().enumerate() {
        section.push_str("<article class=\"question\">\n");
        section.push_str(&format!(
            "<p class=\"prompt\"><span class=\"number\">{}.</span> {} \
             <span class=\"badge {}\">{}</span> <span class=\"badge type\">{}</span></p>\n",
            i + 1,
            html_escape(&question.text),
            difficulty_class(question.difficulty),
            question.difficulty.label(),
            question.question_type.label(),
        ));
        section.push_str("<ul class=\"options\">\n");
        for (&letter, text) in &question.options {
            let class = if question.correct_answer == Some(letter) {
                " class=\"correct\""
            } else {
                ""
            };
            section.push_str(&format!(
                "<li{class}><strong>{letter}.</strong> {}</li>\n",
                html_escape(text)
            ));
        }
        section.push_str("</ul>\n</article>\n");
    }
    section.push_str("</section>\n");
    section
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --correct: #dcfce7; --empty: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --correct: #064e3b; --empty: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
td.empty { background: var(--empty); }
.question { border: 1px solid var(--border); border-radius: 8px; padding: 0.5rem 1rem; margin: 0.75rem 0; }
.prompt { font-weight: 600; }
.options { list-style: none; padding-left: 1rem; }
.badge { font-size: 0.75rem; font-weight: normal; padding: 0.1rem 0.5rem; border-radius: 999px; background: var(--border); }
.badge.easy { background: #bbf7d0; color: #14532d; }
.badge.medium { background: #fef08a; color: #713f12; }
.badge.hard { background: #fecaca; color: #7f1d1d; }
body.show-answers li.correct { background: var(--correct); border-radius: 4px; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;

const JS: &str = r#"
function toggleAnswers() {
  document.body.classList.toggle('show-answers');
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_result;

    #[test]
    fn html_preview_contains_required_elements() {
        let result = sample_result();
        let html = generate_html(&result);

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Đề 1"));
        assert!(html.contains("Đề 2"));
        assert!(html.contains("class=\"correct\""));
        assert!(html.contains("badge"));
        assert!(html.contains("Raw JSON Data"));
    }

    #[test]
    fn question_text_is_escaped() {
        let mut result = sample_result();
        result.exams[0].questions[0].text = "Is <b> & 'x' safe?".into();
        let html = generate_html(&result);
        assert!(html.contains("Is &lt;b&gt; &amp; &#x27;x&#x27; safe?"));
        assert!(!html.contains("Is <b>"));
    }

    #[test]
    fn pool_table_flags_empty_cells() {
        let result = sample_result();
        let html = generate_html(&result);
        let empty = Cell::all()
            .filter(|&c| result.source_stats.categorized.cell(c).is_empty())
            .count();
        assert_eq!(html.matches("<td class=\"empty\">").count(), empty);
    }

    #[test]
    fn html_preview_write_to_file() {
        let result = sample_result();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview").join("exam.html");

        write_html_preview(&result, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
