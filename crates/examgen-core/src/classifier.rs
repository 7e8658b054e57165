//! Line classifier for extracted quiz text.
//!
//! Every input line maps to exactly one [`LineKind`]. Patterns are tried in a
//! fixed order: question header, option, answer declaration, and anything
//! else is a continuation line.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Difficulty, QuestionType};

static HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^Câu\s*(\d+)[:.]?\s*(.*?)(?:\s*\(([^)]*)\))?\s*(?:\(([^)]*)\))?\s*$",
    )
    .expect("header pattern is valid")
});

static OPTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\*?)([A-D])\.\s*(.*)$").expect("option pattern is valid"));

static ANSWER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:Đáp\s*án|Answer)[:.]?\s*([A-D])").expect("answer pattern is valid")
});

static DIFFICULTY_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(Dễ|TB|Khó|Easy|Medium|Hard|Trung bình)\b")
        .expect("difficulty pattern is valid")
});

static TYPE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(LT|TT|Theory|Practice|Lý thuyết|Thực hành)\b")
        .expect("type pattern is valid")
});

static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("parenthesis pattern is valid"));

/// What a single line of quiz text is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// `Câu 3: prompt (Khó) (LT)`, which starts a new question.
    Header {
        number: u32,
        text: String,
        difficulty: Difficulty,
        question_type: QuestionType,
    },
    /// `B. option text`, or `*B. option text` when marked correct.
    OptionLine {
        letter: char,
        text: String,
        marked_correct: bool,
    },
    /// `Đáp án: C` / `Answer: C`.
    AnswerDeclaration { letter: char },
    /// Any other non-blank line.
    Continuation(String),
}

/// Classify one line of text.
pub fn classify_line(line: &str) -> LineKind {
    let line = line.trim();

    if let Some(caps) = HEADER_PATTERN.captures(line) {
        let number = caps[1].parse().unwrap_or_default();
        let remainder = caps.get(2).map_or("", |m| m.as_str()).trim();
        let meta1 = caps.get(3).map_or("", |m| m.as_str());
        let meta2 = caps.get(4).map_or("", |m| m.as_str());

        let scanned = format!("{remainder} {meta1} {meta2}");
        let difficulty = DIFFICULTY_TOKEN
            .captures(&scanned)
            .map_or(Difficulty::Unknown, |c| normalize_difficulty(&c[1]));
        let question_type = TYPE_TOKEN
            .captures(&scanned)
            .map_or(QuestionType::Unknown, |c| normalize_type(&c[1]));

        return LineKind::Header {
            number,
            text: strip_metadata(remainder),
            difficulty,
            question_type,
        };
    }

    if let Some(caps) = OPTION_PATTERN.captures(line) {
        let letter = caps[2].chars().next().unwrap_or('A');
        return LineKind::OptionLine {
            letter,
            text: caps[3].trim().to_string(),
            marked_correct: !caps[1].is_empty(),
        };
    }

    if let Some(caps) = ANSWER_PATTERN.captures(line) {
        let letter = caps[1]
            .chars()
            .next()
            .map_or('A', |c| c.to_ascii_uppercase());
        return LineKind::AnswerDeclaration { letter };
    }

    LineKind::Continuation(line.to_string())
}

/// Remove the first difficulty token, the first type token and every
/// parenthesized fragment, then collapse whitespace.
fn strip_metadata(text: &str) -> String {
    let text = DIFFICULTY_TOKEN.replace(text, "");
    let text = TYPE_TOKEN.replace(&text, "");
    let text = PARENTHESIZED.replace_all(&text, "");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Map a difficulty token (any language, any case) to a [`Difficulty`].
pub fn normalize_difficulty(token: &str) -> Difficulty {
    let normalized = token.to_lowercase();
    if normalized.contains("dễ") || normalized.contains("easy") {
        Difficulty::Easy
    } else if normalized.contains("tb")
        || normalized.contains("medium")
        || normalized.contains("trung bình")
    {
        Difficulty::Medium
    } else if normalized.contains("khó") || normalized.contains("hard") {
        Difficulty::Hard
    } else {
        Difficulty::Unknown
    }
}

/// Map a type token (any language, any case) to a [`QuestionType`].
pub fn normalize_type(token: &str) -> QuestionType {
    let normalized = token.to_lowercase();
    if normalized.contains("lt") || normalized.contains("theory") || normalized.contains("lý thuyết")
    {
        QuestionType::Theory
    } else if normalized.contains("tt")
        || normalized.contains("practice")
        || normalized.contains("thực hành")
    {
        QuestionType::Practice
    } else {
        QuestionType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_with_two_metadata_fragments() {
        let kind = classify_line("Câu 12: Giao thức nào dùng cổng 80? (Khó) (TT)");
        assert_eq!(
            kind,
            LineKind::Header {
                number: 12,
                text: "Giao thức nào dùng cổng 80?".into(),
                difficulty: Difficulty::Hard,
                question_type: QuestionType::Practice,
            }
        );
    }

    #[test]
    fn header_tokens_inline_are_stripped() {
        let kind = classify_line("câu 3. Medium Theory What does DNS resolve?");
        let LineKind::Header {
            text,
            difficulty,
            question_type,
            ..
        } = kind
        else {
            panic!("expected header");
        };
        assert_eq!(text, "What does DNS resolve?");
        assert_eq!(difficulty, Difficulty::Medium);
        assert_eq!(question_type, QuestionType::Theory);
    }

    #[test]
    fn header_without_tags_is_unknown() {
        let kind = classify_line("Câu 1: Thủ đô của Pháp là gì?");
        assert!(matches!(
            kind,
            LineKind::Header {
                difficulty: Difficulty::Unknown,
                question_type: QuestionType::Unknown,
                ..
            }
        ));
    }

    #[test]
    fn header_with_empty_remainder() {
        let LineKind::Header { number, text, .. } = classify_line("Câu 7") else {
            panic!("expected header");
        };
        assert_eq!(number, 7);
        assert!(text.is_empty());
    }

    #[test]
    fn tokens_must_be_whole_words() {
        // "TTL" and "Hardware" must not be read as tags.
        let LineKind::Header {
            text,
            difficulty,
            question_type,
            ..
        } = classify_line("Câu 4: TTL in Hardware routers")
        else {
            panic!("expected header");
        };
        assert_eq!(difficulty, Difficulty::Unknown);
        assert_eq!(question_type, QuestionType::Unknown);
        assert_eq!(text, "TTL in Hardware routers");
    }

    #[test]
    fn option_lines_plain_and_marked() {
        assert_eq!(
            classify_line("B. 443"),
            LineKind::OptionLine {
                letter: 'B',
                text: "443".into(),
                marked_correct: false,
            }
        );
        assert_eq!(
            classify_line("*C.   HTTP"),
            LineKind::OptionLine {
                letter: 'C',
                text: "HTTP".into(),
                marked_correct: true,
            }
        );
    }

    #[test]
    fn answer_declarations() {
        assert_eq!(
            classify_line("Đáp án: d"),
            LineKind::AnswerDeclaration { letter: 'D' }
        );
        assert_eq!(
            classify_line("Answer. B"),
            LineKind::AnswerDeclaration { letter: 'B' }
        );
        assert_eq!(
            classify_line("ĐÁP ÁN C"),
            LineKind::AnswerDeclaration { letter: 'C' }
        );
    }

    #[test]
    fn everything_else_is_continuation() {
        assert_eq!(
            classify_line("  which of the following holds?  "),
            LineKind::Continuation("which of the following holds?".into())
        );
        assert!(matches!(classify_line("E. fifth"), LineKind::Continuation(_)));
    }

    #[test]
    fn normalizers() {
        assert_eq!(normalize_difficulty("EASY"), Difficulty::Easy);
        assert_eq!(normalize_difficulty("trung bình"), Difficulty::Medium);
        assert_eq!(normalize_difficulty("???"), Difficulty::Unknown);
        assert_eq!(normalize_type("Lý thuyết"), QuestionType::Theory);
        assert_eq!(normalize_type("practice"), QuestionType::Practice);
    }
}
