//! Answer distribution and cross-version statistics.

use serde::{Deserialize, Serialize};

use crate::generator::{ExamMetadata, GeneratedExam};

/// Letters tallied in answer statistics.
pub const ANSWER_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

/// How often each letter is the correct answer in one exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerDistribution {
    /// (letter, count) for A-D in order.
    pub counts: Vec<(char, usize)>,
    /// Questions without a known answer.
    pub unanswered: usize,
    pub total: usize,
}

impl AnswerDistribution {
    pub fn from_exam(exam: &GeneratedExam) -> Self {
        let mut counts: Vec<(char, usize)> = ANSWER_LETTERS.iter().map(|&l| (l, 0)).collect();
        let mut unanswered = 0;
        for question in &exam.questions {
            match question
                .correct_answer
                .and_then(|a| counts.iter_mut().find(|(l, _)| *l == a))
            {
                Some((_, count)) => *count += 1,
                None => unanswered += 1,
            }
        }
        Self {
            counts,
            unanswered,
            total: exam.questions.len(),
        }
    }

    /// Share of the exam answered by `letter`, in percent.
    pub fn percentage(&self, letter: char) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let count = self
            .counts
            .iter()
            .find(|(l, _)| *l == letter)
            .map_or(0, |(_, c)| *c);
        count as f64 / self.total as f64 * 100.0
    }
}

/// Per-version metadata plus averages across versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub exam_count: usize,
    pub per_version: Vec<(usize, ExamMetadata)>,
    pub total_questions: usize,
    pub avg_easy: f64,
    pub avg_medium: f64,
    pub avg_hard: f64,
}

impl AggregateStats {
    pub fn from_exams(exams: &[GeneratedExam]) -> Self {
        let n = exams.len().max(1) as f64;
        let sum = |f: fn(&ExamMetadata) -> usize| -> f64 {
            exams.iter().map(|e| f(&e.metadata)).sum::<usize>() as f64
        };

        Self {
            exam_count: exams.len(),
            per_version: exams.iter().map(|e| (e.version, e.metadata)).collect(),
            total_questions: exams.iter().map(|e| e.metadata.total_questions).sum(),
            avg_easy: sum(|m| m.difficulty.easy) / n,
            avg_medium: sum(|m| m.difficulty.medium) / n,
            avg_hard: sum(|m| m.difficulty.hard) / n,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::model::{Difficulty, Question, QuestionType};

    fn exam(version: usize, answers: &[Option<char>], difficulty: Difficulty) -> GeneratedExam {
        let questions: Vec<Question> = answers
            .iter()
            .enumerate()
            .map(|(i, a)| Question {
                text: format!("Q{i}"),
                options: BTreeMap::from([('A', "a".into()), ('B', "b".into())]),
                correct_answer: *a,
                difficulty,
                question_type: QuestionType::Theory,
            })
            .collect();
        GeneratedExam {
            id: format!("exam-{version}"),
            version,
            metadata: ExamMetadata::from_questions(&questions),
            questions,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn answer_distribution_counts_and_percentages() {
        let e = exam(
            1,
            &[Some('A'), Some('A'), Some('C'), None],
            Difficulty::Easy,
        );
        let dist = AnswerDistribution::from_exam(&e);
        assert_eq!(dist.counts[0], ('A', 2));
        assert_eq!(dist.counts[2], ('C', 1));
        assert_eq!(dist.unanswered, 1);
        assert!((dist.percentage('A') - 50.0).abs() < 1e-9);
        assert_eq!(dist.percentage('D'), 0.0);
    }

    #[test]
    fn aggregate_averages() {
        let exams = vec![
            exam(1, &[Some('A'); 4], Difficulty::Easy),
            exam(2, &[Some('B'); 4], Difficulty::Hard),
        ];
        let stats = AggregateStats::from_exams(&exams);
        assert_eq!(stats.exam_count, 2);
        assert_eq!(stats.total_questions, 8);
        assert!((stats.avg_easy - 2.0).abs() < 1e-9);
        assert!((stats.avg_hard - 2.0).abs() < 1e-9);
        assert_eq!(stats.avg_medium, 0.0);
    }

    #[test]
    fn aggregate_of_nothing_is_zero() {
        let stats = AggregateStats::from_exams(&[]);
        assert_eq!(stats.exam_count, 0);
        assert_eq!(stats.avg_easy, 0.0);
    }
}
