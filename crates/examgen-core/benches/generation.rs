use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use examgen_core::generator::{ExamGenerator, ExamSettings};
use examgen_core::parser::parse_document;
use examgen_core::ParsedDocument;

fn make_pool(n: usize) -> ParsedDocument {
    let difficulties = ["Dễ", "TB", "Khó"];
    let types = ["LT", "TT"];
    let mut s = String::new();
    for i in 0..n {
        s.push_str(&format!(
            "Câu {}: Question {i} ({}) ({})\nA. one\nB. two\nC. three\nD. four\n",
            i + 1,
            difficulties[i % 3],
            types[(i / 3) % 2],
        ));
    }
    parse_document(&s).unwrap()
}

fn bench_generate_exams(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_exams");

    let pool = make_pool(500);

    for (name, question_count, version_count) in
        [("20q_x3", 20, 3), ("50q_x10", 50, 10), ("200q_x100", 200, 100)]
    {
        let settings = ExamSettings {
            question_count,
            version_count,
            ..ExamSettings::default()
        };
        group.bench_function(name, |b| {
            let mut generator = ExamGenerator::with_rng(StdRng::seed_from_u64(7));
            b.iter(|| generator.generate_exams(black_box(&pool), black_box(&settings), None))
        });
    }

    group.finish();
}

fn bench_uniform_fallback(c: &mut Criterion) {
    let mut group = c.benchmark_group("uniform_fallback");

    let text: String = (0..500)
        .map(|i| format!("Câu {}: Untagged {i}\nA. one\nB. two\n", i + 1))
        .collect();
    let pool = parse_document(&text).unwrap();
    let settings = ExamSettings {
        question_count: 50,
        version_count: 10,
        ..ExamSettings::default()
    };

    group.bench_function("50q_x10", |b| {
        let mut generator = ExamGenerator::with_rng(StdRng::seed_from_u64(7));
        b.iter(|| generator.generate_exams(black_box(&pool), black_box(&settings), None))
    });

    group.finish();
}

criterion_group!(benches, bench_generate_exams, bench_uniform_fallback);
criterion_main!(benches);
