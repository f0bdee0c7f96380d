//! Benchmarks for result parsing and SRT composition

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kaldi_rs::output::format_srt_cues;
use kaldi_rs::{CompleteResult, PartialResult, Word};

/// Build an engine-shaped result JSON with `word_count` timed words
fn generate_result_json(word_count: usize) -> String {
    let words: Vec<String> = (0..word_count)
        .map(|i| {
            format!(
                r#"{{"conf" : 0.98, "start" : {:.2}, "end" : {:.2}, "word" : "word{}"}}"#,
                i as f32 * 0.3,
                i as f32 * 0.3 + 0.25,
                i
            )
        })
        .collect();
    let text: Vec<String> = (0..word_count).map(|i| format!("word{}", i)).collect();

    format!(
        r#"{{"result" : [{}], "text" : "{}"}}"#,
        words.join(", "),
        text.join(" ")
    )
}

fn generate_words(word_count: usize) -> Vec<Word> {
    (0..word_count)
        .map(|i| Word {
            word: format!("word{}", i),
            start: i as f32 * 0.3,
            end: i as f32 * 0.3 + 0.25,
            conf: 0.98,
        })
        .collect()
}

fn bench_result_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("result_parsing");

    let short = generate_result_json(10);
    group.bench_function("complete_10_words", |b| {
        b.iter(|| CompleteResult::parse(black_box(&short)).unwrap())
    });

    let long = generate_result_json(200);
    group.bench_function("complete_200_words", |b| {
        b.iter(|| CompleteResult::parse(black_box(&long)).unwrap())
    });

    let partial = r#"{"partial" : "one two three four"}"#;
    group.bench_function("partial", |b| {
        b.iter(|| PartialResult::parse(black_box(partial)).unwrap())
    });

    group.finish();
}

fn bench_srt_composition(c: &mut Criterion) {
    let mut group = c.benchmark_group("srt_composition");

    let words = generate_words(200);
    group.bench_function("cues_200_words", |b| {
        b.iter(|| format_srt_cues(black_box(&words), 7, 1))
    });

    group.finish();
}

criterion_group!(benches, bench_result_parsing, bench_srt_composition);
criterion_main!(benches);
