//! Benchmarks for chatstats loading, bucketing and analyses.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench bucketing -- over_time`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chatstats::analysis::bucket::{bucket_entities, histogram};
use chatstats::analysis::{conversation_reacts, largest_chats, largest_chats_over_time};
use chatstats::config::{AnalysisConfig, MILLIS_PER_DAY};
use chatstats::inbox::parse_export_str;
use chatstats::{Conversation, Message, Reaction};

// =============================================================================
// Test Data Generators
// =============================================================================

fn generate_export_json(count: usize) -> String {
    let mut messages = Vec::with_capacity(count);
    for i in (0..count).rev() {
        let sender = if i % 2 == 0 { "Alice" } else { "Bob" };
        let timestamp = 1_577_836_800_000_i64 + (i as i64 * 60_000);
        messages.push(format!(
            r#"{{"sender_name": "{}", "timestamp_ms": {}, "content": "Message number {}", "reactions": [{{"reaction": "ð\u009f\u0091\u008d", "actor": "Alice"}}]}}"#,
            sender, timestamp, i
        ));
    }
    format!(
        r#"{{"participants": [{{"name": "Alice"}}, {{"name": "Bob"}}], "messages": [{}], "title": "Bench"}}"#,
        messages.join(",\n")
    )
}

fn generate_conversations(chats: usize, per_chat: usize) -> Vec<Conversation> {
    (0..chats)
        .map(|c| {
            let messages = (0..per_chat)
                .map(|i| {
                    // Spread chats over different stretches of a few years
                    let t = (c as i64 * 7 + i as i64 * 13) % 1_000 * MILLIS_PER_DAY + i as i64;
                    Message::new(if i % 3 == 0 { "Alice" } else { "Bob" }, t)
                        .with_content("hello there")
                        .with_reaction(Reaction::new("😆", "Alice"))
                })
                .collect();
            Conversation::new(format!("chat_{c}"))
                .with_participants(["Alice", "Bob"])
                .with_messages(messages)
        })
        .collect()
}

// =============================================================================
// Kernel Benchmarks
// =============================================================================

fn bench_bucket_entities(c: &mut Criterion) {
    let mut group = c.benchmark_group("bucket_entities");

    for size in [1_000_usize, 10_000, 100_000] {
        let entities: Vec<(usize, Vec<i64>)> = (0..10)
            .map(|e| {
                let times = (0..size / 10)
                    .map(|i| ((i * 7919 + e * 104_729) % 1_000_000) as i64 * 60_000)
                    .collect();
                (e, times)
            })
            .collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &entities, |b, entities| {
            b.iter(|| black_box(bucket_entities(entities.clone(), 30 * MILLIS_PER_DAY)));
        });
    }
    group.finish();
}

fn bench_histogram(c: &mut Criterion) {
    let mut group = c.benchmark_group("histogram");

    for size in [1_000_usize, 100_000] {
        let values: Vec<i64> = (0..size as i64).map(|i| (i * 7919) % 50_000).collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &values, |b, values| {
            b.iter(|| black_box(histogram(black_box(values), 96)));
        });
    }
    group.finish();
}

// =============================================================================
// Loading and Analysis Benchmarks
// =============================================================================

fn bench_parse_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_export");

    for size in [1_000_usize, 10_000] {
        let json = generate_export_json(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &json, |b, json| {
            b.iter(|| black_box(parse_export_str("bench", black_box(json), true).unwrap()));
        });
    }
    group.finish();
}

fn bench_analyses(c: &mut Criterion) {
    let conversations = generate_conversations(50, 2_000);
    let config = AnalysisConfig::new().with_min_messages(0);

    let mut group = c.benchmark_group("analyses");
    group.throughput(Throughput::Elements(100_000));
    group.bench_function("largest", |b| {
        b.iter(|| black_box(largest_chats(&conversations, &config)));
    });
    group.bench_function("over_time", |b| {
        b.iter(|| black_box(largest_chats_over_time(&conversations, &config)));
    });
    group.bench_function("reacts", |b| {
        b.iter(|| {
            for conversation in &conversations {
                black_box(conversation_reacts(conversation));
            }
        });
    });
    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(
    benches,
    bench_bucket_entities,
    bench_histogram,
    bench_parse_export,
    bench_analyses,
);

criterion_main!(benches);
