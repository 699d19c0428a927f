use conduit_telemetry::{parse_line, snapshot_from_lines};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Build a journal tail with a stats line every `stride` lines.
fn journal_tail(len: usize, stride: usize) -> Vec<String> {
    (0..len)
        .map(|i| {
            let secs = i % 60;
            if i % stride == 0 {
                format!(
                    "2026-01-31 05:33:{:02} [STATS] Connecting: {} | Connected: {} | Up: {}.0 MB | Down: {}.5 GB | Uptime: 1h",
                    secs,
                    i % 7,
                    i % 31,
                    900 + i,
                    8 + i / 100
                )
            } else {
                format!("2026-01-31 05:33:{:02} [INFO] relayed packet batch {}", secs, i)
            }
        })
        .collect()
}

/// Benchmark parsing a single stats line
fn bench_parse_line(c: &mut Criterion) {
    let line = "2026-01-31 05:33:39 [STATS] Connecting: 4 | Connected: 19 | Up: 950.0 MB | Down: 8.7 GB | Uptime: 2h3m";

    c.bench_function("parse_line", |b| {
        b.iter(|| black_box(parse_line(black_box(line))));
    });
}

/// Benchmark the full pipeline over journal tails of varying length
fn bench_snapshot_from_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_from_lines");

    let configs = vec![
        ("dense_200", 200, 1),
        ("sparse_200", 200, 30),
        ("sparse_2000", 2000, 30),
        ("single_stats_2000", 2000, usize::MAX),
    ];

    for (name, len, stride) in configs {
        let lines = journal_tail(len, stride);
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::from_parameter(name), &lines, |b, lines| {
            b.iter(|| black_box(snapshot_from_lines(lines)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse_line, bench_snapshot_from_lines);
criterion_main!(benches);
