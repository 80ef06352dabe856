use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dabug::{Config, Tracer};
use std::io;
use std::sync::Once;
use tempfile::tempdir;
use log::{info, LevelFilter};
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config as LogConfig, Root},
    encode::pattern::PatternEncoder,
};

const ITERATIONS: usize = 1_000;

static LOGGER_INIT: Once = Once::new();

#[derive(Debug)]
struct TestEvent {
    id: i32,
    active: bool,
    data: [u8; 16],
    description: String,
}

fn test_event() -> TestEvent {
    TestEvent {
        id: 42,
        active: true,
        data: [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16],
        description: "Event with enough text to resemble a real trace payload".to_string(),
    }
}

fn setup_log4rs(log_file: &str) {
    LOGGER_INIT.call_once(|| {
        let logfile = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{d} - {f}:{L} - {m}{n}")))
            .append(true)
            .build(log_file)
            .unwrap();

        let config = LogConfig::builder()
            .appender(Appender::builder().build("logfile", Box::new(logfile)))
            .build(Root::builder()
                .appender("logfile")
                .build(LevelFilter::Info))
            .unwrap();

        log4rs::init_config(config).unwrap();
    });
}

fn bench_buffered_tracing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Tracing");
    let event = test_event();

    // Measures capture, buffering and one block render per batch.
    group.bench_function("buffered_then_flush", |b| {
        let tracer = Tracer::new(Config::default(), io::sink());
        b.iter(|| {
            for i in 0..ITERATIONS {
                dabug::msg!(to: tracer, "iteration={} event={:?}", i, event);
            }
            tracer.flush();
        });
    });

    group.bench_function("autoflush", |b| {
        let config = Config { autoflush: true, ..Config::default() };
        let tracer = Tracer::new(config, io::sink());
        b.iter(|| {
            for i in 0..ITERATIONS {
                dabug::msg!(to: tracer, "iteration={} event={:?}", i, event);
            }
        });
    });

    group.bench_function("objs", |b| {
        let tracer = Tracer::new(Config::default(), io::sink());
        b.iter(|| {
            for i in 0..ITERATIONS {
                dabug::objs!(to: tracer, i, event.id, event.active);
            }
            black_box(tracer.drain());
        });
    });

    group.finish();
}

fn bench_log4rs_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("Traditional");
    group.sample_size(10); // Fewer samples due to I/O operations

    let dir = tempdir().unwrap();
    let log_file = dir.path().join("traditional.log");
    setup_log4rs(log_file.to_str().unwrap());
    let event = test_event();

    group.bench_function("log4rs_file", |b| {
        b.iter(|| {
            for i in 0..ITERATIONS {
                info!("iteration={} event={:?}", i, event);
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_buffered_tracing, bench_log4rs_comparison);
criterion_main!(benches);
