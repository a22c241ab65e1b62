//! Performance benchmarks for cdn-deploy
//!
//! Covers the pure fragments on the hot paths: percentile statistics, CSP
//! parsing and serialization, header merging, vendor config generation and
//! the shared metric series.

use cdn_deploy::config::Config;
use cdn_deploy::core::manager::{generate_csp_header, generate_headers};
use cdn_deploy::core::providers::ProviderRegistry;
use cdn_deploy::core::security::parse_csp;
use cdn_deploy::monitoring::metrics::helpers::sorted;
use cdn_deploy::monitoring::metrics::calculate_percentile;
use cdn_deploy::monitoring::{MetricSample, MetricsStore};
use cdn_deploy::CdnManager;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use tokio::runtime::Runtime;

fn sample(i: usize) -> MetricSample {
    MetricSample {
        timestamp: chrono::Utc::now(),
        response_time_ms: (i % 997) as f64 * 1.7,
        availability: 100.0,
        error_rate: 0.0,
        cache_hit_ratio: Some(80.0),
    }
}

fn bench_config() -> Config {
    let mut config = Config::default();
    config.deployment.domain = "www.example.com".to_string();
    config
}

/// Benchmark percentile statistics
fn bench_percentiles(c: &mut Criterion) {
    let mut group = c.benchmark_group("percentiles");

    for size in [100, 1000, 10000].iter() {
        let values: Vec<f64> = (0..*size).map(|i| ((i * 7919) % 10007) as f64).collect();
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("sort_and_p95", size), &values, |b, values| {
            b.iter(|| {
                let ordered = sorted(black_box(values));
                black_box(calculate_percentile(&ordered, 95.0))
            });
        });

        let ordered = sorted(&values);
        group.bench_with_input(BenchmarkId::new("p99_presorted", size), &ordered, |b, ordered| {
            b.iter(|| black_box(calculate_percentile(black_box(ordered), 99.0)));
        });
    }

    group.finish();
}

/// Benchmark CSP parsing and serialization
fn bench_csp(c: &mut Criterion) {
    let mut group = c.benchmark_group("csp");
    let config = bench_config();
    let header = generate_csp_header(&config.policy.csp);

    group.bench_function("generate_csp_header", |b| {
        b.iter(|| black_box(generate_csp_header(black_box(&config.policy.csp))));
    });

    group.bench_function("parse_csp", |b| {
        b.iter(|| black_box(parse_csp(black_box(&header))));
    });

    group.finish();
}

/// Benchmark header merging and vendor config generation
fn bench_policy_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("policy_generation");
    let config = bench_config();

    group.bench_function("generate_headers", |b| {
        b.iter(|| black_box(generate_headers(black_box(&config))));
    });

    let registry = ProviderRegistry::with_defaults(&config).unwrap();
    for provider in ["cloudflare", "cloudfront", "fastly", "netlify", "vercel"] {
        let mut config = config.clone();
        config.deployment.provider = provider.to_string();
        let manager = CdnManager::new(config, registry.clone()).unwrap();
        group.bench_with_input(
            BenchmarkId::new("generate_provider_config", provider),
            &manager,
            |b, manager| {
                b.iter(|| black_box(manager.generate_provider_config().unwrap()));
            },
        );
    }

    group.finish();
}

/// Benchmark the shared metric series under concurrent writers
fn bench_metrics_store(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("metrics_store");

    group.bench_function("record_bounded", |b| {
        let store = MetricsStore::new();
        let mut i = 0;
        b.iter(|| {
            store.record(sample(i));
            i += 1;
        });
    });

    let full = MetricsStore::new();
    for i in 0..2000 {
        full.record(sample(i));
    }
    group.bench_function("snapshot_full", |b| {
        b.iter(|| black_box(full.snapshot()));
    });

    for num_tasks in [10, 50, 100].iter() {
        group.bench_with_input(
            BenchmarkId::new("concurrent_record", num_tasks),
            num_tasks,
            |b, &num_tasks| {
                let store = Arc::new(MetricsStore::new());
                b.iter(|| {
                    let store = store.clone();
                    rt.block_on(async move {
                        let handles: Vec<_> = (0..num_tasks)
                            .map(|i| {
                                let store = store.clone();
                                tokio::spawn(async move { store.record(sample(i)) })
                            })
                            .collect();
                        for handle in handles {
                            handle.await.unwrap();
                        }
                    });
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_percentiles,
    bench_csp,
    bench_policy_generation,
    bench_metrics_store
);
criterion_main!(benches);
