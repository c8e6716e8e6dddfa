#![allow(clippy::all)]
//! Benchmarks for the exemption registry and pre-login gate.
//!
//! Tests: CIDR parse, range containment, gate evaluation against a
//! populated registry, and the mutate-and-persist cycle.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::net::IpAddr;
use std::sync::Arc;

use sessionskip::config::ConfigFile;
use sessionskip::gate::{evaluate, SessionGate};
use sessionskip::registry::{CidrRange, ExemptionRegistry};
use tempfile::tempdir;

fn populated_registry(users: usize) -> (tempfile::TempDir, Arc<ExemptionRegistry>) {
    let dir = tempdir().unwrap();
    let registry = Arc::new(ExemptionRegistry::new(ConfigFile::new(
        dir.path().join("sessionskip.yml"),
    )));
    registry.load().unwrap();
    for i in 0..users {
        let user = format!("player{i}");
        let cidr: CidrRange = format!("10.{}.0.0/16", i % 250).parse().unwrap();
        registry.add_range(&user, cidr).unwrap();
    }
    (dir, registry)
}

fn bench_cidr(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry/cidr");

    group.bench_function("parse_prefixed", |b| {
        b.iter(|| black_box("10.0.0.0/24".parse::<CidrRange>().unwrap()));
    });

    group.bench_function("parse_bare", |b| {
        b.iter(|| black_box("192.168.1.5".parse::<CidrRange>().unwrap()));
    });

    let range: CidrRange = "10.0.0.0/8".parse().unwrap();
    let addr: IpAddr = "10.1.2.3".parse().unwrap();
    group.bench_function("contains", |b| {
        b.iter(|| black_box(range.contains(addr)));
    });

    group.finish();
}

fn bench_gate(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry/gate");

    let (_dir, registry) = populated_registry(100);
    let gate = SessionGate::new(Arc::clone(&registry));
    let hit: IpAddr = "10.5.1.1".parse().unwrap();
    let miss: IpAddr = "192.168.1.1".parse().unwrap();

    group.bench_function("evaluate_matched", |b| {
        b.iter(|| black_box(evaluate(&registry, "player5", hit)));
    });

    group.bench_function("evaluate_no_rule", |b| {
        b.iter(|| black_box(evaluate(&registry, "stranger", hit)));
    });

    group.bench_function("check_mismatched", |b| {
        b.iter(|| black_box(gate.check("player5", miss)));
    });

    group.finish();
}

fn bench_mutation(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry/mutation");
    group.sample_size(20);

    let (_dir, registry) = populated_registry(50);
    let cidr: CidrRange = "172.16.0.0/12".parse().unwrap();

    group.bench_function("add_then_remove_persisted", |b| {
        b.iter(|| {
            registry.add_range("bench", cidr.clone()).unwrap();
            registry.remove_range("bench", &cidr).unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_cidr, bench_gate, bench_mutation);
criterion_main!(benches);
