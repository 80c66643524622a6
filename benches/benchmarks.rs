//! Benchmarks for dbstash catalog selection and migration parsing

use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use dbstash::migration::{parse_migration_rows, MigrationFilenameIndex};
use dbstash::selector::{filter_backups, suggest_default};
use dbstash::BackupFile;
use std::path::PathBuf;

fn synthetic_catalog(size: i64) -> Vec<BackupFile> {
    let directory = PathBuf::from("/var/backups");
    (0..size)
        .rev()
        .map(|i| {
            let prefix = if i % 2 == 0 { "prod" } else { "dev" };
            let name = format!("{prefix}_2026{:04}_000000.backup", i % 10_000);
            BackupFile {
                path: directory.join(&name),
                directory: directory.clone(),
                name,
                size_bytes: 1024,
                modified: Utc.timestamp_opt(i, 0).unwrap(),
            }
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let catalog = synthetic_catalog(1_000);
    c.bench_function("filter_backups_alias", |b| {
        b.iter(|| filter_backups(black_box(&catalog), black_box("production")));
    });
    c.bench_function("filter_backups_exact", |b| {
        b.iter(|| filter_backups(black_box(&catalog), black_box("DEV_20260999_000000.BACKUP")));
    });
}

fn bench_suggest(c: &mut Criterion) {
    let catalog = synthetic_catalog(1_000);
    c.bench_function("suggest_default_prefix", |b| {
        b.iter(|| suggest_default(black_box(&catalog), Some("missing.backup"), Some("dev")));
    });
}

fn bench_migrations(c: &mut Criterion) {
    let mut listing = String::from("  Local | Remote | Time (UTC)\n  ------|--------|------\n");
    let mut files = Vec::new();
    for i in 0..500 {
        let stamp = format!("20260101{i:06}");
        listing.push_str(&format!("  {stamp} | {stamp} | 2026-01-01 00:00:00\n"));
        files.push(format!("{stamp}_migration_{i}.sql"));
    }

    c.bench_function("parse_migration_rows", |b| {
        b.iter(|| parse_migration_rows(black_box(&listing)));
    });
    c.bench_function("migration_index_build", |b| {
        b.iter(|| MigrationFilenameIndex::from_filenames(black_box(files.clone())));
    });
}

criterion_group!(benches, bench_filter, bench_suggest, bench_migrations);
criterion_main!(benches);
