//! Criterion benchmark for test discovery and the marker partition.

use criterion::{Criterion, criterion_group, criterion_main};
use std::fs;
use std::hint::black_box;
use tempfile::TempDir;

use baseline_runner::core::selection;

/// Builds a suite of `files` test files with `cases_per_file` tests each,
/// every fourth test carrying the visual marker.
fn build_suite(files: usize, cases_per_file: usize) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for file_idx in 0..files {
        let mut content = String::from("import pytest\n\n");
        for case_idx in 0..cases_per_file {
            if case_idx % 4 == 0 {
                content.push_str("@pytest.mark.mpl_image_compare\n");
            }
            content.push_str(&format!(
                "def test_case_{case_idx}():\n    assert True\n\n"
            ));
        }
        fs::write(
            dir.path().join(format!("test_module_{file_idx:03}.py")),
            content,
        )
        .expect("Failed to write bench fixture");
    }
    dir
}

fn bench_discovery(c: &mut Criterion) {
    let suite = build_suite(50, 20);

    c.bench_function("discover_and_partition_1000_cases", |b| {
        b.iter(|| {
            let collection =
                selection::discover(black_box(suite.path()), black_box("mpl_image_compare"))
                    .expect("discovery failed");
            black_box(collection.len())
        })
    });
}

criterion_group!(benches, bench_discovery);
criterion_main!(benches);
