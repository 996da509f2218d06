//! Benchmarks for document graph construction.

use std::fs;
use std::path::Path;

use aw_site::{FolderPlacement, GraphBuilder, Navigation};
use aw_storage_fs::FsStorage;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

/// Create a wiki folder with specified depth and breadth.
///
/// Every page links to its parent index and its first child, carries two
/// tags and a small table.
fn create_wiki_structure(root: &Path, depth: usize, breadth: usize) {
    fn create_level(dir: &Path, current_depth: usize, max_depth: usize, breadth: usize) {
        if current_depth > max_depth {
            return;
        }

        fs::create_dir_all(dir).unwrap();
        fs::write(
            dir.join("index.md"),
            format!(
                "---\ntags: [level-{current_depth}, wiki]\n---\n\
                 # Level {current_depth}\n\n\
                 See [first section](section-0/) and [parent](../index.md).\n\n\
                 ## Data\n\n| a | b |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |\n| 5 | 6 |\n"
            ),
        )
        .unwrap();

        for i in 0..breadth {
            let child_dir = dir.join(format!("section-{i}"));
            create_level(&child_dir, current_depth + 1, max_depth, breadth);
        }
    }

    create_level(root, 0, depth, breadth);
}

fn bench_graph_build(c: &mut Criterion) {
    let temp_dir = tempfile::tempdir().unwrap();

    let mut group = c.benchmark_group("graph");

    for (depth, breadth) in [(2, 5), (3, 4), (4, 3)] {
        let source_dir = temp_dir.path().join(format!("docs_{depth}_{breadth}"));
        create_wiki_structure(&source_dir, depth, breadth);
        let storage = FsStorage::new(source_dir);

        group.bench_with_input(
            BenchmarkId::new("build", format!("d{depth}_b{breadth}")),
            &storage,
            |b, storage| b.iter(|| GraphBuilder::new(storage).build().unwrap()),
        );
    }

    group.finish();
}

fn bench_navigation(c: &mut Criterion) {
    let temp_dir = tempfile::tempdir().unwrap();
    let source_dir = temp_dir.path().join("docs");
    create_wiki_structure(&source_dir, 3, 5);
    let storage = FsStorage::new(source_dir);
    let (graph, _) = GraphBuilder::new(&storage).build().unwrap();
    let ranks = std::collections::HashMap::new();

    let mut group = c.benchmark_group("navigation");

    group.bench_function("build_tree", |b| {
        b.iter(|| Navigation::build(graph.documents(), &ranks, FolderPlacement::default()));
    });

    group.bench_function("document_order", |b| {
        b.iter(|| graph.navigation().document_order());
    });

    group.finish();
}

criterion_group!(benches, bench_graph_build, bench_navigation);
criterion_main!(benches);
