//! Benchmarks for the layout engines.

use arrange_core::{AnchorStyles, BoundsSpecified, Content, DockStyle, Rect, Size, TableStyle};
use arrange_layout::{ElementId, EngineKind, LayoutReason, LayoutTree};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn container(tree: &mut LayoutTree, engine: EngineKind, width: i32, height: i32) -> ElementId {
    let root = tree.create("root");
    tree.set_engine(root, engine).unwrap();
    tree.set_bounds(root, Rect::new(0, 0, width, height), BoundsSpecified::ALL)
        .unwrap();
    root
}

fn with_n_children(tree: &mut LayoutTree, parent: ElementId, n: usize, width: i32, height: i32) {
    for _ in 0..n {
        let id = tree.create("item");
        tree.set_bounds(id, Rect::new(0, 0, width, height), BoundsSpecified::ALL)
            .unwrap();
        tree.add_child(parent, id).unwrap();
    }
}

fn bench_dock_100_children(c: &mut Criterion) {
    let mut tree = LayoutTree::new();
    let root = container(&mut tree, EngineKind::Default, 800, 600);
    with_n_children(&mut tree, root, 100, 5, 5);
    let docks = [DockStyle::Top, DockStyle::Left, DockStyle::Bottom, DockStyle::Right];
    let children = tree.children(root).to_vec();
    for (i, id) in children.into_iter().enumerate() {
        tree.set_dock(id, docks[i % docks.len()]).unwrap();
    }

    c.bench_function("dock_100_children", |b| {
        b.iter(|| tree.perform_layout(black_box(root), None, LayoutReason::Explicit))
    });
}

fn bench_anchor_100_children(c: &mut Criterion) {
    let mut tree = LayoutTree::new();
    let root = container(&mut tree, EngineKind::Default, 800, 600);
    with_n_children(&mut tree, root, 100, 30, 30);
    let children = tree.children(root).to_vec();
    for id in children {
        tree.set_anchor(id, AnchorStyles::ALL).unwrap();
    }
    let mut wide = false;

    c.bench_function("anchor_resize_100_children", |b| {
        b.iter(|| {
            wide = !wide;
            let width = if wide { 1000 } else { 800 };
            tree.set_size(root, black_box(Size::new(width, 600)))
        })
    });
}

fn bench_flow_wrap(c: &mut Criterion) {
    let mut tree = LayoutTree::new();
    let root = container(&mut tree, EngineKind::Flow, 800, 600);
    with_n_children(&mut tree, root, 100, 45, 20);

    c.bench_function("flow_wrap_100_children", |b| {
        b.iter(|| tree.perform_layout(black_box(root), None, LayoutReason::Explicit))
    });
    c.bench_function("flow_preferred_size", |b| {
        b.iter(|| tree.preferred_size(black_box(root), black_box(Size::new(333, 0))))
    });
}

fn bench_table_12_column(c: &mut Criterion) {
    let mut tree = LayoutTree::new();
    let root = container(&mut tree, EngineKind::Table, 1200, 800);
    tree.set_column_count(root, 12).unwrap();
    tree.set_column_styles(root, vec![TableStyle::percent(100.0 / 12.0); 12])
        .unwrap();
    with_n_children(&mut tree, root, 48, 40, 20);

    c.bench_function("table_12_column_layout", |b| {
        b.iter(|| tree.perform_layout(black_box(root), None, LayoutReason::Explicit))
    });
    // a stale assignment forces placement as well as sizing
    c.bench_function("table_12_column_reassign", |b| {
        b.iter(|| tree.perform_layout(black_box(root), None, LayoutReason::Columns))
    });
}

fn bench_table_auto_size(c: &mut Criterion) {
    let mut tree = LayoutTree::new();
    let root = container(&mut tree, EngineKind::Table, 600, 400);
    tree.set_column_count(root, 4).unwrap();
    with_n_children(&mut tree, root, 24, 10, 10);
    let children = tree.children(root).to_vec();
    for (i, id) in children.into_iter().enumerate() {
        tree.set_content(id, Content::wrap(8, 12, (i % 7) as u32 + 1))
            .unwrap();
        tree.set_auto_size(id, true).unwrap();
    }

    c.bench_function("table_auto_size_preferred", |b| {
        b.iter(|| tree.preferred_size(black_box(root), black_box(Size::ZERO)))
    });
}

criterion_group!(
    benches,
    bench_dock_100_children,
    bench_anchor_100_children,
    bench_flow_wrap,
    bench_table_12_column,
    bench_table_auto_size,
);
criterion_main!(benches);
