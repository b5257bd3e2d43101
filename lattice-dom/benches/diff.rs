use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use lattice_dom::host::MemoryDocument;
use lattice_dom::node::{Identity, NodeDescription};
use lattice_dom::{apply, diff, mount, RenderConfig};

/// A list of `rows` items, each with a label and a value cell.
fn table(rows: u64, tick: u64) -> NodeDescription {
    let mut next = 0;
    let mut id = || {
        next += 1;
        Identity::from(next)
    };

    let mut list = NodeDescription::element("ul").with_identity(id());
    for row in 0..rows {
        let value = if row % 10 == 0 { row + tick } else { row };
        list = list.with_child(
            NodeDescription::element("li")
                .with_identity(id())
                .with_attr("className", "row")
                .with_child(NodeDescription::text(format!("Row {row}")).with_identity(id()))
                .with_child(NodeDescription::text(value.to_string()).with_identity(id())),
        );
    }
    list
}

fn diff_unchanged(c: &mut Criterion) {
    let tree = table(1_000, 0);

    c.bench_function("diff_unchanged_1000", |b| {
        b.iter(|| diff(black_box(&tree), black_box(&tree)))
    });
}

fn diff_sparse_text_changes(c: &mut Criterion) {
    let old = table(1_000, 0);
    let new = table(1_000, 1);

    c.bench_function("diff_sparse_text_1000", |b| {
        b.iter(|| diff(black_box(&old), black_box(&new)))
    });
}

fn diff_and_apply(c: &mut Criterion) {
    let config = RenderConfig::default();
    let old = table(200, 0);
    let new = table(200, 1);
    let changes = diff(&old, &new);

    c.bench_function("apply_sparse_text_200", |b| {
        b.iter_batched(
            || {
                let mut doc = MemoryDocument::new();
                let body = doc.body();
                mount(&mut doc, &old, Some(&body), &config).unwrap();
                (doc, body)
            },
            |(mut doc, body)| apply(&mut doc, &body, black_box(&changes), &config).unwrap(),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, diff_unchanged, diff_sparse_text_changes, diff_and_apply);
criterion_main!(benches);
