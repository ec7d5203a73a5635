// Benchmark for rendering list snapshots and applying them to the table view.
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use panelsync::{EntityDescriptor, ListSnapshot, ListView, RowRecord, TableView};
use panelsync_client::render_rows;
use serde_json::json;

fn snapshot(rows: i64) -> ListSnapshot {
    ListSnapshot::new(
        (0..rows)
            .map(|id| {
                RowRecord::new(id)
                    .with_field("date", "2024-05-01")
                    .with_field("type", "Transport")
                    .with_field("description", format!("Expense {}", id))
                    .with_field("amount", format!("{}.50", id))
            })
            .collect(),
    )
}

fn render_benchmarks(c: &mut Criterion) {
    let transactions = EntityDescriptor::transactions();
    let rows = snapshot(500);

    c.bench_function("render_500_transactions", |b| {
        b.iter(|| render_rows(black_box(&transactions), black_box(&rows.rows)));
    });

    c.bench_function("apply_snapshot_to_table", |b| {
        let mut view = TableView::new();
        b.iter(|| view.replace_rows(render_rows(&transactions, black_box(&rows.rows))));
    });

    c.bench_function("decode_list_response", |b| {
        let payload = json!({ "transactions": serde_json::to_value(&rows.rows).expect("encode") });
        b.iter(|| {
            ListSnapshot::from_response("transactions", black_box(payload.clone()))
                .expect("decode")
        });
    });
}

criterion_group!(benches, render_benchmarks);
criterion_main!(benches);
