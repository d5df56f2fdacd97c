use console_dashboard::dashboard::{
    pack, resolve_drop, Cell, ForcedPlacement, Layout, WidgetId, WidgetWidths,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn build_widgets(count: usize) -> (Vec<WidgetId>, WidgetWidths) {
    let ids: Vec<WidgetId> = (0..count).map(|i| format!("widget{i:02}")).collect();
    let widths = WidgetWidths::new(
        ids.iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), [3, 4, 6, 8, 12][i % 5]))
            .collect(),
    );
    (ids, widths)
}

fn bench_pack(c: &mut Criterion) {
    let (ids, widths) = build_widgets(40);
    let packed = pack(&ids, &widths, &Layout::new(), None);
    let forced = ForcedPlacement {
        id: ids[7].clone(),
        row: 1,
        col: 1,
    };

    c.bench_function("pack_fresh", |b| {
        b.iter(|| black_box(pack(black_box(&ids), &widths, &Layout::new(), None)))
    });

    c.bench_function("pack_stable", |b| {
        b.iter(|| black_box(pack(black_box(&ids), &widths, &packed, None)))
    });

    c.bench_function("pack_forced", |b| {
        b.iter(|| black_box(pack(black_box(&ids), &widths, &packed, Some(&forced))))
    });

    c.bench_function("resolve_drop", |b| {
        b.iter(|| {
            black_box(resolve_drop(
                &packed,
                &ids,
                &widths,
                &ids[3],
                black_box(Cell { row: 2, col: 4 }),
            ))
        })
    });
}

criterion_group!(benches, bench_pack);
criterion_main!(benches);
